use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Something with a human readable name, used to break ties between equal weights.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(
    Clone, Debug, Display, From, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TableKey(String);

impl TableKey {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn column<S: Into<String>>(&self, name: S) -> ColumnKey {
        ColumnKey::new(self.clone(), name)
    }
}

impl From<&str> for TableKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Named for TableKey {
    fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[display(fmt = "{}.{}", table, name)]
pub struct ColumnKey {
    table: TableKey,
    name: String,
}

impl ColumnKey {
    pub fn new<S: Into<String>>(table: TableKey, name: S) -> Self {
        Self {
            table,
            name: name.into(),
        }
    }

    pub fn table(&self) -> &TableKey {
        &self.table
    }
}

impl Named for ColumnKey {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(
    Clone, Debug, Display, From, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProcedureKey(String);

impl ProcedureKey {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn parameter<S: Into<String>>(&self, name: S) -> ParameterKey {
        ParameterKey {
            procedure: self.clone(),
            name: name.into(),
        }
    }

    pub fn statement<S: Into<String>>(&self, name: S) -> StatementKey {
        StatementKey {
            procedure: self.clone(),
            name: name.into(),
        }
    }
}

impl From<&str> for ProcedureKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Named for ProcedureKey {
    fn name(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[display(fmt = "{}.{}", procedure, name)]
pub struct ParameterKey {
    procedure: ProcedureKey,
    name: String,
}

impl ParameterKey {
    pub fn procedure(&self) -> &ProcedureKey {
        &self.procedure
    }
}

impl Named for ParameterKey {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[display(fmt = "{}.{}", procedure, name)]
pub struct StatementKey {
    procedure: ProcedureKey,
    name: String,
}

impl StatementKey {
    pub fn procedure(&self) -> &ProcedureKey {
        &self.procedure
    }
}

impl Named for StatementKey {
    fn name(&self) -> &str {
        &self.name
    }
}
