//! Read-only view of the schema the designer works on.
//!
//! The designer never creates or drops schema objects. Everything it needs is looked up through
//! the [`Catalog`] trait by stable string keys, so the graphs built on top of the catalog are
//! plain adjacency maps over keys. [`InMemoryCatalog`] is the arena implementation used by tests
//! and by callers that assemble a schema programmatically.

mod key;
pub use key::*;
mod composite;
pub use composite::*;
mod in_memory;
pub use in_memory::*;

use std::collections::BTreeSet;

use enumset::{EnumSet, EnumSetType};
use strum_macros::{Display, EnumString};

use crate::error::{DesignResult, DesignerError};

#[derive(Debug, Hash, EnumSetType, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
}

impl QueryType {
    /// True when the only access in `types` is an insert, which says nothing about how rows
    /// are looked up.
    pub fn is_insert_only(types: EnumSet<QueryType>) -> bool {
        types == EnumSet::only(QueryType::Insert)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    key: TableKey,
    columns: Vec<ColumnKey>,
    is_replicated: bool,
    partition_column: Option<ColumnKey>,
}

impl Table {
    pub fn key(&self) -> &TableKey {
        &self.key
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Whether the current catalog already replicates this table.
    pub fn is_replicated(&self) -> bool {
        self.is_replicated
    }

    pub fn partition_column(&self) -> Option<&ColumnKey> {
        self.partition_column.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    key: ColumnKey,
    /// The parent column this column references, if it is a foreign key.
    foreign_key: Option<ColumnKey>,
}

impl Column {
    pub fn key(&self) -> &ColumnKey {
        &self.key
    }

    pub fn foreign_key(&self) -> Option<&ColumnKey> {
        self.foreign_key.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    key: ProcedureKey,
    system: bool,
    parameters: Vec<ParameterKey>,
    statements: Vec<StatementKey>,
}

impl Procedure {
    pub fn key(&self) -> &ProcedureKey {
        &self.key
    }

    pub fn is_system(&self) -> bool {
        self.system
    }

    pub fn parameters(&self) -> &[ParameterKey] {
        &self.parameters
    }

    pub fn statements(&self) -> &[StatementKey] {
        &self.statements
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    key: ParameterKey,
    is_array: bool,
}

impl Parameter {
    pub fn key(&self) -> &ParameterKey {
        &self.key
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    key: StatementKey,
    query_type: QueryType,
    referenced_columns: BTreeSet<ColumnKey>,
    output_columns: BTreeSet<ColumnKey>,
}

impl Statement {
    pub fn key(&self) -> &StatementKey {
        &self.key
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// Every column the statement touches, in predicates and in its output.
    pub fn referenced_columns(&self) -> &BTreeSet<ColumnKey> {
        &self.referenced_columns
    }

    pub fn output_columns(&self) -> &BTreeSet<ColumnKey> {
        &self.output_columns
    }

    pub fn tables(&self) -> BTreeSet<TableKey> {
        self.referenced_columns
            .iter()
            .chain(self.output_columns.iter())
            .map(|c| c.table().clone())
            .collect()
    }
}

/// Catalog provides the schema objects the designer reads.
pub trait Catalog {
    /// All tables, ordered by key.
    fn tables(&self) -> Vec<&Table>;
    fn table(&self, key: &TableKey) -> Option<&Table>;
    fn column(&self, key: &ColumnKey) -> Option<&Column>;
    /// All procedures, ordered by key.
    fn procedures(&self) -> Vec<&Procedure>;
    fn procedure(&self, key: &ProcedureKey) -> Option<&Procedure>;
    fn parameter(&self, key: &ParameterKey) -> Option<&Parameter>;
    fn statement(&self, key: &StatementKey) -> Option<&Statement>;

    fn get_table(&self, key: &TableKey) -> DesignResult<&Table> {
        self.table(key)
            .ok_or_else(|| DesignerError::unknown("table", key))
    }

    fn get_column(&self, key: &ColumnKey) -> DesignResult<&Column> {
        self.column(key)
            .ok_or_else(|| DesignerError::unknown("column", key))
    }

    fn get_procedure(&self, key: &ProcedureKey) -> DesignResult<&Procedure> {
        self.procedure(key)
            .ok_or_else(|| DesignerError::unknown("procedure", key))
    }

    fn get_parameter(&self, key: &ParameterKey) -> DesignResult<&Parameter> {
        self.parameter(key)
            .ok_or_else(|| DesignerError::unknown("parameter", key))
    }

    fn get_statement(&self, key: &StatementKey) -> DesignResult<&Statement> {
        self.statement(key)
            .ok_or_else(|| DesignerError::unknown("statement", key))
    }

    /// Tables touched by any statement of the procedure.
    fn referenced_tables(&self, procedure: &Procedure) -> DesignResult<BTreeSet<TableKey>> {
        let mut tables = BTreeSet::new();
        for stmt_key in procedure.statements() {
            tables.extend(self.get_statement(stmt_key)?.tables());
        }
        Ok(tables)
    }

    /// Procedures with at least one statement touching the table, ordered by key.
    fn referencing_procedures(&self, table: &TableKey) -> DesignResult<Vec<&Procedure>> {
        let mut ret = Vec::new();
        for procedure in self.procedures() {
            if self.referenced_tables(procedure)?.contains(table) {
                ret.push(procedure);
            }
        }
        Ok(ret)
    }
}
