use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::TableKey;
use crate::error::{DesignResult, DesignerError};

/// Table level statistics gathered from the workload's sample database.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TableStatistics {
    /// Total bytes of all tuples in the table.
    pub tuple_size_total: u64,
    /// No procedure in the workload modifies the table.
    pub readonly: bool,
}

impl TableStatistics {
    pub fn new(tuple_size_total: u64, readonly: bool) -> Self {
        Self {
            tuple_size_total,
            readonly,
        }
    }
}

pub trait StatisticsStore {
    fn table_statistics(&self, table: &TableKey) -> Option<&TableStatistics>;

    fn get_table_statistics(&self, table: &TableKey) -> DesignResult<&TableStatistics> {
        self.table_statistics(table)
            .ok_or_else(|| DesignerError::MissingStatistics(table.to_string()))
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryStatistics {
    tables: HashMap<TableKey, TableStatistics>,
}

impl InMemoryStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: TableKey, stats: TableStatistics) {
        self.tables.insert(table, stats);
    }
}

impl StatisticsStore for InMemoryStatistics {
    fn table_statistics(&self, table: &TableKey) -> Option<&TableStatistics> {
        self.tables.get(table)
    }
}
