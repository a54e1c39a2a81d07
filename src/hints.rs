use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::catalog::{ColumnKey, Procedure, ProcedureKey, TableKey};

/// Value substituted for a zero coefficient when taking a geometric mean.
pub const DEFAULT_GEOMETRIC_MEAN_ZERO: f64 = 0.001;

/// Knobs supplied by the user of the designer.
///
/// Every field has a default, so a hints file only needs to list what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerHints {
    /// Read-only tables whose size relative to `max_memory_per_partition` is at or below this
    /// ratio are visited first as replication candidates. `None` disables the pre-pass.
    pub force_replication_size_limit: Option<f64>,
    /// Memory budget of one partition in bytes.
    pub max_memory_per_partition: u64,
    pub enable_multi_partitioning: bool,
    pub enable_array_procparameter_candidates: bool,
    /// Column names per table that replace the weighted column order.
    pub table_partition_candidates: BTreeMap<TableKey, Vec<String>>,
    pub ignore_procedures: BTreeSet<ProcedureKey>,
    /// Tables to start the table traversal from, in order.
    pub candidate_roots: Vec<TableKey>,
    pub geometric_mean_zero: f64,
}

impl Default for DesignerHints {
    fn default() -> Self {
        Self {
            force_replication_size_limit: None,
            max_memory_per_partition: 1 << 30,
            enable_multi_partitioning: false,
            enable_array_procparameter_candidates: false,
            table_partition_candidates: BTreeMap::new(),
            ignore_procedures: BTreeSet::new(),
            candidate_roots: vec![],
            geometric_mean_zero: DEFAULT_GEOMETRIC_MEAN_ZERO,
        }
    }
}

impl DesignerHints {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse designer hints")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read hints file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Forced partitioning candidates for `table`, empty when the table has none.
    pub fn table_partition_candidates(&self, table: &TableKey) -> Vec<ColumnKey> {
        self.table_partition_candidates
            .get(table)
            .map(|names| names.iter().map(|n| table.column(n.as_str())).collect())
            .unwrap_or_default()
    }

    pub fn should_ignore_procedure(&self, procedure: &Procedure) -> bool {
        self.ignore_procedures.contains(procedure.key())
    }
}
