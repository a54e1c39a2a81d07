use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{ColumnKey, QueryType, StatementKey};
use crate::context::DesignerContext;
use crate::error::DesignResult;

/// Columns read alongside a candidate partitioning column, and the statements reading them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerticalPartitionCandidate {
    columns: BTreeSet<ColumnKey>,
    statements: BTreeSet<StatementKey>,
}

impl VerticalPartitionCandidate {
    pub fn columns(&self) -> &BTreeSet<ColumnKey> {
        &self.columns
    }

    pub fn statements(&self) -> &BTreeSet<StatementKey> {
        &self.statements
    }
}

/// Vertical partitioning candidates for the table of `column`, assuming the table is
/// partitioned on `column`.
///
/// Every select statement that outputs `column` proposes every other column it references,
/// whichever table they belong to. Statements proposing the same column set share one
/// candidate. Candidates come back ordered by column set.
pub fn generate_vertical_partitioning_candidates(
    ctx: &DesignerContext<'_>,
    column: &ColumnKey,
) -> DesignResult<Vec<VerticalPartitionCandidate>> {
    ctx.catalog.get_column(column)?;
    let table = column.table();
    let mut candidates: BTreeMap<BTreeSet<ColumnKey>, BTreeSet<StatementKey>> = BTreeMap::new();

    for procedure in ctx.catalog.referencing_procedures(table)? {
        for stmt_key in procedure.statements() {
            let stmt = ctx.catalog.get_statement(stmt_key)?;
            // Only for selects do we know the output corresponds to the partitioning column.
            if stmt.query_type() != QueryType::Select || !stmt.output_columns().contains(column) {
                continue;
            }

            let columns: BTreeSet<ColumnKey> = stmt
                .referenced_columns()
                .iter()
                .filter(|c| *c != column)
                .cloned()
                .collect();
            if columns.is_empty() {
                continue;
            }

            log::debug!(
                "{}: output {:?}, candidate {:?}",
                stmt_key,
                stmt.output_columns(),
                columns
            );
            candidates
                .entry(columns)
                .or_default()
                .insert(stmt_key.clone());
        }
    }

    Ok(candidates
        .into_iter()
        .map(|(columns, statements)| VerticalPartitionCandidate {
            columns,
            statements,
        })
        .collect())
}
