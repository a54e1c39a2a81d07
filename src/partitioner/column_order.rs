use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;

use crate::catalog::{ColumnKey, Named, ProcedureKey, TableKey};
use crate::context::DesignerContext;
use crate::error::DesignResult;
use crate::partitioner::{sort_by_weight, weights_table};
use crate::workload::Histogram;

/// One entry of a table's column visit order.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, EnumAsInner)]
pub enum PartitionCandidate {
    Column(ColumnKey),
    /// Placeholder meaning "replicate the table on every partition".
    Replicated(TableKey),
}

impl Named for PartitionCandidate {
    fn name(&self) -> &str {
        match self {
            PartitionCandidate::Column(column) => column.name(),
            PartitionCandidate::Replicated(_) => "*replicated*",
        }
    }
}

impl Display for PartitionCandidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionCandidate::Column(column) => write!(f, "{}", column),
            PartitionCandidate::Replicated(table) => write!(f, "{}.*replicated*", table),
        }
    }
}

/// Where the replication placeholder goes in a column order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReplicationPlacement {
    /// First for read-only tables, last otherwise.
    #[default]
    Auto,
    Last,
    Disabled,
}

/// Workload weight of every column of `table`.
///
/// A column's weight is the total weight of the access graph edges touching the table whose
/// column sets mention it, ignoring insert-only entries, multiplied by one plus its number of
/// foreign key descendants. Columns never accessed weigh zero.
pub fn column_access_weights(
    ctx: &DesignerContext<'_>,
    table: &TableKey,
) -> DesignResult<HashMap<ColumnKey, f64>> {
    let catalog_table = ctx.catalog.get_table(table)?;
    let mut weights: HashMap<ColumnKey, f64> = catalog_table
        .columns()
        .iter()
        .map(|c| (c.clone(), 0.0))
        .collect();

    match ctx.access_graph.incident_edges(table) {
        None => log::warn!("{} has no vertex in the access graph", table),
        Some(edges) if edges.is_empty() => {
            log::warn!("No edges were found for {} in the access graph", table)
        }
        Some(edges) => {
            for (_, edge) in edges {
                let columns = edge.columns().without_insert_only().columns_of(table);
                for column in columns {
                    match weights.get_mut(&column) {
                        Some(weight) => *weight += edge.total_weight(),
                        None => log::debug!("Ignoring unknown column {} in access graph", column),
                    }
                }
            }
        }
    }

    for (column, weight) in weights.iter_mut() {
        let descendants = ctx.dependency_graph.descendants(column).len();
        if descendants > 0 {
            log::debug!("  {}: {} descendants", column, descendants);
        }
        *weight *= (descendants + 1) as f64;
    }
    Ok(weights)
}

/// Columns of `table` to try as its partitioning column, most promising first.
///
/// Forced candidates from the hints replace the weighted order. The replication placeholder is
/// then added according to `placement`.
pub fn generate_column_order(
    ctx: &DesignerContext<'_>,
    table: &TableKey,
    placement: ReplicationPlacement,
) -> DesignResult<Vec<PartitionCandidate>> {
    let forced = ctx.hints.table_partition_candidates(table);
    let columns = if !forced.is_empty() {
        log::debug!("Force {} candidates: {:?}", table, forced);
        for column in &forced {
            ctx.catalog.get_column(column)?;
        }
        forced
    } else {
        let weights = column_access_weights(ctx, table)?;
        let sorted = sort_by_weight(weights.keys().cloned(), &weights)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Column weights for {}:\n{}", table, weights_table(&sorted, &weights));
        }
        sorted
    };

    let mut order: Vec<PartitionCandidate> =
        columns.into_iter().map(PartitionCandidate::Column).collect();
    let replicated = PartitionCandidate::Replicated(table.clone());
    match placement {
        ReplicationPlacement::Disabled => {}
        ReplicationPlacement::Last => order.push(replicated),
        ReplicationPlacement::Auto => {
            if ctx.stats.get_table_statistics(table)?.readonly {
                order.insert(0, replicated);
            } else {
                order.push(replicated);
            }
        }
    }
    Ok(order)
}

/// How often each column of the tables touched by `procedure` is accessed, scaled by the
/// weight of the access graph edges it appears on. Self-loop edges are not counted.
pub fn procedure_column_access_histogram(
    ctx: &DesignerContext<'_>,
    procedure: &ProcedureKey,
) -> DesignResult<Histogram<ColumnKey>> {
    log::debug!("Constructing column access histogram for {}", procedure);
    let proc = ctx.catalog.get_procedure(procedure)?;
    let mut histogram = Histogram::new();
    for table in ctx.catalog.referenced_tables(proc)? {
        let edges = ctx.access_graph.incident_edges(&table).unwrap_or_default();
        for (other, edge) in edges {
            if *other == table {
                continue;
            }
            for (column, count) in edge.columns().column_histogram().iter() {
                if column.table() != &table {
                    continue;
                }
                let weighted = (count as f64 * edge.total_weight()).round() as u64;
                histogram.put(column.clone(), weighted);
            }
        }
    }
    Ok(histogram)
}
