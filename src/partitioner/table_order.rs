use std::collections::{HashMap, HashSet};

use crate::catalog::TableKey;
use crate::context::DesignerContext;
use crate::error::{DesignResult, DesignerError};
use crate::graph::breadth_first;
use crate::partitioner::{sort_by_weight, weights_table};

/// Table visit order that keeps each table at its first position.
#[derive(Default)]
struct VisitOrder {
    order: Vec<TableKey>,
    seen: HashSet<TableKey>,
}

impl VisitOrder {
    fn add(&mut self, table: &TableKey) {
        if self.seen.insert(table.clone()) {
            self.order.push(table.clone());
        }
    }
}

/// Order in which the search should assign partitioning to tables.
///
/// Small read-only tables come first so replicating them is tried before anything else. Then
/// the dependency graph is walked breadth first from each candidate root, visiting children
/// with the heaviest access graph edges to their parent first. Tables no root reaches are
/// appended parents first.
pub fn generate_table_order(ctx: &DesignerContext<'_>) -> DesignResult<Vec<TableKey>> {
    let dgraph = ctx.dependency_graph;
    for table in ctx.catalog.tables() {
        if !dgraph.contains(table.key()) {
            return Err(DesignerError::MissingVertex(table.key().to_string()));
        }
    }

    let mut visit_order = VisitOrder::default();
    for table in replication_candidates(ctx)? {
        visit_order.add(&table);
    }
    if !visit_order.order.is_empty() {
        log::debug!("Forced replication: {:?}", visit_order.order);
    }

    for root in candidate_roots(ctx)? {
        log::debug!("Examining edges for candidate root '{}'", root);
        breadth_first(
            root,
            |table| ranked_children(ctx, table),
            |table| visit_order.add(table),
        )?;
    }

    for table in dgraph.parent_first_order() {
        if !visit_order.seen.contains(&table) {
            log::debug!("Added {} because no candidate root reaches it", table);
            visit_order.add(&table);
        }
    }

    Ok(visit_order.order)
}

/// Read-only tables small enough to replicate, smallest relative size first.
pub fn replication_candidates(ctx: &DesignerContext<'_>) -> DesignResult<Vec<TableKey>> {
    let limit = match ctx.hints.force_replication_size_limit {
        Some(limit) => limit,
        None => return Ok(vec![]),
    };
    if ctx.hints.max_memory_per_partition == 0 {
        log::warn!("Partition memory budget is zero, skipping forced replication");
        return Ok(vec![]);
    }

    // Negated so the descending comparator yields ascending size ratios.
    let mut weights = HashMap::new();
    for table in ctx.catalog.tables() {
        let stats = ctx.stats.get_table_statistics(table.key())?;
        let size_ratio = stats.tuple_size_total as f64 / ctx.hints.max_memory_per_partition as f64;
        if stats.readonly && size_ratio <= limit {
            log::debug!(
                "{} is read-only and only {:.2}% of total memory. Forcing replication...",
                table.key(),
                size_ratio * 100.0
            );
            weights.insert(table.key().clone(), -size_ratio);
        }
    }
    sort_by_weight(weights.keys().cloned(), &weights)
}

/// Tables to start the traversal from.
///
/// Explicit roots from the hints win. Otherwise every dependency graph root is used, the one
/// with the most access graph weight first.
pub fn candidate_roots(ctx: &DesignerContext<'_>) -> DesignResult<Vec<TableKey>> {
    if !ctx.hints.candidate_roots.is_empty() {
        for root in &ctx.hints.candidate_roots {
            if !ctx.dependency_graph.contains(root) {
                return Err(DesignerError::MissingVertex(root.to_string()));
            }
        }
        return Ok(ctx.hints.candidate_roots.clone());
    }

    let weights: HashMap<TableKey, f64> = ctx
        .dependency_graph
        .roots()
        .into_iter()
        .map(|root| {
            let weight = ctx.access_graph.incident_weight(&root);
            (root, weight)
        })
        .collect();
    sort_by_weight(weights.keys().cloned(), &weights)
}

/// Children of `table` in the dependency graph, ordered by the total weight of the access
/// graph edges between them and `table`.
fn ranked_children(ctx: &DesignerContext<'_>, table: &TableKey) -> DesignResult<Vec<TableKey>> {
    let weights: HashMap<TableKey, f64> = ctx
        .dependency_graph
        .successors(table)?
        .into_iter()
        .map(|child| {
            let weight: f64 = ctx
                .access_graph
                .edges_between(table, &child)
                .iter()
                .map(|e| e.total_weight())
                .sum();
            (child, weight)
        })
        .collect();

    let sorted = sort_by_weight(weights.keys().cloned(), &weights)?;
    if log::log_enabled!(log::Level::Trace) && !sorted.is_empty() {
        log::trace!("Children of {}:\n{}", table, weights_table(&sorted, &weights));
    }
    Ok(sorted)
}
