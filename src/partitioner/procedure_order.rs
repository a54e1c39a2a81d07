use std::collections::HashMap;

use crate::catalog::{Procedure, ProcedureKey};
use crate::context::DesignerContext;
use crate::error::DesignResult;
use crate::hints::DesignerHints;
use crate::partitioner::sort_by_weight;

/// A procedure can be routed by a parameter only if it is a user procedure with parameters.
pub fn is_partitionable(procedure: &Procedure) -> bool {
    !procedure.is_system() && !procedure.parameters().is_empty()
}

/// Whether the procedure should be left out of every calculation.
pub fn should_ignore_procedure(hints: Option<&DesignerHints>, procedure: &Procedure) -> bool {
    !is_partitionable(procedure)
        || hints
            .map(|h| h.should_ignore_procedure(procedure))
            .unwrap_or(false)
}

/// Procedures to visit, most frequently invoked first.
///
/// System procedures, procedures ignored by the hints and procedures the workload never
/// invoked are left out entirely.
pub fn generate_procedure_order(ctx: &DesignerContext<'_>) -> DesignResult<Vec<ProcedureKey>> {
    log::debug!("Generating procedure visit order");
    let histogram = &ctx.workload.procedures;

    let mut weights = HashMap::new();
    for procedure in ctx.catalog.procedures() {
        if procedure.is_system() || ctx.hints.should_ignore_procedure(procedure) {
            continue;
        }
        match histogram.get(procedure.key()) {
            Some(count) if count > 0 => {
                weights.insert(procedure.key().clone(), count as f64);
            }
            _ => log::trace!("Skipping {}: not in workload", procedure.key()),
        }
    }

    let order = sort_by_weight(weights.keys().cloned(), &weights)?;
    log::debug!("Procedure visit order: {:?}", order);
    Ok(order)
}
