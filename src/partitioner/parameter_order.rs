use std::collections::HashMap;

use crate::catalog::{Attribute, CompositeRegistry, ParameterKey, ProcedureKey};
use crate::context::DesignerContext;
use crate::error::DesignResult;
use crate::partitioner::{geometric_mean, sort_by_weight};

/// Partitioning parameter candidates of one procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterOrder {
    /// Candidates in visiting order.
    pub candidates: Vec<Attribute<ParameterKey>>,
    /// Geometric mean score of every scored candidate. Empty on fallback.
    pub weights: HashMap<Attribute<ParameterKey>, f64>,
    /// No parameter correlated with any partitioning column, so every eligible parameter was
    /// returned unscored.
    pub fallback: bool,
}

/// Orders the parameters of `procedure` by how well they predict the partitioning columns of
/// the tables it touches.
///
/// Composite parameters already registered for the procedure take part when multi-attribute
/// partitioning is enabled; each of their bases contributes its coefficients divided by the
/// number of bases.
pub fn generate_parameter_order(
    ctx: &DesignerContext<'_>,
    procedure: &ProcedureKey,
    registry: &CompositeRegistry<ParameterKey>,
) -> DesignResult<ParameterOrder> {
    let hints = ctx.hints;
    let proc = ctx.catalog.get_procedure(procedure)?;

    let mut candidates: Vec<Attribute<ParameterKey>> = Vec::new();
    for key in proc.parameters() {
        let param = ctx.catalog.get_parameter(key)?;
        if param.is_array() && !hints.enable_array_procparameter_candidates {
            continue;
        }
        candidates.push(Attribute::Base(key.clone()));
    }
    if hints.enable_multi_partitioning {
        candidates.extend(
            registry
                .composites_matching(|c| c.bases().iter().all(|p| p.procedure() == procedure))
                .into_iter()
                .map(Attribute::Composite),
        );
    }

    let mut correlations: HashMap<&Attribute<ParameterKey>, Vec<f64>> = HashMap::new();
    for table_key in ctx.catalog.referenced_tables(proc)? {
        let table = ctx.catalog.get_table(&table_key)?;
        if table.is_replicated() {
            continue;
        }
        let column = match table.partition_column() {
            Some(column) => column,
            None => {
                log::trace!("{} has no partitioning column", table_key);
                continue;
            }
        };

        for candidate in &candidates {
            let coefficients = correlations.entry(candidate).or_default();
            match candidate {
                Attribute::Base(param) => {
                    coefficients.extend(ctx.correlations.coefficients(param, column));
                }
                Attribute::Composite(composite) => {
                    let size = composite.len() as f64;
                    for inner in composite.bases() {
                        coefficients.extend(
                            ctx.correlations
                                .coefficients(inner, column)
                                .into_iter()
                                .map(|c| c / size),
                        );
                    }
                }
            }
        }
    }

    let mut weights = HashMap::new();
    for (candidate, coefficients) in correlations {
        if let Some(mean) = geometric_mean(&coefficients, hints.geometric_mean_zero) {
            weights.insert(candidate.clone(), mean);
        }
    }

    if weights.is_empty() {
        log::warn!(
            "No parameter correlations found for {}. Returning all candidates!",
            procedure
        );
        return Ok(ParameterOrder {
            candidates,
            weights,
            fallback: true,
        });
    }

    let candidates = sort_by_weight(weights.keys().cloned(), &weights)?;
    log::debug!("Parameter order for {}: {:?}", procedure, candidates);
    Ok(ParameterOrder {
        candidates,
        weights,
        fallback: false,
    })
}
