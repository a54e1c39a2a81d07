//! Visit orders and candidate sets for the partitioning search.
//!
//! The search assigns a partitioning parameter to every procedure and a partitioning column (or
//! replication) to every table. It prunes best when it tries good choices first, so each
//! function here ranks one dimension of the search space by workload evidence:
//!
//! * [`generate_procedure_order`]: procedures by invocation count.
//! * [`generate_parameter_order`]: parameters of one procedure by correlation to the
//!   partitioning columns of the tables it touches.
//! * [`generate_table_order`]: tables by replication size, then a weighted breadth first walk
//!   of the foreign key graph.
//! * [`generate_column_order`]: columns of one table by access weight and foreign key fan-out.
//!
//! Two generators add candidates that are not in the catalog: composite keys
//! ([`generate_composite_candidates`]) and vertical partitions
//! ([`generate_vertical_partitioning_candidates`]).

mod comparator;
pub use comparator::*;
mod math;
pub use math::*;
mod procedure_order;
pub use procedure_order::*;
mod parameter_order;
pub use parameter_order::*;
mod column_order;
pub use column_order::*;
mod table_order;
pub use table_order::*;
mod multi_attribute;
pub use multi_attribute::*;
mod vertical;
pub use vertical::*;

use std::collections::BTreeMap;

use crate::catalog::{CompositeRegistry, ParameterKey, ProcedureKey, TableKey};
use crate::context::DesignerContext;
use crate::error::DesignResult;

/// Every visit order the search needs for one design step.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOrderings {
    pub procedures: Vec<ProcedureKey>,
    pub parameters: BTreeMap<ProcedureKey, ParameterOrder>,
    pub tables: Vec<TableKey>,
    pub columns: BTreeMap<TableKey, Vec<PartitionCandidate>>,
}

/// Builds all visit orders from one snapshot.
///
/// With multi-attribute partitioning enabled, composite parameters of every visited procedure
/// are registered first so that they compete with the single parameters.
pub fn generate_search_orderings(
    ctx: &DesignerContext<'_>,
    registry: &CompositeRegistry<ParameterKey>,
) -> DesignResult<SearchOrderings> {
    let procedures = generate_procedure_order(ctx)?;

    let mut parameters = BTreeMap::new();
    for procedure in &procedures {
        if ctx.hints.enable_multi_partitioning {
            generate_multi_parameter_candidates(ctx, procedure, registry)?;
        }
        let order = generate_parameter_order(ctx, procedure, registry)?;
        parameters.insert(procedure.clone(), order);
    }

    let tables = generate_table_order(ctx)?;
    let mut columns = BTreeMap::new();
    for table in &tables {
        let order = generate_column_order(ctx, table, ReplicationPlacement::Auto)?;
        columns.insert(table.clone(), order);
    }

    Ok(SearchOrderings {
        procedures,
        parameters,
        tables,
        columns,
    })
}
