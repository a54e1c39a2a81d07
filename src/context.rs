use crate::catalog::Catalog;
use crate::correlation::CorrelationModel;
use crate::graph::{AccessGraph, DependencyGraph};
use crate::hints::DesignerHints;
use crate::stat::StatisticsStore;
use crate::workload::WorkloadSummary;

/// Snapshot of everything the ordering functions read.
///
/// All members are borrowed and treated as immutable for the duration of a call. The context
/// is cheap to copy, so independent search branches can each hold one.
#[derive(Clone, Copy)]
pub struct DesignerContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub stats: &'a dyn StatisticsStore,
    pub workload: &'a WorkloadSummary,
    pub correlations: &'a dyn CorrelationModel,
    pub access_graph: &'a AccessGraph,
    pub dependency_graph: &'a DependencyGraph,
    pub hints: &'a DesignerHints,
}
