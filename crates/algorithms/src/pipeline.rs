//! Structure merging pipeline
//!
//! Proximity graph → merger → aggregation, with a conservation check on
//! the way out.

use crate::aggregate::{finalize, verify_partition, MergeSummary};
use crate::merge::{connected_components, greedy_merge, MergeStrategy, SelectionOrder};
use crate::proximity::{validate_radius, ProximityGraph};
use structura_core::{Algorithm, ClusterRecord, Error, Result, Structure, StructureSet};
use tracing::info;

/// Parameters for merging structures
#[derive(Debug, Clone)]
pub struct MergeParams {
    /// Merge radius in the linear unit of the input frame (default 20)
    pub radius: f64,
    /// Which eligible structure the greedy merger collapses next
    pub order: SelectionOrder,
    /// Greedy star clusters or full connected components
    pub strategy: MergeStrategy,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            radius: 20.0,
            order: SelectionOrder::SparsestFirst,
            strategy: MergeStrategy::Greedy,
        }
    }
}

impl MergeParams {
    /// Parameters with the given radius and default order/strategy
    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_radius(self.radius)
    }
}

/// Records produced by one run, plus its summary
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub records: Vec<ClusterRecord>,
    pub summary: MergeSummary,
}

/// Structure merging algorithm
#[derive(Debug, Clone, Default)]
pub struct StructureMerge;

impl Algorithm for StructureMerge {
    type Input = StructureSet;
    type Output = MergeOutcome;
    type Params = MergeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Structure merge"
    }

    fn description(&self) -> &'static str {
        "Collapse structures within a fixed radius of one another into cluster records with summed area"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        merge_structures(input.structures(), params)
    }
}

/// Merge structures lying within `params.radius` of one another.
///
/// # Arguments
/// * `structures` - Input points; ids must equal slice positions
/// * `params` - Radius, selection order and strategy
///
/// # Returns
/// One record per final group, ordered by representative id. Every input
/// structure appears in exactly one record.
pub fn merge_structures(structures: &[Structure], params: MergeParams) -> Result<MergeOutcome> {
    params.validate()?;

    let graph = ProximityGraph::build(structures, params.radius)?;
    let groups = match params.strategy {
        MergeStrategy::Greedy => greedy_merge(&graph, params.order)?,
        MergeStrategy::Components => connected_components(&graph),
    };

    let records = finalize(groups, structures)?;
    verify_partition(&records, structures.len())?;

    let summary = MergeSummary::new(structures, &records);
    info!("Merged at radius {} ({}): {}", graph.radius(), params.strategy, summary);

    Ok(MergeOutcome { records, summary })
}
