//! # Structura Algorithms
//!
//! Proximity clustering of point structures.
//!
//! ## Stages
//!
//! - **proximity**: k-d tree and symmetric "distance <= radius" graph
//! - **merge**: greedy collapse of overlapping neighborhoods (or, opt-in,
//!   connected components)
//! - **aggregate**: one record per group with summed area, anchored at a
//!   member's location
//!
//! [`merge_structures`] chains all three.

pub mod aggregate;
pub(crate) mod maybe_rayon;
pub mod merge;
pub mod pipeline;
pub mod proximity;

pub use aggregate::MergeSummary;
pub use merge::{MergeStrategy, SelectionOrder};
pub use pipeline::{merge_structures, MergeOutcome, MergeParams, StructureMerge};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregate::{finalize, verify_partition, MergeSummary};
    pub use crate::merge::{connected_components, greedy_merge, ActiveGroup, MergeStrategy, SelectionOrder};
    pub use crate::pipeline::{merge_structures, MergeOutcome, MergeParams, StructureMerge};
    pub use crate::proximity::{AdjacencyEntry, KdTree, ProximityGraph};
    pub use structura_core::prelude::*;
}
