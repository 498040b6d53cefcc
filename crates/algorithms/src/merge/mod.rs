//! Cluster merging
//!
//! Collapses the proximity graph into disjoint groups of structures.
//!
//! - Greedy: repeatedly picks a structure with two or more active
//!   neighbors and collapses its whole neighborhood onto it (default)
//! - Components: merges full connected components (opt-in, changes results
//!   whenever neighborhoods overlap)

mod components;
mod greedy;
mod pool;

pub use components::connected_components;
pub use greedy::greedy_merge;
pub use pool::ActiveGroup;

use std::fmt;

/// Which eligible structure the greedy merger collapses next.
///
/// The choice decides the outcome whenever neighborhoods overlap: on a
/// chain A–B–C where only adjacent pairs are within the radius, picking A
/// (or C) yields `{A,B} + {C}` (or `{B,C} + {A}`), while picking B swallows
/// all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionOrder {
    /// Fewest active neighbors first, ties by lowest id
    #[default]
    SparsestFirst,
    /// Most active neighbors first, ties by lowest id.
    ///
    /// Reproduces the frequency order of the original pipeline. On the
    /// A–B–C chain it picks B and merges all three into one record.
    DensestFirst,
}

impl fmt::Display for SelectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionOrder::SparsestFirst => f.write_str("sparsest-first"),
            SelectionOrder::DensestFirst => f.write_str("densest-first"),
        }
    }
}

/// How groups are formed from the proximity graph.
///
/// Only `Components` guarantees that a larger radius never yields more
/// records. Greedy star clusters can split further when a new edge changes
/// which target is collapsed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Radius-limited star clusters around greedily chosen anchors
    #[default]
    Greedy,
    /// Transitively connected components; anchor is the lowest id
    Components,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Greedy => f.write_str("greedy"),
            MergeStrategy::Components => f.write_str("components"),
        }
    }
}
