//! Proximity graph construction
//!
//! - k-d tree: inclusive fixed-radius queries over structure locations
//! - Proximity graph: symmetric, reflexive "distance <= radius" adjacency

mod graph;
pub mod kdtree;

pub use graph::{validate_radius, AdjacencyEntry, ProximityGraph};
pub use kdtree::KdTree;
