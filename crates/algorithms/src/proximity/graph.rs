//! Symmetric proximity graph over a structure set

use super::kdtree::KdTree;
use crate::maybe_rayon::*;
use structura_core::{Error, Result, Structure};
use tracing::debug;

/// One `(point, neighbor)` pair with `distance(point, neighbor) <= radius`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdjacencyEntry {
    pub point_id: usize,
    pub neighbor_id: usize,
}

/// Neighbor sets for every structure, including the structure itself.
///
/// `q ∈ neighbors(p) ⟺ p ∈ neighbors(q)` holds because both directions are
/// decided by the same squared distance against the same radius.
#[derive(Debug, Clone)]
pub struct ProximityGraph {
    /// Sorted neighbor ids per structure id
    neighbors: Vec<Vec<usize>>,
    radius: f64,
}

/// Check that a merge radius is finite and non-negative.
pub fn validate_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

impl ProximityGraph {
    /// Build the graph for `structures` at `radius`.
    ///
    /// Fails fast on an invalid radius or on any non-finite coordinate.
    /// Structure ids must equal their slice positions.
    pub fn build(structures: &[Structure], radius: f64) -> Result<Self> {
        validate_radius(radius)?;

        for (pos, s) in structures.iter().enumerate() {
            if s.id != pos {
                return Err(Error::InternalInvariant(format!(
                    "structure at position {} carries id {}",
                    pos, s.id
                )));
            }
            if !s.has_finite_location() {
                return Err(Error::NonFiniteCoordinate {
                    id: s.id,
                    x: s.x(),
                    y: s.y(),
                });
            }
        }

        let tree = KdTree::build(structures);
        let neighbors: Vec<Vec<usize>> = (0..structures.len())
            .into_par_iter()
            .map(|id| {
                let s = &structures[id];
                let mut ids = tree.within_radius(s.x(), s.y(), radius);
                ids.sort_unstable();
                ids
            })
            .collect();

        let graph = Self { neighbors, radius };
        debug!(
            "Proximity graph: {} structures, {} pairs within {}",
            graph.len(),
            graph.pair_count(),
            radius
        );
        Ok(graph)
    }

    /// Number of structures (vertices)
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sorted neighbor ids of `id`, `id` itself included
    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.neighbors[id]
    }

    /// Size of the neighbor set, self included
    pub fn degree(&self, id: usize) -> usize {
        self.neighbors[id].len()
    }

    pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
        self.neighbors
            .get(a)
            .is_some_and(|n| n.binary_search(&b).is_ok())
    }

    /// Number of unordered pairs of distinct structures within the radius
    pub fn pair_count(&self) -> usize {
        let directed: usize = self.neighbors.iter().map(|n| n.len() - 1).sum();
        directed / 2
    }

    /// Every adjacency entry, ordered by `(point_id, neighbor_id)`
    pub fn entries(&self) -> impl Iterator<Item = AdjacencyEntry> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(point_id, ns)| {
            ns.iter().map(move |&neighbor_id| AdjacencyEntry {
                point_id,
                neighbor_id,
            })
        })
    }

    /// Whether the neighbor relation is symmetric and reflexive
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().enumerate().all(|(p, ns)| {
            ns.binary_search(&p).is_ok() && ns.iter().all(|&q| self.are_neighbors(q, p))
        })
    }
}
