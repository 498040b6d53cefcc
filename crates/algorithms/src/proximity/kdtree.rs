//! 2D k-d tree over structure locations
//!
//! Answers inclusive fixed-radius queries (`distance <= radius`) so the
//! proximity graph does not need an all-pairs scan.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use structura_core::Structure;

/// A 2D k-d tree indexing structures by location.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    /// `(x, y)` per structure id
    coords: Vec<(f64, f64)>,
}

#[derive(Debug)]
struct KdNode {
    /// Structure id stored at this node
    id: usize,
    /// Split dimension: 0 = x, 1 = y
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

impl KdTree {
    /// Build a tree from structures; ids are their positions in the slice.
    ///
    /// Construction is O(n log² n) using median splits.
    pub fn build(structures: &[Structure]) -> Self {
        let coords: Vec<(f64, f64)> = structures.iter().map(|s| (s.x(), s.y())).collect();
        let mut nodes = Vec::with_capacity(coords.len());

        if !coords.is_empty() {
            let mut ids: Vec<usize> = (0..coords.len()).collect();
            build_recursive(&coords, &mut ids, 0, &mut nodes);
        }

        Self { nodes, coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Ids of all structures with `distance((qx, qy), s) <= radius`.
    ///
    /// A zero radius still returns structures at exactly `(qx, qy)`.
    /// Results come back in tree order; callers sort if they need to.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<usize> {
        if self.nodes.is_empty() || radius < 0.0 {
            return Vec::new();
        }

        let mut results = Vec::new();
        self.radius_recursive(0, qx, qy, radius * radius, &mut results);
        results
    }

    fn radius_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        radius_sq: f64,
        results: &mut Vec<usize>,
    ) {
        let node = &self.nodes[node_idx];
        let (px, py) = self.coords[node.id];

        let dx = px - qx;
        let dy = py - qy;
        if dx * dx + dy * dy <= radius_sq {
            results.push(node.id);
        }

        // Signed offset of the query from the splitting plane
        let diff = if node.split_dim == 0 { qx - px } else { qy - py };

        if let Some(left) = node.left {
            if diff <= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(left, qx, qy, radius_sq, results);
            }
        }
        if let Some(right) = node.right {
            if diff >= 0.0 || diff * diff <= radius_sq {
                self.radius_recursive(right, qx, qy, radius_sq, results);
            }
        }
    }
}

fn build_recursive(
    coords: &[(f64, f64)],
    ids: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let split_dim = (depth % 2) as u8;
    let key = |id: usize| if split_dim == 0 { coords[id].0 } else { coords[id].1 };

    ids.sort_by(|&a, &b| key(a).total_cmp(&key(b)));

    let median = ids.len() / 2;
    let node_idx = nodes.len();
    nodes.push(KdNode {
        id: ids[median],
        split_dim,
        left: None,
        right: None,
    });

    let (lower, rest) = ids.split_at_mut(median);
    let upper = &mut rest[1..];

    if !lower.is_empty() {
        let left = build_recursive(coords, lower, depth + 1, nodes);
        nodes[node_idx].left = Some(left);
    }
    if !upper.is_empty() {
        let right = build_recursive(coords, upper, depth + 1, nodes);
        nodes[node_idx].right = Some(right);
    }

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Structure> {
        [
            (2.0, 3.0),
            (5.0, 4.0),
            (9.0, 6.0),
            (4.0, 7.0),
            (8.0, 1.0),
            (7.0, 2.0),
            (1.0, 8.0),
            (6.0, 5.0),
        ]
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| Structure::new(id, x, y, 1.0))
        .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.within_radius(0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_within_radius_matches_brute_force() {
        let pts = sample();
        let tree = KdTree::build(&pts);
        assert_eq!(tree.len(), 8);

        for qx in 0..10 {
            for qy in 0..10 {
                let (qx, qy) = (qx as f64 + 0.5, qy as f64 + 0.5);
                for radius in [0.5, 1.5, 2.0, 3.7, 20.0] {
                    let mut got = tree.within_radius(qx, qy, radius);
                    got.sort_unstable();
                    let expected: Vec<usize> = pts
                        .iter()
                        .filter(|s| {
                            let dx = s.x() - qx;
                            let dy = s.y() - qy;
                            dx * dx + dy * dy <= radius * radius
                        })
                        .map(|s| s.id)
                        .collect();
                    assert_eq!(got, expected, "query ({qx}, {qy}) r={radius}");
                }
            }
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let pts = vec![Structure::new(0, 0.0, 0.0, 1.0), Structure::new(1, 3.0, 4.0, 1.0)];
        let tree = KdTree::build(&pts);
        let mut hits = tree.within_radius(0.0, 0.0, 5.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_zero_radius_finds_coincident_points() {
        let pts = vec![
            Structure::new(0, 1.0, 1.0, 1.0),
            Structure::new(1, 1.0, 1.0, 1.0),
            Structure::new(2, 1.0, 1.5, 1.0),
        ];
        let tree = KdTree::build(&pts);
        let mut hits = tree.within_radius(1.0, 1.0, 0.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_duplicates_on_split_axis() {
        // Many points sharing an x value straddle the median split.
        let pts: Vec<Structure> = (0..9)
            .map(|i| Structure::new(i, 5.0, i as f64, 1.0))
            .collect();
        let tree = KdTree::build(&pts);
        let mut hits = tree.within_radius(5.0, 4.0, 1.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![3, 4, 5]);
    }
}
