//! Connected-components clustering
//!
//! Every structure reachable through a chain of hops, each within the
//! radius, lands in the same group. The lowest id of a component is its
//! anchor. Produces fewer, larger groups than the greedy merger whenever
//! neighborhoods overlap.

use super::pool::ActiveGroup;
use crate::proximity::ProximityGraph;
use std::collections::BTreeMap;

/// Disjoint-set forest where the smaller id always becomes the root.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union_keep_min(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (min, max) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[max] = min;
        }
    }
}

/// Group structures by connected component of `graph`, ordered by anchor id.
pub fn connected_components(graph: &ProximityGraph) -> Vec<ActiveGroup> {
    let mut uf = UnionFind::new(graph.len());
    for entry in graph.entries() {
        if entry.point_id < entry.neighbor_id {
            uf.union_keep_min(entry.point_id, entry.neighbor_id);
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for id in 0..graph.len() {
        let root = uf.find(id);
        components.entry(root).or_default().push(id);
    }

    components
        .into_iter()
        .map(|(anchor, members)| ActiveGroup { anchor, members })
        .collect()
}
