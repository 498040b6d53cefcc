//! Active pool of adjacency rows for the greedy merger
//!
//! A row `(origin, target)` says "origin is still active and lies within the
//! radius of target". Each origin carries one [`ActiveGroup`]: the original
//! structure, or the group it anchors after a merge. Rows are indexed both
//! ways so a merge can retire everything touching its members.

use std::collections::{BTreeMap, BTreeSet};

use super::SelectionOrder;
use crate::proximity::ProximityGraph;

/// A structure or merged group that is still part of the working set
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGroup {
    /// Original id the group is keyed under (its anchor)
    pub anchor: usize,
    /// Original ids collapsed into this group, ascending
    pub members: Vec<usize>,
}

impl ActiveGroup {
    fn single(id: usize) -> Self {
        Self {
            anchor: id,
            members: vec![id],
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Outcome of collapsing one target's rows
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Collapse {
    /// A new group was anchored at the target
    Merged { anchor: usize, size: usize },
    /// The target's own row was gone; its rows were retired without a group
    Retired { target: usize, rows: usize },
}

#[derive(Debug, Default)]
pub(crate) struct ActivePool {
    /// target -> origins with an active row into it
    by_target: BTreeMap<usize, BTreeSet<usize>>,
    /// origin -> targets it still has rows into
    by_origin: BTreeMap<usize, BTreeSet<usize>>,
    /// `(row count, target)` for every target holding two or more rows
    eligible: BTreeSet<(usize, usize)>,
    /// Group carried by each active origin
    groups: BTreeMap<usize, ActiveGroup>,
    rows: usize,
}

impl ActivePool {
    /// One row per adjacency entry, one singleton group per structure.
    pub fn from_graph(graph: &ProximityGraph) -> Self {
        let mut pool = Self::default();
        for entry in graph.entries() {
            pool.insert_row(entry.point_id, entry.neighbor_id);
        }
        for id in 0..graph.len() {
            pool.groups.insert(id, ActiveGroup::single(id));
        }
        pool
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Pick the next target with two or more active rows, if any.
    pub fn select(&self, order: SelectionOrder) -> Option<usize> {
        match order {
            SelectionOrder::SparsestFirst => self.eligible.first().map(|&(_, target)| target),
            SelectionOrder::DensestFirst => {
                let &(max, _) = self.eligible.last()?;
                self.eligible
                    .range((max, 0)..)
                    .next()
                    .map(|&(_, target)| target)
            }
        }
    }

    /// Collapse every active row pointing into `target`.
    ///
    /// If the target's own row `(target, target)` is still present, all
    /// origins in its bucket form one group anchored at `target`, and every
    /// row touching any of them is retired before the anchor row is put
    /// back. Otherwise only the bucket's rows are retired.
    pub fn collapse(&mut self, target: usize) -> Collapse {
        let bucket: Vec<usize> = match self.by_target.get(&target) {
            Some(origins) => origins.iter().copied().collect(),
            None => return Collapse::Retired { target, rows: 0 },
        };

        if !bucket.contains(&target) {
            for &origin in &bucket {
                self.remove_row(origin, target);
            }
            return Collapse::Retired {
                target,
                rows: bucket.len(),
            };
        }

        let mut members: Vec<usize> = bucket
            .iter()
            .filter_map(|origin| self.groups.remove(origin))
            .flat_map(|group| group.members)
            .collect();
        members.sort_unstable();

        for &id in &bucket {
            self.retire_all(id);
        }

        let size = members.len();
        self.insert_row(target, target);
        self.groups.insert(
            target,
            ActiveGroup {
                anchor: target,
                members,
            },
        );

        Collapse::Merged {
            anchor: target,
            size,
        }
    }

    /// Consume the pool, returning the groups that survive on a self row.
    ///
    /// Any remaining off-diagonal row means the loop stopped early; those
    /// targets are returned as the second element.
    pub fn into_groups(mut self) -> (Vec<ActiveGroup>, Vec<usize>) {
        let mut dangling = Vec::new();
        let mut survivors = Vec::with_capacity(self.by_target.len());

        for (&target, origins) in &self.by_target {
            if origins.len() != 1 || !origins.contains(&target) {
                dangling.push(target);
                continue;
            }
            if let Some(group) = self.groups.remove(&target) {
                survivors.push(group);
            }
        }

        (survivors, dangling)
    }

    /// Retire every row with `id` as origin or as target.
    fn retire_all(&mut self, id: usize) {
        if let Some(targets) = self.by_origin.get(&id).cloned() {
            for t in targets {
                self.remove_row(id, t);
            }
        }
        if let Some(origins) = self.by_target.get(&id).cloned() {
            for o in origins {
                self.remove_row(o, id);
            }
        }
        self.groups.remove(&id);
    }

    fn insert_row(&mut self, origin: usize, target: usize) {
        let bucket = self.by_target.entry(target).or_default();
        let before = bucket.len();
        if !bucket.insert(origin) {
            return;
        }
        let after = bucket.len();
        self.by_origin.entry(origin).or_default().insert(target);
        self.rows += 1;
        self.reindex(target, before, after);
    }

    fn remove_row(&mut self, origin: usize, target: usize) {
        let Some(bucket) = self.by_target.get_mut(&target) else {
            return;
        };
        let before = bucket.len();
        if !bucket.remove(&origin) {
            return;
        }
        let after = bucket.len();
        if after == 0 {
            self.by_target.remove(&target);
        }
        if let Some(targets) = self.by_origin.get_mut(&origin) {
            targets.remove(&target);
            if targets.is_empty() {
                self.by_origin.remove(&origin);
            }
        }
        self.rows -= 1;
        self.reindex(target, before, after);
    }

    fn reindex(&mut self, target: usize, before: usize, after: usize) {
        if before >= 2 {
            self.eligible.remove(&(before, target));
        }
        if after >= 2 {
            self.eligible.insert((after, target));
        }
    }
}
