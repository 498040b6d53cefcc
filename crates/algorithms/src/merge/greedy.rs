//! Greedy single-pass collapse of overlapping neighborhoods
//!
//! While some structure still has two or more active neighbors, one such
//! structure `b` is selected and every active neighbor of `b` is folded into
//! a group anchored at `b`. All rows touching the folded structures are
//! retired, so a structure shared by two neighborhoods belongs to whichever
//! is collapsed first. This is not a connected-components clustering.
//!
//! Every iteration removes at least one target from eligibility for good
//! (its bucket is either emptied or reduced to the anchor's own row), so at
//! most N iterations can happen for N structures.

use super::pool::{ActiveGroup, ActivePool, Collapse};
use super::SelectionOrder;
use crate::proximity::ProximityGraph;
use structura_core::{Error, Result};
use tracing::{debug, warn};

/// Run the greedy merger over `graph`, returning the terminal groups
/// ordered by anchor id.
pub fn greedy_merge(graph: &ProximityGraph, order: SelectionOrder) -> Result<Vec<ActiveGroup>> {
    let bound = graph.len();
    let mut pool = ActivePool::from_graph(graph);
    let mut iterations = 0usize;

    while let Some(target) = pool.select(order) {
        iterations += 1;
        if iterations > bound {
            return Err(Error::InternalInvariant(format!(
                "merge loop exceeded {} iterations with {} rows still active",
                bound,
                pool.row_count()
            )));
        }

        let rows_before = pool.row_count();
        match pool.collapse(target) {
            Collapse::Merged { anchor, size } => {
                debug!("Merged {} structures onto anchor {}", size, anchor);
            }
            Collapse::Retired { target, rows } => {
                warn!(
                    "Anchor {} already consumed; retired {} rows without grouping",
                    target, rows
                );
            }
        }

        if pool.row_count() >= rows_before {
            return Err(Error::InternalInvariant(format!(
                "collapsing target {} did not shrink the pool ({} rows)",
                target, rows_before
            )));
        }
    }

    let (groups, dangling) = pool.into_groups();
    if !dangling.is_empty() {
        return Err(Error::InternalInvariant(format!(
            "{} targets still hold off-diagonal rows after merging (first: {})",
            dangling.len(),
            dangling[0]
        )));
    }

    debug!(
        "Greedy merge ({}) finished after {} iterations: {} groups",
        order,
        iterations,
        groups.len()
    );
    Ok(groups)
}
