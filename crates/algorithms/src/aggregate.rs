//! Aggregation of merged groups into output records
//!
//! Groups with more than one member sum the areas of their members; a
//! singleton keeps its own area untouched. Location and region always come
//! from the anchor, never from a centroid.

use crate::merge::ActiveGroup;
use std::fmt;
use structura_core::{ClusterRecord, Error, Result, Structure};

/// Convert terminal groups into cluster records, ordered by representative id.
pub fn finalize(groups: Vec<ActiveGroup>, structures: &[Structure]) -> Result<Vec<ClusterRecord>> {
    let mut records = groups
        .into_iter()
        .map(|group| {
            let anchor = structures.get(group.anchor).ok_or_else(|| {
                Error::InternalInvariant(format!("anchor {} is not a known structure", group.anchor))
            })?;
            if !group.members.contains(&group.anchor) {
                return Err(Error::InternalInvariant(format!(
                    "anchor {} is not a member of its own group",
                    group.anchor
                )));
            }

            let aggregated_area = if group.members.len() > 1 {
                member_area(structures, &group.members)?
            } else {
                anchor.area
            };

            Ok(ClusterRecord {
                representative_id: anchor.id,
                member_count: group.members.len(),
                aggregated_area,
                region: anchor.region.clone(),
                location: anchor.location,
                members: group.members,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    records.sort_by_key(|r| r.representative_id);
    Ok(records)
}

/// Area sum over `members`, accumulated in the order given
fn member_area(structures: &[Structure], members: &[usize]) -> Result<f64> {
    members.iter().try_fold(0.0, |acc, &id| {
        structures
            .get(id)
            .map(|s| acc + s.area)
            .ok_or_else(|| Error::InternalInvariant(format!("member {} is not a known structure", id)))
    })
}

/// Check that `records` partition ids `0..n`: every id exactly once and
/// `sum(member_count) == n`.
pub fn verify_partition(records: &[ClusterRecord], n: usize) -> Result<()> {
    let total: usize = records.iter().map(|r| r.member_count).sum();
    if total != n {
        return Err(Error::InternalInvariant(format!(
            "member counts sum to {} but {} structures were merged",
            total, n
        )));
    }

    let mut seen = vec![false; n];
    for record in records {
        if record.members.len() != record.member_count {
            return Err(Error::InternalInvariant(format!(
                "record {} lists {} members but counts {}",
                record.representative_id,
                record.members.len(),
                record.member_count
            )));
        }
        for &id in &record.members {
            match seen.get_mut(id) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(Error::InternalInvariant(format!(
                        "structure {} appears in more than one record",
                        id
                    )))
                }
                None => {
                    return Err(Error::InternalInvariant(format!(
                        "record {} lists unknown structure {}",
                        record.representative_id, id
                    )))
                }
            }
        }
    }
    Ok(())
}

/// Before/after figures for one merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub input_count: usize,
    pub output_count: usize,
    /// Records holding more than one structure
    pub merged_records: usize,
    /// Member count of the largest record
    pub largest_cluster: usize,
    pub input_area: f64,
    pub output_area: f64,
}

impl MergeSummary {
    pub fn new(structures: &[Structure], records: &[ClusterRecord]) -> Self {
        Self {
            input_count: structures.len(),
            output_count: records.len(),
            merged_records: records.iter().filter(|r| !r.is_singleton()).count(),
            largest_cluster: records.iter().map(|r| r.member_count).max().unwrap_or(0),
            input_area: structures.iter().map(|s| s.area).sum(),
            output_area: records.iter().map(|r| r.aggregated_area).sum(),
        }
    }

    /// Structures absorbed into another record's anchor
    pub fn absorbed(&self) -> usize {
        self.input_count - self.output_count
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} structures -> {} records ({} merged, largest {}), area {:.2} -> {:.2}",
            self.input_count,
            self.output_count,
            self.merged_records,
            self.largest_cluster,
            self.input_area,
            self.output_area
        )
    }
}
