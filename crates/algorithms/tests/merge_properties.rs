//! Behavioral properties of the merge pipeline on synthetic layouts.
//!
//! Layouts are generated from a fixed-seed LCG so every run sees the same
//! points.

use structura_algorithms::{merge_structures, MergeParams, MergeStrategy, SelectionOrder};
use structura_core::{ClusterRecord, Structure, StructureSet};

/// Deterministic scattered layout: `n` points in a `span` x `span` square.
fn scattered(n: usize, span: f64, seed: u64) -> Vec<Structure> {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|id| {
            let x = next() * span;
            let y = next() * span;
            let area = 5.0 + next() * 95.0;
            Structure::new(id, x, y, area)
        })
        .collect()
}

fn run(structures: &[Structure], radius: f64) -> Vec<ClusterRecord> {
    merge_structures(structures, MergeParams::with_radius(radius))
        .expect("merge failed")
        .records
}

fn member_total(records: &[ClusterRecord]) -> usize {
    records.iter().map(|r| r.member_count).sum()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn pair_merges_and_far_point_stays_single() {
    let set = StructureSet::from_points([(0.0, 0.0, 10.0), (5.0, 0.0, 10.0), (100.0, 0.0, 10.0)]);
    let records = run(set.structures(), 10.0);

    assert_eq!(records.len(), 2);
    assert_eq!(member_total(&records), 3);

    let pair = records.iter().find(|r| r.member_count == 2).unwrap();
    assert_eq!(pair.aggregated_area, 20.0);
    assert!(pair.location.x == 0.0 || pair.location.x == 5.0);
    assert_eq!(pair.location.y, 0.0);

    let single = records.iter().find(|r| r.member_count == 1).unwrap();
    assert_eq!(single.aggregated_area, 10.0);
    assert_eq!(single.location.x, 100.0);
}

/// A–B = 8, B–C = 8, A–C = 16, radius 10: the middle point joins exactly one
/// end, the other end stays alone.
fn assert_chain_outcome(records: &[ClusterRecord], a: usize, b: usize, c: usize) {
    assert_eq!(records.len(), 2, "chain must not collapse into one record");
    let pair = records.iter().find(|r| r.member_count == 2).unwrap();
    let single = records.iter().find(|r| r.member_count == 1).unwrap();

    assert!(pair.members.contains(&b), "middle point must be merged");
    let valid = (pair.members == sorted(&[a, b]) && single.members == vec![c])
        || (pair.members == sorted(&[b, c]) && single.members == vec![a]);
    assert!(valid, "unexpected partition: {:?} + {:?}", pair.members, single.members);
}

fn sorted(ids: &[usize]) -> Vec<usize> {
    let mut v = ids.to_vec();
    v.sort_unstable();
    v
}

#[test]
fn chain_splits_into_pair_and_single() {
    let set = StructureSet::from_points([(0.0, 0.0, 1.0), (8.0, 0.0, 1.0), (16.0, 0.0, 1.0)]);
    assert_chain_outcome(&run(set.structures(), 10.0), 0, 1, 2);
}

#[test]
fn chain_outcome_does_not_depend_on_middle_point_id() {
    // Middle point loaded first
    let set = StructureSet::from_points([(8.0, 0.0, 1.0), (0.0, 0.0, 1.0), (16.0, 0.0, 1.0)]);
    assert_chain_outcome(&run(set.structures(), 10.0), 1, 0, 2);

    // Middle point loaded last
    let set = StructureSet::from_points([(16.0, 0.0, 1.0), (0.0, 0.0, 1.0), (8.0, 0.0, 1.0)]);
    assert_chain_outcome(&run(set.structures(), 10.0), 1, 2, 0);
}

#[test]
fn densest_first_is_a_different_contract() {
    let set = StructureSet::from_points([(0.0, 0.0, 1.0), (8.0, 0.0, 1.0), (16.0, 0.0, 1.0)]);
    let params = MergeParams {
        radius: 10.0,
        order: SelectionOrder::DensestFirst,
        ..MergeParams::default()
    };
    let records = merge_structures(set.structures(), params).unwrap().records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].representative_id, 1);
}

#[test]
fn overlapping_neighborhoods_are_not_connected_components() {
    // Five points 8 apart on a line at radius 10: components would give one
    // record, the greedy merger must not.
    let pts: Vec<(f64, f64, f64)> = (0..5).map(|i| (i as f64 * 8.0, 0.0, 1.0)).collect();
    let set = StructureSet::from_points(pts);

    let greedy = run(set.structures(), 10.0);
    assert!(greedy.len() > 1);
    assert_eq!(member_total(&greedy), 5);

    let params = MergeParams {
        radius: 10.0,
        strategy: MergeStrategy::Components,
        ..MergeParams::default()
    };
    let components = merge_structures(set.structures(), params).unwrap().records;
    assert_eq!(components.len(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn conservation_across_radii() {
    let structures = scattered(400, 500.0, 42);
    for radius in [0.0, 1.0, 5.0, 10.0, 20.0, 40.0, 80.0, 1000.0] {
        let records = run(&structures, radius);
        assert_eq!(member_total(&records), structures.len(), "radius {radius}");

        let mut ids: Vec<usize> = records.iter().flat_map(|r| r.members.iter().copied()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..structures.len()).collect::<Vec<_>>(), "radius {radius}");
        assert!(records.len() <= structures.len());
    }
}

#[test]
fn area_conservation_per_cluster() {
    let structures = scattered(300, 300.0, 7);
    let records = run(&structures, 20.0);

    for r in &records {
        let expected: f64 = r.members.iter().map(|&id| structures[id].area).sum();
        assert_eq!(r.aggregated_area, expected, "record {}", r.representative_id);
        assert!(r.aggregated_area >= 0.0);
        if r.is_singleton() {
            assert_eq!(r.aggregated_area, structures[r.representative_id].area);
        }
    }
}

#[test]
fn members_lie_within_radius_of_their_representative() {
    let structures = scattered(300, 250.0, 99);
    let radius = 15.0;
    for r in run(&structures, radius) {
        let anchor = &structures[r.representative_id];
        assert!(r.members.contains(&anchor.id));
        assert_eq!(r.location, anchor.location);
        assert_eq!(r.region, anchor.region);
        for &id in &r.members {
            assert!(structures[id].dist(anchor) <= radius);
        }
    }
}

#[test]
fn well_separated_points_stay_singletons() {
    let radius = 20.0;
    let structures: Vec<Structure> = (0..36)
        .map(|i| {
            let (row, col) = (i / 6, i % 6);
            Structure::new(i, col as f64 * 2.0 * radius, row as f64 * 2.0 * radius, 3.0 + i as f64)
        })
        .collect();

    let records = run(&structures, radius);
    assert_eq!(records.len(), structures.len());
    for (r, s) in records.iter().zip(&structures) {
        assert_eq!(r.representative_id, s.id);
        assert_eq!(r.aggregated_area, s.area);
    }
}

#[test]
fn zero_radius_keeps_distinct_points_apart() {
    let structures = scattered(200, 100.0, 3);
    let records = run(&structures, 0.0);
    assert_eq!(records.len(), structures.len());
    assert!(records.iter().all(|r| r.is_singleton()));
    for r in &records {
        assert_eq!(r.aggregated_area, structures[r.representative_id].area);
    }
}

#[test]
fn zero_radius_merges_coincident_points() {
    let set = StructureSet::from_points([(3.0, 3.0, 1.0), (3.0, 3.0, 2.0), (4.0, 3.0, 4.0)]);
    let records = run(set.structures(), 0.0);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].members, vec![0, 1]);
    assert_eq!(records[0].aggregated_area, 3.0);
}

/// Six points whose squared distances are all integers, so no pair sits on
/// the 7.5 or 8.0 boundary. Growing the radius from 7.5 to 8.0 only adds the
/// edge 0-1 (squared distance 61).
fn widening_layout() -> StructureSet {
    StructureSet::from_points([
        (10.0, 6.0, 1.0),
        (5.0, 0.0, 1.0),
        (0.0, 1.0, 1.0),
        (8.0, 0.0, 1.0),
        (7.0, 9.0, 1.0),
        (2.0, 4.0, 1.0),
    ])
}

fn member_sets(records: &[ClusterRecord]) -> Vec<Vec<usize>> {
    records.iter().map(|r| r.members.clone()).collect()
}

#[test]
fn greedy_merge_can_split_further_at_a_larger_radius() {
    let set = widening_layout();

    // 0 has the fewest neighbors {0, 3, 4}; what remains is {1, 2, 5}
    let narrow = run(set.structures(), 7.5);
    assert_eq!(member_sets(&narrow), vec![vec![0, 3, 4], vec![1, 2, 5]]);

    // The new edge makes 2 the sparsest target; {1, 2, 5} goes first and
    // leaves 3 and 4 competing for 0
    let wide = run(set.structures(), 8.0);
    assert_eq!(member_sets(&wide), vec![vec![1, 2, 5], vec![0, 3], vec![4]]);
    let anchors: Vec<usize> = wide.iter().map(|r| r.representative_id).collect();
    assert_eq!(anchors, vec![2, 3, 4]);

    assert!(wide.len() > narrow.len());
    assert_eq!(member_total(&wide), 6);
}

#[test]
fn components_on_widening_layout_never_split() {
    let set = widening_layout();
    let params = |radius| MergeParams {
        radius,
        strategy: MergeStrategy::Components,
        ..MergeParams::default()
    };
    let narrow = merge_structures(set.structures(), params(7.5)).unwrap().records;
    let wide = merge_structures(set.structures(), params(8.0)).unwrap().records;
    assert_eq!(member_sets(&narrow), vec![vec![0, 1, 2, 3, 4, 5]]);
    assert_eq!(wide.len(), 1);
}

#[test]
fn larger_radius_never_produces_more_components() {
    let radii: Vec<f64> = (0..40).map(|k| k as f64 * 0.75).collect();
    for seed in 0..60u64 {
        let structures = scattered(4 + (seed % 8) as usize, 30.0, seed);
        let counts: Vec<usize> = radii
            .iter()
            .map(|&radius| {
                let params = MergeParams {
                    radius,
                    strategy: MergeStrategy::Components,
                    ..MergeParams::default()
                };
                merge_structures(&structures, params).unwrap().records.len()
            })
            .collect();

        for pair in counts.windows(2) {
            assert!(pair[1] <= pair[0], "seed {seed}: counts not monotonic: {counts:?}");
        }
    }
}

#[test]
fn isolated_cliques_shrink_monotonically_with_radius() {
    // Four equilateral triangles of growing side, far apart. Each triangle is
    // a clique once the radius exceeds its side, so greedy collapses it whole.
    let sides = [1.0, 2.0, 4.0, 8.0];
    let mut pts = Vec::new();
    for (k, side) in sides.iter().enumerate() {
        let cx = k as f64 * 10_000.0;
        pts.push((cx, 0.0, 1.0));
        pts.push((cx + side, 0.0, 1.0));
        pts.push((cx + side / 2.0, side * 3f64.sqrt() / 2.0, 1.0));
    }
    let set = StructureSet::from_points(pts);

    let radii = [0.0, 0.5, 1.5, 3.0, 6.0, 100.0, 1.0e6];
    let counts: Vec<usize> = radii.iter().map(|&r| run(set.structures(), r).len()).collect();
    assert_eq!(counts, vec![12, 12, 10, 8, 6, 4, 1]);
}

#[test]
fn invalid_radius_is_rejected_before_merging() {
    let set = StructureSet::from_points([(0.0, 0.0, 1.0)]);
    for radius in [-1.0, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
        assert!(merge_structures(set.structures(), MergeParams::with_radius(radius)).is_err());
    }
}

#[test]
fn empty_input_yields_no_records() {
    let outcome = merge_structures(&[], MergeParams::default()).unwrap();
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.summary.output_count, 0);
}
