//! Structural properties of the objective graph.

use arena_core::{GraphConfig, Objective, ObjectiveId, Ownership, Vec2};
use waypoint_planner::NeighborGraph;

/// Deterministic scatter of `count` objectives.
fn scatter(count: u32, seed: u32) -> Vec<Objective> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 8) as f32 / (1u32 << 24) as f32 * 100.0 - 50.0
    };
    (0..count)
        .map(|id| {
            let position = Vec2::new(next(), next());
            Objective::new(ObjectiveId(id), position, 1.0, Ownership::Neutral)
        })
        .collect()
}

#[test]
fn adjacency_is_symmetric_for_any_layout() {
    for seed in [1, 7, 42, 1234] {
        for k in [1, 2, 4] {
            let cfg = GraphConfig {
                neighbor_count: k,
                ..GraphConfig::default()
            };
            let graph = NeighborGraph::build(&scatter(12, seed), &cfg);
            for a in 0..graph.len() {
                assert!(graph.neighbors(a).len() >= k, "seed {seed} k {k} node {a}");
                for b in 0..graph.len() {
                    assert_eq!(graph.are_adjacent(a, b), graph.are_adjacent(b, a));
                }
            }
        }
    }
}

#[test]
fn structural_scores_are_normalized() {
    let graph = NeighborGraph::build(&scatter(15, 99), &GraphConfig::default());
    for i in 0..graph.len() {
        assert!((0.0..=1.0).contains(&graph.centrality(i)));
        assert!((0.0..=1.0).contains(&graph.domination(i)));
    }
    assert!((0..graph.len()).any(|i| graph.centrality(i) == 1.0));
    assert!((0..graph.len()).any(|i| graph.centrality(i) == 0.0));
}

#[test]
fn empty_layout_builds_an_empty_graph() {
    let graph = NeighborGraph::build(&[], &GraphConfig::default());
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
