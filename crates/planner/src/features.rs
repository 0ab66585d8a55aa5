//! Per-objective feature vectors produced by the metric engine.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{Objective, ObjectiveId};

/// Objectives with finite positions, keeping only the first of any repeated id.
pub(crate) fn distinct_live(objectives: &[Objective]) -> impl Iterator<Item = &Objective> {
    let mut seen = BTreeSet::new();
    objectives
        .iter()
        .filter(move |o| o.position.is_finite() && seen.insert(o.id))
}

/// Everything the evaluator and planner know about one objective this cycle.
///
/// Recomputed from scratch every evaluation cycle and never persisted.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FeatureVector {
    /// Center-to-center distance from the agent.
    pub distance: f32,
    /// `1 / (1 + distance / scale)`; closer is higher.
    pub distance_factor: f32,
    /// Combined hazard danger in `[0, 1]`.
    pub danger: f32,
    /// `1 - danger`.
    pub safety: f32,
    /// `1 -` worst asteroid obstruction on the straight path.
    pub openness: f32,
    /// Map-level centrality in `[0, 1]`.
    pub centrality: f32,
    /// Estimated seconds for the agent to reach the capture radius.
    pub travel_time: f32,
    /// `1 / (1 + travel_time / scale)`.
    pub travel_factor: f32,
    /// Fastest opponent ETA; `+inf` when no opponent can contest.
    pub enemy_eta: f32,
    /// Normalized `(enemy_eta - travel_time)` in `[-1, 1]`.
    pub arrival_advantage: f32,
    /// Opponent presence around the objective in `[0, 1]`.
    pub enemy_pressure: f32,
    /// Opponent presence along the agent's path in `[0, 1]`.
    pub intercept_threat: f32,
    pub control_value: f32,
    pub capture_swing: f32,
    /// Cosine between facing and the objective direction.
    pub orientation: f32,
    /// Cosine between velocity and the objective direction (0 when stationary).
    pub approach_alignment: f32,
    /// `(1 - orientation) / 2`, in `[0, 1]`.
    pub heading_misalignment: f32,
}

impl FeatureVector {
    /// No opponent can reach this objective within the contest horizon.
    pub fn uncontested(&self) -> bool {
        self.enemy_eta.is_infinite()
    }
}

/// An objective paired with its features for the current cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveMetrics {
    pub objective: Objective,
    pub features: FeatureVector,
}

/// Feature vectors keyed by objective, in id order.
pub type MetricMap = BTreeMap<ObjectiveId, ObjectiveMetrics>;

/// Raw evaluator score per objective, ephemeral per cycle.
pub type ScoreMap = BTreeMap<ObjectiveId, f32>;
