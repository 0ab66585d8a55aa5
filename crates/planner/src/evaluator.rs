//! Raw objective scoring.
//!
//! The evaluator reduces a [`FeatureVector`] to one unbounded scalar. Each
//! term of the weighted sum is a [`Consideration`]; all considerations share
//! the same `contribution` contract so the score can be broken down term by
//! term for telemetry and tests.
//!
//! # Profile modulation
//!
//! - **deficit factor** raises control and capture-swing weight and lowers
//!   safety weight (risk-taking when behind)
//! - **caution bias** raises safety and threat weights (risk-aversion when ahead)
//! - **aggression bias** scales the contest term
//!
//! Only the relative ordering of scores is meaningful.

use arena_core::EvaluatorWeights;

use crate::features::{FeatureVector, MetricMap, ScoreMap};
use crate::profile::BehaviorProfile;

/// One term of the raw score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, serde::Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Consideration {
    Distance,
    Safety,
    Openness,
    Centrality,
    Travel,
    /// Arrival advantage when contested, uncontested bonus otherwise.
    Contest,
    EnemyPressure,
    Intercept,
    Control,
    CaptureSwing,
    Orientation,
    Approach,
    /// Penalty for having to turn, stronger when the objective is close.
    TurnPenalty,
    /// Quick-capture bonus or slow-arrival penalty.
    ArrivalTiming,
}

impl Consideration {
    pub const COUNT: usize = 14;

    /// Returns all considerations in evaluation order.
    pub const fn all() -> [Consideration; Self::COUNT] {
        [
            Consideration::Distance,
            Consideration::Safety,
            Consideration::Openness,
            Consideration::Centrality,
            Consideration::Travel,
            Consideration::Contest,
            Consideration::EnemyPressure,
            Consideration::Intercept,
            Consideration::Control,
            Consideration::CaptureSwing,
            Consideration::Orientation,
            Consideration::Approach,
            Consideration::TurnPenalty,
            Consideration::ArrivalTiming,
        ]
    }

    /// Signed contribution of this term to the raw score.
    pub fn contribution(
        self,
        f: &FeatureVector,
        profile: &BehaviorProfile,
        w: &EvaluatorWeights,
    ) -> f32 {
        match self {
            Consideration::Distance => w.distance * f.distance_factor,
            Consideration::Safety => {
                w.safety * f.safety * profile.caution_bias / profile.deficit_factor
            }
            Consideration::Openness => w.openness * f.openness,
            Consideration::Centrality => w.centrality * f.centrality,
            Consideration::Travel => w.travel * f.travel_factor,
            Consideration::Contest => {
                if f.uncontested() {
                    w.uncontested_bonus
                } else {
                    w.arrival * f.arrival_advantage * profile.aggression_bias
                }
            }
            Consideration::EnemyPressure => {
                -w.enemy_pressure * f.enemy_pressure * profile.caution_bias
            }
            Consideration::Intercept => -w.intercept * f.intercept_threat * profile.caution_bias,
            Consideration::Control => w.control * f.control_value * profile.deficit_factor,
            Consideration::CaptureSwing => {
                w.capture_swing * f.capture_swing * profile.deficit_factor
            }
            Consideration::Orientation => w.orientation * f.orientation,
            Consideration::Approach => w.approach * f.approach_alignment,
            Consideration::TurnPenalty => {
                -w.turn_penalty * f.heading_misalignment * f.distance_factor
            }
            Consideration::ArrivalTiming => {
                if f.travel_time <= w.quick_capture_time {
                    w.quick_capture_bonus
                } else if f.travel_time >= w.slow_arrival_time {
                    -w.slow_arrival_penalty
                } else {
                    0.0
                }
            }
        }
    }
}

/// Per-term view of one raw score.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScoreBreakdown {
    pub terms: [(Consideration, f32); Consideration::COUNT],
    pub total: f32,
}

impl ScoreBreakdown {
    /// Contribution of a single consideration.
    pub fn term(&self, consideration: Consideration) -> f32 {
        self.terms
            .iter()
            .find(|(c, _)| *c == consideration)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

/// Weighted-sum scorer.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    weights: EvaluatorWeights,
}

impl Evaluator {
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }

    /// Raw score of one feature vector.
    pub fn evaluate(&self, features: &FeatureVector, profile: &BehaviorProfile) -> f32 {
        Consideration::all()
            .iter()
            .map(|c| c.contribution(features, profile, &self.weights))
            .sum()
    }

    /// Evaluates every term separately, in [`Consideration::all`] order.
    pub fn breakdown(&self, features: &FeatureVector, profile: &BehaviorProfile) -> ScoreBreakdown {
        let terms =
            Consideration::all().map(|c| (c, c.contribution(features, profile, &self.weights)));
        let total = terms.iter().map(|(_, v)| v).sum();
        ScoreBreakdown { terms, total }
    }

    /// Builds the score map for a cycle, skipping non-finite scores.
    pub fn score_all(&self, metrics: &MetricMap, profile: &BehaviorProfile) -> ScoreMap {
        let mut scores = ScoreMap::new();
        for (id, entry) in metrics {
            let score = self.evaluate(&entry.features, profile);
            if !score.is_finite() {
                tracing::warn!("Evaluator: non-finite score for {}, skipping", id);
                continue;
            }
            tracing::trace!("  Evaluator {}: raw={:.3}", id, score);
            scores.insert(*id, score);
        }
        scores
    }
}
