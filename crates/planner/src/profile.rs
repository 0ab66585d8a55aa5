//! Behavior profile derived from competitive standing.
//!
//! The profile is recomputed every cycle from the score differential, the
//! objective-ownership lead, and how close the match is to ending. It carries
//! no state of its own.

use arena_core::{ProfileConfig, WorldSnapshot};

/// Discrete standing bucket, used as the profile identity for cache checks.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, serde::Serialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum ProfileKind {
    /// Far behind; maximum risk-taking.
    Desperate,
    Trailing,
    Even,
    Leading,
    /// Far ahead; protect the lead.
    Protecting,
}

impl ProfileKind {
    fn from_standing(standing: f32) -> Self {
        if standing < -0.6 {
            Self::Desperate
        } else if standing < -0.15 {
            Self::Trailing
        } else if standing <= 0.15 {
            Self::Even
        } else if standing <= 0.6 {
            Self::Leading
        } else {
            Self::Protecting
        }
    }
}

/// Bias factors applied by the evaluator, memory manager, and coordinator.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BehaviorProfile {
    pub kind: ProfileKind,
    /// Standing in `(-1, 1)`; positive when ahead.
    pub standing: f32,
    /// Time pressure in `[0, 1]`.
    pub urgency: f32,
    /// `>= 1`; grows with the deficit and raises control weight.
    pub deficit_factor: f32,
    pub aggression_bias: f32,
    pub caution_bias: f32,
    /// Exponential smoothing factor applied to the newest score.
    pub smoothing: f32,
    pub confidence_bias: f32,
}

impl BehaviorProfile {
    /// Profile for an even match with no time pressure.
    pub fn neutral(cfg: &ProfileConfig) -> Self {
        Self::from_standing(0.0, 0.0, cfg)
    }

    /// Derives the profile from the current world snapshot.
    pub fn derive(world: &WorldSnapshot, cfg: &ProfileConfig) -> Self {
        let differential = world.score.differential() as f32 * cfg.score_weight
            + world.objective_lead() as f32 * cfg.objective_lead_weight;
        let standing = if cfg.standing_scale > 0.0 {
            (differential / cfg.standing_scale).tanh()
        } else {
            differential.signum()
        };

        let urgency = if world.time_remaining > 0.0 && cfg.urgency_window > 0.0 {
            (1.0 - world.time_remaining / cfg.urgency_window).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self::from_standing(standing, urgency, cfg)
    }

    fn from_standing(standing: f32, urgency: f32, cfg: &ProfileConfig) -> Self {
        let deficit = (-standing).max(0.0);
        let lead = standing.max(0.0);

        let deficit_factor = 1.0 + deficit * (0.5 + 0.5 * urgency);
        let aggression_bias = 1.0 + 0.6 * deficit - 0.3 * lead;
        let caution_bias = (1.0 + 0.5 * lead - 0.4 * deficit).max(0.1);
        let smoothing = (cfg.base_smoothing + 0.2 * deficit - 0.1 * lead)
            .clamp(cfg.min_smoothing, cfg.max_smoothing);
        let confidence_bias = (1.0 + 0.3 * lead - 0.2 * deficit).max(0.1);

        Self {
            kind: ProfileKind::from_standing(standing),
            standing,
            urgency,
            deficit_factor,
            aggression_bias,
            caution_bias,
            smoothing,
            confidence_bias,
        }
    }
}
