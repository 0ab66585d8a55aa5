//! Planner tuning parameters.
//!
//! Every weight, threshold, and window used by the planner lives here so that
//! tuning is done through configuration files and never through code forks.
//! Defaults are the reference tuning; partial files override only the fields
//! they name.

use crate::error::ConfigError;

/// Root configuration consumed by the planner.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    pub metrics: MetricConfig,
    pub travel: TravelModel,
    pub evaluator: EvaluatorWeights,
    pub profile: ProfileConfig,
    pub graph: GraphConfig,
    pub hysteresis: HysteresisConfig,
    pub cadence: CadenceConfig,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks structural constraints the planner relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_weights()?;

        let p = &self.profile;
        for (field, value) in [
            ("profile.min_smoothing", p.min_smoothing),
            ("profile.max_smoothing", p.max_smoothing),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        if p.min_smoothing > p.max_smoothing {
            return Err(ConfigError::InvertedBounds {
                field: "profile.smoothing",
                min: p.min_smoothing,
                max: p.max_smoothing,
            });
        }

        let g = &self.graph;
        if g.neighbor_count == 0 {
            return Err(ConfigError::Zero {
                field: "graph.neighbor_count",
            });
        }
        if g.max_depth == 0 {
            return Err(ConfigError::Zero {
                field: "graph.max_depth",
            });
        }
        if g.branching == 0 {
            return Err(ConfigError::Zero {
                field: "graph.branching",
            });
        }
        if !(0.0..=1.0).contains(&g.depth_discount) {
            return Err(ConfigError::OutOfRange {
                field: "graph.depth_discount",
                value: g.depth_discount,
                min: 0.0,
                max: 1.0,
            });
        }

        let h = &self.hysteresis;
        for (field, value) in [
            ("hysteresis.lock_window", h.lock_window),
            ("hysteresis.revisit_cooldown", h.revisit_cooldown),
            ("hysteresis.eta_margin", h.eta_margin),
            ("hysteresis.confidence_decay", h.confidence_decay),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !(0.0..=1.0).contains(&h.volatility_rate) {
            return Err(ConfigError::OutOfRange {
                field: "hysteresis.volatility_rate",
                value: h.volatility_rate,
                min: 0.0,
                max: 1.0,
            });
        }

        let c = &self.cadence;
        if c.min_interval <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "cadence.min_interval",
                value: c.min_interval,
            });
        }
        if c.min_interval > c.max_interval {
            return Err(ConfigError::InvertedBounds {
                field: "cadence.interval",
                min: c.min_interval,
                max: c.max_interval,
            });
        }
        if c.time_bucket <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "cadence.time_bucket",
                value: c.time_bucket,
            });
        }

        Ok(())
    }

    fn check_weights(&self) -> Result<(), ConfigError> {
        let m = &self.metrics;
        let t = &self.travel;
        let e = &self.evaluator;
        let p = &self.profile;
        let g = &self.graph;
        let h = &self.hysteresis;
        let c = &self.cadence;
        let finite = [
            ("metrics.distance_scale", m.distance_scale),
            ("metrics.mine_reach", m.mine_reach),
            ("metrics.asteroid_clearance", m.asteroid_clearance),
            ("metrics.projectile_lane_width", m.projectile_lane_width),
            ("metrics.projectile_horizon", m.projectile_horizon),
            ("metrics.opponent_fire_range", m.opponent_fire_range),
            ("metrics.opponent_lane_width", m.opponent_lane_width),
            ("metrics.pressure_radius", m.pressure_radius),
            ("metrics.intercept_radius", m.intercept_radius),
            ("metrics.contest_horizon", m.contest_horizon),
            ("metrics.travel_time_scale", m.travel_time_scale),
            ("metrics.mine_weight", m.mine_weight),
            ("metrics.asteroid_weight", m.asteroid_weight),
            ("metrics.projectile_weight", m.projectile_weight),
            ("metrics.opponent_fire_weight", m.opponent_fire_weight),
            ("metrics.control_own", m.control_own),
            ("metrics.control_neutral", m.control_neutral),
            ("metrics.control_opponent", m.control_opponent),
            ("metrics.swing_own", m.swing_own),
            ("metrics.swing_neutral", m.swing_neutral),
            ("metrics.swing_opponent", m.swing_opponent),
            ("travel.heading_penalty", t.heading_penalty),
            ("travel.velocity_weight", t.velocity_weight),
            ("travel.min_energy_factor", t.min_energy_factor),
            ("travel.coast_factor", t.coast_factor),
            ("travel.min_speed_fraction", t.min_speed_fraction),
            ("travel.danger_weight", t.danger_weight),
            ("travel.obstruction_weight", t.obstruction_weight),
            ("travel.pressure_weight", t.pressure_weight),
            ("travel.penalty_weight", t.penalty_weight),
            ("evaluator.distance", e.distance),
            ("evaluator.safety", e.safety),
            ("evaluator.openness", e.openness),
            ("evaluator.centrality", e.centrality),
            ("evaluator.travel", e.travel),
            ("evaluator.arrival", e.arrival),
            ("evaluator.enemy_pressure", e.enemy_pressure),
            ("evaluator.intercept", e.intercept),
            ("evaluator.control", e.control),
            ("evaluator.capture_swing", e.capture_swing),
            ("evaluator.orientation", e.orientation),
            ("evaluator.approach", e.approach),
            ("evaluator.turn_penalty", e.turn_penalty),
            ("evaluator.quick_capture_time", e.quick_capture_time),
            ("evaluator.quick_capture_bonus", e.quick_capture_bonus),
            ("evaluator.slow_arrival_time", e.slow_arrival_time),
            ("evaluator.slow_arrival_penalty", e.slow_arrival_penalty),
            ("evaluator.uncontested_bonus", e.uncontested_bonus),
            ("profile.score_weight", p.score_weight),
            ("profile.objective_lead_weight", p.objective_lead_weight),
            ("profile.standing_scale", p.standing_scale),
            ("profile.urgency_window", p.urgency_window),
            ("profile.base_smoothing", p.base_smoothing),
            ("graph.raw_score_weight", g.raw_score_weight),
            ("graph.centrality_weight", g.centrality_weight),
            ("graph.domination_weight", g.domination_weight),
            ("graph.capture_swing_weight", g.capture_swing_weight),
            ("graph.adjacency_weight", g.adjacency_weight),
            ("graph.adjacency_scale", g.adjacency_scale),
            ("graph.travel_penalty_weight", g.travel_penalty_weight),
            ("graph.degree_weight", g.degree_weight),
            ("graph.quad_weight", g.quad_weight),
            ("hysteresis.momentum_weight", h.momentum_weight),
            ("hysteresis.revisit_cooldown", h.revisit_cooldown),
            ("hysteresis.revisit_penalty", h.revisit_penalty),
            ("hysteresis.retention_bonus", h.retention_bonus),
            ("hysteresis.lock_window", h.lock_window),
            ("hysteresis.locked_absolute", h.locked_absolute),
            ("hysteresis.locked_relative", h.locked_relative),
            ("hysteresis.relaxed_absolute", h.relaxed_absolute),
            ("hysteresis.relaxed_relative", h.relaxed_relative),
            ("hysteresis.eta_margin", h.eta_margin),
            ("hysteresis.volatility_rate", h.volatility_rate),
            ("hysteresis.volatility_scale", h.volatility_scale),
            ("hysteresis.confidence_decay", h.confidence_decay),
            ("hysteresis.score_normalizer", h.score_normalizer),
            ("cadence.min_interval", c.min_interval),
            ("cadence.max_interval", c.max_interval),
            ("cadence.shrink", c.shrink),
            ("cadence.grow", c.grow),
            ("cadence.unstable_below", c.unstable_below),
            ("cadence.stable_above", c.stable_above),
            ("cadence.confident_above", c.confident_above),
            ("cadence.time_bucket", c.time_bucket),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        let positive = [
            ("metrics.distance_scale", m.distance_scale),
            ("metrics.travel_time_scale", m.travel_time_scale),
            ("metrics.pressure_radius", m.pressure_radius),
            ("metrics.intercept_radius", m.intercept_radius),
            ("metrics.asteroid_clearance", m.asteroid_clearance),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Feature-extraction parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MetricConfig {
    /// Distance at which the distance factor falls to one half.
    pub distance_scale: f32,
    /// Extra reach added to a mine's radius for its danger influence.
    pub mine_reach: f32,
    /// Clearance beyond an asteroid's radius at which it stops obstructing a path.
    pub asteroid_clearance: f32,
    pub projectile_lane_width: f32,
    /// Seconds of projectile flight considered by the fire-lane test.
    pub projectile_horizon: f32,
    pub opponent_fire_range: f32,
    pub opponent_lane_width: f32,
    /// Opponents inside this radius of an objective exert pressure on it.
    pub pressure_radius: f32,
    /// Opponents within this distance of our path threaten interception.
    pub intercept_radius: f32,
    /// Opponent ETAs beyond this horizon count as unable to contest.
    pub contest_horizon: f32,
    /// Travel time at which the travel factor falls to one half.
    pub travel_time_scale: f32,
    pub mine_weight: f32,
    pub asteroid_weight: f32,
    pub projectile_weight: f32,
    pub opponent_fire_weight: f32,
    pub control_own: f32,
    pub control_neutral: f32,
    pub control_opponent: f32,
    pub swing_own: f32,
    pub swing_neutral: f32,
    pub swing_opponent: f32,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            distance_scale: 10.0,
            mine_reach: 3.0,
            asteroid_clearance: 2.0,
            projectile_lane_width: 1.5,
            projectile_horizon: 2.0,
            opponent_fire_range: 25.0,
            opponent_lane_width: 2.0,
            pressure_radius: 12.0,
            intercept_radius: 6.0,
            contest_horizon: 20.0,
            travel_time_scale: 4.0,
            mine_weight: 1.0,
            asteroid_weight: 0.8,
            projectile_weight: 1.2,
            opponent_fire_weight: 0.6,
            control_own: -0.5,
            control_neutral: 0.6,
            control_opponent: 1.0,
            swing_own: 0.0,
            swing_neutral: 0.5,
            swing_opponent: 1.0,
        }
    }
}

/// Travel-time model shared by the agent and opponent ETA estimates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TravelModel {
    /// Fraction of speed lost when facing directly away from the target.
    pub heading_penalty: f32,
    /// Scale of the speed boost (or drag) from current velocity along the target line.
    pub velocity_weight: f32,
    /// Speed multiplier at zero energy; full energy gives 1.0.
    pub min_energy_factor: f32,
    /// Speed multiplier applied when the agent cannot pay for thrust.
    pub coast_factor: f32,
    /// Lower bound on effective speed as a fraction of max speed.
    pub min_speed_fraction: f32,
    pub danger_weight: f32,
    pub obstruction_weight: f32,
    pub pressure_weight: f32,
    /// Seconds added per second of remaining movement penalty.
    pub penalty_weight: f32,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            heading_penalty: 0.35,
            velocity_weight: 0.25,
            min_energy_factor: 0.5,
            coast_factor: 0.4,
            min_speed_fraction: 0.05,
            danger_weight: 0.5,
            obstruction_weight: 0.3,
            pressure_weight: 0.2,
            penalty_weight: 1.0,
        }
    }
}

/// Base weights of the raw objective score.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaluatorWeights {
    pub distance: f32,
    pub safety: f32,
    pub openness: f32,
    pub centrality: f32,
    pub travel: f32,
    /// Weight of the contest term (arrival advantage) for contested objectives.
    pub arrival: f32,
    pub enemy_pressure: f32,
    pub intercept: f32,
    pub control: f32,
    pub capture_swing: f32,
    pub orientation: f32,
    pub approach: f32,
    pub turn_penalty: f32,
    pub quick_capture_time: f32,
    pub quick_capture_bonus: f32,
    pub slow_arrival_time: f32,
    pub slow_arrival_penalty: f32,
    /// Replaces the contest term when no opponent can arrive in time.
    pub uncontested_bonus: f32,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            distance: 3.0,
            safety: 1.5,
            openness: 0.8,
            centrality: 0.6,
            travel: 2.0,
            arrival: 1.2,
            enemy_pressure: 1.0,
            intercept: 0.8,
            control: 1.5,
            capture_swing: 1.2,
            orientation: 0.4,
            approach: 0.3,
            turn_penalty: 0.8,
            quick_capture_time: 2.0,
            quick_capture_bonus: 0.75,
            slow_arrival_time: 10.0,
            slow_arrival_penalty: 0.75,
            uncontested_bonus: 1.0,
        }
    }
}

/// How competitive standing maps onto behavior biases.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProfileConfig {
    pub score_weight: f32,
    pub objective_lead_weight: f32,
    /// Standing differential that saturates the standing estimate.
    pub standing_scale: f32,
    /// Seconds before match end over which urgency ramps from 0 to 1.
    pub urgency_window: f32,
    pub base_smoothing: f32,
    pub min_smoothing: f32,
    pub max_smoothing: f32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            score_weight: 1.0,
            objective_lead_weight: 0.5,
            standing_scale: 3.0,
            urgency_window: 60.0,
            base_smoothing: 0.35,
            min_smoothing: 0.05,
            max_smoothing: 0.95,
        }
    }
}

/// Neighbor graph and forecast search parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// K in the K-nearest-neighbor graph.
    pub neighbor_count: usize,
    pub max_depth: usize,
    pub branching: usize,
    /// Geometric discount applied per search depth.
    pub depth_discount: f32,
    pub raw_score_weight: f32,
    pub centrality_weight: f32,
    pub domination_weight: f32,
    pub capture_swing_weight: f32,
    pub adjacency_weight: f32,
    /// Edge length at which the adjacency bonus falls to one half.
    pub adjacency_scale: f32,
    pub travel_penalty_weight: f32,
    /// Weight of node degree in the domination measure.
    pub degree_weight: f32,
    /// Weight of each 4-cycle relative to a triangle.
    pub quad_weight: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 4,
            max_depth: 3,
            branching: 4,
            depth_discount: 0.8,
            raw_score_weight: 1.0,
            centrality_weight: 0.5,
            domination_weight: 0.4,
            capture_swing_weight: 0.6,
            adjacency_weight: 0.5,
            adjacency_scale: 10.0,
            travel_penalty_weight: 0.1,
            degree_weight: 0.25,
            quad_weight: 0.5,
        }
    }
}

/// Score memory and target-switching policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HysteresisConfig {
    /// Fraction of the raw score delta added back as trend momentum.
    pub momentum_weight: f32,
    /// Seconds a vacated objective stays discounted.
    pub revisit_cooldown: f32,
    /// Score deducted from a just-vacated objective; recovers linearly.
    pub revisit_penalty: f32,
    /// Score added to the currently locked target.
    pub retention_bonus: f32,
    /// Seconds after a switch during which switching thresholds are tightened.
    pub lock_window: f32,
    pub locked_absolute: f32,
    pub locked_relative: f32,
    pub relaxed_absolute: f32,
    pub relaxed_relative: f32,
    /// Seconds by which a candidate's ETA must beat the target's to force a switch.
    pub eta_margin: f32,
    /// EMA rate for the volatility estimate.
    pub volatility_rate: f32,
    /// Volatility at which stability falls to one half.
    pub volatility_scale: f32,
    /// Seconds for confidence to decay by 1/e after a switch.
    pub confidence_decay: f32,
    /// Score magnitude at which normalized score saturates to one half.
    pub score_normalizer: f32,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            momentum_weight: 0.5,
            revisit_cooldown: 3.0,
            revisit_penalty: 2.0,
            retention_bonus: 0.3,
            lock_window: 1.5,
            locked_absolute: 0.6,
            locked_relative: 0.25,
            relaxed_absolute: 0.25,
            relaxed_relative: 0.08,
            eta_margin: 1.5,
            volatility_rate: 0.3,
            volatility_scale: 0.5,
            confidence_decay: 8.0,
            score_normalizer: 5.0,
        }
    }
}

/// Adaptive re-evaluation cadence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CadenceConfig {
    pub min_interval: f32,
    pub max_interval: f32,
    pub shrink: f32,
    pub grow: f32,
    /// Stability below this shortens the interval.
    pub unstable_below: f32,
    /// Stability above this (with enough confidence) lengthens the interval.
    pub stable_above: f32,
    pub confident_above: f32,
    /// Width in seconds of the coarse time bucket in the environment signature.
    pub time_bucket: f32,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            min_interval: 0.05,
            max_interval: 0.5,
            shrink: 0.5,
            grow: 1.25,
            unstable_below: 0.4,
            stable_above: 0.75,
            confident_above: 0.6,
            time_bucket: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(PlannerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_neighbor_count_is_rejected() {
        let mut config = PlannerConfig::default();
        config.graph.neighbor_count = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "graph.neighbor_count"
            })
        );
    }

    #[test]
    fn inverted_interval_bounds_are_rejected() {
        let mut config = PlannerConfig::default();
        config.cadence.min_interval = 1.0;
        config.cadence.max_interval = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedBounds { field: "cadence.interval", .. })
        ));
    }

    #[test]
    fn non_finite_cadence_and_threshold_values_are_rejected() {
        let cases: [(&str, fn(&mut PlannerConfig)); 5] = [
            ("cadence.grow", |c| c.cadence.grow = f32::NAN),
            ("cadence.min_interval", |c| c.cadence.min_interval = f32::NAN),
            ("hysteresis.locked_absolute", |c| c.hysteresis.locked_absolute = f32::NAN),
            ("metrics.mine_weight", |c| c.metrics.mine_weight = f32::INFINITY),
            ("graph.adjacency_scale", |c| c.graph.adjacency_scale = f32::NAN),
        ];
        for (field, poison) in cases {
            let mut config = PlannerConfig::default();
            poison(&mut config);
            assert_eq!(config.validate(), Err(ConfigError::NotFinite { field }), "{field}");
        }
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let mut config = PlannerConfig::default();
        config.evaluator.safety = f32::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "evaluator.safety"
            })
        );
    }
}
