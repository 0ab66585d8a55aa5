//! Metric engine: world snapshot in, one [`FeatureVector`] per objective out.
//!
//! The engine is a pure function of its inputs. It holds no state between
//! cycles and every feature is recomputed from the latest snapshot.
//!
//! # Feature groups
//!
//! - **Spatial**: distance factor, centrality, orientation, approach alignment
//! - **Hazard**: danger (see [`danger`]), safety, openness
//! - **Temporal**: self ETA and fastest opponent ETA (see [`travel`])
//! - **Competitive**: arrival advantage, enemy pressure, intercept threat,
//!   control value, capture swing

pub mod danger;
pub mod travel;

use arena_core::{
    AgentSnapshot, EPSILON, MetricConfig, Objective, Ownership, PlannerConfig, Vec2, WorldSnapshot,
};

use crate::features::{FeatureVector, MetricMap, ObjectiveMetrics, distinct_live};

/// Stateless feature extractor.
pub struct MetricEngine;

impl MetricEngine {
    /// Computes features for every live objective.
    ///
    /// Returns an empty map when there is no agent or no objective. Objectives
    /// with non-finite positions are skipped, as is any repeat of an id.
    pub fn compute(
        agent: Option<&AgentSnapshot>,
        world: &WorldSnapshot,
        config: &PlannerConfig,
    ) -> MetricMap {
        let mut metrics = MetricMap::new();
        let Some(agent) = agent else {
            tracing::debug!("MetricEngine: no agent snapshot, skipping");
            return metrics;
        };

        let live: Vec<&Objective> = distinct_live(&world.objectives).collect();
        let dropped = world.objectives.len() - live.len();
        if dropped > 0 {
            tracing::warn!(
                "MetricEngine: skipped {} objective(s) with non-finite positions or repeated ids",
                dropped
            );
        }
        if live.is_empty() {
            return metrics;
        }

        let positions: Vec<Vec2> = live.iter().map(|o| o.position).collect();
        let centrality = centrality_by_centroid(&positions);
        let horizon = contest_horizon(world, &config.metrics);

        for (objective, centrality) in live.into_iter().zip(centrality) {
            let features =
                Self::features_for(agent, objective, world, config, centrality, horizon);
            tracing::trace!(
                "  {}: dist={:.2} danger={:.2} open={:.2} eta={:.2} enemy_eta={:.2}",
                objective.id,
                features.distance,
                features.danger,
                features.openness,
                features.travel_time,
                features.enemy_eta
            );
            metrics.insert(
                objective.id,
                ObjectiveMetrics {
                    objective: objective.clone(),
                    features,
                },
            );
        }

        metrics
    }

    fn features_for(
        agent: &AgentSnapshot,
        objective: &Objective,
        world: &WorldSnapshot,
        config: &PlannerConfig,
        centrality: f32,
        horizon: f32,
    ) -> FeatureVector {
        let cfg = &config.metrics;

        let offset = objective.position - agent.position;
        let distance = offset.length();
        let distance_factor = 1.0 / (1.0 + distance / cfg.distance_scale);

        let Approach {
            danger,
            openness,
            pressure: enemy_pressure,
            travel_time,
        } = approach(agent, objective, world, &world.opponents, config);
        let intercept_threat = intercept_threat(agent.position, objective, &world.opponents, cfg);

        let travel_factor = if travel_time.is_finite() {
            1.0 / (1.0 + travel_time / cfg.travel_time_scale)
        } else {
            0.0
        };

        let enemy_eta = fastest_opponent_eta(agent, objective, world, config, horizon);
        let arrival_advantage = arrival_advantage(travel_time, enemy_eta);

        let (control_value, capture_swing) = match objective.owner {
            Ownership::Own => (cfg.control_own, cfg.swing_own),
            Ownership::Neutral => (cfg.control_neutral, cfg.swing_neutral),
            Ownership::Opponent => (cfg.control_opponent, cfg.swing_opponent),
        };

        let (orientation, heading_misalignment) = if distance <= EPSILON {
            (1.0, 0.0)
        } else {
            let cos = agent.facing().cos_angle(offset);
            (cos, (1.0 - cos) * 0.5)
        };
        let approach_alignment = agent.velocity.cos_angle(offset);

        FeatureVector {
            distance,
            distance_factor,
            danger: danger.total,
            safety: 1.0 - danger.total,
            openness,
            centrality,
            travel_time,
            travel_factor,
            enemy_eta,
            arrival_advantage,
            enemy_pressure,
            intercept_threat,
            control_value,
            capture_swing,
            orientation,
            approach_alignment,
            heading_misalignment,
        }
    }
}

/// `1 - d / d_max` where `d` is each point's distance to the centroid of all points.
pub fn centrality_by_centroid(positions: &[Vec2]) -> Vec<f32> {
    if positions.is_empty() {
        return Vec::new();
    }
    let sum = positions.iter().fold(Vec2::ZERO, |acc, &p| acc + p);
    let centroid = sum * (1.0 / positions.len() as f32);

    let distances: Vec<f32> = positions.iter().map(|p| p.distance(centroid)).collect();
    let max = distances.iter().copied().fold(0.0, f32::max);

    distances
        .into_iter()
        .map(|d| if max <= EPSILON { 1.0 } else { 1.0 - d / max })
        .collect()
}

/// Opponent ETAs beyond this count as unable to contest.
///
/// A non-positive `time_remaining` means the host does not run a clock.
fn contest_horizon(world: &WorldSnapshot, cfg: &MetricConfig) -> f32 {
    if world.time_remaining > 0.0 {
        cfg.contest_horizon.min(world.time_remaining)
    } else {
        cfg.contest_horizon
    }
}

/// Hazard-adjusted travel estimate for one traveller.
struct Approach {
    danger: danger::DangerBreakdown,
    openness: f32,
    pressure: f32,
    travel_time: f32,
}

/// Runs the travel model for `traveller`, threatened by `hostiles`.
fn approach(
    traveller: &AgentSnapshot,
    objective: &Objective,
    world: &WorldSnapshot,
    hostiles: &[AgentSnapshot],
    config: &PlannerConfig,
) -> Approach {
    let cfg = &config.metrics;
    let danger = danger::assess(traveller.position, objective, world, hostiles, cfg);
    let openness = 1.0 - danger.asteroids;
    let pressure = enemy_pressure(objective, hostiles, cfg);
    let multiplier = travel::hazard_multiplier(danger.total, openness, pressure, &config.travel);
    let travel_time = travel::estimate(traveller, objective, multiplier, &config.travel);
    Approach {
        danger,
        openness,
        pressure,
        travel_time,
    }
}

/// Minimum ETA over all opponents, each seen from its own position with our
/// agent as the hostile.
fn fastest_opponent_eta(
    agent: &AgentSnapshot,
    objective: &Objective,
    world: &WorldSnapshot,
    config: &PlannerConfig,
    horizon: f32,
) -> f32 {
    let hostile = std::slice::from_ref(agent);
    let eta = world
        .opponents
        .iter()
        .map(|opponent| approach(opponent, objective, world, hostile, config).travel_time)
        .fold(f32::INFINITY, f32::min);

    if eta > horizon { f32::INFINITY } else { eta }
}

fn arrival_advantage(self_eta: f32, enemy_eta: f32) -> f32 {
    if enemy_eta.is_infinite() {
        return 1.0;
    }
    if self_eta.is_infinite() {
        return -1.0;
    }
    ((enemy_eta - self_eta) / (enemy_eta + self_eta + EPSILON)).clamp(-1.0, 1.0)
}

fn enemy_pressure(objective: &Objective, opponents: &[AgentSnapshot], cfg: &MetricConfig) -> f32 {
    opponents
        .iter()
        .map(|o| {
            let distance = o.position.distance(objective.position);
            (1.0 - distance / cfg.pressure_radius).clamp(0.0, 1.0)
        })
        .fold(0.0, f32::max)
}

fn intercept_threat(
    from: Vec2,
    objective: &Objective,
    opponents: &[AgentSnapshot],
    cfg: &MetricConfig,
) -> f32 {
    opponents
        .iter()
        .map(|o| {
            let lateral = o.position.segment_distance(from, objective.position);
            (1.0 - lateral / cfg.intercept_radius).clamp(0.0, 1.0)
        })
        .fold(0.0, f32::max)
}
