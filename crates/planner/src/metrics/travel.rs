//! Travel-time model shared by the agent ETA and every opponent ETA.

use arena_core::{AgentSnapshot, EPSILON, Objective, TravelModel};

/// Multiplier (>= 1) that inflates travel time through dangerous or crowded space.
pub fn hazard_multiplier(
    danger: f32,
    openness: f32,
    enemy_pressure: f32,
    model: &TravelModel,
) -> f32 {
    let obstruction = (1.0 - openness).clamp(0.0, 1.0);
    let inflation = danger.clamp(0.0, 1.0) * model.danger_weight
        + obstruction * model.obstruction_weight
        + enemy_pressure.clamp(0.0, 1.0) * model.pressure_weight;
    1.0 + inflation.max(0.0)
}

/// Effective speed of `agent` heading for the objective along `direction`.
///
/// `direction` must be a unit vector.
fn effective_speed(agent: &AgentSnapshot, direction: arena_core::Vec2, model: &TravelModel) -> f32 {
    let max_speed = agent.max_speed;
    let misalignment = (1.0 - agent.facing().cos_angle(direction)) * 0.5;
    let mut speed = max_speed * (1.0 - model.heading_penalty * misalignment);

    let projection = agent.velocity.dot(direction);
    let boost = (projection / max_speed).clamp(-1.0, 1.0) * model.velocity_weight;
    speed *= 1.0 + boost;

    let energy = agent.energy_fraction();
    speed *= model.min_energy_factor + (1.0 - model.min_energy_factor) * energy;
    if !agent.can_thrust() {
        speed *= model.coast_factor;
    }

    speed.max(max_speed * model.min_speed_fraction).max(EPSILON)
}

/// Estimated seconds for `agent` to reach the capture radius of `objective`.
///
/// Returns `f32::INFINITY` when the agent cannot move at all.
pub fn estimate(
    agent: &AgentSnapshot,
    objective: &Objective,
    hazard_multiplier: f32,
    model: &TravelModel,
) -> f32 {
    let penalty = agent.movement_penalty.max(0.0) * model.penalty_weight;
    let offset = objective.position - agent.position;
    let edge_distance = (offset.length() - objective.radius.max(0.0)).max(0.0);
    if edge_distance <= EPSILON {
        return penalty;
    }
    if agent.max_speed <= 0.0 || !agent.max_speed.is_finite() {
        return f32::INFINITY;
    }

    let speed = effective_speed(agent, offset.normalized_or_zero(), model);
    edge_distance / speed * hazard_multiplier.max(1.0) + penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ObjectiveId, Ownership, Vec2};

    fn objective_at(x: f32) -> Objective {
        Objective::new(ObjectiveId(1), Vec2::new(x, 0.0), 1.0, Ownership::Neutral)
    }

    fn agent() -> AgentSnapshot {
        AgentSnapshot::at(Vec2::ZERO).with_max_speed(5.0)
    }

    #[test]
    fn facing_away_is_slower() {
        let model = TravelModel::default();
        let target = objective_at(11.0);
        let facing = estimate(&agent(), &target, 1.0, &model);
        let away = estimate(&agent().with_heading(std::f32::consts::PI), &target, 1.0, &model);

        assert!((facing - 2.0).abs() < 1e-4, "10 units at 5 u/s, got {facing}");
        assert!(away > facing);
    }

    #[test]
    fn velocity_toward_target_shortens_eta() {
        let model = TravelModel::default();
        let target = objective_at(11.0);
        let still = estimate(&agent(), &target, 1.0, &model);
        let rolling = estimate(&agent().with_velocity(Vec2::new(3.0, 0.0)), &target, 1.0, &model);
        let backwards = agent().with_velocity(Vec2::new(-3.0, 0.0));
        let drifting_back = estimate(&backwards, &target, 1.0, &model);

        assert!(rolling < still);
        assert!(drifting_back > still);
    }

    #[test]
    fn low_energy_and_penalty_inflate_eta() {
        let model = TravelModel::default();
        let target = objective_at(11.0);
        let base = estimate(&agent(), &target, 1.0, &model);

        let drained = estimate(&agent().with_energy(0.0, 100.0), &target, 1.0, &model);
        assert!(drained > base);

        let mut penalized = agent();
        penalized.movement_penalty = 1.5;
        let slowed = estimate(&penalized, &target, 1.0, &model);
        assert!((slowed - base - 1.5).abs() < 1e-4);
    }

    #[test]
    fn inside_capture_radius_is_immediate() {
        let model = TravelModel::default();
        assert_eq!(estimate(&agent(), &objective_at(0.5), 1.0, &model), 0.0);
    }

    #[test]
    fn immobile_agent_never_arrives() {
        let model = TravelModel::default();
        let stuck = agent().with_max_speed(0.0);
        assert!(estimate(&stuck, &objective_at(10.0), 1.0, &model).is_infinite());
    }

    #[test]
    fn hazard_multiplier_never_discounts() {
        let model = TravelModel::default();
        assert_eq!(hazard_multiplier(0.0, 1.0, 0.0, &model), 1.0);
        assert!(hazard_multiplier(1.0, 0.0, 1.0, &model) > 1.0);
    }
}
