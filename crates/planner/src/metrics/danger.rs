//! Hazard danger and path obstruction terms.
//!
//! Every contributor is normalized to `[0, 1]` before blending so that the
//! blend weights in [`MetricConfig`] are directly comparable.

use arena_core::{AgentSnapshot, HazardBody, MetricConfig, Objective, Vec2, WorldSnapshot};

/// Individual danger contributors for one objective.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DangerBreakdown {
    pub mines: f32,
    pub asteroids: f32,
    pub projectiles: f32,
    pub opponent_fire: f32,
    /// Weighted average of the contributors.
    pub total: f32,
}

/// Worst obstruction any active asteroid imposes on the segment `from..to`.
pub fn path_obstruction<'a>(
    from: Vec2,
    to: Vec2,
    asteroids: impl IntoIterator<Item = &'a HazardBody>,
    clearance: f32,
) -> f32 {
    asteroids
        .into_iter()
        .filter(|a| a.active)
        .map(|a| {
            let gap = a.position.segment_distance(from, to) - a.radius;
            if gap <= 0.0 {
                1.0
            } else {
                (1.0 - gap / clearance).clamp(0.0, 1.0)
            }
        })
        .fold(0.0, f32::max)
}

/// Summed proximity influence of active mines around `target`, saturating at 1.
pub fn mine_influence<'a>(
    target: Vec2,
    mines: impl IntoIterator<Item = &'a HazardBody>,
    reach: f32,
) -> f32 {
    let sum: f32 = mines
        .into_iter()
        .filter(|m| m.active)
        .map(|m| {
            let radius = m.radius + reach;
            if radius <= 0.0 {
                return 0.0;
            }
            (1.0 - m.position.distance(target) / radius).clamp(0.0, 1.0)
        })
        .sum();
    sum.min(1.0)
}

/// Forward fire-lane test.
///
/// Returns how strongly `target` sits inside the lane that starts at `origin`
/// and runs `range` units along the unit vector `direction`. Targets behind
/// the origin, beyond the range, or outside the lane width score zero.
pub fn lane_threat(origin: Vec2, direction: Vec2, range: f32, width: f32, target: Vec2) -> f32 {
    if direction == Vec2::ZERO || range <= 0.0 || width <= 0.0 {
        return 0.0;
    }
    let to = target - origin;
    let along = to.dot(direction);
    if along <= 0.0 || along > range {
        return 0.0;
    }
    let lateral = direction.cross(to).abs();
    if lateral >= width {
        return 0.0;
    }
    (1.0 - lateral / width) * (1.0 - along / range)
}

/// Summed fire-lane threat of moving projectiles, saturating at 1.
pub fn projectile_threat<'a>(
    objective: &Objective,
    projectiles: impl IntoIterator<Item = &'a HazardBody>,
    cfg: &MetricConfig,
) -> f32 {
    let sum: f32 = projectiles
        .into_iter()
        .filter(|p| p.active)
        .map(|p| {
            let speed = p.velocity.length();
            lane_threat(
                p.position,
                p.velocity.normalized_or_zero(),
                speed * cfg.projectile_horizon,
                cfg.projectile_lane_width + p.radius + objective.radius,
                objective.position,
            )
        })
        .sum();
    sum.min(1.0)
}

/// Strongest fire-lane pressure any hostile's facing puts on the objective.
pub fn opponent_fire(
    objective: &Objective,
    hostiles: &[AgentSnapshot],
    cfg: &MetricConfig,
) -> f32 {
    hostiles
        .iter()
        .map(|o| {
            lane_threat(
                o.position,
                o.facing(),
                cfg.opponent_fire_range,
                cfg.opponent_lane_width + objective.radius,
                objective.position,
            )
        })
        .fold(0.0, f32::max)
}

/// Blends all danger contributors for travelling from `from` to `objective`.
///
/// `hostiles` are the agents whose fire lanes threaten the traveller: the
/// opponents for our agent, our agent for an opponent.
pub fn assess(
    from: Vec2,
    objective: &Objective,
    world: &WorldSnapshot,
    hostiles: &[AgentSnapshot],
    cfg: &MetricConfig,
) -> DangerBreakdown {
    let hazards = &world.hazards;
    let mines = mine_influence(objective.position, hazards.active_mines(), cfg.mine_reach);
    let asteroids = path_obstruction(
        from,
        objective.position,
        hazards.active_asteroids(),
        cfg.asteroid_clearance,
    );
    let projectiles = projectile_threat(objective, hazards.active_projectiles(), cfg);
    let opponent_fire = opponent_fire(objective, hostiles, cfg);

    let weight_sum =
        cfg.mine_weight + cfg.asteroid_weight + cfg.projectile_weight + cfg.opponent_fire_weight;
    let total = if weight_sum > 0.0 {
        let blended = mines * cfg.mine_weight
            + asteroids * cfg.asteroid_weight
            + projectiles * cfg.projectile_weight
            + opponent_fire * cfg.opponent_fire_weight;
        (blended / weight_sum).clamp(0.0, 1.0)
    } else {
        0.0
    };

    DangerBreakdown {
        mines,
        asteroids,
        projectiles,
        opponent_fire,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ObjectiveId, Ownership};

    fn objective_at(x: f32, y: f32) -> Objective {
        Objective::new(ObjectiveId(1), Vec2::new(x, y), 1.0, Ownership::Neutral)
    }

    #[test]
    fn asteroid_on_path_blocks_fully() {
        let rock = HazardBody::new(Vec2::new(5.0, 0.0), 1.0);
        let obstruction = path_obstruction(Vec2::ZERO, Vec2::new(10.0, 0.0), [&rock], 2.0);
        assert_eq!(obstruction, 1.0);
    }

    #[test]
    fn distant_or_inactive_asteroid_does_not_obstruct() {
        let far = HazardBody::new(Vec2::new(5.0, 10.0), 1.0);
        let dormant = HazardBody::new(Vec2::new(5.0, 0.0), 1.0).inactive();
        let obstruction =
            path_obstruction(Vec2::ZERO, Vec2::new(10.0, 0.0), [&far, &dormant], 2.0);
        assert_eq!(obstruction, 0.0);
    }

    #[test]
    fn mine_influence_saturates() {
        let mines = vec![
            HazardBody::new(Vec2::new(0.0, 0.0), 1.0),
            HazardBody::new(Vec2::new(0.5, 0.0), 1.0),
        ];
        assert_eq!(mine_influence(Vec2::ZERO, &mines, 3.0), 1.0);
        assert_eq!(mine_influence(Vec2::new(50.0, 0.0), &mines, 3.0), 0.0);
    }

    #[test]
    fn lane_threat_only_ahead_of_origin() {
        let east = Vec2::new(1.0, 0.0);
        let ahead = lane_threat(Vec2::ZERO, east, 10.0, 2.0, Vec2::new(4.0, 0.5));
        let behind = lane_threat(Vec2::ZERO, east, 10.0, 2.0, Vec2::new(-4.0, 0.0));
        let beside = lane_threat(Vec2::ZERO, east, 10.0, 2.0, Vec2::new(4.0, 3.0));

        assert!(ahead > 0.0);
        assert_eq!(behind, 0.0);
        assert_eq!(beside, 0.0);
    }

    #[test]
    fn stationary_projectile_is_harmless() {
        let objective = objective_at(3.0, 0.0);
        let shell = HazardBody::new(Vec2::ZERO, 0.2);
        assert_eq!(projectile_threat(&objective, [&shell], &MetricConfig::default()), 0.0);
    }

    #[test]
    fn clear_world_has_no_danger() {
        let objective = objective_at(3.0, 0.0);
        let world = WorldSnapshot::default();
        let danger = assess(Vec2::ZERO, &objective, &world, &[], &MetricConfig::default());
        assert_eq!(danger, DangerBreakdown::default());
    }

    #[test]
    fn obstruction_follows_the_travellers_own_path() {
        let objective = objective_at(10.0, 0.0);
        let mut world = WorldSnapshot::default();
        world.hazards.asteroids.push(HazardBody::new(Vec2::new(5.0, 0.0), 1.0));
        let cfg = MetricConfig::default();

        let blocked = assess(Vec2::ZERO, &objective, &world, &[], &cfg);
        let clear = assess(Vec2::new(10.0, 8.0), &objective, &world, &[], &cfg);
        assert_eq!(blocked.asteroids, 1.0);
        assert_eq!(clear.asteroids, 0.0);
        assert!(clear.total < blocked.total);
    }
}
