//! Cheap environment fingerprint used to decide whether a cached selection
//! is still valid.

use std::hash::{Hash, Hasher};

use arena_core::{CadenceConfig, WorldSnapshot};

/// Hashes the parts of the world that invalidate a cached selection:
/// objective ownership, score differential, objective count, a coarse time
/// bucket, and whether an agent snapshot was supplied.
///
/// Positions and hazards are not hashed; the re-evaluation interval bounds
/// how stale they can get.
pub fn environment(world: &WorldSnapshot, has_agent: bool, cfg: &CadenceConfig) -> u64 {
    let mut hasher = std::hash::DefaultHasher::new();

    world.objectives.len().hash(&mut hasher);
    for objective in &world.objectives {
        objective.id.hash(&mut hasher);
        objective.owner.hash(&mut hasher);
    }
    world.score.differential().hash(&mut hasher);
    time_bucket(world.time, cfg.time_bucket).hash(&mut hasher);
    has_agent.hash(&mut hasher);

    hasher.finish()
}

fn time_bucket(time: f32, width: f32) -> i64 {
    if width > 0.0 && time.is_finite() {
        (time / width).floor() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{MatchScore, Objective, ObjectiveId, Ownership, Vec2};

    fn world() -> WorldSnapshot {
        WorldSnapshot {
            time: 3.2,
            objectives: vec![
                Objective::new(ObjectiveId(1), Vec2::new(1.0, 0.0), 1.0, Ownership::Neutral),
                Objective::new(ObjectiveId(2), Vec2::new(5.0, 0.0), 1.0, Ownership::Own),
            ],
            ..WorldSnapshot::default()
        }
    }

    #[test]
    fn signature_is_stable() {
        let cfg = CadenceConfig::default();
        assert_eq!(environment(&world(), true, &cfg), environment(&world(), true, &cfg));
    }

    #[test]
    fn signature_ignores_positions_within_a_bucket() {
        let cfg = CadenceConfig::default();
        let mut moved = world();
        moved.objectives[0].position = Vec2::new(9.0, 9.0);
        moved.time = 3.9;
        assert_eq!(environment(&world(), true, &cfg), environment(&moved, true, &cfg));
    }

    #[test]
    fn signature_tracks_ownership_score_and_time() {
        let cfg = CadenceConfig::default();
        let base = environment(&world(), true, &cfg);

        let mut captured = world();
        captured.objectives[0].owner = Ownership::Opponent;
        assert_ne!(base, environment(&captured, true, &cfg));

        let mut scored = world();
        scored.score = MatchScore::new(1, 0);
        assert_ne!(base, environment(&scored, true, &cfg));

        let mut later = world();
        later.time = 4.1;
        assert_ne!(base, environment(&later, true, &cfg));

        assert_ne!(base, environment(&world(), false, &cfg));
    }
}
