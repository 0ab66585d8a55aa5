//! Read-only world snapshots supplied by the host simulation each tick.
//!
//! The planner never owns or mutates these values. The host rebuilds them
//! every tick and hands them over by reference.

use std::fmt;

use crate::geometry::Vec2;

/// Stable identity of a capturable objective (waypoint).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveId(pub u32);

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wp#{}", self.0)
    }
}

/// Who currently holds an objective, from the controlled agent's point of view.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Ownership {
    /// Held by the controlled agent's side.
    Own,
    /// Held by the opposing side.
    Opponent,
    /// Uncaptured.
    #[default]
    Neutral,
}

/// A capturable map location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub id: ObjectiveId,
    pub position: Vec2,
    /// Capture radius; arriving anywhere inside it counts as reaching the objective.
    pub radius: f32,
    pub owner: Ownership,
}

impl Objective {
    pub fn new(id: ObjectiveId, position: Vec2, radius: f32, owner: Ownership) -> Self {
        Self {
            id,
            position,
            radius,
            owner,
        }
    }
}

/// Energy spent per discrete action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionCosts {
    pub thrust: f32,
    pub fire: f32,
    pub mine: f32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            thrust: 1.0,
            fire: 5.0,
            mine: 20.0,
        }
    }
}

/// Kinematic and resource state of one agent.
///
/// Used both for the controlled agent and for every opposing agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing angle in radians.
    pub heading: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub radius: f32,
    pub max_speed: f32,
    pub costs: ActionCosts,
    /// Seconds left on a movement-penalty countdown (0 when unpenalized).
    pub movement_penalty: f32,
}

impl AgentSnapshot {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder: replaces the velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: replaces the heading (radians).
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    /// Builder: replaces current and maximum energy.
    pub fn with_energy(mut self, energy: f32, max_energy: f32) -> Self {
        self.energy = energy;
        self.max_energy = max_energy;
        self
    }

    /// Builder: replaces the maximum speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Unit vector of the current facing.
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Energy as a fraction of capacity in `[0, 1]`; full when capacity is unknown.
    pub fn energy_fraction(&self) -> f32 {
        if self.max_energy <= 0.0 || !self.max_energy.is_finite() {
            return 1.0;
        }
        (self.energy / self.max_energy).clamp(0.0, 1.0)
    }

    /// Whether the agent can still pay for a thrust action.
    pub fn can_thrust(&self) -> bool {
        self.energy >= self.costs.thrust
    }
}

impl Default for AgentSnapshot {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            heading: 0.0,
            energy: 100.0,
            max_energy: 100.0,
            radius: 1.0,
            max_speed: 5.0,
            costs: ActionCosts::default(),
            movement_penalty: 0.0,
        }
    }
}

/// A mine, asteroid, or projectile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardBody {
    pub position: Vec2,
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity: Vec2,
    pub radius: f32,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    pub active: bool,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

impl HazardBody {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            active: true,
        }
    }

    /// Builder: replaces the velocity.
    pub fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder: marks the hazard inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// All hazards visible this tick.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HazardSnapshot {
    pub mines: Vec<HazardBody>,
    pub asteroids: Vec<HazardBody>,
    pub projectiles: Vec<HazardBody>,
}

impl HazardSnapshot {
    pub fn active_mines(&self) -> impl Iterator<Item = &HazardBody> {
        self.mines.iter().filter(|h| h.active)
    }

    pub fn active_asteroids(&self) -> impl Iterator<Item = &HazardBody> {
        self.asteroids.iter().filter(|h| h.active)
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &HazardBody> {
        self.projectiles.iter().filter(|h| h.active)
    }
}

/// Per-side match score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchScore {
    pub own: i32,
    pub opponent: i32,
}

impl MatchScore {
    pub fn new(own: i32, opponent: i32) -> Self {
        Self { own, opponent }
    }

    /// Positive when the controlled side is ahead.
    pub fn differential(&self) -> i32 {
        self.own.saturating_sub(self.opponent)
    }
}

/// Everything the planner reads about the arena for one tick.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldSnapshot {
    /// Match clock in seconds since start. Monotonic within a match.
    pub time: f32,
    /// Seconds until the match ends.
    pub time_remaining: f32,
    pub objectives: Vec<Objective>,
    pub opponents: Vec<AgentSnapshot>,
    pub hazards: HazardSnapshot,
    pub score: MatchScore,
}

impl WorldSnapshot {
    pub fn objective(&self, id: ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Own-held minus opponent-held objective count.
    pub fn objective_lead(&self) -> i32 {
        self.objectives.iter().fold(0, |lead, o| match o.owner {
            Ownership::Own => lead + 1,
            Ownership::Opponent => lead - 1,
            Ownership::Neutral => lead,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_fraction_handles_unknown_capacity() {
        let agent = AgentSnapshot::default().with_energy(30.0, 0.0);
        assert_eq!(agent.energy_fraction(), 1.0);

        let agent = AgentSnapshot::default().with_energy(30.0, 60.0);
        assert!((agent.energy_fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn objective_lead_counts_ownership() {
        let world = WorldSnapshot {
            objectives: vec![
                Objective::new(ObjectiveId(1), Vec2::ZERO, 1.0, Ownership::Own),
                Objective::new(ObjectiveId(2), Vec2::ZERO, 1.0, Ownership::Own),
                Objective::new(ObjectiveId(3), Vec2::ZERO, 1.0, Ownership::Opponent),
                Objective::new(ObjectiveId(4), Vec2::ZERO, 1.0, Ownership::Neutral),
            ],
            ..WorldSnapshot::default()
        };
        assert_eq!(world.objective_lead(), 1);
    }

    #[test]
    fn ownership_parses_case_insensitively() {
        let owner: Ownership = "Opponent".parse().unwrap();
        assert_eq!(owner, Ownership::Opponent);
        assert_eq!(Ownership::Own.to_string(), "own");
    }
}
