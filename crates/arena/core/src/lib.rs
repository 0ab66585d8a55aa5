//! Arena data model shared by the planner, content loaders, and tools.
//!
//! `arena-core` defines the read-only snapshots the host simulation hands to
//! the planner every tick, the continuous geometry they are expressed in, and
//! the [`PlannerConfig`] that carries every tunable weight.
pub mod config;
pub mod error;
pub mod geometry;
pub mod snapshot;

pub use config::{
    CadenceConfig, EvaluatorWeights, GraphConfig, HysteresisConfig, MetricConfig, PlannerConfig,
    ProfileConfig, TravelModel,
};
pub use error::ConfigError;
pub use geometry::{EPSILON, Vec2};
pub use snapshot::{
    ActionCosts, AgentSnapshot, HazardBody, HazardSnapshot, MatchScore, Objective, ObjectiveId,
    Ownership, WorldSnapshot,
};
