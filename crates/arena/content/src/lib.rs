//! Data-driven planner content and loaders.
//!
//! This crate reads the files that drive the planner outside a live match:
//! - Planner tuning (`PlannerConfig`, TOML)
//! - Recorded or hand-written scenarios (sequences of snapshots, RON)
//!
//! All loaders use arena-core types directly with serde for RON/TOML
//! deserialization.

pub mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{Scenario, ScenarioFrame};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, ScenarioLoader};
