//! Real-time waypoint objective planner.
//!
//! Each tick the planner turns an [`AgentSnapshot`](arena_core::AgentSnapshot)
//! and a [`WorldSnapshot`](arena_core::WorldSnapshot) into a
//! [`SelectionResult`]: the objective to pursue now and a forecast of the ones
//! to visit next.
//!
//! # Pipeline
//!
//! 1. [`MetricEngine`] extracts one [`FeatureVector`] per objective
//! 2. [`BehaviorProfile`] biases scoring by competitive standing
//! 3. [`Evaluator`] reduces features to raw scores
//! 4. [`StrategicPlanner`] scores the objective graph and forecasts a route
//! 5. [`TargetMemory`] smooths scores and applies switch hysteresis
//!
//! [`ObjectivePlanner`] runs the stages in order and caches the result
//! between environment changes.
//!
//! # Example
//!
//! ```
//! use arena_core::{AgentSnapshot, Objective, ObjectiveId, Ownership, Vec2, WorldSnapshot};
//! use waypoint_planner::ObjectivePlanner;
//!
//! let mut planner = ObjectivePlanner::default();
//! let world = WorldSnapshot {
//!     time_remaining: 60.0,
//!     objectives: vec![Objective::new(
//!         ObjectiveId(1),
//!         Vec2::new(4.0, 0.0),
//!         1.0,
//!         Ownership::Neutral,
//!     )],
//!     ..WorldSnapshot::default()
//! };
//!
//! let result = planner.select_best_objective(Some(&AgentSnapshot::default()), &world);
//! assert_eq!(result.target.map(|o| o.id), Some(ObjectiveId(1)));
//! ```

pub mod coordinator;
pub mod error;
pub mod evaluator;
pub mod features;
pub mod graph;
pub mod memory;
pub mod metrics;
pub mod profile;
pub mod selection;
pub mod signature;
pub mod telemetry;

pub use coordinator::ObjectivePlanner;
pub use error::PlannerError;
pub use evaluator::{Consideration, Evaluator, ScoreBreakdown};
pub use features::{FeatureVector, MetricMap, ObjectiveMetrics, ScoreMap};
pub use graph::{NeighborGraph, StrategicPlan, StrategicPlanner};
pub use memory::{Decision, LockState, SwitchReason, TargetMemory, Transition};
pub use metrics::MetricEngine;
pub use profile::{BehaviorProfile, ProfileKind};
pub use selection::SelectionResult;
pub use telemetry::{NullSink, PlannerEvent, RecordingSink, TelemetrySink};
