use arena_core::ConfigError;

/// Errors raised while building a planner.
///
/// Per-tick selection has no error path; degraded inputs produce
/// [`SelectionResult::empty`](crate::SelectionResult::empty).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
