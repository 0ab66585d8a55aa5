//! Configuration validation errors.
//!
//! Selection itself never fails; only building a planner from an invalid
//! configuration does. Each variant names the offending field by its dotted
//! configuration path.

/// A configuration value violates a constraint the planner depends on.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} bounds are inverted (min {min} > max {max})")]
    InvertedBounds {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

impl ConfigError {
    /// Dotted path of the field that failed validation.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotFinite { field }
            | Self::Zero { field }
            | Self::NonPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvertedBounds { field, .. } => field,
        }
    }
}
