use arena_core::Objective;

/// Output of one planning cycle.
///
/// Every result is independently owned; the planner never hands out views
/// into its cache.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SelectionResult {
    pub target: Option<Objective>,
    /// Smoothed adjusted score of the target; `-inf` without a target.
    #[serde(serialize_with = "float_or_marker")]
    pub score: f32,
    /// Estimated seconds to reach the target; `+inf` without a target.
    #[serde(serialize_with = "float_or_marker")]
    pub estimated_time_to_target: f32,
    /// Predicted objectives to visit after the target, in order.
    pub future_objectives: Vec<Objective>,
}

impl SelectionResult {
    /// The "nothing to do" sentinel.
    pub fn empty() -> Self {
        Self {
            target: None,
            score: f32::NEG_INFINITY,
            estimated_time_to_target: f32::INFINITY,
            future_objectives: Vec::new(),
        }
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

impl Default for SelectionResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Writes non-finite values as `"inf"`, `"-inf"` or `"nan"`, since JSON has no
/// representation for them and `serde_json` would emit `null`.
fn float_or_marker<S: serde::Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    match *value {
        v if v.is_finite() => serializer.serialize_f32(v),
        v if v.is_nan() => serializer.serialize_str("nan"),
        v if v > 0.0 => serializer.serialize_str("inf"),
        _ => serializer.serialize_str("-inf"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ObjectiveId, Ownership, Vec2};

    #[test]
    fn sentinel_serializes_with_explicit_markers() {
        let json = serde_json::to_value(SelectionResult::empty()).expect("sentinel serializes");
        assert_eq!(json["target"], serde_json::Value::Null);
        assert_eq!(json["score"], "-inf");
        assert_eq!(json["estimated_time_to_target"], "inf");
    }

    #[test]
    fn finite_values_stay_numeric() {
        let position = Vec2::new(2.0, 0.0);
        let objective = Objective::new(ObjectiveId(1), position, 1.0, Ownership::Neutral);
        let result = SelectionResult {
            target: Some(objective),
            score: 1.5,
            estimated_time_to_target: 0.25,
            future_objectives: Vec::new(),
        };
        let json = serde_json::to_value(&result).expect("result serializes");
        assert_eq!(json["score"], 1.5);
        assert_eq!(json["estimated_time_to_target"], 0.25);
        assert!(result.has_target());
    }
}
