//! Scenario definitions: named sequences of planner inputs.

use arena_core::{AgentSnapshot, WorldSnapshot};

/// One planner tick worth of input.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScenarioFrame {
    /// `None` models a tick where the controlled agent is dead or absent.
    pub agent: Option<AgentSnapshot>,
    pub world: WorldSnapshot,
}

/// Frames are replayed in order; world time should not decrease.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Scenario {
    pub name: String,
    pub frames: Vec<ScenarioFrame>,
}

impl Scenario {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the first frame whose clock runs backwards, if any.
    pub fn first_time_regression(&self) -> Option<usize> {
        self.frames
            .windows(2)
            .position(|pair| pair[1].world.time < pair[0].world.time)
            .map(|i| i + 1)
    }

    /// Total match time the scenario spans, in seconds.
    pub fn duration(&self) -> f32 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => (last.world.time - first.world.time).max(0.0),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(time: f32) -> ScenarioFrame {
        ScenarioFrame {
            agent: Some(AgentSnapshot::default()),
            world: WorldSnapshot {
                time,
                ..WorldSnapshot::default()
            },
        }
    }

    #[test]
    fn detects_clock_regression() {
        let ordered = Scenario {
            name: "ordered".into(),
            frames: vec![frame(0.0), frame(0.5), frame(1.0)],
        };
        assert_eq!(ordered.first_time_regression(), None);
        assert_eq!(ordered.duration(), 1.0);

        let broken = Scenario {
            name: "broken".into(),
            frames: vec![frame(0.0), frame(0.5), frame(0.2)],
        };
        assert_eq!(broken.first_time_regression(), Some(2));
    }

    #[test]
    fn empty_scenario_has_no_duration() {
        assert_eq!(Scenario::default().duration(), 0.0);
        assert!(Scenario::default().is_empty());
    }
}
