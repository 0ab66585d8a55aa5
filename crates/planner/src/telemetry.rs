//! Planner telemetry.
//!
//! The planner reports what it did through an optional [`TelemetrySink`]
//! injected at construction. Without a sink the planner runs headless and
//! only emits `tracing` output.

use arena_core::ObjectiveId;

use crate::memory::SwitchReason;
use crate::profile::ProfileKind;

/// Events emitted by [`ObjectivePlanner`](crate::ObjectivePlanner).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum PlannerEvent {
    /// The cached result was returned without recomputation.
    CacheHit { time: f32, target: Option<ObjectiveId> },

    /// The full pipeline ran.
    Recomputed {
        time: f32,
        signature: u64,
        profile: ProfileKind,
        /// Re-evaluation interval chosen for the next cycle.
        interval: f32,
        candidates: usize,
    },

    TargetAcquired { time: f32, target: ObjectiveId },

    TargetSwitched {
        time: f32,
        from: ObjectiveId,
        to: ObjectiveId,
        reason: SwitchReason,
    },

    /// The lock was dropped and nothing replaced it.
    TargetCleared { time: f32, previous: ObjectiveId },
}

impl PlannerEvent {
    pub fn time(&self) -> f32 {
        match self {
            PlannerEvent::CacheHit { time, .. }
            | PlannerEvent::Recomputed { time, .. }
            | PlannerEvent::TargetAcquired { time, .. }
            | PlannerEvent::TargetSwitched { time, .. }
            | PlannerEvent::TargetCleared { time, .. } => *time,
        }
    }
}

/// Receiver for planner events.
pub trait TelemetrySink {
    fn record(&mut self, event: &PlannerEvent);
}

/// Sink that discards everything; the default for a headless planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&mut self, _event: &PlannerEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<PlannerEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PlannerEvent] {
        &self.events
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<PlannerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl TelemetrySink for RecordingSink {
    fn record(&mut self, event: &PlannerEvent) {
        self.events.push(event.clone());
    }
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Box<S> {
    fn record(&mut self, event: &PlannerEvent) {
        (**self).record(event);
    }
}
