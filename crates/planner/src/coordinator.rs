//! Priority coordinator: the planner's single entry point.
//!
//! Runs metrics, profile, evaluation, strategic planning and target memory in
//! order, and caches the outcome behind an environment signature so the
//! graph work does not run every tick.

use arena_core::{AgentSnapshot, ObjectiveId, PlannerConfig, WorldSnapshot};

use crate::error::PlannerError;
use crate::evaluator::Evaluator;
use crate::graph::StrategicPlanner;
use crate::memory::{Decision, TargetMemory, Transition};
use crate::metrics::MetricEngine;
use crate::profile::{BehaviorProfile, ProfileKind};
use crate::selection::SelectionResult;
use crate::signature;
use crate::telemetry::{NullSink, PlannerEvent, TelemetrySink};

#[derive(Clone, Debug)]
struct CachedSelection {
    signature: u64,
    profile: ProfileKind,
    computed_at: f32,
    result: SelectionResult,
}

/// Per-agent objective planner.
///
/// One planner serves one agent. All state lives behind `&mut self`; the
/// planner never spawns work or shares state.
pub struct ObjectivePlanner<S = NullSink> {
    config: PlannerConfig,
    evaluator: Evaluator,
    strategic: StrategicPlanner,
    memory: TargetMemory,
    cache: Option<CachedSelection>,
    interval: f32,
    sink: S,
}

impl ObjectivePlanner<NullSink> {
    /// Builds a headless planner after validating `config`.
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        Self::with_sink(config, NullSink)
    }
}

impl Default for ObjectivePlanner<NullSink> {
    fn default() -> Self {
        Self::assemble(PlannerConfig::default(), NullSink)
    }
}

impl<S: TelemetrySink> ObjectivePlanner<S> {
    /// Builds a planner that reports to `sink`.
    pub fn with_sink(config: PlannerConfig, sink: S) -> Result<Self, PlannerError> {
        config.validate()?;
        Ok(Self::assemble(config, sink))
    }

    fn assemble(config: PlannerConfig, sink: S) -> Self {
        Self {
            evaluator: Evaluator::new(config.evaluator.clone()),
            strategic: StrategicPlanner::new(config.graph.clone()),
            memory: TargetMemory::new(),
            cache: None,
            interval: config.cadence.min_interval,
            config,
            sink,
        }
    }

    /// Chooses the objective to pursue this tick.
    ///
    /// Missing agent or objectives yield [`SelectionResult::empty`]. The
    /// returned value is an independent copy of whatever the planner caches.
    pub fn select_best_objective(
        &mut self,
        agent: Option<&AgentSnapshot>,
        world: &WorldSnapshot,
    ) -> SelectionResult {
        let now = world.time;
        let profile = BehaviorProfile::derive(world, &self.config.profile);
        let signature = signature::environment(world, agent.is_some(), &self.config.cadence);

        if let Some(cached) = self.reusable(signature, profile.kind, now) {
            tracing::trace!("ObjectivePlanner: cache hit at t={:.2}", now);
            let result = cached.result.clone();
            self.emit(PlannerEvent::CacheHit {
                time: now,
                target: result.target.as_ref().map(|o| o.id),
            });
            return result;
        }

        let environment_changed = self
            .cache
            .as_ref()
            .is_none_or(|c| c.signature != signature || c.profile != profile.kind);

        tracing::debug!(
            "ObjectivePlanner: recompute at t={:.2} (profile={}, changed={})",
            now,
            profile.kind,
            environment_changed
        );

        let decision = self.run_pipeline(agent, world, &profile);
        self.adapt_interval(&decision, environment_changed);
        self.report(now, signature, profile.kind, &decision);

        let result = decision.result;
        self.cache = Some(CachedSelection {
            signature,
            profile: profile.kind,
            computed_at: now,
            result: result.clone(),
        });
        result
    }

    fn reusable(&self, signature: u64, profile: ProfileKind, now: f32) -> Option<&CachedSelection> {
        let cached = self.cache.as_ref()?;
        let elapsed = now - cached.computed_at;
        let fresh = elapsed >= 0.0 && elapsed < self.interval;
        (cached.signature == signature && cached.profile == profile && fresh).then_some(cached)
    }

    fn run_pipeline(
        &mut self,
        agent: Option<&AgentSnapshot>,
        world: &WorldSnapshot,
        profile: &BehaviorProfile,
    ) -> Decision {
        let metrics = MetricEngine::compute(agent, world, &self.config);
        let scores = self.evaluator.score_all(&metrics, profile);
        let cruise_speed = agent.map_or(1.0, |a| a.max_speed);

        let plan = self
            .strategic
            .plan(&world.objectives, &metrics, &scores, cruise_speed);
        self.memory.decide(
            world.time,
            &metrics,
            &scores,
            profile,
            &plan,
            &self.config.hysteresis,
        )
    }

    /// Shrinks the interval when the picture is unsettled, grows it when
    /// stable and confident.
    fn adapt_interval(&mut self, decision: &Decision, environment_changed: bool) {
        let cfg = &self.config.cadence;
        let stability = self.memory.stability();
        let confidence = self.memory.confidence();

        let unsettled =
            !decision.result.has_target() || environment_changed || stability < cfg.unstable_below;
        let settled = stability > cfg.stable_above && confidence > cfg.confident_above;

        let next = if unsettled {
            self.interval * cfg.shrink
        } else if settled {
            self.interval * cfg.grow
        } else {
            self.interval
        };
        self.interval = next.clamp(cfg.min_interval, cfg.max_interval);
        tracing::trace!(
            "ObjectivePlanner: interval={:.3} stability={:.3} confidence={:.3}",
            self.interval,
            stability,
            confidence
        );
    }

    fn report(&mut self, now: f32, signature: u64, profile: ProfileKind, decision: &Decision) {
        let transition = match decision.transition {
            Transition::Acquired(target) => {
                Some(PlannerEvent::TargetAcquired { time: now, target })
            }
            Transition::Switched { from, to, reason } => Some(PlannerEvent::TargetSwitched {
                time: now,
                from,
                to,
                reason,
            }),
            Transition::Cleared(previous) => {
                Some(PlannerEvent::TargetCleared { time: now, previous })
            }
            Transition::Held(_) | Transition::Idle => None,
        };
        if let Some(event) = transition {
            tracing::debug!("ObjectivePlanner: {:?}", event);
            self.emit(event);
        }
        self.emit(PlannerEvent::Recomputed {
            time: now,
            signature,
            profile,
            interval: self.interval,
            candidates: decision.candidates,
        });
    }

    fn emit(&mut self, event: PlannerEvent) {
        self.sink.record(&event);
    }

    pub fn current_target(&self) -> Option<ObjectiveId> {
        self.memory.current_target()
    }

    /// Seconds a cached selection stays valid while the signature is unchanged.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn stability(&self) -> f32 {
        self.memory.stability()
    }

    pub fn confidence(&self) -> f32 {
        self.memory.confidence()
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn memory(&self) -> &TargetMemory {
        &self.memory
    }

    pub fn strategic(&self) -> &StrategicPlanner {
        &self.strategic
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Forgets all cross-cycle state, e.g. at the start of a new match.
    pub fn reset(&mut self) {
        tracing::debug!("ObjectivePlanner: reset");
        self.memory.clear();
        self.strategic.clear();
        self.cache = None;
        self.interval = self.config.cadence.min_interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::RecordingSink;
    use arena_core::{ConfigError, GraphConfig, Objective, Ownership, Vec2};

    fn world(time: f32) -> WorldSnapshot {
        WorldSnapshot {
            time,
            time_remaining: 120.0,
            objectives: vec![
                Objective::new(ObjectiveId(1), Vec2::new(3.0, 0.0), 1.0, Ownership::Neutral),
                Objective::new(ObjectiveId(2), Vec2::new(8.0, 0.0), 1.0, Ownership::Neutral),
            ],
            ..WorldSnapshot::default()
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlannerConfig {
            graph: GraphConfig {
                neighbor_count: 0,
                ..GraphConfig::default()
            },
            ..PlannerConfig::default()
        };
        let err = ObjectivePlanner::new(config).err();
        assert_eq!(
            err,
            Some(PlannerError::InvalidConfig(ConfigError::Zero {
                field: "graph.neighbor_count"
            }))
        );
    }

    #[test]
    fn cached_result_is_reused_within_interval() {
        let mut planner =
            ObjectivePlanner::with_sink(PlannerConfig::default(), RecordingSink::new())
                .expect("default config is valid");
        let agent = AgentSnapshot::default();

        let first = planner.select_best_objective(Some(&agent), &world(0.0));
        let second = planner.select_best_objective(Some(&agent), &world(0.01));
        assert_eq!(first, second);

        let events = planner.sink().events();
        assert!(matches!(events.last(), Some(PlannerEvent::CacheHit { .. })));
        assert_eq!(events.last().map(PlannerEvent::time), Some(0.01));
        let recomputes = events
            .iter()
            .filter(|e| matches!(e, PlannerEvent::Recomputed { .. }))
            .count();
        assert_eq!(recomputes, 1);
    }

    #[test]
    fn time_regression_forces_recompute() {
        let mut planner =
            ObjectivePlanner::with_sink(PlannerConfig::default(), RecordingSink::new())
                .expect("default config is valid");
        let agent = AgentSnapshot::default();

        planner.select_best_objective(Some(&agent), &world(0.5));
        planner.select_best_objective(Some(&agent), &world(0.49));
        assert!(matches!(
            planner.sink().events().last(),
            Some(PlannerEvent::Recomputed { .. })
        ));
    }

    #[test]
    fn reset_clears_lock_and_cache() {
        let mut planner = ObjectivePlanner::default();
        let agent = AgentSnapshot::default();
        planner.select_best_objective(Some(&agent), &world(0.0));
        assert!(planner.current_target().is_some());

        planner.reset();
        assert_eq!(planner.current_target(), None);
        assert_eq!(planner.interval(), planner.config().cadence.min_interval);
    }

    #[test]
    fn missing_agent_yields_sentinel() {
        let mut planner = ObjectivePlanner::default();
        let result = planner.select_best_objective(None, &world(0.0));
        assert_eq!(result, SelectionResult::empty());
    }
}
