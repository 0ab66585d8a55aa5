//! Target memory: score smoothing, revisit cooldowns and switch hysteresis.
//!
//! The memory owns every piece of cross-cycle state the planner keeps about
//! objectives. Each cycle it turns raw scores into adjusted, smoothed scores
//! and decides whether the current lock holds.
//!
//! # Lock states
//!
//! ```text
//! NoTarget --(first candidate)--> Locked
//! Locked   --(hold or switch)---> Locked
//! Locked   --(no candidates)----> NoTarget
//! ```

use std::collections::BTreeMap;

use arena_core::{EPSILON, HysteresisConfig, ObjectiveId};

use crate::features::{MetricMap, ScoreMap};
use crate::graph::StrategicPlan;
use crate::profile::BehaviorProfile;
use crate::selection::SelectionResult;

/// Per-objective score history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreHistory {
    pub last_raw: f32,
    pub smoothed: f32,
}

/// The committed target and when it was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetLock {
    pub target: ObjectiveId,
    pub locked_at: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, serde::Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum LockState {
    NoTarget,
    Locked,
}

/// Why the lock moved to another objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, serde::Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum SwitchReason {
    /// Candidate cleared both the absolute and relative score thresholds.
    ScoreMargin,
    /// Candidate arrives sooner by at least the configured margin.
    EtaWin,
    /// The previous target disappeared from the candidate pool.
    TargetInvalidated,
}

/// What happened to the lock during one decision.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Transition {
    /// No lock before and no candidates now.
    Idle,
    Held(ObjectiveId),
    Acquired(ObjectiveId),
    Switched {
        from: ObjectiveId,
        to: ObjectiveId,
        reason: SwitchReason,
    },
    Cleared(ObjectiveId),
}

/// Result of [`TargetMemory::decide`].
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub result: SelectionResult,
    pub transition: Transition,
    /// Number of objectives that were scored and eligible this cycle.
    pub candidates: usize,
}

/// Cross-cycle target state.
#[derive(Clone, Debug, Default)]
pub struct TargetMemory {
    history: BTreeMap<ObjectiveId, ScoreHistory>,
    vacated: BTreeMap<ObjectiveId, f32>,
    lock: Option<TargetLock>,
    last_switch: Option<f32>,
    volatility: f32,
    stability: f32,
    confidence: f32,
}

impl TargetMemory {
    pub fn new() -> Self {
        Self {
            stability: 1.0,
            ..Self::default()
        }
    }

    pub fn current_target(&self) -> Option<ObjectiveId> {
        self.lock.map(|lock| lock.target)
    }

    pub fn lock(&self) -> Option<TargetLock> {
        self.lock
    }

    pub fn state(&self) -> LockState {
        if self.lock.is_some() {
            LockState::Locked
        } else {
            LockState::NoTarget
        }
    }

    /// Stability in `(0, 1]`; one when scores are not moving.
    pub fn stability(&self) -> f32 {
        self.stability
    }

    pub fn volatility(&self) -> f32 {
        self.volatility
    }

    /// Confidence in `[0, 1]` in the current target.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn history(&self, id: ObjectiveId) -> Option<&ScoreHistory> {
        self.history.get(&id)
    }

    /// Time the objective was last vacated, if it is still remembered.
    pub fn vacated_at(&self, id: ObjectiveId) -> Option<f32> {
        self.vacated.get(&id).copied()
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Penalty applied to a vacated objective `elapsed` seconds after it was
    /// left. Decays linearly to zero at the end of the cooldown.
    pub fn revisit_penalty(elapsed: f32, cfg: &HysteresisConfig) -> f32 {
        if cfg.revisit_cooldown <= 0.0 {
            return 0.0;
        }
        let remaining = 1.0 - elapsed.max(0.0) / cfg.revisit_cooldown;
        cfg.revisit_penalty * remaining.clamp(0.0, 1.0)
    }

    /// Runs one decision cycle.
    pub fn decide(
        &mut self,
        now: f32,
        metrics: &MetricMap,
        scores: &ScoreMap,
        profile: &BehaviorProfile,
        plan: &StrategicPlan<'_>,
        cfg: &HysteresisConfig,
    ) -> Decision {
        let previous = self.current_target();
        let invalidated =
            previous.filter(|id| !(metrics.contains_key(id) && scores.contains_key(id)));
        if let Some(id) = invalidated {
            tracing::debug!("TargetMemory: target {} no longer valid, clearing lock", id);
            self.lock = None;
        }

        let smoothed = self.smooth(now, metrics, scores, profile, cfg);
        self.prune(now, metrics, cfg);

        let Some(best) = best_of(&smoothed, None) else {
            self.lock = None;
            self.confidence = 0.0;
            let transition = match previous {
                Some(id) => Transition::Cleared(id),
                None => Transition::Idle,
            };
            tracing::debug!("TargetMemory: no candidates ({:?})", transition);
            return Decision {
                result: SelectionResult::empty(),
                transition,
                candidates: 0,
            };
        };

        let transition = match (self.lock, invalidated) {
            (None, Some(from)) => {
                self.switch_to(best, now);
                Transition::Switched {
                    from,
                    to: best,
                    reason: SwitchReason::TargetInvalidated,
                }
            }
            (None, None) => {
                self.switch_to(best, now);
                Transition::Acquired(best)
            }
            (Some(lock), _) => self.arbitrate(lock, now, &smoothed, metrics, cfg),
        };

        let target = self.current_target().unwrap_or(best);
        let score = smoothed.get(&target).copied().unwrap_or(f32::NEG_INFINITY);
        self.confidence = self.estimate_confidence(now, score, profile, cfg);

        Decision {
            result: build_result(target, score, metrics, plan),
            transition,
            candidates: smoothed.len(),
        }
    }

    /// Applies momentum, cooldown and retention, then smooths.
    ///
    /// Returns the smoothed score of every eligible objective and updates the
    /// volatility estimate.
    fn smooth(
        &mut self,
        now: f32,
        metrics: &MetricMap,
        scores: &ScoreMap,
        profile: &BehaviorProfile,
        cfg: &HysteresisConfig,
    ) -> BTreeMap<ObjectiveId, f32> {
        let locked = self.current_target();
        let mut smoothed = BTreeMap::new();
        let mut delta_sum = 0.0;
        let mut delta_count = 0usize;

        for (&id, &raw) in scores {
            if !metrics.contains_key(&id) {
                tracing::warn!("TargetMemory: {} scored without metrics, skipping", id);
                continue;
            }
            let prior = self.history.get(&id).copied();

            let momentum = prior.map_or(0.0, |h| (raw - h.last_raw) * cfg.momentum_weight);
            let cooldown = self
                .vacated
                .get(&id)
                .map_or(0.0, |&left| Self::revisit_penalty(now - left, cfg));
            let retention = if locked == Some(id) { cfg.retention_bonus } else { 0.0 };
            let adjusted = raw + momentum - cooldown + retention;

            let value = match prior {
                Some(h) => {
                    let next = h.smoothed + profile.smoothing * (adjusted - h.smoothed);
                    delta_sum += (next - h.smoothed).abs();
                    delta_count += 1;
                    next
                }
                None => adjusted,
            };
            tracing::trace!(
                "  TargetMemory {}: raw={:.3} momentum={:.3} cooldown={:.3} smoothed={:.3}",
                id,
                raw,
                momentum,
                cooldown,
                value
            );

            self.history.insert(
                id,
                ScoreHistory {
                    last_raw: raw,
                    smoothed: value,
                },
            );
            smoothed.insert(id, value);
        }

        if delta_count > 0 {
            let average = delta_sum / delta_count as f32;
            self.volatility += cfg.volatility_rate * (average - self.volatility);
        }
        self.stability = if cfg.volatility_scale > 0.0 {
            1.0 / (1.0 + self.volatility / cfg.volatility_scale)
        } else {
            1.0
        };
        smoothed
    }

    /// Decides whether the current lock holds against the best alternative.
    fn arbitrate(
        &mut self,
        lock: TargetLock,
        now: f32,
        smoothed: &BTreeMap<ObjectiveId, f32>,
        metrics: &MetricMap,
        cfg: &HysteresisConfig,
    ) -> Transition {
        let current = lock.target;
        let Some(challenger) = best_of(smoothed, Some(current)) else {
            return Transition::Held(current);
        };
        let (Some(&held), Some(&offered)) = (smoothed.get(&current), smoothed.get(&challenger))
        else {
            return Transition::Held(current);
        };

        let improvement = offered - held;
        let relative = improvement / held.abs().max(EPSILON);
        let in_window = now - lock.locked_at < cfg.lock_window;
        let (absolute_min, relative_min) = if in_window {
            (cfg.locked_absolute, cfg.locked_relative)
        } else {
            (cfg.relaxed_absolute, cfg.relaxed_relative)
        };
        let score_win = improvement > absolute_min && relative > relative_min;

        let eta = |id: &ObjectiveId| {
            metrics
                .get(id)
                .map_or(f32::INFINITY, |m| m.features.travel_time)
        };
        // Arriving sooner overrides the score test, even for a lower score.
        let eta_win = eta(&challenger) + cfg.eta_margin < eta(&current);

        tracing::debug!(
            "TargetMemory: {} ({:.3}) vs {} ({:.3}): improvement={:.3} relative={:.3} \
             window={} eta_win={}",
            current,
            held,
            challenger,
            offered,
            improvement,
            relative,
            in_window,
            eta_win
        );

        let reason = if eta_win {
            SwitchReason::EtaWin
        } else if score_win {
            SwitchReason::ScoreMargin
        } else {
            return Transition::Held(current);
        };
        self.vacated.insert(current, now);
        self.switch_to(challenger, now);
        Transition::Switched {
            from: current,
            to: challenger,
            reason,
        }
    }

    fn switch_to(&mut self, target: ObjectiveId, now: f32) {
        self.lock = Some(TargetLock {
            target,
            locked_at: now,
        });
        self.last_switch = Some(now);
    }

    fn estimate_confidence(
        &self,
        now: f32,
        score: f32,
        profile: &BehaviorProfile,
        cfg: &HysteresisConfig,
    ) -> f32 {
        if !score.is_finite() {
            return 0.0;
        }
        let since = self.last_switch.map_or(0.0, |t| (now - t).max(0.0));
        let decay = if cfg.confidence_decay > 0.0 {
            (-since / cfg.confidence_decay).exp()
        } else {
            1.0
        };
        let magnitude = score.max(0.0);
        let normalized = if cfg.score_normalizer > 0.0 {
            magnitude / (magnitude + cfg.score_normalizer)
        } else {
            1.0
        };
        (decay * normalized * profile.confidence_bias).clamp(0.0, 1.0)
    }

    /// Forgets objectives that vanished and cooldowns that expired.
    fn prune(&mut self, now: f32, metrics: &MetricMap, cfg: &HysteresisConfig) {
        self.history.retain(|id, _| metrics.contains_key(id));
        self.vacated
            .retain(|id, left| metrics.contains_key(id) && now - *left < cfg.revisit_cooldown);
    }
}

/// Highest scoring objective, lower id on ties.
fn best_of(
    scores: &BTreeMap<ObjectiveId, f32>,
    excluding: Option<ObjectiveId>,
) -> Option<ObjectiveId> {
    let mut best: Option<(ObjectiveId, f32)> = None;
    for (&id, &score) in scores {
        if Some(id) == excluding {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

fn build_result(
    target: ObjectiveId,
    score: f32,
    metrics: &MetricMap,
    plan: &StrategicPlan<'_>,
) -> SelectionResult {
    let Some(entry) = metrics.get(&target) else {
        return SelectionResult::empty();
    };
    let future_objectives = plan
        .forecast(target)
        .into_iter()
        .filter_map(|id| metrics.get(&id).map(|m| m.objective.clone()))
        .collect();

    SelectionResult {
        target: Some(entry.objective.clone()),
        score,
        estimated_time_to_target: entry.features.travel_time,
        future_objectives,
    }
}
