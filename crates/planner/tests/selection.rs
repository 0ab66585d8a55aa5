//! End-to-end selection scenarios through `ObjectivePlanner`.

use arena_core::{
    AgentSnapshot, CadenceConfig, HazardBody, MatchScore, Objective, ObjectiveId, Ownership,
    PlannerConfig, Vec2, WorldSnapshot,
};
use waypoint_planner::{
    BehaviorProfile, Consideration, Evaluator, MetricEngine, ObjectivePlanner, PlannerEvent,
    RecordingSink, SelectionResult,
};

fn objective(id: u32, x: f32, y: f32, owner: Ownership) -> Objective {
    Objective::new(ObjectiveId(id), Vec2::new(x, y), 1.0, owner)
}

fn arena(time: f32, objectives: Vec<Objective>) -> WorldSnapshot {
    WorldSnapshot {
        time,
        time_remaining: 120.0,
        objectives,
        ..WorldSnapshot::default()
    }
}

fn target_id(result: &SelectionResult) -> Option<ObjectiveId> {
    result.target.as_ref().map(|o| o.id)
}

// ============================================================================
// Basic selection
// ============================================================================

#[test]
fn closer_of_two_neutral_objectives_is_selected() {
    let mut planner = ObjectivePlanner::default();
    let agent = AgentSnapshot::default();
    let world = arena(
        0.0,
        vec![
            objective(1, 3.0, 0.0, Ownership::Neutral),
            objective(2, 8.0, 0.0, Ownership::Neutral),
        ],
    );

    let result = planner.select_best_objective(Some(&agent), &world);

    assert_eq!(target_id(&result), Some(ObjectiveId(1)));
    assert!(result.score.is_finite());
    assert!(result.estimated_time_to_target.is_finite());
    assert_eq!(
        result.future_objectives.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![ObjectiveId(2)]
    );
}

#[test]
fn zero_objectives_yield_the_empty_sentinel() {
    let mut planner = ObjectivePlanner::default();
    let agent = AgentSnapshot::default();
    let result = planner.select_best_objective(Some(&agent), &arena(0.0, Vec::new()));

    assert_eq!(result, SelectionResult::empty());
    assert!(result.score.is_infinite() && result.score < 0.0);
    assert!(result.estimated_time_to_target.is_infinite());
    assert!(planner.current_target().is_none());
}

#[test]
fn a_single_objective_is_always_selected() {
    for owner in [Ownership::Own, Ownership::Neutral, Ownership::Opponent] {
        let mut planner = ObjectivePlanner::default();
        let world = arena(0.0, vec![objective(7, -6.0, 2.0, owner)]);

        let result = planner.select_best_objective(Some(&AgentSnapshot::default()), &world);
        assert_eq!(target_id(&result), Some(ObjectiveId(7)), "owner {owner}");
        assert!(result.future_objectives.is_empty());
    }
}

#[test]
fn losing_every_objective_clears_the_target() {
    let mut planner = ObjectivePlanner::with_sink(PlannerConfig::default(), RecordingSink::new())
        .expect("default config is valid");
    let agent = AgentSnapshot::default();

    let single = arena(0.0, vec![objective(1, 4.0, 0.0, Ownership::Neutral)]);
    planner.select_best_objective(Some(&agent), &single);
    let result = planner.select_best_objective(Some(&agent), &arena(2.0, Vec::new()));

    assert_eq!(result, SelectionResult::empty());
    assert!(
        planner
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, PlannerEvent::TargetCleared { previous: ObjectiveId(1), .. }))
    );
}

// ============================================================================
// Contest scoring
// ============================================================================

#[test]
fn uncontested_objective_gets_a_positive_contest_term() {
    let config = PlannerConfig::default();
    let agent = AgentSnapshot::default();
    let mut world = arena(
        0.0,
        vec![
            objective(1, 10.0, 0.0, Ownership::Neutral),
            objective(2, -10.0, 0.0, Ownership::Opponent),
        ],
    );
    // A slow opponent already sitting on B and far out of reach of A.
    world
        .opponents
        .push(AgentSnapshot::at(Vec2::new(-10.5, 0.0)).with_max_speed(0.5));

    let metrics = MetricEngine::compute(Some(&agent), &world, &config);
    let a = &metrics[&ObjectiveId(1)].features;
    let b = &metrics[&ObjectiveId(2)].features;
    assert!(a.uncontested());
    assert!(!b.uncontested());
    assert!(b.enemy_eta < b.travel_time);

    let profile = BehaviorProfile::derive(&world, &config.profile);
    let evaluator = Evaluator::new(config.evaluator.clone());
    let a_contest = evaluator.breakdown(a, &profile).term(Consideration::Contest);
    let b_contest = evaluator.breakdown(b, &profile).term(Consideration::Contest);

    assert!(a_contest > 0.0);
    assert!(b_contest < 0.0);
    assert!(
        evaluator.breakdown(b, &profile).term(Consideration::Control)
            > evaluator.breakdown(a, &profile).term(Consideration::Control)
    );
}

#[test]
fn hazards_count_against_an_objective() {
    let mut planner = ObjectivePlanner::default();
    let agent = AgentSnapshot::default().with_heading(std::f32::consts::FRAC_PI_4);
    let mut world = arena(
        0.0,
        vec![
            objective(1, 6.0, 0.0, Ownership::Neutral),
            objective(2, 0.0, 6.5, Ownership::Neutral),
        ],
    );
    world.hazards.mines.push(HazardBody::new(Vec2::new(6.0, 0.5), 0.5));
    world.hazards.asteroids.push(HazardBody::new(Vec2::new(3.0, 0.0), 1.2));

    let result = planner.select_best_objective(Some(&agent), &world);
    assert_eq!(target_id(&result), Some(ObjectiveId(2)));
}

// ============================================================================
// Determinism and caching
// ============================================================================

fn replay(frames: &[WorldSnapshot]) -> Vec<SelectionResult> {
    let mut planner = ObjectivePlanner::default();
    let agent = AgentSnapshot::default().with_velocity(Vec2::new(1.0, 0.5));
    frames
        .iter()
        .map(|world| planner.select_best_objective(Some(&agent), world))
        .collect()
}

#[test]
fn identical_inputs_produce_identical_results() {
    let frames: Vec<WorldSnapshot> = (0..20)
        .map(|tick| {
            let mut world = arena(
                tick as f32 * 0.1,
                vec![
                    objective(1, 5.0, 5.0, Ownership::Neutral),
                    objective(2, -4.0, 6.0, Ownership::Opponent),
                    objective(3, 9.0, -3.0, Ownership::Own),
                    objective(4, -8.0, -8.0, Ownership::Neutral),
                ],
            );
            world.score = MatchScore::new(1, (tick / 10) * 2);
            world
        })
        .collect();

    let first = replay(&frames);
    let second = replay(&frames);
    assert_eq!(first, second);

    let json =
        |results: &[SelectionResult]| serde_json::to_string(results).expect("results serialize");
    assert_eq!(json(&first), json(&second));
}

#[test]
fn unchanged_environment_is_served_from_cache() {
    let mut planner = ObjectivePlanner::with_sink(PlannerConfig::default(), RecordingSink::new())
        .expect("default config is valid");
    let agent = AgentSnapshot::default();
    let objectives = vec![
        objective(1, 3.0, 0.0, Ownership::Neutral),
        objective(2, 8.0, 0.0, Ownership::Neutral),
    ];

    let first = planner.select_best_objective(Some(&agent), &arena(0.0, objectives.clone()));
    let cached = planner.select_best_objective(Some(&agent), &arena(0.02, objectives.clone()));
    assert_eq!(first, cached);
    assert!(matches!(planner.sink().events().last(), Some(PlannerEvent::CacheHit { .. })));

    // A capture changes the signature even inside the interval.
    let mut captured = objectives;
    captured[1].owner = Ownership::Opponent;
    planner.select_best_objective(Some(&agent), &arena(0.03, captured));
    assert!(matches!(planner.sink().events().last(), Some(PlannerEvent::Recomputed { .. })));
    assert_eq!(planner.strategic().rebuild_count(), 1);
}

fn steady_config() -> PlannerConfig {
    PlannerConfig {
        cadence: CadenceConfig {
            unstable_below: 0.0,
            stable_above: 0.0,
            confident_above: 0.0,
            time_bucket: 1000.0,
            ..CadenceConfig::default()
        },
        ..PlannerConfig::default()
    }
}

#[test]
fn interval_grows_while_stable_and_stays_bounded() {
    let config = steady_config();
    let cadence = config.cadence.clone();
    let mut planner = ObjectivePlanner::new(config).expect("config is valid");
    let agent = AgentSnapshot::default();
    let objectives = vec![objective(1, 3.0, 0.0, Ownership::Neutral)];

    planner.select_best_objective(Some(&agent), &arena(0.0, objectives.clone()));
    assert_eq!(planner.interval(), cadence.min_interval);

    let mut time = 0.0;
    for _ in 0..30 {
        let previous = planner.interval();
        time += previous + 0.001;
        planner.select_best_objective(Some(&agent), &arena(time, objectives.clone()));
        assert!(planner.interval() >= previous);
        assert!(planner.interval() <= cadence.max_interval);
    }
    assert_eq!(planner.interval(), cadence.max_interval);
}

#[test]
fn environment_change_shrinks_the_interval() {
    let config = steady_config();
    let min = config.cadence.min_interval;
    let mut planner = ObjectivePlanner::new(config).expect("config is valid");
    let agent = AgentSnapshot::default();
    let neutral = vec![objective(1, 3.0, 0.0, Ownership::Neutral)];

    let mut time = 0.0;
    for _ in 0..5 {
        planner.select_best_objective(Some(&agent), &arena(time, neutral.clone()));
        time += planner.interval() + 0.001;
    }
    let grown = planner.interval();
    assert!(grown > min);

    let contested = arena(time, vec![objective(1, 3.0, 0.0, Ownership::Opponent)]);
    planner.select_best_objective(Some(&agent), &contested);
    assert!(planner.interval() < grown);
    assert!(planner.interval() >= min);
}
