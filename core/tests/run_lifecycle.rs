//! Run lifecycle tests: state updates, history, termination and restart.

use paintsim_core::{
    config::GameConfig,
    controller::GameController,
    decision::DecisionSet,
    error::SimError,
    state::{GameState, RunOutcome, TurnPhase},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(config: GameConfig, run_id: &str) -> (GameController, GameState) {
    init_logging();
    let controller = GameController::new(config);
    let state = controller.start_run_with_id(run_id.to_string());
    (controller, state)
}

#[test]
fn start_run_uses_configured_constants() {
    let (controller, state) = build(GameConfig::default(), "start-test");
    assert_eq!(state.period(), 1);
    assert_eq!(state.cash(), 500.0);
    assert_eq!(state.own_share(), 59.0);
    assert_eq!(state.competitor_share(), 5.0);
    assert!(state.history().is_empty());
    assert!(!controller.is_terminal(&state));
    assert_eq!(state.phase(), TurnPhase::AwaitingDecision);
    assert!(state.last_feedback().is_none());
}

#[test]
fn start_run_assigns_fresh_ids() {
    let controller = GameController::default();
    let a = controller.start_run();
    let b = controller.start_run();
    assert_ne!(a.run_id(), b.run_id());
}

#[test]
fn submit_applies_result_to_state() {
    let (controller, mut state) = build(GameConfig::default(), "apply-test");
    let draw = controller.current_scenario(&state);
    let expected = controller
        .engine()
        .evaluate(&DecisionSet::all_responsive(), draw.scenario, state.own_share());

    let result = controller
        .submit_decision(&mut state, DecisionSet::all_responsive())
        .expect("first turn");

    assert_eq!(result, expected);
    assert_eq!(state.period(), 2);
    assert!((state.cash() - (500.0 + result.profit)).abs() < 1e-9);
    assert_eq!(state.own_share(), 59.5);
    assert_eq!(state.competitor_share(), 4.5);
    assert_eq!(state.last_feedback(), Some(result.feedback_tier));

    let record = &state.history()[0];
    assert_eq!(record.period, 1);
    assert_eq!(record.scenario, draw.scenario);
    assert_eq!(record.strategy, "Responsive");
    assert_eq!(record.market_share_end, 59.5);
    assert_eq!(record.profit, (result.profit * 100.0).round() / 100.0);
}

#[test]
fn period_and_history_advance_in_lockstep() {
    let (controller, mut state) = build(GameConfig::default(), "lockstep-test");
    for turn in 1..=5u32 {
        controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();
        assert_eq!(state.period(), turn + 1);
        assert_eq!(state.history().len(), turn as usize);
        assert_eq!(state.history().last().unwrap().period, turn);
    }
}

#[test]
fn competitor_moves_opposite_to_own_share_every_turn() {
    let (controller, mut state) = build(GameConfig::default(), "zero-sum-test");
    let decisions = [
        DecisionSet::all_responsive(),
        DecisionSet::all_efficient(),
        DecisionSet::all_responsive(),
        DecisionSet::all_efficient(),
    ];
    for decision in decisions {
        let own_before = state.own_share();
        let competitor_before = state.competitor_share();
        controller.submit_decision(&mut state, decision).unwrap();
        let own_delta = state.own_share() - own_before;
        let competitor_delta = state.competitor_share() - competitor_before;
        assert!(
            (own_delta + competitor_delta).abs() < 1e-9,
            "own moved {own_delta}, competitor moved {competitor_delta}"
        );
    }
}

#[test]
fn all_responsive_run_completes_at_horizon() {
    let (controller, mut state) = build(GameConfig::default(), "horizon-test");
    for _ in 0..8 {
        assert!(!state.is_terminal());
        controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();
    }
    assert!(state.is_terminal());
    assert_eq!(state.period(), 9);
    assert_eq!(state.history().len(), 8);
    assert_eq!(state.own_share(), 63.0);
    assert_eq!(state.competitor_share(), 1.0);
    assert!(state.cash() > 500.0, "every responsive quarter is profitable");
    assert_eq!(controller.outcome(&state), Some(RunOutcome::Completed));
}

#[test]
fn all_efficient_run_collapses_share_after_four_turns() {
    let (controller, mut state) = build(GameConfig::default(), "collapse-test");
    for _ in 0..3 {
        controller.submit_decision(&mut state, DecisionSet::all_efficient()).unwrap();
        assert!(!state.is_terminal());
    }
    controller.submit_decision(&mut state, DecisionSet::all_efficient()).unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.own_share(), 39.0);
    assert_eq!(state.period(), 5);
    assert!(state.cash() >= 0.0);
    assert_eq!(controller.outcome(&state), Some(RunOutcome::ShareCollapse));
}

#[test]
fn dropping_just_below_floor_ends_run_immediately() {
    let config = GameConfig { starting_own_share: 44.9, ..GameConfig::default() };
    let (controller, mut state) = build(config, "floor-test");

    controller.submit_decision(&mut state, DecisionSet::all_efficient()).unwrap();

    assert!((state.own_share() - 39.9).abs() < 1e-9);
    assert!(state.period() <= 8);
    assert!(state.cash() >= 0.0);
    assert!(state.is_terminal());
    assert_eq!(state.phase(), TurnPhase::GameOver);
}

#[test]
fn landing_exactly_on_floor_keeps_playing() {
    let config = GameConfig { starting_own_share: 45.0, ..GameConfig::default() };
    let (controller, mut state) = build(config, "floor-edge-test");

    controller.submit_decision(&mut state, DecisionSet::all_efficient()).unwrap();

    assert_eq!(state.own_share(), 40.0);
    assert!(!state.is_terminal());
}

#[test]
fn negative_cash_means_bankruptcy() {
    let mut config = GameConfig { starting_cash: 100.0, ..GameConfig::default() };
    config.market.demand_base = 0.0;
    let (controller, mut state) = build(config, "bankrupt-test");

    let result = controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();

    assert_eq!(result.profit, -190.0);
    assert_eq!(state.cash(), -90.0);
    assert!(state.is_terminal());
    assert_eq!(controller.outcome(&state), Some(RunOutcome::Bankrupt));
}

#[test]
fn terminal_run_rejects_decisions_without_mutating() {
    let config = GameConfig { horizon: 1, ..GameConfig::default() };
    let (controller, mut state) = build(config, "reject-test");
    controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();
    assert!(state.is_terminal());

    let before = state.clone();
    let err = controller
        .submit_decision(&mut state, DecisionSet::all_responsive())
        .unwrap_err();

    match err {
        SimError::InvalidState { run_id, period } => {
            assert_eq!(run_id, "reject-test");
            assert_eq!(period, 2);
        }
        other => panic!("expected InvalidState, got {other:?}"),
    }
    assert_eq!(state, before);
}

#[test]
fn finished_run_stays_finished_after_repeated_submits() {
    let config = GameConfig { horizon: 1, ..GameConfig::default() };
    let (controller, mut state) = build(config, "stay-over-test");
    controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();

    for decision in [DecisionSet::all_responsive(), DecisionSet::all_efficient()] {
        assert!(controller.submit_decision(&mut state, decision).is_err());
        assert_eq!(state.phase(), TurnPhase::GameOver);
    }
    assert_eq!(state.period(), 2);
    assert_eq!(state.history().len(), 1);
    assert_eq!(controller.outcome(&state), Some(RunOutcome::Completed));
}

#[test]
fn restart_replaces_terminal_run() {
    let config = GameConfig { horizon: 1, ..GameConfig::default() };
    let (controller, mut state) = build(config, "restart-test");
    controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();
    assert!(state.is_terminal());

    let old_id = state.run_id().to_string();
    let mut fresh = controller.restart(state);

    assert_ne!(fresh.run_id(), old_id);
    assert_eq!(fresh.period(), 1);
    assert!(fresh.history().is_empty());
    controller
        .submit_decision(&mut fresh, DecisionSet::all_responsive())
        .expect("new run accepts decisions");
}

#[test]
fn shares_are_not_clamped() {
    // Competitor starts at 1.0; eight excellent quarters take it to -3.0.
    let config = GameConfig { starting_competitor_share: 1.0, ..GameConfig::default() };
    let (controller, mut state) = build(config, "unclamped-test");
    while !state.is_terminal() {
        controller.submit_decision(&mut state, DecisionSet::all_responsive()).unwrap();
    }
    assert_eq!(state.competitor_share(), -3.0);
    assert_eq!(state.own_share(), 63.0);
}

#[test]
fn independent_runs_do_not_share_state() {
    let controller = GameController::default();
    let mut a = controller.start_run_with_id("run-a".into());
    let mut b = controller.start_run_with_id("run-b".into());

    controller.submit_decision(&mut a, DecisionSet::all_efficient()).unwrap();
    controller.submit_decision(&mut a, DecisionSet::all_efficient()).unwrap();
    controller.submit_decision(&mut b, DecisionSet::all_responsive()).unwrap();

    assert_eq!(a.period(), 3);
    assert_eq!(b.period(), 2);
    assert_eq!(a.own_share(), 49.0);
    assert_eq!(b.own_share(), 59.5);
}

#[test]
fn identical_decisions_replay_identically() {
    let controller = GameController::default();
    let mut a = controller.start_run_with_id("replay".into());
    let mut b = controller.start_run_with_id("replay".into());
    let plan = [
        DecisionSet::all_responsive(),
        DecisionSet::all_efficient(),
        DecisionSet::all_responsive(),
    ];
    for decision in plan {
        controller.submit_decision(&mut a, decision).unwrap();
        controller.submit_decision(&mut b, decision).unwrap();
    }
    assert_eq!(a, b);
}
