//! The turn loop.
//!
//! STATE MACHINE:
//!   AwaitingDecision --submit--> TurnComplete --evaluate--> AwaitingDecision | GameOver
//!
//! Both transitions happen inside one submit_decision() call, so callers
//! never observe a half-applied turn. GameOver only ends with a new run.

use crate::{
    config::GameConfig,
    decision::DecisionSet,
    engine::{SimulationEngine, TurnResult},
    error::{SimError, SimResult},
    scenario::{ScenarioDraw, ScenarioGenerator},
    state::{GameState, RunOutcome, TurnPhase, TurnRecord},
    types::RunId,
};

#[derive(Debug, Clone)]
pub struct GameController {
    config:    GameConfig,
    engine:    SimulationEngine,
    scenarios: ScenarioGenerator,
}

impl GameController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: SimulationEngine::new(config.clone()),
            scenarios: ScenarioGenerator::new(config.scenarios.clone()),
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Start a fresh run with a random run id.
    pub fn start_run(&self) -> GameState {
        self.start_run_with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn start_run_with_id(&self, run_id: RunId) -> GameState {
        log::info!(
            "run={run_id} started: cash={:.0} share={:.1} competitor={:.1} horizon={}",
            self.config.starting_cash,
            self.config.starting_own_share,
            self.config.starting_competitor_share,
            self.config.horizon,
        );
        GameState::new(run_id, &self.config)
    }

    /// Throw the old run away and begin again.
    pub fn restart(&self, old: GameState) -> GameState {
        log::info!("run={} abandoned at period {}", old.run_id, old.period);
        self.start_run()
    }

    /// The scenario for the state's current period. Idempotent.
    pub fn current_scenario(&self, state: &GameState) -> ScenarioDraw {
        self.scenarios.draw(state.period)
    }

    pub fn is_terminal(&self, state: &GameState) -> bool {
        state.is_terminal()
    }

    pub fn history<'a>(&self, state: &'a GameState) -> &'a [TurnRecord] {
        state.history()
    }

    pub fn outcome(&self, state: &GameState) -> Option<RunOutcome> {
        state.outcome(&self.config)
    }

    /// Play one quarter. Fails only when the run is already over, and
    /// then leaves the state untouched.
    pub fn submit_decision(
        &self,
        state: &mut GameState,
        decision: DecisionSet,
    ) -> SimResult<TurnResult> {
        if state.is_terminal() || self.run_is_over(state) {
            log::warn!(
                "run={} rejected decision: game over at period {}",
                state.run_id,
                state.period
            );
            return Err(SimError::InvalidState {
                run_id: state.run_id.clone(),
                period: state.period,
            });
        }

        let draw = self.current_scenario(state);
        let result = self.engine.evaluate(&decision, draw.scenario, state.own_share);

        self.apply(state, &draw, &decision, &result);
        self.evaluate_termination(state);

        log::info!(
            "run={} period={} {} {}: profit={:.2} share={:.2} cash={:.2} tier={:?}",
            state.run_id,
            draw.period,
            draw.scenario,
            decision.strategy_label(),
            result.profit,
            state.own_share,
            state.cash,
            result.feedback_tier,
        );

        Ok(result)
    }

    fn apply(
        &self,
        state: &mut GameState,
        draw: &ScenarioDraw,
        decision: &DecisionSet,
        result: &TurnResult,
    ) {
        state.cash += result.profit;
        state.own_share += result.share_delta;
        state.competitor_share -= result.share_delta;
        state.last_feedback = Some(result.feedback_tier);
        state.push_record(TurnRecord::new(
            draw.period,
            draw.scenario,
            decision.strategy_label(),
            result.profit,
            state.own_share,
        ));
        state.period += 1;
        state.phase = TurnPhase::TurnComplete;
    }

    /// True once the horizon is passed, cash is negative or share is under the floor.
    fn run_is_over(&self, state: &GameState) -> bool {
        state.period > self.config.horizon
            || state.cash < 0.0
            || state.own_share < self.config.own_share_floor
    }

    fn evaluate_termination(&self, state: &mut GameState) {
        if self.run_is_over(state) {
            state.phase = TurnPhase::GameOver;
            if let Some(outcome) = state.outcome(&self.config) {
                log::info!(
                    "run={} game over after {} turns: {} (cash={:.2} share={:.2})",
                    state.run_id,
                    state.turns_completed(),
                    outcome.as_str(),
                    state.cash,
                    state.own_share,
                );
            }
        } else {
            state.phase = TurnPhase::AwaitingDecision;
        }
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
