//! Run state: the single mutable record of a game.
//!
//! RULE: GameState is only mutated by GameController::submit_decision.
//! Each completed turn bumps the period by exactly one and appends
//! exactly one TurnRecord. History is never rewritten.

use crate::{
    config::GameConfig,
    engine::FeedbackTier,
    scenario::ScenarioType,
    types::{round2, Money, Period, RunId, Share},
};
use serde::{Deserialize, Serialize};

/// Where the run sits in the turn loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingDecision,
    TurnComplete,
    GameOver,
}

/// Why a terminal run ended. Checked in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    ShareCollapse,
    Bankrupt,
    Completed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShareCollapse => "share_collapse",
            Self::Bankrupt      => "bankrupt",
            Self::Completed     => "completed",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::ShareCollapse => "You lost your dominance. The challenger has commoditized the market.",
            Self::Bankrupt      => "You went bankrupt trying to fight a price war.",
            Self::Completed     => "Simulation complete.",
        }
    }
}

/// One completed quarter, in its exported shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnRecord {
    pub period:           Period,
    pub scenario:         ScenarioType,
    pub strategy:         String,
    /// Rounded to 2 decimal places.
    pub profit:           Money,
    /// Own share after the turn, rounded to 2 decimal places.
    pub market_share_end: Share,
}

impl TurnRecord {
    pub fn new(
        period: Period,
        scenario: ScenarioType,
        strategy: &str,
        profit: Money,
        market_share_end: Share,
    ) -> Self {
        Self {
            period,
            scenario,
            strategy: strategy.to_string(),
            profit: round2(profit),
            market_share_end: round2(market_share_end),
        }
    }
}

/// Fields are crate-private: only the controller moves a run forward,
/// and a finished run can only be replaced, never reopened.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GameState {
    pub(crate) run_id:           RunId,
    pub(crate) period:           Period,
    pub(crate) cash:             Money,
    /// Unclamped: may leave [0, 100] on long or custom runs.
    pub(crate) own_share:        Share,
    /// Unclamped: moves opposite to own_share every turn.
    pub(crate) competitor_share: Share,
    pub(crate) phase:            TurnPhase,
    pub(crate) last_feedback:    Option<FeedbackTier>,
    history:                     Vec<TurnRecord>,
}

impl GameState {
    pub fn new(run_id: RunId, config: &GameConfig) -> Self {
        Self {
            run_id,
            period: 1,
            cash: config.starting_cash,
            own_share: config.starting_own_share,
            competitor_share: config.starting_competitor_share,
            phase: TurnPhase::AwaitingDecision,
            last_feedback: None,
            history: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    pub fn own_share(&self) -> Share {
        self.own_share
    }

    pub fn competitor_share(&self) -> Share {
        self.competitor_share
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn last_feedback(&self) -> Option<FeedbackTier> {
        self.last_feedback
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn turns_completed(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn push_record(&mut self, record: TurnRecord) {
        self.history.push(record);
    }

    /// Classify a terminal run. None while the run is still live.
    pub fn outcome(&self, config: &GameConfig) -> Option<RunOutcome> {
        if !self.is_terminal() {
            return None;
        }
        Some(if self.own_share < config.own_share_floor {
            RunOutcome::ShareCollapse
        } else if self.cash < 0.0 {
            RunOutcome::Bankrupt
        } else {
            RunOutcome::Completed
        })
    }
}
