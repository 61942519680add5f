//! Analyst report: trend figures derived from a run's history.

use crate::{
    scenario::ScenarioType,
    state::{GameState, TurnRecord},
    types::{Money, Period, Share},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioBreakdown {
    pub scenario:       ScenarioType,
    pub turns:          usize,
    pub average_profit: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub turns_played:  usize,
    pub total_profit:  Money,
    pub final_cash:    Money,
    pub final_share:   Share,
    /// Final own share minus the share the run started with.
    pub share_change:  Share,
    pub best_quarter:  Option<(Period, Money)>,
    pub worst_quarter: Option<(Period, Money)>,
    pub by_scenario:   Vec<ScenarioBreakdown>,
    pub share_trend:   Vec<(Period, Share)>,
    pub profit_trend:  Vec<(Period, Money)>,
}

impl RunReport {
    pub fn build(state: &GameState, starting_share: Share) -> Self {
        let history = state.history();

        let by_scenario = ScenarioType::ALL
            .iter()
            .filter_map(|&scenario| {
                let profits: Vec<Money> = history
                    .iter()
                    .filter(|r| r.scenario == scenario)
                    .map(|r| r.profit)
                    .collect();
                if profits.is_empty() {
                    return None;
                }
                Some(ScenarioBreakdown {
                    scenario,
                    turns: profits.len(),
                    average_profit: profits.iter().sum::<Money>() / profits.len() as f64,
                })
            })
            .collect();

        Self {
            turns_played: history.len(),
            total_profit: history.iter().map(|r| r.profit).sum(),
            final_cash: state.cash,
            final_share: state.own_share,
            share_change: state.own_share - starting_share,
            best_quarter: extreme(history, |a, b| a > b),
            worst_quarter: extreme(history, |a, b| a < b),
            by_scenario,
            share_trend: history.iter().map(|r| (r.period, r.market_share_end)).collect(),
            profit_trend: history.iter().map(|r| (r.period, r.profit)).collect(),
        }
    }
}

/// First record whose profit beats every other under `better`.
fn extreme(history: &[TurnRecord], better: fn(Money, Money) -> bool) -> Option<(Period, Money)> {
    history.iter().fold(None, |acc, r| match acc {
        Some((_, best)) if !better(r.profit, best) => acc,
        _ => Some((r.period, r.profit)),
    })
}
