//! The simulation engine: scores one quarter.
//!
//! EVALUATION ORDER (fixed, never reordered):
//!   1. Opex: one cost per lever.
//!   2. Base service score: one contribution per lever.
//!   3. Volatility penalty: efficiency choices lose points unless demand is stable.
//!   4. Clamp the score to [0, 100].
//!   5. Tier and share delta by hard threshold on the clamped score.
//!   6. Revenue from the share held BEFORE this quarter's delta.
//!   7. Profit = revenue - opex.
//!
//! RULES:
//!   - evaluate() is a pure function of its arguments and the config.
//!   - Every input combination is valid; the engine never fails.
//!   - Tiers are cliffs. No interpolation between thresholds.

use crate::{
    config::GameConfig,
    decision::{DealerIncentive, DecisionSet, DeliveryFrequency, InventoryPolicy},
    scenario::ScenarioType,
    types::{Money, Share},
};
use serde::{Deserialize, Serialize};

pub const MIN_SERVICE_SCORE: i32 = 0;
pub const MAX_SERVICE_SCORE: i32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    Excellent,
    Warning,
    Crisis,
}

impl FeedbackTier {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Dealers are happy. Availability is high.",
            Self::Warning => {
                "Dealers are grumbling. Some are stocking the challenger alongside yours."
            }
            Self::Crisis => {
                "DISASTER! Stockouts during peak demand. Dealers are furious and aggressively pushing the challenger."
            }
        }
    }
}

/// Output of one engine evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TurnResult {
    pub profit:        Money,
    pub share_delta:   Share,
    pub service_score: i32,
    pub feedback_tier: FeedbackTier,
    pub opex:          Money,
    pub revenue:       Money,
}

#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: GameConfig,
}

impl SimulationEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        decision: &DecisionSet,
        scenario: ScenarioType,
        current_own_share: Share,
    ) -> TurnResult {
        let opex = self.opex(decision);
        let service_score = self.service_score(decision, scenario);
        let (feedback_tier, share_delta) = self.tier(service_score);
        let revenue = self.revenue(scenario, current_own_share, service_score);
        let profit = revenue - opex;

        log::debug!(
            "scenario={scenario} decision={}/{}/{} score={service_score} tier={feedback_tier:?} \
             revenue={revenue:.2} opex={opex:.2} profit={profit:.2}",
            decision.delivery.key(),
            decision.inventory.key(),
            decision.incentive.key(),
        );

        TurnResult { profit, share_delta, service_score, feedback_tier, opex, revenue }
    }

    pub fn opex(&self, decision: &DecisionSet) -> Money {
        let c = &self.config.costs;
        let logistics = match decision.delivery {
            DeliveryFrequency::Responsive => c.delivery_responsive,
            DeliveryFrequency::Efficient  => c.delivery_efficient,
        };
        let inventory = match decision.inventory {
            InventoryPolicy::HighBuffer => c.inventory_high_buffer,
            InventoryPolicy::Lean       => c.inventory_lean,
        };
        let incentive = match decision.incentive {
            DealerIncentive::MatchCompetitor => c.incentive_match,
            DealerIncentive::Standard        => c.incentive_standard,
        };
        logistics + inventory + incentive
    }

    /// Service score before any volatility penalty.
    pub fn base_service_score(&self, decision: &DecisionSet) -> i32 {
        let s = &self.config.service;
        let delivery = match decision.delivery {
            DeliveryFrequency::Responsive => s.delivery_responsive,
            DeliveryFrequency::Efficient  => s.delivery_efficient,
        };
        let inventory = match decision.inventory {
            InventoryPolicy::HighBuffer => s.inventory_high_buffer,
            InventoryPolicy::Lean       => s.inventory_lean,
        };
        let incentive = match decision.incentive {
            DealerIncentive::MatchCompetitor => s.incentive_match,
            DealerIncentive::Standard        => s.incentive_standard,
        };
        delivery + inventory + incentive
    }

    /// Points lost to volatile demand. Zero under stable demand.
    pub fn volatility_penalty(&self, decision: &DecisionSet, scenario: ScenarioType) -> i32 {
        if !scenario.is_volatile() {
            return 0;
        }
        let s = &self.config.service;
        let mut penalty = 0;
        if decision.inventory == InventoryPolicy::Lean {
            penalty += s.lean_volatility_penalty;
        }
        if decision.delivery == DeliveryFrequency::Efficient {
            penalty += s.efficient_delivery_volatility_penalty;
        }
        penalty
    }

    /// Clamped service score in [0, 100].
    pub fn service_score(&self, decision: &DecisionSet, scenario: ScenarioType) -> i32 {
        let raw = self.base_service_score(decision) - self.volatility_penalty(decision, scenario);
        raw.clamp(MIN_SERVICE_SCORE, MAX_SERVICE_SCORE)
    }

    pub fn tier(&self, service_score: i32) -> (FeedbackTier, Share) {
        let t = &self.config.tiers;
        if service_score >= t.excellent_threshold {
            (FeedbackTier::Excellent, t.excellent_share_delta)
        } else if service_score >= t.warning_threshold {
            (FeedbackTier::Warning, t.warning_share_delta)
        } else {
            (FeedbackTier::Crisis, t.crisis_share_delta)
        }
    }

    pub fn demand_multiplier(&self, scenario: ScenarioType) -> f64 {
        match scenario {
            ScenarioType::FestivalSeason => self.config.market.festival_multiplier,
            ScenarioType::Stable | ScenarioType::Volatile => 1.0,
        }
    }

    pub fn revenue(&self, scenario: ScenarioType, current_own_share: Share, service_score: i32) -> Money {
        let m = &self.config.market;
        m.demand_base
            * self.demand_multiplier(scenario)
            * (current_own_share / 100.0)
            * (f64::from(service_score) / 100.0)
            * m.revenue_factor
    }
}
