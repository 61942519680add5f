use crate::types::{Money, Period, Share};
use serde::{Deserialize, Serialize};

// ── Market ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Base demand in units, before scenario and share scaling.
    pub demand_base: f64,
    /// Demand multiplier applied during festival season.
    pub festival_multiplier: f64,
    /// Fraction of served demand that converts to revenue.
    pub revenue_factor: f64,
}

// ── Levers ─────────────────────────────────────────────────────────

/// Opex per quarter for each lever option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverCostConfig {
    pub delivery_responsive: Money,
    pub delivery_efficient: Money,
    pub inventory_high_buffer: Money,
    pub inventory_lean: Money,
    pub incentive_match: Money,
    pub incentive_standard: Money,
}

/// Service score contributions per lever option, plus the penalties
/// applied to efficiency choices when demand is not stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub delivery_responsive: i32,
    pub delivery_efficient: i32,
    pub inventory_high_buffer: i32,
    pub inventory_lean: i32,
    pub incentive_match: i32,
    pub incentive_standard: i32,
    pub lean_volatility_penalty: i32,
    pub efficient_delivery_volatility_penalty: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Scores at or above this are Excellent.
    pub excellent_threshold: i32,
    /// Scores at or above this (and below excellent) are Warning.
    pub warning_threshold: i32,
    pub excellent_share_delta: Share,
    pub warning_share_delta: Share,
    pub crisis_share_delta: Share,
}

// ── Scenarios ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Rolls below this are Stable.
    pub stable_upper: f64,
    /// Rolls below this (and at or above `stable_upper`) are Volatile.
    /// Everything else is festival season.
    pub volatile_upper: f64,
    /// The per-period seed is `period * seed_multiplier`.
    pub seed_multiplier: u64,
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of quarters in a full run.
    pub horizon: Period,
    pub starting_cash: Money,
    pub starting_own_share: Share,
    pub starting_competitor_share: Share,
    /// Falling below this own share ends the run.
    pub own_share_floor: Share,
    pub market: MarketConfig,
    pub costs: LeverCostConfig,
    pub service: ServiceConfig,
    pub tiers: TierConfig,
    pub scenarios: ScenarioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizon: 8,
            starting_cash: 500.0,
            starting_own_share: 59.0,
            starting_competitor_share: 5.0,
            own_share_floor: 40.0,
            market: MarketConfig {
                demand_base: 1000.0,
                festival_multiplier: 1.5,
                revenue_factor: 0.5,
            },
            costs: LeverCostConfig {
                delivery_responsive: 80.0,
                delivery_efficient: 30.0,
                inventory_high_buffer: 50.0,
                inventory_lean: 20.0,
                incentive_match: 60.0,
                incentive_standard: 20.0,
            },
            service: ServiceConfig {
                delivery_responsive: 40,
                delivery_efficient: 10,
                inventory_high_buffer: 40,
                inventory_lean: 10,
                incentive_match: 20,
                incentive_standard: 5,
                lean_volatility_penalty: 30,
                efficient_delivery_volatility_penalty: 20,
            },
            tiers: TierConfig {
                excellent_threshold: 85,
                warning_threshold: 60,
                excellent_share_delta: 0.5,
                warning_share_delta: -1.5,
                crisis_share_delta: -5.0,
            },
            scenarios: ScenarioConfig {
                stable_upper: 0.3,
                volatile_upper: 0.7,
                seed_multiplier: 99,
            },
        }
    }
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/game_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::info!("Loaded game config from {path}");
        Ok(config)
    }

    /// Reject configs the engine and generator cannot honour.
    pub fn validate(&self) -> crate::error::SimResult<()> {
        let fail = |reason: &str| -> crate::error::SimResult<()> {
            Err(crate::error::SimError::InvalidConfig { reason: reason.to_string() })
        };

        if self.horizon == 0 {
            return fail("horizon must be at least one period");
        }
        let s = &self.scenarios;
        if !(0.0 <= s.stable_upper && s.stable_upper <= s.volatile_upper && s.volatile_upper <= 1.0) {
            return fail("scenario bands must satisfy 0 <= stable_upper <= volatile_upper <= 1");
        }
        // Zero collapses every period onto the same seed.
        if s.seed_multiplier == 0 {
            return fail("scenario seed multiplier must be non-zero");
        }
        let t = &self.tiers;
        if !(0 <= t.warning_threshold && t.warning_threshold <= t.excellent_threshold && t.excellent_threshold <= 100) {
            return fail("tier thresholds must satisfy 0 <= warning <= excellent <= 100");
        }
        if self.max_base_service() < t.excellent_threshold {
            return fail("no decision can reach the excellent threshold");
        }
        if self.market.demand_base < 0.0 || self.market.festival_multiplier < 0.0 {
            return fail("demand base and festival multiplier must be non-negative");
        }
        Ok(())
    }

    /// Highest service score any decision can reach before clamping.
    pub fn max_base_service(&self) -> i32 {
        let s = &self.service;
        s.delivery_responsive.max(s.delivery_efficient)
            + s.inventory_high_buffer.max(s.inventory_lean)
            + s.incentive_match.max(s.incentive_standard)
    }
}
