//! Scenario generator: one demand regime per period.
//!
//! The draw is a pure function of the period number. Asking twice for
//! the same period always returns the same scenario, and nothing about
//! earlier draws leaks into later ones.

use crate::{
    config::ScenarioConfig,
    error::{SimError, SimResult},
    rng::PeriodRng,
    types::Period,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Serialized under its display name, which is also what exports carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScenarioType {
    #[serde(rename = "Stable")]
    Stable,
    #[serde(rename = "Volatile")]
    Volatile,
    #[serde(rename = "Festival Season")]
    FestivalSeason,
}

impl ScenarioType {
    pub const ALL: [Self; 3] = [Self::Stable, Self::Volatile, Self::FestivalSeason];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Stable         => "Stable",
            Self::Volatile       => "Volatile",
            Self::FestivalSeason => "Festival Season",
        }
    }

    /// Flavour text shown to the player before they decide.
    pub fn context(&self) -> &'static str {
        match self {
            Self::Stable => "Demand is flat. A quiet quarter.",
            Self::Volatile => {
                "Competitor price war! The challenger is undercutting prices aggressively."
            }
            Self::FestivalSeason => {
                "Festival peak! Demand is skyrocketing and highly unpredictable."
            }
        }
    }

    /// Volatile and festival demand punish efficiency choices.
    pub fn is_volatile(&self) -> bool {
        !matches!(self, Self::Stable)
    }
}

impl FromStr for ScenarioType {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SimError::UnknownOption { field: "scenario", value: s.to_string() })
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The scenario for one period, with the roll that produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDraw {
    pub period:   Period,
    pub scenario: ScenarioType,
    pub roll:     f64,
}

impl ScenarioDraw {
    pub fn context(&self) -> &'static str {
        self.scenario.context()
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    config: ScenarioConfig,
}

impl ScenarioGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Map a roll in [0, 1) onto the three bands.
    pub fn classify(&self, roll: f64) -> ScenarioType {
        if roll < self.config.stable_upper {
            ScenarioType::Stable
        } else if roll < self.config.volatile_upper {
            ScenarioType::Volatile
        } else {
            ScenarioType::FestivalSeason
        }
    }

    pub fn draw(&self, period: Period) -> ScenarioDraw {
        let roll = PeriodRng::new(period, self.config.seed_multiplier).next_f64();
        let scenario = self.classify(roll);
        log::debug!("period={period} scenario: roll={roll:.4} -> {scenario}");
        ScenarioDraw { period, scenario, roll }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn generator() -> ScenarioGenerator {
        ScenarioGenerator::new(GameConfig::default().scenarios)
    }

    #[test]
    fn band_edges_belong_to_the_upper_band() {
        let g = generator();
        assert_eq!(g.classify(0.0), ScenarioType::Stable);
        assert_eq!(g.classify(0.299_999), ScenarioType::Stable);
        assert_eq!(g.classify(0.3), ScenarioType::Volatile);
        assert_eq!(g.classify(0.699_999), ScenarioType::Volatile);
        assert_eq!(g.classify(0.7), ScenarioType::FestivalSeason);
        assert_eq!(g.classify(0.999_999), ScenarioType::FestivalSeason);
    }

    #[test]
    fn draw_matches_classified_roll() {
        let g = generator();
        for period in 1..=50 {
            let draw = g.draw(period);
            assert_eq!(draw.period, period);
            assert_eq!(draw.scenario, g.classify(draw.roll));
        }
    }

    #[test]
    fn only_stable_is_calm() {
        assert!(!ScenarioType::Stable.is_volatile());
        assert!(ScenarioType::Volatile.is_volatile());
        assert!(ScenarioType::FestivalSeason.is_volatile());
    }

    #[test]
    fn festival_display_name_has_a_space() {
        assert_eq!(ScenarioType::FestivalSeason.to_string(), "Festival Season");
    }

    #[test]
    fn serialized_form_is_the_display_name() {
        for scenario in ScenarioType::ALL {
            let json = serde_json::to_string(&scenario).unwrap();
            assert_eq!(json, format!("\"{}\"", scenario.name()));
            assert_eq!(scenario.name().parse::<ScenarioType>().unwrap(), scenario);
        }
        assert_eq!(
            serde_json::from_str::<ScenarioType>("\"Festival Season\"").unwrap(),
            ScenarioType::FestivalSeason
        );
    }

    #[test]
    fn unknown_scenario_name_is_rejected() {
        let err = "festival_season".parse::<ScenarioType>().unwrap_err();
        assert!(matches!(err, SimError::UnknownOption { field: "scenario", .. }));
    }
}
