//! The three quarterly levers and the decision that bundles them.
//!
//! Each lever has a "responsive" option that costs more and protects
//! service, and an "efficient" option that saves opex.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryFrequency {
    Responsive, // 4x daily
    Efficient,  // 1x daily
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InventoryPolicy {
    HighBuffer,
    Lean,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DealerIncentive {
    MatchCompetitor,
    Standard,
}

impl DeliveryFrequency {
    pub const ALL: [Self; 2] = [Self::Responsive, Self::Efficient];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Responsive => "4x Daily (Responsive)",
            Self::Efficient  => "1x Daily (Efficient)",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Responsive => "responsive",
            Self::Efficient  => "efficient",
        }
    }
}

impl InventoryPolicy {
    pub const ALL: [Self; 2] = [Self::HighBuffer, Self::Lean];

    pub fn label(&self) -> &'static str {
        match self {
            Self::HighBuffer => "High Buffer (Responsive)",
            Self::Lean       => "Lean (Efficient)",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::HighBuffer => "high_buffer",
            Self::Lean       => "lean",
        }
    }
}

impl DealerIncentive {
    pub const ALL: [Self; 2] = [Self::MatchCompetitor, Self::Standard];

    pub fn label(&self) -> &'static str {
        match self {
            Self::MatchCompetitor => "Match Competitor (High)",
            Self::Standard        => "Standard (Low)",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::MatchCompetitor => "match_competitor",
            Self::Standard        => "standard",
        }
    }
}

/// Parse an option from its short key or its display label.
fn parse_option<T: Copy>(
    field: &'static str,
    input: &str,
    options: &[T],
    key: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> SimResult<T> {
    let trimmed = input.trim();
    options
        .iter()
        .find(|o| key(*o).eq_ignore_ascii_case(trimmed) || label(*o).eq_ignore_ascii_case(trimmed))
        .copied()
        .ok_or_else(|| SimError::UnknownOption { field, value: input.to_string() })
}

impl FromStr for DeliveryFrequency {
    type Err = SimError;
    fn from_str(s: &str) -> SimResult<Self> {
        parse_option("delivery", s, &Self::ALL, Self::key, Self::label)
    }
}

impl FromStr for InventoryPolicy {
    type Err = SimError;
    fn from_str(s: &str) -> SimResult<Self> {
        parse_option("inventory", s, &Self::ALL, Self::key, Self::label)
    }
}

impl FromStr for DealerIncentive {
    type Err = SimError;
    fn from_str(s: &str) -> SimResult<Self> {
        parse_option("incentive", s, &Self::ALL, Self::key, Self::label)
    }
}

impl fmt::Display for DeliveryFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl fmt::Display for InventoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl fmt::Display for DealerIncentive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// One quarter's choices. Immutable once submitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DecisionSet {
    pub delivery:  DeliveryFrequency,
    pub inventory: InventoryPolicy,
    pub incentive: DealerIncentive,
}

impl DecisionSet {
    pub fn new(
        delivery: DeliveryFrequency,
        inventory: InventoryPolicy,
        incentive: DealerIncentive,
    ) -> Self {
        Self { delivery, inventory, incentive }
    }

    /// Every responsive option.
    pub fn all_responsive() -> Self {
        Self::new(
            DeliveryFrequency::Responsive,
            InventoryPolicy::HighBuffer,
            DealerIncentive::MatchCompetitor,
        )
    }

    /// Every efficient option.
    pub fn all_efficient() -> Self {
        Self::new(
            DeliveryFrequency::Efficient,
            InventoryPolicy::Lean,
            DealerIncentive::Standard,
        )
    }

    /// All eight lever combinations.
    pub fn all() -> impl Iterator<Item = Self> {
        DeliveryFrequency::ALL.into_iter().flat_map(|d| {
            InventoryPolicy::ALL.into_iter().flat_map(move |i| {
                DealerIncentive::ALL.into_iter().map(move |c| Self::new(d, i, c))
            })
        })
    }

    /// History label: keyed on the delivery choice alone.
    pub fn strategy_label(&self) -> &'static str {
        match self.delivery {
            DeliveryFrequency::Responsive => "Responsive",
            DeliveryFrequency::Efficient  => "Efficient",
        }
    }

    /// Build from three user-supplied strings (keys or labels).
    pub fn parse(delivery: &str, inventory: &str, incentive: &str) -> SimResult<Self> {
        Ok(Self::new(delivery.parse()?, inventory.parse()?, incentive.parse()?))
    }
}
