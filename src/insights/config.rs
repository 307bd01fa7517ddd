use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownSetting;
use crate::insights::stats::Regularity;

/// Upper bounds (inclusive, in days of variation) for each regularity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularityThresholds {
    pub very_regular: i64,
    pub regular: i64,
    pub somewhat_irregular: i64,
}

impl RegularityThresholds {
    /// Used by the detailed insight view.
    pub const DETAILED: Self = Self {
        very_regular: 2,
        regular: 5,
        somewhat_irregular: 10,
    };

    /// Used by the summary view, which tolerates one more day of spread.
    pub const SUMMARY: Self = Self {
        very_regular: 3,
        regular: 5,
        somewhat_irregular: 10,
    };

    pub fn classify(&self, variation: i64) -> Regularity {
        if variation <= self.very_regular {
            Regularity::VeryRegular
        } else if variation <= self.regular {
            Regularity::Regular
        } else if variation <= self.somewhat_irregular {
            Regularity::SomewhatIrregular
        } else {
            Regularity::Irregular
        }
    }
}

impl Default for RegularityThresholds {
    fn default() -> Self {
        Self::DETAILED
    }
}

impl FromStr for RegularityThresholds {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::DETAILED),
            "summary" => Ok(Self::SUMMARY),
            other => Err(UnknownSetting {
                setting: "regularity thresholds",
                value: other.to_string(),
            }),
        }
    }
}

/// Where the trend entry goes relative to the nutrition/exercise entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPlacement {
    BeforeRecommendations,
    #[default]
    AfterRecommendations,
    Omit,
}

impl FromStr for TrendPlacement {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::BeforeRecommendations),
            "after" => Ok(Self::AfterRecommendations),
            "omit" | "none" => Ok(Self::Omit),
            other => Err(UnknownSetting {
                setting: "trend placement",
                value: other.to_string(),
            }),
        }
    }
}

/// Which phase a day landing exactly on a phase boundary belongs to.
///
/// `Exclusive` compares with `<`, so the boundary day opens the later phase.
/// `Inclusive` compares with `<=`, so it closes the earlier one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseBoundary {
    #[default]
    Exclusive,
    Inclusive,
}

impl PhaseBoundary {
    pub fn is_before(self, days: f64, limit: f64) -> bool {
        match self {
            PhaseBoundary::Exclusive => days < limit,
            PhaseBoundary::Inclusive => days <= limit,
        }
    }
}

impl FromStr for PhaseBoundary {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclusive" => Ok(Self::Exclusive),
            "inclusive" => Ok(Self::Inclusive),
            other => Err(UnknownSetting {
                setting: "phase boundary",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    pub regularity: RegularityThresholds,
    pub trend_placement: TrendPlacement,
    pub phase_boundary: PhaseBoundary,
}
