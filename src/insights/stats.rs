use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::insights::config::RegularityThresholds;
use crate::models::{PeriodRecord, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH};

/// Gaps at or above this many days are treated as data-entry errors.
pub const MAX_PLAUSIBLE_GAP_DAYS: i64 = 60;
pub const MIN_PERIODS_FOR_REGULARITY: usize = 3;
pub const MIN_GAPS_FOR_REGULARITY: usize = 2;
/// Difference between the latest cycle and the earlier mean that counts as a trend.
pub const TREND_THRESHOLD_DAYS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularity {
    VeryRegular,
    Regular,
    SomewhatIrregular,
    Irregular,
    InsufficientData,
}

impl Regularity {
    pub fn label(self) -> &'static str {
        match self {
            Regularity::VeryRegular => "very regular",
            Regularity::Regular => "regular",
            Regularity::SomewhatIrregular => "somewhat irregular",
            Regularity::Irregular => "irregular",
            Regularity::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for Regularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStatistics {
    pub period_count: usize,
    pub last_start: Option<NaiveDate>,
    /// Retained gaps between consecutive starts, most recent first.
    pub cycle_lengths: Vec<i64>,
    pub average_cycle_length: f64,
    pub average_period_length: f64,
    pub variation: Option<i64>,
    pub regularity: Regularity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Lengthening,
    Shortening,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTrend {
    pub direction: TrendDirection,
    pub latest_cycle_length: i64,
    pub earlier_average: f64,
}

pub fn sorted_most_recent_first(periods: &[PeriodRecord]) -> Vec<PeriodRecord> {
    let mut sorted = periods.to_vec();
    sorted.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    sorted
}

/// Day gaps between adjacent starts of an already-sorted history, outliers removed.
pub fn cycle_gaps(sorted: &[PeriodRecord]) -> Vec<i64> {
    sorted
        .windows(2)
        .map(|pair| (pair[0].start_date - pair[1].start_date).num_days().abs())
        .filter(|gap| *gap > 0 && *gap < MAX_PLAUSIBLE_GAP_DAYS)
        .collect()
}

fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total / count as f64)
}

/// Reduces a period history (any order) to aggregate cycle statistics.
pub fn compute_statistics(
    periods: &[PeriodRecord],
    thresholds: &RegularityThresholds,
) -> CycleStatistics {
    let sorted = sorted_most_recent_first(periods);
    let gaps = cycle_gaps(&sorted);

    let average_cycle_length = mean(gaps.iter().map(|g| *g as f64))
        .or_else(|| mean(sorted.iter().filter_map(|p| p.cycle_length).map(f64::from)))
        .unwrap_or(f64::from(DEFAULT_CYCLE_LENGTH));

    let average_period_length = mean(
        sorted
            .iter()
            .filter_map(PeriodRecord::observed_period_length)
            .map(f64::from),
    )
    .unwrap_or(f64::from(DEFAULT_PERIOD_LENGTH));

    let variation = match (gaps.iter().max(), gaps.iter().min()) {
        (Some(max), Some(min)) => Some(max - min),
        _ => None,
    };

    let regularity = match variation {
        Some(spread)
            if sorted.len() >= MIN_PERIODS_FOR_REGULARITY
                && gaps.len() >= MIN_GAPS_FOR_REGULARITY =>
        {
            thresholds.classify(spread)
        }
        _ => Regularity::InsufficientData,
    };

    CycleStatistics {
        period_count: sorted.len(),
        last_start: sorted.first().map(|p| p.start_date),
        cycle_lengths: gaps,
        average_cycle_length,
        average_period_length,
        variation,
        regularity,
    }
}

/// Compares the latest cycle with the mean of the ones before it.
pub fn detect_trend(stats: &CycleStatistics) -> Option<CycleTrend> {
    let (latest, earlier) = stats.cycle_lengths.split_first()?;
    let earlier_average = mean(earlier.iter().map(|g| *g as f64))?;

    let delta = *latest as f64 - earlier_average;
    let direction = if delta > TREND_THRESHOLD_DAYS {
        TrendDirection::Lengthening
    } else if delta < -TREND_THRESHOLD_DAYS {
        TrendDirection::Shortening
    } else {
        TrendDirection::Stable
    };

    Some(CycleTrend {
        direction,
        latest_cycle_length: *latest,
        earlier_average,
    })
}
