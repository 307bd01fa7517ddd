use serde::{Deserialize, Serialize};

use crate::insights::config::InsightConfig;
use crate::insights::phase::{predict_next_period, NextPeriod};
use crate::insights::stats::{
    compute_statistics, detect_trend, sorted_most_recent_first, CycleStatistics, CycleTrend,
};
use crate::insights::symptoms::{
    summarize_symptoms, symptom_patterns, SymptomPattern, SymptomSummary,
};
use crate::models::{PeriodRecord, SymptomRecord};

/// Everything derived from a history before any text is produced. Served by
/// `/cycle-stats` and accepted back by `POST /insights` to skip recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleAnalysis {
    pub statistics: CycleStatistics,
    #[serde(default)]
    pub trend: Option<CycleTrend>,
    #[serde(default)]
    pub symptoms: SymptomSummary,
    #[serde(default)]
    pub symptom_patterns: Vec<SymptomPattern>,
    #[serde(default)]
    pub next_period: Option<NextPeriod>,
}

pub fn analyze(
    periods: &[PeriodRecord],
    symptoms: &[SymptomRecord],
    config: &InsightConfig,
) -> CycleAnalysis {
    let sorted = sorted_most_recent_first(periods);
    let statistics = compute_statistics(&sorted, &config.regularity);
    let trend = detect_trend(&statistics);
    let next_period = statistics.last_start.and_then(|start| {
        predict_next_period(
            start,
            statistics.average_cycle_length,
            statistics.average_period_length,
        )
    });

    CycleAnalysis {
        trend,
        symptoms: summarize_symptoms(symptoms),
        symptom_patterns: symptom_patterns(symptoms, &sorted),
        next_period,
        statistics,
    }
}
