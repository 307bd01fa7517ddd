use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::insights::analysis::{analyze, CycleAnalysis};
use crate::insights::catalog;
use crate::insights::config::{InsightConfig, TrendPlacement};
use crate::insights::phase::{resolve_phase, CyclePosition, Phase};
use crate::insights::stats::{
    sorted_most_recent_first, CycleStatistics, CycleTrend, Regularity, TrendDirection,
};
use crate::insights::symptoms::display_name;
use crate::models::{InsightEntry, InsightKind, PeriodRecord, SymptomRecord};

/// Below this many usable periods only the "not enough data" entry is produced.
pub const MIN_PERIODS_FOR_INSIGHTS: usize = 2;
pub const TREND_MIN_PERIODS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedInsights {
    /// Free-text summary paragraph.
    pub insights: String,
    pub advanced_insights: Vec<InsightEntry>,
}

struct Composition {
    position: CyclePosition,
    entries: Vec<InsightEntry>,
}

/// Quick summary view.
pub fn compute_insights(
    periods: &[PeriodRecord],
    symptoms: &[SymptomRecord],
    today: NaiveDate,
    config: &InsightConfig,
) -> Vec<InsightEntry> {
    let periods = usable_periods(periods, today);
    if periods.len() < MIN_PERIODS_FOR_INSIGHTS {
        return vec![not_enough_data()];
    }

    let analysis = analyze(&periods, symptoms, config);
    match compose(&periods, &analysis, today, config) {
        Some(composition) => composition.entries,
        None => vec![not_enough_data()],
    }
}

/// Detailed view. Reuses `precomputed` when the caller already has it and adds
/// a summary paragraph alongside the entries.
pub fn compute_enhanced_insights(
    periods: &[PeriodRecord],
    symptoms: &[SymptomRecord],
    precomputed: Option<&CycleAnalysis>,
    today: NaiveDate,
    config: &InsightConfig,
) -> EnhancedInsights {
    let periods = usable_periods(periods, today);
    if periods.len() < MIN_PERIODS_FOR_INSIGHTS {
        return not_enough_data_enhanced();
    }

    let computed;
    let analysis = match precomputed {
        Some(analysis) => analysis,
        None => {
            computed = analyze(&periods, symptoms, config);
            &computed
        }
    };

    match compose(&periods, analysis, today, config) {
        Some(composition) => EnhancedInsights {
            insights: summary_paragraph(composition.position, analysis),
            advanced_insights: composition.entries,
        },
        None => not_enough_data_enhanced(),
    }
}

fn usable_periods(periods: &[PeriodRecord], today: NaiveDate) -> Vec<PeriodRecord> {
    let (usable, future): (Vec<PeriodRecord>, Vec<PeriodRecord>) =
        periods.iter().cloned().partition(|p| p.start_date <= today);
    if !future.is_empty() {
        tracing::warn!(count = future.len(), %today, "⚠️ Ignoring future-dated periods");
    }
    sorted_most_recent_first(&usable)
}

fn compose(
    periods: &[PeriodRecord],
    analysis: &CycleAnalysis,
    today: NaiveDate,
    config: &InsightConfig,
) -> Option<Composition> {
    let stats = &analysis.statistics;
    let last_start = periods.first()?.start_date;
    let position = match resolve_phase(
        last_start,
        stats.average_cycle_length,
        stats.average_period_length,
        today,
        config.phase_boundary,
    ) {
        Ok(position) => position,
        Err(e) => {
            tracing::warn!(error = %e, "⚠️ Could not place today in the cycle");
            return None;
        }
    };

    let mut entries = vec![cycle_entry(stats), phase_entry(position)];
    if let Some(entry) = symptom_entry(&analysis.symptoms.top) {
        entries.push(entry);
    }

    let trend = analysis
        .trend
        .as_ref()
        .filter(|_| periods.len() >= TREND_MIN_PERIODS)
        .map(trend_entry);
    let recommendations = [nutrition_entry(position.phase), exercise_entry(position.phase)];
    match (config.trend_placement, trend) {
        (TrendPlacement::BeforeRecommendations, Some(trend)) => {
            entries.push(trend);
            entries.extend(recommendations);
        }
        (TrendPlacement::AfterRecommendations, Some(trend)) => {
            entries.extend(recommendations);
            entries.push(trend);
        }
        _ => entries.extend(recommendations),
    }

    Some(Composition { position, entries })
}

fn not_enough_data() -> InsightEntry {
    InsightEntry::new(
        InsightKind::Info,
        catalog::NOT_ENOUGH_DATA_TITLE,
        catalog::NOT_ENOUGH_DATA_DESCRIPTION,
    )
    .recommending(catalog::NOT_ENOUGH_DATA_RECOMMENDATION)
}

fn not_enough_data_enhanced() -> EnhancedInsights {
    EnhancedInsights {
        insights: format!(
            "{} {}",
            catalog::NOT_ENOUGH_DATA_DESCRIPTION,
            catalog::NOT_ENOUGH_DATA_RECOMMENDATION
        ),
        advanced_insights: vec![not_enough_data()],
    }
}

fn rounded_days(days: f64) -> i64 {
    days.round() as i64
}

fn cycle_entry(stats: &CycleStatistics) -> InsightEntry {
    let average = rounded_days(stats.average_cycle_length);
    let description = match stats.regularity {
        Regularity::InsufficientData => format!(
            "Your average cycle length is {average} days. Keep tracking to find out how regular your cycles are."
        ),
        regularity => {
            format!("Your cycles appear to be {regularity} with an average length of {average} days.")
        }
    };
    InsightEntry::new(InsightKind::Cycle, "Your Cycle Pattern", description)
        .recommending(catalog::CYCLE_RECOMMENDATION)
}

fn phase_entry(position: CyclePosition) -> InsightEntry {
    InsightEntry::new(
        InsightKind::Phase,
        format!("Current {} Phase", position.phase.title()),
        catalog::phase_description(position.phase, position.day_of_cycle),
    )
    .recommending(catalog::phase_recommendation(position.phase))
}

fn symptom_entry(top: &[String]) -> Option<InsightEntry> {
    if top.is_empty() {
        return None;
    }
    let names: Vec<String> = top.iter().map(|s| display_name(s)).collect();
    Some(
        InsightEntry::new(
            InsightKind::Symptom,
            "Your Common Symptoms",
            format!("Your most frequently tracked symptoms are {}.", names.join(", ")),
        )
        .recommending(catalog::SYMPTOM_RECOMMENDATION),
    )
}

fn nutrition_entry(phase: Phase) -> InsightEntry {
    InsightEntry::new(
        InsightKind::Nutrition,
        format!("Nutrition for {} Phase", phase.title()),
        catalog::nutrition(phase),
    )
    .recommending(catalog::NUTRITION_RECOMMENDATION)
}

fn exercise_entry(phase: Phase) -> InsightEntry {
    InsightEntry::new(
        InsightKind::Exercise,
        format!("Exercise for {} Phase", phase.title()),
        catalog::exercise(phase),
    )
    .recommending(catalog::EXERCISE_RECOMMENDATION)
}

fn trend_entry(trend: &CycleTrend) -> InsightEntry {
    let latest = trend.latest_cycle_length;
    let earlier = rounded_days(trend.earlier_average);
    let description = match trend.direction {
        TrendDirection::Lengthening => format!(
            "Your most recent cycle was {latest} days, longer than your earlier average of {earlier} days."
        ),
        TrendDirection::Shortening => format!(
            "Your most recent cycle was {latest} days, shorter than your earlier average of {earlier} days."
        ),
        TrendDirection::Stable => format!(
            "Your most recent cycle was {latest} days, in line with your earlier average of {earlier} days."
        ),
    };
    InsightEntry::new(InsightKind::Trend, "Recent Cycle Trend", description)
        .recommending(catalog::TREND_RECOMMENDATION)
}

fn join_with_and(items: &[String]) -> Option<String> {
    match items {
        [] => None,
        [only] => Some(only.clone()),
        [init @ .., last] => Some(format!("{} and {}", init.join(", "), last)),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn summary_paragraph(position: CyclePosition, analysis: &CycleAnalysis) -> String {
    let stats = &analysis.statistics;
    let phase = position.phase;
    let average = rounded_days(stats.average_cycle_length);

    let mut sentences = vec![format!(
        "You're currently on day {} of your cycle in the {} phase, where your body is {}.",
        position.day_of_cycle,
        phase,
        catalog::phase_activity(phase)
    )];

    sentences.push(match stats.regularity {
        Regularity::InsufficientData => format!(
            "As you track more cycles, we'll be able to analyze your cycle regularity; so far your cycles average {average} days."
        ),
        regularity => {
            format!("Your cycles appear to be {regularity} with an average length of {average} days.")
        }
    });

    let top = &analysis.symptoms.top;
    let names: Vec<String> = top.iter().map(|s| display_name(s)).collect();
    if let Some(list) = join_with_and(&names) {
        sentences.push(format!("You commonly experience {list}."));
    }

    for symptom_type in top {
        let pattern = analysis
            .symptom_patterns
            .iter()
            .find(|p| &p.symptom_type == symptom_type);
        if let Some((pattern, timing)) = pattern.and_then(|p| p.most_common.map(|t| (p, t))) {
            sentences.push(format!(
                "{} is most often logged {} ({}% of entries).",
                capitalize(&display_name(symptom_type)),
                timing.phrase(),
                pattern.most_common_percent
            ));
        }
    }

    sentences.push(format!(
        "During this phase: {}",
        catalog::phase_recommendation(phase)
    ));
    sentences.push(catalog::SUMMARY_CLOSING.to_string());
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::config::{PhaseBoundary, RegularityThresholds};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(start: &str, cycle: u32, length: u32) -> PeriodRecord {
        PeriodRecord {
            start_date: date(start),
            end_date: None,
            cycle_length: Some(cycle),
            period_length: Some(length),
        }
    }

    fn symptom(day: &str, kind: &str) -> SymptomRecord {
        SymptomRecord {
            date: date(day),
            symptom_type: kind.to_string(),
            severity: Some(3),
            notes: None,
        }
    }

    fn three_months() -> Vec<PeriodRecord> {
        vec![
            period("2024-03-01", 28, 5),
            period("2024-02-01", 30, 5),
            period("2024-01-03", 29, 5),
        ]
    }

    #[test]
    fn oversized_lengths_yield_insights_without_a_prediction() {
        // 100 days apart is an outlier gap, so the stored cycle length drives the mean
        let periods = vec![
            period("2024-03-01", 1_000_000_000, 4_000_000_000),
            period("2023-11-22", 1_000_000_000, 5),
        ];
        let config = InsightConfig::default();

        let entries = compute_insights(&periods, &[], date("2024-03-10"), &config);
        assert_eq!(entries[0].kind, InsightKind::Cycle);
        assert_eq!(analyze(&periods, &[], &config).next_period, None);
    }

    fn kinds(entries: &[InsightEntry]) -> Vec<InsightKind> {
        entries.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn fewer_than_two_periods_yields_single_info_entry() {
        let config = InsightConfig::default();
        let today = date("2024-03-10");

        for periods in [vec![], vec![period("2024-03-01", 28, 5)]] {
            let entries = compute_insights(
                &periods,
                &[symptom("2024-03-02", "cramps")],
                today,
                &config,
            );
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].kind, InsightKind::Info);
            assert_eq!(entries[0].title, "Not enough data");

            let enhanced = compute_enhanced_insights(&periods, &[], None, today, &config);
            assert_eq!(kinds(&enhanced.advanced_insights), vec![InsightKind::Info]);
        }
    }

    #[test]
    fn three_month_history_end_to_end() {
        let entries = compute_insights(
            &three_months(),
            &[],
            date("2024-03-10"),
            &InsightConfig::default(),
        );

        assert_eq!(
            kinds(&entries),
            vec![
                InsightKind::Cycle,
                InsightKind::Phase,
                InsightKind::Nutrition,
                InsightKind::Exercise,
                InsightKind::Trend,
            ]
        );
        assert_eq!(
            entries[0].description,
            "Your cycles appear to be very regular with an average length of 29 days."
        );
        assert_eq!(entries[1].title, "Current Follicular Phase");
        assert!(entries[1].description.contains("day 10 of your cycle"));
        assert_eq!(entries[2].title, "Nutrition for Follicular Phase");
        assert_eq!(entries[3].description, catalog::exercise(Phase::Follicular));
        assert!(entries[4].description.contains("in line with"));
    }

    #[test]
    fn symptom_entry_follows_phase_entry() {
        let symptoms = vec![
            symptom("2024-03-01", "cramps"),
            symptom("2024-03-02", "cramps"),
            symptom("2024-03-02", "mood_swings"),
            symptom("2024-03-03", "cramps"),
        ];
        let entries = compute_insights(
            &three_months(),
            &symptoms,
            date("2024-03-10"),
            &InsightConfig::default(),
        );

        assert_eq!(entries[2].kind, InsightKind::Symptom);
        assert_eq!(
            entries[2].description,
            "Your most frequently tracked symptoms are cramps, mood swings."
        );
    }

    #[test]
    fn trend_placement_is_configurable() {
        let today = date("2024-03-10");
        let before = InsightConfig {
            trend_placement: TrendPlacement::BeforeRecommendations,
            ..InsightConfig::default()
        };
        let omit = InsightConfig {
            trend_placement: TrendPlacement::Omit,
            ..InsightConfig::default()
        };

        let entries = compute_insights(&three_months(), &[], today, &before);
        assert_eq!(
            kinds(&entries),
            vec![
                InsightKind::Cycle,
                InsightKind::Phase,
                InsightKind::Trend,
                InsightKind::Nutrition,
                InsightKind::Exercise,
            ]
        );

        let entries = compute_insights(&three_months(), &[], today, &omit);
        assert!(!kinds(&entries).contains(&InsightKind::Trend));
    }

    #[test]
    fn two_periods_get_no_trend_and_no_regularity_label() {
        let all = three_months();
        let entries = compute_insights(
            &all[..2],
            &[],
            date("2024-03-10"),
            &InsightConfig::default(),
        );

        assert_eq!(entries.len(), 4);
        assert!(!kinds(&entries).contains(&InsightKind::Trend));
        assert!(entries[0].description.starts_with("Your average cycle length is 29 days."));
    }

    #[test]
    fn future_dated_periods_are_ignored() {
        let mut periods = three_months();
        periods.push(period("2024-04-01", 28, 5));

        let with_future = compute_insights(
            &periods,
            &[],
            date("2024-03-10"),
            &InsightConfig::default(),
        );
        let without = compute_insights(
            &three_months(),
            &[],
            date("2024-03-10"),
            &InsightConfig::default(),
        );
        assert_eq!(with_future, without);

        // only one period left once the future one is dropped
        let sparse = vec![period("2024-03-01", 28, 5), period("2024-04-01", 28, 5)];
        let entries = compute_insights(&sparse, &[], date("2024-03-10"), &InsightConfig::default());
        assert_eq!(kinds(&entries), vec![InsightKind::Info]);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let symptoms = vec![symptom("2024-02-28", "bloating"), symptom("2024-03-02", "cramps")];
        let config = InsightConfig::default();
        let today = date("2024-03-10");

        let a = compute_enhanced_insights(&three_months(), &symptoms, None, today, &config);
        let b = compute_enhanced_insights(&three_months(), &symptoms, None, today, &config);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn enhanced_summary_folds_in_symptom_patterns() {
        let symptoms = vec![
            symptom("2024-03-02", "cramps"),
            symptom("2024-03-03", "cramps"),
            symptom("2024-02-28", "lower_back_pain"),
        ];
        let result = compute_enhanced_insights(
            &three_months(),
            &symptoms,
            None,
            date("2024-03-10"),
            &InsightConfig::default(),
        );

        assert!(result.insights.starts_with(
            "You're currently on day 10 of your cycle in the follicular phase"
        ));
        assert!(result.insights.contains("You commonly experience cramps and lower back pain."));
        assert!(result
            .insights
            .contains("Cramps is most often logged during your period (100% of entries)."));
        assert!(result
            .insights
            .contains("Lower back pain is most often logged in the days before your period"));
        assert_eq!(result.advanced_insights[2].kind, InsightKind::Symptom);
    }

    #[test]
    fn enhanced_uses_precomputed_analysis() {
        let config = InsightConfig::default();
        let today = date("2024-03-10");
        let mut analysis = analyze(&three_months(), &[], &config);
        analysis.statistics.regularity = Regularity::Irregular;
        analysis.statistics.average_cycle_length = 35.0;

        let result = compute_enhanced_insights(
            &three_months(),
            &[],
            Some(&analysis),
            today,
            &config,
        );
        assert_eq!(
            result.advanced_insights[0].description,
            "Your cycles appear to be irregular with an average length of 35 days."
        );
        assert!(result.insights.contains("irregular with an average length of 35 days"));
    }

    #[test]
    fn inclusive_boundary_moves_boundary_day_to_earlier_phase() {
        // 28-day cycle, 14 days elapsed: exactly 0.50 * 28
        let periods = vec![
            period("2024-02-01", 28, 5),
            period("2024-01-04", 28, 5),
            period("2023-12-07", 28, 5),
        ];
        let today = date("2024-02-15");

        let exclusive = compute_insights(&periods, &[], today, &InsightConfig::default());
        assert_eq!(exclusive[1].title, "Current Luteal Phase");

        let inclusive = InsightConfig {
            phase_boundary: PhaseBoundary::Inclusive,
            ..InsightConfig::default()
        };
        let entries = compute_insights(&periods, &[], today, &inclusive);
        assert_eq!(entries[1].title, "Current Ovulation Phase");
    }

    #[test]
    fn summary_thresholds_relabel_three_day_spread() {
        // gaps 31 and 28
        let periods = vec![
            period("2024-03-30", 28, 5),
            period("2024-02-28", 28, 5),
            period("2024-01-31", 28, 5),
        ];
        let summary = InsightConfig {
            regularity: RegularityThresholds::SUMMARY,
            ..InsightConfig::default()
        };
        let today = date("2024-04-02");

        let detailed = compute_insights(&periods, &[], today, &InsightConfig::default());
        let relaxed = compute_insights(&periods, &[], today, &summary);
        assert!(detailed[0].description.starts_with("Your cycles appear to be regular"));
        assert!(relaxed[0].description.starts_with("Your cycles appear to be very regular"));
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let entries = compute_insights(&[], &[], date("2024-03-10"), &InsightConfig::default());
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["type"], "info");
        assert_eq!(json[0]["title"], "Not enough data");
    }

    #[test]
    fn join_with_and_formats_lists() {
        let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_with_and(&items[..0]), None);
        assert_eq!(join_with_and(&items[..1]).as_deref(), Some("a"));
        assert_eq!(join_with_and(&items[..2]).as_deref(), Some("a and b"));
        assert_eq!(join_with_and(&items).as_deref(), Some("a, b and c"));
    }
}
