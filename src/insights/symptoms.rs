use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{PeriodRecord, SymptomRecord};

pub const TOP_SYMPTOM_COUNT: usize = 3;
/// Days either side of a period that still count as "before" / "after" it.
pub const TIMING_WINDOW_DAYS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomFrequency {
    pub symptom_type: String,
    pub count: usize,
    pub average_severity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomSummary {
    /// In first-encountered order.
    pub frequencies: Vec<SymptomFrequency>,
    /// Most frequent types, ties kept in first-encountered order.
    pub top: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomTiming {
    Before,
    During,
    After,
}

impl SymptomTiming {
    pub fn phrase(self) -> &'static str {
        match self {
            SymptomTiming::Before => "in the days before your period",
            SymptomTiming::During => "during your period",
            SymptomTiming::After => "in the days after your period",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPattern {
    pub symptom_type: String,
    pub before: usize,
    pub during: usize,
    pub after: usize,
    pub unclassified: usize,
    pub most_common: Option<SymptomTiming>,
    /// Share of this symptom's records that fall in `most_common`, 0-100.
    pub most_common_percent: u32,
}

impl SymptomPattern {
    fn new(symptom_type: &str) -> Self {
        Self {
            symptom_type: symptom_type.to_string(),
            before: 0,
            during: 0,
            after: 0,
            unclassified: 0,
            most_common: None,
            most_common_percent: 0,
        }
    }

    fn record(&mut self, timing: Option<SymptomTiming>) {
        match timing {
            Some(SymptomTiming::Before) => self.before += 1,
            Some(SymptomTiming::During) => self.during += 1,
            Some(SymptomTiming::After) => self.after += 1,
            None => self.unclassified += 1,
        }
    }

    fn settle(&mut self) {
        let total = self.before + self.during + self.after + self.unclassified;
        let mut best: Option<(SymptomTiming, usize)> = None;
        for (timing, count) in [
            (SymptomTiming::Before, self.before),
            (SymptomTiming::During, self.during),
            (SymptomTiming::After, self.after),
        ] {
            if count > 0 && best.map_or(true, |(_, top)| count > top) {
                best = Some((timing, count));
            }
        }

        if let Some((timing, count)) = best {
            self.most_common = Some(timing);
            self.most_common_percent = ((count as f64 / total as f64) * 100.0).round() as u32;
        }
    }
}

/// Human-facing form of a symptom tag, e.g. `mood_swings` -> `mood swings`.
pub fn display_name(symptom_type: &str) -> String {
    symptom_type.replace('_', " ")
}

pub fn summarize_symptoms(symptoms: &[SymptomRecord]) -> SymptomSummary {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, usize, u32, usize)> = Vec::new();

    for record in symptoms {
        let slot = *index.entry(record.symptom_type.as_str()).or_insert_with(|| {
            tallies.push((record.symptom_type.as_str(), 0, 0, 0));
            tallies.len() - 1
        });
        let (_, count, severity_total, severity_count) = &mut tallies[slot];
        *count += 1;
        if let Some(severity) = record.severity {
            *severity_total += u32::from(severity);
            *severity_count += 1;
        }
    }

    let frequencies: Vec<SymptomFrequency> = tallies
        .into_iter()
        .map(|(symptom_type, count, severity_total, severity_count)| SymptomFrequency {
            symptom_type: symptom_type.to_string(),
            count,
            average_severity: (severity_count > 0)
                .then(|| f64::from(severity_total) / severity_count as f64),
        })
        .collect();

    // sort_by is stable, so equal counts stay in first-encountered order
    let mut ranked: Vec<&SymptomFrequency> = frequencies.iter().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    let top = ranked
        .into_iter()
        .take(TOP_SYMPTOM_COUNT)
        .map(|f| f.symptom_type.clone())
        .collect();

    SymptomSummary { frequencies, top }
}

/// Where `date` falls relative to the given periods (most recent first).
/// "During" runs from the start through `end + period_length`; "after" is the
/// few days past that. The first period whose window matches wins.
pub fn classify_timing(date: NaiveDate, periods: &[PeriodRecord]) -> Option<SymptomTiming> {
    let window = Days::new(TIMING_WINDOW_DAYS);
    periods.iter().find_map(|period| {
        let start = period.start_date;
        let end = period.during_window_end();
        let lead_in = start.checked_sub_days(window).unwrap_or(NaiveDate::MIN);
        let tail = end.checked_add_days(window).unwrap_or(NaiveDate::MAX);
        if date >= lead_in && date < start {
            Some(SymptomTiming::Before)
        } else if date >= start && date <= end {
            Some(SymptomTiming::During)
        } else if date > end && date <= tail {
            Some(SymptomTiming::After)
        } else {
            None
        }
    })
}

/// Per-type timing breakdown, in first-encountered order.
pub fn symptom_patterns(
    symptoms: &[SymptomRecord],
    periods: &[PeriodRecord],
) -> Vec<SymptomPattern> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut patterns: Vec<SymptomPattern> = Vec::new();

    for record in symptoms {
        let slot = *index.entry(record.symptom_type.as_str()).or_insert_with(|| {
            patterns.push(SymptomPattern::new(&record.symptom_type));
            patterns.len() - 1
        });
        patterns[slot].record(classify_timing(record.date, periods));
    }

    patterns.iter_mut().for_each(SymptomPattern::settle);
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn symptom(day: &str, kind: &str, severity: Option<u8>) -> SymptomRecord {
        SymptomRecord {
            date: date(day),
            symptom_type: kind.to_string(),
            severity,
            notes: None,
        }
    }

    #[test]
    fn most_frequent_symptom_ranks_first() {
        let symptoms = vec![
            symptom("2024-03-01", "bloating", Some(2)),
            symptom("2024-03-01", "cramps", Some(4)),
            symptom("2024-03-02", "cramps", Some(3)),
            symptom("2024-03-03", "cramps", None),
        ];
        let summary = summarize_symptoms(&symptoms);

        assert_eq!(summary.top, vec!["cramps", "bloating"]);
        assert_eq!(summary.frequencies[0].symptom_type, "bloating");
        assert_eq!(summary.frequencies[1].count, 3);
        assert_eq!(summary.frequencies[1].average_severity, Some(3.5));
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let symptoms = vec![
            symptom("2024-03-01", "fatigue", None),
            symptom("2024-03-01", "headache", None),
            symptom("2024-03-02", "acne", None),
            symptom("2024-03-02", "mood_swings", None),
            symptom("2024-03-03", "mood_swings", None),
        ];
        let summary = summarize_symptoms(&symptoms);
        assert_eq!(summary.top, vec!["mood_swings", "fatigue", "headache"]);
    }

    #[test]
    fn empty_history_has_no_top_symptoms() {
        let summary = summarize_symptoms(&[]);
        assert!(summary.top.is_empty());
        assert!(summary.frequencies.is_empty());
    }

    #[test]
    fn classifies_timing_around_a_period() {
        let mut period = PeriodRecord::starting(date("2024-03-10"));
        period.period_length = Some(5);
        let periods = vec![period];

        assert_eq!(classify_timing(date("2024-03-05"), &periods), Some(SymptomTiming::Before));
        assert_eq!(classify_timing(date("2024-03-09"), &periods), Some(SymptomTiming::Before));
        assert_eq!(classify_timing(date("2024-03-10"), &periods), Some(SymptomTiming::During));
        assert_eq!(classify_timing(date("2024-03-15"), &periods), Some(SymptomTiming::During));
        assert_eq!(classify_timing(date("2024-03-16"), &periods), Some(SymptomTiming::After));
        assert_eq!(classify_timing(date("2024-03-20"), &periods), Some(SymptomTiming::After));
        assert_eq!(classify_timing(date("2024-03-21"), &periods), None);
        assert_eq!(classify_timing(date("2024-03-04"), &periods), None);
    }

    #[test]
    fn during_counts_period_length_past_the_logged_end() {
        let mut period = PeriodRecord::starting(date("2024-03-10"));
        period.end_date = Some(date("2024-03-12"));
        period.period_length = Some(5);
        let periods = vec![period];

        assert_eq!(classify_timing(date("2024-03-14"), &periods), Some(SymptomTiming::During));
        assert_eq!(classify_timing(date("2024-03-17"), &periods), Some(SymptomTiming::During));
        assert_eq!(classify_timing(date("2024-03-18"), &periods), Some(SymptomTiming::After));
        assert_eq!(classify_timing(date("2024-03-22"), &periods), Some(SymptomTiming::After));
        assert_eq!(classify_timing(date("2024-03-23"), &periods), None);
    }

    #[test]
    fn first_matching_period_wins() {
        // a short cycle makes the later period's "before" overlap the earlier one's window
        let mut recent = PeriodRecord::starting(date("2024-03-20"));
        recent.end_date = Some(date("2024-03-23"));
        let mut earlier = PeriodRecord::starting(date("2024-03-08"));
        earlier.end_date = Some(date("2024-03-14"));
        let periods = vec![recent, earlier];

        assert_eq!(classify_timing(date("2024-03-16"), &periods), Some(SymptomTiming::Before));
    }

    #[test]
    fn patterns_report_most_common_timing() {
        let periods = vec![PeriodRecord::starting(date("2024-03-10"))];
        let symptoms = vec![
            symptom("2024-03-11", "cramps", None),
            symptom("2024-03-12", "cramps", None),
            symptom("2024-03-08", "cramps", None),
            symptom("2024-03-08", "bloating", None),
            symptom("2024-04-01", "acne", None),
        ];
        let patterns = symptom_patterns(&symptoms, &periods);

        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].symptom_type, "cramps");
        assert_eq!(patterns[0].during, 2);
        assert_eq!(patterns[0].before, 1);
        assert_eq!(patterns[0].most_common, Some(SymptomTiming::During));
        assert_eq!(patterns[0].most_common_percent, 67);
        assert_eq!(patterns[1].most_common, Some(SymptomTiming::Before));
        assert_eq!(patterns[1].most_common_percent, 100);
        assert_eq!(patterns[2].unclassified, 1);
        assert_eq!(patterns[2].most_common, None);
    }

    #[test]
    fn display_name_replaces_underscores() {
        assert_eq!(display_name("mood_swings"), "mood swings");
        assert_eq!(display_name("lower_back_pain"), "lower back pain");
    }
}
