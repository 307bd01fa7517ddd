use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::InsightError;
use crate::insights::config::PhaseBoundary;

// Fixed fractions of the average cycle length. These are rough policy
// approximations, not clinically derived values.
pub const FOLLICULAR_END_FRACTION: f64 = 0.45;
pub const OVULATION_END_FRACTION: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Menstrual,
        Phase::Follicular,
        Phase::Ovulation,
        Phase::Luteal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Menstrual => "menstrual",
            Phase::Follicular => "follicular",
            Phase::Ovulation => "ovulation",
            Phase::Luteal => "luteal",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Menstrual => "Menstrual",
            Phase::Follicular => "Follicular",
            Phase::Ovulation => "Ovulation",
            Phase::Luteal => "Luteal",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePosition {
    pub phase: Phase,
    /// 1-based; the start day itself is day 1.
    pub day_of_cycle: i64,
}

/// Places `today` within the cycle that began on `last_start`.
pub fn resolve_phase(
    last_start: NaiveDate,
    average_cycle_length: f64,
    average_period_length: f64,
    today: NaiveDate,
    boundary: PhaseBoundary,
) -> Result<CyclePosition, InsightError> {
    let days_since = (today - last_start).num_days();
    if days_since < 0 {
        return Err(InsightError::FutureStart {
            start: last_start,
            today,
        });
    }

    let elapsed = days_since as f64;
    let phase = if boundary.is_before(elapsed, average_period_length) {
        Phase::Menstrual
    } else if boundary.is_before(elapsed, average_cycle_length * FOLLICULAR_END_FRACTION) {
        Phase::Follicular
    } else if boundary.is_before(elapsed, average_cycle_length * OVULATION_END_FRACTION) {
        Phase::Ovulation
    } else {
        Phase::Luteal
    };

    Ok(CyclePosition {
        phase,
        day_of_cycle: days_since + 1,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// `None` when the projection runs past the last representable date.
pub fn predict_next_period(
    last_start: NaiveDate,
    average_cycle_length: f64,
    average_period_length: f64,
) -> Option<NextPeriod> {
    let start = last_start.checked_add_days(Days::new(average_cycle_length.round() as u64))?;
    let extra_days = (average_period_length.round() - 1.0).max(0.0) as u64;
    let end = start.checked_add_days(Days::new(extra_days))?;
    Some(NextPeriod { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn phase_on_day(day_of_cycle: i64, cycle: f64, period: f64, boundary: PhaseBoundary) -> Phase {
        let start = date("2024-01-01");
        let today = start + Duration::days(day_of_cycle - 1);
        let position = resolve_phase(start, cycle, period, today, boundary).unwrap();
        assert_eq!(position.day_of_cycle, day_of_cycle);
        position.phase
    }

    #[test]
    fn early_days_are_menstrual() {
        assert_eq!(phase_on_day(1, 28.0, 5.0, PhaseBoundary::Exclusive), Phase::Menstrual);
        assert_eq!(phase_on_day(3, 28.0, 5.0, PhaseBoundary::Exclusive), Phase::Menstrual);
    }

    #[test]
    fn phases_across_a_28_day_cycle() {
        let b = PhaseBoundary::Exclusive;
        assert_eq!(phase_on_day(6, 28.0, 5.0, b), Phase::Follicular);
        assert_eq!(phase_on_day(13, 28.0, 5.0, b), Phase::Follicular);
        // 13 days elapsed: past 12.6, still under 14
        assert_eq!(phase_on_day(14, 28.0, 5.0, b), Phase::Ovulation);
        assert_eq!(phase_on_day(15, 28.0, 5.0, b), Phase::Luteal);
        assert_eq!(phase_on_day(28, 28.0, 5.0, b), Phase::Luteal);
    }

    #[test]
    fn boundary_day_placement_is_configurable() {
        // 14 days elapsed sits exactly on 0.50 * 28
        assert_eq!(phase_on_day(15, 28.0, 5.0, PhaseBoundary::Exclusive), Phase::Luteal);
        assert_eq!(phase_on_day(15, 28.0, 5.0, PhaseBoundary::Inclusive), Phase::Ovulation);

        // 5 days elapsed sits exactly on the period length
        assert_eq!(phase_on_day(6, 28.0, 5.0, PhaseBoundary::Exclusive), Phase::Follicular);
        assert_eq!(phase_on_day(6, 28.0, 5.0, PhaseBoundary::Inclusive), Phase::Menstrual);
    }

    #[test]
    fn future_start_is_rejected() {
        let err = resolve_phase(
            date("2024-03-12"),
            28.0,
            5.0,
            date("2024-03-10"),
            PhaseBoundary::Exclusive,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InsightError::FutureStart {
                start: date("2024-03-12"),
                today: date("2024-03-10"),
            }
        );
    }

    #[test]
    fn predicts_next_period() {
        let next = predict_next_period(date("2024-03-01"), 29.0, 5.0).unwrap();
        assert_eq!(next.start, date("2024-03-30"));
        assert_eq!(next.end, date("2024-04-03"));

        let rounded = predict_next_period(date("2024-03-01"), 28.6, 4.4).unwrap();
        assert_eq!(rounded.start, date("2024-03-30"));
        assert_eq!(rounded.end, date("2024-04-02"));
    }

    #[test]
    fn prediction_past_the_calendar_is_none() {
        assert_eq!(predict_next_period(date("2024-03-01"), 1e9, 5.0), None);
        assert_eq!(predict_next_period(date("2024-03-01"), 28.0, 4e9), None);
        assert_eq!(predict_next_period(NaiveDate::MAX, 28.0, 5.0), None);
    }

    #[test]
    fn labels() {
        let labels: Vec<&str> = Phase::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, ["menstrual", "follicular", "ovulation", "luteal"]);
        assert_eq!(Phase::Ovulation.to_string(), "ovulation");
        assert_eq!(
            serde_json::to_value(Phase::Luteal).unwrap(),
            serde_json::json!("luteal")
        );
    }
}
