use chrono::NaiveDate;
use thiserror::Error;

/// Why an incoming period or symptom document was left out of analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid date in `{field}`: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("`{field}` must be a positive number of days, got {value}")]
    NonPositiveLength { field: &'static str, value: i64 },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("`{field}` must be at most {max} days, got {value}")]
    LengthTooLong { field: &'static str, value: i64, max: u32 },

    #[error("severity must be between 1 and 5, got {0}")]
    SeverityOutOfRange(i64),

    #[error("intensity must be between 1 and 5, got {0}")]
    IntensityOutOfRange(i64),

    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("last period start {start} is after {today}")]
    FutureStart { start: NaiveDate, today: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {setting} value {value:?}")]
pub struct UnknownSetting {
    pub setting: &'static str,
    pub value: String,
}
