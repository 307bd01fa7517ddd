use serde::{ de::DeserializeOwned, Serialize, Deserialize };
use serde_json::Value;
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc, Days};

use crate::error::RecordError;

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// Longest cycle or period length accepted from a client, in days.
pub const MAX_LENGTH_DAYS: u32 = 365;

// ---- engine records ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: Option<u32>,
    pub period_length: Option<u32>,
}

impl PeriodRecord {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: None,
            cycle_length: None,
            period_length: None,
        }
    }

    /// Recorded period length, falling back to the span covered by `end_date`.
    pub fn observed_period_length(&self) -> Option<u32> {
        self.period_length.or_else(|| {
            self.end_date
                .map(|end| (end - self.start_date).num_days() + 1)
                .and_then(|days| u32::try_from(days).ok())
        })
    }

    /// Last day a symptom still counts as "during" this period: the recorded
    /// end (or the start, when no end was logged) plus `period_length` days.
    pub fn during_window_end(&self) -> NaiveDate {
        let length = self.period_length.unwrap_or(DEFAULT_PERIOD_LENGTH);
        self.end_date
            .unwrap_or(self.start_date)
            .checked_add_days(Days::new(u64::from(length)))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub date: NaiveDate,
    pub symptom_type: String,
    pub severity: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodRecord {
    pub date: NaiveDate,
    pub mood_type: String,
    pub intensity: u8,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub reminder_type: String,
    pub reminder_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Cycle,
    Phase,
    Symptom,
    Nutrition,
    Exercise,
    Trend,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightEntry {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl InsightEntry {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            recommendation: None,
        }
    }

    pub fn recommending(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

// ---- incoming documents ----
//
// Clients send both `start_date` and `startDate` style keys, and symptoms as
// either `symptom_type` or a `symptoms` tag/list. Both shapes are resolved
// here so nothing past this point sees the variants.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodDocument {
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(alias = "cycleLength")]
    pub cycle_length: Option<i64>,
    #[serde(alias = "periodLength")]
    pub period_length: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SymptomTags {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymptomDocument {
    pub date: Option<String>,
    pub symptom_type: Option<String>,
    pub symptoms: Option<SymptomTags>,
    pub severity: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoodDocument {
    pub date: Option<String>,
    #[serde(alias = "moodType")]
    pub mood_type: Option<String>,
    pub intensity: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderDocument {
    #[serde(alias = "reminderType")]
    pub reminder_type: Option<String>,
    #[serde(alias = "reminderDate")]
    pub reminder_date: Option<String>,
    pub description: Option<String>,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn required_date(value: Option<&str>, field: &'static str) -> Result<NaiveDate, RecordError> {
    let raw = value.ok_or(RecordError::MissingField(field))?;
    parse_date(raw).ok_or_else(|| RecordError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn positive_days(value: Option<i64>, field: &'static str) -> Result<Option<u32>, RecordError> {
    let Some(days) = value else {
        return Ok(None);
    };
    if days <= 0 {
        return Err(RecordError::NonPositiveLength { field, value: days });
    }
    match u32::try_from(days) {
        Ok(d) if d <= MAX_LENGTH_DAYS => Ok(Some(d)),
        _ => Err(RecordError::LengthTooLong {
            field,
            value: days,
            max: MAX_LENGTH_DAYS,
        }),
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField(field))
}

/// Decodes one loosely typed record so a bad field only costs that record.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RecordError> {
    serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))
}

impl TryFrom<PeriodDocument> for PeriodRecord {
    type Error = RecordError;

    fn try_from(doc: PeriodDocument) -> Result<Self, Self::Error> {
        let start_date = required_date(doc.start_date.as_deref(), "start_date")?;
        let end_date = match doc.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(required_date(Some(raw), "end_date")?),
        };
        if let Some(end) = end_date {
            if end < start_date {
                return Err(RecordError::EndBeforeStart { start: start_date, end });
            }
        }

        Ok(Self {
            start_date,
            end_date,
            cycle_length: positive_days(doc.cycle_length, "cycle_length")?,
            period_length: positive_days(doc.period_length, "period_length")?,
        })
    }
}

impl SymptomDocument {
    /// One record per tag; a `symptoms` list fans out into several records.
    pub fn into_records(self) -> Result<Vec<SymptomRecord>, RecordError> {
        let date = required_date(self.date.as_deref(), "date")?;
        let severity = match self.severity {
            None => None,
            Some(value) if (1..=5).contains(&value) => Some(value as u8),
            Some(value) => return Err(RecordError::SeverityOutOfRange(value)),
        };

        let tags = match (self.symptom_type, self.symptoms) {
            (Some(tag), _) => vec![tag],
            (None, Some(SymptomTags::One(tag))) => vec![tag],
            (None, Some(SymptomTags::Many(tags))) => tags,
            (None, None) => return Err(RecordError::MissingField("symptom_type")),
        };

        let records: Vec<SymptomRecord> = tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .map(|symptom_type| SymptomRecord {
                date,
                symptom_type,
                severity,
                notes: self.notes.clone(),
            })
            .collect();

        if records.is_empty() {
            return Err(RecordError::MissingField("symptom_type"));
        }
        Ok(records)
    }
}

impl MoodDocument {
    pub fn into_record(self) -> Result<MoodRecord, RecordError> {
        let date = required_date(self.date.as_deref(), "date")?;
        let mood_type = required_text(self.mood_type, "mood_type")?;
        let intensity = match self.intensity {
            None => return Err(RecordError::MissingField("intensity")),
            Some(value) if (1..=5).contains(&value) => value as u8,
            Some(value) => return Err(RecordError::IntensityOutOfRange(value)),
        };
        Ok(MoodRecord {
            date,
            mood_type,
            intensity,
            notes: self.notes,
        })
    }
}

impl ReminderDocument {
    pub fn into_record(self) -> Result<ReminderRecord, RecordError> {
        Ok(ReminderRecord {
            reminder_type: required_text(self.reminder_type, "reminder_type")?,
            reminder_date: required_date(self.reminder_date.as_deref(), "reminder_date")?,
            description: self.description,
        })
    }
}

/// Converts raw period JSON, dropping (and logging) any record that is
/// mistyped or fails validation.
pub fn normalize_periods(docs: Vec<Value>) -> Vec<PeriodRecord> {
    docs.into_iter()
        .filter_map(|doc| match decode::<PeriodDocument>(doc).and_then(PeriodRecord::try_from) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "⚠️ Skipping period record");
                None
            }
        })
        .collect()
}

pub fn normalize_symptoms(docs: Vec<Value>) -> Vec<SymptomRecord> {
    docs.into_iter()
        .filter_map(|doc| {
            match decode::<SymptomDocument>(doc).and_then(SymptomDocument::into_records) {
                Ok(records) => Some(records),
                Err(e) => {
                    tracing::warn!(error = %e, "⚠️ Skipping symptom record");
                    None
                }
            }
        })
        .flatten()
        .collect()
}

// ---- stored rows ----

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Period {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&Period> for PeriodRecord {
    fn from(row: &Period) -> Self {
        let positive = |v: Option<i32>| v.and_then(|d| u32::try_from(d).ok()).filter(|d| *d > 0);
        Self {
            start_date: row.start_date,
            end_date: row.end_date,
            cycle_length: positive(row.cycle_length),
            period_length: positive(row.period_length),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SymptomLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub symptom_type: String,
    pub severity: i16,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&SymptomLog> for SymptomRecord {
    fn from(row: &SymptomLog) -> Self {
        Self {
            date: row.date,
            symptom_type: row.symptom_type.clone(),
            severity: u8::try_from(row.severity).ok().filter(|s| (1..=5).contains(s)),
            notes: row.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub mood_type: String,
    pub intensity: i16,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reminder_type: String,
    pub reminder_date: NaiveDate,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

// ---- request shapes ----

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Uuid,
    /// Owner of the record; a delete never reaches another user's rows.
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NewPeriod {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub period: PeriodDocument,
}

#[derive(Debug, Deserialize)]
pub struct NewSymptom {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub symptom: SymptomDocument,
}

#[derive(Debug, Deserialize)]
pub struct NewMood {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub mood: MoodDocument,
}

#[derive(Debug, Deserialize)]
pub struct NewReminder {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub reminder: ReminderDocument,
}
