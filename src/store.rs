//! Postgres access for period, symptom, mood and reminder records. Every
//! delete is scoped to the owning user.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    MoodLog, MoodRecord, Period, PeriodRecord, Reminder, ReminderRecord, SymptomLog, SymptomRecord,
};

/// Lengths are capped well below `i32::MAX` at validation; anything larger
/// is refused rather than stored as NULL.
fn as_db_days(days: Option<u32>) -> Result<Option<i32>, sqlx::Error> {
    days.map(|d| i32::try_from(d).map_err(|e| sqlx::Error::Encode(Box::new(e))))
        .transpose()
}

/// Newest first. `limit = None` returns every row.
pub async fn periods_for(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<Period>, sqlx::Error> {
    sqlx::query_as::<_, Period>(
        r#"
        SELECT id, user_id, start_date, end_date, cycle_length, period_length, created_at
        FROM periods
        WHERE user_id = $1
        ORDER BY start_date DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn insert_period(
    pool: &PgPool,
    user_id: Uuid,
    record: &PeriodRecord,
) -> Result<Period, sqlx::Error> {
    sqlx::query_as::<_, Period>(
        r#"
        INSERT INTO periods (id, user_id, start_date, end_date, cycle_length, period_length)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, start_date, end_date, cycle_length, period_length, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(as_db_days(record.cycle_length)?)
    .bind(as_db_days(record.period_length)?)
    .fetch_one(pool)
    .await
}

pub async fn delete_period(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM periods WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Newest first. `limit = None` returns every row.
pub async fn symptoms_for(
    pool: &PgPool,
    user_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<SymptomLog>, sqlx::Error> {
    sqlx::query_as::<_, SymptomLog>(
        r#"
        SELECT id, user_id, date, symptom_type, severity, notes, created_at
        FROM symptom_records
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Stores one row per record in a single transaction.
pub async fn insert_symptoms(
    pool: &PgPool,
    user_id: Uuid,
    records: &[SymptomRecord],
    severity: i16,
) -> Result<Vec<SymptomLog>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut stored = Vec::with_capacity(records.len());

    for record in records {
        let row = sqlx::query_as::<_, SymptomLog>(
            r#"
            INSERT INTO symptom_records (id, user_id, date, symptom_type, severity, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, date, symptom_type, severity, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(record.date)
        .bind(&record.symptom_type)
        .bind(severity)
        .bind(&record.notes)
        .fetch_one(&mut *tx)
        .await?;
        stored.push(row);
    }

    tx.commit().await?;
    Ok(stored)
}

pub async fn delete_symptom(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM symptom_records WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn moods_for(pool: &PgPool, user_id: Uuid) -> Result<Vec<MoodLog>, sqlx::Error> {
    sqlx::query_as::<_, MoodLog>(
        r#"
        SELECT id, user_id, date, mood_type, intensity, notes, created_at
        FROM mood_records
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_mood(
    pool: &PgPool,
    user_id: Uuid,
    record: &MoodRecord,
) -> Result<MoodLog, sqlx::Error> {
    sqlx::query_as::<_, MoodLog>(
        r#"
        INSERT INTO mood_records (id, user_id, date, mood_type, intensity, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, date, mood_type, intensity, notes, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(record.date)
    .bind(&record.mood_type)
    .bind(i16::from(record.intensity))
    .bind(&record.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete_mood(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM mood_records WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Soonest first.
pub async fn reminders_for(pool: &PgPool, user_id: Uuid) -> Result<Vec<Reminder>, sqlx::Error> {
    sqlx::query_as::<_, Reminder>(
        r#"
        SELECT id, user_id, reminder_type, reminder_date, description, completed, created_at
        FROM health_reminders
        WHERE user_id = $1
        ORDER BY reminder_date ASC, created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_reminder(
    pool: &PgPool,
    user_id: Uuid,
    record: &ReminderRecord,
) -> Result<Reminder, sqlx::Error> {
    sqlx::query_as::<_, Reminder>(
        r#"
        INSERT INTO health_reminders (id, user_id, reminder_type, reminder_date, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, reminder_type, reminder_date, description, completed, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&record.reminder_type)
    .bind(record.reminder_date)
    .bind(&record.description)
    .fetch_one(pool)
    .await
}

/// `None` when no reminder with that id belongs to the user.
pub async fn complete_reminder(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<Reminder>, sqlx::Error> {
    sqlx::query_as::<_, Reminder>(
        r#"
        UPDATE health_reminders
        SET completed = TRUE
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, reminder_type, reminder_date, description, completed, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_reminder(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM health_reminders WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
