use axum::{
    Router,
    routing::{get, put},
    extract::{State, Query},
    Json,
    http::StatusCode,
};
use sqlx::PgPool;

use crate::models::{IdQuery, NewReminder, Reminder, UserQuery};
use crate::routes::log_db_error;
use crate::store;

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route(
            "/reminders",
            get(list_reminders).post(create_reminder).delete(delete_reminder),
        )
        .route("/reminders/complete", put(complete_reminder))
        .with_state(pool)
}

async fn list_reminders(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Reminder>>, StatusCode> {
    let reminders = store::reminders_for(&pool, query.user_id)
        .await
        .map_err(|e| {
            log_db_error("Fetching reminders", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(reminders))
}

async fn create_reminder(
    State(pool): State<PgPool>,
    Json(body): Json<NewReminder>,
) -> Result<(StatusCode, Json<Reminder>), (StatusCode, String)> {
    let record = body
        .reminder
        .into_record()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let stored = store::insert_reminder(&pool, body.user_id, &record)
        .await
        .map_err(|e| {
            log_db_error("Reminder insert", &e);
            (StatusCode::UNPROCESSABLE_ENTITY, "Failed to save reminder".into())
        })?;

    tracing::info!(
        user_id = %body.user_id,
        reminder_date = %stored.reminder_date,
        "⏰ Reminder created"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn complete_reminder(
    State(pool): State<PgPool>,
    Query(params): Query<IdQuery>,
) -> Result<Json<Reminder>, (StatusCode, String)> {
    match store::complete_reminder(&pool, params.user_id, params.id).await {
        Ok(Some(reminder)) => Ok(Json(reminder)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "No reminder found".into())),
        Err(e) => {
            log_db_error("Reminder update", &e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}

async fn delete_reminder(
    State(pool): State<PgPool>,
    Query(params): Query<IdQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    match store::delete_reminder(&pool, params.user_id, params.id).await {
        Ok(n) if n > 0 => Ok(StatusCode::NO_CONTENT),
        Ok(_) => Err((StatusCode::NOT_FOUND, "No reminder found".into())),
        Err(e) => {
            log_db_error("Reminder delete", &e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}
