use axum::{
    Router,
    routing::{get, post},
    extract::{State, Query},
    Json,
    http::StatusCode,
};
use sqlx::PgPool;

use crate::models::{IdQuery, NewSymptom, SymptomLog, UserQuery};
use crate::routes::log_db_error;
use crate::store;

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/symptom", post(log_symptom).delete(delete_symptom))
        .route("/symptoms", get(list_symptoms))
        .with_state(pool)
}

async fn delete_symptom(
    State(pool): State<PgPool>,
    Query(params): Query<IdQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    match store::delete_symptom(&pool, params.user_id, params.id).await {
        Ok(n) if n > 0 => Ok(StatusCode::NO_CONTENT),
        Ok(_) => Err((StatusCode::NOT_FOUND, "No symptom found".into())),
        Err(e) => {
            log_db_error("Symptom delete", &e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}

async fn list_symptoms(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<SymptomLog>>, StatusCode> {
    let logs = store::symptoms_for(&pool, query.user_id, None)
        .await
        .map_err(|e| {
            log_db_error("Fetching symptoms", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(logs))
}

/// Accepts a single `symptom_type` or a `symptoms` list; each tag is stored as its own row.
async fn log_symptom(
    State(pool): State<PgPool>,
    Json(body): Json<NewSymptom>,
) -> Result<(StatusCode, Json<Vec<SymptomLog>>), (StatusCode, String)> {
    let records = body
        .symptom
        .into_records()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    // into_records already bounds severity to 1..=5
    let severity = records
        .first()
        .and_then(|r| r.severity)
        .ok_or((StatusCode::BAD_REQUEST, "severity is required".to_string()))?;

    let stored = store::insert_symptoms(&pool, body.user_id, &records, i16::from(severity))
        .await
        .map_err(|e| {
            log_db_error("Symptom insert", &e);
            (StatusCode::UNPROCESSABLE_ENTITY, "Failed to save symptom".into())
        })?;

    tracing::info!(user_id = %body.user_id, count = stored.len(), "📝 Symptoms logged");
    Ok((StatusCode::CREATED, Json(stored)))
}
