use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use crate::models::{IdQuery, NewPeriod, Period, PeriodRecord, UserQuery};
use crate::routes::log_db_error;
use crate::store;

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route(
            "/periods",
            get(list_periods).post(create_period).delete(delete_period),
        )
        .with_state(pool)
}

async fn list_periods(
    State(pool): State<PgPool>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<Period>>, StatusCode> {
    let periods = store::periods_for(&pool, params.user_id, None)
        .await
        .map_err(|e| {
            log_db_error("Fetching periods", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(periods))
}

async fn create_period(
    State(pool): State<PgPool>,
    Json(body): Json<NewPeriod>,
) -> Result<(StatusCode, Json<Period>), (StatusCode, String)> {
    let record = PeriodRecord::try_from(body.period)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let period = store::insert_period(&pool, body.user_id, &record)
        .await
        .map_err(|e| {
            log_db_error("Period insert", &e);
            (StatusCode::UNPROCESSABLE_ENTITY, "Failed to save period".into())
        })?;

    tracing::info!(
        user_id = %body.user_id,
        start_date = %period.start_date,
        "🩸 Period recorded"
    );
    Ok((StatusCode::CREATED, Json(period)))
}

async fn delete_period(
    State(pool): State<PgPool>,
    Query(params): Query<IdQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    match store::delete_period(&pool, params.user_id, params.id).await {
        Ok(n) if n > 0 => Ok(StatusCode::NO_CONTENT),
        Ok(_) => Err((StatusCode::NOT_FOUND, "Period not found".into())),
        Err(e) => {
            log_db_error("Period delete", &e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}
