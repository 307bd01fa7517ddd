use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use sqlx::PgPool;

use crate::insights::{analyze, CycleAnalysis, InsightConfig};
use crate::models::{PeriodRecord, SymptomRecord, UserQuery};
use crate::routes::{log_db_error, InsightState};
use crate::store;

/// Full-history analysis. The response can be posted back to `/insights`
/// as `analysis` to skip recomputation.
pub async fn get_cycle_stats(
    State(state): State<InsightState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CycleAnalysis>, StatusCode> {
    let user_id = query.user_id;

    let periods = store::periods_for(&state.pool, user_id, None)
        .await
        .map_err(|e| {
            log_db_error("Fetching periods for cycle stats", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let symptoms = store::symptoms_for(&state.pool, user_id, None)
        .await
        .map_err(|e| {
            log_db_error("Fetching symptoms for cycle stats", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let periods: Vec<PeriodRecord> = periods.iter().map(PeriodRecord::from).collect();
    let symptoms: Vec<SymptomRecord> = symptoms.iter().map(SymptomRecord::from).collect();

    let analysis = analyze(&periods, &symptoms, &state.config);
    tracing::info!(
        user_id = %user_id,
        periods = analysis.statistics.period_count,
        regularity = %analysis.statistics.regularity,
        "📊 Cycle stats computed"
    );

    Ok(Json(analysis))
}

pub fn routes(pool: PgPool, config: InsightConfig) -> Router {
    Router::new()
        .route("/cycle-stats", get(get_cycle_stats))
        .with_state(InsightState { pool, config })
}
