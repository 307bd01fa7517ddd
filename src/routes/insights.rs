use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::insights::{
    compute_enhanced_insights, compute_insights, CycleAnalysis, EnhancedInsights, InsightConfig,
};
use crate::models::{
    normalize_periods, normalize_symptoms, InsightEntry, PeriodRecord, SymptomRecord,
};
use crate::routes::{log_db_error, InsightState};
use crate::store;

/// The summary view only looks at recent history.
pub const SUMMARY_PERIOD_LIMIT: i64 = 6;
pub const SUMMARY_SYMPTOM_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub user_id: Uuid,
    /// Defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightEntry>,
}

/// Records stay raw JSON until normalization so one mistyped record is
/// skipped instead of failing the whole body.
#[derive(Debug, Deserialize)]
pub struct EnhancedInsightsRequest {
    pub period_history: Vec<Value>,
    #[serde(default)]
    pub symptoms: Option<Vec<Value>>,
    #[serde(default)]
    pub analysis: Option<CycleAnalysis>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

pub fn routes(pool: PgPool, config: InsightConfig) -> Router {
    Router::new()
        .route("/insights", get(get_insights).post(post_enhanced_insights))
        .with_state(InsightState { pool, config })
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn get_insights(
    State(state): State<InsightState>,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>, StatusCode> {
    let periods = store::periods_for(&state.pool, params.user_id, Some(SUMMARY_PERIOD_LIMIT))
        .await
        .map_err(|e| {
            log_db_error("Fetching periods for insights", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let symptoms = store::symptoms_for(&state.pool, params.user_id, Some(SUMMARY_SYMPTOM_LIMIT))
        .await
        .map_err(|e| {
            log_db_error("Fetching symptoms for insights", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let periods: Vec<PeriodRecord> = periods.iter().map(PeriodRecord::from).collect();
    let symptoms: Vec<SymptomRecord> = symptoms.iter().map(SymptomRecord::from).collect();

    let insights = compute_insights(
        &periods,
        &symptoms,
        params.as_of.unwrap_or_else(today),
        &state.config,
    );

    tracing::info!(user_id = %params.user_id, count = insights.len(), "💡 Insights generated");
    Ok(Json(InsightsResponse { insights }))
}

/// Works purely from the request body; nothing is read from the database.
async fn post_enhanced_insights(
    State(state): State<InsightState>,
    Json(body): Json<EnhancedInsightsRequest>,
) -> Result<Json<EnhancedInsights>, (StatusCode, String)> {
    if body.period_history.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Valid period history data is required".into(),
        ));
    }

    let submitted = body.period_history.len();
    let periods = normalize_periods(body.period_history);
    let symptoms = normalize_symptoms(body.symptoms.unwrap_or_default());
    if periods.len() < submitted {
        tracing::debug!(submitted, kept = periods.len(), "Some period records were dropped");
    }

    let result = compute_enhanced_insights(
        &periods,
        &symptoms,
        body.analysis.as_ref(),
        body.as_of.unwrap_or_else(today),
        &state.config,
    );

    tracing::info!(count = result.advanced_insights.len(), "💡 Enhanced insights generated");
    Ok(Json(result))
}
