use axum::{
    Router,
    routing::get,
    extract::{State, Query},
    Json,
    http::StatusCode,
};
use sqlx::PgPool;

use crate::models::{IdQuery, MoodLog, NewMood, UserQuery};
use crate::routes::log_db_error;
use crate::store;

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/moods", get(list_moods).post(log_mood).delete(delete_mood))
        .with_state(pool)
}

async fn list_moods(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<MoodLog>>, StatusCode> {
    let moods = store::moods_for(&pool, query.user_id)
        .await
        .map_err(|e| {
            log_db_error("Fetching moods", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(moods))
}

async fn log_mood(
    State(pool): State<PgPool>,
    Json(body): Json<NewMood>,
) -> Result<(StatusCode, Json<MoodLog>), (StatusCode, String)> {
    let record = body
        .mood
        .into_record()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let stored = store::insert_mood(&pool, body.user_id, &record)
        .await
        .map_err(|e| {
            log_db_error("Mood insert", &e);
            (StatusCode::UNPROCESSABLE_ENTITY, "Failed to save mood".into())
        })?;

    tracing::info!(user_id = %body.user_id, mood = %stored.mood_type, "🌙 Mood logged");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn delete_mood(
    State(pool): State<PgPool>,
    Query(params): Query<IdQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    match store::delete_mood(&pool, params.user_id, params.id).await {
        Ok(n) if n > 0 => Ok(StatusCode::NO_CONTENT),
        Ok(_) => Err((StatusCode::NOT_FOUND, "No mood entry found".into())),
        Err(e) => {
            log_db_error("Mood delete", &e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}
