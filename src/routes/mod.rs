use sqlx::PgPool;

use crate::insights::InsightConfig;

pub mod cycle_stats;
pub mod insights;
pub mod moods;
pub mod periods;
pub mod reminders;
pub mod symptoms;

/// State for routes that run the insight engine over stored history.
#[derive(Clone)]
pub struct InsightState {
    pub pool: PgPool,
    pub config: InsightConfig,
}

pub(crate) fn log_db_error(context: &str, e: &sqlx::Error) {
    if let Some(db_err) = e.as_database_error() {
        tracing::error!("❌ {} failed: {}", context, db_err.message());

        if let Some(code) = db_err.code() {
            tracing::info!("ℹ️ SQLSTATE code: {}", code);
        }

        if let Some(constraint) = db_err.constraint() {
            tracing::info!("🔒 Constraint violated: {}", constraint);
        }
    } else {
        tracing::error!("❌ {} failed: {}", context, e);
    }
}
