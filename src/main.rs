use axum::{routing::get, Router};
use dotenvy::dotenv;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing_subscriber::EnvFilter;
use anyhow::Result;

mod config;
mod error;
mod insights;
mod models;
mod routes;
mod store;


use crate::config::AppConfig;
use crate::insights::InsightConfig;

fn app(pool: PgPool, insights: InsightConfig) -> Router {
    Router::new()
        .merge(routes::periods::routes(pool.clone()))
        .merge(routes::symptoms::routes(pool.clone()))
        .merge(routes::moods::routes(pool.clone()))
        .merge(routes::reminders::routes(pool.clone()))
        .merge(routes::insights::routes(pool.clone(), insights))
        .merge(routes::cycle_stats::routes(pool, insights))
        .route("/health", get(|| async { "✅ Backend up" }))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!(insights = ?config.insights, "⚙️ Migrations applied");

    let app = app(pool, config.insights);

    tracing::info!("🧠 Server running at {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
