use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::insights::InsightConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3050";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub insights: InsightConfig,
}

impl AppConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw:?}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let mut insights = InsightConfig::default();
        if let Some(raw) = lookup("INSIGHT_REGULARITY") {
            insights.regularity = raw.parse()?;
        }
        if let Some(raw) = lookup("INSIGHT_TREND_PLACEMENT") {
            insights.trend_placement = raw.parse()?;
        }
        if let Some(raw) = lookup("INSIGHT_PHASE_BOUNDARY") {
            insights.phase_boundary = raw.parse()?;
        }

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            insights,
        })
    }
}
