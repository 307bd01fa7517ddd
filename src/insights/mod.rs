//! Cycle insight engine.
//!
//! Pure functions from a period/symptom history and a caller-supplied date to
//! statistics and display-ready insight entries. Nothing here does I/O or
//! reads the clock.

pub mod analysis;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod phase;
pub mod stats;
pub mod symptoms;

pub use analysis::{analyze, CycleAnalysis};
pub use composer::{compute_enhanced_insights, compute_insights, EnhancedInsights};
pub use config::InsightConfig;
