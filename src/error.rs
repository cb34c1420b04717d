//! Error types for search configuration and report handling.

use thiserror::Error;

/// Rejected search parameters. Raised before any trial is sampled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trial count must be positive")]
    InvalidTrialCount,
    #[error("top-k must be positive")]
    InvalidTopK,
    #[error("invalid bounds for {field}: lower {low} > upper {high}")]
    InvalidBounds {
        field: &'static str,
        low: f64,
        high: f64,
    },
    #[error("bounds for {field} must be finite")]
    NonFiniteBound { field: &'static str },
    #[error("bounds for {field} must lie within ±{limit}")]
    BoundOutOfRange { field: &'static str, limit: f64 },
    #[error("no scenarios to evaluate against")]
    EmptyScenarios,
}

/// Failures reading, writing or selecting from a tuning report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("index {index} out of range (report has {len} entries); use --list to see available configs")]
    IndexOutOfRange { index: usize, len: usize },
}
