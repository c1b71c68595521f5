// File: crates/chart-core/src/error.rs
// Summary: Crate-level error type for loading, configuration and API URL building.

use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("feed fetch failed: {0}")]
    Fetch(String),
    #[error("feed is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("feed yielded no valid points ({rejected} rows rejected)")]
    EmptySeries { rejected: usize },
    #[error("load superseded by a newer request")]
    Superseded,
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid api response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
