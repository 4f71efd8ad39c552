use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid layout size: width={width}, height={height}")]
    InvalidLayout { width: u32, height: u32 },

    #[error("invalid time interval: start={start_ms}ms, end={end_ms}ms (start must precede end)")]
    InvalidInterval { start_ms: i64, end_ms: i64 },

    #[error("unknown calendar zone: {0:?}")]
    UnknownTimeZone(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
