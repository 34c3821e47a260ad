use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixedAssetError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Configuration error: {field} — {reason}")]
    Configuration { field: String, reason: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Schedule overflow: {kind} schedule did not reach a zero accounting value within {limit} lines (remaining: {remaining})")]
    ScheduleOverflow {
        kind: String,
        limit: usize,
        remaining: Decimal,
    },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FixedAssetError {
    fn from(e: serde_json::Error) -> Self {
        FixedAssetError::SerializationError(e.to_string())
    }
}
