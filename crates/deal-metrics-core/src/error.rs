use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealMetricsError {
    #[error("Invalid scenario: {field} — {reason}")]
    InvalidScenario { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DealMetricsError {
    fn from(e: serde_json::Error) -> Self {
        DealMetricsError::SerializationError(e.to_string())
    }
}
