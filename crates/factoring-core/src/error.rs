use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoringError {
    #[error("Invalid term: operation term cannot be negative (got {term_days} days)")]
    InvalidTerm { term_days: i64 },

    #[error("Empty batch: at least one invoice is required")]
    EmptyBatch,

    #[error("Net invoice amount cannot be zero")]
    ZeroNetAmount,

    #[error("Missing expected payment date: {0}")]
    MissingExpectedDate(String),

    #[error("Division guard tripped in {context}: denominator is not positive")]
    DivisionGuard { context: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FactoringError {
    fn from(e: serde_json::Error) -> Self {
        FactoringError::SerializationError(e.to_string())
    }
}
