use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayplanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PayplanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PayplanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PayplanError {
    fn from(e: serde_json::Error) -> Self {
        PayplanError::SerializationError(e.to_string())
    }
}

impl From<chrono::ParseError> for PayplanError {
    fn from(e: chrono::ParseError) -> Self {
        PayplanError::DateError(e.to_string())
    }
}
