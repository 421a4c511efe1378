//! Error types for assistant-webhook.

use thiserror::Error;

use crate::status::Status;

/// Main error type for all assistant operations.
///
/// Validation failures in the dispatch pipeline are *not* reported through
/// this type; they are recorded as a [`Status`] on the
/// [`Agent`](crate::Agent). These errors are the fatal ones: they abort the
/// request they occur in.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// I/O error while loading a corpus file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A parameter value could not be coerced to the requested type.
    #[error("Could not parse parameter '{key}' from value '{value}'")]
    Parse {
        /// Parameter key that was requested.
        key: String,
        /// Raw value that failed to coerce.
        value: String,
    },

    /// Widget failed structural validation at construction.
    #[error("Invalid widget: {0}")]
    InvalidWidget(String),

    /// Capability not provided by this parser or agent.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Corpus has no entry for the requested key.
    #[error("Unknown corpus key: {0}")]
    UnknownCorpusKey(String),

    /// Application handler failed.
    #[error("Handler error: {0}")]
    Handler(String),
}

impl AssistantError {
    /// Create a handler error from any displayable message.
    pub fn handler(message: impl Into<String>) -> Self {
        AssistantError::Handler(message.into())
    }

    /// Status the embedding application should report for this error.
    pub fn status(&self) -> Status {
        match self {
            AssistantError::Json(_) => Status::InvalidData,
            AssistantError::UnknownCorpusKey(_) => Status::NotFound,
            _ => Status::InternalError,
        }
    }
}

/// Result type alias using AssistantError.
pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = AssistantError::Parse {
            key: "number".into(),
            value: "lots".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not parse parameter 'number' from value 'lots'"
        );
        assert_eq!(err.status(), Status::InternalError);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AssistantError::UnknownCorpusKey("greeting".into()).status(),
            Status::NotFound
        );
        assert_eq!(
            AssistantError::handler("boom").status(),
            Status::InternalError
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AssistantError::from(json_err).status(), Status::InvalidData);
    }
}
