//! Error types for Kokoro core

use thiserror::Error;

/// Main error type for Kokoro operations
#[derive(Debug, Error)]
pub enum KokoroError {
    /// Analysis stage error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Session-related error
    #[error("Session error: {0}")]
    Session(String),

    /// Session not found in the store
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Service error
    #[error("Service error: {0}")]
    Service(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),

    /// Persisted session data that could not be decoded
    #[error("Corrupted session data for '{session_id}': {detail}")]
    CorruptedSession {
        /// Session identifier whose data failed to decode
        session_id: String,
        /// Decode failure detail
        detail: String,
    },
}

/// Convenient Result type using KokoroError
pub type Result<T> = std::result::Result<T, KokoroError>;

impl KokoroError {
    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        KokoroError::Analysis(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        KokoroError::Session(msg.into())
    }

    /// Create a session-not-found error
    pub fn session_not_found(id: impl Into<String>) -> Self {
        KokoroError::SessionNotFound(id.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        KokoroError::Storage(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        KokoroError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        KokoroError::Validation(msg.into())
    }

    /// Create a service error
    pub fn service(msg: impl Into<String>) -> Self {
        KokoroError::Service(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        KokoroError::Other(msg.into())
    }

    /// Create a corrupted-session error
    pub fn corrupted_session(session_id: impl Into<String>, detail: impl Into<String>) -> Self {
        KokoroError::CorruptedSession {
            session_id: session_id.into(),
            detail: detail.into(),
        }
    }

    /// Stable variant name, used for error counters
    pub fn kind(&self) -> &'static str {
        match self {
            KokoroError::Analysis(_) => "analysis",
            KokoroError::Session(_) => "session",
            KokoroError::SessionNotFound(_) => "session_not_found",
            KokoroError::Storage(_) => "storage",
            KokoroError::Serialization(_) => "serialization",
            KokoroError::Io(_) => "io",
            KokoroError::Config(_) => "config",
            KokoroError::Validation(_) => "validation",
            KokoroError::Service(_) => "service",
            KokoroError::Other(_) => "other",
            KokoroError::CorruptedSession { .. } => "corrupted_session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = KokoroError::analysis("test analysis error");
        assert_eq!(err.to_string(), "Analysis error: test analysis error");

        let err = KokoroError::storage("test storage error");
        assert_eq!(err.to_string(), "Storage error: test storage error");
    }

    #[test]
    fn test_corrupted_session_display() {
        let err = KokoroError::corrupted_session("user-1", "unexpected EOF");
        assert_eq!(
            err.to_string(),
            "Corrupted session data for 'user-1': unexpected EOF"
        );
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
