//! Central error types for the cursors overlay.
//!
//! The overlay is best-effort: pointer tracking and normalization never fail.
//! These errors cover the edges that touch the outside world (storage, JSON,
//! host DOM, configuration). All errors implement `Serialize` so they can cross
//! into JavaScript as plain strings.

use serde::Serialize;
use thiserror::Error;

/// Main error type for cursor overlay operations.
#[derive(Error, Debug)]
pub enum CursorsError {
    /// Persistent key/value storage failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Colour is not `#rgb` or `#rrggbb`
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    /// Host environment (window, document, listeners) error
    #[error("Host error: {0}")]
    HostError(String),

    /// Presence payload from the transport could not be decoded
    #[error("Presence error: {0}")]
    PresenceError(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Serialize for CursorsError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for CursorsError {
    fn from(msg: String) -> Self {
        CursorsError::Other(msg)
    }
}

impl From<&str> for CursorsError {
    fn from(msg: &str) -> Self {
        CursorsError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error, converting it to `CursorsError::Other`.
    fn context(self, msg: &str) -> CursorsResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorsResult<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> CursorsResult<T> {
        self.map_err(|e| CursorsError::Other(format!("{}: {:?}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> CursorsResult<T> {
        self.map_err(|e| CursorsError::Other(format!("{}: {:?}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to `CursorsError::HostError` with the given message.
    fn context(self, msg: &str) -> CursorsResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> CursorsResult<T> {
        self.ok_or_else(|| CursorsError::HostError(msg.to_string()))
    }
}

/// Type alias for Results using CursorsError.
pub type CursorsResult<T> = Result<T, CursorsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CursorsError::StorageError("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Storage error: quota exceeded");

        let err = CursorsError::InvalidColor("blue-ish".to_string());
        assert_eq!(err.to_string(), "Invalid color: \"blue-ish\"");
    }

    #[test]
    fn test_error_serialization() {
        let err = CursorsError::HostError("No window".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Host error: No window\"");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: CursorsError = json_err.into();
        assert!(matches!(err, CursorsError::JsonError(_)));
    }

    #[test]
    fn test_from_string() {
        let err: CursorsError = "test error".into();
        assert!(matches!(err, CursorsError::Other(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let msg = result.context("operation failed").unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), &str> = Err("inner");
        let msg = result
            .with_context(|| format!("ctx-{}", 42))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("ctx-42"));
        assert!(msg.contains("inner"));
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("No document");
        assert!(matches!(result, Err(CursorsError::HostError(_))));

        assert_eq!(Some(7).context("unused").unwrap(), 7);
    }
}
