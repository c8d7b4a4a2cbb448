//! Unified error types for expanse.
//!
//! Query compilation itself never fails: malformed input degrades to the
//! match-all query. Errors only arise at the edges, when loading
//! configuration or vocabulary files, reading a catalog, or rendering a
//! query for a particular storage backend.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for expanse operations.
#[derive(Error, Debug)]
pub enum ExpanseError {
    /// I/O errors from config, vocabulary, or catalog files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration loading or validation errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Malformed custom vocabulary entries.
    #[error("vocabulary error for '{term}': {message}")]
    Vocabulary { term: String, message: String },

    /// A query tree that cannot be expressed in a backend's syntax.
    #[error("render error: {message}")]
    Render { message: String },
}

/// A specialized Result type for expanse operations.
pub type Result<T> = std::result::Result<T, ExpanseError>;

impl ExpanseError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a vocabulary error for the given canonical term.
    pub fn vocabulary(term: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Vocabulary {
            term: term.into(),
            message: message.into(),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

impl From<io::Error> for ExpanseError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ExpanseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Fail-open error handling.
///
/// The search path must stay responsive: when an auxiliary step such as
/// config loading fails, log a warning and carry on with a safe value.
pub trait FailOpen<T> {
    /// Log the error and return `T::default()`.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Log the error and return `fallback`.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the expanse CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command ran but reported a failure (bad input file, render error).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = ExpanseError::storage(
            "/tmp/catalog.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/catalog.json"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ExpanseError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_vocabulary_error_display() {
        let err = ExpanseError::vocabulary("Red", "key must be lowercase");
        assert_eq!(
            err.to_string(),
            "vocabulary error for 'Red': key must be lowercase"
        );
    }

    #[test]
    fn test_render_error_display() {
        let err = ExpanseError::render("unsupported field identifier");
        assert_eq!(err.to_string(), "render error: unsupported field identifier");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: ExpanseError = io_err.into();
        assert!(matches!(err, ExpanseError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err: ExpanseError = json_err.into();
        assert!(matches!(err, ExpanseError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(ExpanseError::config("broken"));
        assert!(result.fail_open_default("loading fields").is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<usize> = Err(ExpanseError::render("nope"));
        assert_eq!(result.fail_open_with("rendering", 7), 7);
    }

    #[test]
    fn test_fail_open_passes_through_success() {
        let result: Result<usize> = Ok(42);
        assert_eq!(result.fail_open_default("anything"), 42);
    }
}
