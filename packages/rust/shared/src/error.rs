//! Error types for bottleneck.
//!
//! Library crates use [`BottleneckError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Per-note problems (missing note, note not matching the template) are not
//! errors: they are [`crate::ParseFailure`] values. This type covers the
//! setup failures that abort a run outright.

use std::path::PathBuf;

/// Top-level error type for all bottleneck operations.
#[derive(Debug, thiserror::Error)]
pub enum BottleneckError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Text could not be parsed (index file, config values).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad paths, malformed inputs).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The LaTeX template cannot accept the generated fragments.
    #[error("template error: {0}")]
    Template(String),

    /// The external LaTeX compiler could not be run.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BottleneckError>;

impl BottleneckError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
