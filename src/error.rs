//! Error types and handling infrastructure for anyfile.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! the library error type. The binary layers `anyhow` on top for context.
//!
//! Missing input is not always an error: read resolution reports it as data
//! (see [`AccessMethod::NotFound`](crate::file_handler::AccessMethod::NotFound)), and only
//! the error-returning open entry points turn it into [`AnyfileError::FileNotFound`].

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// The main error type for anyfile operations.
#[derive(Error, Debug)]
pub enum AnyfileError {
    /// File system related errors (permission denied, read failure, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No candidate exists for the logical filename under any tried suffix
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A script candidate exists but carries no execute permission
    #[error("Script is not executable: {path}")]
    NotExecutable { path: PathBuf },

    /// An external decompressor or script could not be started
    #[error("Failed to start {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An external decompressor or script exited unsuccessfully
    #[error("{program} exited with {status}")]
    SubprocessFailed { program: String, status: ExitStatus },

    /// Decompression stream or archive layout errors
    #[error("Compression error: {message}")]
    CompressionError { message: String },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid textual argument (sort rule, comment rule, ...)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for anyfile operations.
pub type Result<T> = std::result::Result<T, AnyfileError>;

impl AnyfileError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a FileNotFound error for the given logical name
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a SpawnFailed error for the given program
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Create a CompressionError with a descriptive message
    pub fn compression(message: impl Into<String>) -> Self {
        Self::CompressionError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// True when no candidate file was found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}

impl From<std::io::Error> for AnyfileError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "File not found",
            std::io::ErrorKind::PermissionDenied => "Permission denied",
            _ => "IO operation failed",
        };
        Self::FileError {
            message: message.to_string(),
            source: err,
        }
    }
}
