//! Error handling for Retrace
//!
//! This module defines the error types used throughout the application,
//! providing clear error messages and proper error propagation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Retrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Retrace operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Regex compilation or execution failed
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The trace directory could not be listed
    #[error("Cannot list trace directory {path}: {source}")]
    TraceListing { path: PathBuf, source: io::Error },

    /// History file not found
    #[error("History file not found: {path}")]
    HistoryFileNotFound { path: PathBuf },

    /// Home directory could not be determined
    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// Invalid command line arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A history entry with the requested number does not exist
    #[error("Entry {number} not found in history")]
    EntryNotFound { number: u64 },

    /// Invalid timestamp format
    #[error("Invalid timestamp format: {timestamp}")]
    InvalidTimestamp { timestamp: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Generic error with custom message
    #[error("{message}")]
    Custom { message: String },
}

impl Error {
    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Error::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::HistoryFileNotFound { .. } => true,
            Error::EntryNotFound { .. } => true,
            Error::TraceListing { .. } => true,
            Error::InvalidArguments { .. } => false,
            Error::HomeDirectoryNotFound => false,
            _ => true,
        }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Regex(_) => "regex",
            Error::Json(_) => "json",
            Error::TraceListing { .. } => "traces",
            Error::HistoryFileNotFound { .. } => "history",
            Error::HomeDirectoryNotFound => "system",
            Error::InvalidArguments { .. } => "arguments",
            Error::EntryNotFound { .. } => "retrieval",
            Error::InvalidTimestamp { .. } => "timestamp",
            Error::ConfigValidation { .. } => "config",
            Error::Custom { .. } => "custom",
        }
    }
}
