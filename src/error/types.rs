//! Error types and definitions for gradle-facts
//!
//! This module provides the error enum shared by the traversal engine, the
//! Gradle front-end and the command-line tool, together with severity levels
//! used to decide whether a run can continue.

use std::fmt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::scope::ScopeTag;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for gradle-facts operations
#[derive(Debug, Error)]
pub enum FactsError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid output format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// A source unit could not be turned into a syntax tree
    #[error("Cannot parse {path}: {message}")]
    ParseUnavailable { path: PathBuf, message: String },

    /// A scope was closed that is not the innermost open scope
    #[error("Scope stack out of sync: closing {expected:?} but top is {found:?}")]
    ScopeIntegrity {
        expected: ScopeTag,
        found: Option<ScopeTag>,
    },

    /// A scope was still open when the walk finished
    #[error("Scope {open:?} left open after traversal")]
    UnbalancedScope { open: ScopeTag },

    /// Module include graph contains a cycle
    #[error("Module include cycle: {}", cycle.join(" -> "))]
    ModuleCycle { cycle: Vec<String> },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Parallel execution error
    #[error("Parallel execution error: {message}")]
    ParallelExecution { message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },
}

impl FactsError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - the unit is skipped and the run continues
            FactsError::PermissionDenied { .. } => ErrorSeverity::Warning,
            FactsError::ParseUnavailable { .. } => ErrorSeverity::Warning,
            FactsError::ModuleCycle { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            FactsError::Config { .. } => ErrorSeverity::Critical,
            FactsError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            FactsError::ConfigRead { .. } => ErrorSeverity::Critical,
            FactsError::ConfigParse { .. } => ErrorSeverity::Critical,
            FactsError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            FactsError::StdoutWrite { .. } => ErrorSeverity::Critical,
            FactsError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,
            FactsError::ScopeIntegrity { .. } => ErrorSeverity::Critical,
            FactsError::UnbalancedScope { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FactsError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            FactsError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            FactsError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide a valid directory path.", path.display())
            }
            FactsError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            FactsError::ParseUnavailable { path, message } => {
                format!("Could not parse '{}' ({}). Skipping file.", path.display(), message)
            }
            FactsError::ScopeIntegrity { expected, found } => {
                format!(
                    "Block scope tracking went out of sync (closing {}, innermost open is {}). This is a controller wiring bug.",
                    expected,
                    found.map(|tag| tag.to_string()).unwrap_or_else(|| "nothing".to_string())
                )
            }
            FactsError::ModuleCycle { cycle } => {
                format!("Modules include each other in a cycle ({}). Inherited dependencies may be incomplete.", cycle.join(" -> "))
            }
            FactsError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error
    pub fn io_error(source: std::io::Error) -> Self {
        FactsError::Io { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        FactsError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        FactsError::PermissionDenied { path: path.into() }
    }

    /// Create a parse-unavailable error for one source unit
    pub fn parse_unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FactsError::ParseUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for FactsError {
    fn from(err: std::io::Error) -> Self {
        FactsError::io_error(err)
    }
}

impl From<toml::de::Error> for FactsError {
    fn from(err: toml::de::Error) -> Self {
        FactsError::TomlParse { source: err }
    }
}

impl From<csv::Error> for FactsError {
    fn from(err: csv::Error) -> Self {
        FactsError::Csv { source: err }
    }
}

impl From<glob::PatternError> for FactsError {
    fn from(err: glob::PatternError) -> Self {
        FactsError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for FactsError {
    fn from(err: serde_json::Error) -> Self {
        FactsError::JsonSerialize { source: err }
    }
}

impl From<walkdir::Error> for FactsError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        match err.io_error().map(|e| e.kind()) {
            Some(std::io::ErrorKind::PermissionDenied) => FactsError::PermissionDenied { path },
            _ => FactsError::DirectoryTraversal {
                path,
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for gradle-facts operations
pub type Result<T> = std::result::Result<T, FactsError>;
