//! Error types for the pandoc-prep library
//!
//! Almost everything that can go wrong while flattening a vault degrades to a
//! fallback output (an embed left in place, a path left unresolved). The
//! errors here cover the edges: the root document, configuration files and
//! output files.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum PrepError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document to export does not exist
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    /// Configuration file could not be loaded
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Path resolution errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Input extension or output format that cannot be exported
    #[error("Unsupported format: {format}")]
    UnknownFormat { format: String },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Multiple errors (for batch operations)
    #[error("Multiple errors occurred")]
    Multiple { errors: Vec<PrepError> },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Create a new document not found error
    pub fn document_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DocumentNotFound { path: path.into() }
    }

    /// Create a new invalid configuration error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unknown_format(format: impl Into<String>) -> Self {
        Self::UnknownFormat {
            format: format.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a multiple errors wrapper
    pub fn multiple(errors: Vec<PrepError>) -> Self {
        Self::Multiple { errors }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            Self::DocumentNotFound { .. }
            | Self::InvalidConfig { .. }
            | Self::UnknownFormat { .. } => false,
            Self::PathResolution { .. } | Self::Validation { .. } | Self::Yaml(_) => true,
            Self::Multiple { errors } => errors.iter().any(|e| e.is_recoverable()),
        }
    }

    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DocumentNotFound { .. } | Self::InvalidConfig { .. } => ErrorSeverity::Critical,
            Self::Yaml(_) | Self::UnknownFormat { .. } => ErrorSeverity::High,
            Self::Validation { .. } | Self::PathResolution { .. } => ErrorSeverity::Low,
            Self::Multiple { errors } => errors
                .iter()
                .map(|e| e.severity())
                .max()
                .unwrap_or(ErrorSeverity::Low),
            _ => ErrorSeverity::Medium,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PrepError::document_not_found("note.md");
        assert!(matches!(err, PrepError::DocumentNotFound { .. }));
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
        assert!(ErrorSeverity::High > ErrorSeverity::Medium);
        assert!(ErrorSeverity::Medium > ErrorSeverity::Low);
    }

    #[test]
    fn test_multiple_errors_severity() {
        let errors = vec![
            PrepError::validation("bad option"),
            PrepError::unknown_format("note.txt"),
        ];
        let multi_err = PrepError::multiple(errors);
        assert_eq!(multi_err.severity(), ErrorSeverity::High);
        assert!(multi_err.is_recoverable());
    }

    #[test]
    fn test_yaml_error_from_serialization_layer() {
        let parse_failure = serde_yaml::from_str::<Vec<String>>("a: [").unwrap_err();
        let err = PrepError::from(parse_failure);
        assert!(matches!(err, PrepError::Yaml(_)));
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_recoverability() {
        let not_found = PrepError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(!not_found.is_recoverable());

        let interrupted = PrepError::Io(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(interrupted.is_recoverable());
    }
}
