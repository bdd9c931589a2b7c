//! Error types for `roadnet`
//!
//! Configuration and book loading errors, phase handling errors, and the
//! process exit codes the CLI maps them to.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `roadnet` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure, bad backend)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Phase error (invalid handler argument, unknown ring or phase)
    pub const PHASE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `roadnet` operations.
///
/// Aggregates the domain-specific errors and maps each of them to an
/// exit code.
#[derive(Debug, Error)]
pub enum RoadnetError {
    /// Book loading, validation, or backend selection error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Phase handling error
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Invalid command-line usage not caught by argument parsing
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RoadnetError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Phase(_) => ExitCode::PHASE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Book loading, validation, and backend selection errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the book file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Book validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path (or paths) of the validated books
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Required field or flag is missing
    #[error("missing required field '{field}' at {location}")]
    MissingRequired {
        /// Name of the missing field
        field: String,
        /// Where it was expected (e.g., "--xodr-file-path")
        location: String,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in a book file is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location in the book where it was referenced
        location: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during book validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationIssue {
    /// Path to the problematic entry (e.g., "phase_rings[0].next_phases.AllGo")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - validation failure that prevents the books from being used
    Error,
    /// Warning - potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Phase Errors
// ============================================================================

/// Phase ring, phase provider, and handler errors.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// Rejected construction argument (e.g., non-positive phase duration)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced phase ring or phase does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempted state change the provider does not allow
    #[error("invalid phase transition: {0}")]
    InvalidTransition(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `roadnet` operations.
pub type Result<T> = std::result::Result<T, RoadnetError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::PHASE_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_phase_error_exit_code() {
        let err: RoadnetError = PhaseError::InvalidArgument("phase_duration".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::PHASE_ERROR);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: RoadnetError = ConfigError::MissingFile {
            path: PathBuf::from("/books/missing.yaml"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = RoadnetError::Usage("iterations must be greater than zero".to_string());
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: RoadnetError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "phase_rings[0].next_phases.AllGo".to_string(),
            message: "unknown phase 'AllWait'".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: unknown phase 'AllWait' at phase_rings[0].next_phases.AllGo"
        );
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "phase_rings[1]".to_string(),
            message: "phase has no successor".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: phase has no successor at phase_rings[1]"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("crosswalk.yaml"),
            line: Some(12),
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("crosswalk.yaml"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = PhaseError::InvalidArgument("phase_duration must be > 0, got -5".to_string());
        assert_eq!(
            err.to_string(),
            "invalid argument: phase_duration must be > 0, got -5"
        );
    }
}
