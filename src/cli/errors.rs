//! CLI-specific error types
//!
//! Domain rejections keep the code of the error that caused them.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::primitives::FieldError;
use crate::schedule::ScheduleError;
use crate::tracker::TrackerError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request JSON has the wrong shape
    InvalidRequest,
    /// Input rejected by an engine; carries that engine's code
    Rejected(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "HABIT_CLI_CONFIG_ERROR",
            Self::IoError => "HABIT_CLI_IO_ERROR",
            Self::InvalidRequest => "HABIT_CLI_INVALID_REQUEST",
            Self::Rejected(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Engine rejection
    pub fn rejected(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::Rejected(code), msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::io_error(format!("JSON error: {}", e))
        } else {
            Self::invalid_request(format!("JSON error: {}", e))
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        Self::rejected(e.code(), e.to_string())
    }
}

impl From<ScheduleError> for CliError {
    fn from(e: ScheduleError) -> Self {
        Self::rejected(e.code(), e.to_string())
    }
}

impl From<TrackerError> for CliError {
    fn from(e: TrackerError) -> Self {
        Self::rejected(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
