//! CLI-specific error types
//!
//! Configuration errors are fatal and stop the run before any TagPack is
//! read. Per-document failures are reported per file and only summarized
//! here as `BatchFailed`.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration, schema or taxonomy source error
    ConfigError,
    /// I/O error (stdout, input paths)
    IoError,
    /// Sink could not store records
    SinkError,
    /// One or more TagPacks failed
    BatchFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TAGPACK_CLI_CONFIG_ERROR",
            Self::IoError => "TAGPACK_CLI_IO_ERROR",
            Self::SinkError => "TAGPACK_CLI_SINK_ERROR",
            Self::BatchFailed => "TAGPACK_CLI_BATCH_FAILED",
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

    /// Sink error
    pub fn sink_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SinkError, msg)
    }

    /// Summary of a batch with failed TagPacks
    pub fn batch_failed(failed: usize, total: usize) -> Self {
        Self::new(
            CliErrorCode::BatchFailed,
            format!("{} of {} TagPacks failed", failed, total),
        )
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

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::sink_error(format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
