//! Exit codes and structured error reports for the command-line tool.

use serde::Serialize;

use crate::cache::StoreError;

/// Exit codes for the calcache binary.
///
/// - 0: Success
/// - 1: General error (bad arguments, I/O failure)
/// - 2: The calibration store is corrupt or has an unsupported format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: The command completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Corrupt store: The store could not be decoded.
    CorruptStore = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CC000",
            Self::GeneralError => "CC001",
            Self::CorruptStore => "CC002",
        }
    }

    /// Pick the exit code for an error returned by the application.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::Io(_)) | None => Self::GeneralError,
            Some(_) => Self::CorruptStore,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "CC002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
