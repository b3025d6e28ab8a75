//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ClientError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use scope_client::{ClientError, ConnectionError};

/// Structured exit codes for scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Connection error - no generation could reach the cluster, or a network
    /// failure or timeout.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Not found - unknown server id or missing index.
    NotFound = 4,

    /// Validation error - malformed request or rejected query.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Rate limited - HTTP 429 after the retry budget was spent.
    RateLimited = 7,

    /// Service unavailable - HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Connection(ConnectionError::ServerNotFound { .. }) => ExitCode::NotFound,
            ClientError::Connection(ConnectionError::ClientBuild { .. }) => ExitCode::GeneralError,
            ClientError::Connection(_) => ExitCode::ConnectionError,

            ClientError::Query(_) => ExitCode::ValidationError,
            ClientError::Api { status: 400, .. } => ExitCode::ValidationError,
            ClientError::Api { status: 404, .. } => ExitCode::NotFound,

            ClientError::Api { status: 429, .. } | ClientError::MaxRetriesExceeded(_) => {
                ExitCode::RateLimited
            }

            ClientError::Api {
                status: 502..=504, ..
            } => ExitCode::ServiceUnavailable,

            ClientError::Api { .. } | ClientError::InvalidResponse(_) | ClientError::Config(_) => {
                ExitCode::GeneralError
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if the error is not a ClientError.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ClientError>())
            .map_or(ExitCode::GeneralError, ExitCode::from)
    }
}
