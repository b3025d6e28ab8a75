//! Error types for the scope client.
//!
//! Responsibilities:
//! - Separate request defects (`QueryError`) from connectivity failures
//!   (`ConnectionError`) so callers can tell non-retryable input problems from
//!   transient cluster issues.
//! - Wrap both, plus cluster-reported API errors, in `ClientError`.
//!
//! Invariants:
//! - `QueryError` is always raised before any network call.
//! - `ConnectionError::ProbeFailed` carries every original probe failure, in
//!   the order the probes ran.

use std::fmt;

use scope_config::ConfigError;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// One failed probe attempt during connection resolution.
#[derive(Debug)]
pub struct ProbeFailure {
    /// Major version of the client generation that was tried.
    pub major_version: u32,
    /// Why the attempt failed.
    pub error: Box<ClientError>,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}: {}", self.major_version, self.error)
    }
}

fn summarize(failures: &[ProbeFailure]) -> String {
    if failures.is_empty() {
        return "no client generation available".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures to obtain or use a live connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The registry has no identity for this id.
    #[error("Server config not found for ID: {id}")]
    ServerNotFound { id: String },

    /// Every version probe failed.
    #[error("Failed to connect to cluster at {url} ({})", summarize(.failures))]
    ProbeFailed {
        url: String,
        failures: Vec<ProbeFailure>,
    },

    /// Transport or TLS failure.
    #[error("Transport error at {url}: {message}")]
    Transport { url: String, message: String },

    /// The request exceeded its timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// A client could not be constructed from the identity.
    #[error("Cannot build client for {url}: {message}")]
    ClientBuild { url: String, message: String },
}

/// Malformed or incomplete requests, rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Errors that can occur during scope client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// Non-success reply from the cluster.
    #[error("API error ({status}) at {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Rate limited on every attempt.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// The cluster replied with a payload of an unexpected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification used by callers and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Query,
    Api,
    Response,
    Config,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Query => "query",
            ErrorKind::Api => "api",
            ErrorKind::Response => "response",
            ErrorKind::Config => "config",
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Query(_) => ErrorKind::Query,
            Self::Api { .. } | Self::MaxRetriesExceeded(_) => ErrorKind::Api,
            Self::InvalidResponse(_) => ErrorKind::Response,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if this error is worth retrying later.
    ///
    /// Connectivity failures and 429/502/503/504 replies are retryable; request
    /// defects and configuration errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(ConnectionError::ServerNotFound { .. })
            | Self::Connection(ConnectionError::ClientBuild { .. }) => false,
            Self::Connection(_) | Self::MaxRetriesExceeded(_) => true,
            Self::Api { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    pub(crate) fn invalid_response(context: &str, err: impl fmt::Display) -> Self {
        Self::InvalidResponse(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = ClientError::from(QueryError::MissingField("index"));
        assert_eq!(err.kind(), ErrorKind::Query);
        assert_eq!(err.to_string(), "index is required");

        let err = ClientError::from(ConnectionError::ServerNotFound {
            id: "prod".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.to_string(), "Server config not found for ID: prod");
    }

    #[test]
    fn test_is_retryable() {
        let timeout = ClientError::from(ConnectionError::Timeout {
            url: "http://h:9200".to_string(),
        });
        assert!(timeout.is_retryable());

        let missing = ClientError::from(ConnectionError::ServerNotFound {
            id: "x".to_string(),
        });
        assert!(!missing.is_retryable());

        let query = ClientError::from(QueryError::MissingField("index"));
        assert!(!query.is_retryable());

        let unavailable = ClientError::Api {
            status: 503,
            url: "http://h:9200".to_string(),
            message: "unavailable".to_string(),
        };
        assert!(unavailable.is_retryable());

        let bad_request = ClientError::Api {
            status: 400,
            url: "http://h:9200".to_string(),
            message: "parse".to_string(),
        };
        assert!(!bad_request.is_retryable());
    }

    #[test]
    fn test_probe_failed_lists_every_attempt() {
        let err = ConnectionError::ProbeFailed {
            url: "http://h:9200".to_string(),
            failures: vec![
                ProbeFailure {
                    major_version: 8,
                    error: Box::new(ClientError::Api {
                        status: 400,
                        url: "http://h:9200/".to_string(),
                        message: "bad accept".to_string(),
                    }),
                },
                ProbeFailure {
                    major_version: 7,
                    error: Box::new(ClientError::from(ConnectionError::Timeout {
                        url: "http://h:9200/".to_string(),
                    })),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to connect to cluster at http://h:9200"));
        assert!(message.contains("v8: API error (400)"));
        assert!(message.contains("v7: Request to http://h:9200/ timed out"));
    }
}
