//! Error types for infrahub-client
//!
//! This module provides the error handling for the library, including:
//! - URL construction errors raised before any request is sent ([`UrlError`])
//! - Service errors (login refused, non-200 responses, undecodable bodies)
//! - Transport errors and the bounded-retry exhaustion report of artifact downloads
//! - A coarse [`ErrorKind`] classification for callers that branch on failure class

use std::time::Duration;
use thiserror::Error;

/// Result type alias for infrahub-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// The client operation (phase) an error belongs to
///
/// Every service-facing error names its phase so operators can tell a bad
/// login from a failing query or a flaky artifact download.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /api/auth/login`
    Login,
    /// `POST /api/query/{name}`
    Query,
    /// `GET /api/artifact/{id}`
    Artifact,
}

impl Operation {
    /// Short lowercase name used in error messages and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Query => "query",
            Operation::Artifact => "artifact",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for infrahub-client
#[derive(Debug, Error)]
pub enum Error {
    /// The request URL could not be built; no request was sent
    #[error("failed to build {operation} URL: {source}")]
    Build {
        /// Operation whose URL failed to build
        operation: Operation,
        /// The underlying URL construction failure
        #[source]
        source: UrlError,
    },

    /// The login endpoint answered with a non-200 status
    #[error("login failed with status {status}")]
    Auth {
        /// HTTP status code returned by the service
        status: u16,
    },

    /// The service answered with a non-200 status
    #[error("{operation} failed with status {status}")]
    Status {
        /// Operation that received the status
        operation: Operation,
        /// HTTP status code returned by the service
        status: u16,
    },

    /// Connection-level failure (refused, timed out, DNS, body read)
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation whose request failed
        operation: Operation,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// A JSON response body was empty, malformed, or of the wrong shape
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        /// Operation whose response failed to decode
        operation: Operation,
        /// The underlying parse error, preserved verbatim
        #[source]
        source: serde_json::Error,
    },

    /// Every artifact download attempt failed
    #[error("failed to download artifact after retries ({attempts} attempts), {last}")]
    RetryExhausted {
        /// Number of attempts made, including the first
        attempts: u32,
        /// What the final attempt observed
        last: DownloadFailure,
    },

    /// The caller's time budget ran out
    #[error("{operation} timed out after {budget:?}")]
    Timeout {
        /// Operation that ran out of time
        operation: Operation,
        /// The budget that was exceeded
        budget: Duration,
    },

    /// Downloaded payload does not match the checksum the service reported
    #[error("artifact checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum from the artifact record
        expected: String,
        /// Checksum computed over the downloaded bytes
        actual: String,
    },

    /// Local I/O error while writing a downloaded artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "request_timeout")
        key: Option<String>,
    },
}

/// URL construction errors, raised before any network call
#[derive(Debug, Error)]
pub enum UrlError {
    /// The base URL does not parse or cannot carry a path
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The path template names a placeholder with no value supplied
    #[error("missing path param '{name}' for template '{template}'")]
    MissingPathParam {
        /// Placeholder name without the leading colon
        name: String,
        /// The template being expanded
        template: String,
    },

    /// A query parameter failed its format check (only `at` is checked)
    #[error("invalid '{name}' query param format: {value:?}")]
    InvalidQueryParam {
        /// Parameter name
        name: String,
        /// The rejected value
        value: String,
    },
}

impl UrlError {
    /// True for caller-input errors (bad `at`, missing path param) as opposed
    /// to an unusable base URL
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UrlError::MissingPathParam { .. } | UrlError::InvalidQueryParam { .. }
        )
    }
}

/// What the final artifact download attempt observed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadFailure {
    /// The service answered with a definite non-200 status
    Status(u16),
    /// No response was received
    Transport(String),
}

impl std::fmt::Display for DownloadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadFailure::Status(code) => write!(f, "last status code: {code}"),
            DownloadFailure::Transport(reason) => write!(f, "last transport error: {reason}"),
        }
    }
}

/// Coarse failure class of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed `at` value or missing path parameter
    Validation,
    /// Unusable base URL
    Build,
    /// Login refused
    Auth,
    /// Connection-level failure
    Transport,
    /// Definite non-200 response
    Status,
    /// Undecodable response body
    Decode,
    /// Artifact download gave up after bounded retries
    RetryExhausted,
    /// Caller's time budget exceeded
    Timeout,
    /// Payload checksum did not match
    Checksum,
    /// Local I/O failure
    Io,
    /// Invalid client configuration
    Config,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Build { source, .. } if source.is_validation() => ErrorKind::Validation,
            Error::Build { .. } => ErrorKind::Build,
            Error::Auth { .. } => ErrorKind::Auth,
            Error::Status { .. } => ErrorKind::Status,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::RetryExhausted { .. } => ErrorKind::RetryExhausted,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::ChecksumMismatch { .. } => ErrorKind::Checksum,
            Error::Io(_) => ErrorKind::Io,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status } | Error::Status { status, .. } => Some(*status),
            Error::RetryExhausted {
                last: DownloadFailure::Status(code),
                ..
            } => Some(*code),
            _ => None,
        }
    }
}
