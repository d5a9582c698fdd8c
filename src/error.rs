//! Error types for outage-sync
//!
//! This module defines the error taxonomy used by the synchronization pipeline.
//! All error types use `thiserror` for ergonomic error handling.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ConfigError;

/// Kind of a [`SyncError`], for inspecting errors by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad local input, rejected before any remote call
    InvalidArgument,
    /// Remote returned HTTP 400
    InvalidRequest,
    /// Remote returned HTTP 403
    AccessDenied,
    /// Remote returned HTTP 404
    NotFound,
    /// Remote returned HTTP 429
    RateLimited,
    /// Any other HTTP error status, or a transport/timeout failure
    RemoteFailure,
    /// Malformed backoff configuration
    InvalidPolicy,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid_argument"),
            ErrorKind::InvalidRequest => write!(f, "invalid_request"),
            ErrorKind::AccessDenied => write!(f, "access_denied"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::RateLimited => write!(f, "rate_limited"),
            ErrorKind::RemoteFailure => write!(f, "remote_failure"),
            ErrorKind::InvalidPolicy => write!(f, "invalid_policy"),
        }
    }
}

/// Synchronization-related errors
#[derive(Debug, Error, Clone)]
pub enum SyncError {
    /// Bad local input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Remote rejected the request (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote refused access (403)
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Remote resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the remote (429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Generic remote or transport failure
    #[error("Remote failure: {message}")]
    RemoteFailure {
        /// Human-readable message
        message: String,
        /// Underlying transport error, if any
        #[source]
        cause: Option<Arc<reqwest::Error>>,
    },

    /// Malformed retry policy
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),
}

impl SyncError {
    /// Create a remote failure without an underlying cause
    pub fn remote(message: impl Into<String>) -> Self {
        SyncError::RemoteFailure {
            message: message.into(),
            cause: None,
        }
    }

    /// Create a remote failure wrapping a transport error
    pub fn transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            err.to_string()
        };

        SyncError::RemoteFailure {
            message,
            cause: Some(Arc::new(err)),
        }
    }

    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SyncError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SyncError::AccessDenied(_) => ErrorKind::AccessDenied,
            SyncError::NotFound(_) => ErrorKind::NotFound,
            SyncError::RateLimited(_) => ErrorKind::RateLimited,
            SyncError::RemoteFailure { .. } => ErrorKind::RemoteFailure,
            SyncError::InvalidPolicy(_) => ErrorKind::InvalidPolicy,
        }
    }

    /// The message without the kind prefix, as surfaced to users
    pub fn message(&self) -> &str {
        match self {
            SyncError::InvalidArgument(m)
            | SyncError::InvalidRequest(m)
            | SyncError::AccessDenied(m)
            | SyncError::NotFound(m)
            | SyncError::RateLimited(m)
            | SyncError::InvalidPolicy(m) => m,
            SyncError::RemoteFailure { message, .. } => message,
        }
    }
}

/// Application-level error type
///
/// Aggregates the domain-specific error types for the command entry point.
#[derive(Debug, Error)]
pub enum AppError {
    /// Synchronization error
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Message shown to the user on failure
    ///
    /// Pipeline errors are reported verbatim; configuration errors keep their
    /// description.
    pub fn message(&self) -> String {
        match self {
            AppError::Sync(err) => err.message().to_string(),
            AppError::Config(err) => err.to_string(),
        }
    }
}

/// Trait for determining if an error is retryable
pub trait RetryableError {
    /// Returns true if the error is retryable
    fn is_retryable(&self) -> bool;
}

impl RetryableError for SyncError {
    fn is_retryable(&self) -> bool {
        match self {
            SyncError::RateLimited(_) => true,
            SyncError::RemoteFailure { .. } => true,

            SyncError::InvalidArgument(_) => false,
            SyncError::InvalidRequest(_) => false,
            SyncError::AccessDenied(_) => false,
            SyncError::NotFound(_) => false,
            SyncError::InvalidPolicy(_) => false,
        }
    }
}
