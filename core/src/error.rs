//! Error types for the Brik API client.
//!
//! # Design
//! Every service client reports failures through one `ApiError`, which pairs
//! the `Operation` being served with an `ErrorKind` from a single taxonomy.
//! `NotFound` gets a dedicated kind because callers branch on "the optional
//! resource does not exist yet" (no listing, no saved preferences). Other
//! non-2xx responses land in `InvalidResponse`, or `Server` when the backend
//! sent a structured message.

use thiserror::Error;

use crate::operation::Operation;

/// Failure of a single request/response cycle.
#[derive(Debug, Error)]
#[error("{operation} failed: {kind}")]
pub struct ApiError {
    pub operation: Operation,
    #[source]
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn new(operation: Operation, kind: ErrorKind) -> Self {
        Self { operation, kind }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// Whether the request never reached the network.
    pub fn failed_before_send(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidUrl(_) | ErrorKind::MissingAuthToken | ErrorKind::Encoding(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The endpoint path could not be resolved against the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// An authenticated operation was attempted with no stored token.
    #[error("missing auth token")]
    MissingAuthToken,

    /// DNS, connection, TLS or timeout failure below HTTP.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status, or no usable status at all (`None`, reported as -1).
    #[error("server returned status code {}", .status.map_or(-1, i32::from))]
    InvalidResponse { status: Option<u16> },

    /// 404 on an optional-resource fetch.
    #[error("resource not found")]
    NotFound,

    /// The response body did not match the expected shape.
    #[error("failed to decode server response: {0}")]
    Decoding(String),

    /// The request body could not be produced.
    #[error("failed to encode request: {0}")]
    Encoding(String),

    /// Non-2xx status with a message supplied by the backend.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ErrorKind {
    /// Status code carried by the failure, if any; -1 for an unusable status.
    pub fn status_code(&self) -> Option<i32> {
        match self {
            ErrorKind::InvalidResponse { status } => Some(status.map_or(-1, i32::from)),
            ErrorKind::Server { status, .. } => Some(i32::from(*status)),
            ErrorKind::NotFound => Some(404),
            _ => None,
        }
    }
}
