//! Error taxonomy for the Jira connector.
//!
//! Retrieval and validation failures surface as [`ConnectorError`]. The
//! variants map one-to-one onto the conditions a caller may want to react
//! to: missing or expired credentials, permission problems, invalid
//! settings, and protocol violations from the remote search API.

use thiserror::Error;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Unified connector error type.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// A retrieval or validation call was made before credentials were loaded,
    /// or the credential map lacks a required key.
    #[error("{0} connector is missing credentials")]
    MissingCredential(String),

    /// The remote rejected the credentials (HTTP 401).
    #[error("{0}")]
    CredentialExpired(String),

    /// The credentials lack access to the requested resource (HTTP 403).
    #[error("{0}")]
    InsufficientPermissions(String),

    /// The connector settings do not resolve against the remote
    /// (unknown project, rate limited during validation).
    #[error("{0}")]
    Validation(String),

    /// A search response contained an element that is not an issue.
    #[error("Found Jira object not of type Issue: {0}")]
    UnexpectedRecordType(String),

    /// Unclassified remote failure during validation, with the original message.
    #[error("{0}")]
    Unexpected(String),

    /// The remote answered with a non-success status.
    #[error("Jira API request failed (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON shape we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConnectorError {
    /// HTTP status carried by the error, if the remote produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Create an error for a non-success HTTP reply.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }
}
