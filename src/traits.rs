//! Entry-point traits implemented by connectors.
//!
//! The indexing framework drives a connector through these traits. Each
//! retrieval entry point returns a lazy sequence of batches: the framework
//! pulls batches one at a time and may stop at any point, in which case no
//! further remote calls are made.
//!
//! ```text
//! load_credentials ──▶ Ready ──┬─▶ load_from_state()               → Vec<Document> batches
//!                              ├─▶ poll_source(start, end)         → Vec<Document> batches
//!                              ├─▶ retrieve_all_slim_documents(..) → Vec<SlimDocument> batches
//!                              └─▶ validate_connector_settings()
//! ```
//!
//! Calling any retrieval or validation method before credentials are loaded
//! fails with [`ConnectorError::MissingCredential`](crate::error::ConnectorError::MissingCredential).

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Document, SlimDocument};

/// Lazy sequence of document batches borrowing the connector.
pub type DocumentBatches<'a> = Box<dyn Iterator<Item = Result<Vec<Document>>> + 'a>;

/// Lazy sequence of slim document batches borrowing the connector.
pub type SlimDocumentBatches<'a> = Box<dyn Iterator<Item = Result<Vec<SlimDocument>>> + 'a>;

/// Epoch seconds, UTC.
pub type SecondsSinceUnixEpoch = i64;

/// A connector that can produce a full snapshot of its source.
pub trait LoadConnector {
    /// Build and store the authenticated client.
    ///
    /// Recognized keys are connector specific; see
    /// [`client`](crate::client) for the Jira ones.
    fn load_credentials(&mut self, credentials: &HashMap<String, String>) -> Result<()>;

    /// Every document in scope, in batches of the configured size.
    ///
    /// The last batch holds the remainder and may be empty; at least one
    /// batch is always produced.
    fn load_from_state(&self) -> Result<DocumentBatches<'_>>;
}

/// A connector that can produce documents updated within a time window.
pub trait PollConnector {
    /// Documents updated between `start` and `end` (both inclusive, minute
    /// granularity), batched like [`LoadConnector::load_from_state`].
    fn poll_source(
        &self,
        start: SecondsSinceUnixEpoch,
        end: SecondsSinceUnixEpoch,
    ) -> Result<DocumentBatches<'_>>;
}

/// A connector that can list document ids without fetching content.
pub trait SlimConnector {
    /// Identifiers of every document in scope.
    ///
    /// The time bounds are accepted for interface symmetry; connectors may
    /// ignore them.
    fn retrieve_all_slim_documents(
        &self,
        start: Option<SecondsSinceUnixEpoch>,
        end: Option<SecondsSinceUnixEpoch>,
    ) -> Result<SlimDocumentBatches<'_>>;
}

/// A connector that can check its settings against the remote.
pub trait ValidatingConnector {
    fn validate_connector_settings(&self) -> Result<()>;
}
