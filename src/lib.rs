//! # Jira Connector
//!
//! Incrementally extracts Jira issues and converts them into normalized
//! [`Document`](models::Document)s for a downstream indexing pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌────────────────┐
//! │ SearchPager  │──▶│ IssueTransformer │──▶│    Batches     │──▶ indexer
//! │ JQL + offset │   │ filter + extract │   │ fixed-size Vec │
//! └──────┬───────┘   └──────────────────┘   └────────────────┘
//!        │ search_issues()
//!        ▼
//!  ┌────────────┐
//!  │ JiraClient │  (REST API, blocking)
//!  └────────────┘
//! ```
//!
//! Every stage is a lazy iterator: the caller pulls batches, each batch
//! pulls documents, and each document pulls issues from the current page.
//! Stopping early stops the remote calls.
//!
//! ## Quick Start
//!
//! ```bash
//! jira-sync validate                  # check credentials and project
//! jira-sync load                      # full snapshot, one JSON batch per line
//! jira-sync poll --start 1700000000 --end 1700003600
//! jira-sync slim                      # ids only
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector`] | Connector orchestration and JQL construction |
//! | [`client`] | Jira REST client |
//! | [`pager`] | Offset pagination over search results |
//! | [`transform`] | Issue → document conversion |
//! | [`issue`] | Raw issue accessors |
//! | [`adf`] | Atlassian Document Format flattening |
//! | [`batch`] | Fixed-size batching |
//! | [`models`] | Output data types |
//! | [`traits`] | Connector entry-point traits |
//! | [`error`] | Error taxonomy |
//! | [`time`] | Timestamp conversions |

pub mod adf;
pub mod batch;
pub mod client;
pub mod config;
pub mod connector;
pub mod error;
pub mod issue;
pub mod models;
pub mod pager;
#[cfg(test)]
mod testing;
pub mod time;
pub mod traits;
pub mod transform;

pub use connector::{JiraConnector, JiraSettings};
pub use error::{ConnectorError, Result};
pub use traits::{LoadConnector, PollConnector, SlimConnector, ValidatingConnector};
