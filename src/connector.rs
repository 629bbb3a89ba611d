//! Jira connector.
//!
//! [`JiraConnector`] owns the connection state and JQL construction, and
//! wires the [`SearchPager`] → [`IssueTransformer`] → [`Batches`] chain for
//! each retrieval mode.
//!
//! # Configuration
//!
//! ```toml
//! [jira]
//! base_url = "https://acme.atlassian.net"
//! project_key = "OPS"
//! labels_to_skip = ["secret"]
//! comment_email_blacklist = ["automation@acme.io"]
//! ```
//!
//! # Queries
//!
//! | Mode | JQL |
//! |------|-----|
//! | full load | `project = "OPS"` (empty without a project) |
//! | poll | `project = "OPS" AND updated >= 'YYYY-MM-DD HH:MM' AND updated <= 'YYYY-MM-DD HH:MM'` |
//! | slim | same as full load, `fields=key` |
//!
//! Poll bounds are inclusive on both ends, so an issue updated during the
//! boundary minute is emitted by both adjacent polls.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::batch::Batches;
use crate::client::{build_jira_client, JiraClient};
use crate::error::{ConnectorError, Result};
use crate::issue::DescriptionFormat;
use crate::models::{browse_url, SlimDocument};
use crate::pager::SearchPager;
use crate::time::jql_datetime;
use crate::traits::{
    DocumentBatches, LoadConnector, PollConnector, SecondsSinceUnixEpoch, SlimConnector,
    SlimDocumentBatches, ValidatingConnector,
};
use crate::transform::{IssueTransformer, TransformOptions};

/// Page size for content-bearing searches.
pub const FULL_PAGE_SIZE: usize = 50;
/// Page size and batch size for identifier-only listing.
pub const SLIM_PAGE_SIZE: usize = 500;
/// Default number of documents per emitted batch.
pub const DEFAULT_BATCH_SIZE: usize = 16;
/// Default maximum ticket content size, in bytes.
pub const DEFAULT_MAX_TICKET_SIZE: usize = 100 * 1024;

const SOURCE_NAME: &str = "Jira";

/// Settings for a [`JiraConnector`] instance.
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub base_url: String,
    pub project_key: Option<String>,
    pub batch_size: usize,
    pub labels_to_skip: Vec<String>,
    pub comment_email_blacklist: Vec<String>,
    pub max_ticket_size: usize,
    /// REST API version (`"2"` or `"3"`); also selects the body format.
    pub api_version: String,
    pub timeout: Duration,
}

impl JiraSettings {
    /// Settings with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            project_key: None,
            batch_size: DEFAULT_BATCH_SIZE,
            labels_to_skip: Vec::new(),
            comment_email_blacklist: Vec::new(),
            max_ticket_size: DEFAULT_MAX_TICKET_SIZE,
            api_version: "2".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Incremental Jira issue connector.
pub struct JiraConnector {
    base_url: String,
    project_key: Option<String>,
    batch_size: usize,
    labels_to_skip: HashSet<String>,
    comment_email_blacklist: Vec<String>,
    max_ticket_size: usize,
    api_version: String,
    description_format: DescriptionFormat,
    timeout: Duration,
    client: Option<Box<dyn JiraClient>>,
}

impl JiraConnector {
    pub fn new(settings: JiraSettings) -> Self {
        let project_key = settings
            .project_key
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            project_key,
            batch_size: settings.batch_size.max(1),
            labels_to_skip: settings.labels_to_skip.into_iter().collect(),
            comment_email_blacklist: settings
                .comment_email_blacklist
                .iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            max_ticket_size: settings.max_ticket_size,
            description_format: DescriptionFormat::from_api_version(&settings.api_version),
            api_version: settings.api_version,
            timeout: settings.timeout,
            client: None,
        }
    }

    /// Install an already authenticated client instead of building one
    /// from credentials.
    pub fn with_client(mut self, client: Box<dyn JiraClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project_key(&self) -> Option<&str> {
        self.project_key.as_deref()
    }

    fn client(&self) -> Result<&dyn JiraClient> {
        self.client
            .as_deref()
            .ok_or_else(|| ConnectorError::MissingCredential(SOURCE_NAME.to_string()))
    }

    /// Scope filter: the configured project, or empty for every accessible
    /// project. The key is quoted to tolerate JQL reserved words.
    pub fn jql_query(&self) -> String {
        match &self.project_key {
            Some(project) => format!("project = \"{}\"", project),
            None => String::new(),
        }
    }

    /// Scope filter conjoined with an inclusive, minute-granularity
    /// `updated` window.
    pub fn poll_jql(
        &self,
        start: SecondsSinceUnixEpoch,
        end: SecondsSinceUnixEpoch,
    ) -> Result<String> {
        let render = |ts: SecondsSinceUnixEpoch| {
            jql_datetime(ts).ok_or_else(|| {
                ConnectorError::Validation(format!("Poll bound out of range: {}", ts))
            })
        };
        let window = format!(
            "updated >= '{}' AND updated <= '{}'",
            render(start)?,
            render(end)?
        );

        let scope = self.jql_query();
        if scope.is_empty() {
            Ok(window)
        } else {
            Ok(format!("{} AND {}", scope, window))
        }
    }

    fn transform_options(&self, client: &dyn JiraClient) -> TransformOptions {
        TransformOptions {
            base_url: client.base_url().trim_end_matches('/').to_string(),
            comment_email_blacklist: self.comment_email_blacklist.clone(),
            labels_to_skip: self.labels_to_skip.clone(),
            max_ticket_size: self.max_ticket_size,
            description_format: self.description_format,
        }
    }

    fn document_batches(&self, jql: String) -> Result<DocumentBatches<'_>> {
        let client = self.client()?;
        let pager = SearchPager::new(client, jql, FULL_PAGE_SIZE, None);
        let documents = IssueTransformer::new(pager, self.transform_options(client));
        Ok(Box::new(Batches::new(documents, self.batch_size)))
    }
}

impl LoadConnector for JiraConnector {
    fn load_credentials(&mut self, credentials: &HashMap<String, String>) -> Result<()> {
        let client = build_jira_client(credentials, &self.base_url, &self.api_version, self.timeout)?;
        self.client = Some(Box::new(client));
        Ok(())
    }

    fn load_from_state(&self) -> Result<DocumentBatches<'_>> {
        self.document_batches(self.jql_query())
    }
}

impl PollConnector for JiraConnector {
    fn poll_source(
        &self,
        start: SecondsSinceUnixEpoch,
        end: SecondsSinceUnixEpoch,
    ) -> Result<DocumentBatches<'_>> {
        // check credentials before rendering the window
        self.client()?;
        let jql = self.poll_jql(start, end)?;
        self.document_batches(jql)
    }
}

impl SlimConnector for JiraConnector {
    fn retrieve_all_slim_documents(
        &self,
        _start: Option<SecondsSinceUnixEpoch>,
        _end: Option<SecondsSinceUnixEpoch>,
    ) -> Result<SlimDocumentBatches<'_>> {
        let client = self.client()?;
        let base_url = client.base_url().trim_end_matches('/').to_string();
        let slim_docs = SearchPager::new(client, self.jql_query(), SLIM_PAGE_SIZE, Some("key"))
            .map(move |issue| {
                issue.map(|issue| SlimDocument {
                    id: browse_url(&base_url, &issue.key),
                    perm_sync_data: None,
                })
            });
        Ok(Box::new(Batches::new(slim_docs, SLIM_PAGE_SIZE)))
    }
}

impl ValidatingConnector for JiraConnector {
    fn validate_connector_settings(&self) -> Result<()> {
        let client = self.client()?;
        match self.project_key.as_deref() {
            Some(project) => client
                .project(project)
                .map(|_| ())
                .map_err(|e| validation_error(e, Some(project))),
            None => client
                .projects()
                .map(|_| ())
                .map_err(|e| validation_error(e, None)),
        }
    }
}

/// Map a remote failure during validation onto the error taxonomy.
fn validation_error(err: ConnectorError, project: Option<&str>) -> ConnectorError {
    match (err.status(), project) {
        (Some(401), _) => ConnectorError::CredentialExpired(
            "Jira credential appears to be expired or invalid (HTTP 401).".to_string(),
        ),
        (Some(403), Some(_)) => ConnectorError::InsufficientPermissions(
            "Your Jira token does not have sufficient permissions for this project (HTTP 403)."
                .to_string(),
        ),
        (Some(403), None) => ConnectorError::InsufficientPermissions(
            "Your Jira token does not have sufficient permissions to list projects (HTTP 403)."
                .to_string(),
        ),
        (Some(404), Some(project)) => {
            ConnectorError::Validation(format!("Jira project not found with key: {}", project))
        }
        (Some(429), _) => ConnectorError::Validation(
            "Validation failed due to Jira rate-limits being exceeded. Please try again later."
                .to_string(),
        ),
        _ => ConnectorError::Unexpected(format!(
            "Unexpected Jira error during validation: {}",
            err
        )),
    }
}
