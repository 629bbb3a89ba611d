//! Jira REST client.
//!
//! [`JiraClient`] is the boundary between the connector and the remote
//! service: a paged search call plus the two project lookups used by
//! settings validation. [`HttpJiraClient`] implements it over the Jira REST
//! API with a blocking `reqwest` client.
//!
//! # Authentication
//!
//! - Jira Cloud: `jira_user_email` + `jira_api_token` → HTTP basic auth.
//! - Jira Server / Data Center: `jira_api_token` alone is sent as a bearer
//!   personal access token.
//!
//! # Endpoints
//!
//! | Call | Request |
//! |------|---------|
//! | [`search_issues`](JiraClient::search_issues) | `GET /rest/api/{v}/search?jql=&startAt=&maxResults=[&fields=]` |
//! | [`project`](JiraClient::project) | `GET /rest/api/{v}/project/{key}` |
//! | [`projects`](JiraClient::projects) | `GET /rest/api/{v}/project` |

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConnectorError, Result};

/// Credential key holding the account email (Jira Cloud).
pub const CREDENTIAL_USER_EMAIL: &str = "jira_user_email";
/// Credential key holding the API token or personal access token.
pub const CREDENTIAL_API_TOKEN: &str = "jira_api_token";

/// Longest slice of an error response body kept in [`ConnectorError::Http`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Authenticated handle to a Jira instance.
pub trait JiraClient: Send + Sync {
    /// Base URL of the instance, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Run one page of a JQL search.
    ///
    /// Returns the raw `issues` array in server order. `fields` restricts
    /// the returned fields (e.g. `"key"`); `None` returns the server default.
    fn search_issues(
        &self,
        jql: &str,
        start_at: usize,
        max_results: usize,
        fields: Option<&str>,
    ) -> Result<Vec<Value>>;

    /// Fetch a single project descriptor by key.
    fn project(&self, key: &str) -> Result<Value>;

    /// List the projects visible to the credentials.
    fn projects(&self) -> Result<Vec<Value>>;
}

#[derive(Debug, Clone)]
enum JiraAuth {
    Basic { email: String, token: String },
    Bearer(String),
}

impl JiraAuth {
    fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { email, token } => req.basic_auth(email, Some(token)),
            Self::Bearer(token) => req.bearer_auth(token),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<Value>,
}

/// [`JiraClient`] backed by the Jira REST API.
#[derive(Debug, Clone)]
pub struct HttpJiraClient {
    http: Client,
    base_url: String,
    api_version: String,
    auth: JiraAuth,
}

impl HttpJiraClient {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}/rest/api/{}/{}", self.base_url, self.api_version, path);
        let req = self
            .http
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/json");
        let resp = self.auth.apply(req).send()?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(ConnectorError::http(
                status,
                body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
            ));
        }
        Ok(resp)
    }
}

impl JiraClient for HttpJiraClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_issues(
        &self,
        jql: &str,
        start_at: usize,
        max_results: usize,
        fields: Option<&str>,
    ) -> Result<Vec<Value>> {
        let mut query = vec![
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(fields) = fields {
            query.push(("fields", fields.to_string()));
        }
        let text = self.get("search", &query)?.text()?;
        let page: SearchResponse = serde_json::from_str(&text)?;
        Ok(page.issues)
    }

    fn project(&self, key: &str) -> Result<Value> {
        let text = self.get(&format!("project/{}", key), &[])?.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn projects(&self) -> Result<Vec<Value>> {
        let text = self.get("project", &[])?.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Build an authenticated [`HttpJiraClient`] from a credential map.
///
/// `base_url` must already be normalized (no trailing slash).
///
/// # Errors
///
/// - [`ConnectorError::MissingCredential`] if `jira_api_token` is absent or blank.
/// - [`ConnectorError::Transport`] if the HTTP client cannot be constructed.
pub fn build_jira_client(
    credentials: &HashMap<String, String>,
    base_url: &str,
    api_version: &str,
    timeout: Duration,
) -> Result<HttpJiraClient> {
    let token = credentials
        .get(CREDENTIAL_API_TOKEN)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ConnectorError::MissingCredential("Jira".to_string()))?
        .to_string();

    let auth = match credentials
        .get(CREDENTIAL_USER_EMAIL)
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
    {
        Some(email) => JiraAuth::Basic {
            email: email.to_string(),
            token,
        },
        None => JiraAuth::Bearer(token),
    };

    let http = Client::builder()
        .user_agent(concat!("jira-connector/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;

    Ok(HttpJiraClient {
        http,
        base_url: base_url.trim_end_matches('/').to_string(),
        api_version: api_version.to_string(),
        auth,
    })
}
