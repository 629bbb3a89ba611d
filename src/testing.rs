//! In-memory [`JiraClient`] used by unit tests.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::client::JiraClient;
use crate::error::{ConnectorError, Result};

/// Arguments of one recorded `search_issues` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub jql: String,
    pub start_at: usize,
    pub max_results: usize,
    pub fields: Option<String>,
}

/// Serves a fixed list of raw issues and records every search call.
pub struct FakeJiraClient {
    pub base_url: String,
    pub issues: Vec<Value>,
    pub calls: Mutex<Vec<SearchCall>>,
    /// HTTP status returned by the project lookups; `None` means success.
    pub lookup_status: Option<u16>,
    /// Fail the search call with this offset.
    pub fail_at: Option<usize>,
}

impl FakeJiraClient {
    pub fn new(issues: Vec<Value>) -> Self {
        Self {
            base_url: "https://acme.atlassian.net".to_string(),
            issues,
            calls: Mutex::new(Vec::new()),
            lookup_status: None,
            fail_at: None,
        }
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl JiraClient for FakeJiraClient {
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
        self.calls.lock().unwrap().push(SearchCall {
            jql: jql.to_string(),
            start_at,
            max_results,
            fields: fields.map(String::from),
        });
        if self.fail_at == Some(start_at) {
            return Err(ConnectorError::http(503, "unavailable"));
        }
        Ok(self
            .issues
            .iter()
            .skip(start_at)
            .take(max_results)
            .cloned()
            .collect())
    }

    fn project(&self, key: &str) -> Result<Value> {
        match self.lookup_status {
            Some(status) => Err(ConnectorError::http(status, "lookup failed")),
            None => Ok(json!({"key": key})),
        }
    }

    fn projects(&self) -> Result<Vec<Value>> {
        match self.lookup_status {
            Some(status) => Err(ConnectorError::http(status, "lookup failed")),
            None => Ok(vec![json!({"key": "OPS"})]),
        }
    }
}

/// A well-formed raw issue with the given key and summary.
pub fn raw_issue(key: &str, summary: &str) -> Value {
    json!({
        "key": key,
        "fields": {
            "summary": summary,
            "description": format!("Description of {}", key),
            "updated": "2023-11-14T22:13:20.000+0000",
            "labels": [],
            "comment": {"comments": []}
        }
    })
}

/// `n` well-formed issues keyed `OPS-1` .. `OPS-n`.
pub fn raw_issues(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| raw_issue(&format!("OPS-{}", i), &format!("Issue {}", i)))
        .collect()
}
