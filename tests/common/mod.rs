#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use jira_connector::client::JiraClient;
use jira_connector::error::Result;

pub const BASE_URL: &str = "https://acme.atlassian.net";

/// `(jql, start_at, max_results, fields)` of one search call.
pub type Call = (String, usize, usize, Option<String>);

/// Scripted Jira client sharing its call log with the test.
pub struct ScriptedClient {
    issues: Vec<Value>,
    log: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedClient {
    pub fn new(issues: Vec<Value>) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                issues,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl JiraClient for ScriptedClient {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn search_issues(
        &self,
        jql: &str,
        start_at: usize,
        max_results: usize,
        fields: Option<&str>,
    ) -> Result<Vec<Value>> {
        self.log.lock().unwrap().push((
            jql.to_string(),
            start_at,
            max_results,
            fields.map(String::from),
        ));
        Ok(self
            .issues
            .iter()
            .skip(start_at)
            .take(max_results)
            .cloned()
            .collect())
    }

    fn project(&self, key: &str) -> Result<Value> {
        Ok(json!({ "key": key }))
    }

    fn projects(&self) -> Result<Vec<Value>> {
        Ok(vec![])
    }
}

/// A complete raw issue as returned by `GET /rest/api/2/search`.
pub fn issue_json(n: usize) -> Value {
    json!({
        "id": format!("{}", 10000 + n),
        "key": format!("OPS-{}", n),
        "fields": {
            "summary": format!("Issue number {}", n),
            "description": format!("Body of issue {}", n),
            "updated": "2023-11-14T22:13:20.000+0000",
            "labels": ["ops"],
            "priority": {"name": "Medium"},
            "status": {"name": "Open"},
            "resolution": null,
            "creator": {"displayName": "Alice", "emailAddress": "alice@acme.io"},
            "assignee": null,
            "comment": {"comments": [
                {"author": {"emailAddress": "bob@acme.io"}, "body": "Looking into it"}
            ]}
        }
    })
}

pub fn issues_json(range: std::ops::RangeInclusive<usize>) -> Vec<Value> {
    range.map(issue_json).collect()
}
