//! Core data models emitted by the connector.
//!
//! These types represent the documents that flow from the connector into the
//! downstream indexing pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source system tag carried by every emitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Jira,
}

/// A person attached to an issue (creator, assignee).
///
/// At least one of the two fields is set; a person object with neither is
/// treated as unresolvable and never constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// A metadata value: either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Single(String),
    List(Vec<String>),
}

/// One content section of a document: a link plus its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSection {
    pub link: String,
    pub text: String,
}

/// Normalized document handed to the indexing pipeline.
///
/// `id` is the browse URL of the issue, so the same issue always maps to the
/// same document across polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub sections: Vec<TextSection>,
    pub source: DocumentSource,
    pub semantic_identifier: String,
    pub title: String,
    pub doc_updated_at: DateTime<Utc>,
    pub primary_owners: Option<Vec<Person>>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

/// Identifier-only document used for existence and deletion reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlimDocument {
    pub id: String,
    pub perm_sync_data: Option<serde_json::Value>,
}

/// Build the browse URL used as the stable document id for an issue.
pub fn browse_url(base_url: &str, issue_key: &str) -> String {
    format!("{}/browse/{}", base_url, issue_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_url_is_stable() {
        let a = browse_url("https://acme.atlassian.net", "OPS-1");
        let b = browse_url("https://acme.atlassian.net", "OPS-1");
        assert_eq!(a, "https://acme.atlassian.net/browse/OPS-1");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_metadata_value_serializes_untagged() {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "status".to_string(),
            MetadataValue::Single("Done".to_string()),
        );
        metadata.insert(
            "label".to_string(),
            MetadataValue::List(vec!["a".to_string(), "b".to_string()]),
        );
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["status"], "Done");
        assert_eq!(json["label"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_source_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentSource::Jira).unwrap();
        assert_eq!(json, "\"jira\"");
    }
}
