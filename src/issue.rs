//! Raw issue records as returned by the Jira search API.
//!
//! An [`Issue`] wraps the untyped `fields` object of one search hit. Every
//! accessor returns an absent result (`None` or an empty collection) when the
//! field is missing or has an unexpected shape, so callers decide per field
//! whether absence matters.

use serde_json::Value;

use crate::adf;
use crate::error::{ConnectorError, Result};
use crate::models::Person;

/// How description and comment bodies are encoded by the remote.
///
/// Chosen once from the negotiated REST API version: v2 returns plain
/// strings, v3 returns Atlassian Document Format trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionFormat {
    #[default]
    Plain,
    RichText,
}

impl DescriptionFormat {
    /// Map a REST API version (`"2"`, `"3"`) to its body format.
    pub fn from_api_version(version: &str) -> Self {
        match version.trim() {
            "2" => Self::Plain,
            _ => Self::RichText,
        }
    }

    /// Render a description or comment body as text.
    ///
    /// Returns `None` when the value is null or of a shape this format
    /// cannot render.
    pub fn render(self, value: &Value) -> Option<String> {
        match (self, value) {
            (_, Value::String(s)) => Some(s.clone()),
            (Self::RichText, Value::Object(_)) => Some(adf::flatten(value)),
            _ => None,
        }
    }
}

/// One issue from a search response.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub fields: Value,
}

/// Borrowed view of one entry of `fields.comment.comments`.
#[derive(Debug, Clone, Copy)]
pub struct RawComment<'a> {
    pub author_email: Option<&'a str>,
    pub body: Option<&'a Value>,
}

impl Issue {
    /// Validate one element of a search response and wrap it.
    ///
    /// Fails with [`ConnectorError::UnexpectedRecordType`] when the element
    /// is not an object with a string `key` or when `fields` is present but
    /// not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => return Err(ConnectorError::UnexpectedRecordType(truncate(&other))),
        };
        let key = obj
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .map(String::from);
        let Some(key) = key else {
            return Err(ConnectorError::UnexpectedRecordType(truncate(
                &Value::Object(obj),
            )));
        };
        let fields = match obj.remove("fields") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(fields @ Value::Object(_)) => fields,
            Some(other) => {
                obj.insert("fields".to_string(), other);
                return Err(ConnectorError::UnexpectedRecordType(truncate(
                    &Value::Object(obj),
                )));
            }
        };
        Ok(Self { key, fields })
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn summary(&self) -> Option<&str> {
        self.field("summary").and_then(Value::as_str)
    }

    pub fn updated(&self) -> Option<&str> {
        self.field("updated").and_then(Value::as_str)
    }

    pub fn description_value(&self) -> Option<&Value> {
        self.field("description")
    }

    /// Issue labels; non-string entries are ignored.
    pub fn labels(&self) -> Vec<String> {
        self.field("labels")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `name` of an enum-like field such as `priority`, `status`,
    /// or `resolution`.
    pub fn named_field(&self, name: &str) -> Option<&str> {
        self.field(name)?.get("name").and_then(Value::as_str)
    }

    /// Resolve a user-valued field (`creator`, `assignee`, `reporter`).
    pub fn person(&self, name: &str) -> Option<Person> {
        person_from_value(self.field(name)?)
    }

    pub fn comments(&self) -> Vec<RawComment<'_>> {
        self.field("comment")
            .and_then(|c| c.get("comments"))
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter(|c| c.is_object())
                    .map(|c| RawComment {
                        author_email: c
                            .get("author")
                            .and_then(|a| a.get("emailAddress"))
                            .and_then(Value::as_str),
                        body: c.get("body").filter(|b| !b.is_null()),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build a [`Person`] from a Jira user object.
///
/// Returns `None` when neither a display name nor an email address is present.
pub fn person_from_value(value: &Value) -> Option<Person> {
    let non_empty = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    let display_name = non_empty("displayName");
    let email = non_empty("emailAddress");
    if display_name.is_none() && email.is_none() {
        return None;
    }
    Some(Person {
        display_name,
        email,
    })
}

fn truncate(value: &Value) -> String {
    value.to_string().chars().take(200).collect()
}
