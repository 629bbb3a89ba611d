//! Issue → document transformation.
//!
//! [`IssueTransformer`] wraps a sequence of raw [`Issue`]s (usually a
//! [`SearchPager`](crate::pager::SearchPager)) and yields normalized
//! [`Document`]s. Records are dropped, not failed, when they carry a label
//! from the skip list or when their assembled content exceeds the size
//! limit. Optional fields (owners, metadata, individual comments) are
//! resolved independently; a missing or malformed one is simply left out.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::error::Result;
use crate::issue::{DescriptionFormat, Issue};
use crate::models::{browse_url, Document, DocumentSource, MetadataValue, Person, TextSection};
use crate::time::parse_jira_time;

/// Prefix written before each comment in the document body.
const COMMENT_PREFIX: &str = "Comment: ";

/// Fields surfaced by display name in document metadata.
const NAMED_METADATA_FIELDS: &[&str] = &["priority", "status", "resolution"];

/// Settings applied to every issue by an [`IssueTransformer`].
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Base URL used to build document ids, without a trailing slash.
    pub base_url: String,
    /// Comment authors whose comments are excluded.
    pub comment_email_blacklist: Vec<String>,
    /// Issues carrying any of these labels are skipped (case-sensitive).
    pub labels_to_skip: HashSet<String>,
    /// Maximum UTF-8 size of the assembled content, in bytes.
    pub max_ticket_size: usize,
    pub description_format: DescriptionFormat,
}

impl TransformOptions {
    fn is_blacklisted(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.comment_email_blacklist
            .iter()
            .any(|blocked| blocked.trim().to_lowercase() == email)
    }
}

/// Lazy iterator adaptor turning raw issues into documents.
pub struct IssueTransformer<I> {
    issues: I,
    options: TransformOptions,
}

impl<I> IssueTransformer<I>
where
    I: Iterator<Item = Result<Issue>>,
{
    pub fn new(issues: I, options: TransformOptions) -> Self {
        Self { issues, options }
    }
}

impl<I> Iterator for IssueTransformer<I>
where
    I: Iterator<Item = Result<Issue>>,
{
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.issues.next()? {
                Ok(issue) => {
                    if let Some(doc) = issue_to_document(&issue, &self.options) {
                        return Some(Ok(doc));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Convert one issue into a document.
///
/// Returns `None` when the issue is filtered out (skip label, oversized
/// content) or lacks the summary or update timestamp every document needs.
pub fn issue_to_document(issue: &Issue, options: &TransformOptions) -> Option<Document> {
    let labels = issue.labels();
    if !options.labels_to_skip.is_empty()
        && labels.iter().any(|l| options.labels_to_skip.contains(l))
    {
        info!(
            issue = %issue.key,
            ?labels,
            labels_to_skip = ?options.labels_to_skip,
            "skipping issue with a label to skip"
        );
        return None;
    }

    let description = issue
        .description_value()
        .and_then(|v| options.description_format.render(v))
        .unwrap_or_default();
    let comments = comment_texts(issue, options);
    let content = assemble_content(&description, &comments);

    if content.len() > options.max_ticket_size {
        info!(
            issue = %issue.key,
            size = content.len(),
            max = options.max_ticket_size,
            "skipping issue that exceeds the maximum ticket size"
        );
        return None;
    }

    let Some(summary) = issue.summary() else {
        warn!(issue = %issue.key, "skipping issue without a summary");
        return None;
    };
    let Some(updated_at) = issue.updated().and_then(parse_jira_time) else {
        warn!(
            issue = %issue.key,
            updated = ?issue.updated(),
            "skipping issue without a parseable update timestamp"
        );
        return None;
    };

    let link = browse_url(&options.base_url, &issue.key);
    let owners = owners(issue);

    Some(Document {
        id: link.clone(),
        sections: vec![TextSection {
            link,
            text: content,
        }],
        source: DocumentSource::Jira,
        semantic_identifier: format!("{}: {}", issue.key, summary),
        title: format!("{} {}", issue.key, summary),
        doc_updated_at: updated_at,
        primary_owners: (!owners.is_empty()).then_some(owners),
        metadata: metadata(issue, labels),
    })
}

/// Bodies of the comments that survive the author blacklist, in order.
fn comment_texts(issue: &Issue, options: &TransformOptions) -> Vec<String> {
    issue
        .comments()
        .into_iter()
        .filter(|c| !c.author_email.is_some_and(|e| options.is_blacklisted(e)))
        .filter_map(|c| c.body.and_then(|b| options.description_format.render(b)))
        .filter(|text| !text.is_empty())
        .collect()
}

fn assemble_content(description: &str, comments: &[String]) -> String {
    let comments = comments
        .iter()
        .map(|c| format!("{}{}", COMMENT_PREFIX, c))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}", description, comments)
}

/// Creator then assignee, deduplicated, unresolvable ones left out.
fn owners(issue: &Issue) -> Vec<Person> {
    let mut owners: Vec<Person> = Vec::with_capacity(2);
    for field in ["creator", "assignee"] {
        if let Some(person) = issue.person(field) {
            if !owners.contains(&person) {
                owners.push(person);
            }
        }
    }
    owners
}

fn metadata(issue: &Issue, labels: Vec<String>) -> BTreeMap<String, MetadataValue> {
    let mut metadata = BTreeMap::new();
    for field in NAMED_METADATA_FIELDS {
        if let Some(name) = issue.named_field(field) {
            metadata.insert(field.to_string(), MetadataValue::Single(name.to_string()));
        }
    }
    if !labels.is_empty() {
        metadata.insert("label".to_string(), MetadataValue::List(labels));
    }
    metadata
}
