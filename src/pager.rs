//! Offset pagination over the Jira search endpoint.
//!
//! [`SearchPager`] turns a JQL query into a lazy sequence of [`Issue`]s.
//! Pages are requested on demand: nothing is fetched before the first
//! `next()`, and dropping the pager stops all further requests.
//!
//! A page shorter than `page_size` ends the sequence. When the total is an
//! exact multiple of `page_size`, one extra (empty) page is requested to
//! observe the end.

use std::collections::VecDeque;

use serde_json::Value;
use tracing::debug;

use crate::client::JiraClient;
use crate::error::Result;
use crate::issue::Issue;

/// Lazy iterator over the issues matched by a JQL query.
///
/// Yields `Err` at most once: after a remote failure or a malformed element
/// the iterator is exhausted.
pub struct SearchPager<'a> {
    client: &'a dyn JiraClient,
    jql: String,
    page_size: usize,
    fields: Option<String>,
    start_at: usize,
    page: VecDeque<Value>,
    exhausted: bool,
}

impl<'a> SearchPager<'a> {
    /// Create a pager. `page_size` is clamped to at least 1.
    pub fn new(
        client: &'a dyn JiraClient,
        jql: impl Into<String>,
        page_size: usize,
        fields: Option<&str>,
    ) -> Self {
        Self {
            client,
            jql: jql.into(),
            page_size: page_size.max(1),
            fields: fields.map(String::from),
            start_at: 0,
            page: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        debug!(
            jql = %self.jql,
            start_at = self.start_at,
            max_results = self.page_size,
            "fetching Jira issues"
        );
        let issues = self.client.search_issues(
            &self.jql,
            self.start_at,
            self.page_size,
            self.fields.as_deref(),
        )?;

        if issues.len() < self.page_size {
            self.exhausted = true;
        } else {
            self.start_at += self.page_size;
        }
        self.page.extend(issues);
        Ok(())
    }
}

impl Iterator for SearchPager<'_> {
    type Item = Result<Issue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(raw) = self.page.pop_front() {
                return match Issue::from_value(raw) {
                    Ok(issue) => Some(Ok(issue)),
                    Err(e) => {
                        self.finish();
                        Some(Err(e))
                    }
                };
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.finish();
                return Some(Err(e));
            }
        }
    }
}

impl SearchPager<'_> {
    fn finish(&mut self) {
        self.exhausted = true;
        self.page.clear();
    }
}

impl std::iter::FusedIterator for SearchPager<'_> {}
