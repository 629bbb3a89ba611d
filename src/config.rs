use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::connector::{JiraSettings, DEFAULT_BATCH_SIZE, DEFAULT_MAX_TICKET_SIZE};

/// Environment variable consulted when `jira.api_version` is not set.
pub const API_VERSION_ENV: &str = "JIRA_API_VERSION";

const DEFAULT_API_VERSION: &str = "2";
const SUPPORTED_API_VERSIONS: &[&str] = &["2", "3"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub jira: JiraConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub labels_to_skip: Vec<String>,
    #[serde(default)]
    pub comment_email_blacklist: Vec<String>,
    #[serde(default = "default_max_ticket_size")]
    pub max_ticket_size: usize,
    /// Resolved by [`load_config`]; always `Some` afterwards.
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_max_ticket_size() -> usize {
    DEFAULT_MAX_TICKET_SIZE
}
fn default_timeout_secs() -> u64 {
    30
}

impl JiraConfig {
    pub fn to_settings(&self) -> JiraSettings {
        JiraSettings {
            base_url: self.base_url.clone(),
            project_key: self.project_key.clone(),
            batch_size: self.batch_size,
            labels_to_skip: self.labels_to_skip.clone(),
            comment_email_blacklist: self.comment_email_blacklist.clone(),
            max_ticket_size: self.max_ticket_size,
            api_version: self
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content, std::env::var(API_VERSION_ENV).ok())
}

/// Parse and validate config text.
///
/// `env_api_version` is the value of `JIRA_API_VERSION`, used only when the
/// file does not set `jira.api_version`.
pub fn parse_config(content: &str, env_api_version: Option<String>) -> Result<Config> {
    let mut config: Config =
        toml::from_str(content).with_context(|| "Failed to parse config file")?;

    let jira = &mut config.jira;
    jira.base_url = jira.base_url.trim().trim_end_matches('/').to_string();

    if jira.base_url.is_empty() {
        bail!("jira.base_url must not be empty");
    }
    if !(jira.base_url.starts_with("http://") || jira.base_url.starts_with("https://")) {
        bail!(
            "jira.base_url must start with http:// or https:// (got '{}')",
            jira.base_url
        );
    }
    if jira.batch_size == 0 {
        bail!("jira.batch_size must be > 0");
    }
    if jira.max_ticket_size == 0 {
        bail!("jira.max_ticket_size must be > 0");
    }

    let api_version = jira
        .api_version
        .clone()
        .or(env_api_version)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
    if !SUPPORTED_API_VERSIONS.contains(&api_version.as_str()) {
        bail!(
            "Unknown Jira API version: '{}'. Must be 2 or 3.",
            api_version
        );
    }
    jira.api_version = Some(api_version);

    Ok(config)
}
