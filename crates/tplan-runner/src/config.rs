use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;
use tplan_client::{HttpEndpoint, HttpEndpointError};
use tplan_core::{FieldPath, StructuredIssue};

const RUNNER_CONFIG_SCHEMA: &str = "tplan-runner/0.0.1";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_runner_schema")]
    pub schema: String,
    #[serde(default)]
    pub workspace: String,
    pub access_token: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Debug for RunnerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("schema", &self.schema)
            .field("workspace", &self.workspace)
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerConfigError {
    #[error("read runner config failed `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("runner config parse failed: {0}")]
    Parse(String),
    #[error("runner config validation failed: {}", render_issues(.0))]
    Validation(Vec<StructuredIssue>),
}

fn render_issues(issues: &[StructuredIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn load_runner_config(path: &Path) -> Result<RunnerConfig, RunnerConfigError> {
    load_runner_config_with_workspace(path, None)
}

/// Like [`load_runner_config`], with `workspace` replacing the file's workspace before
/// validation.
pub fn load_runner_config_with_workspace(
    path: &Path,
    workspace: Option<&str>,
) -> Result<RunnerConfig, RunnerConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| RunnerConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let expanded = expand_env_placeholders(&raw).map_err(RunnerConfigError::Parse)?;
    let mut config: RunnerConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&expanded)
            .map_err(|error| RunnerConfigError::Parse(format!("json decode error: {error}")))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&expanded)
            .map_err(|error| RunnerConfigError::Parse(format!("yaml decode error: {error}")))?,
        _ => serde_yaml::from_str(&expanded)
            .or_else(|_| serde_json::from_str(&expanded))
            .map_err(|error| RunnerConfigError::Parse(error.to_string()))?,
    };
    if let Some(workspace) = workspace {
        config.workspace = workspace.to_string();
    }

    let mut issues = validate_runner_config(&config);
    if !issues.is_empty() {
        StructuredIssue::sort_stable(&mut issues);
        return Err(RunnerConfigError::Validation(issues));
    }
    tracing::debug!(path = %path.display(), workspace = %config.workspace, "runner config loaded");
    Ok(config)
}

pub fn validate_runner_config(config: &RunnerConfig) -> Vec<StructuredIssue> {
    let mut issues = Vec::new();
    if config.schema != RUNNER_CONFIG_SCHEMA {
        issues.push(config_issue(
            "runner.config.schema",
            "schema",
            format!(
                "unsupported runner config schema `{}` (expected `{RUNNER_CONFIG_SCHEMA}`)",
                config.schema
            ),
        ));
    }
    if config.workspace.trim().is_empty() {
        issues.push(config_issue(
            "runner.config.workspace",
            "workspace",
            "workspace must not be empty".to_string(),
        ));
    } else if config.workspace.contains(|c| matches!(c, '/' | '?' | '#')) {
        issues.push(config_issue(
            "runner.config.workspace",
            "workspace",
            format!(
                "workspace `{}` must be a short name, not a resource path",
                config.workspace
            ),
        ));
    }
    if config.access_token.trim().is_empty() {
        issues.push(config_issue(
            "runner.config.access_token",
            "access_token",
            "access_token must not be empty".to_string(),
        ));
    }
    if let Some(base_url) = &config.base_url {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            issues.push(config_issue(
                "runner.config.base_url",
                "base_url",
                format!("base_url `{base_url}` must be http(s)"),
            ));
        }
    }
    if matches!(config.timeout_ms, Some(0)) {
        issues.push(config_issue(
            "runner.config.timeout",
            "timeout_ms",
            "timeout_ms must be > 0".to_string(),
        ));
    }
    issues
}

pub fn build_endpoint(config: &RunnerConfig) -> Result<HttpEndpoint, HttpEndpointError> {
    let mut endpoint = HttpEndpoint::new(config.access_token.clone())?;
    if let Some(base_url) = &config.base_url {
        endpoint = endpoint.with_base_url(base_url.clone())?;
    }
    if let Some(api_version) = &config.api_version {
        endpoint = endpoint.with_api_version(api_version.clone())?;
    }
    if let Some(timeout_ms) = config.timeout_ms {
        endpoint = endpoint.with_timeout_ms(timeout_ms)?;
    }
    Ok(endpoint)
}

fn config_issue(reference: &str, field: &str, message: String) -> StructuredIssue {
    StructuredIssue::error("runner_config_error", FieldPath::root().key(field), message)
        .with_reference(reference)
}

fn default_runner_schema() -> String {
    RUNNER_CONFIG_SCHEMA.to_string()
}

/// Replace every `${NAME}` with the value of environment variable `NAME`.
fn expand_env_placeholders(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open
            .find('}')
            .ok_or_else(|| "unterminated env placeholder `${...`".to_string())?;
        let key = &after_open[..end];
        if key.is_empty() {
            return Err("empty env placeholder `${}`".to_string());
        }
        let value = std::env::var(key)
            .map_err(|_| format!("missing env var for placeholder `${{{key}}}`"))?;
        out.push_str(&value);
        rest = &after_open[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
