use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SummaryError;
use crate::summary::MembershipRule;

/// Configuration for the dashboard.
///
/// Loaded from a file (TOML, JSON or YAML) and then overridden by the
/// environment variables the service has always been deployed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Seconds between refreshes in watch mode
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Concourse team whose pipelines are summarised
    #[serde(default = "default_team")]
    pub team: String,

    /// Scheme used to reach every host
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub skip_ssl_validation: bool,

    /// Hosts offered for single-host summaries
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Named views spanning several hosts
    #[serde(default)]
    pub groups: Vec<SummaryGroup>,
}

/// A named view over several hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryGroup {
    pub group: String,
    #[serde(default)]
    pub hosts: Vec<GroupHost>,
}

/// A host within a summary group and the pipelines shown for it.
///
/// No pipeline rules means every pipeline of the host is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHost {
    pub fqdn: String,
    #[serde(default)]
    pub pipelines: Vec<MembershipRule>,
}

/// Raw values of the `REFRESH_INTERVAL`, `CS_GROUPS`, `HOSTS`,
/// `SKIP_SSL_VALIDATION` and `TEAM` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub refresh_interval: Option<String>,
    pub groups_json: Option<String>,
    pub hosts_json: Option<String>,
    pub skip_ssl_validation: Option<String>,
    pub team: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            team: default_team(),
            protocol: default_protocol(),
            skip_ssl_validation: false,
            hosts: vec![],
            groups: vec![],
        }
    }
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_team() -> String {
    "main".to_string()
}

fn default_protocol() -> String {
    "https".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./concourse-summary.toml
    /// 3. ./concourse-summary.json
    /// 4. ./concourse-summary.yaml
    /// 5. ./concourse-summary.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "concourse-summary.toml",
            "concourse-summary.json",
            "concourse-summary.yaml",
            "concourse-summary.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Applies environment overrides on top of this configuration.
    ///
    /// Blank values mean "use the default" (30 seconds, no groups, no
    /// hosts). A refresh interval below 1 also falls back to 30 seconds.
    /// Only the literal `"true"` enables skipping TLS validation.
    pub fn apply_overrides(mut self, overrides: &EnvOverrides) -> Result<Self> {
        if let Some(raw) = &overrides.refresh_interval {
            self.refresh_interval = parse_refresh_interval(raw)?;
        }

        if let Some(raw) = &overrides.groups_json {
            self.groups = parse_json_or_empty(raw).context("Failed to parse CS_GROUPS")?;
        }

        if let Some(raw) = &overrides.hosts_json {
            self.hosts = parse_json_or_empty(raw).context("Failed to parse HOSTS")?;
        }

        if let Some(raw) = &overrides.skip_ssl_validation {
            self.skip_ssl_validation = raw == "true";
        }

        if let Some(team) = overrides.team.as_deref().filter(|t| !t.is_empty()) {
            self.team = team.to_string();
        }

        if self.protocol != "https" && self.protocol != "http" {
            return Err(SummaryError::Config(format!(
                "Unsupported protocol: {}",
                self.protocol
            ))
            .into());
        }

        Ok(self)
    }
}

fn parse_refresh_interval(raw: &str) -> Result<u64> {
    if raw.is_empty() {
        return Ok(default_refresh_interval());
    }

    let interval: i64 = raw
        .parse()
        .with_context(|| format!("Invalid REFRESH_INTERVAL: {raw:?}"))?;

    Ok(u64::try_from(interval)
        .ok()
        .filter(|secs| *secs >= 1)
        .unwrap_or_else(default_refresh_interval))
}

fn parse_json_or_empty<T>(raw: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    if raw.is_empty() {
        return Ok(vec![]);
    }
    Ok(serde_json::from_str(raw)?)
}
