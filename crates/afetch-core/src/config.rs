use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::{FetchOptions, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use crate::validate::DEFAULT_MIN_SIZE;

/// A named artifact: its mirrors in priority order, where it goes, and how
/// strictly it is checked. Selected with `afetch fetch --profile <name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactProfile {
    pub name: String,
    /// Candidate URLs, most preferred first.
    pub urls: Vec<String>,
    /// Destination path; relative paths resolve against the working directory.
    pub destination: PathBuf,
    /// Overrides the global `min_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Expected SHA-256 (hex) of the artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Expected leading bytes as hex; defaults to the zip signature `504b`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Accept a large-enough file without the signature if nothing passes strictly.
    #[serde(default)]
    pub best_effort: bool,
}

/// Global configuration loaded from `~/.config/afetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AfetchConfig {
    /// Redirect hop budget per candidate.
    pub max_redirects: u32,
    /// Total per-request timeout in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// User-Agent sent with every request; built-in browser-like default if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Minimum plausible artifact size in bytes (body must be strictly larger).
    pub min_size: u64,
    pub artifacts: Vec<ArtifactProfile>,
}

impl Default for AfetchConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout_secs: 30,
            connect_timeout_secs: 15,
            user_agent: None,
            min_size: DEFAULT_MIN_SIZE,
            artifacts: Vec::new(),
        }
    }
}

impl AfetchConfig {
    pub fn profile(&self, name: &str) -> Option<&ArtifactProfile> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    /// Fetch options derived from the config (no skip-existing).
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            max_redirects: self.max_redirects,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            skip_existing: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("afetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<AfetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: AfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = AfetchConfig::default();
        assert_eq!(cfg.max_redirects, 10);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.min_size, 10_000);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.artifacts.is_empty());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = AfetchConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let cfg: AfetchConfig = toml::from_str("max_redirects = 3\n").unwrap();
        assert_eq!(cfg.max_redirects, 3);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.min_size, 10_000);
    }

    #[test]
    fn config_toml_artifact_profiles() {
        let toml = r#"
            min_size = 20000
            user_agent = "Mozilla/5.0"

            [[artifacts]]
            name = "gradle-wrapper"
            urls = [
                "https://raw.githubusercontent.com/gradle/gradle/v7.5.1/gradle/wrapper/gradle-wrapper.jar",
                "https://mirror.example.com/gradle-7.5.1/gradle-wrapper.jar",
            ]
            destination = "gradle/wrapper/gradle-wrapper.jar"
            min_size = 50000

            [[artifacts]]
            name = "tarball"
            urls = ["https://example.com/x.tar.gz"]
            destination = "/tmp/x.tar.gz"
            signature = "1f8b"
            best_effort = true
        "#;
        let cfg: AfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.min_size, 20_000);
        assert_eq!(cfg.artifacts.len(), 2);

        let gw = cfg.profile("gradle-wrapper").unwrap();
        assert_eq!(gw.urls.len(), 2);
        assert_eq!(gw.destination, PathBuf::from("gradle/wrapper/gradle-wrapper.jar"));
        assert_eq!(gw.min_size, Some(50_000));
        assert!(!gw.best_effort);
        assert!(gw.sha256.is_none());

        let tb = cfg.profile("tarball").unwrap();
        assert_eq!(tb.signature.as_deref(), Some("1f8b"));
        assert!(tb.best_effort);
        assert!(cfg.profile("missing").is_none());
    }

    #[test]
    fn fetch_options_from_config() {
        let cfg = AfetchConfig {
            max_redirects: 4,
            timeout_secs: 5,
            user_agent: Some("custom/1.0".into()),
            ..AfetchConfig::default()
        };
        let opts = cfg.fetch_options();
        assert_eq!(opts.max_redirects, 4);
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert_eq!(opts.connect_timeout, Duration::from_secs(15));
        assert_eq!(opts.user_agent, "custom/1.0");
        assert!(!opts.skip_existing);

        let default_ua = AfetchConfig::default().fetch_options().user_agent;
        assert!(default_ua.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn load_from_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("afetch.toml");
        fs::write(&path, "timeout_secs = 60\n").unwrap();
        assert_eq!(load_from(&path).unwrap().timeout_secs, 60);
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }
}
