//! Layered configuration: `sprintdeck.toml` → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//!
//! [github]
//! owner = "my-org"
//! repo = "my-repo"
//! ```
//!
//! The file lives in the platform config directory (for example
//! `~/.config/sprintdeck/sprintdeck.toml`). Every field is optional;
//! environment variables (`SPRINTDECK_API_URL`, `SPRINTDECK_GITHUB_OWNER`,
//! `SPRINTDECK_GITHUB_REPO`) override the file, and CLI flags override both.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

const CONFIG_FILE: &str = "sprintdeck.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

impl AppConfig {
    /// Load the config file, returning defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Effective API base URL after layering: CLI flag beats
    /// `SPRINTDECK_API_URL` beats the file beats the built-in default.
    pub fn api_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override {
            return url.to_string();
        }
        if let Ok(url) = std::env::var("SPRINTDECK_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        self.api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Effective GitHub owner, or an error naming how to set it.
    pub fn github_owner(&self, cli_override: Option<&str>) -> Result<String> {
        layered_value(
            cli_override,
            "SPRINTDECK_GITHUB_OWNER",
            self.github.owner.as_deref(),
        )
        .context("GitHub owner not configured. Pass --owner, set SPRINTDECK_GITHUB_OWNER, or add [github] owner to sprintdeck.toml")
    }

    /// Effective GitHub repository name.
    pub fn github_repo(&self, cli_override: Option<&str>) -> Result<String> {
        layered_value(
            cli_override,
            "SPRINTDECK_GITHUB_REPO",
            self.github.repo.as_deref(),
        )
        .context("GitHub repository not configured. Pass --repo, set SPRINTDECK_GITHUB_REPO, or add [github] repo to sprintdeck.toml")
    }
}

fn layered_value(cli: Option<&str>, env_key: &str, file: Option<&str>) -> Option<String> {
    if let Some(v) = cli {
        return Some(v.to_string());
    }
    if let Ok(v) = std::env::var(env_key) {
        if !v.is_empty() {
            return Some(v);
        }
    }
    file.map(str::to_string)
}

fn config_path() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SPRINTDECK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE));
    }
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join("sprintdeck").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_is_configured() {
        let config = AppConfig::default();
        assert_eq!(config.api_url(None), DEFAULT_API_URL);
        assert!(config.github_owner(None).is_err());
        assert!(config.github_repo(None).is_err());
    }

    #[test]
    fn test_cli_flag_wins_over_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://file.example/api"

            [github]
            owner = "file-owner"
            repo = "file-repo"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url(None), "http://file.example/api");
        assert_eq!(config.api_url(Some("http://cli.example/api")), "http://cli.example/api");
        assert_eq!(config.github_owner(Some("cli-owner")).unwrap(), "cli-owner");
        assert_eq!(config.github_repo(None).unwrap(), "file-repo");
    }

    #[test]
    fn test_partial_file_parses() {
        let config: AppConfig = toml::from_str("[github]\nowner = \"o\"\n").unwrap();
        assert_eq!(config.api_url(None), DEFAULT_API_URL);
        assert_eq!(config.github_owner(None).unwrap(), "o");
        assert!(config.github_repo(None).is_err());
    }
}
