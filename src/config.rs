use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "options-ladder.json";

/// Application configuration. Every field has a default, so a config file
/// only needs the keys it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub log_rotation: LogRotation,
    pub max_log_files: usize,
    pub provider: ProviderConfig,
    /// Serve market data from this JSON fixture instead of the live provider.
    pub fixture: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_dir: PathBuf::from("logs"),
            log_file: "options-ladder.log".to_string(),
            log_rotation: LogRotation::Daily,
            max_log_files: 3,
            provider: ProviderConfig::default(),
            fixture: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Visited once per session to pick up the consent cookie.
    pub cookie_url: String,
    /// Returns the crumb that must accompany every options request.
    pub crumb_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com/v7/finance".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            crumb_url: "https://query2.finance.yahoo.com/v1/test/getcrumb".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl AppConfig {
    /// Load from `path`, or from `DEFAULT_CONFIG_FILE` if it exists, or fall
    /// back to defaults. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
