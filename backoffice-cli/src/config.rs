//! Console configuration
//!
//! Read from `config.toml` in the platform config directory (or `--config`),
//! then overridden by `BACKOFFICE_*` environment variables and CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use backoffice_api::ClientConfig;

const APP_DIR: &str = "backoffice";
const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_API_URL: &str = "BACKOFFICE_API_URL";
const ENV_TOKEN: &str = "BACKOFFICE_TOKEN";
const ENV_PAGE_SIZE: &str = "BACKOFFICE_PAGE_SIZE";

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub search_debounce_ms: u64,
    /// Token to use instead of the stored session (never written to disk).
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            page_size: 20,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 2,
            search_debounce_ms: 500,
            token: None,
        }
    }
}

impl AppConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = var(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = var(ENV_TOKEN).filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(size) = var(ENV_PAGE_SIZE) {
            self.page_size = size
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PAGE_SIZE} must be a number, got {size:?}"))?;
        }
        Ok(())
    }

    /// HTTP client settings. Fails when no API URL is configured.
    pub fn client_config(&self) -> Result<ClientConfig> {
        if self.api_base_url.trim().is_empty() {
            bail!("No API URL configured: set api_base_url in {CONFIG_FILE_NAME}, {ENV_API_URL} or --api-url");
        }
        Ok(ClientConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            ..ClientConfig::new(self.api_base_url.trim())
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// `<config dir>/backoffice/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// `<data dir>/backoffice`, where the session is kept.
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("Failed to determine data directory")
}
