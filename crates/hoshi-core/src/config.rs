use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/hoshi/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoshiConfig {
    /// Per-call transport timeout in seconds.
    pub request_timeout_secs: u64,
    /// Override for the bot database location; defaults to the XDG state dir.
    #[serde(default)]
    pub database_path: Option<String>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional GitHub bearer token for authenticated API calls.
    #[serde(default)]
    pub github_token: Option<String>,
}

impl Default for HoshiConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            database_path: None,
            retry: None,
            github_token: None,
        }
    }
}

impl HoshiConfig {
    /// The retry policy to use, falling back to defaults.
    pub fn retry(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hoshi")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HoshiConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HoshiConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HoshiConfig = toml::from_str(&data)?;
    Ok(cfg)
}
