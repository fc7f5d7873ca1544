// configuration - defaults, then toml file, then environment, then cli flags

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_REQUIRED_SUFFIX: &str = ".go";
pub const DEFAULT_STATUS_AUTO_HIDE_SECS: u64 = 5;

pub const ENV_CONFIG_PATH: &str = "UT_HELPER_CONFIG";
pub const ENV_API_BASE: &str = "UT_HELPER_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "UT_HELPER_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// where the backend lives, e.g. `https://ut-helper.example.com`
    pub api_base: String,
    /// the one source-file extension the backend accepts
    pub required_suffix: String,
    /// how long a success status stays on screen
    pub status_auto_hide_secs: u64,
    /// no timeout is imposed unless this is set
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            required_suffix: DEFAULT_REQUIRED_SUFFIX.to_string(),
            status_auto_hide_secs: DEFAULT_STATUS_AUTO_HIDE_SECS,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// load from an explicit file, or the file named by UT_HELPER_CONFIG,
    /// then layer environment variables on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_toml_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        Ok(config)
    }

    /// apply environment-style overrides through a lookup so tests don't touch the real env
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// base address without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base.trim().trim_end_matches('/')
    }

    pub fn status_auto_hide(&self) -> Duration {
        Duration::from_secs(self.status_auto_hide_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
