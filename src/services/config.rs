//! Client configuration
//!
//! Resolved once at startup from defaults, `~/.eurogames/config.json`,
//! `EUROGAMES_*` environment variables and command-line overrides (later
//! sources win). The result is immutable and shared by every request.

use crate::types::{EurogamesError, Result};
use directories::BaseDirs;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote service used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://eurogames.web-c10.workers.dev";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "EUROGAMES_API_URL";
pub const ENV_API_KEY: &str = "EUROGAMES_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "EUROGAMES_TIMEOUT_SECS";

/// Immutable connection settings for the remote service
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            base_url,
            api_key,
            timeout,
        }
    }

    /// Resolve from the default config file and the process environment
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let file = ConfigFile::default_path().ok();
        Self::resolve(file.as_deref(), |name| std::env::var(name).ok(), overrides)
    }

    /// Resolve from an explicit config file path and environment lookup
    pub fn resolve<E>(file: Option<&Path>, env: E, overrides: &ConfigOverrides) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut base_url = DEFAULT_API_URL.to_string();
        let mut api_key = None;
        let mut timeout_secs = DEFAULT_TIMEOUT_SECS;

        if let Some(cfg) = file.map(ConfigFile::load).transpose()?.flatten() {
            if let Some(url) = cfg.api_url {
                base_url = url;
            }
            if cfg.api_key.is_some() {
                api_key = cfg.api_key;
            }
            if let Some(secs) = cfg.timeout_secs {
                timeout_secs = secs;
            }
        }

        if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            base_url = url;
        }
        if let Some(key) = env(ENV_API_KEY) {
            api_key = Some(key);
        }
        if let Some(raw) = env(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            timeout_secs = raw.trim().parse().map_err(|_| {
                EurogamesError::Config(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }

        if let Some(url) = &overrides.api_url {
            base_url = url.clone();
        }
        if overrides.api_key.is_some() {
            api_key = overrides.api_key.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            timeout_secs = secs;
        }

        if timeout_secs == 0 {
            return Err(EurogamesError::Config("timeout must be at least 1 second".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(EurogamesError::Config(format!(
                "API URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        Ok(Self::new(base_url, api_key, Duration::from_secs(timeout_secs)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

// The credential never ends up in logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Command-line overrides, highest priority
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// On-disk config (`~/.eurogames/config.json`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| EurogamesError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".eurogames").join("config.json"))
    }

    /// Missing file is `Ok(None)`; unreadable or invalid JSON is an error
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let cfg = serde_json::from_str(&content).map_err(|e| {
            EurogamesError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        Ok(Some(cfg))
    }
}
