// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding cached packages and the persisted manifest
    pub cache_dir: PathBuf,

    /// Base URL of the package origin; the manifest and every package are
    /// fetched relative to it
    pub remote_base_url: String,

    /// Locale posted to the embedded module once the cache is ready;
    /// falls back to the LANG environment variable, then "en"
    #[serde(default)]
    pub locale: Option<String>,

    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from TOML file with environment variable overrides
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("PAKSYNC_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut config: Config = if std::path::Path::new(&config_path).exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        // Apply environment variable overrides
        if let Ok(val) = std::env::var("PAKSYNC_CACHE_DIR") {
            config.cache_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PAKSYNC_REMOTE_BASE_URL") {
            config.remote_base_url = val;
        }
        if let Ok(val) = std::env::var("PAKSYNC_LOCALE") {
            config.locale = Some(val);
        }
        if let Ok(val) = std::env::var("PAKSYNC_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = val.parse()?;
        }
        if let Ok(val) = std::env::var("PAKSYNC_LOG_LEVEL") {
            config.log_level = val;
        }

        Ok(config)
    }

    /// Locale to hand the embedded module: configured value, else the LANG
    /// environment variable trimmed to a locale code, else "en".
    pub fn effective_locale(&self) -> String {
        if let Some(ref locale) = self.locale {
            return locale.clone();
        }

        if let Ok(lang) = std::env::var("LANG") {
            if let Some(code) = normalize_lang(&lang) {
                return code;
            }
        }

        "en".to_string()
    }
}

/// Turn a LANG value like "en_US.UTF-8" into a locale code like "en-US".
fn normalize_lang(lang: &str) -> Option<String> {
    let code = lang.split('.').next().unwrap_or(lang).trim();
    if code.is_empty() || code == "C" || code == "POSIX" {
        return None;
    }
    Some(code.replace('_', "-"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            remote_base_url: String::from("http://localhost:8000/packages"),
            locale: None,
            http_timeout_secs: 300, // 5 minute timeout for large downloads
            log_level: String::from("info"),
        }
    }
}
