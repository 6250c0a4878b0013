//! Configuration file parser for ~/.config/marquee/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`; unknown keys are accepted but logged as warnings since
//! they are usually typos.
use crate::catalog::{CatalogOptions, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE, DEFAULT_LANGUAGE};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the catalog bearer token.
pub const TOKEN_ENV_VAR: &str = "TMDB_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be specified.
/// `Debug` masks `api_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Listing shown at startup ("new" or "popular").
    pub listing_mode: String,

    /// Language tag sent with popular and search requests.
    pub language: String,

    pub api_base_url: String,

    pub image_base_url: String,

    /// Catalog bearer token. `TMDB_API_TOKEN` takes precedence.
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Delay between the last keystroke and the search request.
    pub search_debounce_ms: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            listing_mode: "new".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
            api_token: None,
            request_timeout_secs: 30,
            search_debounce_ms: 300,
            keybindings: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field("listing_mode", &self.listing_mode)
            .field("language", &self.language)
            .field("api_base_url", &self.api_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("keybindings", &self.keybindings)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 9] = [
        "theme",
        "listing_mode",
        "language",
        "api_base_url",
        "image_base_url",
        "api_token",
        "request_timeout_secs",
        "search_debounce_ms",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            // Deleted between metadata and read
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            listing_mode = %config.listing_mode,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Resolve the bearer token: a non-empty environment value wins over the
    /// config file.
    pub fn resolve_token(&self, env_value: Option<String>) -> Option<SecretString> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_token.clone().filter(|v| !v.trim().is_empty()))
            .map(|v| SecretString::from(v.trim().to_string()))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Catalog client settings derived from this config.
    pub fn catalog_options(&self, token: Option<SecretString>) -> CatalogOptions {
        CatalogOptions {
            api_base: self.api_base_url.clone(),
            image_base: self.image_base_url.clone(),
            language: self.language.clone(),
            token,
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
