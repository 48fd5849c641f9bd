//! Console configuration persisted in `localStorage`.

use dioxus_logger::tracing::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_STORAGE_KEY: &str = "mayan-console-config";
const LEGACY_BASE_URL_KEY: &str = "mayan_base_url";
const LEGACY_TOKEN_KEY: &str = "mayan_token";

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_API_PREFIX: &str = "/api/v4";
const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;
const DEFAULT_MAX_TEXT_PREVIEW_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LocalStorage not available")]
    StorageUnavailable,

    #[error("invalid console configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server_url: String,
    pub api_prefix: String,
    pub token: Option<String>,
    pub request_timeout_ms: u32,
    pub max_text_preview_bytes: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_text_preview_bytes: DEFAULT_MAX_TEXT_PREVIEW_BYTES,
        }
    }
}

impl ConsoleConfig {
    /// REST root, e.g. `http://localhost:8000/api/v4`.
    pub fn api_base(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            server.to_string()
        } else {
            format!("{server}/{prefix}")
        }
    }

    /// Build from the stored JSON object and the legacy single-value keys.
    /// Legacy keys win so older sessions keep working.
    pub fn from_stored(
        json: Option<&str>,
        legacy_base_url: Option<String>,
        legacy_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match json.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => serde_json::from_str::<ConsoleConfig>(raw)?,
            None => ConsoleConfig::default(),
        };
        if let Some(url) = legacy_base_url.filter(|u| !u.trim().is_empty()) {
            config.server_url = url.trim().to_string();
        }
        if let Some(token) = legacy_token.filter(|t| !t.trim().is_empty()) {
            config.token = Some(token.trim().to_string());
        }
        Ok(config)
    }

    /// Load from `localStorage`, falling back to defaults on any problem.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!("using default console configuration: {e}");
                ConsoleConfig::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(ConfigError::StorageUnavailable)?;
        let read = |key: &str| storage.get_item(key).ok().flatten();
        let json = read(CONFIG_STORAGE_KEY);
        Self::from_stored(
            json.as_deref(),
            read(LEGACY_BASE_URL_KEY),
            read(LEGACY_TOKEN_KEY),
        )
    }
}
