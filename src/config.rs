use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provider::{DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::settings::Setting;

pub(crate) const APP_CONFIG_FILE: &str = "config.json";

/// Get the config directory using platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/stream-mode/`
/// - Linux: `~/.config/stream-mode/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/stream-mode/`
///
/// Falls back to `~/.stream-mode/` if platform dir is unavailable.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("stream-mode"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".stream-mode")
        })
}

/// Load a JSON config file, returning Default if missing or corrupt.
/// Logs when the file exists but cannot be read or parsed, so a corrupt
/// file is visible instead of silently resetting to defaults.
pub(crate) fn load_json_config<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Could not read config {}: {e}", path.display());
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Corrupt config {}: {e}. Using defaults.", path.display());
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root of the reference API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout for the reference API
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Speaker name attached to posted cards
    #[serde(default = "default_speaker")]
    pub speaker: String,
    /// Directory with `.hbs` files overriding the built-in card templates
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    /// Initial value of the `enabled` setting
    #[serde(default)]
    pub stream_mode_enabled: bool,
    /// Initial value of the `displayCards` setting
    #[serde(default)]
    pub display_cards: bool,
    /// Initial value of the `hideMacros` setting
    #[serde(default)]
    pub hide_macros: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_speaker() -> String {
    "Stream Mode".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            speaker: default_speaker(),
            templates_dir: None,
            stream_mode_enabled: false,
            display_cards: false,
            hide_macros: false,
        }
    }
}

impl AppConfig {
    /// Initial settings values.
    pub fn initial_settings(&self) -> [(Setting, bool); 3] {
        [
            (Setting::Enabled, self.stream_mode_enabled),
            (Setting::DisplayCards, self.display_cards),
            (Setting::HideMacros, self.hide_macros),
        ]
    }
}

/// Load the app config from `path`, or from the platform config dir.
pub fn load_app_config(path: Option<&Path>) -> AppConfig {
    match path {
        Some(path) => load_json_config(path),
        None => load_json_config(&config_dir().join(APP_CONFIG_FILE)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
