//! Settings parser for `config.toml`
//!
//! Looked up at `$VALKA_CONFIG`, else `<config_dir>/valka/config.toml`. A
//! missing or broken file never stops the app; defaults are used instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::route::DEFAULT_COURSE_TOKEN;

const CONFIG_ENV: &str = "VALKA_CONFIG";
const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "valka";

pub const DEFAULT_ENDPOINT: &str =
    "https://n8n.srv952620.hstgr.cloud/webhook/a8d1d9e3-3708-43ec-a938-41b26bffdfec";
pub const DEFAULT_FALLBACK_REPLY: &str = "Lo siento, no pude procesar tu mensaje.";
pub const DEFAULT_ERROR_REPLY: &str =
    "Lo siento, hubo un error conectando con el asistente. Intenta nuevamente.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub relay: RelaySettings,
    pub navigation: NavigationSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Webhook that receives every chat message.
    pub endpoint: String,
    /// Sent as `context.userId`.
    pub user_id: String,
    /// Field of the JSON reply holding the assistant text.
    pub response_field: String,
    /// Shown when the reply lacks `response_field`.
    pub fallback_reply: String,
    /// Shown when the request fails outright.
    pub error_reply: String,
    pub timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_id: "user-123".to_string(),
            response_field: "response".to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            error_reply: DEFAULT_ERROR_REPLY.to_string(),
            timeout_secs: 30,
        }
    }
}

impl RelaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    pub course_token: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            course_token: DEFAULT_COURSE_TOKEN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON module list replacing the built-in one.
    pub path: Option<PathBuf>,
}

/// Resolve where the settings file lives.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from the resolved path, falling back to defaults.
pub fn load_settings() -> Settings {
    match config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            debug!("No config directory available, using defaults");
            Settings::default()
        }
    }
}

pub fn load_settings_from(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
    if settings.relay.response_field.trim().is_empty() {
        return Err(Error::config("relay.response_field must not be empty"));
    }
    if settings.navigation.course_token.trim().is_empty() {
        return Err(Error::config("navigation.course_token must not be empty"));
    }
    Ok(settings)
}
