//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treenav/treenav.toml`
//! 3. Local config: `<dir>/.treenav.toml` (working directory or `-C DIR`)
//! 4. Environment variables: `TREENAV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_LANGUAGE;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api-graph.tests.grupoapok.com/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    /// API root, endpoints are appended to it
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Endpoint serving the translations map
    pub translations_path: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            // the API has no dedicated translations endpoint
            translations_path: "/locales".into(),
        }
    }
}

/// Raw API settings for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawApiSettings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub translations_path: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_language: Option<String>,
    #[serde(default)]
    pub api: RawApiSettings,
}

impl ApiSettings {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawApiSettings) -> Self {
        Self {
            base_url: overlay
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            translations_path: overlay
                .translations_path
                .clone()
                .unwrap_or_else(|| self.translations_path.clone()),
        }
    }
}

/// Unified configuration for treenav.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Language used before the user selects one
    pub default_language: String,
    /// Remote API settings
    pub api: ApiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.into(),
            api: ApiSettings::default(),
        }
    }
}

/// Get the XDG config directory for treenav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treenav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treenav.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treenav.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base).
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_language: overlay
                .default_language
                .clone()
                .unwrap_or_else(|| self.default_language.clone()),
            api: self.api.merge(&overlay.api),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treenav.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply TREENAV_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREENAV")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("default_language") {
            settings.default_language = val;
        }
        if let Ok(val) = config.get_string("api.base_url") {
            settings.api.base_url = val;
        }
        if let Ok(val) = config.get::<u64>("api.timeout_secs") {
            settings.api.timeout_secs = val;
        }
        if let Ok(val) = config.get_string("api.translations_path") {
            settings.api.translations_path = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treenav configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treenav/treenav.toml
#   Local:  ./.treenav.toml (or -C <dir>)
#   Env:    TREENAV_* environment variables, e.g. TREENAV_API__BASE_URL

# Language shown until another one is selected
# default_language = "es_ES"

[api]
# Root of the tree API
# base_url = "https://api-graph.tests.grupoapok.com/api"

# Request timeout in seconds
# timeout_secs = 10

# Endpoint serving the node translations map
# translations_path = "/locales"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
