//! Configuration settings for AnalystTrack.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend configuration.
    pub backend: BackendConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        super::config_dir()
            .map(|p| p.join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    }

    /// Load configuration: defaults, then the TOML file if present, then
    /// `ANALYSTTRACK__SECTION__KEY` environment variables.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);
        Self::load_with_env(&config_path, super::ENV_PREFIX)
    }

    fn load_with_env(config_path: &Path, prefix: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Path of the local backend's data file.
    pub fn data_file(&self) -> PathBuf {
        self.backend.data_file.clone().unwrap_or_else(|| {
            super::data_dir()
                .map(|p| p.join("analysttrack.json"))
                .unwrap_or_else(|_| PathBuf::from("analysttrack.json"))
        })
    }
}

/// Backend configuration.
///
/// The project fields identify a hosted backend project and are passed
/// through unchanged; the local backend ignores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Hosted project identifier.
    pub project_id: String,
    /// Hosted project API key.
    pub api_key: String,
    /// Hosted auth domain.
    pub auth_domain: String,
    /// Where the local backend mirrors its contents (optional).
    pub data_file: Option<PathBuf>,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Maximum number of analysts shown in the directory.
    pub analysts_limit: usize,
    /// Show status bar.
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            analysts_limit: crate::services::DEFAULT_ANALYST_LIMIT,
            show_status_bar: true,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Switch to the analyst directory.
    pub browse: String,
    /// Switch to the prediction list.
    pub predictions: String,
    /// Switch to the submission form.
    pub submit: String,
    /// Cycle to the next tab.
    pub next_tab: String,
    /// Start editing the submission form.
    pub edit: String,
    /// Sign out.
    pub logout: String,
    /// Toggle between sign-in and sign-up on the login screen.
    pub toggle_auth_mode: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            browse: "1".to_string(),
            predictions: "2".to_string(),
            submit: "3".to_string(),
            next_tab: "Tab".to_string(),
            edit: "i".to_string(),
            logout: "x".to_string(),
            toggle_auth_mode: "Ctrl+t".to_string(),
        }
    }
}
