use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    APP_NAME, DEFAULT_CATALOG_FILE, DEFAULT_COMPLETION_EPSILON_SECS, DEFAULT_COUNTDOWN_SECONDS,
    DEFAULT_DEMOTE_THRESHOLD, DEFAULT_DOUBLE_TAP_WINDOW_MS, DEFAULT_LOG_FILTER,
    DEFAULT_PROGRESS_TICK_MS, DEFAULT_SKIP_SECONDS, LEDGER_FILE,
};
use crate::transitions::ControllerSettings;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub gestures: GestureConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    #[serde(default = "default_completion_epsilon")]
    pub completion_epsilon_secs: f64,

    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,

    #[serde(default = "default_true")]
    pub auto_advance: bool,

    #[serde(default = "default_progress_tick_ms")]
    pub progress_tick_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default = "default_demote_threshold")]
    pub demote_threshold: f64,

    #[serde(default = "default_double_tap_window_ms")]
    pub double_tap_window_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Ledger file; defaults to the user data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Config {
    /// Load from the user config directory, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join(APP_NAME).join("config.toml"))
    }

    /// Configured ledger file, or `<data dir>/reelcast/ledger.json`
    pub fn ledger_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join(APP_NAME).join(LEDGER_FILE))
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.playback.progress_tick_ms.max(1))
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            skip_seconds: self.playback.skip_seconds,
            completion_epsilon: self.playback.completion_epsilon_secs,
            countdown_seconds: self.playback.countdown_seconds,
            auto_advance: self.playback.auto_advance,
            demote_threshold: self.gestures.demote_threshold,
            double_tap_window: Duration::from_millis(self.gestures.double_tap_window_ms),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            skip_seconds: default_skip_seconds(),
            completion_epsilon_secs: default_completion_epsilon(),
            countdown_seconds: default_countdown_seconds(),
            auto_advance: true,
            progress_tick_ms: default_progress_tick_ms(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            demote_threshold: default_demote_threshold(),
            double_tap_window_ms: default_double_tap_window_ms(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_true() -> bool { true }
fn default_skip_seconds() -> f64 { DEFAULT_SKIP_SECONDS }
fn default_completion_epsilon() -> f64 { DEFAULT_COMPLETION_EPSILON_SECS }
fn default_countdown_seconds() -> u32 { DEFAULT_COUNTDOWN_SECONDS }
fn default_progress_tick_ms() -> u64 { DEFAULT_PROGRESS_TICK_MS }
fn default_demote_threshold() -> f64 { DEFAULT_DEMOTE_THRESHOLD }
fn default_double_tap_window_ms() -> u64 { DEFAULT_DOUBLE_TAP_WINDOW_MS }
fn default_catalog_path() -> PathBuf { PathBuf::from(DEFAULT_CATALOG_FILE) }
fn default_log_filter() -> String { DEFAULT_LOG_FILTER.to_string() }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [playback]
            skip_seconds = 15
            auto_advance = false

            [gestures]
            double_tap_window_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.playback.skip_seconds, 15.0);
        assert!(!config.playback.auto_advance);
        assert_eq!(config.playback.countdown_seconds, 5);
        assert_eq!(config.gestures.demote_threshold, 200.0);
        assert_eq!(config.gestures.double_tap_window_ms, 250);
        assert_eq!(config.catalog.path, PathBuf::from("videos.json"));
        assert_eq!(config.logging.filter, "reelcast=info");
    }

    #[test]
    fn controller_settings_follow_config() {
        let mut config = Config::default();
        config.playback.countdown_seconds = 3;
        config.gestures.double_tap_window_ms = 500;

        let settings = config.controller_settings();
        assert_eq!(settings.countdown_seconds, 3);
        assert_eq!(settings.double_tap_window, Duration::from_millis(500));
        assert_eq!(settings.skip_seconds, 10.0);
        assert!(settings.auto_advance);
    }

    #[test]
    fn explicit_ledger_path_wins() {
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("/tmp/custom-ledger.json"));
        assert_eq!(
            config.ledger_path().unwrap(),
            PathBuf::from("/tmp/custom-ledger.json")
        );
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reelcast").join("config.toml");

        let mut config = Config::default();
        config.playback.skip_seconds = 30.0;
        config.catalog.path = PathBuf::from("/srv/videos.json");
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
