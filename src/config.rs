//! Runtime configuration, stored as TOML under the user's config directory
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [input]
//! click_threshold = 0.99
//! haptics_enabled = true
//!
//! [device]
//! backend = "simulated"
//! poll_interval_ms = 11
//! joystick_deadzone = 0.05
//! ```
//!
//! Every section and field is optional; missing entries fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "openactions";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub device: DeviceConfig,
    pub demo: DemoConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    pub thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            thread_ids: true,
        }
    }
}

/// Settings consumed by the action runtime itself
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Analog value above which a float field reads as pressed through a boolean action
    pub click_threshold: f32,
    pub haptics_enabled: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_threshold: 0.99,
            haptics_enabled: true,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Simulated,
    Gamepad,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DeviceConfig {
    pub backend: Backend,
    /// Sync interval of the demo loop
    pub poll_interval_ms: u64,
    /// Analog stick deadzone as a fraction (0.0-1.0)
    pub joystick_deadzone: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            poll_interval_ms: 11,
            joystick_deadzone: 0.05,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of sync cycles before the demo exits, 0 runs until ctrl-c
    pub frames: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { frames: 600 }
    }
}

impl RuntimeConfig {
    /// `<config dir>/openactions/config.toml`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: RuntimeConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist
    pub async fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if exists {
            Self::load(path).await
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(io_error)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.input.click_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "click_threshold {} outside 0.0-1.0",
                threshold
            )));
        }
        if !(0.0..1.0).contains(&self.device.joystick_deadzone) {
            return Err(ConfigError::Invalid(format!(
                "joystick_deadzone {} outside 0.0-1.0",
                self.device.joystick_deadzone
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [input]
            click_threshold = 0.5

            [device]
            backend = "gamepad"
            "#,
        )
        .unwrap();

        assert_eq!(config.input.click_threshold, 0.5);
        assert!(config.input.haptics_enabled);
        assert_eq!(config.device.backend, Backend::Gamepad);
        assert_eq!(config.device.poll_interval_ms, 11);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = RuntimeConfig::default();
        config.input.click_threshold = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let mut config = RuntimeConfig::default();
        config.logging.level = "loud".to_string();
        assert_eq!(config.log_level(), tracing::Level::INFO);
        config.logging.level = "DEBUG".to_string();
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = RuntimeConfig::default();
        config.input.haptics_enabled = false;
        config.demo.frames = 3;
        config.save(&path).await.unwrap();

        assert_eq!(RuntimeConfig::load(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig::load_or_default(&dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[tokio::test]
    async fn broken_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "[input\nclick_threshold = ").await.unwrap();
        assert!(matches!(
            RuntimeConfig::load(&path).await,
            Err(ConfigError::Parse(_))
        ));
    }
}
