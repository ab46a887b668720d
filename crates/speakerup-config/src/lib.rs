//! Configuration management for SpeakerUp
//!
//! Settings live in a TOML file with `[audio]` and `[display]` sections.
//! Every field is optional. The file is looked up in this order:
//!
//! 1. an explicit path (from `--config`), which must exist
//! 2. `$SPEAKERUP_CONFIG`
//! 3. `config.toml` in the platform config directory (`~/.config/speakerup` on Linux)
//!
//! Without a file the defaults apply. `SPEAKERUP_BACKEND` overrides the
//! configured backend.

mod settings;

pub use settings::{AudioSettings, DisplaySettings};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "SPEAKERUP_CONFIG";
/// Environment variable overriding the audio backend
pub const BACKEND_ENV: &str = "SPEAKERUP_BACKEND";

/// Upper bound for `audio.timeout_secs`
pub const MAX_TIMEOUT_SECS: u64 = 300;

const CONFIG_FILE: &str = "config.toml";

/// Main SpeakerUp configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerUpConfig {
    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl SpeakerUpConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the standard locations and the process environment
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(explicit, |key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to read environment variables
    pub fn load_with_env<F>(explicit: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::locate(explicit, &env) {
            Some(path) => Self::load(&path)?,
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        if let Some(backend) = env(BACKEND_ENV) {
            config.audio.backend = backend.parse().map_err(ConfigError::Invalid)?;
        }

        Ok(config)
    }

    /// Pick the config file to read, if any
    fn locate<F>(explicit: Option<&Path>, env: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }

        Self::user_config_path().filter(|path| path.exists())
    }

    /// Path of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "speakerup").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Check values that would otherwise fail at use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.audio.timeout_secs) {
            return Err(ConfigError::Invalid(format!(
                "audio.timeout_secs must be between 1 and {}",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.audio.fallback_device_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "audio.fallback_device_name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakerup_audio::backend::BackendKind;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::{NamedTempFile, TempDir};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = SpeakerUpConfig::default();
        assert_eq!(config.audio.backend, BackendKind::Auto);
        assert_eq!(config.audio.timeout(), Duration::from_secs(5));
        assert_eq!(config.audio.fallback_device_name, "Default Audio Device");
        assert!(config.display.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nbackend = \"pulse\"\ntimeout_secs = 2").unwrap();

        let config = SpeakerUpConfig::load(file.path()).unwrap();
        assert_eq!(config.audio.backend, BackendKind::Pulse);
        assert_eq!(config.audio.timeout_secs, 2);
        assert_eq!(config.audio.powershell_program, "powershell");
        assert_eq!(config.display.log_level, "warn");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\ntimeout_secs = 0").unwrap();
        assert!(matches!(
            SpeakerUpConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\ntimeout_secs = 18446744073709551615").unwrap();
        assert!(matches!(
            SpeakerUpConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\ntimeout_secs = 300").unwrap();
        assert_eq!(SpeakerUpConfig::load(file.path()).unwrap().audio.timeout_secs, 300);

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nbackend = \"alsa\"").unwrap();
        assert!(matches!(
            SpeakerUpConfig::load(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");

        let result = SpeakerUpConfig::load_with_env(Some(&missing), no_env);
        assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_config_env_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ncolor = false").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = SpeakerUpConfig::load_with_env(None, |key| {
            (key == CONFIG_ENV).then(|| path.clone())
        })
        .unwrap();
        assert!(!config.display.color);
    }

    #[test]
    fn test_backend_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nbackend = \"pulse\"").unwrap();

        let config = SpeakerUpConfig::load_with_env(Some(file.path()), |key| {
            (key == BACKEND_ENV).then(|| "mock".to_string())
        })
        .unwrap();
        assert_eq!(config.audio.backend, BackendKind::Mock);

        let result = SpeakerUpConfig::load_with_env(Some(file.path()), |key| {
            (key == BACKEND_ENV).then(|| "oss".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/tmp/speakerup.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("test error".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }
}
