//! Persistent defaults.
//!
//! Settings are stored in `~/.stegtools/config.toml`. Every field is
//! optional in the file; missing fields fall back to the built-in defaults
//! and command-line flags override whatever is loaded.
//!
//! ```toml
//! framing = "terminator"
//! image_technique = "lsb"
//! markup_technique = "comment"
//! video_fps = 30
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::codec::Framing;
use crate::markup::MarkupTechnique;
use crate::stego::image::ImageTechnique;
use crate::stego::video::DEFAULT_FPS;

/// Errors that can occur when loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Defaults applied to every command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StegConfig {
    /// How messages are delimited in LSB carriers.
    pub framing: Framing,

    /// Entry point for image carriers.
    pub image_technique: ImageTechnique,

    /// Wrapper for text carriers.
    pub markup_technique: MarkupTechnique,

    /// Frame rate recorded for frame directories without a manifest.
    pub video_fps: u32,
}

impl Default for StegConfig {
    fn default() -> Self {
        Self {
            framing: Framing::default(),
            image_technique: ImageTechnique::default(),
            markup_technique: MarkupTechnique::default(),
            video_fps: DEFAULT_FPS,
        }
    }
}

impl StegConfig {
    /// Loads `path` if given, otherwise the default location if it exists,
    /// otherwise the built-in defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match default_config_path() {
                Ok(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Loads configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: StegConfig = toml::from_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Saves configuration to a TOML file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Get the stegtools config directory (~/.stegtools).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".stegtools"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Get the default config file path (~/.stegtools/config.toml).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StegConfig::default();
        assert_eq!(config.framing, Framing::Terminator);
        assert_eq!(config.image_technique, ImageTechnique::Lsb);
        assert_eq!(config.markup_technique, MarkupTechnique::Comment);
        assert_eq!(config.video_fps, 30);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: StegConfig = toml::from_str("framing = \"length-prefixed\"").unwrap();
        assert_eq!(config.framing, Framing::LengthPrefixed);
        assert_eq!(config.video_fps, DEFAULT_FPS);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = StegConfig {
            framing: Framing::LengthPrefixed,
            image_technique: ImageTechnique::Parity,
            markup_technique: MarkupTechnique::Marker,
            video_fps: 25,
        };
        config.save_to(&config_path).unwrap();

        let loaded = StegConfig::load(Some(&config_path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&StegConfig::default()).unwrap();
        assert!(toml_str.contains("framing = \"terminator\""));
        assert!(toml_str.contains("image_technique = \"lsb\""));
        assert!(toml_str.contains("markup_technique = \"comment\""));
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = StegConfig::load(Some(&temp_dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let result: Result<StegConfig, _> = toml::from_str("framing = \"crc32\"");
        assert!(result.is_err());
    }
}
