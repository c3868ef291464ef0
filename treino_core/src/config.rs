//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/treino/config.toml`.

use crate::assembler::AssemblyParams;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub assembly: AssemblyParams,
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("treino").join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assembly.inter_block_rest_seconds, 120);
        assert_eq!(config.assembly.preparation_minutes, 10);
        assert_eq!(config.assembly.pain_intensity_threshold, 6);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.assembly.inter_block_rest_seconds,
            parsed.assembly.inter_block_rest_seconds
        );
        assert_eq!(
            config.assembly.pain_rest_floor_seconds,
            parsed.assembly.pain_rest_floor_seconds
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[assembly]\ninter_block_rest_seconds = 90\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.assembly.inter_block_rest_seconds, 90);
        assert_eq!(config.assembly.preparation_minutes, 10); // default
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[assembly]
pain_intensity_threshold = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assembly.pain_intensity_threshold, 5);
        assert_eq!(config.assembly.inter_block_rest_seconds, 120); // default
    }
}
