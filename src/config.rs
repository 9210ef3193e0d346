use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clock refresh period.
    pub tick_millis: u64,
    /// Overrides the default storage file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `clockboard=debug`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            storage_path: None,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Reads the config file if present, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {}", path.display()))?;
                Self::parse(&contents)?
            }
            _ => Self::default(),
        };

        if let Ok(path) = std::env::var("CLOCKBOARD_STORAGE") {
            config.storage_path = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var("CLOCKBOARD_LOG") {
            config.log_level = level;
        }
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "Failed to parse config.toml")?;
        anyhow::ensure!(config.tick_millis > 0, "tick_millis must be positive");
        Ok(config)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn generate_default() -> Result<PathBuf> {
        let path = Self::config_path()
            .with_context(|| "Could not determine config directory")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&Config::default())?;
        std::fs::write(&path, toml_str)?;
        Ok(path)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("clockboard").join("config.toml"))
    }

    pub fn log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("clockboard").join("clockboard.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::parse("tick_millis = 250\nstorage_path = \"/tmp/s.json\"\n").unwrap();
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::parse("tick_millis = 0").is_err());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }
}
