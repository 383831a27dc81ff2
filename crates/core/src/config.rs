//! Configuration management for the World generator.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Log levels accepted in the `[logging]` section.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorldgenConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Where the final World bytes are written when no path is given on the
    /// command line.
    #[serde(default)]
    pub world_path: Option<PathBuf>,
    /// Directory receiving the `previous.key` / `current.key` pair.
    #[serde(default)]
    pub key_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WorldgenConfig {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(CoreError::Config(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        if let Some(path) = &self.output.world_path {
            if path.as_os_str().is_empty() {
                return Err(CoreError::Config("output.world_path is empty".to_string()));
            }
        }

        if let Some(dir) = &self.output.key_dir {
            if dir.as_os_str().is_empty() {
                return Err(CoreError::Config("output.key_dir is empty".to_string()));
            }
        }

        Ok(())
    }
}
