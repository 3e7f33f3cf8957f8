//! Configuration for contactbook

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// ContactBook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the contacts file
    #[serde(rename = "store-path")]
    pub store_path: PathBuf,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(crate::DEFAULT_STORE_FILE),
            log_level: None,
        }
    }
}

impl Config {
    /// Read only the log level, before logging is set up
    ///
    /// Walks the same fallback chain as [`Config::load`] but stays silent:
    /// unreadable files are skipped here and reported by the full load.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::fallback_paths(),
        };

        paths
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| {
                let content = fs::read_to_string(path).ok()?;
                serde_yaml::from_str::<Self>(&content).ok()
            })
            .and_then(|config| config.log_level)
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::fallback_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Project-local `.contactbook.yml`, then `~/.config/contactbook/contactbook.yml`
    fn fallback_paths() -> Vec<PathBuf> {
        let user_config = dirs::config_dir().map(|dir| dir.join("contactbook").join("contactbook.yml"));
        std::iter::once(PathBuf::from(".contactbook.yml"))
            .chain(user_config)
            .collect()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
