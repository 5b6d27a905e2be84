//! File-based configuration store

use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::app_config::AppConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming an alternative config file or directory
pub const CONFIG_ENV: &str = "CLIPSHIELD_CONFIG";

/// File name used when the configured path is a directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Configuration file on disk
///
/// The file is created with default contents on first use. Documents that
/// fail to parse are reported and replaced by defaults in memory; the file
/// itself is left untouched.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Locate the configuration file.
    ///
    /// Precedence: `explicit`, then `CLIPSHIELD_CONFIG`, then
    /// `<config dir>/clipshield/config.json`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::at(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV)
            && !env_path.is_empty()
        {
            debug!("Using config path from {}", CONFIG_ENV);
            return Self::at(env_path);
        }

        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self {
            path: base.join("clipshield").join(CONFIG_FILE_NAME),
        })
    }

    /// Use a specific file or directory
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = expand_tilde(path.into())?;
        let path = if is_directory(&path) {
            path.join(CONFIG_FILE_NAME)
        } else {
            path
        };

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        ConfigFormat::from_path(&self.path)
    }

    /// Write the default document if the file is missing.
    ///
    /// Returns `true` when a new file was created.
    pub fn ensure(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.render(&AppConfig::default())?;
        std::fs::write(&self.path, contents)?;
        info!("Created default config at {:?}", self.path);
        Ok(true)
    }

    /// Load the configuration, creating the file first if needed
    pub fn load(&self) -> Result<AppConfig> {
        self.ensure()?;
        let contents = self.read_raw()?;

        match self.parse(&contents) {
            Ok(config) => {
                debug!("Loaded config from {:?}", self.path);
                Ok(config)
            }
            Err(e) => {
                warn!(
                    "Failed to parse config {:?}, using defaults: {}",
                    self.path, e
                );
                Ok(AppConfig::default())
            }
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let contents = self.render(config)?;
        std::fs::write(&self.path, contents)?;
        info!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// Raw file contents
    pub fn read_raw(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    fn parse(&self, contents: &str) -> Result<AppConfig> {
        let config = match self.format() {
            ConfigFormat::Json => serde_json::from_str(contents)?,
            ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
            ConfigFormat::Toml => toml::from_str(contents)?,
        };
        Ok(config)
    }

    fn render(&self, config: &AppConfig) -> Result<String> {
        let contents = match self.format() {
            ConfigFormat::Json => serde_json::to_string_pretty(config)?,
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Toml => toml::to_string_pretty(config)?,
        };
        Ok(contents)
    }
}

fn expand_tilde(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(rest)),
        Err(_) => Ok(path),
    }
}

fn is_directory(path: &Path) -> bool {
    path.is_dir() || path.as_os_str().to_string_lossy().ends_with(MAIN_SEPARATOR)
}
