//! File-based configuration for ClipShield
//!
//! The configuration document holds the scan, detection and redaction
//! settings consumed by `clipshield-pii`, plus a logging section.
//!
//! # Features
//! - Default document written on first use
//! - JSON, YAML and TOML formats, chosen by file extension
//! - Partial documents merged over defaults
//!
//! # Example
//! ```no_run
//! # use clipshield_config_file::ConfigFile;
//! # fn example() -> clipshield_config_file::Result<()> {
//! let file = ConfigFile::resolve(None)?;
//! let config = file.load()?;
//! println!("default strategy: {}", config.shield.redaction.default_strategy.as_str());
//! # Ok(())
//! # }
//! ```

mod app_config;
mod error;
mod file_store;

pub use app_config::{AppConfig, LoggingConfig};
pub use error::{ConfigError, Result};
pub use file_store::{CONFIG_ENV, CONFIG_FILE_NAME, ConfigFile, ConfigFormat};
