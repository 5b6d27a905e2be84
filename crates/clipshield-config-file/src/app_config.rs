//! The application configuration document

use clipshield_pii::ShieldConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration document
///
/// The scan and redaction settings sit at the top level of the document
/// (`monitoring`, `detection`, `redaction`) next to `version` and `logging`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(flatten)]
    pub shield: ShieldConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            shield: ShieldConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}
