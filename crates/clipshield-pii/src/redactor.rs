//! PII redaction

mod masking;
mod standard_redactor;

pub use standard_redactor::{StandardRedactor, placeholder};

use crate::config::{RedactionStrategy, ShieldConfig};
use crate::detector::DetectionMatch;
use crate::error::PiiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Redaction mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    /// Resolve the strategy per match from configuration
    #[default]
    Auto,

    /// Mask every match
    Mask,

    /// Tokenize every match
    Tokenize,

    /// Replace every match with a placeholder
    Remove,
}

impl RedactionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionMode::Auto => "auto",
            RedactionMode::Mask => "mask",
            RedactionMode::Tokenize => "tokenize",
            RedactionMode::Remove => "remove",
        }
    }

    /// The strategy forced on every match, if any
    pub fn explicit_strategy(&self) -> Option<RedactionStrategy> {
        match self {
            RedactionMode::Auto => None,
            RedactionMode::Mask => Some(RedactionStrategy::Mask),
            RedactionMode::Tokenize => Some(RedactionStrategy::Tokenize),
            RedactionMode::Remove => Some(RedactionStrategy::Remove),
        }
    }
}

impl From<RedactionStrategy> for RedactionMode {
    fn from(strategy: RedactionStrategy) -> Self {
        match strategy {
            RedactionStrategy::Mask => RedactionMode::Mask,
            RedactionStrategy::Tokenize => RedactionMode::Tokenize,
            RedactionStrategy::Remove => RedactionMode::Remove,
        }
    }
}

impl FromStr for RedactionMode {
    type Err = PiiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(RedactionMode::Auto),
            "mask" => Ok(RedactionMode::Mask),
            "tokenize" => Ok(RedactionMode::Tokenize),
            "remove" => Ok(RedactionMode::Remove),
            _ => Err(PiiError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for redacting PII from text
pub trait PIIRedactor: Send + Sync {
    /// Redact PII from text based on detections
    fn redact(
        &self,
        text: &str,
        detections: &[DetectionMatch],
        mode: RedactionMode,
        config: &ShieldConfig,
    ) -> String;
}
