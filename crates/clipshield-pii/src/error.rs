//! Error types for ClipShield PII

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PiiError {
    #[error("Invalid built-in pattern '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown redaction mode '{0}' (expected auto, mask, tokenize or remove)")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, PiiError>;
