//! Deterministic salted tokens for matched values

use crate::config::TokenizationConfig;
use crate::detector::PIIType;
use sha2::{Digest, Sha256};

/// Fewest hex characters a token carries
const MIN_HASH_LENGTH: usize = 4;

/// Replace `value` with a stable pseudonymous token.
///
/// The value is normalized per type, hashed with SHA-256 as
/// `salt || normalized`, and rendered as `<prefix><type>_<hex>`.
pub fn token(value: &str, pii_type: PIIType, config: &TokenizationConfig) -> String {
    let normalized = normalize(value, pii_type);

    let mut hasher = Sha256::new();
    hasher.update(config.salt.as_bytes());
    hasher.update(normalized.as_bytes());
    let digest = hex::encode(hasher.finalize());

    let length = config.hash_length.max(MIN_HASH_LENGTH).min(digest.len());
    format!("{}{}_{}", config.prefix, pii_type.as_str(), &digest[..length])
}

/// Canonical form hashed for a type, so formatting differences share a token
pub fn normalize(value: &str, pii_type: PIIType) -> String {
    match pii_type {
        PIIType::PAN | PIIType::SSN | PIIType::Phone => {
            value.chars().filter(|c| c.is_ascii_digit()).collect()
        }
        PIIType::IBAN => value
            .chars()
            .filter(|c| *c != ' ')
            .collect::<String>()
            .to_uppercase(),
        PIIType::Email => value.trim().to_lowercase(),
        PIIType::Custom => value.trim().to_string(),
    }
}
