//! ClipShield PII Detection and Redaction
//!
//! This crate provides the text-analysis core of ClipShield:
//! - Payment card, IBAN, SSN, email, phone and custom-pattern detection
//! - Checksum validation (Luhn, ISO 7064 mod-97) and overlap resolution
//! - Structure-preserving masking, salted tokenization and removal

pub mod config;
pub mod detector;
pub mod error;
pub mod redactor;
pub mod tokenizer;

pub use config::{
    CustomRule, DetectionConfig, MonitoringConfig, RedactionConfig, RedactionOverride,
    RedactionStrategy, RuleToggle, ShieldConfig, TokenizationConfig,
};
pub use detector::{
    DetectionMatch, DetectionResult, DetectionSummary, PIIDetector, PIIType, RegexPIIDetector,
    TypeCount,
};
pub use error::{PiiError, Result};
pub use redactor::{PIIRedactor, RedactionMode, StandardRedactor};
pub use tokenizer::token;
