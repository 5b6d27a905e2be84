//! PII detectors

mod patterns;
mod regex_detector;

pub use patterns::{iban_is_valid, luhn_check};
pub use regex_detector::RegexPIIDetector;

use crate::config::ShieldConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single PII match in the scanned text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectionMatch {
    /// Type of PII detected
    pub pii_type: PIIType,

    /// Start byte offset in the text
    pub start: usize,

    /// End byte offset in the text (exclusive)
    pub end: usize,

    /// The matched text
    pub value: String,

    /// Owning rule ID (custom matches only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// Owning rule label (custom matches only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_label: Option<String>,
}

impl DetectionMatch {
    pub fn new(pii_type: PIIType, start: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            pii_type,
            start,
            end: start + value.len(),
            value,
            rule_id: None,
            rule_label: None,
        }
    }

    /// Tag the match with the custom rule that produced it
    pub fn with_rule(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.rule_id = Some(id.into());
        self.rule_label = Some(label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &DetectionMatch) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Types of PII that can be detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PIIType {
    /// Payment card number
    PAN,

    /// International Bank Account Number
    IBAN,

    /// US Social Security Number
    SSN,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Caller-defined pattern
    Custom,
}

impl PIIType {
    /// Built-in types in detection order
    pub const BUILTIN: [PIIType; 5] = [
        PIIType::PAN,
        PIIType::IBAN,
        PIIType::SSN,
        PIIType::Email,
        PIIType::Phone,
    ];

    /// Raw name used in configuration keys and tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            PIIType::PAN => "pan",
            PIIType::IBAN => "iban",
            PIIType::SSN => "ssn",
            PIIType::Email => "email",
            PIIType::Phone => "phone",
            PIIType::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PIIType::PAN => "Payment Card",
            PIIType::IBAN => "IBAN",
            PIIType::SSN => "SSN",
            PIIType::Email => "Email",
            PIIType::Phone => "Phone",
            PIIType::Custom => "Custom",
        }
    }

    /// One-line description of what the built-in rule detects
    pub fn description(&self) -> &'static str {
        match self {
            PIIType::PAN => "Payment card numbers (Luhn validated)",
            PIIType::IBAN => "International Bank Account Numbers (mod-97 validated)",
            PIIType::SSN => "US Social Security Numbers",
            PIIType::Email => "Email addresses",
            PIIType::Phone => "Phone numbers (10-15 digits)",
            PIIType::Custom => "User-defined patterns",
        }
    }
}

/// Matches found in one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Non-overlapping matches in ascending start order
    pub matches: Vec<DetectionMatch>,

    /// Byte length of the scanned (possibly truncated) text
    pub text_length: usize,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Distinct types present, ordered by raw name
    pub fn types(&self) -> Vec<PIIType> {
        self.counts_by_type().into_iter().map(|(t, _)| t).collect()
    }

    pub fn count(&self, pii_type: PIIType) -> usize {
        self.matches.iter().filter(|m| m.pii_type == pii_type).count()
    }

    /// Match counts per type, ordered by raw name
    pub fn counts_by_type(&self) -> Vec<(PIIType, usize)> {
        let mut counts = BTreeMap::new();
        for detection in &self.matches {
            *counts.entry(TypeKey(detection.pii_type)).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(TypeKey(pii_type), count)| (pii_type, count))
            .collect()
    }

    /// Human-readable per-type counts, e.g. `Payment Card: 1, Phone: 1`
    pub fn summary(&self) -> String {
        if self.matches.is_empty() {
            return "None".to_string();
        }

        self.counts_by_type()
            .into_iter()
            .map(|(pii_type, count)| format!("{}: {}", pii_type.display_name(), count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Serializable reporting view
    pub fn to_summary(&self) -> DetectionSummary {
        DetectionSummary {
            types: self
                .counts_by_type()
                .into_iter()
                .map(|(pii_type, count)| TypeCount {
                    pii_type,
                    display_name: pii_type.display_name().to_string(),
                    count,
                })
                .collect(),
            matches: self.matches.len(),
            text_length: self.text_length,
        }
    }
}

/// Orders types by raw name so summaries read alphabetically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TypeKey(PIIType);

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_str().cmp(other.0.as_str())
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-type match counts for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub types: Vec<TypeCount>,
    pub matches: usize,
    pub text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub pii_type: PIIType,
    pub display_name: String,
    pub count: usize,
}

/// Trait for detecting PII in text
pub trait PIIDetector: Send + Sync {
    /// Detect PII in the given text
    fn detect(&self, text: &str, config: &ShieldConfig) -> DetectionResult;

    /// Get the types of PII the configuration enables
    fn supported_types(&self, config: &ShieldConfig) -> Vec<PIIType>;
}
