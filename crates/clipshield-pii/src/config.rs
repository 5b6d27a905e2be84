//! Configuration shape read by the detector and redactor
//!
//! Every field has a named default so that partial documents (or documents
//! written by older versions) always deserialize. The `builtins` and
//! `perType` maps are merged over their defaults key by key.

use crate::detector::PIIType;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Redaction policy applied to a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionStrategy {
    /// Structure-preserving masking
    #[default]
    Mask,

    /// Deterministic salted token
    Tokenize,

    /// Fixed placeholder naming the type
    Remove,
}

impl RedactionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedactionStrategy::Mask => "mask",
            RedactionStrategy::Tokenize => "tokenize",
            RedactionStrategy::Remove => "remove",
        }
    }
}

/// Configuration consumed by a scan/redact call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldConfig {
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,
}

/// Input limits applied before pattern matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringConfig {
    /// Maximum number of characters scanned; 0 disables truncation
    #[serde(
        default = "default_max_scan_length",
        deserialize_with = "non_negative"
    )]
    pub max_scan_length: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_scan_length: default_max_scan_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Enable flags for built-in types, keyed by raw type name
    #[serde(default = "default_builtins", deserialize_with = "merge_builtins")]
    pub builtins: BTreeMap<String, RuleToggle>,

    /// User-defined patterns, evaluated in order
    #[serde(default)]
    pub custom_rules: Vec<CustomRule>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            builtins: default_builtins(),
            custom_rules: Vec::new(),
        }
    }
}

impl DetectionConfig {
    /// Whether a built-in type is enabled. Unknown keys default to enabled.
    pub fn is_enabled(&self, pii_type: PIIType) -> bool {
        self.builtins
            .get(pii_type.as_str())
            .map(|toggle| toggle.enabled)
            .unwrap_or(true)
    }

    /// Enable or disable a built-in type
    pub fn set_enabled(&mut self, pii_type: PIIType, enabled: bool) {
        self.builtins
            .insert(pii_type.as_str().to_string(), RuleToggle { enabled });
    }

    /// Look up a custom rule by its ID
    pub fn custom_rule(&self, id: &str) -> Option<&CustomRule> {
        self.custom_rules.iter().find(|rule| rule.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggle {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A caller-defined detection rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRule {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub label: String,

    /// Regex pattern (Rust `regex` syntax)
    #[serde(default)]
    pub pattern: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Strategy used for this rule's matches in auto mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<RedactionStrategy>,

    #[serde(
        default,
        deserialize_with = "optional_non_negative",
        skip_serializing_if = "Option::is_none"
    )]
    pub preserve_last_digits: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_character: Option<String>,

    #[serde(default = "default_true")]
    pub case_insensitive: bool,
}

impl CustomRule {
    /// Create an enabled, case-insensitive rule with no overrides
    pub fn new(id: impl Into<String>, label: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            pattern: pattern.into(),
            enabled: true,
            strategy: None,
            preserve_last_digits: None,
            mask_character: None,
            case_insensitive: true,
        }
    }

    pub fn with_strategy(mut self, strategy: RedactionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_preserve_last_digits(mut self, count: usize) -> Self {
        self.preserve_last_digits = Some(count);
        self
    }

    pub fn with_mask_character(mut self, mask: impl Into<String>) -> Self {
        self.mask_character = Some(mask.into());
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionConfig {
    #[serde(default)]
    pub default_strategy: RedactionStrategy,

    #[serde(default = "default_mask_character")]
    pub mask_character: String,

    #[serde(
        default = "default_preserve_last_digits",
        deserialize_with = "non_negative"
    )]
    pub preserve_last_digits: usize,

    /// Per-type overrides keyed by raw type name
    #[serde(default = "default_overrides", deserialize_with = "merge_overrides")]
    pub per_type: BTreeMap<String, RedactionOverride>,

    #[serde(default)]
    pub tokenization: TokenizationConfig,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            default_strategy: RedactionStrategy::Mask,
            mask_character: default_mask_character(),
            preserve_last_digits: default_preserve_last_digits(),
            per_type: default_overrides(),
            tokenization: TokenizationConfig::default(),
        }
    }
}

impl RedactionConfig {
    pub fn override_for(&self, pii_type: PIIType) -> Option<&RedactionOverride> {
        self.per_type.get(pii_type.as_str())
    }

    /// Set or replace the override for a type
    pub fn set_override(&mut self, pii_type: PIIType, value: RedactionOverride) {
        self.per_type.insert(pii_type.as_str().to_string(), value);
    }
}

/// Override of redaction settings for one type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<RedactionStrategy>,

    #[serde(
        default,
        deserialize_with = "optional_non_negative",
        skip_serializing_if = "Option::is_none"
    )]
    pub preserve_last_digits: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_character: Option<String>,
}

impl RedactionOverride {
    pub fn strategy(strategy: RedactionStrategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    fn preserving(count: usize) -> Self {
        Self {
            preserve_last_digits: Some(count),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationConfig {
    #[serde(default = "default_token_prefix")]
    pub prefix: String,

    /// Number of hex characters kept from the digest (minimum 4)
    #[serde(default = "default_hash_length", deserialize_with = "non_negative")]
    pub hash_length: usize,

    #[serde(default)]
    pub salt: String,
}

impl Default for TokenizationConfig {
    fn default() -> Self {
        Self {
            prefix: default_token_prefix(),
            hash_length: default_hash_length(),
            salt: String::new(),
        }
    }
}

/// Counts are read as signed integers; negative values clamp to zero
fn non_negative<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    Ok(clamp_count(value))
}

fn optional_non_negative<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<i64>::deserialize(deserializer)?;
    Ok(value.map(clamp_count))
}

fn clamp_count(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

fn merge_builtins<'de, D>(deserializer: D) -> Result<BTreeMap<String, RuleToggle>, D::Error>
where
    D: Deserializer<'de>,
{
    let decoded = BTreeMap::<String, RuleToggle>::deserialize(deserializer)?;
    let mut merged = default_builtins();
    merged.extend(decoded);
    Ok(merged)
}

fn merge_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<String, RedactionOverride>, D::Error>
where
    D: Deserializer<'de>,
{
    let decoded = BTreeMap::<String, RedactionOverride>::deserialize(deserializer)?;
    let mut merged = default_overrides();
    merged.extend(decoded);
    Ok(merged)
}

fn default_builtins() -> BTreeMap<String, RuleToggle> {
    PIIType::BUILTIN
        .iter()
        .map(|pii_type| (pii_type.as_str().to_string(), RuleToggle { enabled: true }))
        .collect()
}

fn default_overrides() -> BTreeMap<String, RedactionOverride> {
    [
        (PIIType::PAN, RedactionOverride::preserving(4)),
        (PIIType::IBAN, RedactionOverride::preserving(4)),
        (PIIType::SSN, RedactionOverride::preserving(4)),
        (PIIType::Email, RedactionOverride::default()),
        (PIIType::Phone, RedactionOverride::preserving(2)),
    ]
    .into_iter()
    .map(|(pii_type, value)| (pii_type.as_str().to_string(), value))
    .collect()
}

fn default_max_scan_length() -> usize {
    50_000
}

fn default_mask_character() -> String {
    "*".to_string()
}

fn default_preserve_last_digits() -> usize {
    4
}

fn default_token_prefix() -> String {
    "tok_".to_string()
}

fn default_hash_length() -> usize {
    10
}

fn default_true() -> bool {
    true
}
