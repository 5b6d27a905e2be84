//! Regex-based PII detector implementation

use crate::config::{CustomRule, ShieldConfig};
use crate::detector::patterns::{
    self, EMAIL_PATTERN, IBAN_PATTERN, PAN_PATTERN, PHONE_PATTERN, SSN_PATTERN,
};
use crate::detector::{DetectionMatch, DetectionResult, PIIDetector, PIIType};
use crate::error::{PiiError, Result};
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Regex-based PII detector
///
/// Built-in patterns are compiled once and shared read-only; custom rules are
/// compiled from the configuration on every scan.
#[derive(Debug, Clone)]
pub struct RegexPIIDetector {
    pan_regex: Arc<Regex>,
    iban_regex: Arc<Regex>,
    ssn_regex: Arc<Regex>,
    email_regex: Arc<Regex>,
    phone_regex: Arc<Regex>,
}

impl RegexPIIDetector {
    /// Create a new detector with the built-in patterns compiled
    pub fn new() -> Result<Self> {
        Ok(Self {
            pan_regex: compile(PIIType::PAN, PAN_PATTERN)?,
            iban_regex: compile(PIIType::IBAN, IBAN_PATTERN)?,
            ssn_regex: compile(PIIType::SSN, SSN_PATTERN)?,
            email_regex: compile(PIIType::Email, EMAIL_PATTERN)?,
            phone_regex: compile(PIIType::Phone, PHONE_PATTERN)?,
        })
    }

    /// Validated matches of one built-in type
    fn builtin_matches(&self, pii_type: PIIType, text: &str) -> Vec<DetectionMatch> {
        let spans: Vec<(usize, usize)> = match pii_type {
            PIIType::PAN => validated(&self.pan_regex, text, patterns::pan_is_valid),
            PIIType::IBAN => validated(&self.iban_regex, text, patterns::iban_is_valid),
            PIIType::SSN => patterns::find_ssn_spans(&self.ssn_regex, text),
            PIIType::Email => validated(&self.email_regex, text, |_| true),
            PIIType::Phone => patterns::find_phone_spans(&self.phone_regex, text)
                .into_iter()
                .filter(|(start, end)| patterns::phone_is_valid(&text[*start..*end]))
                .collect(),
            PIIType::Custom => Vec::new(),
        };

        spans
            .into_iter()
            .map(|(start, end)| DetectionMatch::new(pii_type, start, &text[start..end]))
            .collect()
    }

    /// Matches of one custom rule; an invalid pattern yields nothing
    fn custom_matches(rule: &CustomRule, text: &str) -> Vec<DetectionMatch> {
        let regex = match RegexBuilder::new(&rule.pattern)
            .case_insensitive(rule.case_insensitive)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                warn!(rule_id = %rule.id, error = %e, "Skipping custom rule with invalid pattern");
                return Vec::new();
            }
        };

        regex
            .find_iter(text)
            .filter(|found| !found.is_empty())
            .map(|found| {
                DetectionMatch::new(PIIType::Custom, found.start(), found.as_str())
                    .with_rule(&rule.id, &rule.label)
            })
            .collect()
    }
}

impl PIIDetector for RegexPIIDetector {
    fn detect(&self, text: &str, config: &ShieldConfig) -> DetectionResult {
        if text.is_empty() {
            return DetectionResult::empty();
        }

        let scanned = truncate_chars(text, config.monitoring.max_scan_length);
        if scanned.len() < text.len() {
            debug!(
                original_len = text.len(),
                scanned_len = scanned.len(),
                "Input truncated before scanning"
            );
        }

        let mut candidates = Vec::new();

        for pii_type in PIIType::BUILTIN {
            if config.detection.is_enabled(pii_type) {
                candidates.extend(self.builtin_matches(pii_type, scanned));
            }
        }

        for rule in config.detection.custom_rules.iter().filter(|r| r.enabled) {
            candidates.extend(Self::custom_matches(rule, scanned));
        }

        let candidate_count = candidates.len();
        let matches = resolve_overlaps(candidates);
        debug!(
            candidates = candidate_count,
            matches = matches.len(),
            "PII scan complete"
        );

        DetectionResult {
            matches,
            text_length: scanned.len(),
        }
    }

    fn supported_types(&self, config: &ShieldConfig) -> Vec<PIIType> {
        let mut types: Vec<PIIType> = PIIType::BUILTIN
            .into_iter()
            .filter(|t| config.detection.is_enabled(*t))
            .collect();

        if config.detection.custom_rules.iter().any(|r| r.enabled) {
            types.push(PIIType::Custom);
        }

        types
    }
}

fn compile(pii_type: PIIType, pattern: &str) -> Result<Arc<Regex>> {
    Regex::new(pattern)
        .map(Arc::new)
        .map_err(|source| PiiError::Pattern {
            name: pii_type.as_str().to_string(),
            source,
        })
}

fn validated(regex: &Regex, text: &str, validator: impl Fn(&str) -> bool) -> Vec<(usize, usize)> {
    regex
        .find_iter(text)
        .filter(|found| validator(found.as_str()))
        .map(|found| (found.start(), found.end()))
        .collect()
}

/// Prefix of `text` holding at most `max_chars` characters (0 = unlimited)
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return text;
    }

    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Keep the longest non-overlapping candidates.
///
/// Candidates are ranked by descending length in characters, then ascending
/// start, then collection order (built-ins before custom rules), and accepted
/// greedily unless they intersect an accepted span. The result is sorted by
/// start.
pub(crate) fn resolve_overlaps(candidates: Vec<DetectionMatch>) -> Vec<DetectionMatch> {
    let mut ranked: Vec<(usize, DetectionMatch)> = candidates.into_iter().enumerate().collect();
    ranked.sort_by_key(|(order, m)| (Reverse(m.value.chars().count()), m.start, *order));

    let mut kept: Vec<DetectionMatch> = Vec::with_capacity(ranked.len());
    for (_, candidate) in ranked {
        if kept.iter().any(|accepted| accepted.overlaps(&candidate)) {
            continue;
        }
        kept.push(candidate);
    }

    kept.sort_by_key(|m| m.start);
    kept
}
