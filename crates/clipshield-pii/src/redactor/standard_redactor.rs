//! Standard PII redactor implementation

use crate::config::{CustomRule, RedactionOverride, RedactionStrategy, ShieldConfig};
use crate::detector::{DetectionMatch, PIIType};
use crate::redactor::masking::{mask_alphanumerics, mask_digits, mask_email, mask_iban};
use crate::redactor::{PIIRedactor, RedactionMode};
use crate::tokenizer;
use std::cmp::Reverse;
use tracing::{debug, warn};

/// Standard implementation of PII redaction
///
/// Holds no state: every setting is read from the configuration passed to
/// each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRedactor;

impl StandardRedactor {
    pub fn new() -> Self {
        Self
    }

    /// Strategy applied to one match under the requested mode
    pub fn resolve_strategy(
        &self,
        detection: &DetectionMatch,
        mode: RedactionMode,
        config: &ShieldConfig,
    ) -> RedactionStrategy {
        if let Some(strategy) = mode.explicit_strategy() {
            return strategy;
        }

        let settings = Settings::for_match(detection, config);
        settings
            .rule
            .and_then(|rule| rule.strategy)
            .or_else(|| settings.type_override.and_then(|o| o.strategy))
            .unwrap_or(config.redaction.default_strategy)
    }

    /// Replacement text for one match
    pub fn replacement(
        &self,
        detection: &DetectionMatch,
        strategy: RedactionStrategy,
        config: &ShieldConfig,
    ) -> String {
        match strategy {
            RedactionStrategy::Remove => placeholder(detection.pii_type),
            RedactionStrategy::Tokenize => tokenizer::token(
                &detection.value,
                detection.pii_type,
                &config.redaction.tokenization,
            ),
            RedactionStrategy::Mask => self.mask(detection, config),
        }
    }

    fn mask(&self, detection: &DetectionMatch, config: &ShieldConfig) -> String {
        let settings = Settings::for_match(detection, config);
        let mask = settings.mask_character(config);
        let preserve_last = settings.preserve_last_digits(config);
        let value = detection.value.as_str();

        match detection.pii_type {
            PIIType::PAN | PIIType::SSN | PIIType::Phone => mask_digits(value, mask, preserve_last),
            PIIType::IBAN => mask_iban(value, mask, preserve_last),
            PIIType::Email => mask_email(value, mask),
            PIIType::Custom => mask_alphanumerics(value, mask, preserve_last),
        }
    }
}

/// Placeholder used by the remove strategy, e.g. `[REDACTED:PAYMENT CARD]`
pub fn placeholder(pii_type: PIIType) -> String {
    format!("[REDACTED:{}]", pii_type.display_name().to_uppercase())
}

/// Overrides that apply to one match, most specific first
struct Settings<'a> {
    rule: Option<&'a CustomRule>,
    type_override: Option<&'a RedactionOverride>,
}

impl<'a> Settings<'a> {
    fn for_match(detection: &DetectionMatch, config: &'a ShieldConfig) -> Self {
        let rule = match detection.pii_type {
            PIIType::Custom => detection
                .rule_id
                .as_deref()
                .and_then(|id| config.detection.custom_rule(id)),
            _ => None,
        };

        Self {
            rule,
            type_override: config.redaction.override_for(detection.pii_type),
        }
    }

    fn mask_character(&self, config: &ShieldConfig) -> char {
        let first = |s: Option<&str>| s.and_then(|s| s.chars().next());

        first(self.rule.and_then(|r| r.mask_character.as_deref()))
            .or_else(|| first(self.type_override.and_then(|o| o.mask_character.as_deref())))
            .or_else(|| config.redaction.mask_character.chars().next())
            .unwrap_or('*')
    }

    fn preserve_last_digits(&self, config: &ShieldConfig) -> usize {
        self.rule
            .and_then(|r| r.preserve_last_digits)
            .or_else(|| self.type_override.and_then(|o| o.preserve_last_digits))
            .unwrap_or(config.redaction.preserve_last_digits)
    }
}

impl PIIRedactor for StandardRedactor {
    fn redact(
        &self,
        text: &str,
        detections: &[DetectionMatch],
        mode: RedactionMode,
        config: &ShieldConfig,
    ) -> String {
        if detections.is_empty() {
            return text.to_string();
        }

        let mut ordered: Vec<&DetectionMatch> = detections.iter().collect();
        ordered.sort_by_key(|d| Reverse(d.start));

        // Apply right to left so offsets into the original text stay valid
        let mut result = text.to_string();
        let mut applied_from = text.len();
        let mut applied = 0;

        for detection in ordered {
            if !span_is_valid(text, detection) {
                warn!(
                    start = detection.start,
                    end = detection.end,
                    "Skipping detection with invalid span"
                );
                continue;
            }
            if detection.end > applied_from {
                warn!(
                    start = detection.start,
                    end = detection.end,
                    "Skipping detection overlapping a previous replacement"
                );
                continue;
            }

            let strategy = self.resolve_strategy(detection, mode, config);
            let replacement = self.replacement(detection, strategy, config);
            result.replace_range(detection.start..detection.end, &replacement);
            applied_from = detection.start;
            applied += 1;
        }

        debug!(
            mode = %mode,
            detections = detections.len(),
            applied,
            "Redaction complete"
        );

        result
    }
}

fn span_is_valid(text: &str, detection: &DetectionMatch) -> bool {
    detection.start <= detection.end
        && detection.end <= text.len()
        && text.is_char_boundary(detection.start)
        && text.is_char_boundary(detection.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomRule, RedactionOverride};

    fn create_detection(pii_type: PIIType, text: &str, value: &str) -> DetectionMatch {
        let start = text.find(value).unwrap();
        DetectionMatch::new(pii_type, start, value)
    }

    #[test]
    fn test_remove_mode() {
        let redactor = StandardRedactor::new();
        let text = "Email: test@example.com and phone: 555-123-4567";
        let detections = vec![
            create_detection(PIIType::Email, text, "test@example.com"),
            create_detection(PIIType::Phone, text, "555-123-4567"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Remove, &ShieldConfig::default());
        assert_eq!(
            redacted,
            "Email: [REDACTED:EMAIL] and phone: [REDACTED:PHONE]"
        );
    }

    #[test]
    fn test_remove_placeholder_uses_display_name() {
        assert_eq!(placeholder(PIIType::PAN), "[REDACTED:PAYMENT CARD]");
        assert_eq!(placeholder(PIIType::Custom), "[REDACTED:CUSTOM]");
    }

    #[test]
    fn test_mask_mode() {
        let redactor = StandardRedactor::new();
        let text = "Email: test@example.com and SSN: 123-45-6789";
        let detections = vec![
            create_detection(PIIType::Email, text, "test@example.com"),
            create_detection(PIIType::SSN, text, "123-45-6789"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Mask, &ShieldConfig::default());
        assert_eq!(redacted, "Email: t**t@example.com and SSN: ***-**-6789");
    }

    #[test]
    fn test_phone_default_preserves_two_digits() {
        let redactor = StandardRedactor::new();
        let text = "555-123-4567";
        let detections = vec![create_detection(PIIType::Phone, text, text)];

        let redacted = redactor.redact(text, &detections, RedactionMode::Auto, &ShieldConfig::default());
        assert_eq!(redacted, "***-***-**67");
    }

    #[test]
    fn test_tokenize_mode() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config.redaction.tokenization.salt = "test-secret-key".to_string();

        let text = "Email: test@example.com";
        let detections = vec![create_detection(PIIType::Email, text, "test@example.com")];

        let redacted = redactor.redact(text, &detections, RedactionMode::Tokenize, &config);

        assert!(redacted.starts_with("Email: tok_email_"));
        assert!(!redacted.contains("test@example.com"));

        let redacted2 = redactor.redact(text, &detections, RedactionMode::Tokenize, &config);
        assert_eq!(redacted, redacted2);
    }

    #[test]
    fn test_auto_uses_default_strategy() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config.redaction.default_strategy = RedactionStrategy::Remove;

        let text = "SSN 123-45-6789";
        let detections = vec![create_detection(PIIType::SSN, text, "123-45-6789")];

        let redacted = redactor.redact(text, &detections, RedactionMode::Auto, &config);
        assert_eq!(redacted, "SSN [REDACTED:SSN]");
    }

    #[test]
    fn test_type_overrides() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config
            .redaction
            .set_override(PIIType::Email, RedactionOverride::strategy(RedactionStrategy::Remove));

        let text = "Email: test@example.com and phone: 555-123-4567";
        let detections = vec![
            create_detection(PIIType::Email, text, "test@example.com"),
            create_detection(PIIType::Phone, text, "555-123-4567"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Auto, &config);

        // Email removed by override, phone masked by default
        assert_eq!(redacted, "Email: [REDACTED:EMAIL] and phone: ***-***-**67");

        // An explicit mode wins over the override
        let redacted = redactor.redact(text, &detections, RedactionMode::Mask, &config);
        assert!(redacted.starts_with("Email: t**t@example.com"));
    }

    #[test]
    fn test_override_mask_character_and_preserve() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config.redaction.mask_character = "x".to_string();
        config.redaction.set_override(
            PIIType::PAN,
            RedactionOverride {
                strategy: None,
                preserve_last_digits: Some(6),
                mask_character: Some("#".to_string()),
            },
        );

        let text = "4111-1111-1111-1111 / 123-45-6789";
        let detections = vec![
            create_detection(PIIType::PAN, text, "4111-1111-1111-1111"),
            create_detection(PIIType::SSN, text, "123-45-6789"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Mask, &config);
        assert_eq!(redacted, "####-####-##11-1111 / xxx-xx-6789");
    }

    #[test]
    fn test_empty_mask_character_falls_back() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config.redaction.mask_character = String::new();

        let text = "123-45-6789";
        let detections = vec![create_detection(PIIType::SSN, text, text)];

        assert_eq!(
            redactor.redact(text, &detections, RedactionMode::Mask, &config),
            "***-**-6789"
        );
    }

    #[test]
    fn test_custom_rule_overrides() {
        let redactor = StandardRedactor::new();
        let mut config = ShieldConfig::default();
        config.detection.custom_rules.push(
            CustomRule::new("proj", "Project", r"PROJ-\d+")
                .with_preserve_last_digits(2)
                .with_mask_character("#"),
        );
        config.detection.custom_rules.push(
            CustomRule::new("key", "Key", r"sk-\w+").with_strategy(RedactionStrategy::Tokenize),
        );

        let text = "PROJ-4821 uses sk-abc123";
        let detections = vec![
            create_detection(PIIType::Custom, text, "PROJ-4821").with_rule("proj", "Project"),
            create_detection(PIIType::Custom, text, "sk-abc123").with_rule("key", "Key"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Auto, &config);

        assert!(redacted.starts_with("####-##21 uses tok_custom_"));
        assert!(!redacted.contains("sk-abc123"));
    }

    #[test]
    fn test_custom_without_rule_uses_defaults() {
        let redactor = StandardRedactor::new();
        let text = "ref AB-1234567";
        let detections = vec![create_detection(PIIType::Custom, text, "AB-1234567")];

        let redacted = redactor.redact(text, &detections, RedactionMode::Auto, &ShieldConfig::default());
        assert_eq!(redacted, "ref **-***4567");
    }

    #[test]
    fn test_multiple_detections_any_order() {
        let redactor = StandardRedactor::new();
        let text = "a@b.io then 123-45-6789 then c@d.io";
        let detections = vec![
            create_detection(PIIType::SSN, text, "123-45-6789"),
            create_detection(PIIType::Email, text, "c@d.io"),
            create_detection(PIIType::Email, text, "a@b.io"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Remove, &ShieldConfig::default());
        assert_eq!(
            redacted,
            "[REDACTED:EMAIL] then [REDACTED:SSN] then [REDACTED:EMAIL]"
        );
    }

    #[test]
    fn test_no_detections() {
        let redactor = StandardRedactor::new();
        let text = "No PII here!";

        let redacted = redactor.redact(text, &[], RedactionMode::Auto, &ShieldConfig::default());
        assert_eq!(redacted, text);
    }

    #[test]
    fn test_invalid_and_overlapping_spans_skipped() {
        let redactor = StandardRedactor::new();
        let text = "héllo 123-45-6789";
        let detections = vec![
            // Out of bounds
            DetectionMatch::new(PIIType::SSN, 15, "123-45-6789"),
            // Not on a char boundary
            DetectionMatch::new(PIIType::Custom, 2, "x"),
            create_detection(PIIType::SSN, text, "123-45-6789"),
            // Runs into the SSN, which is applied first
            DetectionMatch::new(PIIType::Custom, 5, "o 12"),
        ];

        let redacted = redactor.redact(text, &detections, RedactionMode::Remove, &ShieldConfig::default());
        assert_eq!(redacted, "héllo [REDACTED:SSN]");
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let redactor = StandardRedactor::new();
        let text = "Über 4111 1111 1111 1111 ✓";
        let detections = vec![create_detection(PIIType::PAN, text, "4111 1111 1111 1111")];

        let redacted = redactor.redact(text, &detections, RedactionMode::Mask, &ShieldConfig::default());
        assert_eq!(redacted, "Über **** **** **** 1111 ✓");
    }
}
