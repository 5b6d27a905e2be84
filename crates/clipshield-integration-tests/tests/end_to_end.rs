//! Detection and redaction flows across the public API

use clipshield_integration_tests::{Pipeline, init_tracing};
use clipshield_pii::{
    CustomRule, PIIType, RedactionMode, RedactionStrategy, ShieldConfig, TokenizationConfig, token,
};

const CORPUS: &[&str] = &[
    "4111 1111 1111 1111",
    "GB29 NWBK 6016 1331 9268 19",
    "john.doe@example.com",
    "call 555-123-4567 or 4111111111111111",
    "ssn 123-45-6789, backup 078-05-1120",
    "Wire to DE89370400440532013000 then mail ops@bank.example.org or +44 20 7946 0958",
    "ticket PROJ-4411 refers to card 5500-0000-0000-0004 and (212) 555-0199",
    "nothing sensitive in here at all",
    "",
];

fn pipeline() -> Pipeline {
    init_tracing();
    Pipeline::new(ShieldConfig::default()).unwrap()
}

#[test]
fn test_card_masked() {
    let pipeline = pipeline();

    let result = pipeline.scan("4111 1111 1111 1111");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].pii_type, PIIType::PAN);

    assert_eq!(
        pipeline.redact("4111 1111 1111 1111", RedactionMode::Auto),
        "**** **** **** 1111"
    );
}

#[test]
fn test_iban_masked() {
    let pipeline = pipeline();

    let result = pipeline.scan("GB29 NWBK 6016 1331 9268 19");
    assert_eq!(result.types(), vec![PIIType::IBAN]);
    assert_eq!(result.matches.len(), 1);

    assert_eq!(
        pipeline.redact("GB29 NWBK 6016 1331 9268 19", RedactionMode::Mask),
        "GB29 **** **** **** **68 19"
    );
}

#[test]
fn test_email_masked() {
    let pipeline = pipeline();

    assert_eq!(
        pipeline.redact("john.doe@example.com", RedactionMode::Auto),
        "j******e@example.com"
    );
}

#[test]
fn test_phone_and_card_summary() {
    let pipeline = pipeline();
    let text = "call 555-123-4567 or 4111111111111111";

    let result = pipeline.scan(text);
    assert_eq!(result.summary(), "Payment Card: 1, Phone: 1");
    assert_eq!(result.text_length, text.len());

    assert_eq!(
        pipeline.redact(text, RedactionMode::Remove),
        "call [REDACTED:PHONE] or [REDACTED:PAYMENT CARD]"
    );

    let summary = serde_json::to_value(result.to_summary()).unwrap();
    assert_eq!(summary["matches"], 2);
}

#[test]
fn test_custom_rule_removed() {
    let mut config = ShieldConfig::default();
    config.detection.custom_rules.push(
        CustomRule::new("proj", "Project", r"PROJ-\d+").with_strategy(RedactionStrategy::Remove),
    );
    let pipeline = Pipeline::new(config).unwrap();

    let result = pipeline.scan("ticket PROJ-4411 is late");
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].rule_id.as_deref(), Some("proj"));

    assert_eq!(
        pipeline.redact("ticket PROJ-4411 is late", RedactionMode::Auto),
        "ticket [REDACTED:CUSTOM] is late"
    );
}

#[test]
fn test_empty_input() {
    let pipeline = pipeline();

    let result = pipeline.scan("");
    assert!(result.is_empty());
    assert_eq!(result.summary(), "None");
    assert_eq!(pipeline.redact("", RedactionMode::Tokenize), "");
    assert_eq!(
        pipeline.redact("nothing sensitive in here at all", RedactionMode::Auto),
        "nothing sensitive in here at all"
    );
}

#[test]
fn test_matches_sorted_and_disjoint() {
    let mut config = ShieldConfig::default();
    // Overlaps every digit run in the corpus
    config
        .detection
        .custom_rules
        .push(CustomRule::new("digits", "Digits", r"\d+"));
    let pipeline = Pipeline::new(config).unwrap();

    for text in CORPUS {
        let result = pipeline.scan(text);

        for m in &result.matches {
            assert_eq!(&text[m.start..m.end], m.value, "{:?}", text);
        }
        for pair in result.matches.windows(2) {
            assert!(pair[0].start < pair[1].start, "unsorted in {:?}", text);
            assert!(pair[0].end <= pair[1].start, "overlap in {:?}", text);
        }
    }
}

#[test]
fn test_masking_is_idempotent() {
    let pipeline = pipeline();
    let text =
        "card 4111 1111 1111 1111, ssn 123-45-6789, call 555-123-4567, iban GB29 NWBK 6016 1331 9268 19";

    let once = pipeline.redact(text, RedactionMode::Mask);
    assert_ne!(once, text);
    assert!(pipeline.scan(&once).is_empty(), "{}", once);
    assert_eq!(pipeline.redact(&once, RedactionMode::Mask), once);
}

#[test]
fn test_tokenization_deterministic() {
    let pipeline = pipeline();
    let text = "pay 4111111111111111 today";

    let first = pipeline.redact(text, RedactionMode::Tokenize);
    let second = pipeline.redact(text, RedactionMode::Tokenize);
    assert_eq!(first, second);

    let expected = token("4111111111111111", PIIType::PAN, &TokenizationConfig::default());
    assert_eq!(first, format!("pay {} today", expected));

    // Separators do not change the token
    assert_eq!(
        pipeline.redact("pay 4111-1111-1111-1111 today", RedactionMode::Tokenize),
        first
    );
}

#[test]
fn test_tokenization_salt_and_value_sensitive() {
    let unsalted = pipeline();
    let mut config = ShieldConfig::default();
    config.redaction.tokenization.salt = "pepper".to_string();
    let salted = Pipeline::new(config).unwrap();

    let text = "mail john.doe@example.com";
    assert_ne!(
        unsalted.redact(text, RedactionMode::Tokenize),
        salted.redact(text, RedactionMode::Tokenize)
    );
    assert_ne!(
        unsalted.redact(text, RedactionMode::Tokenize),
        unsalted.redact("mail jane.doe@example.com", RedactionMode::Tokenize)
    );
}

#[test]
fn test_scan_length_limit() {
    let mut config = ShieldConfig::default();
    config.monitoring.max_scan_length = 10;
    let limited = Pipeline::new(config).unwrap();
    let text = "padding 4111111111111111";

    // Only "padding 41" is scanned
    let result = limited.scan(text);
    assert!(result.is_empty());
    assert_eq!(result.text_length, 10);

    let full = pipeline().scan(text);
    assert_eq!(full.types(), vec![PIIType::PAN]);
    assert_eq!(full.text_length, text.len());
}

#[test]
fn test_disabled_builtin_not_redacted() {
    let mut config = ShieldConfig::default();
    config.detection.set_enabled(PIIType::Phone, false);
    let pipeline = Pipeline::new(config).unwrap();

    assert_eq!(
        pipeline.redact("call 555-123-4567 or 4111111111111111", RedactionMode::Auto),
        "call 555-123-4567 or ************1111"
    );
}
