//! Built-in patterns and their secondary validators

use regex::Regex;

/// 13-19 digits, tolerant of interior spaces and hyphens
pub(crate) const PAN_PATTERN: &str = r"\b(?:[0-9][ -]*?){13,19}\b";

/// Country code, check digits, then 11-30 alphanumerics or spaces
pub(crate) const IBAN_PATTERN: &str = r"(?i)\b[A-Z]{2}[0-9]{2}[A-Z0-9 ]{11,30}\b";

/// Area, group and serial are captured so exclusions can be checked after the match
pub(crate) const SSN_PATTERN: &str = r"\b([0-9]{3})[- ]?([0-9]{2})[- ]?([0-9]{4})\b";

pub(crate) const EMAIL_PATTERN: &str = r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b";

/// Digit runs with separators; alphanumeric adjacency is checked in `find_phone_spans`
pub(crate) const PHONE_PATTERN: &str = r"\+?[0-9][0-9\s().-]{7,}[0-9]";

/// Shortest text the phone pattern can match, in characters (without `+`)
const PHONE_MIN_CHARS: usize = 9;

/// Luhn (mod 10) checksum over the digits of `number`
pub fn luhn_check(number: &str) -> bool {
    let checksum: u32 = number
        .chars()
        .filter_map(|c| c.to_digit(10))
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    checksum.is_multiple_of(10)
}

/// ISO 7064 mod-97 check of an IBAN (spaces ignored, case-insensitive)
pub fn iban_is_valid(value: &str) -> bool {
    let normalized: Vec<char> = value
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.len() < 15 || normalized.len() > 34 {
        return false;
    }

    let (head, tail) = normalized.split_at(4);
    let mut remainder: u32 = 0;
    for &ch in tail.iter().chain(head) {
        if let Some(digit) = ch.to_digit(10) {
            remainder = (remainder * 10 + digit) % 97;
        } else if ch.is_ascii_uppercase() {
            // A=10 ... Z=35, folded as two decimal digits
            let value = ch as u32 - 'A' as u32 + 10;
            remainder = (remainder * 10 + value / 10) % 97;
            remainder = (remainder * 10 + value % 10) % 97;
        } else {
            return false;
        }
    }

    remainder == 1
}

pub(crate) fn pan_is_valid(value: &str) -> bool {
    let digits = digits_only(value);
    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }
    if all_identical(&digits) {
        return false;
    }
    luhn_check(&digits)
}

pub(crate) fn phone_is_valid(value: &str) -> bool {
    let digits = digits_only(value);
    (10..=15).contains(&digits.len()) && !all_identical(&digits)
}

/// Area 000/666/9xx, group 00 and serial 0000 are never issued
pub(crate) fn ssn_groups_valid(area: &str, group: &str, serial: &str) -> bool {
    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

pub(crate) fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn all_identical(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

/// SSN candidates that pass the issuance exclusions.
///
/// A rejected candidate resumes the search one character later, the same
/// positions a lookahead-based pattern would try.
pub(crate) fn find_ssn_spans(regex: &Regex, text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        if ssn_groups_valid(&caps[1], &caps[2], &caps[3]) {
            spans.push((whole.start(), whole.end()));
            pos = whole.end();
        } else {
            pos = next_char_boundary(text, whole.start());
        }
    }

    spans
}

/// Phone candidates not adjacent to ASCII letters or digits.
///
/// A candidate preceded by an alphanumeric is retried from the next
/// character. A candidate followed by one is cut back to the longest prefix
/// that ends in a digit followed by a separator.
pub(crate) fn find_phone_spans(regex: &Regex, text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(found) = regex.find_at(text, pos) else {
            break;
        };
        let start = found.start();

        if preceded_by_alnum(text, start) {
            pos = next_char_boundary(text, start);
            continue;
        }

        match trailing_boundary(text, start, found.end()) {
            Some(end) => {
                spans.push((start, end));
                pos = end;
            }
            None => pos = next_char_boundary(text, start),
        }
    }

    spans
}

fn trailing_boundary(text: &str, start: usize, end: usize) -> Option<usize> {
    if !followed_by_alnum(text, end) {
        return Some(end);
    }

    let candidate = &text[start..end];
    let min_chars = if candidate.starts_with('+') {
        PHONE_MIN_CHARS + 1
    } else {
        PHONE_MIN_CHARS
    };

    let mut best = None;
    let mut previous: Option<char> = None;
    for (count, (offset, ch)) in candidate.char_indices().enumerate() {
        let ends_in_digit = previous.is_some_and(|p| p.is_ascii_digit());
        if !ch.is_ascii_alphanumeric() && ends_in_digit && count >= min_chars {
            best = Some(start + offset);
        }
        previous = Some(ch);
    }

    best
}

fn preceded_by_alnum(text: &str, index: usize) -> bool {
    text[..index]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

fn followed_by_alnum(text: &str, index: usize) -> bool {
    text[index..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}

fn next_char_boundary(text: &str, index: usize) -> usize {
    index + text[index..].chars().next().map_or(1, char::len_utf8)
}
