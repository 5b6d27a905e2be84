//! Structure-preserving masking algorithms

/// Mask every digit except the last `preserve_last`; separators pass through.
pub(crate) fn mask_digits(value: &str, mask: char, preserve_last: usize) -> String {
    mask_preserving_tail(value, mask, preserve_last, |c| c.is_ascii_digit())
}

/// Like `mask_digits`, counting letters as well as digits
pub(crate) fn mask_alphanumerics(value: &str, mask: char, preserve_last: usize) -> String {
    mask_preserving_tail(value, mask, preserve_last, char::is_alphanumeric)
}

fn mask_preserving_tail(
    value: &str,
    mask: char,
    preserve_last: usize,
    is_sensitive: impl Fn(char) -> bool,
) -> String {
    let sensitive = value.chars().filter(|c| is_sensitive(*c)).count();
    if sensitive == 0 {
        return value.to_string();
    }

    let keep_from = sensitive.saturating_sub(preserve_last);
    let mut index = 0;
    value
        .chars()
        .map(|c| {
            if !is_sensitive(c) {
                return c;
            }
            let masked = if index < keep_from { mask } else { c };
            index += 1;
            masked
        })
        .collect()
}

/// Keep the country code, check digits and the last `preserve_last`
/// characters; spaces stay at their original positions.
pub(crate) fn mask_iban(value: &str, mask: char, preserve_last: usize) -> String {
    let compact: Vec<char> = value
        .chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_uppercase)
        .collect();
    if compact.len() < 8 {
        return value.to_string();
    }

    let keep_tail = preserve_last.min(compact.len() - 4);
    let tail_from = compact.len() - keep_tail;
    let mut masked = compact.into_iter().enumerate().map(|(i, c)| {
        if i < 4 || i >= tail_from { c } else { mask }
    });

    value
        .chars()
        .filter_map(|c| if c == ' ' { Some(' ') } else { masked.next() })
        .collect()
}

/// Mask the local part of an address, keeping its first and last character
/// when it is longer than two characters. The domain is never masked.
pub(crate) fn mask_email(value: &str, mask: char) -> String {
    let Some((local, domain)) = value.split_once('@') else {
        return value.to_string();
    };

    let local_len = local.chars().count();
    if local_len <= 2 {
        let masked: String = std::iter::repeat_n(mask, local_len.max(1)).collect();
        return format!("{}@{}", masked, domain);
    }

    let mut chars = local.chars();
    let first = chars.next().unwrap_or(mask);
    let last = chars.next_back().unwrap_or(mask);
    let middle: String = std::iter::repeat_n(mask, local_len - 2).collect();
    format!("{}{}{}@{}", first, middle, last, domain)
}
