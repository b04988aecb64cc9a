//! Free-text scrubbing applied to validated values right before they are
//! handed to the store. Queries are parameterized already, this only keeps
//! markup and quoting characters out of stored text.
//!
//! Keys (external ids, Stripe ids) and emails are not free text: their
//! grammar is enforced by validation and they are stored as given.

const STRIPPED_CHARS: &[char] = &['<', '>', '"', '\'', '`', '\\'];

/// Trims surrounding whitespace and drops control and markup characters.
pub fn text(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !STRIPPED_CHARS.contains(c))
        .collect()
}

/// Like [`text`], but an input that is empty after scrubbing counts as absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(text).filter(|v| !v.is_empty())
}

/// Emails keep every character the address grammar allows, quotes included.
pub fn email(value: &str) -> String {
    value.trim().to_string()
}
