use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref HAS_ALNUM: Regex = Regex::new(r"(?u)[\p{L}\p{N}]").expect("valid regex");
}

/// Canonical form of a user-supplied tag: NFKC, lowercase, whitespace runs
/// collapsed to a single `-`. Other punctuation is kept as is.
/// Returns `None` when no letter or digit is left.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let normalized = raw.nfkc().collect::<String>().to_lowercase();
    let trimmed = normalized.trim();
    if !HAS_ALNUM.is_match(trimmed) {
        return None;
    }
    Some(WHITESPACE.replace_all(trimmed, "-").into_owned())
}

/// Splits a comma-separated list and normalizes each element, dropping empties.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',').filter_map(normalize_tag).collect()
}
