/*!
 * Title normalization.
 *
 * Turns arbitrarily formatted catalog and chapter titles into comparison keys:
 * `"8a. Kūrma Avatāra"` and `"Kurma  avatara"` both become `"kurma_avatara"`.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// @const: Leading ordinal such as "1. " or "8a. "
static ORDINAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+[A-Za-z]?\.\s*").unwrap()
});

/// Remove a leading ordinal marker (`"12. "`, `"8a. "`) if present
pub fn strip_ordinal(title: &str) -> &str {
    match ORDINAL_PREFIX.find(title) {
        Some(m) => &title[m.end()..],
        None => title,
    }
}

/// Canonicalize a raw title into its normalized key
///
/// Steps: strip the ordinal prefix, decompose and drop combining marks,
/// lowercase, drop everything that is not alphanumeric, whitespace or an
/// underscore, then join whitespace runs with single underscores.
///
/// The result only contains lowercase alphanumerics and underscores, so
/// normalizing it again is a no-op.
pub fn normalize_title(title: &str) -> String {
    let folded = fold(strip_ordinal(title));

    let kept: String = folded
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Lowercase and strip diacritics, keeping everything else as is
///
/// Used for the case and accent insensitive containment checks of the
/// domain heuristics, where spaces and punctuation must survive.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
