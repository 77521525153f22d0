//! Canonical form for column names.
//!
//! Headers typed by different people for the same data diverge in case,
//! accents, and separator style (`Código-Postal`, `codigo_postal`,
//! `CODIGO POSTAL`). The canonical key collapses all of those so the
//! differ can compare names by equality alone. Keys are never shown to
//! the user; reports always carry the original spelling.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const STRIPPED_CHARS: &[char] = &['-', '_', '.', ' '];

/// Reduces a raw header to its canonical comparison key: lowercase,
/// trimmed, separator characters removed anywhere in the string, and
/// diacritics stripped via NFKD decomposition.
///
/// An empty key is a valid result for all-whitespace/separator input.
pub fn canonical_key(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();
    stripped.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}
