//! Approximate matching between canonical column names.
//!
//! When a column exists on only one side of a pair, the matcher scans the
//! other side's unique columns for plausible renames or typos. Three
//! criteria are applied, any one of which qualifies a candidate:
//!
//! - **Edit distance**: Levenshtein distance above zero but within half
//!   the source key's length. Distance zero is exact canonical equality,
//!   which the differ already classified as present-in-both, so it never
//!   reaches this module.
//! - **Phonetic code**: equal Metaphone encodings catch equivalences edit
//!   distance misses (`ph` vs `f`). Keys with no phonetic content (for
//!   example all-digit names) encode to an empty code, which is not
//!   treated as a match.
//! - **Containment**: either key is a substring of the other, catching
//!   prefix-style renames such as `nome` vs `nomecompleto`.

use std::collections::BTreeSet;

use rphonetic::{Encoder, Metaphone};
use strsim::levenshtein;

use crate::header::HeaderMapping;

pub const CANDIDATE_SEPARATOR: &str = "/";

/// Returns the original spellings of every target key judged similar to
/// `source_key`, joined with `/` in sorted key order, or `None` when no
/// target qualifies.
pub fn find_candidates(
    source_key: &str,
    target_keys: &BTreeSet<String>,
    target_mapping: &HeaderMapping,
) -> Option<String> {
    let metaphone = Metaphone::default();
    let source_code = metaphone.encode(source_key);
    let max_distance = source_key.chars().count() / 2;

    let candidates: Vec<&str> = target_keys
        .iter()
        .filter(|target| {
            let distance = levenshtein(source_key, target);
            let within_distance = distance > 0 && distance <= max_distance;
            let phonetic_match =
                !source_code.is_empty() && source_code == metaphone.encode(target);
            let contained = source_key.contains(target.as_str()) || target.contains(source_key);
            within_distance || phonetic_match || contained
        })
        .map(|target| target_mapping.original(target))
        .collect();

    if candidates.is_empty() {
        None
    } else {
        Some(candidates.join(CANDIDATE_SEPARATOR))
    }
}
