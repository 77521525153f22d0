//! Bidirectional mapping between a file's original headers and their
//! canonical keys.

use std::collections::HashMap;

use crate::normalize::canonical_key;

/// One file's header, indexed both ways: canonical key back to the
/// original spelling, and the ordered sequence of canonical keys.
///
/// When two original headers normalize to the same key, the last one
/// wins in `canonical_to_original`. That is lossy but deliberate: the
/// report semantics depend on it. `canonical_sequence` still keeps one
/// entry per original column, duplicates included.
#[derive(Debug, Clone)]
pub struct HeaderMapping {
    pub canonical_to_original: HashMap<String, String>,
    pub canonical_sequence: Vec<String>,
}

impl HeaderMapping {
    pub fn build(original_headers: &[String]) -> Self {
        let mut canonical_to_original = HashMap::with_capacity(original_headers.len());
        let mut canonical_sequence = Vec::with_capacity(original_headers.len());
        for original in original_headers {
            let key = canonical_key(original);
            canonical_to_original.insert(key.clone(), original.clone());
            canonical_sequence.push(key);
        }
        Self {
            canonical_to_original,
            canonical_sequence,
        }
    }

    /// Original spelling for a canonical key, empty when unknown.
    pub fn original(&self, key: &str) -> &str {
        self.canonical_to_original
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    }
}
