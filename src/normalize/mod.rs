//! Text canonicalization shared by every comparison in the pipeline.
//!
//! All functions here are pure and total. They are applied identically to the
//! student answer and the reference answer so comparisons stay symmetric.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::STOP_WORDS;

/// Maps an answer to its comparison form.
///
/// Trims, lower-cases, collapses internal whitespace runs to a single space and
/// strips terminal punctuation. `""` normalizes to `""`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut trimmed = collapsed.as_str();
    loop {
        let next = trimmed
            .trim_end_matches(|c: char| c.is_ascii_punctuation() || is_terminal_mark(c))
            .trim_end();
        if next.len() == trimmed.len() {
            break;
        }
        trimmed = next;
    }

    trimmed.to_string()
}

fn is_terminal_mark(c: char) -> bool {
    matches!(c, '…' | '。' | '！' | '？' | '¡' | '¿' | '»' | '”' | '’')
}

/// Splits normalized text into alphanumeric tokens, preserving order and duplicates.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct tokens with stop words removed, in a deterministic order.
pub fn content_tokens(text: &str) -> BTreeSet<String> {
    tokens(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Term-frequency map over content tokens.
pub fn term_frequencies(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for token in tokens(text).into_iter().filter(|w| !is_stop_word(w)) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Jaccard similarity of two token sets. Two empty sets score `0.0`.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
