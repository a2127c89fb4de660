use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::stopwords::is_stopword;
use crate::tokenize::tokenize;

/// Maximum number of entries the word-frequency endpoint reports.
pub const TOP_WORDS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: u32,
}

/// Lowercased, purely alphabetic, non-stopword tokens in document order.
pub fn content_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    tokenize(&lowered)
        .filter(|token| token.chars().all(char::is_alphabetic))
        .filter(|token| !is_stopword(token))
        .map(str::to_owned)
        .collect()
}

/// Counts content words and returns the `limit` most frequent, highest first.
///
/// Words with equal counts keep the order in which they were first seen.
pub fn top_words(text: &str, limit: usize) -> Vec<WordFrequency> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<WordFrequency> = Vec::new();

    for word in content_words(text) {
        match slots.get(&word) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(word.clone(), counts.len());
                counts.push(WordFrequency { word, count: 1 });
            }
        }
    }

    // sort_by is stable: ties stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
