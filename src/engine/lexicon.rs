//! Tag-scoped lexical translation.
//!
//! After rewriting, a tree's leaves are still source-language words; this
//! stage renders them into the target language. Lookup is two-level and
//! forgiving: an unseen tag behaves as an empty mapping, an unseen word
//! passes through unchanged (out-of-vocabulary is graceful degradation, not
//! an error). Ambiguous entries carry a candidate set and one candidate is
//! chosen uniformly per occurrence via the injected [`SimpleRng`].

use super::rng::SimpleRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One dictionary entry: a single target word, or a candidate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordChoice {
    One(String),
    Any(Vec<String>),
}

/// POS tag → (source word → target choice).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDictionary {
    tags: HashMap<String, HashMap<String, WordChoice>>,
}

impl TagDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: &str, word: &str, choice: WordChoice) {
        self.tags.entry(tag.to_string()).or_default().insert(word.to_string(), choice);
    }

    pub fn lookup(&self, tag: &str, word: &str) -> Option<&WordChoice> {
        self.tags.get(tag)?.get(word)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Render `(word, tag)` pairs into the target surface string, words joined
/// by single spaces. An empty candidate set falls back to the source word.
pub(crate) fn render(
    tagged: &[(&str, &str)],
    dict: &TagDictionary,
    rng: &mut SimpleRng,
) -> String {
    let mut words = Vec::with_capacity(tagged.len());
    for (word, tag) in tagged {
        match dict.lookup(tag, word) {
            Some(WordChoice::One(target)) => words.push(target.clone()),
            Some(WordChoice::Any(candidates)) if !candidates.is_empty() => {
                words.push(candidates[rng.next_index(candidates.len())].clone());
            }
            _ => words.push((*word).to_string()),
        }
    }
    words.join(" ")
}
