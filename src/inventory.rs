//! Word-tag inventory building.
//!
//! The diagnostic sibling of translation: parse a batch of sentences with
//! the grammar alone and report which words occur under which POS tags,
//! which sentences fail to parse, and which parse ambiguously. Useful for
//! auditing dictionary coverage before authoring one; the substitution table
//! and dictionary play no part here.
//!
//! Unlike `translate`, this path never aborts: failed sentences are listed
//! and skipped, ambiguous sentences are recorded with their full tree sets
//! and every one of those trees still feeds the inventory.

use crate::chart;
use crate::grammar::Grammar;
use crate::tree::SyntaxTree;
use std::collections::{BTreeMap, BTreeSet};

/// A sentence with more than one parse, kept with every tree.
#[derive(Debug, Clone)]
pub struct AmbiguousSentence {
    pub sentence: String,
    pub trees: Vec<SyntaxTree>,
}

/// Batch-wide tag → word-set inventory plus failure/ambiguity reports.
#[derive(Debug, Clone, Default)]
pub struct WordInventory {
    /// Distinct words seen under each tag, across every parse of every
    /// sentence. BTree containers keep report output deterministic.
    pub tag_words: BTreeMap<String, BTreeSet<String>>,
    /// Sentences with zero parses.
    pub failed: Vec<String>,
    /// Sentences with more than one parse.
    pub ambiguous: Vec<AmbiguousSentence>,
}

pub(crate) fn build<S: AsRef<str>>(grammar: &Grammar, sentences: &[S]) -> WordInventory {
    let mut inventory = WordInventory::default();

    for raw in sentences {
        let sentence = raw.as_ref().trim();
        let tokens: Vec<&str> = sentence.split_whitespace().collect();

        // A blown-up chart reads as a failed sentence here; the diagnostic
        // path never aborts the batch.
        let trees = match chart::parse(grammar, &tokens) {
            Ok(trees) => trees,
            Err(_) => {
                inventory.failed.push(sentence.to_string());
                continue;
            }
        };
        if trees.is_empty() {
            inventory.failed.push(sentence.to_string());
            continue;
        }

        for tree in &trees {
            for node in tree.preterminals() {
                let tag = tree.label(node);
                let word = tree.children(node).first().and_then(|&leaf| tree.leaf_text(leaf));
                if let (Some(tag), Some(word)) = (tag, word) {
                    inventory
                        .tag_words
                        .entry(tag.to_string())
                        .or_default()
                        .insert(word.to_string());
                }
            }
        }

        if trees.len() > 1 {
            inventory.ambiguous.push(AmbiguousSentence { sentence: sentence.to_string(), trees });
        }
    }

    inventory
}
