//! Displacement between a source and a target rule signature.
//!
//! A displacement says, for every position of the target RHS, where that
//! child comes from: an index into the matched source RHS (the whole subtree
//! is reused) or an insertion of a fresh word. It is computed once per table
//! entry at compile time and replayed by the rewrite engine on every match.

use crate::grammar::Signature;

/// One target-RHS position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Reuse the source child at this 0-based index.
    Copy(usize),
    /// Insert a fresh leaf; fresh words are consumed left to right.
    Insert,
}

/// Index/insertion mapping between a matched source rule and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    /// One entry per target-RHS symbol, in target order.
    pub slots: Vec<Slot>,
    /// Words for [`Slot::Insert`] positions, consumed left to right.
    pub fresh_words: Vec<String>,
}

impl Displacement {
    /// Compute the mapping from `src` to `tgt`.
    ///
    /// Each target symbol resolves to its *first* occurrence in the source
    /// RHS — duplicate source symbols always map to the first match, a known
    /// limitation surfaced as a table warning. A symbol absent from the
    /// source becomes an insertion. Symbols compare by exact text.
    pub fn between(src: &Signature, tgt: &Signature) -> Self {
        let mut slots = Vec::with_capacity(tgt.rhs().len());
        let mut fresh_words = Vec::new();
        for symbol in tgt.rhs() {
            match src.rhs().iter().position(|s| s == symbol) {
                Some(index) => slots.push(Slot::Copy(index)),
                None => {
                    slots.push(Slot::Insert);
                    fresh_words.push(symbol.clone());
                }
            }
        }
        Displacement { slots, fresh_words }
    }

    /// True when the mapping keeps every source child in place.
    pub fn is_identity(&self, src_len: usize) -> bool {
        self.fresh_words.is_empty()
            && self.slots.len() == src_len
            && self.slots.iter().enumerate().all(|(i, slot)| *slot == Slot::Copy(i))
    }
}
