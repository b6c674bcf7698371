//! Substitution table compilation.
//!
//! This is the static side of the rewrite engine: the caller-authored
//! [`SubstitutionTable`] is compiled once into a [`CompiledTable`] whose
//! entries carry a precomputed displacement plan, and every rewrite run
//! shares it read-only. Lookup is by exact canonical signature text.
//!
//! ## Invariants
//!
//! - Source signatures are unique; inserting a duplicate replaces the entry.
//! - `CompiledSubstitution::plan` has one element per target-RHS symbol and
//!   every `Copy` index is a valid source-RHS position.

use super::displace::{Displacement, Slot};
use crate::grammar::Signature;
use std::collections::HashMap;

bitflags::bitflags! {
    /// Conditions surfaced by a rewrite run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Warnings: u8 {
        /// A matched node had fewer right siblings than its source RHS
        /// requires; the match was skipped instead of dropping content.
        const TRUNCATED_SPAN = 1 << 0;
        /// A fired entry has duplicate symbols in its source RHS; target
        /// references resolve to the first occurrence only.
        const DUPLICATE_SOURCE_SYMBOL = 1 << 1;
    }
}

/// Mapping from source rule signature to target rule signature.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    entries: Vec<(Signature, Signature)>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a substitution. A duplicate source signature replaces the
    /// earlier target, keeping keys unique.
    pub fn insert(&mut self, src: Signature, tgt: Signature) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.0 == src) {
            entry.1 = tgt;
        } else {
            self.entries.push((src, tgt));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Signature, Signature)] {
        &self.entries
    }
}

/// Target order resolved against the fresh-word list, so a match replays
/// without re-deriving anything.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SlotPlan {
    Copy(usize),
    Fresh(String),
}

/// One compiled substitution: signatures, replay plan, and the static
/// conditions OR-ed into the outcome whenever it fires.
#[derive(Debug, Clone)]
pub(crate) struct CompiledSubstitution {
    pub src: Signature,
    pub tgt: Signature,
    pub plan: Vec<SlotPlan>,
    pub flags: Warnings,
}

/// Pre-compiled substitution table.
#[derive(Debug, Clone)]
pub(crate) struct CompiledTable {
    entries: Vec<CompiledSubstitution>,
    by_key: HashMap<String, usize>,
}

impl CompiledTable {
    pub fn new(table: &SubstitutionTable) -> Self {
        let mut entries = Vec::with_capacity(table.len());
        let mut by_key = HashMap::with_capacity(table.len());

        for (src, tgt) in table.entries() {
            let displacement = Displacement::between(src, tgt);
            let mut fresh = displacement.fresh_words.iter();
            let plan = displacement
                .slots
                .iter()
                .map(|slot| match slot {
                    Slot::Copy(index) => SlotPlan::Copy(*index),
                    Slot::Insert => SlotPlan::Fresh(fresh.next().cloned().unwrap_or_default()),
                })
                .collect();

            let mut flags = Warnings::empty();
            if has_duplicate_symbols(src.rhs()) {
                flags |= Warnings::DUPLICATE_SOURCE_SYMBOL;
            }

            by_key.insert(src.key(), entries.len());
            entries.push(CompiledSubstitution { src: src.clone(), tgt: tgt.clone(), plan, flags });
        }

        CompiledTable { entries, by_key }
    }

    /// Exact-text lookup against a local signature key.
    pub fn lookup(&self, key: &str) -> Option<&CompiledSubstitution> {
        self.by_key.get(key).map(|&index| &self.entries[index])
    }
}

fn has_duplicate_symbols(rhs: &[String]) -> bool {
    rhs.iter().enumerate().any(|(i, symbol)| rhs[..i].contains(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_plans_and_indexes_by_key() {
        let table = subst_table! {
            "NP1 -> JJ NN" => "NP1 -> NN JJ",
            "VP -> VB" => "VP -> VB AUX",
        };
        let compiled = CompiledTable::new(&table);

        let swap = compiled.lookup("NP1 -> JJ NN").unwrap();
        assert_eq!(swap.plan, vec![SlotPlan::Copy(1), SlotPlan::Copy(0)]);
        assert!(swap.flags.is_empty());

        let insert = compiled.lookup("VP -> VB").unwrap();
        assert_eq!(insert.plan, vec![SlotPlan::Copy(0), SlotPlan::Fresh("AUX".to_string())]);
    }

    #[test]
    fn lookup_is_exact_text_only() {
        let table = subst_table! { "NP1 -> JJ NN" => "NP1 -> NN JJ" };
        let compiled = CompiledTable::new(&table);
        assert!(compiled.lookup("NP1 -> JJ NN").is_some());
        assert!(compiled.lookup("NP1 -> JJ").is_none());
        assert!(compiled.lookup("NP -> JJ NN").is_none());
    }

    #[test]
    fn duplicate_keys_keep_the_last_target() {
        let mut table = SubstitutionTable::new();
        table.insert("A -> X Y".parse().unwrap(), "A -> Y X".parse().unwrap());
        table.insert("A -> X Y".parse().unwrap(), "A -> X Y Z".parse().unwrap());
        assert_eq!(table.len(), 1);

        let compiled = CompiledTable::new(&table);
        assert_eq!(compiled.lookup("A -> X Y").unwrap().tgt.key(), "A -> X Y Z");
    }

    #[test]
    fn duplicate_source_symbols_are_flagged() {
        let table = subst_table! { "X -> A A" => "X -> A" };
        let compiled = CompiledTable::new(&table);
        let entry = compiled.lookup("X -> A A").unwrap();
        assert!(entry.flags.contains(Warnings::DUPLICATE_SOURCE_SYMBOL));
    }
}
