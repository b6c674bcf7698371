//! Rule substitution to a fixed point.
//!
//! The engine leans on **saturation**: scan the whole tree for local matches
//! against the compiled table, rewrite every match, and repeat full passes
//! until one applies nothing.
//!
//! ```text
//! pass:   for each internal node (pre-order)
//!           local signature ─ exact key lookup ─┐
//!                                               ├─ match: replay the plan
//!           (skip: detached / no signature) ────┘        count it
//! repeat passes until a pass applies 0 substitutions
//! ```
//!
//! Matching is strictly local to one parent/children level; a rewrite only
//! ever touches the matched parent's child list. Reused children keep their
//! whole subtree; inserted target symbols become fresh preterminals under
//! [`crate::NEW_TAG`].
//!
//! Convergence is not guaranteed for arbitrary tables: a substitution cycle
//! (A's target matches B, whose target matches A) would iterate forever, so
//! passes are capped at [`MAX_PASSES`] and overrunning the cap is an explicit
//! [`RewriteError::NoFixedPoint`] instead of a hang. A matched span shorter
//! than the source RHS is skipped and flagged [`Warnings::TRUNCATED_SPAN`]
//! rather than silently dropping content.
//!
//! Set `TRADUKO_DEBUG_RULES=1` to print match traces.

use super::metrics::{PassMetrics, RewriteMetrics};
use super::table::{CompiledSubstitution, CompiledTable, SlotPlan, Warnings};
use crate::tree::{NodeId, SyntaxTree};
use std::fmt;
use std::time::Instant;

/// Upper bound on full-tree passes before the run is declared cyclic.
pub(crate) const MAX_PASSES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The table kept producing substitutions after [`MAX_PASSES`] passes —
    /// almost certainly a cycle in the substitution table.
    NoFixedPoint { passes: usize },
}

impl std::error::Error for RewriteError {}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::NoFixedPoint { passes } => write!(
                f,
                "no fixed point after {passes} passes; the substitution table likely contains a cycle"
            ),
        }
    }
}

/// What a rewrite run did to one tree.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Total substitutions applied across all passes.
    pub substitutions: usize,
    /// Conditions observed while rewriting.
    pub warnings: Warnings,
    /// Per-pass accounting.
    pub metrics: RewriteMetrics,
}

/// Rewrite `tree` in place until a full pass applies no substitution.
pub(crate) fn saturate(
    tree: &mut SyntaxTree,
    table: &CompiledTable,
) -> Result<RewriteOutcome, RewriteError> {
    let start = Instant::now();
    let mut metrics = RewriteMetrics::default();
    let mut warnings = Warnings::empty();
    let mut substitutions = 0;
    let debug = crate::debug_rules();

    loop {
        if metrics.passes.len() >= MAX_PASSES {
            return Err(RewriteError::NoFixedPoint { passes: MAX_PASSES });
        }

        let pass_start = Instant::now();
        let mut applied = 0;

        // Per-pass id snapshot. Nodes a rewrite creates are preterminals and
        // cannot themselves match; nodes a rewrite detaches are skipped via
        // the attachment check.
        for id in tree.internal_nodes() {
            if !tree.is_attached(id) {
                continue;
            }
            let Some(signature) = tree.local_signature(id) else { continue };
            let Some(entry) = table.lookup(&signature.key()) else { continue };
            if debug {
                eprintln!("[rewrite:match] node={id} \"{}\" => \"{}\"", entry.src, entry.tgt);
            }
            if apply(tree, id, entry, &mut warnings) {
                applied += 1;
            }
        }

        substitutions += applied;
        metrics
            .passes
            .push(PassMetrics { duration: pass_start.elapsed(), substitutions: applied });
        if applied == 0 {
            break;
        }
    }

    metrics.total = start.elapsed();
    if debug {
        eprintln!(
            "[rewrite:done] passes={} substitutions={substitutions} warnings={warnings:?}",
            metrics.passes.len()
        );
    }
    Ok(RewriteOutcome { substitutions, warnings, metrics })
}

/// Rewrite `parent`'s children per the entry's plan, one slot per source-RHS
/// symbol. Returns false when the sibling span is shorter than the source
/// RHS: the match is skipped and flagged, never applied partially.
fn apply(
    tree: &mut SyntaxTree,
    parent: NodeId,
    entry: &CompiledSubstitution,
    warnings: &mut Warnings,
) -> bool {
    let slots: Vec<NodeId> = tree.children(parent).to_vec();
    if slots.len() < entry.src.rhs().len() {
        *warnings |= Warnings::TRUNCATED_SPAN;
        if crate::debug_rules() {
            eprintln!(
                "[rewrite:truncated] node={parent} have={} need={} \"{}\"",
                slots.len(),
                entry.src.rhs().len(),
                entry.src
            );
        }
        return false;
    }
    *warnings |= entry.flags;

    let mut children = Vec::with_capacity(entry.plan.len());
    for slot in &entry.plan {
        match slot {
            SlotPlan::Copy(index) => children.push(slots[*index]),
            SlotPlan::Fresh(word) => {
                children.push(tree.add_detached_preterminal(crate::NEW_TAG, word));
            }
        }
    }
    tree.replace_children(parent, children);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (P (A a) (B b))
    fn two_child_tree() -> SyntaxTree {
        let mut tree = SyntaxTree::new("P");
        let a = tree.add_internal(tree.root(), "A");
        tree.add_leaf(a, "a");
        let b = tree.add_internal(tree.root(), "B");
        tree.add_leaf(b, "b");
        tree
    }

    #[test]
    fn short_span_is_skipped_and_flagged() {
        let table = CompiledTable::new(&subst_table! { "P -> A B" => "P -> B A" });
        let entry = table.lookup("P -> A B").unwrap();

        let mut tree = SyntaxTree::new("P");
        let a = tree.add_internal(tree.root(), "A");
        tree.add_leaf(a, "a");

        let mut warnings = Warnings::empty();
        let root = tree.root();
        assert!(!apply(&mut tree, root, entry, &mut warnings));
        assert!(warnings.contains(Warnings::TRUNCATED_SPAN));
        assert_eq!(tree.leaves(), vec!["a"]);
    }

    #[test]
    fn cyclic_table_fails_instead_of_hanging() {
        let table = CompiledTable::new(&subst_table! {
            "P -> A B" => "P -> B A",
            "P -> B A" => "P -> A B",
        });
        let mut tree = two_child_tree();
        let err = saturate(&mut tree, &table).unwrap_err();
        assert_eq!(err, RewriteError::NoFixedPoint { passes: MAX_PASSES });
    }

    #[test]
    fn self_identity_entry_is_also_a_cycle() {
        let table = CompiledTable::new(&subst_table! { "P -> A B" => "P -> A B" });
        let mut tree = two_child_tree();
        assert!(saturate(&mut tree, &table).is_err());
    }
}
