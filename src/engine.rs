//! Tree-rewriting and rendering engine.
//!
//! This module is the entry point for the structural half of translation.
//! The engine is split into focused submodules under `src/engine/` while
//! keeping stable crate paths (for example `crate::engine::saturate` and
//! `crate::engine::SubstitutionTable`).
//!
//! ## How the parts work together
//!
//! Translating one parse tree is a pipeline:
//!
//! ```text
//! substitution table ──┐
//!                      │  CompiledTable::new            (table.rs)
//!                      │    - displacement per entry    (displace.rs)
//!                      └───────────────┬───────────────
//!                                      │
//! parse tree (chart.rs) ──── saturate ─┴─ (rewrite.rs)
//!                              - full-tree passes
//!                              - iterate to fixpoint
//!                              - count substitutions
//!                                      │
//!                                      v
//!                        tagged leaves ── render (lexicon.rs)
//!                              - tag-scoped lookup
//!                              - seeded choice (rng.rs)
//!                                      │
//!                                      v
//!                            target surface string
//! ```
//!
//! ## Responsibilities by module
//!
//! - `displace.rs`: index/insertion mapping between a source and target rule.
//! - `table.rs`: compiles the caller's table once; exact-key lookup plus the
//!   `Warnings` mask.
//! - `rewrite.rs`: saturation to a fixed point, with a pass cap instead of
//!   non-termination on cyclic tables.
//! - `lexicon.rs`: tag-scoped lexical substitution with pass-through OOV.
//! - `rng.rs`: seeded splitmix64 source for ambiguous word choice.
//! - `metrics.rs`: opt-in timing/accounting data for runs and passes.
//!
//! ## Debugging
//!
//! Set `TRADUKO_DEBUG_RULES=1` to print match and chart traces.

#[path = "engine/displace.rs"]
mod displace;
#[path = "engine/lexicon.rs"]
mod lexicon;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rewrite.rs"]
mod rewrite;
#[path = "engine/rng.rs"]
mod rng;
#[path = "engine/table.rs"]
mod table;


pub use displace::{Displacement, Slot};
pub use lexicon::{TagDictionary, WordChoice};
pub use metrics::{PassMetrics, RewriteMetrics, SentenceMetrics};
pub use rewrite::{RewriteError, RewriteOutcome};
pub use rng::SimpleRng;
pub use table::{SubstitutionTable, Warnings};

pub(crate) use lexicon::render;
pub(crate) use rewrite::saturate;
pub(crate) use table::CompiledTable;
