//! Engine run metrics.
//!
//! Small opt-in structs for observing what a rewrite run did. The hot path
//! only counts and timestamps; nothing here allocates per node.

use std::time::Duration;

/// Accounting for a single full-tree pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Substitutions applied during the pass.
    pub substitutions: usize,
}

/// Timings for one tree rewritten to a fixed point.
#[derive(Debug, Default, Clone)]
pub struct RewriteMetrics {
    /// Total elapsed time across all passes.
    pub total: Duration,
    /// One entry per pass. The last entry is always the empty pass that
    /// proved the fixed point.
    pub passes: Vec<PassMetrics>,
}

/// Per-sentence stage timings for a verbose translation run.
#[derive(Debug, Default, Clone)]
pub struct SentenceMetrics {
    /// Time spent chart-parsing the sentence.
    pub parse: Duration,
    /// Time spent rewriting all of its trees.
    pub rewrite: Duration,
    /// Time spent in lexical rendering.
    pub render: Duration,
}
