extern crate self as traduko;

#[macro_use]
mod macros;
mod api;
mod chart;
mod engine;
mod grammar;
mod inventory;
mod tree;

pub use api::{
    AmbiguityRecord, Candidate, CandidateMap, Options, SentenceTrace, TranslateDetails,
    TranslateError, Translation, TranslationVerbose, Translator,
};
pub use engine::{
    Displacement, PassMetrics, RewriteError, RewriteMetrics, RewriteOutcome, SentenceMetrics,
    SimpleRng, Slot, SubstitutionTable, TagDictionary, Warnings, WordChoice,
};
pub use grammar::{Grammar, GrammarError, Production, Signature, SignatureError, Symbol};
pub use inventory::{AmbiguousSentence, WordInventory};
pub use tree::{NodeId, SyntaxTree};

// --- Shared internals --------------------------------------------------------

/// Tag carried by leaves a rewrite inserts (a target-RHS symbol with no
/// source counterpart). Lexical lookup for such leaves happens under this tag.
pub const NEW_TAG: &str = "NEW";

/// Set `TRADUKO_DEBUG_RULES=1` to print match and resolution traces.
pub(crate) fn debug_rules() -> bool {
    std::env::var_os("TRADUKO_DEBUG_RULES").is_some()
}
