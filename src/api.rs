//! Public translation API.
//!
//! [`Translator`] owns the three immutable inputs — grammar, compiled
//! substitution table, tag dictionary — and exposes the batch operations:
//! [`Translator::translate`] (with seeded and verbose variants) and
//! [`Translator::parse_words`]. Construction compiles the table once; every
//! call after that is `&self` and safe to share across threads.

use crate::chart;
use crate::engine::{
    self, CompiledTable, RewriteError, SentenceMetrics, SimpleRng, SubstitutionTable,
    TagDictionary, Warnings,
};
use crate::grammar::Grammar;
use crate::inventory::{self, WordInventory};
use std::fmt;
use std::time::{Duration, Instant};

/// Options that affect a translation call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Seed for ambiguous word choice. Same seed + same input = same output.
    pub seed: u64,
}

impl Default for Options {
    fn default() -> Self {
        if cfg!(test) {
            Options { seed: 42 }
        } else {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
                .unwrap_or(0x5eed);
            Options { seed }
        }
    }
}

/// One rendered translation and the substitution count that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub rendered: String,
    pub substitutions: usize,
}

/// Rendered candidate → structural-substitution count for one sentence.
///
/// Insertion order is preserved. Re-inserting an identical rendering
/// overwrites its count — same surface form, so keeping one entry is enough.
#[derive(Debug, Clone, Default)]
pub struct CandidateMap {
    entries: Vec<Candidate>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rendered: String, substitutions: usize) {
        if let Some(existing) = self.entries.iter_mut().find(|c| c.rendered == rendered) {
            existing.substitutions = substitutions;
        } else {
            self.entries.push(Candidate { rendered, substitutions });
        }
    }

    /// The candidate with the most substitutions. Ties break by first-seen
    /// order — an explicit policy, not container luck.
    pub fn best(&self) -> Option<&Candidate> {
        let mut best: Option<&Candidate> = None;
        for candidate in &self.entries {
            match best {
                Some(current) if candidate.substitutions <= current.substitutions => {}
                _ => best = Some(candidate),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }
}

/// A sentence whose parses rendered more than one distinct candidate.
#[derive(Debug, Clone)]
pub struct AmbiguityRecord {
    pub sentence: String,
    pub candidates: CandidateMap,
}

/// Result of a successful translation batch.
#[derive(Debug, Clone)]
pub struct Translation {
    /// One translation per input sentence, in input order.
    pub sentences: Vec<String>,
    /// Records for sentences with more than one distinct rendering.
    pub ambiguities: Vec<AmbiguityRecord>,
}

/// Errors from a translation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// One or more sentences had no parse under the grammar. Collected
    /// across the whole batch before failing; no partial output.
    ParseFailure { sentences: Vec<String> },
    /// The parse chart for `sentence` outgrew its bound.
    ChartOverflow { sentence: String },
    /// Rewriting one of `sentence`'s trees never reached a fixed point.
    NoFixedPoint { sentence: String, passes: usize },
}

impl std::error::Error for TranslateError {}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::ParseFailure { sentences } => {
                write!(f, "check the grammar: failed to parse {} sentence(s):", sentences.len())?;
                for sentence in sentences {
                    write!(f, "\n  {sentence}")?;
                }
                Ok(())
            }
            TranslateError::ChartOverflow { sentence } => {
                write!(f, "parse chart overflow on \"{sentence}\"")
            }
            TranslateError::NoFixedPoint { sentence, passes } => write!(
                f,
                "no fixed point after {passes} passes on \"{sentence}\"; \
                 the substitution table likely contains a cycle"
            ),
        }
    }
}

/// Per-sentence trace returned by [`Translator::translate_verbose_with`].
#[derive(Debug, Clone)]
pub struct SentenceTrace {
    pub sentence: String,
    /// Number of parse trees the chart produced.
    pub parses: usize,
    /// Highest pass count over this sentence's trees.
    pub passes: usize,
    /// Warnings OR-ed over this sentence's trees.
    pub warnings: Warnings,
    /// The full candidate map, in first-seen order.
    pub candidates: CandidateMap,
    /// The chosen rendering.
    pub chosen: String,
    pub metrics: SentenceMetrics,
}

/// Extra details for debugging and rule authoring; the plain
/// [`Translator::translate`] path does not allocate these.
#[derive(Debug, Clone)]
pub struct TranslateDetails {
    pub total: Duration,
    pub sentences: Vec<SentenceTrace>,
}

/// Result from [`Translator::translate_verbose_with`].
#[derive(Debug, Clone)]
pub struct TranslationVerbose {
    pub translation: Translation,
    pub details: TranslateDetails,
}

/// Rule-based translator over a fixed grammar, substitution table and tag
/// dictionary.
#[derive(Debug, Clone)]
pub struct Translator {
    grammar: Grammar,
    table: CompiledTable,
    dictionary: TagDictionary,
}

impl Translator {
    /// Construct a translator. The substitution table is compiled here
    /// (displacements precomputed per entry); all inputs are immutable from
    /// now on.
    pub fn new(grammar: Grammar, table: SubstitutionTable, dictionary: TagDictionary) -> Self {
        Translator { grammar, table: CompiledTable::new(&table), dictionary }
    }

    /// Translate a batch with default [`Options`].
    pub fn translate<S: AsRef<str>>(&self, sentences: &[S]) -> Result<Translation, TranslateError> {
        self.translate_with(sentences, &Options::default())
    }

    /// Translate a batch. Use an explicit seed in `options` for
    /// reproducible ambiguous word choice.
    pub fn translate_with<S: AsRef<str>>(
        &self,
        sentences: &[S],
        options: &Options,
    ) -> Result<Translation, TranslateError> {
        self.run(sentences, options, false).map(|verbose| verbose.translation)
    }

    /// Translate a batch and return per-sentence traces alongside.
    pub fn translate_verbose_with<S: AsRef<str>>(
        &self,
        sentences: &[S],
        options: &Options,
    ) -> Result<TranslationVerbose, TranslateError> {
        self.run(sentences, options, true)
    }

    /// Build the tag/word inventory for a batch. Uses the grammar only and
    /// never fails: unparsable sentences are listed, not fatal.
    pub fn parse_words<S: AsRef<str>>(&self, sentences: &[S]) -> WordInventory {
        inventory::build(&self.grammar, sentences)
    }

    fn run<S: AsRef<str>>(
        &self,
        sentences: &[S],
        options: &Options,
        verbose: bool,
    ) -> Result<TranslationVerbose, TranslateError> {
        let total_start = Instant::now();
        let mut rng = SimpleRng::new(options.seed);
        let mut outputs = Vec::with_capacity(sentences.len());
        let mut ambiguities = Vec::new();
        let mut failed = Vec::new();
        let mut traces = Vec::new();

        for raw in sentences {
            let sentence = raw.as_ref().trim();
            let tokens: Vec<&str> = sentence.split_whitespace().collect();

            let parse_start = Instant::now();
            let trees = chart::parse(&self.grammar, &tokens)
                .map_err(|_| TranslateError::ChartOverflow { sentence: sentence.to_string() })?;
            let parse_time = parse_start.elapsed();

            if trees.is_empty() {
                // Keep scanning; the whole batch is reported together.
                failed.push(sentence.to_string());
                continue;
            }

            let parses = trees.len();
            let mut candidates = CandidateMap::new();
            let mut passes = 0;
            let mut warnings = Warnings::empty();
            let mut rewrite_time = Duration::ZERO;
            let mut render_time = Duration::ZERO;

            for mut tree in trees {
                let rewrite_start = Instant::now();
                let outcome = engine::saturate(&mut tree, &self.table).map_err(|err| match err {
                    RewriteError::NoFixedPoint { passes } => {
                        TranslateError::NoFixedPoint { sentence: sentence.to_string(), passes }
                    }
                })?;
                rewrite_time += rewrite_start.elapsed();

                let render_start = Instant::now();
                let tagged = tree.tagged_leaves();
                let rendered = engine::render(&tagged, &self.dictionary, &mut rng);
                render_time += render_start.elapsed();

                passes = passes.max(outcome.metrics.passes.len());
                warnings |= outcome.warnings;
                candidates.insert(rendered, outcome.substitutions);
            }

            let Some(best) = candidates.best() else { continue };
            let chosen = best.rendered.clone();
            outputs.push(chosen.clone());

            if candidates.len() > 1 {
                ambiguities.push(AmbiguityRecord {
                    sentence: sentence.to_string(),
                    candidates: candidates.clone(),
                });
            }
            if verbose {
                traces.push(SentenceTrace {
                    sentence: sentence.to_string(),
                    parses,
                    passes,
                    warnings,
                    candidates,
                    chosen,
                    metrics: SentenceMetrics {
                        parse: parse_time,
                        rewrite: rewrite_time,
                        render: render_time,
                    },
                });
            }
        }

        if !failed.is_empty() {
            return Err(TranslateError::ParseFailure { sentences: failed });
        }

        Ok(TranslationVerbose {
            translation: Translation { sentences: outputs, ambiguities },
            details: TranslateDetails { total: total_start.elapsed(), sentences: traces },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_translator() -> Translator {
        let grammar = Grammar::parse(
            "S -> NP VP
             NP -> PRP
             VP -> VB PP
             PP -> PB NP
             NP -> CD NP1
             NP1 -> JJ NN
             PRP -> 'I'
             VB -> 'go'
             PB -> 'to'
             CD -> 'a'
             JJ -> 'good'
             NN -> 'school'",
        )
        .unwrap();
        let table = subst_table! { "NP1 -> JJ NN" => "NP1 -> NN JJ" };
        let dict = tag_dict! {
            "PRP" => { "I" => "toi" },
            "VB" => { "go" => "di" },
            "PB" => { "to" => "toi" },
            "CD" => { "a" => "mot" },
            "JJ" => { "good" => "tot" },
            "NN" => { "school" => "truong" }
        };
        Translator::new(grammar, table, dict)
    }

    #[test]
    fn translates_with_structure_and_words() {
        let translator = toy_translator();
        let out = translator.translate(&["I go to a good school"]).unwrap();

        assert_eq!(out.sentences, vec!["toi di toi mot truong tot".to_string()]);
        assert!(out.ambiguities.is_empty());
    }

    #[test]
    fn structural_rewrite_alone_reorders_the_source_words() {
        let translator = Translator::new(
            toy_translator().grammar.clone(),
            subst_table! { "NP1 -> JJ NN" => "NP1 -> NN JJ" },
            TagDictionary::new(),
        );
        let out = translator.translate(&["I go to a good school"]).unwrap();
        assert_eq!(out.sentences, vec!["I go to a school good".to_string()]);
    }

    #[test]
    fn batch_preserves_input_order() {
        let translator = toy_translator();
        let out = translator.translate(&["I go to a good school", "I go to a good school"]).unwrap();
        assert_eq!(out.sentences.len(), 2);
        assert_eq!(out.sentences[0], out.sentences[1]);
    }

    #[test]
    fn parse_failures_fail_together_after_the_whole_batch() {
        let translator = toy_translator();
        let err = translator
            .translate(&["I go to a good school", "school I", "also not grammatical"])
            .unwrap_err();

        assert_eq!(
            err,
            TranslateError::ParseFailure {
                sentences: vec!["school I".to_string(), "also not grammatical".to_string()],
            }
        );
    }

    #[test]
    fn whitespace_only_input_is_a_parse_failure() {
        let translator = toy_translator();
        let err = translator.translate(&["   "]).unwrap_err();
        assert!(matches!(err, TranslateError::ParseFailure { .. }));
    }

    #[test]
    fn most_substituted_parse_wins_and_the_map_is_recorded() {
        // Two parses of "p q": one through A (rewrite fires), one through B
        // (no rewrite). The A rendering must win on substitution count.
        let grammar = Grammar::parse(
            "S -> A | B
             A -> X Y
             B -> X Y
             X -> 'p'
             Y -> 'q'",
        )
        .unwrap();
        let table = subst_table! { "A -> X Y" => "A -> Y X" };
        let translator = Translator::new(grammar, table, TagDictionary::new());

        let out = translator.translate(&["p q"]).unwrap();
        assert_eq!(out.sentences, vec!["q p".to_string()]);

        assert_eq!(out.ambiguities.len(), 1);
        let record = &out.ambiguities[0];
        assert_eq!(record.sentence, "p q");
        assert_eq!(record.candidates.len(), 2);
        assert_eq!(record.candidates.best().unwrap().substitutions, 1);
    }

    #[test]
    fn identical_renderings_collapse_to_one_candidate() {
        // Both parses render the same surface string; no ambiguity record.
        let grammar = Grammar::parse(
            "S -> A | B
             A -> X Y
             B -> X Y
             X -> 'p'
             Y -> 'q'",
        )
        .unwrap();
        let translator = Translator::new(grammar, SubstitutionTable::new(), TagDictionary::new());

        let out = translator.translate(&["p q"]).unwrap();
        assert_eq!(out.sentences, vec!["p q".to_string()]);
        assert!(out.ambiguities.is_empty());
    }

    #[test]
    fn candidate_map_ties_break_by_first_seen_order() {
        let mut map = CandidateMap::new();
        map.insert("first".to_string(), 2);
        map.insert("second".to_string(), 2);
        map.insert("third".to_string(), 1);
        assert_eq!(map.best().unwrap().rendered, "first");

        // A higher count still wins regardless of order.
        map.insert("fourth".to_string(), 3);
        assert_eq!(map.best().unwrap().rendered, "fourth");
    }

    #[test]
    fn candidate_map_overwrites_duplicate_renderings() {
        let mut map = CandidateMap::new();
        map.insert("same".to_string(), 1);
        map.insert("same".to_string(), 4);
        assert_eq!(map.len(), 1);
        assert_eq!(map.best().unwrap().substitutions, 4);
    }

    #[test]
    fn seeded_ambiguous_choice_is_reproducible_and_in_set() {
        let grammar = Grammar::parse("S -> PB\nPB -> 'to'").unwrap();
        let dict = tag_dict! { "PB" => { "to" => ["toi", "den"] } };
        let translator = Translator::new(grammar, SubstitutionTable::new(), dict);

        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let options = Options { seed };
            let out = translator.translate_with(&["to"], &options).unwrap();
            let a = out.sentences[0].clone();
            let b = translator.translate_with(&["to"], &options).unwrap().sentences[0].clone();
            assert_eq!(a, b, "same seed must give the same choice");
            assert!(a == "toi" || a == "den", "choice outside the candidate set: {a}");
            seen.insert(a);
        }
        assert_eq!(seen.len(), 2, "both candidates should appear across seeds");
    }

    #[test]
    fn verbose_run_traces_each_sentence() {
        let translator = toy_translator();
        let out = translator
            .translate_verbose_with(&["I go to a good school"], &Options::default())
            .unwrap();

        assert_eq!(out.details.sentences.len(), 1);
        let trace = &out.details.sentences[0];
        assert_eq!(trace.parses, 1);
        assert_eq!(trace.chosen, out.translation.sentences[0]);
        assert_eq!(trace.candidates.len(), 1);
        // One substituting pass plus the empty fixed-point pass.
        assert_eq!(trace.passes, 2);
        assert!(trace.warnings.is_empty());
        assert!(out.details.total >= Duration::ZERO);
    }

    #[test]
    fn cyclic_table_surfaces_as_a_translate_error() {
        let grammar = Grammar::parse("S -> A B\nA -> 'a'\nB -> 'b'").unwrap();
        let table = subst_table! {
            "S -> A B" => "S -> B A",
            "S -> B A" => "S -> A B",
        };
        let translator = Translator::new(grammar, table, TagDictionary::new());

        let err = translator.translate(&["a b"]).unwrap_err();
        assert!(matches!(err, TranslateError::NoFixedPoint { .. }));
    }

    #[test]
    fn parse_words_goes_through_the_translator() {
        let translator = toy_translator();
        let inventory =
            translator.parse_words(&["I go to a good school", "school school school"]);

        assert_eq!(inventory.failed, vec!["school school school".to_string()]);
        assert!(inventory.tag_words["NN"].contains("school"));
        assert!(inventory.tag_words["PRP"].contains("I"));
    }
}
