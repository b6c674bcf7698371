//! Earley chart parsing.
//!
//! Supplies parse trees for a tokenized sentence under a [`Grammar`]. The
//! contract the rest of the crate relies on:
//!
//! - zero trees means the input is ungrammatical;
//! - more than one tree means genuine structural ambiguity, and *every*
//!   distinct tree is returned (the multi-parse orchestrator ranks them by
//!   substitution count, so losing a derivation loses a candidate);
//! - every returned tree's leaves equal the input tokens in order, and every
//!   internal label is a grammar non-terminal.
//!
//! The classic three operations drive the chart:
//!
//! ```text
//! predict:  A -> • B γ      adds  B -> • δ        (same position)
//! scan:     A -> α • 't' γ  adds  A -> α 't' • γ  (next position, token == 't')
//! complete: B -> δ •        adds  A -> α B • γ    (for items waiting on B)
//! ```
//!
//! Items carry their back-pointers, and deduplication compares them too:
//! two items over the same span with different derivations both survive,
//! which is what turns an ambiguous chart into multiple trees. A per-position
//! item cap keeps pathological grammars from growing the chart without bound;
//! hitting it is an explicit error, never a silent truncation.

use crate::grammar::{Grammar, Symbol};
use crate::tree::{NodeId, SyntaxTree};
use std::collections::HashSet;
use std::fmt;

/// Upper bound on items per chart position. Generous for hand-authored
/// translation grammars; only combinatorial blow-ups get near it.
const MAX_ITEMS_PER_SET: usize = 4096;

/// The chart outgrew [`MAX_ITEMS_PER_SET`] at one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOverflow {
    /// Token position whose item set overflowed.
    pub position: usize,
}

impl std::error::Error for ChartOverflow {}

impl fmt::Display for ChartOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse chart overflow at token position {}", self.position)
    }
}

/// A back-pointer in the derivation of an item.
#[derive(Debug, Clone, PartialEq)]
enum BackPointer {
    /// A completed non-terminal with its own derivation.
    Completed { production: usize, completions: Vec<BackPointer> },
    /// A scanned terminal token.
    Scanned { token: String },
}

/// A dotted production with origin position and the derivation so far.
#[derive(Debug, Clone, PartialEq)]
struct Item {
    /// Index into the grammar's production list.
    production: usize,
    /// Dot position within the RHS (0 = start, len = complete).
    dot: usize,
    /// Chart position where this item started.
    origin: usize,
    /// One back-pointer per consumed RHS symbol.
    completions: Vec<BackPointer>,
}

impl Item {
    fn new(production: usize, dot: usize, origin: usize) -> Self {
        Item { production, dot, origin, completions: Vec::new() }
    }

    fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= grammar.productions()[self.production].rhs.len()
    }

    fn next_symbol<'a>(&self, grammar: &'a Grammar) -> Option<&'a Symbol> {
        grammar.productions()[self.production].rhs.get(self.dot)
    }
}

/// Parse `tokens` and return every distinct parse tree.
///
/// Empty input parses to zero trees.
pub fn parse(grammar: &Grammar, tokens: &[&str]) -> Result<Vec<SyntaxTree>, ChartOverflow> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let n = tokens.len();
    let mut chart: Vec<Vec<Item>> = vec![Vec::new(); n + 1];

    // Seed with every production of the start symbol.
    for (idx, production) in grammar.productions().iter().enumerate() {
        if production.lhs == grammar.start() {
            chart[0].push(Item::new(idx, 0, 0));
        }
    }

    for i in 0..=n {
        let mut j = 0;
        while j < chart[i].len() {
            let item = chart[i][j].clone();

            if item.is_complete(grammar) {
                complete(grammar, &mut chart, &item, i)?;
            } else {
                match item.next_symbol(grammar) {
                    Some(Symbol::NonTerminal(nt)) => predict(grammar, &mut chart, nt, i)?,
                    Some(Symbol::Terminal(literal)) => {
                        if i < n && tokens[i] == literal {
                            scan(&mut chart, &item, i, tokens[i])?;
                        }
                    }
                    None => {}
                }
            }
            j += 1;
        }
    }

    // Completed start items spanning the whole input, one tree per distinct
    // derivation; identical shapes reached through different item paths
    // collapse via the bracketed form.
    let mut trees = Vec::new();
    let mut seen = HashSet::new();
    for item in &chart[n] {
        if item.is_complete(grammar)
            && item.origin == 0
            && grammar.productions()[item.production].lhs == grammar.start()
        {
            let tree = build_tree(grammar, item);
            if seen.insert(tree.to_string()) {
                trees.push(tree);
            }
        }
    }

    if crate::debug_rules() {
        eprintln!("[chart] tokens={n} items={} trees={}", chart.iter().map(Vec::len).sum::<usize>(), trees.len());
    }

    Ok(trees)
}

fn push_item(chart: &mut [Vec<Item>], pos: usize, item: Item) -> Result<(), ChartOverflow> {
    if chart[pos].contains(&item) {
        return Ok(());
    }
    if chart[pos].len() >= MAX_ITEMS_PER_SET {
        return Err(ChartOverflow { position: pos });
    }
    chart[pos].push(item);
    Ok(())
}

fn predict(
    grammar: &Grammar,
    chart: &mut [Vec<Item>],
    nt: &str,
    pos: usize,
) -> Result<(), ChartOverflow> {
    for (idx, production) in grammar.productions().iter().enumerate() {
        if production.lhs == nt {
            push_item(chart, pos, Item::new(idx, 0, pos))?;
        }
    }
    Ok(())
}

fn scan(
    chart: &mut [Vec<Item>],
    item: &Item,
    pos: usize,
    token: &str,
) -> Result<(), ChartOverflow> {
    let mut completions = item.completions.clone();
    completions.push(BackPointer::Scanned { token: token.to_string() });
    push_item(
        chart,
        pos + 1,
        Item { production: item.production, dot: item.dot + 1, origin: item.origin, completions },
    )
}

fn complete(
    grammar: &Grammar,
    chart: &mut [Vec<Item>],
    completed: &Item,
    end: usize,
) -> Result<(), ChartOverflow> {
    let lhs = &grammar.productions()[completed.production].lhs;
    let waiting: Vec<Item> = chart[completed.origin]
        .iter()
        .filter(|item| {
            matches!(item.next_symbol(grammar), Some(Symbol::NonTerminal(nt)) if nt == lhs)
        })
        .cloned()
        .collect();

    for item in waiting {
        let mut completions = item.completions.clone();
        completions.push(BackPointer::Completed {
            production: completed.production,
            completions: completed.completions.clone(),
        });
        push_item(
            chart,
            end,
            Item {
                production: item.production,
                dot: item.dot + 1,
                origin: item.origin,
                completions,
            },
        )?;
    }
    Ok(())
}

fn build_tree(grammar: &Grammar, item: &Item) -> SyntaxTree {
    let production = &grammar.productions()[item.production];
    let mut tree = SyntaxTree::new(production.lhs.clone());
    let root = tree.root();
    attach(grammar, &mut tree, root, &item.completions);
    tree
}

fn attach(grammar: &Grammar, tree: &mut SyntaxTree, parent: NodeId, completions: &[BackPointer]) {
    for bp in completions {
        match bp {
            BackPointer::Scanned { token } => {
                tree.add_leaf(parent, token.clone());
            }
            BackPointer::Completed { production, completions } => {
                let child =
                    tree.add_internal(parent, grammar.productions()[*production].lhs.clone());
                attach(grammar, tree, child, completions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_grammar() -> Grammar {
        Grammar::parse(
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
        .unwrap()
    }

    #[test]
    fn parses_a_simple_sentence() {
        let grammar = toy_grammar();
        let tokens = ["I", "go", "to", "a", "good", "school"];
        let trees = parse(&grammar, &tokens).unwrap();

        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].leaves(), tokens);
        assert_eq!(
            trees[0].to_string(),
            "(S (NP (PRP I)) (VP (VB go) (PP (PB to) (NP (CD a) (NP1 (JJ good) (NN school))))))"
        );
    }

    #[test]
    fn ungrammatical_input_yields_no_trees() {
        let grammar = toy_grammar();
        assert!(parse(&grammar, &["school", "go", "I"]).unwrap().is_empty());
        assert!(parse(&grammar, &["totally", "unknown"]).unwrap().is_empty());
    }

    #[test]
    fn empty_input_yields_no_trees() {
        let grammar = toy_grammar();
        assert!(parse(&grammar, &[]).unwrap().is_empty());
    }

    #[test]
    fn partial_sentence_yields_no_trees() {
        // A bare NP is not a complete S.
        let grammar = toy_grammar();
        assert!(parse(&grammar, &["I"]).unwrap().is_empty());
    }

    #[test]
    fn ambiguous_grammar_yields_every_parse() {
        let grammar = Grammar::parse("S -> S S | 'a'").unwrap();
        let trees = parse(&grammar, &["a", "a", "a"]).unwrap();

        // Two bracketings: ((a a) a) and (a (a a)).
        assert_eq!(trees.len(), 2);
        for tree in &trees {
            assert_eq!(tree.leaves(), vec!["a", "a", "a"]);
        }
        let shapes: HashSet<String> = trees.iter().map(|t| t.to_string()).collect();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn leaves_always_equal_the_input_tokens() {
        let grammar = Grammar::parse("S -> A B\nA -> 'x'\nB -> 'y' | A 'z'").unwrap();
        for tokens in [vec!["x", "y"], vec!["x", "x", "z"]] {
            let trees = parse(&grammar, &tokens).unwrap();
            assert!(!trees.is_empty());
            for tree in &trees {
                assert_eq!(tree.leaves(), tokens);
            }
        }
    }
}
