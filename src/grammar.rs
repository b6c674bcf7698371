//! Grammar text parsing and rule signatures.
//!
//! The grammar format is line-oriented:
//!
//! ```text
//! S -> NP VP
//! NP -> PRP | CD NP1
//! PRP -> 'I'
//! ```
//!
//! One production per line, alternatives separated by `|`, terminals quoted
//! (a quoted terminal may contain spaces: `'New York'`). Blank lines and
//! `#` comments are ignored. The start symbol is the left-hand side of the
//! first production.
//!
//! [`Signature`] is the canonical one-line rule text (`LHS -> SYM_1 … SYM_n`)
//! used both as the substitution-table key and as the local pattern computed
//! from a tree node during rewriting. Keys compare by exact text; there is no
//! fuzzy matching.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A symbol on the right-hand side of a production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// References other productions by label.
    NonTerminal(String),
    /// Matches one input token literally.
    Terminal(String),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerminal(name) | Symbol::Terminal(name) => name,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::NonTerminal(name) => write!(f, "{name}"),
            Symbol::Terminal(name) => write!(f, "'{name}'"),
        }
    }
}

/// A production rule: LHS -> RHS_1 RHS_2 … RHS_n.
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    pub lhs: String,
    pub rhs: Vec<Symbol>,
}

/// A context-free grammar: productions plus a start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    start: String,
    nonterminals: HashSet<String>,
}

impl Grammar {
    /// Parse grammar text. Fails on the first malformed line.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let mut productions = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((lhs, rhs_text)) = line.split_once("->") else {
                return Err(GrammarError::MissingArrow { line: line_no, text: line.to_string() });
            };
            let lhs = lhs.trim();
            if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
                return Err(GrammarError::BadLhs { line: line_no, text: line.to_string() });
            }

            for alternative in rhs_text.split('|') {
                let rhs = parse_symbols(alternative, line_no)?;
                if rhs.is_empty() {
                    return Err(GrammarError::EmptyAlternative {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                productions.push(Production { lhs: lhs.to_string(), rhs });
            }
        }

        if productions.is_empty() {
            return Err(GrammarError::Empty);
        }

        let start = productions[0].lhs.clone();
        let nonterminals = productions.iter().map(|p| p.lhs.clone()).collect();
        Ok(Grammar { productions, start, nonterminals })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn is_nonterminal(&self, label: &str) -> bool {
        self.nonterminals.contains(label)
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grammar::parse(s)
    }
}

/// Tokenize one RHS alternative. Quoted terminals may contain spaces, so a
/// plain whitespace split is not enough.
fn parse_symbols(alternative: &str, line: usize) -> Result<Vec<Symbol>, GrammarError> {
    let mut symbols = Vec::new();
    for item in regex!(r"'[^']*'|\S+").find_iter(alternative) {
        let token = item.as_str();
        if let Some(inner) = token.strip_prefix('\'') {
            let Some(word) = inner.strip_suffix('\'') else {
                return Err(GrammarError::UnbalancedQuote { line, text: token.to_string() });
            };
            symbols.push(Symbol::Terminal(word.to_string()));
        } else if token.contains('\'') {
            return Err(GrammarError::UnbalancedQuote { line, text: token.to_string() });
        } else {
            symbols.push(Symbol::NonTerminal(token.to_string()));
        }
    }
    Ok(symbols)
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    Empty,
    MissingArrow { line: usize, text: String },
    BadLhs { line: usize, text: String },
    EmptyAlternative { line: usize, text: String },
    UnbalancedQuote { line: usize, text: String },
}

impl std::error::Error for GrammarError {}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Empty => write!(f, "grammar has no productions"),
            GrammarError::MissingArrow { line, text } => {
                write!(f, "line {line}: missing '->' in '{text}'")
            }
            GrammarError::BadLhs { line, text } => {
                write!(f, "line {line}: left-hand side must be one symbol in '{text}'")
            }
            GrammarError::EmptyAlternative { line, text } => {
                write!(f, "line {line}: empty right-hand side in '{text}'")
            }
            GrammarError::UnbalancedQuote { line, text } => {
                write!(f, "line {line}: unbalanced quote in '{text}'")
            }
        }
    }
}

// --- Rule signatures ---------------------------------------------------------

/// Canonical rule text: `LHS -> SYM_1 SYM_2 … SYM_n`.
///
/// Built during rewriting from a node's parent label plus the labels of the
/// node and all its right siblings (left-most children only), and parsed from
/// substitution-table keys. The two meet on [`Signature::key`], which is the
/// exact comparison text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    lhs: String,
    rhs: Vec<String>,
}

impl Signature {
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> Self {
        Signature { lhs: lhs.into(), rhs }
    }

    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    pub fn rhs(&self) -> &[String] {
        &self.rhs
    }

    /// Canonical key text, e.g. `"NP1 -> JJ NN"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for symbol in &self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lhs, rhs_text)) = s.split_once("->") else {
            return Err(SignatureError::MissingArrow(s.to_string()));
        };
        let lhs = lhs.trim();
        if lhs.is_empty() || lhs.split_whitespace().count() != 1 {
            return Err(SignatureError::BadLhs(s.to_string()));
        }
        let rhs: Vec<String> = rhs_text.split_whitespace().map(str::to_string).collect();
        if rhs.is_empty() {
            return Err(SignatureError::EmptyRhs(s.to_string()));
        }
        Ok(Signature { lhs: lhs.to_string(), rhs })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignatureError {
    MissingArrow(String),
    BadLhs(String),
    EmptyRhs(String),
}

impl std::error::Error for SignatureError {}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::MissingArrow(text) => write!(f, "missing '->' in rule '{text}'"),
            SignatureError::BadLhs(text) => {
                write!(f, "left-hand side must be one symbol in rule '{text}'")
            }
            SignatureError::EmptyRhs(text) => write!(f, "empty right-hand side in rule '{text}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_productions_and_alternatives() {
        let grammar = Grammar::parse(
            "# toy grammar
             S -> NP VP
             NP -> PRP | CD NP1

             PRP -> 'I'",
        )
        .unwrap();

        assert_eq!(grammar.start(), "S");
        assert_eq!(grammar.productions().len(), 4);
        assert!(grammar.is_nonterminal("NP"));
        assert!(!grammar.is_nonterminal("CD"));

        let prp = &grammar.productions()[3];
        assert_eq!(prp.lhs, "PRP");
        assert_eq!(prp.rhs, vec![Symbol::Terminal("I".to_string())]);
    }

    #[test]
    fn quoted_terminal_keeps_spaces() {
        let grammar = Grammar::parse("NP -> 'New York'").unwrap();
        assert_eq!(grammar.productions()[0].rhs, vec![Symbol::Terminal("New York".to_string())]);
    }

    #[test]
    fn mixed_rhs_is_allowed() {
        let grammar = Grammar::parse("VP -> 'go' PP\nPP -> PB").unwrap();
        assert_eq!(
            grammar.productions()[0].rhs,
            vec![Symbol::Terminal("go".to_string()), Symbol::NonTerminal("PP".to_string())]
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(Grammar::parse(""), Err(GrammarError::Empty)));
        assert!(matches!(
            Grammar::parse("S NP VP"),
            Err(GrammarError::MissingArrow { line: 1, .. })
        ));
        assert!(matches!(
            Grammar::parse("S ->\nNP -> PRP"),
            Err(GrammarError::EmptyAlternative { line: 1, .. })
        ));
        assert!(matches!(
            Grammar::parse("S -> NP | "),
            Err(GrammarError::EmptyAlternative { line: 1, .. })
        ));
        assert!(matches!(
            Grammar::parse("PRP -> 'I"),
            Err(GrammarError::UnbalancedQuote { line: 1, .. })
        ));
        assert!(matches!(Grammar::parse("A B -> C"), Err(GrammarError::BadLhs { line: 1, .. })));
    }

    #[test]
    fn signature_roundtrip() {
        let sig: Signature = "NP1 -> JJ NN".parse().unwrap();
        assert_eq!(sig.lhs(), "NP1");
        assert_eq!(sig.rhs(), ["JJ".to_string(), "NN".to_string()]);
        assert_eq!(sig.key(), "NP1 -> JJ NN");
    }

    #[test]
    fn signature_normalizes_whitespace() {
        let sig: Signature = "  NP1   ->  JJ    NN ".parse().unwrap();
        assert_eq!(sig.key(), "NP1 -> JJ NN");
    }

    #[test]
    fn signature_rejects_malformed_text() {
        assert!(matches!("NP1 JJ NN".parse::<Signature>(), Err(SignatureError::MissingArrow(_))));
        assert!(matches!("NP1 ->".parse::<Signature>(), Err(SignatureError::EmptyRhs(_))));
        assert!(matches!("A B -> C".parse::<Signature>(), Err(SignatureError::BadLhs(_))));
    }
}
