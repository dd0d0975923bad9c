//! Parsing of transition listings.
//!
//! The textual format describes one transition per line as `from symbol to`, where both
//! states are nonnegative integers and the symbol is a single character:
//!
//! ```text
//! 0 a 1
//! 0 b 0
//! 1 a 0
//! 1 b 1
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The automaton has the states
//! `0..=max` for the highest id mentioned on any line, and its alphabet consists of the
//! mentioned symbols in sorted order. Start and accepting states are not part of the
//! format; they are set on the returned [DfaBuilder] before building.

use std::error::Error;
use std::fmt::Display;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::alphabet::Alphabet;
use crate::dfa::{DfaBuilder, StateId};

/// Errors raised while parsing a transition listing. Lines are counted from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not consist of exactly three whitespace-separated fields.
    Malformed(usize),
    /// A state field is not a nonnegative integer below `usize::MAX`.
    InvalidState(usize),
    /// The symbol field is not a single character.
    InvalidSymbol(usize),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Malformed(line) => {
                write!(f, "line {}: expected `from symbol to`", line)
            }
            ParseError::InvalidState(line) => {
                write!(f, "line {}: state must be a nonnegative integer", line)
            }
            ParseError::InvalidSymbol(line) => {
                write!(f, "line {}: symbol must be a single character", line)
            }
        }
    }
}

impl Error for ParseError {}

/// Parses a transition listing into a [DfaBuilder].
///
/// The input is read twice: the first pass collects the transition triples, the highest
/// state id, and the set of symbols; the second pass fills the transition table of a
/// builder sized accordingly. Redefining a cell keeps the later definition, like
/// [DfaBuilder::add_transition] does. An empty listing yields a builder with zero states,
/// which [DfaBuilder::build] rejects.
///
/// # Example
/// ```
/// use dfa_min::parse;
///
/// let input = "\
/// ## even number of a's
/// 0 a 1
/// 0 b 0
/// 1 a 0
/// 1 b 1";
///
/// let mut builder = parse::transitions(input).unwrap();
/// builder.set_start(0).unwrap();
/// builder.add_accepting(0).unwrap();
/// let dfa = builder.build().unwrap();
/// assert!(dfa.accepts("aba"));
/// assert!(!dfa.accepts("ab"));
/// ```
pub fn transitions(input: &str) -> Result<DfaBuilder, ParseError> {
    let mut triples: Vec<(StateId, char, StateId)> = Vec::new();
    let mut symbols: IndexSet<char> = IndexSet::new();
    let mut max_state: Option<StateId> = None;

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = i + 1;
        let mut fields = line.split_whitespace();
        let (from, symbol, to) = match (fields.next(), fields.next(), fields.next(), fields.next())
        {
            (Some(from), Some(symbol), Some(to), None) => (from, symbol, to),
            _ => return Err(ParseError::Malformed(lineno)),
        };

        let from = state_id(from, lineno)?;
        let to = state_id(to, lineno)?;
        let mut chars = symbol.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(ParseError::InvalidSymbol(lineno)),
        };

        symbols.insert(symbol);
        let high = from.max(to);
        max_state = Some(max_state.map_or(high, |m| m.max(high)));
        triples.push((from, symbol, to));
    }

    let num_states = max_state.map_or(0, |m| m + 1);
    // Sorting makes the column order independent of the order transitions appear in.
    // Safe to unwrap because the symbols come from a set.
    let alphabet = Alphabet::new(symbols.into_iter().sorted()).unwrap();

    let mut builder = DfaBuilder::new(num_states, alphabet);
    for (from, symbol, to) in triples {
        // Safe to unwrap because ids and symbols were collected in the first pass.
        builder.add_transition(from, symbol, to).unwrap();
    }
    Ok(builder)
}

/// Parses a state field into an id. The id must leave room for the inferred state count
/// `max + 1`, so `usize::MAX` itself is rejected.
fn state_id(field: &str, lineno: usize) -> Result<StateId, ParseError> {
    match field.parse() {
        Ok(id) if id < StateId::MAX => Ok(id),
        _ => Err(ParseError::InvalidState(lineno)),
    }
}
