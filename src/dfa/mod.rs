#[cfg(feature = "graphviz")]
mod dot;
mod minimize;
mod partition;
mod reach;

use std::error::Error;
use std::fmt::Display;

use bit_set::BitSet;
use itertools::Itertools;
use log::warn;
use quickcheck::Arbitrary;

use crate::alphabet::Alphabet;

pub use minimize::{minimize, minimize_with, MinimizeConfig};
pub use reach::reachable;

/// Every state in an automaton is identified by a unique index.
/// Indices are dense: an automaton with `n` states uses exactly the indices `0..n`.
pub type StateId = usize;

/// Errors raised while assembling or querying a [Dfa].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DfaError {
    /// A state index is outside the declared state range.
    StateNotFound(StateId),
    /// A symbol is not part of the automaton's alphabet.
    UnknownSymbol(char),
    /// The automaton declares no states at all.
    NoStates,
    /// No start state was set.
    NoStartState,
    /// The transition function has no entry for this state and symbol.
    /// A deterministic automaton must define a successor for every pair.
    MissingTransition { state: StateId, symbol: char },
}

impl Display for DfaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DfaError::StateNotFound(q) => write!(f, "State not found: {}", q),
            DfaError::UnknownSymbol(c) => write!(f, "Symbol '{}' is not in the alphabet", c),
            DfaError::NoStates => write!(f, "Automaton has no states"),
            DfaError::NoStartState => write!(f, "Automaton has no start state"),
            DfaError::MissingTransition { state, symbol } => write!(
                f,
                "Missing transition for state {} on symbol '{}'; the transition function must be total",
                state, symbol
            ),
        }
    }
}

impl Error for DfaError {}

/// A complete deterministic finite automaton.
///
/// Every state has exactly one successor for every symbol of the alphabet. Instances are
/// assembled through a [DfaBuilder], which checks this invariant, so a constructed value
/// can be stepped without further validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    num_states: usize,
    alphabet: Alphabet,
    /// Row-major transition table. The successor of state `q` on the symbol with column
    /// index `a` is `trans[q * alphabet.len() + a]`.
    trans: Vec<StateId>,
    start: StateId,
    accepting: BitSet,
}

impl Dfa {
    /// Returns the number of states in the automaton.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the alphabet the automaton reads.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the start state of the automaton.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Returns an iterator over the states of the automaton.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        0..self.num_states
    }

    /// Returns if a state is an accepting state.
    /// Invalid indices are not considered accepting states.
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting.contains(state)
    }

    /// Returns an iterator over the accepting states in increasing order.
    pub fn accepting(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter()
    }

    /// Successor of `state` on the symbol with column index `a`.
    /// Both indices must be in range.
    pub(crate) fn step(&self, state: StateId, a: usize) -> StateId {
        self.trans[state * self.alphabet.len() + a]
    }

    /// Returns the successor of a state on the given symbol.
    /// Fails if the state index is out of range or the symbol is not in the alphabet.
    pub fn successor(&self, state: StateId, symbol: char) -> Result<StateId, DfaError> {
        if state >= self.num_states {
            return Err(DfaError::StateNotFound(state));
        }
        let a = self
            .alphabet
            .index_of(symbol)
            .ok_or(DfaError::UnknownSymbol(symbol))?;
        Ok(self.step(state, a))
    }

    /// Runs the automaton on the given word and returns the state it halts in.
    /// Returns `None` if the word contains a symbol that is not in the alphabet.
    /// The empty word halts in the start state.
    pub fn run(&self, word: &str) -> Option<StateId> {
        let mut q = self.start;
        for c in word.chars() {
            let a = self.alphabet.index_of(c)?;
            q = self.step(q, a);
        }
        Some(q)
    }

    /// Returns if the automaton accepts the given word.
    /// Words containing symbols outside the alphabet are never accepted.
    ///
    /// # Example
    /// ```
    /// use dfa_min::{Alphabet, DfaBuilder};
    ///
    /// // Accepts every word with an even number of 'a's.
    /// let mut builder = DfaBuilder::new(2, Alphabet::new(['a', 'b']).unwrap());
    /// builder.add_transition(0, 'a', 1).unwrap();
    /// builder.add_transition(0, 'b', 0).unwrap();
    /// builder.add_transition(1, 'a', 0).unwrap();
    /// builder.add_transition(1, 'b', 1).unwrap();
    /// builder.set_start(0).unwrap();
    /// builder.add_accepting(0).unwrap();
    /// let dfa = builder.build().unwrap();
    ///
    /// assert!(dfa.accepts(""));
    /// assert!(dfa.accepts("abba"));
    /// assert!(!dfa.accepts("ab"));
    /// assert!(!dfa.accepts("ax"));
    /// ```
    pub fn accepts(&self, word: &str) -> bool {
        self.run(word).is_some_and(|q| self.accepting.contains(q))
    }

    /// Returns the DOT representation of the automaton.
    /// The DOT representation can be used to visualize the automaton using Graphviz.
    #[cfg(feature = "graphviz")]
    pub fn dot(&self) -> String {
        let mut buf = Vec::new();
        ::dot::render(self, &mut buf).unwrap();
        String::from_utf8(buf).expect("Failed to convert DOT to string")
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "DFA {{")?;
        writeln!(f, "\tAlphabet: {}", self.alphabet)?;
        writeln!(f, "\tStates: {}", self.num_states)?;
        writeln!(f, "\tTransitions:")?;
        for q in self.states() {
            write!(f, "\t\t{}: ", q)?;
            for (a, sym) in self.alphabet.iter().enumerate() {
                write!(f, "{} -> {}, ", sym, self.step(q, a))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "\tStart: {}", self.start)?;
        writeln!(f, "\tAccepting: {{{}}}", self.accepting.iter().join(", "))?;
        writeln!(f, "}}")
    }
}

/// Assembles a [Dfa] with a fixed number of states over a fixed alphabet.
///
/// The builder checks every state index and symbol eagerly, so errors carry the offending
/// value. [build](DfaBuilder::build) performs the whole-automaton checks: at least one
/// state, a start state, and a transition for every state and symbol.
#[derive(Debug, Clone)]
pub struct DfaBuilder {
    num_states: usize,
    alphabet: Alphabet,
    trans: Vec<Option<StateId>>,
    start: Option<StateId>,
    accepting: BitSet,
}

impl DfaBuilder {
    /// Creates a builder for an automaton with states `0..num_states` over the given
    /// alphabet. All transitions are initially undefined.
    pub fn new(num_states: usize, alphabet: Alphabet) -> Self {
        let cells = num_states * alphabet.len();
        Self {
            num_states,
            alphabet,
            trans: vec![None; cells],
            start: None,
            accepting: BitSet::with_capacity(num_states),
        }
    }

    /// Returns the number of states of the automaton under construction.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the alphabet of the automaton under construction.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Defines the successor of `from` on `symbol`.
    /// Redefining a transition overwrites the previous successor and logs a warning.
    /// Fails if a state index is out of range or the symbol is not in the alphabet.
    pub fn add_transition(
        &mut self,
        from: StateId,
        symbol: char,
        to: StateId,
    ) -> Result<(), DfaError> {
        if from >= self.num_states {
            return Err(DfaError::StateNotFound(from));
        }
        if to >= self.num_states {
            return Err(DfaError::StateNotFound(to));
        }
        let a = self
            .alphabet
            .index_of(symbol)
            .ok_or(DfaError::UnknownSymbol(symbol))?;
        let cell = &mut self.trans[from * self.alphabet.len() + a];
        if let Some(old) = cell.replace(to) {
            if old != to {
                warn!(
                    "transition ({}, '{}') redefined: {} overwrites {}",
                    from, symbol, to, old
                );
            }
        }
        Ok(())
    }

    /// Sets the start state of the automaton.
    /// The index must be a valid state index, otherwise an error is returned.
    pub fn set_start(&mut self, state: StateId) -> Result<(), DfaError> {
        if state < self.num_states {
            self.start = Some(state);
            Ok(())
        } else {
            Err(DfaError::StateNotFound(state))
        }
    }

    /// Adds a state to the set of accepting states.
    /// The index must be a valid state index, otherwise an error is returned.
    pub fn add_accepting(&mut self, state: StateId) -> Result<(), DfaError> {
        if state < self.num_states {
            self.accepting.insert(state);
            Ok(())
        } else {
            Err(DfaError::StateNotFound(state))
        }
    }

    /// Finishes construction and checks that the automaton is well-formed.
    ///
    /// Fails with [DfaError::NoStates] for an automaton without states, with
    /// [DfaError::NoStartState] if no start state was set, and with
    /// [DfaError::MissingTransition] naming the first undefined state and symbol if the
    /// transition function is not total. Totality is required for every declared state,
    /// whether or not it is reachable.
    ///
    /// # Example
    /// ```
    /// use dfa_min::{Alphabet, DfaBuilder, DfaError};
    ///
    /// let mut builder = DfaBuilder::new(1, Alphabet::new(['a']).unwrap());
    /// builder.set_start(0).unwrap();
    /// assert_eq!(
    ///     builder.build().unwrap_err(),
    ///     DfaError::MissingTransition { state: 0, symbol: 'a' }
    /// );
    /// ```
    pub fn build(self) -> Result<Dfa, DfaError> {
        if self.num_states == 0 {
            return Err(DfaError::NoStates);
        }
        let start = self.start.ok_or(DfaError::NoStartState)?;
        let mut trans = Vec::with_capacity(self.trans.len());
        for (i, cell) in self.trans.iter().enumerate() {
            match cell {
                Some(to) => trans.push(*to),
                None => {
                    let state = i / self.alphabet.len();
                    // Safe to unwrap because the column index is in range by construction.
                    let symbol = self.alphabet.symbol(i % self.alphabet.len()).unwrap();
                    return Err(DfaError::MissingTransition { state, symbol });
                }
            }
        }
        Ok(Dfa {
            num_states: self.num_states,
            alphabet: self.alphabet,
            trans,
            start,
            accepting: self.accepting,
        })
    }
}

impl Arbitrary for Dfa {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let alphabet = Alphabet::arbitrary(g);
        let num_states = 1 + usize::arbitrary(g) % 8;
        let mut builder = DfaBuilder::new(num_states, alphabet.clone());
        for q in 0..num_states {
            for sym in alphabet.iter() {
                let to = usize::arbitrary(g) % num_states;
                // Indices and symbols are in range by construction.
                builder.add_transition(q, sym, to).unwrap();
            }
        }
        builder.set_start(usize::arbitrary(g) % num_states).unwrap();
        for q in 0..num_states {
            if bool::arbitrary(g) {
                builder.add_accepting(q).unwrap();
            }
        }
        builder.build().unwrap()
    }
}
