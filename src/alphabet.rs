//! Ordered alphabets of input symbols.
//!
//! A [Dfa](crate::Dfa) reads symbols from a fixed, ordered alphabet.
//! The order assigns every symbol a column in the transition table, so stepping through the
//! automaton is plain index arithmetic instead of hashing.

use std::fmt::Display;

use itertools::Itertools;
use quickcheck::Arbitrary;
use smallvec::SmallVec;

/// Returned by [Alphabet::new] if the same symbol occurs more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateSymbol(pub char);

impl Display for DuplicateSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "duplicate symbol in alphabet: '{}'", self.0)
    }
}

impl std::error::Error for DuplicateSymbol {}

/// An ordered sequence of distinct input symbols.
///
/// The position of a symbol in the sequence is its column index in the transition table of
/// every automaton built over this alphabet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: SmallVec<[char; 8]>,
}

impl Alphabet {
    /// Creates an alphabet from the given symbols, keeping their order.
    /// Fails if a symbol occurs more than once.
    ///
    /// # Example
    /// ```
    /// use dfa_min::alphabet::{Alphabet, DuplicateSymbol};
    ///
    /// let alphabet = Alphabet::new(['0', '1']).unwrap();
    /// assert_eq!(alphabet.len(), 2);
    ///
    /// assert_eq!(Alphabet::new(['a', 'b', 'a']), Err(DuplicateSymbol('a')));
    /// ```
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self, DuplicateSymbol> {
        let mut seen: SmallVec<[char; 8]> = SmallVec::new();
        for sym in symbols {
            if seen.contains(&sym) {
                return Err(DuplicateSymbol(sym));
            }
            seen.push(sym);
        }
        Ok(Alphabet { symbols: seen })
    }

    /// Creates an alphabet with no symbols.
    /// Automata over the empty alphabet have no transitions and accept at most the empty word.
    pub fn empty() -> Self {
        Alphabet::default()
    }

    /// The number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether the given symbol is in the alphabet.
    ///
    /// # Example
    /// ```
    /// use dfa_min::Alphabet;
    ///
    /// let alphabet = Alphabet::new(['0', '1']).unwrap();
    /// assert!(alphabet.contains('0'));
    /// assert!(!alphabet.contains('2'));
    /// ```
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Returns the column index of the given symbol, or `None` if the symbol is not in the
    /// alphabet.
    ///
    /// # Example
    /// ```
    /// use dfa_min::Alphabet;
    ///
    /// let alphabet = Alphabet::new(['a', 'b']).unwrap();
    /// assert_eq!(alphabet.index_of('b'), Some(1));
    /// assert_eq!(alphabet.index_of('z'), None);
    /// ```
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        // Linear scan; alphabets are expected to stay small.
        self.symbols.iter().position(|&c| c == symbol)
    }

    /// Returns the symbol at the given column index, or `None` if the index is out of range.
    ///
    /// # Example
    /// ```
    /// use dfa_min::Alphabet;
    ///
    /// let alphabet = Alphabet::new(['a', 'b']).unwrap();
    /// assert_eq!(alphabet.symbol(0), Some('a'));
    /// assert_eq!(alphabet.symbol(2), None);
    /// ```
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Returns an iterator over the symbols in column order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.symbols.iter().join(", "))
    }
}

impl Arbitrary for Alphabet {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        const POOL: [char; 6] = ['a', 'b', 'c', '0', '1', '2'];
        let len = 1 + usize::arbitrary(g) % 3;
        let start = usize::arbitrary(g) % (POOL.len() - len + 1);
        // Symbols drawn from a window over a fixed pool are distinct by construction.
        Alphabet::new(POOL[start..start + len].iter().copied()).unwrap()
    }
}
