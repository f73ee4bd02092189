//! Rack and blank-pattern value types.

use std::collections::HashMap;
use std::fmt;

/// Character marking an unknown position in a broadcast pattern.
pub const WILDCARD: char = '_';

/// The letters available this turn, as an upper-cased multiset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rack {
    letters: String,
}

impl Rack {
    pub fn new(letters: impl AsRef<str>) -> Self {
        Self {
            letters: letters.as_ref().to_uppercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.letters
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Number of letters in the rack.
    pub fn len(&self) -> usize {
        self.letters.chars().count()
    }

    /// Per-letter counts, keyed by lower-case character.
    pub fn counts(&self) -> HashMap<char, usize> {
        letter_counts(&self.letters.to_lowercase())
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters)
    }
}

/// One position of a blank pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Literal(char),
    Wildcard,
}

impl Symbol {
    fn accepts(self, c: char) -> bool {
        match self {
            Symbol::Literal(l) => l == c,
            Symbol::Wildcard => true,
        }
    }
}

/// Fixed-length target word shape. Literals are stored lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankPattern {
    symbols: Vec<Symbol>,
}

impl BlankPattern {
    /// Parses a compact pattern such as `c_t`. Whitespace must already be removed.
    pub fn parse(raw: &str) -> Self {
        let symbols = raw
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| if c == WILDCARD { Symbol::Wildcard } else { Symbol::Literal(c) })
            .collect();
        Self { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// True when `word` has the pattern's length and agrees on every literal.
    pub fn matches(&self, word: &str) -> bool {
        let mut chars = word.chars();
        for symbol in &self.symbols {
            match chars.next() {
                Some(c) if symbol.accepts(c) => {}
                _ => return false,
            }
        }
        chars.next().is_none()
    }
}

impl fmt::Display for BlankPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            match symbol {
                Symbol::Literal(c) => write!(f, "{}", c)?,
                Symbol::Wildcard => write!(f, "{}", WILDCARD)?,
            }
        }
        Ok(())
    }
}

/// Counts characters of an already-normalised string.
pub fn letter_counts(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}
