//! Fragments and their overlap boundaries
//!
//! A fragment is one observed read: either a single k-mer or a pair of
//! k-mers separated by a known gap. Each fragment becomes one edge of the
//! de Bruijn graph, running from its prefix node (the fragment without its
//! last symbol) to its suffix node (the fragment without its first symbol).
//!
//! Symbols are handled as `char`s, so slicing never splits a UTF-8 sequence
//! even when a fragment has not been checked against an alphabet yet.

use crate::alphabet::{Alphabet, AlphabetError};
use crate::constants::PAIR_SEPARATOR;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// Why a single fragment cannot become an edge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FragmentDefect {
    /// Fragment length differs from k
    #[error("expected {expected} symbols, got {actual}")]
    LengthMismatch {
        /// Configured fragment length
        expected: usize,
        /// Observed fragment length
        actual: usize,
    },
    /// The two halves of a read pair differ in length
    #[error("pair halves differ in length ({left} vs {right})")]
    PairLengthMismatch {
        /// Length of the left half
        left: usize,
        /// Length of the right half
        right: usize,
    },
    /// A symbol is outside the configured alphabet
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
}

/// Drop the first symbol of a token
#[inline]
pub fn drop_first(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next();
    chars.as_str()
}

/// Drop the last symbol of a token
#[inline]
pub fn drop_last(token: &str) -> &str {
    let mut chars = token.chars();
    chars.next_back();
    chars.as_str()
}

fn symbol_len(token: &str) -> usize {
    token.chars().count()
}

/// A fragment that can be placed in a de Bruijn graph
pub trait Fragment: Clone + fmt::Debug + fmt::Display {
    /// Overlap boundary type
    type Node: Clone + Eq + Hash + fmt::Debug;

    /// Number of symbols in one k-mer of this fragment
    fn span(&self) -> usize;

    /// Check length and alphabet against the graph's configuration
    ///
    /// # Errors
    /// Returns the first defect found
    fn validate(&self, k: usize, alphabet: Alphabet) -> Result<(), FragmentDefect>;

    /// The fragment without its last symbol (per half for pairs)
    fn prefix_node(&self) -> Self::Node;

    /// The fragment without its first symbol (per half for pairs)
    fn suffix_node(&self) -> Self::Node;
}

/// A single k-mer fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kmer(String);

impl Kmer {
    /// Wrap a token as a k-mer
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The k-mer text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        symbol_len(&self.0)
    }

    /// Whether the k-mer has no symbols
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the k-mer and return its text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Fragment for Kmer {
    type Node = String;

    fn span(&self) -> usize {
        self.len()
    }

    fn validate(&self, k: usize, alphabet: Alphabet) -> Result<(), FragmentDefect> {
        let actual = self.len();
        if actual != k {
            return Err(FragmentDefect::LengthMismatch { expected: k, actual });
        }
        alphabet.validate(&self.0)?;
        Ok(())
    }

    fn prefix_node(&self) -> String {
        drop_last(&self.0).to_string()
    }

    fn suffix_node(&self) -> String {
        drop_first(&self.0).to_string()
    }
}

impl AsRef<str> for Kmer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Kmer {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Kmer {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for Kmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access to the two halves of a paired token
pub trait PairedSymbols {
    /// Left half
    fn left(&self) -> &str;
    /// Right half
    fn right(&self) -> &str;
}

impl<P: PairedSymbols + ?Sized> PairedSymbols for &P {
    fn left(&self) -> &str {
        (**self).left()
    }

    fn right(&self) -> &str {
        (**self).right()
    }
}

/// Two k-mers read `k + d` symbols apart
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadPair {
    left: String,
    right: String,
}

impl ReadPair {
    /// Create a read pair from its halves
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl PairedSymbols for ReadPair {
    fn left(&self) -> &str {
        &self.left
    }

    fn right(&self) -> &str {
        &self.right
    }
}

/// Error returned when a `LEFT|RIGHT` token cannot be split
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected LEFT|RIGHT, got {0:?}")]
pub struct ParsePairError(pub String);

impl FromStr for ReadPair {
    type Err = ParsePairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (left, right) = s
            .split_once(PAIR_SEPARATOR)
            .ok_or_else(|| ParsePairError(s.to_string()))?;
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() || right.contains(PAIR_SEPARATOR) {
            return Err(ParsePairError(s.to_string()));
        }
        Ok(Self::new(left, right))
    }
}

impl fmt::Display for ReadPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, PAIR_SEPARATOR, self.right)
    }
}

/// Overlap boundary of a read pair: one (k-1)-symbol token per half
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairNode {
    left: String,
    right: String,
}

impl PairNode {
    /// Create a pair node from its halves
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl PairedSymbols for PairNode {
    fn left(&self) -> &str {
        &self.left
    }

    fn right(&self) -> &str {
        &self.right
    }
}

impl fmt::Display for PairNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left, PAIR_SEPARATOR, self.right)
    }
}

impl Fragment for ReadPair {
    type Node = PairNode;

    fn span(&self) -> usize {
        symbol_len(&self.left)
    }

    fn validate(&self, k: usize, alphabet: Alphabet) -> Result<(), FragmentDefect> {
        let left = symbol_len(&self.left);
        let right = symbol_len(&self.right);
        if left != right {
            return Err(FragmentDefect::PairLengthMismatch { left, right });
        }
        if left != k {
            return Err(FragmentDefect::LengthMismatch { expected: k, actual: left });
        }
        alphabet.validate(&self.left)?;
        alphabet.validate(&self.right)?;
        Ok(())
    }

    fn prefix_node(&self) -> PairNode {
        PairNode::new(drop_last(&self.left), drop_last(&self.right))
    }

    fn suffix_node(&self) -> PairNode {
        PairNode::new(drop_first(&self.left), drop_first(&self.right))
    }
}
