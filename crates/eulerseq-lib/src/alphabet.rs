//! Fragment alphabets
//!
//! Fragments are plain text tokens. The graph builder checks every symbol
//! against the configured alphabet before a fragment becomes an edge:
//!
//! - `Dna`    -> A, C, G, T (either case)
//! - `Binary` -> 0, 1
//! - `Any`    -> any visible ASCII symbol except the pair separator

use crate::constants::PAIR_SEPARATOR;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for alphabet checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// A symbol is outside the alphabet
    #[error("Invalid symbol {symbol:?} at position {position} for the {alphabet} alphabet")]
    InvalidSymbol {
        /// Offending symbol
        symbol: char,
        /// Position of the symbol inside its token
        position: usize,
        /// Alphabet the token was checked against
        alphabet: Alphabet,
    },
    /// Unknown alphabet name
    #[error("Unknown alphabet: {0}")]
    UnknownAlphabet(String),
}

/// Symbol set accepted in fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alphabet {
    /// Nucleotides
    #[default]
    Dna,
    /// Binary digits, used by the universal circular string
    Binary,
    /// Any visible ASCII symbol
    Any,
}

impl Alphabet {
    /// Symbols of the alphabet in canonical order, if the alphabet is finite
    pub fn symbols(&self) -> Option<&'static [char]> {
        match self {
            Alphabet::Dna => Some(&['A', 'C', 'G', 'T']),
            Alphabet::Binary => Some(&['0', '1']),
            Alphabet::Any => None,
        }
    }

    /// Whether a single symbol belongs to the alphabet
    #[inline]
    pub fn contains(&self, symbol: char) -> bool {
        match self {
            Alphabet::Dna => matches!(symbol, 'A' | 'C' | 'G' | 'T' | 'a' | 'c' | 'g' | 't'),
            Alphabet::Binary => matches!(symbol, '0' | '1'),
            Alphabet::Any => symbol.is_ascii_graphic() && symbol != PAIR_SEPARATOR,
        }
    }

    /// Check every symbol of a token
    ///
    /// # Errors
    /// Returns the first symbol outside the alphabet
    pub fn validate(&self, token: &str) -> Result<(), AlphabetError> {
        for (position, symbol) in token.chars().enumerate() {
            if !self.contains(symbol) {
                return Err(AlphabetError::InvalidSymbol {
                    symbol,
                    position,
                    alphabet: *self,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alphabet::Dna => "dna",
            Alphabet::Binary => "binary",
            Alphabet::Any => "any",
        };
        f.write_str(name)
    }
}

impl FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(Alphabet::Dna),
            "binary" | "bin" => Ok(Alphabet::Binary),
            "any" => Ok(Alphabet::Any),
            _ => Err(AlphabetError::UnknownAlphabet(s.to_string())),
        }
    }
}
