//! Two-colorings of `Z_n`
//!
//! A [`Word`] assigns one of two colors to every residue `0..n`. Words are
//! immutable once built; every symmetry operation returns a new word.
//!
//! Colors order as `B < R`, so the derived ordering on words is the
//! lexicographic order of their `B`/`R` spelling. Orbit representatives rely
//! on this.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a word
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WordError {
    #[error("invalid symbol {symbol:?} at position {position} (expected B or R)")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("word has length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// One of the two colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// Blue; encoded as a false SAT variable
    B,
    /// Red; encoded as a true SAT variable
    R,
}

impl Color {
    /// The other color
    pub fn swapped(self) -> Self {
        match self {
            Self::B => Self::R,
            Self::R => Self::B,
        }
    }

    /// Map a SAT polarity to a color (`true` is `R`)
    pub fn from_polarity(value: bool) -> Self {
        if value {
            Self::R
        } else {
            Self::B
        }
    }

    /// The SAT polarity of this color
    pub fn polarity(self) -> bool {
        self == Self::R
    }

    pub fn as_char(self) -> char {
        match self {
            Self::B => 'B',
            Self::R => 'R',
        }
    }
}

/// A coloring of `0..n`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word {
    colors: Vec<Color>,
}

impl Word {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// The word of length `n` with every position set to `color`
    pub fn uniform(n: usize, color: Color) -> Self {
        Self {
            colors: vec![color; n],
        }
    }

    /// Build a word from the low `n` bits of `bits`, most significant first
    ///
    /// Bit `n - 1 - i` set means position `i` is `R`. Counting `bits` upward
    /// from zero therefore visits words in lexicographic order.
    pub fn from_bits(bits: u64, n: usize) -> Self {
        debug_assert!(n <= 64, "bit encoding supports at most 64 positions");
        let colors = (0..n)
            .map(|i| Color::from_polarity((bits >> (n - 1 - i)) & 1 == 1))
            .collect();
        Self { colors }
    }

    /// Parse a word and require a specific length
    pub fn parse_with_len(text: &str, expected: usize) -> Result<Self, WordError> {
        let word: Self = text.parse()?;
        if word.len() != expected {
            return Err(WordError::LengthMismatch {
                expected,
                actual: word.len(),
            });
        }
        Ok(word)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `index`; panics when out of range
    pub fn at(&self, index: usize) -> Color {
        self.colors[index]
    }

    /// The SAT assignment of this word, indexed by position
    pub fn assignment(&self) -> Vec<bool> {
        self.colors.iter().map(|c| c.polarity()).collect()
    }
}

impl FromIterator<Color> for Word {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

impl FromStr for Word {
    type Err = WordError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .chars()
            .enumerate()
            .map(|(position, symbol)| match symbol.to_ascii_uppercase() {
                'B' => Ok(Color::B),
                'R' => Ok(Color::R),
                _ => Err(WordError::InvalidSymbol { symbol, position }),
            })
            .collect()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.colors {
            write!(f, "{}", color.as_char())?;
        }
        Ok(())
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
