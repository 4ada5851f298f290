//! Arithmetic-progression windows and the validity oracle
//!
//! A window is the index tuple `(i, i+r, i+2r, i+3r) mod n` for a step
//! `r in 1..n` and a base `i in 0..n`. A word is valid when none of its
//! windows is monochromatic.
//!
//! Different `(i, r)` pairs can produce the same window as a set (for
//! example `r` and `n - r` walk the same progression backwards). Those
//! duplicates are kept: a repeated constraint never changes the answer.

use crate::word::{Color, Word};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which progressions count as windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Only progressions whose four indices are pairwise distinct
    #[default]
    Cyclic,
    /// Every `(i, r)` progression, including ones that revisit an index
    Strong,
}

/// Four indices of a progression, in progression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window(pub [usize; 4]);

impl Window {
    pub fn indices(&self) -> [usize; 4] {
        self.0
    }

    /// Whether all four indices differ
    pub fn is_non_degenerate(&self) -> bool {
        let [a, b, c, d] = self.0;
        a != b && a != c && a != d && b != c && b != d && c != d
    }

    /// The four colors `word` shows through this window
    pub fn block(&self, word: &Word) -> [Color; 4] {
        self.0.map(|i| word.at(i))
    }

    /// Whether the window sees a single color in `word`
    pub fn is_monochromatic(&self, word: &Word) -> bool {
        let reds = self.0.iter().filter(|&&i| word.at(i) == Color::R).count();
        reds == 0 || reds == 4
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({a}, {b}, {c}, {d})")
    }
}

/// Lazily generate the windows of `Z_n`
///
/// The step `r` is the outer loop and the base `i` the inner one. The
/// iterator is finite and a fresh call restarts it.
pub fn windows(n: usize, mode: WindowMode) -> impl Iterator<Item = Window> + Clone {
    (1..n)
        .flat_map(move |r| (0..n).map(move |i| Window([i, (i + r) % n, (i + 2 * r) % n, (i + 3 * r) % n])))
        .filter(move |w| mode == WindowMode::Strong || w.is_non_degenerate())
}

/// Number of windows `windows(n, mode)` yields
pub fn window_count(n: usize, mode: WindowMode) -> usize {
    windows(n, mode).count()
}

/// Validity of `word` over `Z_{word.len()}` with non-degenerate windows
pub fn is_valid(word: &Word) -> bool {
    is_valid_in(word, WindowMode::Cyclic)
}

/// Validity of `word` for the given window mode
///
/// Stops at the first monochromatic window.
pub fn is_valid_in(word: &Word, mode: WindowMode) -> bool {
    first_violation(word, mode).is_none()
}

/// The first monochromatic window of `word`, if any
pub fn first_violation(word: &Word, mode: WindowMode) -> Option<Window> {
    windows(word.len(), mode).find(|w| w.is_monochromatic(word))
}

/// Bitmask form of the window set, for bit-encoded words of length `<= 64`
///
/// Bit `n - 1 - i` of a mask stands for position `i`, matching
/// [`Word::from_bits`].
#[derive(Debug, Clone)]
pub struct WindowMasks {
    n: usize,
    masks: Vec<u64>,
}

impl WindowMasks {
    /// Largest modulus a `u64` word can hold
    pub const MAX_MODULUS: usize = 64;

    /// Precompute the masks; `None` when `n` exceeds [`Self::MAX_MODULUS`]
    pub fn new(n: usize, mode: WindowMode) -> Option<Self> {
        if n > Self::MAX_MODULUS {
            return None;
        }
        let mut masks: Vec<u64> = windows(n, mode)
            .map(|w| w.0.iter().fold(0u64, |acc, &i| acc | 1u64 << (n - 1 - i)))
            .collect();
        // The mask test is set-based, so repeated windows are redundant here.
        masks.sort_unstable();
        masks.dedup();
        Some(Self { n, masks })
    }

    pub fn modulus(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Validity of the bit-encoded word `bits`
    pub fn is_valid_bits(&self, bits: u64) -> bool {
        self.masks.iter().all(|&m| {
            let hit = bits & m;
            hit != 0 && hit != m
        })
    }
}
