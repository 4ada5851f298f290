//! Dihedral and color-swap symmetries of words
//!
//! The dihedral group `D_n` acts on positions (rotations and reflections of
//! the cycle); the global swap `B <-> R` acts on symbols and commutes with
//! every dihedral element. Together they form a group of order `4n`.
//!
//! Rotation convention: `rotate(w, k)` is a left shift, so position `i` of
//! the image holds `w[(i + k) mod n]`. The opposite convention sweeps the
//! same image set as `k` runs over `0..n`; only this one is used here.

use crate::word::Word;
use std::collections::BTreeSet;

/// Cyclic left shift by `k`
pub fn rotate(word: &Word, k: usize) -> Word {
    let n = word.len();
    if n == 0 {
        return word.clone();
    }
    (0..n).map(|i| word.at((i + k) % n)).collect()
}

/// Reflection about axis `k`: position `i` holds `word[(k - i) mod n]`
pub fn reflect(word: &Word, k: usize) -> Word {
    let n = word.len();
    if n == 0 {
        return word.clone();
    }
    (0..n).map(|i| word.at((k % n + n - i) % n)).collect()
}

/// Replace every `B` by `R` and every `R` by `B`
pub fn swap_colors(word: &Word) -> Word {
    word.colors().iter().map(|c| c.swapped()).collect()
}

/// A dihedral element of `D_n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dihedral {
    Rotation(usize),
    Reflection(usize),
}

/// A group element: a dihedral move, optionally followed by the color swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetry {
    pub dihedral: Dihedral,
    pub swap: bool,
}

impl Symmetry {
    pub fn identity() -> Self {
        Self {
            dihedral: Dihedral::Rotation(0),
            swap: false,
        }
    }

    /// Every element of `D_n` (and of `D_n x <swap>` when `include_swap`)
    ///
    /// Yields `2n` or `4n` elements; for `n = 0` only the identity (and swap).
    pub fn all(n: usize, include_swap: bool) -> impl Iterator<Item = Symmetry> {
        let axes = n.max(1);
        let swaps: &'static [bool] = if include_swap { &[false, true] } else { &[false] };
        swaps.iter().flat_map(move |&swap| {
            (0..axes).flat_map(move |k| {
                [Dihedral::Rotation(k), Dihedral::Reflection(k)]
                    .into_iter()
                    .map(move |dihedral| Symmetry { dihedral, swap })
            })
        })
    }

    /// Order of the acting group
    pub fn group_order(n: usize, include_swap: bool) -> usize {
        let dihedral = 2 * n.max(1);
        if include_swap {
            2 * dihedral
        } else {
            dihedral
        }
    }

    pub fn apply(&self, word: &Word) -> Word {
        let moved = match self.dihedral {
            Dihedral::Rotation(k) => rotate(word, k),
            Dihedral::Reflection(k) => reflect(word, k),
        };
        if self.swap {
            swap_colors(&moved)
        } else {
            moved
        }
    }
}

/// All images of `word` under the chosen group, as a set
pub fn orbit(word: &Word, include_swap: bool) -> BTreeSet<Word> {
    Symmetry::all(word.len(), include_swap)
        .map(|s| s.apply(word))
        .collect()
}

/// The lexicographically smallest member of the orbit of `word`
pub fn canonical(word: &Word, include_swap: bool) -> Word {
    // An orbit always contains the word itself.
    orbit(word, include_swap)
        .into_iter()
        .next()
        .unwrap_or_else(|| word.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Word {
        s.parse().unwrap()
    }

    fn spelled(set: &BTreeSet<Word>) -> Vec<String> {
        set.iter().map(Word::to_string).collect()
    }

    #[test]
    fn test_rotate_is_left_shift() {
        assert_eq!(rotate(&word("BBRRR"), 1).to_string(), "BRRRB");
        assert_eq!(rotate(&word("BBRRR"), 5), word("BBRRR"));
    }

    #[test]
    fn test_reflect_about_axis() {
        // Axis 0: i -> -i, so position 0 stays and the tail reverses.
        assert_eq!(reflect(&word("BRRBB"), 0).to_string(), "BBBRR");
        // Axis n-1 is a plain reversal.
        assert_eq!(reflect(&word("BRRBB"), 4).to_string(), "BBRRB");
    }

    #[test]
    fn test_swap_colors() {
        assert_eq!(swap_colors(&word("BRRB")).to_string(), "RBBR");
    }

    #[test]
    fn test_group_sizes() {
        assert_eq!(Symmetry::all(7, false).count(), 14);
        assert_eq!(Symmetry::all(7, true).count(), 28);
        assert_eq!(Symmetry::group_order(7, true), 28);
        assert!(Symmetry::all(3, false).any(|s| s == Symmetry::identity()));
    }

    #[test]
    fn test_orbit_of_br() {
        let without = orbit(&word("BR"), false);
        let with = orbit(&word("BR"), true);
        assert_eq!(spelled(&without), ["BR", "RB"]);
        assert_eq!(with, without);
    }

    #[test]
    fn test_orbit_of_asymmetric_word_is_full() {
        // BBRBRRR has trivial stabiliser in D_7.
        let w = word("BBRBRRR");
        assert_eq!(orbit(&w, false).len(), 14);
        assert_eq!(orbit(&w, true).len(), 28);
    }

    #[test]
    fn test_orbit_sizes_divide_group_order() {
        for bits in 0..(1u64 << 6) {
            let w = Word::from_bits(bits, 6);
            for include_swap in [false, true] {
                let size = orbit(&w, include_swap).len();
                assert_eq!(Symmetry::group_order(6, include_swap) % size, 0, "{w}");
            }
        }
    }

    #[test]
    fn test_canonical_is_orbit_minimum() {
        assert_eq!(canonical(&word("RRB"), false).to_string(), "BRR");
        assert_eq!(canonical(&word("RRB"), true).to_string(), "BBR");
    }
}
