//! Brute-force enumeration of valid words and their orbit summary

use crate::classify::{classify, combine_with_swap, OrbitClass, SwapGroup};
use crate::window::{WindowMasks, WindowMode};
use crate::word::Word;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Largest modulus accepted for exhaustive enumeration (`2^24` candidates)
pub const MAX_ENUMERATION_MODULUS: usize = 24;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnumerationError {
    #[error("modulus {0} is too large to enumerate (maximum {MAX_ENUMERATION_MODULUS})")]
    ModulusTooLarge(usize),

    #[error("modulus must be at least 1")]
    EmptyModulus,
}

/// All valid words of length `n`, in lexicographic order
pub fn enumerate_valid(n: usize) -> Result<Vec<Word>, EnumerationError> {
    enumerate_valid_in(n, WindowMode::Cyclic)
}

/// All words of length `n` that are valid for `mode`, in lexicographic order
pub fn enumerate_valid_in(n: usize, mode: WindowMode) -> Result<Vec<Word>, EnumerationError> {
    if n == 0 {
        return Err(EnumerationError::EmptyModulus);
    }
    let masks = WindowMasks::new(n, mode)
        .filter(|_| n <= MAX_ENUMERATION_MODULUS)
        .ok_or(EnumerationError::ModulusTooLarge(n))?;

    Ok((0..1u64 << n)
        .filter(|&bits| masks.is_valid_bits(bits))
        .map(|bits| Word::from_bits(bits, n))
        .collect())
}

/// Structured orbit report for one modulus
///
/// Field names follow the published report layout: `Dp_orbits` are the
/// dihedral classes, `Dp_x_tau_orbits` the classes merged under the swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitSummary {
    pub p: usize,
    pub num_valid: usize,
    #[serde(rename = "Dp_orbits")]
    pub dihedral: Vec<OrbitClass>,
    #[serde(rename = "Dp_x_tau_orbits")]
    pub with_swap: Vec<SwapGroup>,
}

impl OrbitSummary {
    /// Summarise an already enumerated word list for modulus `p`
    pub fn from_words(p: usize, words: &[Word]) -> Self {
        let set: BTreeSet<Word> = words.iter().cloned().collect();
        let dihedral = classify(&set, false);
        let with_swap = combine_with_swap(&dihedral);
        Self {
            p,
            num_valid: set.len(),
            dihedral,
            with_swap,
        }
    }

    /// Enumerate and summarise modulus `p`
    pub fn for_modulus(p: usize) -> Result<Self, EnumerationError> {
        let words = enumerate_valid(p)?;
        Ok(Self::from_words(p, &words))
    }
}
