//! Decoding solver models into words, and witness re-validation
//!
//! SAT solvers print a model as value lines:
//!
//! ```text
//! s SATISFIABLE
//! v 1 -2 3 -4
//! v 5 0
//! ```
//!
//! A positive literal `k` colors position `k - 1` red, a negative one blue.

use crate::window::{is_valid_in, WindowMode};
use crate::word::{Color, Word};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Color given to positions the model leaves unassigned
///
/// Solvers may omit variables that do not occur in any clause (or that the
/// model does not constrain). Missing assignments are not an error; they
/// read as `B`, the color of a false variable.
pub const UNASSIGNED_COLOR: Color = Color::B;

/// Decode the value lines of `raw` into a word of length `n`
///
/// Only lines starting with `v ` are read. When a variable is assigned more
/// than once the last assignment wins. Returns `None` when the output has no
/// value line at all.
pub fn decode(raw: &str, n: usize) -> Option<Word> {
    let mut values = HashMap::new();
    let mut saw_value_line = false;

    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("v ") {
            saw_value_line = true;
            collect_literals(rest, &mut values);
        }
    }

    saw_value_line.then(|| assemble(&values, n))
}

/// Decode every integer token of every line
///
/// Meant for hand-saved transcripts whose value lines lost their `v`
/// prefix. Always produces a word; anything unassigned takes
/// [`UNASSIGNED_COLOR`].
pub fn decode_lenient(raw: &str, n: usize) -> Word {
    let mut values = HashMap::new();
    for line in raw.lines() {
        collect_literals(line, &mut values);
    }
    assemble(&values, n)
}

fn collect_literals(text: &str, values: &mut HashMap<u64, bool>) {
    for token in text.split_whitespace() {
        let Ok(lit) = token.parse::<i64>() else {
            continue;
        };
        if lit != 0 {
            values.insert(lit.unsigned_abs(), lit > 0);
        }
    }
}

fn assemble(values: &HashMap<u64, bool>, n: usize) -> Word {
    (1..=n as u64)
        .map(|v| values.get(&v).map_or(UNASSIGNED_COLOR, |&b| Color::from_polarity(b)))
        .collect()
}

/// Independent re-check of a decoded word against the validity oracle
pub fn verify(word: &Word) -> bool {
    verify_in(word, WindowMode::Cyclic)
}

pub fn verify_in(word: &Word, mode: WindowMode) -> bool {
    is_valid_in(word, mode)
}

/// Solver-style value lines for `word`, `0`-terminated
pub fn model_lines(word: &Word) -> String {
    let mut out = String::from("v");
    for (i, color) in word.colors().iter().enumerate() {
        let v = i as i64 + 1;
        let lit = if color.polarity() { v } else { -v };
        let _ = write!(out, " {lit}");
    }
    out.push_str(" 0\n");
    out
}

/// A decoded word together with the outcome of its re-validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub word: Word,
    pub verified: bool,
}

impl Witness {
    /// Re-validate `word` and keep the verdict next to it
    pub fn check(word: Word, mode: WindowMode) -> Self {
        let verified = verify_in(&word, mode);
        Self { word, verified }
    }
}
