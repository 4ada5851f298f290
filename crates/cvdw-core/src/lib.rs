//! Combinatorial core for cyclic 4-AP avoidance
//!
//! A 2-coloring of `Z_n` is *valid* when no 4-term arithmetic progression
//! `i, i+r, i+2r, i+3r (mod n)` with four distinct indices is monochromatic.
//! This crate provides:
//!
//! - [`window`]: progression windows and the validity oracle
//! - [`symmetry`]: rotations, reflections and the global color swap
//! - [`classify`]: orbit classification and the swap-merged grouping
//! - [`enumerate`]: brute-force enumeration and orbit summaries
//! - [`cnf`]: the DIMACS encoding handed to external SAT solvers
//! - [`model`]: decoding solver models and re-validating witnesses
//!
//! # Example
//!
//! ```
//! use cvdw_core::{encode, is_valid, Word, WindowMode};
//!
//! let word: Word = "BBRRB".parse().unwrap();
//! assert!(is_valid(&word));
//!
//! let cnf = encode(5, WindowMode::Cyclic);
//! assert!(cnf.is_satisfied_by(&word.assignment()));
//! ```

pub mod classify;
pub mod cnf;
pub mod enumerate;
pub mod model;
pub mod symmetry;
pub mod window;
pub mod word;

pub use classify::{classify, combine_with_swap, OrbitClass, SwapGroup, WordSetReport};
pub use cnf::{encode, CnfInstance};
pub use enumerate::{
    enumerate_valid, enumerate_valid_in, EnumerationError, OrbitSummary, MAX_ENUMERATION_MODULUS,
};
pub use model::{decode, decode_lenient, model_lines, verify, verify_in, Witness, UNASSIGNED_COLOR};
pub use symmetry::{canonical, orbit, reflect, rotate, swap_colors, Dihedral, Symmetry};
pub use window::{
    first_violation, is_valid, is_valid_in, window_count, windows, Window, WindowMasks, WindowMode,
};
pub use word::{Color, Word, WordError};
