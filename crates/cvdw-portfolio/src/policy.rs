//! Solver selection and fallback rules
//!
//! CaDiCaL is the primary solver because it writes a DRAT certificate that
//! drat-trim can check. Kissat is the alternative.

use cvdw_core::Word;
use serde::{Deserialize, Serialize};

/// Which solver a modulus is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    Primary,
    Alternative,
    None,
}

/// Pick a solver from what is installed
///
/// The primary wins unless the alternative is both preferred and installed.
pub fn choose(primary_available: bool, alternative_available: bool, prefer_alternative: bool) -> Choice {
    if primary_available && (!prefer_alternative || !alternative_available) {
        Choice::Primary
    } else if alternative_available {
        Choice::Alternative
    } else {
        Choice::None
    }
}

/// Whether a SAT answer needs a second opinion from the alternative solver
pub fn needs_fallback(decoded: Option<&Word>, is_valid: bool) -> bool {
    decoded.is_none() || !is_valid
}
