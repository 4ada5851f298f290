//! Per-modulus outcomes

use cvdw_core::Witness;
use cvdw_portfolio::{ProofCheck, SatStatus, SolverKind};
use std::time::Duration;

/// Flag appended to a witness that fails re-validation
pub const SELF_CHECK_FAILED: &str = "witness FAILS self-check";

/// Note for a SAT verdict whose model could not be decoded
pub const NO_MODEL: &str = "no model parsed";

/// Note when neither solver is installed
pub const NO_SOLVER: &str = "no solver found";

/// What the sweep concluded about one modulus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A coloring exists; `witness` is None when no model could be decoded
    Sat { witness: Option<Witness> },
    /// No coloring exists
    Unsat { proof: ProofCheck },
    /// No conclusion
    Unknown { reason: String },
}

impl Verdict {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Verdict::Unknown {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> SatStatus {
        match self {
            Verdict::Sat { .. } => SatStatus::Sat,
            Verdict::Unsat { .. } => SatStatus::Unsat,
            Verdict::Unknown { .. } => SatStatus::Unknown,
        }
    }
}

/// One row of a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulusOutcome {
    pub modulus: usize,
    pub verdict: Verdict,
    /// Solver the verdict came from (None if no solver ran)
    pub solver: Option<SolverKind>,
    pub duration: Duration,
}

impl ModulusOutcome {
    pub fn status(&self) -> SatStatus {
        self.verdict.status()
    }

    /// Text of the witness column: the word with any flag, or the reason a
    /// row has no word
    pub fn witness_or_note(&self) -> String {
        match &self.verdict {
            Verdict::Sat {
                witness: Some(witness),
            } if witness.verified => witness.word.to_string(),
            Verdict::Sat {
                witness: Some(witness),
            } => format!("{} [{SELF_CHECK_FAILED}]", witness.word),
            Verdict::Sat { witness: None } => NO_MODEL.to_string(),
            Verdict::Unsat { .. } => String::new(),
            Verdict::Unknown { reason } => reason.clone(),
        }
    }

    /// Text of the proof column
    pub fn proof_note(&self) -> String {
        match &self.verdict {
            Verdict::Unsat { proof } => proof.note(),
            _ => String::new(),
        }
    }
}
