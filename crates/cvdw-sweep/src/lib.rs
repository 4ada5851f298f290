//! Sweeps over moduli for cyclic 4-AP avoidance
//!
//! For each modulus `m` of a range the sweep encodes the problem, sends it
//! to an external SAT solver, re-validates any witness, checks any DRAT
//! refutation and records one row. The threshold `W_c(4,2)` shows up as a
//! SAT row followed by an UNSAT row at the end of the range.
//!
//! - [`config`]: [`SweepConfig`] and [`SolverConfig`]
//! - [`orchestrator`]: the per-modulus state machine
//! - [`sweep`]: [`run_sweep`] and the [`SweepSummary`]
//! - [`report`]: CSV and TSV rendering
//! - [`artifacts`]: the per-modulus files in the output directory

pub mod artifacts;
pub mod config;
pub mod orchestrator;
pub mod report;
pub mod result;
pub mod sweep;

pub use artifacts::{ArtifactError, ArtifactStore};
pub use config::{ConfigError, SolverConfig, SweepConfig};
pub use orchestrator::{Orchestrator, FALLBACK_MARKER};
pub use report::{render, ReportFormat};
pub use result::{ModulusOutcome, Verdict, NO_MODEL, NO_SOLVER, SELF_CHECK_FAILED};
pub use sweep::{run_sweep, SweepError, SweepSummary};
