//! External decision procedures for the avoidance sweep
//!
//! The sweep never solves or checks anything itself. It hands DIMACS files to
//! CaDiCaL (which also writes a DRAT refutation) or Kissat, and hands
//! refutations to drat-trim. This crate wraps those tools:
//!
//! - [`runner`]: the [`ToolRunner`] process capability and its system implementation
//! - [`solver`]: solver kinds, command lines and `s ...` status parsing
//! - [`policy`]: which solver to use and when to fall back
//! - [`drat`]: drat-trim invocation and result classification
//! - [`Toolchain`]: the set of tools found for a run

pub mod drat;
pub mod policy;
pub mod runner;
pub mod solver;

pub use drat::{check_proof, classify_check, ProofCheck, DRAT_TRIM};
pub use policy::{choose, needs_fallback, Choice};
pub use runner::{InvokeError, ProcessOutput, SystemRunner, ToolRunner};
pub use solver::{
    parse_status, run_solver, status_line, SatStatus, SolverKind, SolverRun, SolverStats,
};

use std::path::{Path, PathBuf};
use tracing::debug;

/// Find an executable on `PATH`
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Executables resolved for one run; `None` marks a missing tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolchain {
    pub cadical: Option<PathBuf>,
    pub kissat: Option<PathBuf>,
    pub drat_trim: Option<PathBuf>,
}

impl Toolchain {
    /// Resolve every tool through `runner`
    ///
    /// An explicit override that names an existing file is used as is;
    /// otherwise it is looked up like a bare tool name.
    pub fn discover<R: ToolRunner + ?Sized>(
        runner: &R,
        cadical: Option<&Path>,
        kissat: Option<&Path>,
        drat_trim: Option<&Path>,
    ) -> Self {
        let toolchain = Self {
            cadical: resolve(runner, SolverKind::CaDiCaL.binary(), cadical),
            kissat: resolve(runner, SolverKind::Kissat.binary(), kissat),
            drat_trim: resolve(runner, DRAT_TRIM, drat_trim),
        };
        debug!(
            cadical = ?toolchain.cadical,
            kissat = ?toolchain.kissat,
            drat_trim = ?toolchain.drat_trim,
            "Detected external tools"
        );
        toolchain
    }

    pub fn solver(&self, kind: SolverKind) -> Option<&Path> {
        match kind {
            SolverKind::CaDiCaL => self.cadical.as_deref(),
            SolverKind::Kissat => self.kissat.as_deref(),
        }
    }
}

fn resolve<R: ToolRunner + ?Sized>(
    runner: &R,
    default_name: &str,
    explicit: Option<&Path>,
) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => runner.locate(&path.to_string_lossy()),
        None => runner.locate(default_name),
    }
}
