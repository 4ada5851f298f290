//! SAT solver command lines and output parsing
//!
//! Both solvers follow the SAT competition output format: comment lines
//! start with `c`, the verdict is a single `s ...` line and the model is
//! spread over `v ...` lines. The verdict line is all that is read here;
//! model decoding lives in `cvdw_core::model`.

use crate::runner::{InvokeError, ProcessOutput, ToolRunner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Supported SAT solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverKind {
    /// Primary solver, writes a DRAT refutation next to the CNF
    CaDiCaL,
    /// Alternative solver, no certificate
    Kissat,
}

impl SolverKind {
    /// Executable name looked up on `PATH`
    pub fn binary(self) -> &'static str {
        match self {
            SolverKind::CaDiCaL => "cadical",
            SolverKind::Kissat => "kissat",
        }
    }

    pub fn emits_certificate(self) -> bool {
        matches!(self, SolverKind::CaDiCaL)
    }

    /// Command-line arguments for solving `cnf`
    ///
    /// `proof` is only passed to solvers that write certificates.
    pub fn args(self, cnf: &Path, proof: &Path) -> Vec<String> {
        match self {
            SolverKind::CaDiCaL => vec![
                cnf.display().to_string(),
                proof.display().to_string(),
            ],
            SolverKind::Kissat => vec!["-q".to_string(), cnf.display().to_string()],
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::CaDiCaL => write!(f, "CaDiCaL"),
            SolverKind::Kissat => write!(f, "Kissat"),
        }
    }
}

/// Verdict printed by a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SatStatus {
    Sat,
    Unsat,
    Unknown,
}

impl SatStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SatStatus::Sat => "SAT",
            SatStatus::Unsat => "UNSAT",
            SatStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text after the first `s ` prefix, stdout before stderr
pub fn status_line<'a>(stdout: &'a str, stderr: &'a str) -> Option<&'a str> {
    stdout
        .lines()
        .chain(stderr.lines())
        .find_map(|line| line.strip_prefix("s "))
}

/// Read the verdict from the first `s ...` line
///
/// Stdout is scanned before stderr. `UNSATISFIABLE` is tested first since it
/// contains `SATISFIABLE`. Output without a status line is `Unknown`.
pub fn parse_status(stdout: &str, stderr: &str) -> SatStatus {
    match status_line(stdout, stderr) {
        Some(rest) if rest.contains("UNSATISFIABLE") => SatStatus::Unsat,
        Some(rest) if rest.contains("SATISFIABLE") => SatStatus::Sat,
        _ => SatStatus::Unknown,
    }
}

/// Search statistics reported on comment lines, when present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverStats {
    pub conflicts: Option<u64>,
    pub decisions: Option<u64>,
    pub propagations: Option<u64>,
}

impl SolverStats {
    pub fn from_output(stdout: &str, stderr: &str) -> Self {
        let mut stats = Self::default();
        for line in stdout.lines().chain(stderr.lines()) {
            if line.contains("conflicts:") {
                stats.conflicts = extract_number(line).or(stats.conflicts);
            } else if line.contains("decisions:") {
                stats.decisions = extract_number(line).or(stats.decisions);
            } else if line.contains("propagations:") {
                stats.propagations = extract_number(line).or(stats.propagations);
            }
        }
        stats
    }
}

/// First integer after the colon of a `c name: value ...` line
fn extract_number(line: &str) -> Option<u64> {
    let (_, rest) = line.split_once(':')?;
    rest.split_whitespace().next()?.parse().ok()
}

/// One finished solver invocation
#[derive(Debug, Clone)]
pub struct SolverRun {
    pub kind: SolverKind,
    pub status: SatStatus,
    pub stats: SolverStats,
    pub output: ProcessOutput,
}

/// Run `kind` on `cnf`, writing a certificate to `proof` if it can
pub async fn run_solver<R: ToolRunner + ?Sized>(
    runner: &R,
    kind: SolverKind,
    program: &Path,
    cnf: &Path,
    proof: &Path,
    limit: Duration,
) -> Result<SolverRun, InvokeError> {
    let args = kind.args(cnf, proof);
    debug!(solver = %kind, program = %program.display(), ?args, "Invoking solver");

    let output = runner.invoke(program, &args, None, limit).await?;
    let status = parse_status(&output.stdout, &output.stderr);
    let stats = SolverStats::from_output(&output.stdout, &output.stderr);

    info!(
        solver = %kind,
        %status,
        exit_code = ?output.exit_code,
        duration_ms = output.duration.as_millis() as u64,
        conflicts = ?stats.conflicts,
        "Solver finished"
    );

    Ok(SolverRun {
        kind,
        status,
        stats,
        output,
    })
}
