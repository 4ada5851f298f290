//! DRAT refutation checking with drat-trim
//!
//! A check is advisory: an UNSAT verdict stands whatever drat-trim says, the
//! outcome only decides the proof note next to it.

use crate::runner::{ProcessOutput, ToolRunner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Executable name of the checker
pub const DRAT_TRIM: &str = "drat-trim";

/// Outcome of checking one refutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ProofCheck {
    Verified,
    /// The checker rejected the proof or could not finish
    CheckFailed(Option<String>),
    CheckerUnavailable,
    NoCertificate,
}

impl ProofCheck {
    /// Text for the proof column of a report
    pub fn note(&self) -> String {
        match self {
            ProofCheck::Verified => "DRAT ok".to_string(),
            ProofCheck::CheckFailed(None) => "DRAT check failed".to_string(),
            ProofCheck::CheckFailed(Some(reason)) => format!("DRAT check failed: {reason}"),
            ProofCheck::CheckerUnavailable => "no drat-trim".to_string(),
            ProofCheck::NoCertificate => "no DRAT certificate".to_string(),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, ProofCheck::Verified)
    }
}

impl fmt::Display for ProofCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.note())
    }
}

/// Arguments for checking `proof` against `cnf`
pub fn checker_args(cnf: &Path, proof: &Path) -> Vec<String> {
    vec![
        cnf.display().to_string(),
        proof.display().to_string(),
        "-q".to_string(),
    ]
}

/// Classify a finished drat-trim run
///
/// `s VERIFIED` on stdout or a zero exit code both count as success.
pub fn classify_check(output: &ProcessOutput) -> ProofCheck {
    if output.stdout.contains("s VERIFIED") || output.success() {
        ProofCheck::Verified
    } else {
        ProofCheck::CheckFailed(None)
    }
}

/// Check `proof` against `cnf`
///
/// Returns the classification and, when the checker ran, its output so the
/// caller can keep a transcript.
pub async fn check_proof<R: ToolRunner + ?Sized>(
    runner: &R,
    checker: Option<&Path>,
    cnf: &Path,
    proof: &Path,
    limit: Duration,
) -> (ProofCheck, Option<ProcessOutput>) {
    if !proof.is_file() {
        warn!("No DRAT certificate at {}", proof.display());
        return (ProofCheck::NoCertificate, None);
    }
    let Some(checker) = checker else {
        debug!("drat-trim not found, skipping proof check");
        return (ProofCheck::CheckerUnavailable, None);
    };

    let args = checker_args(cnf, proof);
    debug!(program = %checker.display(), ?args, "Checking DRAT proof");

    match runner.invoke(checker, &args, None, limit).await {
        Ok(output) => {
            let check = classify_check(&output);
            info!(
                proof = %proof.display(),
                verified = check.is_verified(),
                exit_code = ?output.exit_code,
                "Proof check finished"
            );
            (check, Some(output))
        }
        Err(e) => {
            warn!("Proof check did not complete: {e}");
            (ProofCheck::CheckFailed(Some(e.to_string())), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find_executable;

    fn output(code: Option<i32>, stdout: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: code,
            stdout: stdout.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_notes() {
        assert_eq!(ProofCheck::Verified.note(), "DRAT ok");
        assert_eq!(ProofCheck::CheckFailed(None).note(), "DRAT check failed");
        assert_eq!(
            ProofCheck::CheckFailed(Some("timed out after 1s".into())).note(),
            "DRAT check failed: timed out after 1s"
        );
        assert_eq!(ProofCheck::CheckerUnavailable.note(), "no drat-trim");
        assert_eq!(ProofCheck::NoCertificate.note(), "no DRAT certificate");
    }

    #[test]
    fn test_classify_check() {
        assert_eq!(classify_check(&output(Some(1), "s VERIFIED\n")), ProofCheck::Verified);
        assert_eq!(classify_check(&output(Some(0), "")), ProofCheck::Verified);
        assert_eq!(
            classify_check(&output(Some(1), "s NOT VERIFIED\n")),
            ProofCheck::CheckFailed(None)
        );
        assert_eq!(classify_check(&output(None, "")), ProofCheck::CheckFailed(None));
    }

    #[test]
    fn test_checker_args() {
        assert_eq!(
            checker_args(Path::new("a.cnf"), Path::new("a.drat")),
            vec!["a.cnf", "a.drat", "-q"]
        );
    }

    #[tokio::test]
    async fn test_missing_certificate_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let (check, transcript) = check_proof(
            &crate::SystemRunner,
            Some(Path::new("/usr/bin/drat-trim")),
            &dir.path().join("a.cnf"),
            &dir.path().join("missing.drat"),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(check, ProofCheck::NoCertificate);
        assert!(transcript.is_none());
    }

    #[tokio::test]
    async fn test_missing_checker() {
        let dir = tempfile::tempdir().unwrap();
        let proof = dir.path().join("p.drat");
        std::fs::write(&proof, "0\n").unwrap();
        let (check, _) = check_proof(
            &crate::SystemRunner,
            None,
            &dir.path().join("a.cnf"),
            &proof,
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(check, ProofCheck::CheckerUnavailable);
    }

    #[tokio::test]
    async fn test_real_drat_trim_accepts_trivial_refutation() {
        let Some(drat_trim) = find_executable(DRAT_TRIM) else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let cnf = dir.path().join("tiny.cnf");
        let proof = dir.path().join("tiny.drat");
        std::fs::write(&cnf, "p cnf 1 2\n1 0\n-1 0\n").unwrap();
        std::fs::write(&proof, "0\n").unwrap();

        let (check, transcript) = check_proof(
            &crate::SystemRunner,
            Some(&drat_trim),
            &cnf,
            &proof,
            Duration::from_secs(30),
        )
        .await;
        assert_eq!(check, ProofCheck::Verified);
        assert!(transcript.is_some());
    }
}
