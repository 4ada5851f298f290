//! Sweeping a range of moduli

use crate::artifacts::{ArtifactError, ArtifactStore};
use crate::config::{ConfigError, SweepConfig};
use crate::orchestrator::Orchestrator;
use crate::report::{render, ReportFormat};
use crate::result::ModulusOutcome;
use cvdw_portfolio::{SatStatus, ToolRunner};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Rows of a finished sweep and the reports written for them
#[derive(Debug, Clone)]
pub struct SweepSummary {
    pub start: usize,
    pub end: usize,
    pub outcomes: Vec<ModulusOutcome>,
    pub config_path: PathBuf,
    pub csv_path: Option<PathBuf>,
    pub tsv_path: Option<PathBuf>,
}

impl SweepSummary {
    pub fn outcome(&self, m: usize) -> Option<&ModulusOutcome> {
        self.outcomes.iter().find(|o| o.modulus == m)
    }

    /// `Some(end)` when the sweep ends exactly at the threshold: SAT at
    /// `end - 1` and UNSAT at `end`, so `W_c(4,2) = end`
    pub fn crossing(&self) -> Option<usize> {
        let below = self.outcome(self.end.checked_sub(1)?)?;
        let at = self.outcome(self.end)?;
        (below.status() == SatStatus::Sat && at.status() == SatStatus::Unsat).then_some(self.end)
    }

    pub fn count(&self, status: SatStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status() == status).count()
    }
}

/// Solve every modulus of `config` in order
///
/// `on_row` sees each outcome as soon as it exists, and the reports are
/// rewritten after every row, so an interrupted sweep keeps what it found.
pub async fn run_sweep<R, F>(
    config: &SweepConfig,
    runner: &R,
    mut on_row: F,
) -> Result<SweepSummary, SweepError>
where
    R: ToolRunner + ?Sized,
    F: FnMut(&ModulusOutcome),
{
    config.validate()?;

    let store = ArtifactStore::create(&config.outdir).await?;
    let config_path = store.path(SweepConfig::FILE_NAME);
    store.write(&config_path, &config.to_json()?).await?;

    let orchestrator = Orchestrator::discover(runner, store, config.mode, config.solver.clone());
    info!(
        start = config.start,
        end = config.end,
        mode = ?config.mode,
        outdir = %config.outdir.display(),
        "Starting sweep"
    );

    let mut summary = SweepSummary {
        start: config.start,
        end: config.end,
        outcomes: Vec::with_capacity(config.moduli().count()),
        config_path,
        csv_path: config.csv_path(),
        tsv_path: config.tsv_path(),
    };

    for m in config.moduli() {
        let outcome = orchestrator.solve_modulus(m).await;
        on_row(&outcome);
        summary.outcomes.push(outcome);
        write_reports(orchestrator.store(), &summary).await;
    }

    if let Some(threshold) = summary.crossing() {
        info!(threshold, "Crossing found: SAT below, UNSAT at the end of the range");
    }
    Ok(summary)
}

async fn write_reports(store: &ArtifactStore, summary: &SweepSummary) {
    let targets = [
        (summary.csv_path.as_ref(), ReportFormat::Csv),
        (summary.tsv_path.as_ref(), ReportFormat::Tsv),
    ];
    for (path, format) in targets {
        let Some(path) = path else { continue };
        if let Err(e) = store.write(path, &render(&summary.outcomes, format)).await {
            warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Verdict;
    use cvdw_portfolio::ProofCheck;
    use std::time::Duration;

    fn summary(end: usize, rows: &[(usize, Verdict)]) -> SweepSummary {
        SweepSummary {
            start: rows.first().map_or(end, |r| r.0),
            end,
            outcomes: rows
                .iter()
                .map(|(m, v)| ModulusOutcome {
                    modulus: *m,
                    verdict: v.clone(),
                    solver: None,
                    duration: Duration::ZERO,
                })
                .collect(),
            config_path: PathBuf::from("sweep_config.json"),
            csv_path: None,
            tsv_path: None,
        }
    }

    fn sat() -> Verdict {
        Verdict::Sat { witness: None }
    }

    fn unsat() -> Verdict {
        Verdict::Unsat {
            proof: ProofCheck::Verified,
        }
    }

    #[test]
    fn test_crossing_at_end() {
        let s = summary(35, &[(33, sat()), (34, sat()), (35, unsat())]);
        assert_eq!(s.crossing(), Some(35));
        assert_eq!(s.count(SatStatus::Sat), 2);
    }

    #[test]
    fn test_no_crossing_when_end_is_sat() {
        let s = summary(34, &[(33, sat()), (34, sat())]);
        assert_eq!(s.crossing(), None);
    }

    #[test]
    fn test_no_crossing_when_below_is_unknown() {
        let s = summary(35, &[(34, Verdict::unknown("timed out")), (35, unsat())]);
        assert_eq!(s.crossing(), None);
    }

    #[test]
    fn test_no_crossing_for_single_row() {
        let s = summary(35, &[(35, unsat())]);
        assert_eq!(s.crossing(), None);
    }
}
