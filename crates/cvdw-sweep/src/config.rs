//! Sweep and solver configuration

use cvdw_core::WindowMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors in a sweep configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("empty sweep range: start {start} is greater than end {end}")]
    InvertedRange { start: usize, end: usize },

    #[error("modulus must be at least 1")]
    ZeroModulus,

    #[error("report file name must not be empty")]
    EmptyReportName,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How external solvers are found and run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Per-invocation time limit for solvers and the proof checker
    pub timeout: Duration,

    /// Send moduli to Kissat even when CaDiCaL is installed (no certificates)
    pub prefer_alternative: bool,

    /// Explicit CaDiCaL executable (looked up on `PATH` if None)
    pub cadical_path: Option<PathBuf>,

    /// Explicit Kissat executable (looked up on `PATH` if None)
    pub kissat_path: Option<PathBuf>,

    /// Explicit drat-trim executable (looked up on `PATH` if None)
    pub drat_trim_path: Option<PathBuf>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            prefer_alternative: false,
            cadical_path: None,
            kissat_path: None,
            drat_trim_path: None,
        }
    }
}

/// A sweep over the moduli `start..=end`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: usize,
    pub end: usize,

    /// Directory for every artifact and report
    pub outdir: PathBuf,

    /// CSV report file name inside `outdir` (None disables the report)
    pub csv: Option<String>,

    /// TSV report file name inside `outdir` (None disables the report)
    pub tsv: Option<String>,

    pub mode: WindowMode,

    pub solver: SolverConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 13,
            end: 34,
            outdir: PathBuf::from("results"),
            csv: Some("wc42_results.csv".to_string()),
            tsv: Some("wc42_results.tsv".to_string()),
            mode: WindowMode::Cyclic,
            solver: SolverConfig::default(),
        }
    }
}

impl SweepConfig {
    /// File name of the effective configuration written into `outdir`
    pub const FILE_NAME: &'static str = "sweep_config.json";

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start == 0 {
            return Err(ConfigError::ZeroModulus);
        }
        if self.start > self.end {
            return Err(ConfigError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        let names = [self.csv.as_deref(), self.tsv.as_deref()];
        if names.into_iter().flatten().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyReportName);
        }
        Ok(())
    }

    /// Moduli covered by the sweep, ascending
    pub fn moduli(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn csv_path(&self) -> Option<PathBuf> {
        self.csv.as_ref().map(|name| self.outdir.join(name))
    }

    pub fn tsv_path(&self) -> Option<PathBuf> {
        self.tsv.as_ref().map(|name| self.outdir.join(name))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
