//! cvdw CLI
//!
//! Command-line driver for cyclic 4-AP avoidance searches.
//!
//! # Commands
//!
//! - `cvdw sweep` - Solve a range of moduli with external SAT solvers
//! - `cvdw enumerate <p>` - Enumerate valid words and classify their orbits
//! - `cvdw orbits <file>` - Classify the words listed in a file
//! - `cvdw cnf <p> <out>` - Write the DIMACS encoding for one modulus
//! - `cvdw decode <p> <file>` - Turn saved solver output into a word
//! - `cvdw verify <M> <word>` - Check a word, exiting 1 if it fails

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use cvdw_core::{
    decode_lenient, encode, enumerate_valid, first_violation, OrbitSummary, WindowMode, Word,
    WordSetReport,
};
use cvdw_portfolio::SystemRunner;
use cvdw_sweep::{run_sweep, ArtifactStore, SweepConfig, SweepSummary};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cvdw")]
#[command(about = "Search, classify and certify 2-colorings of Z_n without monochromatic 4-APs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every modulus of a range and report the SAT/UNSAT crossing
    Sweep(SweepArgs),
    /// Enumerate all valid words of length p and summarise their orbits
    Enumerate {
        /// Modulus (at most 24)
        #[arg(value_parser = parse_modulus)]
        p: usize,
        /// Directory for solutions_p{p}.txt and orbit_summary_p{p}.json
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,
    },
    /// Classify the words listed one per line in a file
    Orbits {
        /// Word list, e.g. a solutions_p{p}.txt file
        file: PathBuf,
        /// Merge orbits related by the global color swap
        #[arg(long)]
        with_swap: bool,
    },
    /// Write the DIMACS CNF encoding for modulus p
    Cnf {
        #[arg(value_parser = parse_modulus)]
        p: usize,
        /// Output file
        out: PathBuf,
        /// Include progressions that revisit an index
        #[arg(long)]
        strong: bool,
    },
    /// Read a saved solver transcript and print the word it assigns
    Decode {
        #[arg(value_parser = parse_modulus)]
        p: usize,
        /// Solver output; every integer token is read as a literal
        file: PathBuf,
    },
    /// Check a word against every window of Z_M
    Verify {
        #[arg(value_parser = parse_modulus)]
        modulus: usize,
        /// Word over {B, R} of length M
        word: String,
        /// Include progressions that revisit an index
        #[arg(long)]
        strong: bool,
    },
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Load settings from a JSON file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// First modulus [default: 13]
    #[arg(long)]
    start: Option<usize>,
    /// Last modulus [default: 34]
    #[arg(long)]
    end: Option<usize>,
    /// Output directory [default: results]
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// CSV report name inside the output directory [default: wc42_results.csv]
    #[arg(long)]
    csv: Option<String>,
    /// TSV report name inside the output directory [default: wc42_results.tsv]
    #[arg(long)]
    tsv: Option<String>,
    /// Do not write the CSV report
    #[arg(long, conflicts_with = "csv")]
    no_csv: bool,
    /// Do not write the TSV report
    #[arg(long, conflicts_with = "tsv")]
    no_tsv: bool,
    /// Prefer Kissat even if CaDiCaL is available (no DRAT)
    #[arg(long)]
    prefer_kissat: bool,
    /// Time limit per solver or checker run, in seconds [default: 600]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Include progressions that revisit an index
    #[arg(long)]
    strong: bool,
    /// CaDiCaL executable
    #[arg(long, value_name = "PATH")]
    cadical: Option<PathBuf>,
    /// Kissat executable
    #[arg(long, value_name = "PATH")]
    kissat: Option<PathBuf>,
    /// drat-trim executable
    #[arg(long, value_name = "PATH")]
    drat_trim: Option<PathBuf>,
}

impl SweepArgs {
    /// Effective configuration: defaults, then the config file, then flags
    fn into_config(self) -> anyhow::Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid configuration in {}", path.display()))?
            }
            None => SweepConfig::default(),
        };

        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if let Some(outdir) = self.outdir {
            config.outdir = outdir;
        }
        if self.csv.is_some() {
            config.csv = self.csv;
        }
        if self.tsv.is_some() {
            config.tsv = self.tsv;
        }
        if self.no_csv {
            config.csv = None;
        }
        if self.no_tsv {
            config.tsv = None;
        }
        if self.prefer_kissat {
            config.solver.prefer_alternative = true;
        }
        if let Some(secs) = self.timeout {
            config.solver.timeout = Duration::from_secs(secs);
        }
        if self.strong {
            config.mode = WindowMode::Strong;
        }
        if self.cadical.is_some() {
            config.solver.cadical_path = self.cadical;
        }
        if self.kissat.is_some() {
            config.solver.kissat_path = self.kissat;
        }
        if self.drat_trim.is_some() {
            config.solver.drat_trim_path = self.drat_trim;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_modulus(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("modulus must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Report a usage error the way clap does and exit with status 2
fn usage_error(message: impl fmt::Display) -> ! {
    Cli::command().error(ErrorKind::ValueValidation, message).exit()
}

fn mode(strong: bool) -> WindowMode {
    if strong {
        WindowMode::Strong
    } else {
        WindowMode::Cyclic
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Sweep(args) => {
            let config = args.into_config().unwrap_or_else(|e| usage_error(format!("{e:#}")));
            sweep(&config).await?;
            0
        }
        Commands::Enumerate { p, outdir } => {
            enumerate(p, &outdir).await?;
            0
        }
        Commands::Orbits { file, with_swap } => {
            orbits(&file, with_swap)?;
            0
        }
        Commands::Cnf { p, out, strong } => {
            write_cnf(p, &out, mode(strong)).await?;
            0
        }
        Commands::Decode { p, file } => {
            decode(p, &file)?;
            0
        }
        Commands::Verify {
            modulus,
            word,
            strong,
        } => verify(modulus, &word, mode(strong)),
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn sweep(config: &SweepConfig) -> anyhow::Result<()> {
    debug!(?config, "Effective sweep configuration");
    println!("M\tStatus\tWitness/Note\tProof");
    let summary = run_sweep(config, &SystemRunner, |row| {
        println!(
            "{}\t{}\t{}\t{}",
            row.modulus,
            row.status(),
            row.witness_or_note(),
            row.proof_note()
        );
    })
    .await?;

    for path in [&summary.csv_path, &summary.tsv_path].into_iter().flatten() {
        println!("[wrote] {}", path.display());
    }
    if let Some(line) = crossing_headline(&summary) {
        println!("\n{line}\n");
    }
    Ok(())
}

fn crossing_headline(summary: &SweepSummary) -> Option<String> {
    let m = summary.crossing()?;
    Some(format!(
        "Summary: SAT at M={} and UNSAT at M={m} -> W_c(4,2)={m}.",
        m - 1
    ))
}

async fn enumerate(p: usize, outdir: &Path) -> anyhow::Result<()> {
    let words = enumerate_valid(p).unwrap_or_else(|e| usage_error(e));
    let summary = OrbitSummary::from_words(p, &words);
    let store = ArtifactStore::create(outdir).await?;
    store.write_enumeration(&words, &summary).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Parse a word list: one word per line, blank lines skipped
fn parse_word_list(text: &str) -> Result<BTreeSet<Word>, String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| line.parse::<Word>().map_err(|e| format!("line {}: {e}", i + 1)))
        .collect()
}

fn orbits(file: &Path, with_swap: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let words = parse_word_list(&text).unwrap_or_else(|e| usage_error(e));
    let report = WordSetReport::new(&words, with_swap);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn write_cnf(p: usize, out: &Path, mode: WindowMode) -> anyhow::Result<()> {
    let cnf = encode(p, mode);
    tokio::fs::write(out, cnf.to_dimacs())
        .await
        .with_context(|| format!("cannot write {}", out.display()))?;
    println!("[wrote] {}", out.display());
    Ok(())
}

fn decode(p: usize, file: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
    let word = decode_lenient(&String::from_utf8_lossy(&bytes), p);
    println!("{word}");
    Ok(())
}

/// Print `OK` or the first failing window; returns the exit status
fn verify(modulus: usize, text: &str, mode: WindowMode) -> i32 {
    let word = Word::parse_with_len(text, modulus).unwrap_or_else(|e| usage_error(e));
    let line = verdict_line(&word, mode);
    println!("{line}");
    if line == "OK" {
        0
    } else {
        1
    }
}

fn verdict_line(word: &Word, mode: WindowMode) -> String {
    match first_violation(word, mode) {
        None => "OK".to_string(),
        Some(window) => {
            let block: String = window.block(word).iter().map(|c| c.as_char()).collect();
            format!("FAIL at {window} block={block}")
        }
    }
}
