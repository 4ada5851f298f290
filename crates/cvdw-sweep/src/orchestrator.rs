//! Solving a single modulus
//!
//! Each modulus goes `ENCODED -> INVOKED -> {SAT, UNSAT, UNKNOWN}`. Every
//! failure along the way (a missing tool, a timeout, an unreadable model)
//! ends up in the returned [`ModulusOutcome`]; nothing here is fatal.

use crate::artifacts::ArtifactStore;
use crate::config::SolverConfig;
use crate::result::{ModulusOutcome, Verdict, NO_SOLVER};
use cvdw_core::{decode, encode, verify_in, Color, WindowMode, Witness, Word};
use cvdw_portfolio::{
    check_proof, choose, needs_fallback, run_solver, status_line, Choice, ProofCheck, SatStatus,
    SolverKind, SolverRun, Toolchain, ToolRunner,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Marker placed before the alternative solver's output in a model file
pub const FALLBACK_MARKER: &str = "\n# kissat stdout\n";

/// Drives the external tools for one modulus at a time
pub struct Orchestrator<'a, R: ToolRunner + ?Sized> {
    runner: &'a R,
    tools: Toolchain,
    store: ArtifactStore,
    mode: WindowMode,
    config: SolverConfig,
}

impl<'a, R: ToolRunner + ?Sized> Orchestrator<'a, R> {
    pub fn new(
        runner: &'a R,
        tools: Toolchain,
        store: ArtifactStore,
        mode: WindowMode,
        config: SolverConfig,
    ) -> Self {
        Self {
            runner,
            tools,
            store,
            mode,
            config,
        }
    }

    /// Resolve tools through `runner` using the paths in `config`
    pub fn discover(
        runner: &'a R,
        store: ArtifactStore,
        mode: WindowMode,
        config: SolverConfig,
    ) -> Self {
        let tools = Toolchain::discover(
            runner,
            config.cadical_path.as_deref(),
            config.kissat_path.as_deref(),
            config.drat_trim_path.as_deref(),
        );
        Self::new(runner, tools, store, mode, config)
    }

    pub fn tools(&self) -> &Toolchain {
        &self.tools
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Encode, solve and certify modulus `m`
    pub async fn solve_modulus(&self, m: usize) -> ModulusOutcome {
        let start = Instant::now();
        let (verdict, solver) = self.decide(m).await;
        let outcome = ModulusOutcome {
            modulus: m,
            verdict,
            solver,
            duration: start.elapsed(),
        };
        info!(
            modulus = m,
            status = %outcome.status(),
            solver = ?outcome.solver,
            duration_ms = outcome.duration.as_millis() as u64,
            "Modulus finished"
        );
        outcome
    }

    async fn decide(&self, m: usize) -> (Verdict, Option<SolverKind>) {
        let cnf = encode(m, self.mode);
        let cnf_path = self.store.cnf_path(m);
        if let Err(e) = self.store.write(&cnf_path, &cnf.to_dimacs()).await {
            return (Verdict::unknown(e.to_string()), None);
        }
        debug!(
            modulus = m,
            vars = cnf.num_vars,
            clauses = cnf.num_clauses(),
            "Wrote CNF"
        );

        if cnf.num_clauses() == 0 {
            // No window fits, so every coloring is valid.
            let word = Word::uniform(m, Color::B);
            self.save_witness(m, &word).await;
            let witness = Witness::check(word, self.mode);
            return (Verdict::Sat { witness: Some(witness) }, None);
        }

        let choice = choose(
            self.tools.cadical.is_some(),
            self.tools.kissat.is_some(),
            self.config.prefer_alternative,
        );
        let kind = match choice {
            Choice::Primary => SolverKind::CaDiCaL,
            Choice::Alternative => SolverKind::Kissat,
            Choice::None => {
                warn!(modulus = m, "No SAT solver available");
                return (Verdict::unknown(NO_SOLVER), None);
            }
        };
        let Some(program) = self.tools.solver(kind) else {
            return (Verdict::unknown(NO_SOLVER), None);
        };

        let proof_path = self.store.proof_path(m);
        if kind.emits_certificate() {
            // A stale certificate from an earlier run must not be checked.
            let _ = tokio::fs::remove_file(&proof_path).await;
        }

        let run = match run_solver(
            self.runner,
            kind,
            program,
            &cnf_path,
            &proof_path,
            self.config.timeout,
        )
        .await
        {
            Ok(run) => run,
            Err(e) => {
                warn!(modulus = m, solver = %kind, "Solver invocation failed: {e}");
                return (Verdict::unknown(format!("{kind} {e}")), Some(kind));
            }
        };

        match run.status {
            SatStatus::Sat => self.on_sat(m, run, &cnf_path, &proof_path).await,
            SatStatus::Unsat => {
                let proof = if kind.emits_certificate() {
                    self.check_certificate(m, &cnf_path, &proof_path).await
                } else {
                    ProofCheck::NoCertificate
                };
                (Verdict::Unsat { proof }, Some(kind))
            }
            SatStatus::Unknown => {
                let exit = match run.output.exit_code {
                    Some(code) => format!("exit code {code}"),
                    None => "killed".to_string(),
                };
                let reason = match status_line(&run.output.stdout, &run.output.stderr) {
                    Some(answer) => format!("{kind} reported {} ({exit})", answer.trim()),
                    None => format!("no status line from {kind} ({exit})"),
                };
                warn!(modulus = m, "{reason}");
                (Verdict::unknown(reason), Some(kind))
            }
        }
    }

    async fn on_sat(
        &self,
        m: usize,
        run: SolverRun,
        cnf_path: &Path,
        proof_path: &Path,
    ) -> (Verdict, Option<SolverKind>) {
        let model_path = self.store.model_path(m);
        if let Err(e) = self.store.write(&model_path, &run.output.stdout).await {
            warn!("{e}");
        }

        let mut source = run.kind;
        let mut word = decode(&run.output.stdout, m);
        let mut valid = word.as_ref().is_some_and(|w| verify_in(w, self.mode));

        if needs_fallback(word.as_ref(), valid) && run.kind == SolverKind::CaDiCaL {
            if let Some(kissat) = self.tools.kissat.as_deref() {
                warn!(
                    modulus = m,
                    decoded = word.is_some(),
                    "Primary model unusable, asking Kissat"
                );
                if let Some((alt_word, alt_valid)) =
                    self.fallback(m, kissat, cnf_path, proof_path).await
                {
                    if alt_valid || word.is_none() {
                        word = Some(alt_word);
                        valid = alt_valid;
                        source = SolverKind::Kissat;
                    }
                }
            }
        }

        let Some(word) = word else {
            warn!(modulus = m, "SAT reported but no model could be decoded");
            return (Verdict::Sat { witness: None }, Some(source));
        };

        self.save_witness(m, &word).await;
        if !valid {
            warn!(modulus = m, %word, "Witness fails re-validation");
        }
        let witness = Witness {
            word,
            verified: valid,
        };
        (Verdict::Sat { witness: Some(witness) }, Some(source))
    }

    /// Re-solve with Kissat, appending its output to the model file
    async fn fallback(
        &self,
        m: usize,
        kissat: &Path,
        cnf_path: &Path,
        proof_path: &Path,
    ) -> Option<(Word, bool)> {
        let run = match run_solver(
            self.runner,
            SolverKind::Kissat,
            kissat,
            cnf_path,
            proof_path,
            self.config.timeout,
        )
        .await
        {
            Ok(run) => run,
            Err(e) => {
                warn!(modulus = m, "Fallback solver failed: {e}");
                return None;
            }
        };
        if run.status != SatStatus::Sat {
            warn!(modulus = m, status = %run.status, "Fallback solver did not confirm SAT");
            return None;
        }

        let model_path = self.store.model_path(m);
        let appended = format!("{FALLBACK_MARKER}{}", run.output.stdout);
        if let Err(e) = self.store.append(&model_path, &appended).await {
            warn!("{e}");
        }

        let word = decode(&run.output.stdout, m)?;
        let valid = verify_in(&word, self.mode);
        debug!(modulus = m, %word, valid, "Fallback model decoded");
        Some((word, valid))
    }

    async fn check_certificate(&self, m: usize, cnf_path: &Path, proof_path: &Path) -> ProofCheck {
        let (check, transcript) = check_proof(
            self.runner,
            self.tools.drat_trim.as_deref(),
            cnf_path,
            proof_path,
            self.config.timeout,
        )
        .await;
        if let Some(output) = transcript {
            let check_path = self.store.check_path(m);
            if let Err(e) = self.store.write(&check_path, &output.combined()).await {
                warn!("{e}");
            }
        }
        check
    }

    async fn save_witness(&self, m: usize, word: &Word) {
        let path = self.store.witness_path(m);
        if let Err(e) = self.store.write(&path, &format!("{word}\n")).await {
            warn!("{e}");
        }
    }
}
