//! Scripted stand-in for the external tools

#![allow(dead_code)]

use async_trait::async_trait;
use cvdw_core::{enumerate_valid, model_lines, Color, Word};
use cvdw_portfolio::{InvokeError, ProcessOutput, ToolRunner};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

pub type Script = dyn Fn(&str, &[String]) -> Result<ProcessOutput, InvokeError> + Send + Sync;

/// Pretends a set of tools is installed and answers invocations from a script
///
/// The script receives the tool name (`cadical`, `kissat`, `drat-trim`) and
/// the arguments it was called with.
pub struct FakeRunner {
    installed: Vec<&'static str>,
    script: Box<Script>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn new(
        installed: &[&'static str],
        script: impl Fn(&str, &[String]) -> Result<ProcessOutput, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            installed: installed.to_vec(),
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Tool names in invocation order
    pub fn tools_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.installed
            .contains(&tool)
            .then(|| PathBuf::from("/fake/bin").join(tool))
    }

    async fn invoke(
        &self,
        program: &Path,
        args: &[String],
        _input: Option<&str>,
        _limit: Duration,
    ) -> Result<ProcessOutput, InvokeError> {
        let tool = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls
            .lock()
            .unwrap()
            .push((tool.clone(), args.to_vec()));
        (self.script)(&tool, args)
    }
}

pub fn output(code: i32, stdout: impl Into<String>) -> ProcessOutput {
    ProcessOutput {
        exit_code: Some(code),
        stdout: stdout.into(),
        stderr: String::new(),
        duration: Duration::from_millis(1),
    }
}

pub fn sat(word: &Word) -> Result<ProcessOutput, InvokeError> {
    Ok(output(10, format!("c fake\ns SATISFIABLE\n{}", model_lines(word))))
}

pub fn unsat() -> Result<ProcessOutput, InvokeError> {
    Ok(output(20, "c fake\ns UNSATISFIABLE\n"))
}

/// CaDiCaL-style UNSAT that also writes its certificate to `args[1]`
pub fn unsat_with_proof(args: &[String]) -> Result<ProcessOutput, InvokeError> {
    std::fs::write(&args[1], "1 0\n0\n").unwrap();
    unsat()
}

pub fn verified() -> Result<ProcessOutput, InvokeError> {
    Ok(output(0, "s VERIFIED\n"))
}

/// Modulus encoded in a `avoid_M{m}.cnf` argument
pub fn modulus_of(args: &[String]) -> usize {
    let cnf = args
        .iter()
        .find(|a| a.ends_with(".cnf"))
        .expect("a CNF argument");
    let name = Path::new(cnf).file_stem().unwrap().to_string_lossy();
    name.trim_start_matches("avoid_M").parse().unwrap()
}

/// Smallest valid word of length `m`, or an all-`B` word if there is none
pub fn valid_word(m: usize) -> Word {
    enumerate_valid(m)
        .ok()
        .and_then(|words| words.into_iter().next())
        .unwrap_or_else(|| Word::uniform(m, Color::B))
}
