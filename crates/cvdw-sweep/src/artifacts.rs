//! Files written during a run, keyed by modulus
//!
//! | File | Contents |
//! |------|----------|
//! | `avoid_M{m}.cnf` | DIMACS instance |
//! | `proof_M{m}.drat` | CaDiCaL refutation |
//! | `proof_M{m}.drat.check.txt` | drat-trim stdout and stderr |
//! | `model_M{m}.txt` | raw solver stdout of a SAT run |
//! | `witness_M{m}.txt` | decoded word, newline-terminated |
//! | `solutions_p{p}.txt` | enumerated valid words, one per line |
//! | `orbit_summary_p{p}.json` | orbit classification of those words |

use cvdw_core::{OrbitSummary, Word};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Output directory of a run
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open `dir`, creating it if needed
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ArtifactError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn cnf_path(&self, m: usize) -> PathBuf {
        self.path(&format!("avoid_M{m}.cnf"))
    }

    pub fn proof_path(&self, m: usize) -> PathBuf {
        self.path(&format!("proof_M{m}.drat"))
    }

    pub fn check_path(&self, m: usize) -> PathBuf {
        self.path(&format!("proof_M{m}.drat.check.txt"))
    }

    pub fn model_path(&self, m: usize) -> PathBuf {
        self.path(&format!("model_M{m}.txt"))
    }

    pub fn witness_path(&self, m: usize) -> PathBuf {
        self.path(&format!("witness_M{m}.txt"))
    }

    pub fn solutions_path(&self, p: usize) -> PathBuf {
        self.path(&format!("solutions_p{p}.txt"))
    }

    pub fn orbit_summary_path(&self, p: usize) -> PathBuf {
        self.path(&format!("orbit_summary_p{p}.json"))
    }

    /// Replace the contents of `path`
    pub async fn write(&self, path: &Path, contents: &str) -> Result<(), ArtifactError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| ArtifactError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Append to `path`, creating it if needed
    pub async fn append(&self, path: &Path, contents: &str) -> Result<(), ArtifactError> {
        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(contents.as_bytes()).await?;
            file.flush().await
        }
        .await;
        result.map_err(|source| ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the word list and orbit report of an enumeration, returning
    /// both paths
    pub async fn write_enumeration(
        &self,
        words: &[Word],
        summary: &OrbitSummary,
    ) -> Result<(PathBuf, PathBuf), ArtifactError> {
        let solutions = self.solutions_path(summary.p);
        let listing: String = words.iter().map(|w| format!("{w}\n")).collect();
        self.write(&solutions, &listing).await?;

        let report = self.orbit_summary_path(summary.p);
        let json = serde_json::to_string_pretty(summary).map_err(|source| {
            ArtifactError::Serialize {
                path: report.clone(),
                source,
            }
        })?;
        self.write(&report, &format!("{json}\n")).await?;

        Ok((solutions, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_paths_are_keyed_by_modulus() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path()).await.unwrap();
        assert_eq!(store.cnf_path(17), dir.path().join("avoid_M17.cnf"));
        assert_eq!(store.proof_path(17), dir.path().join("proof_M17.drat"));
        assert_eq!(
            store.check_path(17),
            dir.path().join("proof_M17.drat.check.txt")
        );
        assert_eq!(store.model_path(17), dir.path().join("model_M17.txt"));
        assert_eq!(store.witness_path(17), dir.path().join("witness_M17.txt"));
        assert_eq!(store.solutions_path(7), dir.path().join("solutions_p7.txt"));
        assert_eq!(
            store.orbit_summary_path(7),
            dir.path().join("orbit_summary_p7.json")
        );
    }

    #[tokio::test]
    async fn test_create_makes_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = ArtifactStore::create(&nested).await.unwrap();
        assert!(store.dir().is_dir());
    }

    #[tokio::test]
    async fn test_write_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path()).await.unwrap();
        let path = store.model_path(5);
        store.write(&path, "first\n").await.unwrap();
        store.append(&path, "second\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        store.write(&path, "replaced\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "replaced\n");
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path()).await.unwrap();
        let err = store
            .write(&dir.path().join("missing").join("x.txt"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Write { .. }));
    }

    #[tokio::test]
    async fn test_write_enumeration() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path()).await.unwrap();
        let words = cvdw_core::enumerate_valid(5).unwrap();
        let summary = OrbitSummary::from_words(5, &words);

        let (solutions, report) = store.write_enumeration(&words, &summary).await.unwrap();
        let listing = std::fs::read_to_string(solutions).unwrap();
        assert_eq!(listing.lines().count(), 20);
        assert_eq!(listing.lines().next(), Some("BBBRR"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(json["p"], 5);
        assert_eq!(json["num_valid"], 20);
        assert_eq!(json["Dp_orbits"].as_array().unwrap().len(), 4);
        assert_eq!(json["Dp_x_tau_orbits"].as_array().unwrap().len(), 2);
    }
}
