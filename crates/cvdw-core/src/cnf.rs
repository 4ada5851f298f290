//! DIMACS CNF encoding of the avoidance problem
//!
//! Index `i` becomes variable `i + 1`; a true variable means color `R`.
//! Each window contributes two clauses:
//!
//! ```text
//!  a  b  c  d 0    forbids BBBB
//! -a -b -c -d 0    forbids RRRR
//! ```
//!
//! Nothing is simplified and no symmetry breaking is added, so checking a
//! model against the instance stays trivial.

use crate::window::{windows, Window, WindowMode};
use std::fmt::{self, Write as _};

/// A CNF formula over variables `1..=num_vars`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfInstance {
    pub num_vars: usize,
    pub clauses: Vec<Vec<i32>>,
}

impl CnfInstance {
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Whether `assignment[i]` (the value of variable `i + 1`) satisfies
    /// every clause; variables past the end of `assignment` read as false
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                let value = assignment
                    .get(lit.unsigned_abs() as usize - 1)
                    .copied()
                    .unwrap_or(false);
                value == (lit > 0)
            })
        })
    }

    /// Render as DIMACS text: header, then one `0`-terminated clause per line
    pub fn to_dimacs(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CnfInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        let mut line = String::new();
        for clause in &self.clauses {
            line.clear();
            for lit in clause {
                write!(line, "{lit} ")?;
            }
            line.push('0');
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// DIMACS variable of position `index`
pub fn var(index: usize) -> i32 {
    debug_assert!(index < i32::MAX as usize, "index outside the DIMACS variable range");
    (index + 1) as i32
}

/// Encode the avoidance problem for `Z_n`
pub fn encode(n: usize, mode: WindowMode) -> CnfInstance {
    let mut clauses = Vec::new();
    for window in windows(n, mode) {
        let positive = window_literals(&window);
        let negative = positive.iter().map(|&v| -v).collect();
        clauses.push(positive);
        clauses.push(negative);
    }
    CnfInstance {
        num_vars: n,
        clauses,
    }
}

/// Positive literals of a window, first occurrence of each index only
fn window_literals(window: &Window) -> Vec<i32> {
    let mut literals: Vec<i32> = Vec::with_capacity(4);
    for index in window.indices() {
        let v = var(index);
        if !literals.contains(&v) {
            literals.push(v);
        }
    }
    literals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{is_valid, window_count};
    use crate::word::Word;

    #[test]
    fn test_clause_count_is_twice_window_count() {
        for n in 0..=15 {
            let cnf = encode(n, WindowMode::Cyclic);
            assert_eq!(cnf.num_clauses(), 2 * window_count(n, WindowMode::Cyclic));
            assert_eq!(cnf.num_vars, n);
        }
    }

    #[test]
    fn test_dimacs_layout_for_five() {
        let text = encode(5, WindowMode::Cyclic).to_dimacs();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "p cnf 5 40");
        assert_eq!(lines[1], "1 2 3 4 0");
        assert_eq!(lines[2], "-1 -2 -3 -4 0");
        assert_eq!(lines.len(), 41);
        assert!(text.ends_with("0\n"));
    }

    #[test]
    fn test_small_moduli_have_no_clauses() {
        for n in 1..4 {
            let cnf = encode(n, WindowMode::Cyclic);
            assert_eq!(cnf.to_dimacs(), format!("p cnf {n} 0\n"));
            assert!(cnf.is_satisfied_by(&[]));
        }
    }

    #[test]
    fn test_strong_mode_collapses_repeated_literals() {
        let cnf = encode(3, WindowMode::Strong);
        assert_eq!(cnf.num_clauses(), 12);
        assert_eq!(cnf.clauses[0], vec![1, 2, 3]);
        assert_eq!(cnf.clauses[1], vec![-1, -2, -3]);
    }

    #[test]
    fn test_satisfaction_matches_validity() {
        let cnf = encode(8, WindowMode::Cyclic);
        for bits in 0..(1u64 << 8) {
            let word = Word::from_bits(bits, 8);
            assert_eq!(cnf.is_satisfied_by(&word.assignment()), is_valid(&word), "{word}");
        }
    }
}
