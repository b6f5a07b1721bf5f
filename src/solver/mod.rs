//! Interface to the SAT solver used as a black-box oracle.

pub mod external;
pub mod output;

pub use external::ExternalSolver;
pub use output::*;

use std::path::Path;

use crate::{
    encoding::Assignment,
    errors::{CliqueSatError, Result},
};

/// Exit status of a DIMACS-compliant solver that found a model
pub const EXIT_SATISFIABLE: i32 = 10;

/// Exit status of a DIMACS-compliant solver that proved unsatisfiability
pub const EXIT_UNSATISFIABLE: i32 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable(Assignment),
    Unsatisfiable,
}

/// Verdict of a solver together with its free-form output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverResponse {
    pub verdict: Verdict,
    pub output: String,
}

impl SolverResponse {
    pub fn new(verdict: Verdict, output: String) -> Self {
        Self { verdict, output }
    }

    /// Interprets the exit status of a solver process. Only [`EXIT_SATISFIABLE`] and
    /// [`EXIT_UNSATISFIABLE`] are verdicts; any other status is surfaced as an error.
    pub fn from_exit_code(code: Option<i32>, output: String) -> Result<Self> {
        match code {
            Some(EXIT_SATISFIABLE) => {
                let assignment = parse_model(&output);
                Ok(Self::new(Verdict::Satisfiable(assignment), output))
            }
            Some(EXIT_UNSATISFIABLE) => Ok(Self::new(Verdict::Unsatisfiable, output)),
            _ => Err(CliqueSatError::UnexpectedSolverExit { code, output }),
        }
    }

    /// Statistics lines of the solver output; informational only
    pub fn statistics(&self) -> Vec<String> {
        extract_statistics(&self.output)
    }
}

/// Decides satisfiability of a CNF formula.
///
/// Each call is independent: implementors must not rely on previous submissions. The formula
/// has already been written to `cnf_path`; `cnf_text` holds the very same bytes for oracles
/// that do not work on files.
pub trait SolverOracle {
    fn submit(&mut self, cnf_path: &Path, cnf_text: &[u8]) -> Result<SolverResponse>;
}

impl<O: SolverOracle + ?Sized> SolverOracle for &mut O {
    fn submit(&mut self, cnf_path: &Path, cnf_text: &[u8]) -> Result<SolverResponse> {
        (**self).submit(cnf_path, cnf_text)
    }
}

impl<O: SolverOracle + ?Sized> SolverOracle for Box<O> {
    fn submit(&mut self, cnf_path: &Path, cnf_text: &[u8]) -> Result<SolverResponse> {
        (**self).submit(cnf_path, cnf_text)
    }
}
