use std::{error::Error, path::PathBuf};

use thiserror::Error;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> std::result::Result<(), E>;
}

#[derive(Debug, Error)]
pub enum CliqueSatError {
    #[error("invalid graph input in line {line}: {message}")]
    Input { line: usize, message: String },

    #[error("vertex {vertex} is out of range [1, {number_of_nodes}]")]
    VertexOutOfRange { vertex: u32, number_of_nodes: u32 },

    #[error("position {position} is out of range [0, {clique_size})")]
    PositionOutOfRange { position: u32, clique_size: u32 },

    #[error("invalid clique size {0}; k must be a non-negative 32 bit integer")]
    InvalidCliqueSize(i64),

    #[error("formula with {number_of_nodes} * {clique_size} variables exceeds the DIMACS literal range")]
    FormulaTooLarge { number_of_nodes: u32, clique_size: u32 },

    #[error("assignment holds {actual} literals but {expected} variables were declared")]
    AssignmentTooShort { expected: usize, actual: usize },

    #[error("solver returned unexpected exit code {}", display_exit_code(.code))]
    UnexpectedSolverExit { code: Option<i32>, output: String },

    #[error("solver did not finish within {0:?}")]
    SolverTimeout(std::time::Duration),

    #[error("cannot start solver {binary:?}: {source}")]
    SolverUnavailable {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliqueSatError>;

fn display_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".into(),
    }
}

impl CliqueSatError {
    pub(crate) fn input(line: usize, message: impl Into<String>) -> Self {
        Self::Input {
            line,
            message: message.into(),
        }
    }
}
