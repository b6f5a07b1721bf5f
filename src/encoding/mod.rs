//! Reduction of "does the graph contain a clique of size exactly k?" to CNF-SAT.
//!
//! The boolean variable `At(v, p)` states that vertex `v` (a 1-based DIMACS label) occupies
//! slot `p` (0-based) of the clique. See [`VariableIndexer`] for the numbering and
//! [`encode_clique`] for the clause families.

pub mod assignment;
pub mod clique_encoder;
pub mod cnf_writer;
pub mod decoder;
pub mod formula;
pub mod indexer;

pub use assignment::*;
pub use clique_encoder::*;
pub use cnf_writer::*;
pub use decoder::*;
pub use formula::*;
pub use indexer::*;

use crate::{
    errors::{CliqueSatError, Result},
    graph::NumNodes,
};

/// Positive DIMACS variable id
pub type Variable = u32;

/// Signed DIMACS literal; never zero
pub type Literal = i32;

/// Converts a signed clique size as provided by a user into the unsigned size used throughout
/// the crate. Zero is accepted and yields the (trivially satisfiable) empty-clique formula.
pub fn checked_clique_size(k: i64) -> Result<NumNodes> {
    NumNodes::try_from(k).map_err(|_| CliqueSatError::InvalidCliqueSize(k))
}
