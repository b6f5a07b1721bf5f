use itertools::Itertools;

use super::{Assignment, VariableIndexer};
use crate::{
    errors::{CliqueSatError, Result},
    graph::NumNodes,
    utils::Clique,
};

/// Recovers the vertices selected by a model of [`super::encode_clique`]: vertex `v` is part
/// of the result iff `At(v, p)` is true for at least one position `p`.
///
/// Fails with [`CliqueSatError::AssignmentTooShort`] if the assignment covers fewer than
/// `n * k` variables. Surplus literals are ignored.
pub fn decode_clique(
    assignment: &Assignment,
    clique_size: NumNodes,
    number_of_nodes: NumNodes,
) -> Result<Clique> {
    let indexer = VariableIndexer::new(number_of_nodes, clique_size)?;
    let expected = indexer.number_of_variables() as usize;
    if assignment.len() < expected {
        return Err(CliqueSatError::AssignmentTooShort {
            expected,
            actual: assignment.len(),
        });
    }

    let mut clique = Clique::new(number_of_nodes);
    for v in 1..=number_of_nodes {
        let selected = (0..clique_size)
            .map(|p| indexer.index(v, p))
            .process_results(|mut vars| {
                vars.any(|var| assignment.value_of(var) == Some(true))
            })?;

        if selected {
            clique.add_node(v - 1);
        }
    }

    Ok(clique)
}
