use itertools::Itertools;
use log::debug;

use super::{CnfFormula, VariableIndexer};
use crate::{
    errors::Result,
    graph::{AdjacencyTest, GraphNodeOrder, NumEdges, NumNodes},
};

/// Number of unordered pairs of an `n` element set
fn pairs(n: u64) -> u64 {
    n * n.saturating_sub(1) / 2
}

/// Number of clauses [`encode_clique`] emits for a graph with `number_of_nodes` nodes and
/// `number_of_non_edges` unordered non-adjacent node pairs
pub fn expected_number_of_clauses(
    number_of_nodes: NumNodes,
    number_of_non_edges: NumEdges,
    clique_size: NumNodes,
) -> u64 {
    let n = number_of_nodes as u64;
    let k = clique_size as u64;

    k + k * pairs(n) + n * pairs(k) + 2 * number_of_non_edges * pairs(k)
}

/// Produces a formula that is satisfiable iff `graph` contains a clique of exactly
/// `clique_size` nodes. The formula has `n * k` variables `At(v, p)` (see [`VariableIndexer`])
/// and the following clause families, emitted in this order:
///
///  1. Coverage: for each position p, `At(1,p) | ... | At(n,p)`.
///  2. Position exclusivity: for each position p and vertices u < v, `!At(u,p) | !At(v,p)`.
///  3. Vertex exclusivity: for each vertex v and positions p1 < p2, `!At(v,p1) | !At(v,p2)`.
///  4. Adjacency: for non-adjacent vertices u < v and positions p1 < p2, both
///     `!At(u,p1) | !At(v,p2)` and `!At(v,p1) | !At(u,p2)`.
///
/// At-most-one constraints use the direct pairwise encoding. `clique_size = 0` is valid and
/// yields an empty formula; `clique_size > n` yields a well-formed unsatisfiable formula.
/// For a graph without nodes every coverage clause is empty.
pub fn encode_clique<G>(graph: &G, clique_size: NumNodes) -> Result<CnfFormula>
where
    G: AdjacencyTest + GraphNodeOrder,
{
    let n = graph.number_of_nodes();
    let k = clique_size;
    let indexer = VariableIndexer::new(n, k)?;
    let at = |v, p| indexer.literal(v, p);

    let mut formula = CnfFormula::new(indexer.number_of_variables());

    // (1) every position is occupied by some vertex
    for p in 0..k {
        formula.add_clause((1..=n).map(|v| at(v, p)).collect::<Result<Vec<_>>>()?);
    }

    // (2) no two vertices share a position
    for p in 0..k {
        for (u, v) in (1..=n).tuple_combinations() {
            formula.add_clause([-at(u, p)?, -at(v, p)?]);
        }
    }

    // (3) no vertex occupies two positions
    for v in 1..=n {
        for (p1, p2) in (0..k).tuple_combinations() {
            formula.add_clause([-at(v, p1)?, -at(v, p2)?]);
        }
    }

    // (4) non-adjacent vertices never occupy two positions simultaneously
    for (u, v) in (1..=n).tuple_combinations() {
        if graph.has_edge(u - 1, v - 1) {
            continue;
        }

        for (p1, p2) in (0..k).tuple_combinations() {
            formula.add_clause([-at(u, p1)?, -at(v, p2)?]);
            formula.add_clause([-at(v, p1)?, -at(u, p2)?]);
        }
    }

    debug!(
        "Encoded k={k} for n={n}: {} variables, {} clauses",
        formula.number_of_variables(),
        formula.number_of_clauses()
    );

    Ok(formula)
}
