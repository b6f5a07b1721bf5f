use super::{Literal, Variable};
use crate::{
    errors::{CliqueSatError, Result},
    graph::{Node, NumNodes},
};

/// Bijection between `(vertex, position)` pairs and the variables `1..=n*k`.
///
/// Variables form a `k x n` table numbered row by row: row `p` holds the variables of clique
/// position `p`, column `v` the ones of vertex `v`. Hence `id = p * n + v` with `v` in `1..=n`
/// and `p` in `0..k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariableIndexer {
    number_of_nodes: NumNodes,
    clique_size: NumNodes,
}

impl VariableIndexer {
    /// Fails if `n * k` variables cannot be expressed as DIMACS literals
    pub fn new(number_of_nodes: NumNodes, clique_size: NumNodes) -> Result<Self> {
        let number_of_variables = (number_of_nodes as u64) * (clique_size as u64);
        if number_of_variables > Literal::MAX as u64 {
            return Err(CliqueSatError::FormulaTooLarge {
                number_of_nodes,
                clique_size,
            });
        }

        Ok(Self {
            number_of_nodes,
            clique_size,
        })
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    pub fn clique_size(&self) -> NumNodes {
        self.clique_size
    }

    pub fn number_of_variables(&self) -> Variable {
        self.number_of_nodes * self.clique_size
    }

    /// Returns the variable of `At(vertex, position)`.
    ///
    /// # Example
    /// ```
    /// use clique_sat::encoding::VariableIndexer;
    /// let indexer = VariableIndexer::new(3, 2).unwrap();
    /// assert_eq!(indexer.index(1, 0).unwrap(), 1);
    /// assert_eq!(indexer.index(3, 1).unwrap(), 6);
    /// assert!(indexer.index(0, 0).is_err());
    /// assert!(indexer.index(1, 2).is_err());
    /// ```
    pub fn index(&self, vertex: Node, position: NumNodes) -> Result<Variable> {
        if !(1..=self.number_of_nodes).contains(&vertex) {
            return Err(CliqueSatError::VertexOutOfRange {
                vertex,
                number_of_nodes: self.number_of_nodes,
            });
        }

        if position >= self.clique_size {
            return Err(CliqueSatError::PositionOutOfRange {
                position,
                clique_size: self.clique_size,
            });
        }

        Ok(position * self.number_of_nodes + vertex)
    }

    /// Positive literal of `At(vertex, position)`
    pub fn literal(&self, vertex: Node, position: NumNodes) -> Result<Literal> {
        // cannot overflow as the constructor bounds n * k
        Ok(self.index(vertex, position)? as Literal)
    }

    /// Inverse of [`VariableIndexer::index`]; returns `None` for ids outside of `1..=n*k`
    pub fn decode(&self, variable: Variable) -> Option<(Node, NumNodes)> {
        if variable == 0 || variable > self.number_of_variables() {
            return None;
        }

        let position = (variable - 1) / self.number_of_nodes;
        let vertex = (variable - 1) % self.number_of_nodes + 1;
        Some((vertex, position))
    }
}
