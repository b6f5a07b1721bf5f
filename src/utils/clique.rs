use crate::graph::*;
use itertools::Itertools;
use std::fmt;

/// Set of nodes, kept in ascending order. Nodes are stored 0-based;
/// [`Clique::labels`] yields the 1-based DIMACS labels used for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clique {
    number_of_nodes: Node,
    set: Vec<Node>,
}

impl Clique {
    pub fn new(number_of_nodes: Node) -> Self {
        Self {
            number_of_nodes,
            set: Vec::new(),
        }
    }

    /// Adds a node to the clique; adding a node twice has no effect.
    ///
    /// # Example
    /// ```
    /// use clique_sat::utils::Clique;
    /// let mut clique = Clique::new(5);
    /// clique.add_node(3);
    /// clique.add_node(0);
    /// clique.add_node(3);
    /// assert_eq!(clique.iter().collect::<Vec<_>>(), vec![0, 3]);
    /// ```
    pub fn add_node(&mut self, node: Node) {
        assert!(node < self.number_of_nodes);
        if let Err(pos) = self.set.binary_search(&node) {
            self.set.insert(pos, node);
        }
    }

    /// Adds multiple nodes to the clique.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for u in nodes {
            self.add_node(u);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns the number of nodes in the clique.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns an iterator over the (0-based) nodes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.set.iter().copied()
    }

    /// Returns an iterator over the 1-based labels in ascending order.
    ///
    /// ```
    /// use clique_sat::utils::Clique;
    /// let mut clique = Clique::new(5);
    /// clique.add_nodes([4, 2]);
    /// assert_eq!(clique.labels().collect::<Vec<_>>(), vec![3, 5]);
    /// ```
    pub fn labels(&self) -> impl Iterator<Item = Node> + '_ {
        self.iter().map(|u| u + 1)
    }

    /// Returns true if all nodes are pairwise adjacent in `graph`.
    pub fn is_valid(&self, graph: &impl AdjacencyTest) -> bool {
        self.set
            .iter()
            .tuple_combinations()
            .all(|(&u, &v)| graph.has_edge(u, v))
    }
}

impl fmt::Display for Clique {
    /// Formats the labels as a list, e.g. `[1, 2, 3]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.labels().join(", "))
    }
}
