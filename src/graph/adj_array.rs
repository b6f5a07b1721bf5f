use super::*;
use crate::errors::{CliqueSatError, InvariantCheck};
use std::fmt;

/// Undirected, loop-free graph storing a sorted neighbor list per node.
/// Nodes are 0-based; DIMACS labels are obtained by adding one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdjArray {
    adj: Vec<Neighborhood>,
    number_of_edges: NumEdges,
}

macro_rules! forward {
    ($single : ident, $internal : ident, $type : ty) => {
        fn $single(&self, node: Node) -> $type {
            self.adj[node as usize].$internal()
        }
    };
}

impl GraphNodeOrder for AdjArray {
    fn number_of_nodes(&self) -> NumNodes {
        self.adj.len() as NumNodes
    }
}

impl GraphEdgeOrder for AdjArray {
    fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }
}

impl AdjacencyList for AdjArray {
    forward!(degree_of, degree, NumNodes);
    forward!(neighbors_of, neighbors, &[Node]);
}

impl AdjacencyTest for AdjArray {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.adj[u as usize].has_neighbor(v)
    }
}

impl GraphNew for AdjArray {
    fn new(number_of_nodes: NumNodes) -> Self {
        Self {
            adj: vec![Default::default(); number_of_nodes as usize],
            number_of_edges: 0,
        }
    }
}

impl GraphEdgeEditing for AdjArray {
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool {
        if u == v {
            return false;
        }

        let added = self.adj[u as usize].try_add(v);
        if added {
            assert!(self.adj[v as usize].try_add(u));
            self.number_of_edges += 1;
        }

        added
    }
}

impl AdjArray {
    /// Builds a graph with `n` nodes from the given edges; loops and duplicates are dropped
    pub fn from_edges(n: NumNodes, edges: impl IntoIterator<Item = impl Into<Edge>>) -> Self {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }

    /// The complete graph on `n` nodes
    pub fn complete(n: NumNodes) -> Self {
        let mut graph = Self::new(n);
        for u in 0..n {
            for v in u + 1..n {
                graph.add_edge(u, v);
            }
        }
        graph
    }

    /// Returns the number of unordered node pairs that are NOT connected by an edge
    pub fn number_of_non_edges(&self) -> NumEdges {
        let n = self.number_of_nodes() as NumEdges;
        n * n.saturating_sub(1) / 2 - self.number_of_edges
    }
}

impl InvariantCheck<CliqueSatError> for AdjArray {
    fn is_correct(&self) -> Result<(), CliqueSatError> {
        let mut degree_sum: NumEdges = 0;

        for u in self.vertices() {
            let neighbors = self.neighbors_of(u);
            degree_sum += neighbors.len() as NumEdges;

            if !neighbors.is_sorted_by(|a, b| a < b) {
                return Err(CliqueSatError::Invariant(format!(
                    "neighbors of {u} are not strictly ascending"
                )));
            }

            for &v in neighbors {
                if v == u {
                    return Err(CliqueSatError::Invariant(format!("self-loop at {u}")));
                }

                if v >= self.number_of_nodes() || !self.has_edge(v, u) {
                    return Err(CliqueSatError::Invariant(format!(
                        "edge ({u}, {v}) has no reverse"
                    )));
                }
            }
        }

        if degree_sum != 2 * self.number_of_edges {
            return Err(CliqueSatError::Invariant(format!(
                "degree sum {degree_sum} does not match {} edges",
                self.number_of_edges
            )));
        }

        Ok(())
    }
}

#[derive(Default, Clone, PartialEq, Eq)]
struct Neighborhood {
    nodes: Vec<Node>,
}

impl Neighborhood {
    fn degree(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }

    fn neighbors(&self) -> &[Node] {
        &self.nodes
    }

    fn has_neighbor(&self, v: Node) -> bool {
        self.nodes.binary_search(&v).is_ok()
    }

    fn try_add(&mut self, v: Node) -> bool {
        match self.nodes.binary_search(&v) {
            Ok(_) => false,
            Err(pos) => {
                self.nodes.insert(pos, v);
                true
            }
        }
    }
}

impl fmt::Debug for AdjArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::io::DimacsWriter;
        use std::str;

        let mut buf = Vec::new();
        if self.try_write_dimacs(&mut buf).is_ok() {
            f.write_str(str::from_utf8(&buf).map_err(|_| fmt::Error)?.trim())?;
        }

        Ok(())
    }
}
