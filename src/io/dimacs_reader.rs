use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Lines},
    iter::Enumerate,
    path::Path,
};

use crate::{
    errors::{CliqueSatError, Result},
    graph::{Edge, GraphEdgeEditing, NumEdges, NumNodes},
};

pub trait GraphDimacsReader: Sized {
    fn try_read_dimacs<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_dimacs_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl<G> GraphDimacsReader for G
where
    G: GraphEdgeEditing,
{
    fn try_read_dimacs<R: BufRead>(reader: R) -> Result<Self> {
        let dimacs_reader = DimacsReader::try_new(reader)?;
        let mut graph = Self::new(dimacs_reader.number_of_nodes());
        for edge in dimacs_reader {
            let Edge(u, v) = edge?;
            graph.try_add_edge(u, v);
        }
        Ok(graph)
    }

    fn try_read_dimacs_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_dimacs(buf_reader)
    }
}

/// Streams the edges of a graph in DIMACS edge format:
///
/// ```text
/// c comment
/// p edge <number of nodes> <number of edges>
/// e <u> <v>
/// ```
///
/// Nodes are labelled 1..=n in the file and returned 0-based. Loops are reported as
/// any other edge; it is up to the graph to discard them. Edge lines may precede the
/// header; they are held back until the number of nodes is known.
pub struct DimacsReader<R> {
    lines: Enumerate<Lines<R>>,
    held_back: VecDeque<(usize, String)>,
    number_of_nodes: NumNodes,
    number_of_edges: Option<NumEdges>,
}

impl<R: BufRead> DimacsReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut dimacs_reader = Self {
            lines: reader.lines().enumerate(),
            held_back: VecDeque::new(),
            number_of_nodes: 0,
            number_of_edges: None,
        };

        (dimacs_reader.number_of_nodes, dimacs_reader.number_of_edges) =
            dimacs_reader.parse_header()?;
        Ok(dimacs_reader)
    }

    /// Number of edges as declared in the header, if it is a number. The file may contain
    /// a different number of edge lines, duplicates or loops.
    pub fn number_of_edges(&self) -> Option<NumEdges> {
        self.number_of_edges
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }
}

impl<R: BufRead> Iterator for DimacsReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_edge_line().transpose()
    }
}

macro_rules! raise_error_unless {
    ($cond : expr, $line : expr, $info : expr) => {
        if !($cond) {
            return Err(CliqueSatError::input($line, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $line : expr, $name : expr) => {{
        let Some(token) = $iterator.next() else {
            return Err(CliqueSatError::input(
                $line,
                format!("Premature end of line when parsing {}.", $name),
            ));
        };

        match token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(CliqueSatError::input(
                    $line,
                    format!("Invalid value {token:?} found. Cannot parse {}.", $name),
                ));
            }
        }
    }};
}

impl<R: BufRead> DimacsReader<R> {
    /// Returns the next line that is neither empty nor a comment, with its 1-based line number.
    /// Lines held back while searching the header come first.
    fn next_content_line(&mut self) -> Result<Option<(usize, String)>> {
        if let Some(line) = self.held_back.pop_front() {
            return Ok(Some(line));
        }

        loop {
            match self.lines.next() {
                None => return Ok(None),
                Some((_, Err(x))) => return Err(x.into()),
                Some((idx, Ok(line))) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('c') {
                        continue;
                    }
                    return Ok(Some((idx + 1, trimmed.to_string())));
                }
            }
        }
    }

    fn parse_header(&mut self) -> Result<(NumNodes, Option<NumEdges>)> {
        let mut held_back = VecDeque::new();
        let header = loop {
            let Some((line_no, line)) = self.next_content_line()? else {
                return Err(CliqueSatError::input(0, "No valid 'p edge' header line found"));
            };

            if line.starts_with('p') {
                break (line_no, line);
            }
            held_back.push_back((line_no, line));
        };
        self.held_back = held_back;

        let (line_no, line) = header;
        let mut parts = line.split_whitespace();

        raise_error_unless!(
            parts.next() == Some("p"),
            line_no,
            "Invalid header found; line should start with p"
        );

        raise_error_unless!(
            matches!(parts.next(), Some("edge" | "col")),
            line_no,
            "Only DIMACS 'p edge <num_vertices> <num_edges>' format is supported"
        );

        let number_of_nodes = parse_next_value!(parts, line_no, "Header>Number of nodes");

        let Some(number_of_edges) = parts.next() else {
            return Err(CliqueSatError::input(
                line_no,
                "Premature end of line when parsing Header>Number of edges.",
            ));
        };

        Ok((number_of_nodes, number_of_edges.parse().ok()))
    }

    fn parse_edge_line(&mut self) -> Result<Option<Edge>> {
        while let Some((line_no, line)) = self.next_content_line()? {
            let mut parts = line.split_whitespace();
            if parts.next() != Some("e") {
                continue;
            }

            let from: NumNodes = parse_next_value!(parts, line_no, "Source node");
            let dest: NumNodes = parse_next_value!(parts, line_no, "Target node");

            for node in [from, dest] {
                raise_error_unless!(
                    (1..=self.number_of_nodes).contains(&node),
                    line_no,
                    format!(
                        "Node {node} is out of range [1, {}]",
                        self.number_of_nodes
                    )
                );
            }

            return Ok(Some(Edge(from - 1, dest - 1)));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{errors::InvariantCheck, graph::*};

    use glob::glob;
    use itertools::Itertools;

    #[test]
    fn test_success() {
        const DEMO_FILE: &str =
            "c TEST\n p  edge 5  4 \ne 1 2\nc TEST\n\ne 2 3\nn 1 7\ne 3 3\ne 5 4";
        let buf_reader = std::io::BufReader::new(DEMO_FILE.as_bytes());
        let dimacs_reader = DimacsReader::try_new(buf_reader).unwrap();

        assert_eq!(dimacs_reader.number_of_nodes(), 5);
        assert_eq!(dimacs_reader.number_of_edges(), Some(4));

        let edges = dimacs_reader.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(edges, vec![Edge(0, 1), Edge(1, 2), Edge(2, 2), Edge(4, 3)]);

        let graph = AdjArray::try_read_dimacs(DEMO_FILE.as_bytes()).unwrap();
        assert_eq!(graph.number_of_nodes(), 5);
        assert_eq!(graph.number_of_edges(), 3);
        assert!(graph.has_edge(3, 4));
    }

    #[test]
    fn duplicate_edges_are_harmless() {
        let graph = AdjArray::try_read_dimacs("p edge 3 4\ne 1 2\ne 2 1\ne 1 2\ne 2 3".as_bytes())
            .unwrap();
        assert_eq!(graph.number_of_edges(), 2);
    }

    #[test]
    fn header_after_edges() {
        let graph =
            AdjArray::try_read_dimacs("c late header\ne 1 2\ne 2 3\np edge 3 2\ne 1 3\n".as_bytes())
                .unwrap();
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(
            graph.ordered_edges().collect_vec(),
            vec![Edge(0, 1), Edge(0, 2), Edge(1, 2)]
        );

        // held back lines keep their line numbers
        expect_input_error("e 1 2\ne 1 5\np edge 3 1\n", 2);
    }

    #[test]
    fn declared_edge_count_is_informational() {
        let reader = DimacsReader::try_new("p edge 2 x\ne 1 2\n".as_bytes()).unwrap();
        assert_eq!(reader.number_of_nodes(), 2);
        assert_eq!(reader.number_of_edges(), None);
        assert_eq!(reader.collect::<Result<Vec<_>>>().unwrap(), vec![Edge(0, 1)]);

        let graph = AdjArray::try_read_dimacs("p edge 3 7\ne 1 2\n".as_bytes()).unwrap();
        assert_eq!(graph.number_of_edges(), 1);
    }

    fn expect_input_error(content: &str, expected_line: usize) {
        match AdjArray::try_read_dimacs(content.as_bytes()) {
            Err(CliqueSatError::Input { line, .. }) => assert_eq!(line, expected_line, "{content}"),
            other => panic!("expected input error for {content:?}, got {other:?}"),
        }
    }

    #[test]
    fn malformed_input() {
        expect_input_error("", 0);
        expect_input_error("c only comments\n", 0);
        expect_input_error("p ds 3 2\n", 1);
        expect_input_error("p edge x 2\n", 1);
        expect_input_error("c\np edge 3\n", 2);
        expect_input_error("p edge 3 1\ne 1\n", 2);
        expect_input_error("p edge 3 1\ne 1 b\n", 2);
        expect_input_error("p edge 3 1\n\ne 1 4\n", 3);
        expect_input_error("p edge 3 1\ne 0 1\n", 2);
    }

    #[test]
    fn read_tiny_instances() {
        let files = glob("instances/tiny/*.clq")
            .expect("Failed to glob")
            .map(|r| r.expect("Failed to access globbed path"))
            .collect_vec();

        assert!(!files.is_empty());

        for file in files {
            let graph = AdjArray::try_read_dimacs_file(&file).expect("Cannot read instance");
            assert!(graph.is_correct().is_ok(), "{file:?}");
        }
    }
}
