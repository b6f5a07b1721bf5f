use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{encoding::Literal, graph::*};

/// Line-level output shared by the DIMACS flavours of this crate: `c` comment lines, a single
/// `p <format> <a> <b>` problem line, `e u v` edge lines (1-based) and `0`-terminated clauses.
pub struct DimacsEmitter<W: Write> {
    writer: W,
}

impl<W: Write> DimacsEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one `c` line per line of `text`
    pub fn comment(&mut self, text: &str) -> std::io::Result<()> {
        for line in text.lines() {
            if line.is_empty() {
                writeln!(self.writer, "c")?;
            } else {
                writeln!(self.writer, "c {line}")?;
            }
        }
        Ok(())
    }

    pub fn problem(
        &mut self,
        format: &str,
        first: impl Display,
        second: impl Display,
    ) -> std::io::Result<()> {
        writeln!(self.writer, "p {format} {first} {second}")
    }

    /// Writes the 0-based edge with 1-based labels
    pub fn edge(&mut self, Edge(u, v): Edge) -> std::io::Result<()> {
        writeln!(self.writer, "e {} {}", u + 1, v + 1)
    }

    pub fn clause(&mut self, literals: &[Literal]) -> std::io::Result<()> {
        for lit in literals {
            write!(self.writer, "{lit} ")?;
        }
        writeln!(self.writer, "0")
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Writes a graph in DIMACS edge format: optional comments, `p edge n m`, then every edge
/// once as `e u v` with `u < v`, in ascending order.
pub trait DimacsWriter {
    fn try_write_annotated_dimacs<W: Write>(
        &self,
        writer: W,
        comments: &[String],
    ) -> std::io::Result<()>;

    fn try_write_dimacs<W: Write>(&self, writer: W) -> std::io::Result<()> {
        self.try_write_annotated_dimacs(writer, &[])
    }

    fn try_write_dimacs_file<P: AsRef<Path>>(
        &self,
        path: P,
        comments: &[String],
    ) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_annotated_dimacs(writer, comments)
    }
}

impl<T> DimacsWriter for T
where
    T: AdjacencyList + GraphEdgeOrder,
{
    fn try_write_annotated_dimacs<W: Write>(
        &self,
        writer: W,
        comments: &[String],
    ) -> std::io::Result<()> {
        let mut emitter = DimacsEmitter::new(writer);
        for comment in comments {
            emitter.comment(comment)?;
        }

        emitter.problem("edge", self.number_of_nodes(), self.number_of_edges())?;
        for edge in self.ordered_edges() {
            emitter.edge(edge)?;
        }

        emitter.finish()?;
        Ok(())
    }
}
