use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use super::CnfFormula;
use crate::io::DimacsEmitter;

/// Serializes a formula in DIMACS CNF format: a `p cnf <variables> <clauses>` header followed
/// by one line per clause, literals separated by single spaces and terminated by `0`.
/// Clauses are written in their stored order, without comments.
pub trait CnfWriter {
    fn try_write_cnf<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
    fn try_write_cnf_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error>;

    fn to_cnf_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        self.try_write_cnf(&mut buffer)
            .expect("writing into a Vec cannot fail");
        buffer
    }
}

impl CnfWriter for CnfFormula {
    fn try_write_cnf<W: Write>(&self, writer: W) -> Result<(), std::io::Error> {
        let mut emitter = DimacsEmitter::new(writer);
        emitter.problem("cnf", self.number_of_variables(), self.number_of_clauses())?;
        for clause in self.clauses() {
            emitter.clause(clause)?;
        }

        emitter.finish()?;
        Ok(())
    }

    fn try_write_cnf_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_cnf(writer)
    }
}
