pub mod dimacs_reader;
pub use dimacs_reader::*;
pub mod dimacs_writer;
pub use dimacs_writer::{DimacsEmitter, DimacsWriter};
