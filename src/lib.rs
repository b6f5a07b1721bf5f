pub mod algorithm;
pub mod encoding;
pub mod errors;
pub mod graph;
pub mod io;
pub mod log;
pub mod search;
pub mod solver;
pub mod utils;

pub mod prelude {
    pub use super::encoding::*;
    pub use super::errors::*;
    pub use super::graph::*;
    pub use super::io::*;
    pub use super::search::*;
    pub use super::solver::*;
    pub use super::utils::*;
}

#[cfg(test)]
mod testing;
