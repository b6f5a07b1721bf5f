pub mod clique;
pub mod signal_handling;

pub use clique::*;
