//! Mathematical utilities: batch statistics and least-squares solving.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
