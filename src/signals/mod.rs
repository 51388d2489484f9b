//! Signal evaluation: crossover classification and ranking.

pub mod aggregation;
pub mod crossover;

pub use aggregation::*;
pub use crossover::*;
