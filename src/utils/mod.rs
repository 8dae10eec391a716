//! Convergence tracking and solver statistics.

pub mod convergence;

pub use convergence::{LanczosStats, SimpleStats, SolverStatus};
