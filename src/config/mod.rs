//! Solver configuration.

pub mod options;

pub use options::{CgLanczosOptions, GmresOptions};
