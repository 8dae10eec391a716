//! Concrete matrix-backed operators.

pub mod dense;
pub use dense::DenseMatrix;
