//! Core abstractions: scalars, vector kernels, operators, Givens rotations.

pub mod givens;
pub mod kernels;
pub mod operator;
pub mod scalar;

pub use givens::SymGivens;
pub use operator::{FnOperator, LinearOperator};
pub use scalar::Scalar;
