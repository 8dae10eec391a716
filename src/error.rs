use thiserror::Error;

// Unified error type for krylov.
//
// Only eager precondition failures are errors; algorithmic outcomes
// (iteration cap, breakdown, indefiniteness, inconsistency) are reported
// through the per-method stats instead.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KrylovError {
    #[error("square system expected, operator is {nrows}x{ncols}")]
    NonSquareSystem { nrows: usize, ncols: usize },
    #[error("{object} expects vectors of length {expected}, got {found}")]
    DimensionMismatch {
        object: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("workspace was allocated for problems of size {expected}, got {found}")]
    WorkspaceMismatch { expected: usize, found: usize },
    #[error("zero entry on the diagonal at index {index}")]
    SingularDiagonal { index: usize },
}
