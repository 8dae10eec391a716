//! Krylov method kernels and their workspaces.
//!
//! Each method owns a workspace struct holding every buffer it needs, so
//! repeated solves allocate nothing. The free functions (`cg_lanczos`,
//! `gmres`, …) build a workspace, run one solve and hand back the solution;
//! callers with many right-hand sides keep a workspace around and use its
//! `solve`/`solve_warm` methods instead.

use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;
use crate::error::KrylovError;
use crate::utils::convergence::SolverStatus;

/// Uniform read-only view over any method's workspace.
pub trait KrylovWorkspace<FC: Scalar> {
    /// Problem size the workspace was allocated for.
    fn problem_size(&self) -> usize;

    /// Current solution estimate.
    fn solution(&self) -> &[FC];

    /// Iterations spent in the last (or current) solve.
    fn niter(&self) -> usize;

    /// Whether the last solve converged.
    fn solved(&self) -> bool;

    /// Termination status of the last solve.
    fn status(&self) -> SolverStatus;
}

/// Entry validation shared by the square-system methods. Runs before any
/// buffer is touched so a failed call leaves the workspace untouched.
pub(crate) fn check_square_system<FC: Scalar>(
    a: &dyn LinearOperator<FC>,
    b: &[FC],
    workspace_size: usize,
) -> Result<(), KrylovError> {
    if a.nrows() != a.ncols() {
        return Err(KrylovError::NonSquareSystem {
            nrows: a.nrows(),
            ncols: a.ncols(),
        });
    }
    if b.len() != a.nrows() {
        return Err(KrylovError::DimensionMismatch {
            object: "right-hand side",
            expected: a.nrows(),
            found: b.len(),
        });
    }
    if workspace_size != b.len() {
        return Err(KrylovError::WorkspaceMismatch {
            expected: workspace_size,
            found: b.len(),
        });
    }
    Ok(())
}

/// Validate a preconditioner's shape against the system size.
pub(crate) fn check_preconditioner<FC: Scalar>(
    p: Option<&dyn LinearOperator<FC>>,
    n: usize,
    object: &'static str,
) -> Result<(), KrylovError> {
    if let Some(p) = p {
        if p.nrows() != n || p.ncols() != n {
            return Err(KrylovError::DimensionMismatch {
                object,
                expected: n,
                found: if p.nrows() != n { p.nrows() } else { p.ncols() },
            });
        }
    }
    Ok(())
}

pub mod cg_lanczos;
pub use cg_lanczos::{cg_lanczos, cg_lanczos_warm, CgLanczosWorkspace};

pub mod gmres;
pub use gmres::{gmres, gmres_warm, GmresWorkspace};
