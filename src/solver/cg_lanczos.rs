//! Conjugate gradient driven by the Lanczos process (Saad §6.7).
//!
//! Solves Hermitian systems Ax = b through the M-orthonormal three-term
//! Lanczos recurrence
//!
//! ```text
//! βₖ₊₁ M vₖ₊₁ = A vₖ − δₖ M vₖ − βₖ M vₖ₋₁
//! ```
//!
//! with the CG iterates recovered from coupled scalar recursions. The
//! residual monitored is the M-norm ‖rₖ‖_M = |σₖ|, available without extra
//! kernel calls. The tridiagonal coefficients also give the curvature of
//! each search direction for free, so the solver can flag directions of
//! non-positive curvature and, on request, stop on them.
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems, 2nd
//!   Edition. SIAM. §6.7
//! - Paige, C. C., Saunders, M. A. (1975). Solution of sparse indefinite
//!   systems of linear equations. SIAM J. Numer. Anal. 12(4), 617-629.

use num_traits::{Float, One, Zero};

use crate::config::options::CgLanczosOptions;
use crate::core::kernels;
use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;
use crate::error::KrylovError;
use crate::preconditioner::apply_preconditioner;
use crate::solver::{check_preconditioner, check_square_system, KrylovWorkspace};
use crate::utils::convergence::{
    residual_collapsed, residual_tolerance, LanczosStats, SolverStatus,
};

/// Preallocated state for repeated CG-Lanczos solves of size `n`.
///
/// The `v` buffer is only sized when a preconditioner is in use; without one
/// `v` and `Mv` coincide and the solver reads `Mv` in its place. `dx` is
/// sized on the first warm start.
pub struct CgLanczosWorkspace<FC: Scalar> {
    n: usize,
    x: Vec<FC>,
    dx: Vec<FC>,
    mv: Vec<FC>,
    mv_prev: Vec<FC>,
    mv_next: Vec<FC>,
    p: Vec<FC>,
    v: Vec<FC>,
    warm_start: bool,
    stats: LanczosStats<FC::Real>,
}

impl<FC: Scalar> CgLanczosWorkspace<FC> {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            x: vec![FC::zero(); n],
            dx: Vec::new(),
            mv: vec![FC::zero(); n],
            mv_prev: vec![FC::zero(); n],
            mv_next: vec![FC::zero(); n],
            p: vec![FC::zero(); n],
            v: Vec::new(),
            warm_start: false,
            stats: LanczosStats::default(),
        }
    }

    pub fn solution(&self) -> &[FC] {
        &self.x
    }

    pub fn stats(&self) -> &LanczosStats<FC::Real> {
        &self.stats
    }

    /// Solve Ax = b from a zero initial guess.
    pub fn solve(
        &mut self,
        a: &dyn LinearOperator<FC>,
        b: &[FC],
        opts: &CgLanczosOptions<'_, FC>,
        callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&LanczosStats<FC::Real>, KrylovError> {
        self.warm_start = false;
        self.run(a, b, opts, callback)
    }

    /// Solve Ax = b starting from `x0`: the correction system is solved for
    /// Δx and the result reported as x0 + Δx.
    pub fn solve_warm(
        &mut self,
        a: &dyn LinearOperator<FC>,
        b: &[FC],
        x0: &[FC],
        opts: &CgLanczosOptions<'_, FC>,
        callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&LanczosStats<FC::Real>, KrylovError> {
        if x0.len() != self.n {
            return Err(KrylovError::DimensionMismatch {
                object: "initial guess",
                expected: self.n,
                found: x0.len(),
            });
        }
        self.dx.resize(self.n, FC::zero());
        self.dx.copy_from_slice(x0);
        self.warm_start = true;
        self.run(a, b, opts, callback)
    }

    fn run(
        &mut self,
        a: &dyn LinearOperator<FC>,
        b: &[FC],
        opts: &CgLanczosOptions<'_, FC>,
        mut callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&LanczosStats<FC::Real>, KrylovError> {
        check_square_system(a, b, self.n)?;
        check_preconditioner(opts.m, self.n, "left preconditioner")?;

        let n = self.n;
        let mis_i = opts.m.is_none();
        if !mis_i && self.v.len() != n {
            self.v.resize(n, FC::zero());
        }
        self.stats.reset();

        for xi in self.x.iter_mut() {
            *xi = FC::zero();
        }

        // Mv₁ holds the initial residual r₀ = b - A·Δx.
        if self.warm_start {
            a.apply(&mut self.mv, &self.dx);
            kernels::axpby(FC::one(), b, -FC::one(), &mut self.mv);
        } else {
            kernels::copy(b, &mut self.mv);
        }
        if let Some(m) = opts.m {
            apply_preconditioner(m, &mut self.v, &self.mv, opts.ldiv);
        }

        // β₁² = r₀ᴴ M⁻¹ r₀ = v₁ᴴ M v₁
        let beta1_sqr = if mis_i {
            kernels::dotr(&self.mv, &self.mv)
        } else {
            kernels::dotr(&self.v, &self.mv)
        };
        let mut beta = beta1_sqr.sqrt();
        let mut rnorm = beta;
        if opts.history {
            self.stats.residuals.push(rnorm);
        }

        if beta == FC::Real::zero() {
            if self.warm_start {
                kernels::axpy(FC::one(), &self.dx, &mut self.x);
                self.warm_start = false;
            }
            self.stats.solved = true;
            self.stats.status = SolverStatus::ZeroResidual;
            return Ok(&self.stats);
        }

        // p₁ = σ₁v₁, which is the residual before normalisation.
        if mis_i {
            kernels::copy(&self.mv, &mut self.p);
        } else {
            kernels::copy(&self.v, &mut self.p);
        }
        let inv_beta = FC::one() / FC::from_real(beta);
        if mis_i {
            kernels::scal(inv_beta, &mut self.mv);
        } else {
            kernels::scal(inv_beta, &mut self.v);
            kernels::scal(inv_beta, &mut self.mv);
        }
        kernels::copy(&self.mv, &mut self.mv_prev);

        let itmax = if opts.itmax == 0 { 2 * n } else { opts.itmax };
        let tol = residual_tolerance(opts.atol, opts.rtol, rnorm);

        let mut sigma = beta;
        let mut omega = FC::Real::zero();
        let mut gamma = FC::Real::one();
        let mut anorm_sqr = FC::Real::zero();

        let mut iter = 0;
        let mut indefinite = false;
        let mut solved = rnorm <= tol;
        let mut tired = false;
        let mut user_exit = false;

        while !(solved || tired || user_exit) {
            // βₖ₊₁ M vₖ₊₁ = A vₖ − δₖ M vₖ − βₖ M vₖ₋₁
            a.apply(
                &mut self.mv_next,
                if mis_i { &self.mv } else { &self.v },
            );
            let delta = if mis_i {
                kernels::dotr(&self.mv, &self.mv_next)
            } else {
                kernels::dotr(&self.v, &self.mv_next)
            };

            // γₖ = 1 / (δₖ − ωₖ₋₁ / γₖ₋₁); γₖ ≤ 0 means pₖᴴA pₖ ≤ 0.
            gamma = FC::Real::one() / (delta - omega / gamma);
            if gamma <= FC::Real::zero() {
                indefinite = true;
                if opts.check_curvature {
                    break;
                }
            }

            kernels::axpy(FC::from_real(-delta), &self.mv, &mut self.mv_next);
            if iter > 0 {
                kernels::axpy(FC::from_real(-beta), &self.mv_prev, &mut self.mv_next);
                kernels::copy(&self.mv, &mut self.mv_prev);
            }
            kernels::copy(&self.mv_next, &mut self.mv);
            if let Some(m) = opts.m {
                apply_preconditioner(m, &mut self.v, &self.mv, opts.ldiv);
            }
            let beta_prev = beta;
            beta = (if mis_i {
                kernels::dotr(&self.mv, &self.mv)
            } else {
                kernels::dotr(&self.v, &self.mv)
            })
            .sqrt();
            let inv_beta = FC::one() / FC::from_real(beta);
            if mis_i {
                kernels::scal(inv_beta, &mut self.mv);
            } else {
                kernels::scal(inv_beta, &mut self.v);
                kernels::scal(inv_beta, &mut self.mv);
            }

            // Frobenius norm of the growing tridiagonal estimates ‖A‖.
            anorm_sqr =
                anorm_sqr + beta_prev * beta_prev + beta * beta + delta * delta;

            // xₖ₊₁ = xₖ + γₖ pₖ
            kernels::axpy(FC::from_real(gamma), &self.p, &mut self.x);
            let mut om = beta * gamma;
            sigma = -om * sigma; // σₖ₊₁ = −βₖ₊₁ γₖ σₖ
            om = om * om; // ωₖ = (βₖ₊₁ γₖ)²

            // pₖ₊₁ = σₖ₊₁ vₖ₊₁ + ωₖ pₖ
            kernels::axpby(
                FC::from_real(sigma),
                if mis_i { &self.mv } else { &self.v },
                FC::from_real(om),
                &mut self.p,
            );
            omega = om;
            rnorm = sigma.abs(); // ‖rₖ₊₁‖_M
            iter += 1;

            if opts.history {
                self.stats.residuals.push(rnorm);
            }
            if opts.verbose > 0 && iter % opts.verbose == 0 {
                log::info!("cg_lanczos: iteration {iter}, residual {rnorm:.6e}");
            }

            solved = rnorm <= tol || residual_collapsed(rnorm);
            tired = iter >= itmax;
            self.stats.niter = iter;
            if let Some(ref mut cb) = callback {
                if cb(&*self) {
                    user_exit = true;
                }
            }
        }

        let mut status = SolverStatus::Unknown;
        if tired {
            status = SolverStatus::MaxIterations;
        }
        if opts.check_curvature && indefinite {
            status = SolverStatus::NegativeCurvature;
        }
        if solved {
            status = SolverStatus::Solved;
        }
        if user_exit {
            status = SolverStatus::UserExit;
        }

        if self.warm_start {
            kernels::axpy(FC::one(), &self.dx, &mut self.x);
            self.warm_start = false;
        }

        self.stats.niter = iter;
        self.stats.solved = solved;
        self.stats.indefinite = indefinite;
        self.stats.anorm = anorm_sqr.sqrt();
        self.stats.status = status;
        Ok(&self.stats)
    }
}

impl<FC: Scalar> KrylovWorkspace<FC> for CgLanczosWorkspace<FC> {
    fn problem_size(&self) -> usize {
        self.n
    }

    fn solution(&self) -> &[FC] {
        &self.x
    }

    fn niter(&self) -> usize {
        self.stats.niter
    }

    fn solved(&self) -> bool {
        self.stats.solved
    }

    fn status(&self) -> SolverStatus {
        self.stats.status
    }
}

/// Solve the Hermitian system Ax = b from a zero initial guess.
pub fn cg_lanczos<FC: Scalar>(
    a: &dyn LinearOperator<FC>,
    b: &[FC],
    opts: &CgLanczosOptions<'_, FC>,
) -> Result<(Vec<FC>, LanczosStats<FC::Real>), KrylovError> {
    let mut workspace = CgLanczosWorkspace::new(b.len());
    workspace.solve(a, b, opts, None)?;
    Ok((workspace.x, workspace.stats))
}

/// Solve the Hermitian system Ax = b starting from the guess `x0`.
pub fn cg_lanczos_warm<FC: Scalar>(
    a: &dyn LinearOperator<FC>,
    b: &[FC],
    x0: &[FC],
    opts: &CgLanczosOptions<'_, FC>,
) -> Result<(Vec<FC>, LanczosStats<FC::Real>), KrylovError> {
    let mut workspace = CgLanczosWorkspace::new(b.len());
    workspace.solve_warm(a, b, x0, opts, None)?;
    Ok((workspace.x, workspace.stats))
}
