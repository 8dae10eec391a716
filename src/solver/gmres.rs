//! Generalized Minimal Residual method with optional restart (Saad §6.4).
//!
//! Solves general square systems Ax = b, minimising ‖M(b − Ax)‖₂ over the
//! preconditioned Krylov subspace x₀ + N·Kₖ(MAN, Mr₀). The Arnoldi basis is
//! built by modified Gram-Schmidt (optionally doubled), the Hessenberg
//! matrix is triangularised incrementally by Givens rotations, and the
//! least-squares coordinates come out of one back-substitution per pass.
//! With `restart` set the basis is capped at `memory` columns and the method
//! becomes GMRES(memory); otherwise `memory` is only an allocation hint and
//! the basis grows as needed.
//!
//! # Features
//! - Left, right or two-sided preconditioning, multiplicative or by
//!   left-division
//! - Happy breakdown detection for early termination
//! - Rank-deficient fallback: zero pivots in R yield the least-squares
//!   solution and flag the system inconsistent
//!
//! # References
//! - Saad, Y. (2003). Iterative Methods for Sparse Linear Systems, 2nd
//!   Edition. SIAM. §6.4
//! - Saad, Y., Schultz, M. H. (1986). GMRES: a generalized minimal residual
//!   algorithm for solving nonsymmetric linear systems. SIAM J. Sci. Stat.
//!   Comput. 7(3), 856-869.

use num_traits::{Float, Zero};

use crate::config::options::GmresOptions;
use crate::core::givens::SymGivens;
use crate::core::kernels;
use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;
use crate::error::KrylovError;
use crate::preconditioner::apply_preconditioner;
use crate::solver::{check_preconditioner, check_square_system, KrylovWorkspace};
use crate::utils::convergence::{
    residual_collapsed, residual_tolerance, SimpleStats, SolverStatus,
};

/// Preallocated state for repeated GMRES solves of size `n`.
///
/// `r` packs the upper-triangular factor of the Hessenberg matrix column by
/// column; the subdiagonal entries never need storing because the rotations
/// zero them as soon as they appear. `q` and `p` are only sized when a left
/// (resp. right) preconditioner is in use; without one they alias `w` and
/// the current basis vector. `dx` is sized for restart or warm-start solves.
pub struct GmresWorkspace<FC: Scalar> {
    n: usize,
    x: Vec<FC>,
    dx: Vec<FC>,
    w: Vec<FC>,
    q: Vec<FC>,
    p: Vec<FC>,
    v_basis: Vec<Vec<FC>>,
    z: Vec<FC>,
    c: Vec<FC::Real>,
    s: Vec<FC>,
    r: Vec<FC>,
    inner_iter: usize,
    warm_start: bool,
    stats: SimpleStats<FC::Real>,
}

impl<FC: SymGivens> GmresWorkspace<FC> {
    /// Workspace with the default basis capacity of 20.
    pub fn new(n: usize) -> Self {
        Self::with_memory(n, 20)
    }

    /// Workspace with a basis capacity of `memory` columns (capped at `n`).
    pub fn with_memory(n: usize, memory: usize) -> Self {
        let mem = memory.max(1).min(n.max(1));
        Self {
            n,
            x: vec![FC::zero(); n],
            dx: Vec::new(),
            w: vec![FC::zero(); n],
            q: Vec::new(),
            p: Vec::new(),
            v_basis: (0..mem).map(|_| vec![FC::zero(); n]).collect(),
            z: vec![FC::zero(); mem],
            c: vec![FC::Real::zero(); mem],
            s: vec![FC::zero(); mem],
            r: vec![FC::zero(); mem * (mem + 1) / 2],
            inner_iter: 0,
            warm_start: false,
            stats: SimpleStats::default(),
        }
    }

    pub fn solution(&self) -> &[FC] {
        &self.x
    }

    pub fn stats(&self) -> &SimpleStats<FC::Real> {
        &self.stats
    }

    /// Inner iterations of the current (or last) pass.
    pub fn inner_iterations(&self) -> usize {
        self.inner_iter
    }

    /// Solve Ax = b from a zero initial guess.
    pub fn solve(
        &mut self,
        a: &dyn LinearOperator<FC>,
        b: &[FC],
        opts: &GmresOptions<'_, FC>,
        callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&SimpleStats<FC::Real>, KrylovError> {
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
        opts: &GmresOptions<'_, FC>,
        callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&SimpleStats<FC::Real>, KrylovError> {
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
        opts: &GmresOptions<'_, FC>,
        mut callback: Option<&mut dyn FnMut(&Self) -> bool>,
    ) -> Result<&SimpleStats<FC::Real>, KrylovError> {
        check_square_system(a, b, self.n)?;
        check_preconditioner(opts.m, self.n, "left preconditioner")?;
        check_preconditioner(opts.n, self.n, "right preconditioner")?;

        let n = self.n;
        let mis_i = opts.m.is_none();
        let nis_i = opts.n.is_none();
        if !mis_i && self.q.len() != n {
            self.q.resize(n, FC::zero());
        }
        if !nis_i && self.p.len() != n {
            self.p.resize(n, FC::zero());
        }
        if (opts.restart || self.warm_start) && self.dx.len() != n {
            self.dx.resize(n, FC::zero());
        }
        // A previous no-restart solve may have grown the basis; keep the
        // packed R, the rotations and z sized to match it.
        let mem = self.v_basis.len();
        self.z.resize(mem, FC::zero());
        self.c.resize(mem, FC::Real::zero());
        self.s.resize(mem, FC::zero());
        self.r.resize(mem * (mem + 1) / 2, FC::zero());
        self.stats.reset();
        self.inner_iter = 0;

        for xi in self.x.iter_mut() {
            *xi = FC::zero();
        }

        // w holds b - A·Δx; r₀ = M·w lands in q, or stays in w when M = I.
        if self.warm_start {
            a.apply(&mut self.w, &self.dx);
            kernels::axpby(FC::one(), b, -FC::one(), &mut self.w);
            if opts.restart {
                kernels::axpy(FC::one(), &self.dx, &mut self.x);
            }
        } else {
            kernels::copy(b, &mut self.w);
        }
        if let Some(m) = opts.m {
            apply_preconditioner(m, &mut self.q, &self.w, opts.ldiv);
        }
        let mut beta = kernels::nrm2(if mis_i { &self.w } else { &self.q });
        let mut rnorm = beta;
        if opts.history {
            self.stats.residuals.push(rnorm);
        }

        if beta == FC::Real::zero() {
            if self.warm_start && !opts.restart {
                kernels::axpy(FC::one(), &self.dx, &mut self.x);
            }
            self.warm_start = false;
            self.stats.solved = true;
            self.stats.status = SolverStatus::ZeroResidual;
            return Ok(&self.stats);
        }

        let itmax = if opts.itmax == 0 { 2 * n } else { opts.itmax };
        let tol = residual_tolerance(opts.atol, opts.rtol, rnorm);
        let btol = FC::eps().powf(num_traits::cast(0.75).unwrap());

        let mut iter = 0;
        let mut npass = 0;
        let mut solved = rnorm <= tol;
        let mut tired = false;
        let mut breakdown = false;
        let mut inconsistent = false;
        let mut user_exit = false;

        while !(solved || tired || breakdown || user_exit) {
            // Fresh pass state.
            for v in self.v_basis.iter_mut() {
                v.fill(FC::zero());
            }
            self.z.fill(FC::zero());
            self.c.fill(FC::Real::zero());
            self.s.fill(FC::zero());
            self.r.fill(FC::zero());

            if opts.restart {
                self.dx.fill(FC::zero());
                if npass >= 1 {
                    // Recompute the preconditioned residual of the running x.
                    a.apply(&mut self.w, &self.x);
                    kernels::axpby(FC::one(), b, -FC::one(), &mut self.w);
                    if let Some(m) = opts.m {
                        apply_preconditioner(m, &mut self.q, &self.w, opts.ldiv);
                    }
                    beta = kernels::nrm2(if mis_i { &self.w } else { &self.q });
                }
            }

            // ζ₁ = β, V₁ = r₀ / β
            self.z[0] = FC::from_real(beta);
            {
                let r0 = if mis_i { &self.w } else { &self.q };
                let inv_beta = FC::one() / FC::from_real(beta);
                for (vi, ri) in self.v_basis[0].iter_mut().zip(r0.iter()) {
                    *vi = *ri * inv_beta;
                }
            }

            npass += 1;
            let mut inner = 0;
            let mut inner_tired = false;
            let mut nr = 0; // coefficients of R stored so far this pass
            self.inner_iter = 0;

            while !(solved || inner_tired || breakdown || user_exit) {
                inner += 1;
                self.inner_iter = inner;
                let k = inner - 1; // current column of the Hessenberg

                // Grow the QR storage past the hint (no-restart mode only).
                if !opts.restart && inner > mem {
                    let len = self.r.len();
                    self.r.resize(len + inner, FC::zero());
                    self.s.push(FC::zero());
                    self.c.push(FC::Real::zero());
                }

                // p ← Nvₖ, w ← ANvₖ, q ← MANvₖ (with the identity aliases).
                if let Some(n_op) = opts.n {
                    apply_preconditioner(n_op, &mut self.p, &self.v_basis[k], opts.ldiv);
                }
                a.apply(&mut self.w, if nis_i { &self.v_basis[k] } else { &self.p });
                if let Some(m_op) = opts.m {
                    apply_preconditioner(m_op, &mut self.q, &self.w, opts.ldiv);
                }

                let hbis;
                {
                    let q: &mut Vec<FC> = if mis_i { &mut self.w } else { &mut self.q };

                    // Modified Gram-Schmidt against V₁..Vₖ₊₁; hᵢₖ goes into
                    // the packed column of R.
                    for i in 0..inner {
                        let h = kernels::dot(&self.v_basis[i], q);
                        self.r[nr + i] = h;
                        kernels::axpy(-h, &self.v_basis[i], q);
                    }
                    if opts.reorthogonalization {
                        for i in 0..inner {
                            let h = kernels::dot(&self.v_basis[i], q);
                            self.r[nr + i] += h;
                            kernels::axpy(-h, &self.v_basis[i], q);
                        }
                    }
                    hbis = kernels::nrm2(q); // hₖ₊₁.ₖ

                    // Apply the stored rotations Ω₁..Ωₖ₋₁ to the new column.
                    for i in 0..k {
                        let ci = FC::from_real(self.c[i]);
                        let top = ci * self.r[nr + i] + self.s[i] * self.r[nr + i + 1];
                        self.r[nr + i + 1] =
                            self.s[i].conj() * self.r[nr + i] - ci * self.r[nr + i + 1];
                        self.r[nr + i] = top;
                    }

                    // Ωₖ zeroes hₖ₊₁.ₖ and rotates the transformed rhs.
                    let (ck, sk, rkk) =
                        FC::sym_givens(self.r[nr + k], FC::from_real(hbis));
                    self.c[k] = ck;
                    self.s[k] = sk;
                    self.r[nr + k] = rkk;
                    let zeta_next = sk.conj() * self.z[k];
                    self.z[k] = FC::from_real(ck) * self.z[k];
                    rnorm = zeta_next.abs(); // ‖M(b − Axₖ)‖₂
                    nr += inner;

                    solved = rnorm <= tol || residual_collapsed(rnorm);
                    inner_tired = if opts.restart {
                        inner >= mem.min(itmax)
                    } else {
                        iter + inner >= itmax
                    };
                    breakdown = hbis <= btol;

                    if !(solved || inner_tired || breakdown || user_exit) {
                        if !opts.restart && inner >= self.v_basis.len() {
                            self.v_basis.push(vec![FC::zero(); n]);
                            self.z.push(FC::zero());
                        }
                        let inv_h = FC::one() / FC::from_real(hbis);
                        for (vi, qi) in self.v_basis[inner].iter_mut().zip(q.iter()) {
                            *vi = *qi * inv_h;
                        }
                        self.z[inner] = zeta_next;
                    }
                }

                if opts.history {
                    self.stats.residuals.push(rnorm);
                }
                if opts.verbose > 0 && (iter + inner) % opts.verbose == 0 {
                    log::info!(
                        "gmres: pass {npass}, iteration {}, residual {rnorm:.6e}",
                        iter + inner
                    );
                }

                self.stats.niter = iter + inner;
                if let Some(ref mut cb) = callback {
                    if cb(&*self) {
                        user_exit = true;
                    }
                }
            }

            // Solve R·y = z by back-substitution, overwriting z with y. A
            // negligible pivot means the projected system is rank deficient:
            // drop that coordinate and report the least-squares solution.
            for i in (0..inner).rev() {
                let mut yi = self.z[i];
                for j in i + 1..inner {
                    yi -= self.r[j * (j + 1) / 2 + i] * self.z[j];
                }
                let rii = self.r[i * (i + 1) / 2 + i];
                if rii.abs() <= btol {
                    self.z[i] = FC::zero();
                    inconsistent = true;
                } else {
                    self.z[i] = yi / rii;
                }
            }

            // xr = Σ yᵢ Vᵢ, then one right-preconditioner application.
            for i in 0..inner {
                let yi = self.z[i];
                if opts.restart {
                    kernels::axpy(yi, &self.v_basis[i], &mut self.dx);
                } else {
                    kernels::axpy(yi, &self.v_basis[i], &mut self.x);
                }
            }
            if let Some(n_op) = opts.n {
                if opts.restart {
                    kernels::copy(&self.dx, &mut self.p);
                    apply_preconditioner(n_op, &mut self.dx, &self.p, opts.ldiv);
                } else {
                    kernels::copy(&self.x, &mut self.p);
                    apply_preconditioner(n_op, &mut self.x, &self.p, opts.ldiv);
                }
            }
            if opts.restart {
                kernels::axpy(FC::one(), &self.dx, &mut self.x);
            }

            iter += inner;
            tired = iter >= itmax;
        }

        let mut status = SolverStatus::Unknown;
        if tired {
            status = SolverStatus::MaxIterations;
        }
        if solved {
            status = SolverStatus::Solved;
        }
        if inconsistent {
            status = SolverStatus::LeastSquares;
        }
        if user_exit {
            status = SolverStatus::UserExit;
        }

        if self.warm_start && !opts.restart {
            kernels::axpy(FC::one(), &self.dx, &mut self.x);
        }
        self.warm_start = false;

        self.stats.niter = iter;
        self.stats.solved = solved;
        self.stats.inconsistent = inconsistent;
        self.stats.status = status;
        Ok(&self.stats)
    }
}

impl<FC: SymGivens> KrylovWorkspace<FC> for GmresWorkspace<FC> {
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

/// Solve Ax = b from a zero initial guess.
pub fn gmres<FC: SymGivens>(
    a: &dyn LinearOperator<FC>,
    b: &[FC],
    opts: &GmresOptions<'_, FC>,
) -> Result<(Vec<FC>, SimpleStats<FC::Real>), KrylovError> {
    let mut workspace = GmresWorkspace::with_memory(b.len(), opts.memory);
    workspace.solve(a, b, opts, None)?;
    Ok((workspace.x, workspace.stats))
}

/// Solve Ax = b starting from the guess `x0`.
pub fn gmres_warm<FC: SymGivens>(
    a: &dyn LinearOperator<FC>,
    b: &[FC],
    x0: &[FC],
    opts: &GmresOptions<'_, FC>,
) -> Result<(Vec<FC>, SimpleStats<FC::Real>), KrylovError> {
    let mut workspace = GmresWorkspace::with_memory(b.len(), opts.memory);
    workspace.solve_warm(a, b, x0, opts, None)?;
    Ok((workspace.x, workspace.stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseMatrix;
    use crate::preconditioner::Jacobi;
    use num_complex::Complex64;

    fn tridiag(n: usize) -> DenseMatrix<f64> {
        DenseMatrix::from_fn(n, n, |i, j| {
            if i == j {
                ((i + 1) * (i + 1)) as f64
            } else if i.abs_diff(j) == 1 {
                0.01
            } else {
                0.0
            }
        })
    }

    fn residual_norm(a: &DenseMatrix<f64>, b: &[f64], x: &[f64]) -> f64 {
        let mut r = vec![0.0; b.len()];
        a.apply(&mut r, x);
        for (ri, bi) in r.iter_mut().zip(b) {
            *ri = bi - *ri;
        }
        kernels::nrm2(&r)
    }

    #[test]
    fn solves_well_conditioned_nonsym() {
        // 4x4 non-symmetric, well-conditioned system
        let a = DenseMatrix::from_rows(vec![
            vec![4.0, 1.0, 0.0, 0.0],
            vec![1.0, 3.0, 1.0, 0.0],
            vec![0.0, 1.0, 2.0, 1.0],
            vec![0.0, 0.0, 1.0, 3.0],
        ]);
        let x_true = vec![1.0, 2.0, 3.0, 4.0];
        let mut b = vec![0.0; 4];
        a.apply(&mut b, &x_true);
        let (x, stats) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats.solved, "GMRES did not converge");
        for (xi, ei) in x.iter().zip(x_true.iter()) {
            assert!(f64::abs(xi - ei) < 1e-6, "xi = {xi}, expected = {ei}");
        }
    }

    #[test]
    fn solves_complex_hermitian_system() {
        let i = Complex64::new(0.0, 1.0);
        let re = |v: f64| Complex64::new(v, 0.0);
        let a = DenseMatrix::from_rows(vec![
            vec![re(7.0), i, -5.0 * i],
            vec![-i, re(8.0), re(5.0)],
            vec![5.0 * i, re(5.0), re(10.0)],
        ])
        .assume_hermitian();
        let x_true = vec![re(1.0), re(2.0) + i, re(3.0) - i];
        let mut b = vec![re(0.0); 3];
        a.apply(&mut b, &x_true);
        let (x, stats) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats.solved);
        for (xi, ei) in x.iter().zip(x_true.iter()) {
            assert!((xi - ei).norm() < 1e-6, "xi = {xi}, expected = {ei}");
        }
    }

    #[test]
    fn zero_rhs_returns_immediately() {
        let a = DenseMatrix::from_rows(vec![vec![2.0, 1.0], vec![0.0, 3.0]]);
        let (x, stats) = gmres(&a, &[0.0, 0.0], &GmresOptions::default()).unwrap();
        assert_eq!(x, vec![0.0, 0.0]);
        assert_eq!(stats.niter, 0);
        assert!(stats.solved);
        assert_eq!(
            stats.status.to_string(),
            "x = 0 is a zero-residual solution"
        );
    }

    #[test]
    fn restarted_matches_full_when_memory_suffices() {
        let a = DenseMatrix::from_rows(vec![
            vec![4.0, 1.0, 0.0, 0.0],
            vec![1.0, 3.0, 1.0, 0.0],
            vec![0.0, 1.0, 2.0, 1.0],
            vec![0.0, 0.0, 1.0, 3.0],
        ]);
        let x_true = vec![1.0, -2.0, 0.5, 4.0];
        let mut b = vec![0.0; 4];
        a.apply(&mut b, &x_true);
        let full = GmresOptions::default().with_history(true);
        let (x_full, stats_full) = gmres(&a, &b, &full).unwrap();
        let restarted = GmresOptions::default()
            .with_history(true)
            .with_restart(true)
            .with_memory(4);
        let (x_restart, stats_restart) = gmres(&a, &b, &restarted).unwrap();
        assert!(stats_full.solved && stats_restart.solved);
        assert_eq!(stats_full.residuals.len(), stats_restart.residuals.len());
        for (rf, rr) in stats_full
            .residuals
            .iter()
            .zip(stats_restart.residuals.iter())
        {
            assert!(f64::abs(rf - rr) <= 1e-10 * (1.0 + f64::abs(*rf)));
        }
        for (xf, xr) in x_full.iter().zip(x_restart.iter()) {
            assert!(f64::abs(xf - xr) < 1e-8);
        }
    }

    #[test]
    fn short_restart_converges_on_shifted_identity() {
        // A = I + e₁eₙᵀ needs two Arnoldi steps from b = eₙ.
        let n = 10;
        let a = DenseMatrix::from_fn(n, n, |i, j| {
            if i == j {
                1.0
            } else if i == 0 && j == n - 1 {
                1.0
            } else {
                0.0
            }
        });
        let mut b = vec![0.0; n];
        b[n - 1] = 1.0;
        let (x_full, stats_full) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats_full.solved);
        assert_eq!(stats_full.niter, 2);
        let opts = GmresOptions::default().with_restart(true).with_memory(3);
        let (x_restart, stats_restart) = gmres(&a, &b, &opts).unwrap();
        assert!(stats_restart.solved);
        assert!(stats_restart.niter <= 6, "more than two passes");
        for (xf, xr) in x_full.iter().zip(x_restart.iter()) {
            assert!(f64::abs(xf - xr) < 1e-8);
        }
    }

    #[test]
    fn singular_system_reports_least_squares_fallback() {
        let a = DenseMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 0.0]]);
        let b = vec![1.0, 1.0];
        let (x, stats) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats.inconsistent);
        assert_eq!(
            stats.status.to_string(),
            "found approximate least-squares solution"
        );
        // The minimiser over the final subspace leaves exactly the
        // out-of-range component of b.
        assert!((residual_norm(&a, &b, &x) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn jacobi_preconditioning_cuts_iterations() {
        let n = 6;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let (x_plain, stats_plain) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats_plain.solved);
        let pc = Jacobi::from_operator(&a).unwrap();
        let left = GmresOptions::default().with_left_preconditioner(&pc);
        let (x_left, stats_left) = gmres(&a, &b, &left).unwrap();
        assert!(stats_left.solved);
        assert!(
            stats_left.niter < stats_plain.niter,
            "left preconditioning did not help: {} vs {}",
            stats_left.niter,
            stats_plain.niter
        );
        for (xi, yi) in x_plain.iter().zip(x_left.iter()) {
            assert!((xi - yi).abs() < 1e-5);
        }
    }

    #[test]
    fn right_preconditioning_preserves_the_solution() {
        let n = 6;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let pc = Jacobi::from_operator(&a).unwrap();
        let right = GmresOptions::default().with_right_preconditioner(&pc);
        let (x, stats) = gmres(&a, &b, &right).unwrap();
        assert!(stats.solved);
        assert!(residual_norm(&a, &b, &x) < 1e-5);
    }

    #[test]
    fn ldiv_application_matches_multiplicative() {
        let n = 6;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let pc = Jacobi::from_operator(&a).unwrap();
        let mul = GmresOptions::default().with_left_preconditioner(&pc);
        let (x_mul, _) = gmres(&a, &b, &mul).unwrap();
        let div = GmresOptions::default()
            .with_left_preconditioner(&pc)
            .with_ldiv(true);
        let (x_div, _) = gmres(&a, &b, &div).unwrap();
        for (xi, yi) in x_mul.iter().zip(x_div.iter()) {
            assert!((xi - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn reorthogonalization_keeps_the_basis_orthonormal() {
        let n = 12;
        let a = DenseMatrix::from_fn(n, n, |i, j| {
            1.0 / ((i + j + 1) as f64) + if i == j { 2.0 } else { 0.0 }
        });
        let b: Vec<f64> = (0..n).map(|i| ((i * 7 + 3) % 5) as f64 - 2.0).collect();
        let opts = GmresOptions::default()
            .with_reorthogonalization(true)
            .with_tolerances(1e-10, 1e-10);
        let mut workspace = GmresWorkspace::new(n);
        let solved = workspace.solve(&a, &b, &opts, None).unwrap().solved;
        let k = workspace.inner_iter;
        assert!(solved);
        for i in 0..k {
            for j in 0..k {
                let d = kernels::dot(&workspace.v_basis[i], &workspace.v_basis[j]);
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (d - expected).abs() < 1e-10,
                    "V[{i}]ᴴV[{j}] = {d}"
                );
            }
        }
    }

    #[test]
    fn warm_start_from_solution_converges_immediately() {
        let a = DenseMatrix::from_rows(vec![
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, 1.0],
            vec![0.0, 1.0, 2.0],
        ]);
        let b = vec![6.0, 10.0, 8.0];
        let (x, stats) = gmres(&a, &b, &GmresOptions::default()).unwrap();
        assert!(stats.solved);
        let (x2, stats2) = gmres_warm(&a, &b, &x, &GmresOptions::default()).unwrap();
        assert!(stats2.solved);
        assert!(stats2.niter <= 3);
        for (xi, yi) in x.iter().zip(x2.iter()) {
            assert!(f64::abs(xi - yi) < 1e-6);
        }
    }

    #[test]
    fn workspace_reuse_is_equivalent_to_fresh_solves() {
        let a = DenseMatrix::from_rows(vec![
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, 1.0],
            vec![0.0, 1.0, 2.0],
        ]);
        let b1 = vec![6.0, 10.0, 8.0];
        let b2 = vec![-1.0, 0.5, 2.0];
        let opts = GmresOptions::default();
        let mut shared = GmresWorkspace::new(3);
        shared.solve(&a, &b1, &opts, None).unwrap();
        let x1_shared = shared.solution().to_vec();
        shared.solve(&a, &b2, &opts, None).unwrap();
        let x2_shared = shared.solution().to_vec();
        let (x1, _) = gmres(&a, &b1, &opts).unwrap();
        let (x2, _) = gmres(&a, &b2, &opts).unwrap();
        assert_eq!(x1, x1_shared);
        assert_eq!(x2, x2_shared);
    }

    #[test]
    fn callback_can_request_exit() {
        let n = 8;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let mut workspace = GmresWorkspace::new(n);
        let mut cb = |ws: &GmresWorkspace<f64>| ws.niter() >= 2;
        let stats = workspace
            .solve(&a, &b, &GmresOptions::default(), Some(&mut cb))
            .unwrap();
        assert_eq!(stats.niter, 2);
        assert_eq!(stats.status.to_string(), "user-requested exit");
    }

    #[test]
    fn iteration_cap_is_reported() {
        let n = 8;
        let a = tridiag(n);
        let b = vec![1.0; n];
        let opts = GmresOptions::default().with_itmax(2);
        let (_, stats) = gmres(&a, &b, &opts).unwrap();
        assert!(!stats.solved);
        assert_eq!(stats.niter, 2);
        assert_eq!(
            stats.status.to_string(),
            "maximum number of iterations exceeded"
        );
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let a = DenseMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let err = gmres(&a, &[1.0, 2.0, 3.0], &GmresOptions::default()).unwrap_err();
        assert!(matches!(err, KrylovError::DimensionMismatch { .. }));
        let rect = DenseMatrix::from_rows(vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
        let err = gmres(&rect, &[1.0, 2.0], &GmresOptions::default()).unwrap_err();
        assert!(matches!(err, KrylovError::NonSquareSystem { .. }));
    }
}
