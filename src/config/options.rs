//! Per-method solver options.
//!
//! Each method takes a small options struct with builder-style setters.
//! Defaults: `atol = rtol = sqrt(eps)`, `itmax = 0` (meaning `2n`), no
//! preconditioning, no history, no logging.

use num_traits::Float;

use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;

/// Options for [`crate::solver::cg_lanczos`].
pub struct CgLanczosOptions<'a, FC: Scalar> {
    /// Hermitian positive-definite left preconditioner (identity if `None`).
    pub m: Option<&'a dyn LinearOperator<FC>>,
    /// Apply preconditioners by left-division instead of multiplication.
    pub ldiv: bool,
    /// Stop with `indefinite` as soon as non-positive curvature is met.
    pub check_curvature: bool,
    /// Absolute residual tolerance.
    pub atol: FC::Real,
    /// Relative residual tolerance.
    pub rtol: FC::Real,
    /// Iteration cap; `0` means `2n`.
    pub itmax: usize,
    /// Log every `verbose` iterations; `0` disables logging.
    pub verbose: usize,
    /// Record the residual history in the stats.
    pub history: bool,
}

impl<FC: Scalar> Default for CgLanczosOptions<'_, FC> {
    fn default() -> Self {
        Self {
            m: None,
            ldiv: false,
            check_curvature: false,
            atol: FC::eps().sqrt(),
            rtol: FC::eps().sqrt(),
            itmax: 0,
            verbose: 0,
            history: false,
        }
    }
}

impl<'a, FC: Scalar> CgLanczosOptions<'a, FC> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preconditioner(mut self, m: &'a dyn LinearOperator<FC>) -> Self {
        self.m = Some(m);
        self
    }

    pub fn with_ldiv(mut self, ldiv: bool) -> Self {
        self.ldiv = ldiv;
        self
    }

    pub fn with_tolerances(mut self, atol: FC::Real, rtol: FC::Real) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }

    pub fn with_itmax(mut self, itmax: usize) -> Self {
        self.itmax = itmax;
        self
    }

    pub fn with_check_curvature(mut self, check: bool) -> Self {
        self.check_curvature = check;
        self
    }

    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }
}

/// Options for [`crate::solver::gmres`].
pub struct GmresOptions<'a, FC: Scalar> {
    /// Left preconditioner (identity if `None`).
    pub m: Option<&'a dyn LinearOperator<FC>>,
    /// Right preconditioner (identity if `None`).
    pub n: Option<&'a dyn LinearOperator<FC>>,
    /// Apply preconditioners by left-division instead of multiplication.
    pub ldiv: bool,
    /// Krylov basis size: restart window when `restart`, initial capacity
    /// hint otherwise. Used by the allocating entry points; an existing
    /// workspace keeps the capacity it was built with.
    pub memory: usize,
    /// Run GMRES(memory) instead of growing the basis.
    pub restart: bool,
    /// Second modified-Gram-Schmidt pass per Arnoldi step.
    pub reorthogonalization: bool,
    /// Absolute residual tolerance.
    pub atol: FC::Real,
    /// Relative residual tolerance.
    pub rtol: FC::Real,
    /// Iteration cap; `0` means `2n`.
    pub itmax: usize,
    /// Log every `verbose` inner iterations; `0` disables logging.
    pub verbose: usize,
    /// Record the residual history in the stats.
    pub history: bool,
}

impl<FC: Scalar> Default for GmresOptions<'_, FC> {
    fn default() -> Self {
        Self {
            m: None,
            n: None,
            ldiv: false,
            memory: 20,
            restart: false,
            reorthogonalization: false,
            atol: FC::eps().sqrt(),
            rtol: FC::eps().sqrt(),
            itmax: 0,
            verbose: 0,
            history: false,
        }
    }
}

impl<'a, FC: Scalar> GmresOptions<'a, FC> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left_preconditioner(mut self, m: &'a dyn LinearOperator<FC>) -> Self {
        self.m = Some(m);
        self
    }

    pub fn with_right_preconditioner(mut self, n: &'a dyn LinearOperator<FC>) -> Self {
        self.n = Some(n);
        self
    }

    pub fn with_ldiv(mut self, ldiv: bool) -> Self {
        self.ldiv = ldiv;
        self
    }

    pub fn with_memory(mut self, memory: usize) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_reorthogonalization(mut self, reorth: bool) -> Self {
        self.reorthogonalization = reorth;
        self
    }

    pub fn with_tolerances(mut self, atol: FC::Real, rtol: FC::Real) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }

    pub fn with_itmax(mut self, itmax: usize) -> Self {
        self.itmax = itmax;
        self
    }

    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }
}
