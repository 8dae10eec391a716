//! Termination status, per-method stats and tolerance checks.

use num_traits::Float;

/// How a solve ended. `Display` yields the stable, user-visible wording.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// Solve not yet run or still in progress.
    Unknown,
    /// The right-hand side had zero residual at entry.
    ZeroResidual,
    /// Converged within `atol`/`rtol`.
    Solved,
    /// Iteration cap reached first.
    MaxIterations,
    /// CG-Lanczos met a direction of non-positive curvature.
    NegativeCurvature,
    /// Rank-deficient least-squares fallback (GMRES).
    LeastSquares,
    /// The user callback asked to stop.
    UserExit,
}

impl SolverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolverStatus::Unknown => "unknown",
            SolverStatus::ZeroResidual => "x = 0 is a zero-residual solution",
            SolverStatus::Solved => "solution good enough given atol and rtol",
            SolverStatus::MaxIterations => "maximum number of iterations exceeded",
            SolverStatus::NegativeCurvature => "negative curvature",
            SolverStatus::LeastSquares => "found approximate least-squares solution",
            SolverStatus::UserExit => "user-requested exit",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stats shared by the general-purpose methods (GMRES family).
#[derive(Clone, Debug)]
pub struct SimpleStats<T> {
    pub niter: usize,
    pub solved: bool,
    pub inconsistent: bool,
    /// Residual-norm history; populated only when the `history` option is on.
    pub residuals: Vec<T>,
    pub status: SolverStatus,
}

impl<T> Default for SimpleStats<T> {
    fn default() -> Self {
        Self {
            niter: 0,
            solved: false,
            inconsistent: false,
            residuals: Vec::new(),
            status: SolverStatus::Unknown,
        }
    }
}

impl<T> SimpleStats<T> {
    pub fn reset(&mut self) {
        self.niter = 0;
        self.solved = false;
        self.inconsistent = false;
        self.residuals.clear();
        self.status = SolverStatus::Unknown;
    }
}

/// Stats for the Lanczos-based Hermitian methods.
#[derive(Clone, Debug)]
pub struct LanczosStats<T> {
    pub niter: usize,
    pub solved: bool,
    /// A direction of non-positive curvature was met.
    pub indefinite: bool,
    /// Frobenius-based estimate of ‖A‖ from the Lanczos tridiagonal.
    pub anorm: T,
    /// Residual-norm history; populated only when the `history` option is on.
    pub residuals: Vec<T>,
    pub status: SolverStatus,
}

impl<T: Float> Default for LanczosStats<T> {
    fn default() -> Self {
        Self {
            niter: 0,
            solved: false,
            indefinite: false,
            anorm: T::zero(),
            residuals: Vec::new(),
            status: SolverStatus::Unknown,
        }
    }
}

impl<T: Float> LanczosStats<T> {
    pub fn reset(&mut self) {
        self.niter = 0;
        self.solved = false;
        self.indefinite = false;
        self.anorm = T::zero();
        self.residuals.clear();
        self.status = SolverStatus::Unknown;
    }
}

/// Absolute stopping threshold `atol + rtol·‖r₀‖`.
pub fn residual_tolerance<T: Float>(atol: T, rtol: T, rnorm0: T) -> T {
    atol + rtol * rnorm0
}

/// Round-off guard: a residual this small is converged no matter what the
/// user tolerances say.
pub fn residual_collapsed<T: Float>(rnorm: T) -> bool {
    rnorm + T::one() <= T::one()
}
