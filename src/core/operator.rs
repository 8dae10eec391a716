//! The linear-operator contract.
//!
//! Solvers only ever see an operator through [`LinearOperator`]: a shape, an
//! `apply` writing y ← A·x, and optional adjoint/transpose/division hooks.
//! Anything can sit behind it — an assembled matrix, a matrix-free stencil,
//! a preconditioner factorisation — and the solver neither owns nor mutates
//! it.

use crate::core::scalar::Scalar;

/// Operator–vector product interface: y ← A·x plus shape and flags.
///
/// `apply_transpose`, `apply_adjoint` and `solve` are optional; operators
/// that cannot provide them panic with a clear message, which is a
/// programmer error on the caller's side (the two methods implemented here
/// never require an adjoint).
pub trait LinearOperator<FC: Scalar> {
    /// Number of rows.
    fn nrows(&self) -> usize;

    /// Number of columns.
    fn ncols(&self) -> usize;

    /// Whether the operator is symmetric (Aᵀ = A).
    fn symmetric(&self) -> bool {
        false
    }

    /// Whether the operator is Hermitian (Aᴴ = A).
    fn hermitian(&self) -> bool {
        false
    }

    /// y ← A·x. `x.len() == ncols()`, `y.len() == nrows()`.
    fn apply(&self, y: &mut [FC], x: &[FC]);

    /// y ← Aᵀ·x.
    fn apply_transpose(&self, _y: &mut [FC], _x: &[FC]) {
        unimplemented!("operator does not provide a transpose")
    }

    /// y ← Aᴴ·x.
    fn apply_adjoint(&self, _y: &mut [FC], _x: &[FC]) {
        unimplemented!("operator does not provide an adjoint")
    }

    /// y ← A⁻¹·x by left-division, for preconditioners that are stored as a
    /// factorisation rather than an assembled inverse.
    fn solve(&self, _y: &mut [FC], _x: &[FC]) {
        unimplemented!("operator does not provide left-division")
    }

    /// Whether preconditioning should go through [`solve`](Self::solve)
    /// instead of [`apply`](Self::apply).
    fn uses_division(&self) -> bool {
        false
    }
}

/// Matrix-free operator backed by a closure.
pub struct FnOperator<FC, F>
where
    F: Fn(&mut [FC], &[FC]),
{
    nrows: usize,
    ncols: usize,
    f: F,
    symmetric: bool,
    hermitian: bool,
    _marker: std::marker::PhantomData<FC>,
}

impl<FC: Scalar, F: Fn(&mut [FC], &[FC])> FnOperator<FC, F> {
    pub fn new(nrows: usize, ncols: usize, f: F) -> Self {
        Self {
            nrows,
            ncols,
            f,
            symmetric: false,
            hermitian: false,
            _marker: std::marker::PhantomData,
        }
    }

    /// Declare the operator symmetric. The flag is trusted; violating it
    /// gives meaningless numerics but never unsafety.
    pub fn assume_symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    /// Declare the operator Hermitian. Hermitian does not imply symmetric
    /// for complex scalars; call
    /// [`assume_symmetric`](Self::assume_symmetric) as well when both hold.
    pub fn assume_hermitian(mut self) -> Self {
        self.hermitian = true;
        self
    }
}

impl<FC: Scalar, F: Fn(&mut [FC], &[FC])> LinearOperator<FC> for FnOperator<FC, F> {
    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn symmetric(&self) -> bool {
        self.symmetric
    }

    fn hermitian(&self) -> bool {
        self.hermitian
    }

    fn apply(&self, y: &mut [FC], x: &[FC]) {
        (self.f)(y, x)
    }
}
