// Jacobi (diagonal) preconditioner.
//
// Approximates A⁻¹ by the inverse of its diagonal, which is all a Krylov
// method needs from a baseline preconditioner: a cheap Hermitian
// positive-definite operator applied once per iteration. Build it from a
// known diagonal or by probing an arbitrary operator with unit vectors.

use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;
use crate::error::KrylovError;

/// Diagonal preconditioner M⁻¹ = D⁻¹, stored as the inverted diagonal.
#[derive(Clone, Debug)]
pub struct Jacobi<FC> {
    inv_diag: Vec<FC>,
}

impl<FC: Scalar> Jacobi<FC> {
    /// Build from the diagonal of the system matrix. Fails on a zero entry.
    pub fn from_diagonal(diag: &[FC]) -> Result<Self, KrylovError> {
        let mut inv_diag = Vec::with_capacity(diag.len());
        for (index, d) in diag.iter().enumerate() {
            if *d == FC::zero() {
                return Err(KrylovError::SingularDiagonal { index });
            }
            inv_diag.push(FC::one() / *d);
        }
        Ok(Self { inv_diag })
    }

    /// Extract the diagonal of `a` by applying it to unit vectors, then
    /// invert it. Costs `n` operator applications; meant for setup, not for
    /// inner loops.
    pub fn from_operator(a: &dyn LinearOperator<FC>) -> Result<Self, KrylovError> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(KrylovError::NonSquareSystem {
                nrows: a.nrows(),
                ncols: a.ncols(),
            });
        }
        let mut e = vec![FC::zero(); n];
        let mut col = vec![FC::zero(); n];
        let mut diag = Vec::with_capacity(n);
        for i in 0..n {
            e[i] = FC::one();
            a.apply(&mut col, &e);
            e[i] = FC::zero();
            diag.push(col[i]);
        }
        Self::from_diagonal(&diag)
    }
}

impl<FC: Scalar> LinearOperator<FC> for Jacobi<FC> {
    fn nrows(&self) -> usize {
        self.inv_diag.len()
    }

    fn ncols(&self) -> usize {
        self.inv_diag.len()
    }

    fn symmetric(&self) -> bool {
        true
    }

    fn hermitian(&self) -> bool {
        true
    }

    /// y ← D⁻¹·x
    fn apply(&self, y: &mut [FC], x: &[FC]) {
        debug_assert_eq!(x.len(), self.inv_diag.len());
        for ((yi, xi), di) in y.iter_mut().zip(x.iter()).zip(self.inv_diag.iter()) {
            *yi = *di * *xi;
        }
    }

    /// Division form of the same action: y ← x / D.
    fn solve(&self, y: &mut [FC], x: &[FC]) {
        self.apply(y, x)
    }
}
