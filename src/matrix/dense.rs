//! Dense row-major matrix operator.
//!
//! Small assembled systems and tests use this type; large problems are
//! expected to come in as matrix-free [`LinearOperator`]s instead.

use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;

/// Dense matrix with row-major storage implementing [`LinearOperator`].
#[derive(Clone, Debug)]
pub struct DenseMatrix<FC> {
    nrows: usize,
    ncols: usize,
    data: Vec<FC>,
    symmetric: bool,
    hermitian: bool,
}

impl<FC: Scalar> DenseMatrix<FC> {
    /// Construct from raw row-major storage.
    pub fn from_raw(nrows: usize, ncols: usize, data: Vec<FC>) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        Self {
            nrows,
            ncols,
            data,
            symmetric: false,
            hermitian: false,
        }
    }

    /// Construct from a list of rows.
    pub fn from_rows(rows: Vec<Vec<FC>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in &rows {
            assert_eq!(row.len(), ncols);
            data.extend_from_slice(row);
        }
        Self::from_raw(nrows, ncols, data)
    }

    /// Construct elementwise.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> FC) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self::from_raw(nrows, ncols, data)
    }

    /// Declare the matrix symmetric (trusted, not verified).
    pub fn assume_symmetric(mut self) -> Self {
        self.symmetric = true;
        self
    }

    /// Declare the matrix Hermitian (trusted, not verified). Hermitian does
    /// not imply symmetric for complex scalars; call
    /// [`assume_symmetric`](Self::assume_symmetric) as well when both hold.
    pub fn assume_hermitian(mut self) -> Self {
        self.hermitian = true;
        self
    }

    pub fn get(&self, i: usize, j: usize) -> FC {
        self.data[i * self.ncols + j]
    }
}

impl<FC: Scalar> LinearOperator<FC> for DenseMatrix<FC> {
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
        debug_assert_eq!(y.len(), self.nrows);
        debug_assert_eq!(x.len(), self.ncols);
        for (i, yi) in y.iter_mut().enumerate() {
            let row = &self.data[i * self.ncols..(i + 1) * self.ncols];
            let mut acc = FC::zero();
            for (aij, xj) in row.iter().zip(x.iter()) {
                acc += *aij * *xj;
            }
            *yi = acc;
        }
    }

    fn apply_transpose(&self, y: &mut [FC], x: &[FC]) {
        debug_assert_eq!(y.len(), self.ncols);
        debug_assert_eq!(x.len(), self.nrows);
        for yj in y.iter_mut() {
            *yj = FC::zero();
        }
        for (i, xi) in x.iter().enumerate() {
            let row = &self.data[i * self.ncols..(i + 1) * self.ncols];
            for (yj, aij) in y.iter_mut().zip(row.iter()) {
                *yj += *aij * *xi;
            }
        }
    }

    fn apply_adjoint(&self, y: &mut [FC], x: &[FC]) {
        debug_assert_eq!(y.len(), self.ncols);
        debug_assert_eq!(x.len(), self.nrows);
        for yj in y.iter_mut() {
            *yj = FC::zero();
        }
        for (i, xi) in x.iter().enumerate() {
            let row = &self.data[i * self.ncols..(i + 1) * self.ncols];
            for (yj, aij) in y.iter_mut().zip(row.iter()) {
                *yj += aij.conj() * *xi;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn matvec_matches_rows() {
        let a = DenseMatrix::from_rows(vec![
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, 1.0],
            vec![0.0, 1.0, 2.0],
        ]);
        let mut y = vec![0.0; 3];
        a.apply(&mut y, &[1.0, 2.0, 3.0]);
        assert_eq!(y, vec![6.0, 10.0, 8.0]);
    }

    #[test]
    fn transpose_and_adjoint() {
        let i = Complex64::new(0.0, 1.0);
        let one = Complex64::new(1.0, 0.0);
        let a = DenseMatrix::from_rows(vec![vec![one, i], vec![-i, one]]);
        let x = vec![one, one];
        let mut yt = vec![Complex64::new(0.0, 0.0); 2];
        a.apply_transpose(&mut yt, &x);
        assert_eq!(yt, vec![one - i, one + i]);
        let mut yh = vec![Complex64::new(0.0, 0.0); 2];
        a.apply_adjoint(&mut yh, &x);
        assert_eq!(yh, vec![one + i, one - i]);
    }

    #[test]
    fn from_fn_indexing() {
        let a = DenseMatrix::from_fn(2, 3, |i, j| (i * 3 + j) as f64);
        assert_eq!(a.get(1, 2), 5.0);
        assert_eq!((a.nrows(), a.ncols()), (2, 3));
    }
}
