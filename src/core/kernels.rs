//! In-place vector primitives shared by all solver kernels.
//!
//! These are the only routines that touch vector storage inside the inner
//! loops, so they are written as plain slice traversals that vectorise
//! trivially and can be retargeted to device kernels: no allocation, no
//! bounds arithmetic beyond the zipped iteration, scalar reductions returned
//! by value.

use num_traits::{Float, Zero};

use crate::core::scalar::Scalar;

/// y ← α·x + y
pub fn axpy<FC: Scalar>(alpha: FC, x: &[FC], y: &mut [FC]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * *xi;
    }
}

/// y ← α·x + β·y
pub fn axpby<FC: Scalar>(alpha: FC, x: &[FC], beta: FC, y: &mut [FC]) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi = alpha * *xi + beta * *yi;
    }
}

/// x ← α·x
pub fn scal<FC: Scalar>(alpha: FC, x: &mut [FC]) {
    for xi in x.iter_mut() {
        *xi *= alpha;
    }
}

/// Conjugated dot product Σᵢ conj(xᵢ)·yᵢ.
pub fn dot<FC: Scalar>(x: &[FC], y: &[FC]) -> FC {
    debug_assert_eq!(x.len(), y.len());
    let mut acc = FC::zero();
    for (xi, yi) in x.iter().zip(y.iter()) {
        acc += xi.conj() * *yi;
    }
    acc
}

/// Real part of the conjugated dot product, for quantities that are real by
/// construction (e.g. vᴴMv with Hermitian M).
pub fn dotr<FC: Scalar>(x: &[FC], y: &[FC]) -> FC::Real {
    dot(x, y).re()
}

/// Euclidean norm ‖x‖₂.
pub fn nrm2<FC: Scalar>(x: &[FC]) -> FC::Real {
    let mut acc = FC::Real::zero();
    for xi in x.iter() {
        acc = acc + xi.norm_sqr();
    }
    acc.sqrt()
}

/// y ← x
pub fn copy<FC: Scalar>(x: &[FC], y: &mut [FC]) {
    debug_assert_eq!(x.len(), y.len());
    y.copy_from_slice(x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn axpy_axpby_scal() {
        let x = vec![1.0, 2.0, 3.0];
        let mut y = vec![1.0, 1.0, 1.0];
        axpy(2.0, &x, &mut y);
        assert_eq!(y, vec![3.0, 5.0, 7.0]);
        axpby(1.0, &x, -1.0, &mut y);
        assert_eq!(y, vec![-2.0, -3.0, -4.0]);
        scal(-0.5, &mut y);
        assert_eq!(y, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn dot_conjugates_left_argument() {
        let x = vec![Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)];
        let y = vec![Complex64::new(3.0, 0.0), Complex64::new(1.0, 1.0)];
        let d = dot(&x, &y);
        // conj(1+2i)*3 + conj(-i)*(1+i) = 3-6i + i-1 = 2-5i
        assert_eq!(d, Complex64::new(2.0, -5.0));
    }

    #[test]
    fn dotr_is_real_part() {
        let x = vec![Complex64::new(0.0, 1.0)];
        let y = vec![Complex64::new(0.0, 1.0)];
        assert_eq!(dotr(&x, &y), 1.0);
    }

    #[test]
    fn nrm2_real_and_complex() {
        assert_eq!(nrm2(&[3.0f64, 4.0]), 5.0);
        assert_eq!(nrm2(&[Complex64::new(3.0, 4.0)]), 5.0);
    }
}
