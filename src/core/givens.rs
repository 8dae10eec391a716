//! Numerically stable Givens rotation generators.
//!
//! A rotation zeroing the second component of a 2-vector, with a real
//! cosine so it can be applied cheaply to the Hessenberg columns produced by
//! the Arnoldi process. Real and complex scalars need different degenerate
//! handling, so the generator is a trait method with one implementation per
//! scalar family.

use std::fmt;

use num_complex::Complex;
use num_traits::{Float, NumAssign};

use crate::core::scalar::Scalar;

/// Scalars supporting a stable symmetric Givens generator.
///
/// `sym_givens(a, b)` returns `(c, s, r)` with `c` real such that
///
/// ```text
/// [ c       s ] [ a ]   [ r ]
/// [ conj(s) -c ] [ b ] = [ 0 ]
/// ```
///
/// with `c² + |s|² = 1` and `|r|² = |a|² + |b|²`. For real scalars `r ≥ 0`.
/// The degenerate inputs `a = 0` and `b = 0` produce exact rotations, never
/// NaNs.
pub trait SymGivens: Scalar {
    fn sym_givens(a: Self, b: Self) -> (Self::Real, Self, Self);
}

macro_rules! impl_sym_givens_real {
    ($($t:ty),*) => {$(
        impl SymGivens for $t {
            fn sym_givens(a: $t, b: $t) -> ($t, $t, $t) {
                if b == 0.0 {
                    let c = if a == 0.0 { 1.0 } else { a.signum() };
                    (c, 0.0, a.abs())
                } else if a == 0.0 {
                    (0.0, b.signum(), b.abs())
                } else if b.abs() > a.abs() {
                    let t = a / b;
                    let s = b.signum() / (1.0 + t * t).sqrt();
                    let c = s * t;
                    (c, s, b / s)
                } else {
                    let t = b / a;
                    let c = a.signum() / (1.0 + t * t).sqrt();
                    let s = c * t;
                    (c, s, a / c)
                }
            }
        }
    )*};
}

impl_sym_givens_real!(f32, f64);

impl<T> SymGivens for Complex<T>
where
    T: Float
        + NumAssign
        + fmt::Debug
        + fmt::Display
        + fmt::LowerExp
        + Send
        + Sync
        + 'static,
{
    fn sym_givens(a: Complex<T>, b: Complex<T>) -> (T, Complex<T>, Complex<T>) {
        let abs_a = a.norm();
        let abs_b = b.norm();
        if abs_b == T::zero() {
            (T::one(), Complex::new(T::zero(), T::zero()), a)
        } else if abs_a == T::zero() {
            // |s| = 1 chosen so that r comes out real and non-negative
            (T::zero(), b / abs_b, Complex::new(abs_b, T::zero()))
        } else {
            // rho = sqrt(|a|² + |b|²), scaled to avoid overflow
            let rho = if abs_b > abs_a {
                let t = abs_a / abs_b;
                abs_b * (T::one() + t * t).sqrt()
            } else {
                let t = abs_b / abs_a;
                abs_a * (T::one() + t * t).sqrt()
            };
            let c = abs_a / rho;
            // s = a·conj(b)/(|a|·rho), kept at unit scale
            let s = (a / abs_a) * (b.conj() / rho);
            let r = (a / abs_a) * rho;
            (c, s, r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn check_real(a: f64, b: f64) {
        let (c, s, r) = f64::sym_givens(a, b);
        assert!((c * c + s * s - 1.0).abs() < 1e-14);
        assert!((c * a + s * b - r).abs() < 1e-12);
        assert!((s * a - c * b).abs() < 1e-12);
        assert!(r >= 0.0);
        assert!((r * r - (a * a + b * b)).abs() < 1e-10);
    }

    #[test]
    fn real_rotations() {
        check_real(3.0, 4.0);
        check_real(-3.0, 4.0);
        check_real(3.0, -4.0);
        check_real(-3.0, -4.0);
        check_real(1e-8, 1e8);
    }

    #[test]
    fn real_degenerate() {
        let (c, s, r) = f64::sym_givens(0.0, 0.0);
        assert_eq!((c, s, r), (1.0, 0.0, 0.0));
        let (c, s, r) = f64::sym_givens(-2.0, 0.0);
        assert_eq!((c, s, r), (-1.0, 0.0, 2.0));
        let (c, s, r) = f64::sym_givens(0.0, -3.0);
        assert_eq!((c, s, r), (0.0, -1.0, 3.0));
    }

    fn check_complex(a: Complex64, b: Complex64) {
        let (c, s, r) = Complex64::sym_givens(a, b);
        assert!((c * c + s.norm_sqr() - 1.0).abs() < 1e-14);
        // First row maps (a, b) to r, second row to zero.
        let top = a * c + b * s;
        let bottom = a * s.conj() - b * c;
        assert!((top - r).norm() < 1e-12);
        assert!(bottom.norm() < 1e-12);
        assert!((r.norm_sqr() - (a.norm_sqr() + b.norm_sqr())).abs() < 1e-10);
    }

    #[test]
    fn complex_rotations() {
        check_complex(Complex64::new(1.0, 2.0), Complex64::new(-3.0, 0.5));
        check_complex(Complex64::new(0.0, 1.0), Complex64::new(0.0, -1.0));
        check_complex(Complex64::new(1e-8, 0.0), Complex64::new(0.0, 1e8));
    }

    #[test]
    fn complex_degenerate() {
        let zero = Complex64::new(0.0, 0.0);
        let a = Complex64::new(2.0, -1.0);
        let (c, s, r) = Complex64::sym_givens(a, zero);
        assert_eq!((c, s, r), (1.0, zero, a));
        let b = Complex64::new(0.0, -4.0);
        let (c, s, r) = Complex64::sym_givens(zero, b);
        assert_eq!(c, 0.0);
        assert!((s.norm() - 1.0).abs() < 1e-15);
        assert_eq!(r, Complex64::new(4.0, 0.0));
        let (c, s, r) = Complex64::sym_givens(zero, zero);
        assert!(c == 1.0 && s == zero && r == zero);
    }
}
