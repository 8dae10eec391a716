//! Scalar abstraction over real and complex floats.
//!
//! Every solver is generic over a scalar `FC` implementing [`Scalar`], with
//! an associated base real type `Real`. Norms, tolerances, Givens cosines and
//! curvature quantities always live in `Real`; the two types are never
//! conflated. `f32`, `f64` and `num_complex::Complex` over any conforming
//! real float are supported out of the box.

use std::fmt;

use num_complex::Complex;
use num_traits::{Float, Num, NumAssign};

/// A real or complex scalar usable by the Krylov kernels.
pub trait Scalar:
    Copy
    + Num
    + NumAssign
    + std::ops::Neg<Output = Self>
    + fmt::Debug
    + Send
    + Sync
    + 'static
{
    /// Base real floating-point type.
    type Real: Float
        + NumAssign
        + fmt::Debug
        + fmt::Display
        + fmt::LowerExp
        + Send
        + Sync
        + 'static;

    /// Embed a real value.
    fn from_real(r: Self::Real) -> Self;

    /// Complex conjugate (identity for real scalars).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Modulus |x|.
    fn abs(self) -> Self::Real;

    /// Squared modulus |x|².
    fn norm_sqr(self) -> Self::Real;

    /// Principal square root.
    fn sqrt(self) -> Self;

    /// Machine epsilon of the base real type.
    fn eps() -> Self::Real {
        Self::Real::epsilon()
    }
}

macro_rules! impl_scalar_real {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            type Real = $t;

            fn from_real(r: $t) -> Self {
                r
            }

            fn conj(self) -> Self {
                self
            }

            fn re(self) -> $t {
                self
            }

            fn abs(self) -> $t {
                <$t>::abs(self)
            }

            fn norm_sqr(self) -> $t {
                self * self
            }

            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
        }
    )*};
}

impl_scalar_real!(f32, f64);

impl<T> Scalar for Complex<T>
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
    type Real = T;

    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }

    fn conj(self) -> Self {
        Complex::new(self.re, -self.im)
    }

    fn re(self) -> T {
        self.re
    }

    fn abs(self) -> T {
        self.norm()
    }

    fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }

    fn sqrt(self) -> Self {
        Complex::sqrt(self)
    }
}
