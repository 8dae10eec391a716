//! Preconditioner operators and how the solvers apply them.
//!
//! A preconditioner is just a [`LinearOperator`] standing in for M⁻¹ (or
//! N⁻¹ on the right). Operators modelling M⁻¹ directly are applied with
//! `apply`; operators holding a factorisation of M expose the same action
//! through `solve` and are selected by the `ldiv` option or their own
//! `uses_division` flag.

use crate::core::operator::LinearOperator;
use crate::core::scalar::Scalar;

pub mod jacobi;
pub use jacobi::Jacobi;

/// z ← P⁻¹·r through whichever application the operator calls for.
pub fn apply_preconditioner<FC: Scalar>(
    p: &dyn LinearOperator<FC>,
    z: &mut [FC],
    r: &[FC],
    ldiv: bool,
) {
    if ldiv || p.uses_division() {
        p.solve(z, r)
    } else {
        p.apply(z, r)
    }
}
