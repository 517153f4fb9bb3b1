//! # lc-math
//!
//! Numerical kernels used by the term structures: one-dimensional
//! interpolation and the tridiagonal solver behind the natural cubic spline.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// 1D interpolation trait and implementations.
pub mod interpolations;

/// Tridiagonal linear systems (Thomas algorithm).
pub mod tridiagonal;

pub use interpolations::cubic::CubicNaturalSpline;
pub use interpolations::{ConstantInterpolation, Interpolation1D};
pub use tridiagonal::TridiagonalSystem;
