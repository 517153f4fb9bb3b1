//! 1D interpolation.
//!
//! Curves only ever need two schemes: the natural cubic spline
//! ([`cubic::CubicNaturalSpline`]) and, for single-point inputs, a constant.
//! Both evaluate outside their knot range by extending the boundary piece;
//! whether a caller may do so is the caller's policy, not the
//! interpolation's.

use lc_core::errors::{Error, Result};
use lc_core::Real;

/// Natural cubic spline.
pub mod cubic;

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// First derivative at `x`.
    fn derivative(&self, x: Real) -> Real;

    /// Second derivative at `x`.
    fn second_derivative(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Check that `xs` and `ys` can serve as knots: same length, finite values
/// and strictly increasing abscissae.
pub(crate) fn check_knots(xs: &[Real], ys: &[Real]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(Error::SizeMismatch {
            left: "x values",
            left_len: xs.len(),
            right: "y values",
            right_len: ys.len(),
        });
    }
    lc_core::ensure!(
        xs.iter().chain(ys).all(|v| v.is_finite()),
        "interpolation knots must be finite"
    );
    if let Some(i) = xs.windows(2).position(|w| w[0] >= w[1]) {
        lc_core::fail!(
            "x values must be strictly increasing: x[{i}] = {} is followed by {}",
            xs[i],
            xs[i + 1]
        );
    }
    Ok(())
}

/// Index `i` such that `xs[i] <= x < xs[i+1]`, clamped to the first and
/// last interval.  `xs` must hold at least two points.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let last_interval = xs.len() - 2;
    match xs.partition_point(|&xi| xi <= x) {
        0 => 0,
        p => (p - 1).min(last_interval),
    }
}

/// The same value everywhere.
///
/// Used when a curve is defined by a single point.
#[derive(Debug, Clone)]
pub struct ConstantInterpolation {
    x: Real,
    y: Real,
}

impl ConstantInterpolation {
    /// A constant equal to `y`, anchored at `x`.
    pub fn new(x: Real, y: Real) -> Result<Self> {
        check_knots(&[x], &[y])?;
        Ok(Self { x, y })
    }
}

impl Interpolation1D for ConstantInterpolation {
    fn value(&self, _x: Real) -> Real {
        self.y
    }

    fn derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn second_derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn x_min(&self) -> Real {
        self.x
    }

    fn x_max(&self) -> Real {
        self.x
    }
}
