//! Natural cubic spline.
//!
//! A C² piecewise cubic through every knot whose second derivative vanishes
//! at both ends.  The interior second derivatives `M_i` solve the tridiagonal
//! system
//!
//!   `h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1}
//!        = 6 (s_i − s_{i-1})`
//!
//! with `h_i = x_{i+1} − x_i` and secants `s_i = (y_{i+1} − y_i) / h_i`.
//! Each interval is then stored as
//!
//!   `f(x) = y_i + dx*(a_i + dx*(b_i + dx*c_i))`,  `dx = x − x_i`.
//!
//! Fewer than four knots do not determine a meaningful natural fit and are
//! rejected.

use lc_core::errors::{Error, Result};
use lc_core::Real;

use super::{check_knots, locate, Interpolation1D};
use crate::tridiagonal::TridiagonalSystem;

/// Natural cubic spline interpolation.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Minimum number of knots.
    pub const MIN_KNOTS: usize = 4;

    /// Fit a spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    /// * [`Error::SizeMismatch`] if the slices differ in length;
    /// * [`Error::InsufficientKnots`] for fewer than four knots;
    /// * a precondition error for non-finite or non-increasing inputs.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_knots(xs, ys)?;
        if xs.len() < Self::MIN_KNOTS {
            return Err(Error::InsufficientKnots {
                method: "natural cubic spline",
                required: Self::MIN_KNOTS,
                actual: xs.len(),
            });
        }

        let n = xs.len();
        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        let interior = n - 2;
        let mut system = TridiagonalSystem::new(interior);
        let mut rhs = vec![0.0; interior];
        for k in 0..interior {
            let i = k + 1;
            system.lower[k] = h[i - 1];
            system.diag[k] = 2.0 * (h[i - 1] + h[i]);
            system.upper[k] = h[i];
            rhs[k] = 6.0 * (s[i] - s[i - 1]);
        }
        let mut m = Vec::with_capacity(n);
        m.push(0.0);
        m.extend(system.solve(&rhs)?);
        m.push(0.0);

        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            a.push(s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
            b.push(m[i] / 2.0);
            c.push((m[i + 1] - m[i]) / (6.0 * h[i]));
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            a,
            b,
            c,
        })
    }

    /// The knot abscissae.
    pub fn xs(&self) -> &[Real] {
        &self.xs
    }

    /// The knot values.
    pub fn ys(&self) -> &[Real] {
        &self.ys
    }

    fn piece(&self, x: Real) -> (usize, Real) {
        let i = locate(&self.xs, x);
        (i, x - self.xs[i])
    }
}

impl Interpolation1D for CubicNaturalSpline {
    fn value(&self, x: Real) -> Real {
        let (i, dx) = self.piece(x);
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        let (i, dx) = self.piece(x);
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    fn second_derivative(&self, x: Real) -> Real {
        let (i, dx) = self.piece(x);
        2.0 * self.b[i] + 6.0 * dx * self.c[i]
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}
