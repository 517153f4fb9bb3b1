//! Tridiagonal linear systems.
//!
//! Solved with the Thomas algorithm (LU decomposition specialised to three
//! bands), which is stable for the diagonally dominant systems produced by
//! spline fitting.

use lc_core::errors::{Error, Result};
use lc_core::Real;

/// A tridiagonal matrix `A`, stored by bands.
#[derive(Debug, Clone)]
pub struct TridiagonalSystem {
    /// Sub-diagonal; `lower[0]` is unused.
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Super-diagonal; the last entry is unused.
    pub upper: Vec<Real>,
}

impl TridiagonalSystem {
    /// A zero system of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Solve `A · x = rhs`.
    ///
    /// # Errors
    /// Fails if `rhs` has the wrong length or a zero pivot is met.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        if rhs.len() != n {
            return Err(Error::SizeMismatch {
                left: "matrix rows",
                left_len: n,
                right: "right-hand-side entries",
                right_len: rhs.len(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];
        let mut pivot = self.diag[0];
        for i in 0..n {
            if i > 0 {
                pivot = self.diag[i] - self.lower[i] * c[i - 1];
            }
            if pivot == 0.0 || !pivot.is_finite() {
                return Err(Error::Runtime(format!(
                    "tridiagonal system is singular at row {i}"
                )));
            }
            if i + 1 < n {
                c[i] = self.upper[i] / pivot;
            }
            let carried = if i > 0 { self.lower[i] * d[i - 1] } else { 0.0 };
            d[i] = (rhs[i] - carried) / pivot;
        }

        let mut x = d;
        for i in (0..n - 1).rev() {
            x[i] -= c[i] * x[i + 1];
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn solves_identity() {
        let mut a = TridiagonalSystem::new(4);
        a.diag = vec![1.0; 4];
        let x = a.solve(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(x, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn solves_laplacian() {
        // A = [[2, -1, 0], [-1, 2, -1], [0, -1, 2]], x = [1, 2, 3]
        let a = TridiagonalSystem {
            lower: vec![0.0, -1.0, -1.0],
            diag: vec![2.0, 2.0, 2.0],
            upper: vec![-1.0, -1.0, 0.0],
        };
        let x = a.solve(&[0.0, 0.0, 4.0]).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_singular_and_mismatched() {
        let a = TridiagonalSystem::new(2);
        assert!(a.solve(&[1.0, 1.0]).is_err());
        assert!(matches!(
            a.solve(&[1.0]),
            Err(Error::SizeMismatch { left_len: 2, right_len: 1, .. })
        ));
    }
}
