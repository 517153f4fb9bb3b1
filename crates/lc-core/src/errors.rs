//! Error types for lazycurve.
//!
//! Every fallible operation in the workspace returns a single
//! `thiserror`-derived enum.  Precondition checks go through `ensure!`,
//! unconditional failures through `fail!`.
//!
//! Failures fall into two families:
//! * **configuration** errors, raised when an object is built from
//!   inconsistent inputs (mismatched lengths, too few knots, bad dates);
//! * **state-ordering** errors, raised when an operation is invoked before
//!   the object it depends on has been bound (empty handles, unbound helpers).

use thiserror::Error;

/// The top-level error type used throughout lazycurve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two inputs that must have the same length do not.
    #[error("mismatch between number of {left} ({left_len}) and number of {right} ({right_len})")]
    SizeMismatch {
        /// What the first sequence holds.
        left: &'static str,
        /// Length of the first sequence.
        left_len: usize,
        /// What the second sequence holds.
        right: &'static str,
        /// Length of the second sequence.
        right_len: usize,
    },

    /// An interpolation scheme was given fewer points than it needs.
    #[error("{method} interpolation requires at least {required} points, got {actual}")]
    InsufficientKnots {
        /// Interpolation scheme name.
        method: &'static str,
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// An operation was invoked before a required binding was made.
    #[error("{0}")]
    NotReady(String),

    /// An empty handle was dereferenced.
    #[error("empty handle cannot be dereferenced")]
    EmptyHandle,

    /// A non-owning handle outlived its target.
    #[error("handle target has been dropped")]
    DanglingHandle,

    /// One or more observers failed while being notified.
    #[error("{failed} observer(s) failed during notification; first failure: {first}")]
    Notification {
        /// Number of observers whose update failed.
        failed: usize,
        /// The first failure encountered.
        first: Box<Error>,
    },
}

impl Error {
    /// `true` for errors caused by inconsistent construction inputs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Precondition(_)
                | Error::Date(_)
                | Error::InvalidArgument(_)
                | Error::SizeMismatch { .. }
                | Error::InsufficientKnots { .. }
        )
    }

    /// `true` for errors caused by calling an operation before its inputs
    /// were bound.
    pub fn is_state_ordering(&self) -> bool {
        matches!(
            self,
            Error::NotReady(_) | Error::EmptyHandle | Error::DanglingHandle
        )
    }
}

/// Shorthand `Result` type used throughout lazycurve.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use lc_core::{ensure, errors::Error};
/// fn positive(x: f64) -> lc_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use lc_core::{fail, errors::Error};
/// fn always_err() -> lc_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_names_both_counts() {
        let e = Error::SizeMismatch {
            left: "option tenors",
            left_len: 3,
            right: "cap volatilities",
            right_len: 4,
        };
        assert_eq!(
            e.to_string(),
            "mismatch between number of option tenors (3) and number of cap volatilities (4)"
        );
        assert!(e.is_configuration());
        assert!(!e.is_state_ordering());
    }

    #[test]
    fn classification() {
        assert!(Error::NotReady("term structure not set".into()).is_state_ordering());
        assert!(Error::EmptyHandle.is_state_ordering());
        assert!(Error::DanglingHandle.is_state_ordering());
        assert!(Error::InsufficientKnots {
            method: "natural cubic",
            required: 4,
            actual: 2
        }
        .is_configuration());
        assert!(!Error::Runtime("x".into()).is_configuration());
    }

    #[test]
    fn notification_reports_first_failure() {
        let e = Error::Notification {
            failed: 2,
            first: Box::new(Error::Runtime("boom".into())),
        };
        assert_eq!(
            e.to_string(),
            "2 observer(s) failed during notification; first failure: boom"
        );
    }
}
