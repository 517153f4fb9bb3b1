//! The `BootstrapHelper` trait and helper ordering.

use std::rc::Rc;

use lc_core::errors::{Error, Result};
use lc_core::handle::Handle;
use lc_core::patterns::observable::Observable;
use lc_core::Real;
use lc_quotes::Quote;
use lc_termstructures::YieldTermStructure;
use lc_time::Date;

/// A market quote that constrains a curve being bootstrapped.
///
/// A helper starts unbound.  [`set_term_structure`][Self::set_term_structure]
/// binds it to the solver's trial curve; only then can
/// [`implied_quote`][Self::implied_quote] be asked for.  The solver adjusts
/// the trial curve until [`quote_error`][Self::quote_error] vanishes.
///
/// Helpers notify their observers when the market quote or the evaluation
/// date changes, never when the trial curve moves.
pub trait BootstrapHelper: Observable + std::fmt::Debug {
    /// The market quote the curve must reproduce.
    fn quote(&self) -> &Handle<dyn Quote>;

    /// The latest date on which this helper depends on the curve.
    fn latest_date(&self) -> Date;

    /// Bind the helper to `curve` without observing it.
    ///
    /// The helper does not keep `curve` alive.
    fn set_term_structure(&self, curve: &Rc<dyn YieldTermStructure>) -> Result<()>;

    /// The quote implied by the bound curve.
    ///
    /// # Errors
    /// [`Error::NotReady`] if no curve has been bound yet.
    fn implied_quote(&self) -> Result<Real>;

    /// Market quote minus implied quote.
    fn quote_error(&self) -> Result<Real> {
        let market = self.quote().current()?.require_value()?;
        Ok(market - self.implied_quote()?)
    }
}

/// Sort helpers into calibration order, earliest latest date first.
///
/// The sort is stable.
pub fn sort_helpers_by_latest_date<H>(helpers: &mut [Rc<H>])
where
    H: BootstrapHelper + ?Sized,
{
    helpers.sort_by_key(|h| h.latest_date());
}

/// Fail if two helpers of a sorted slice share a latest date.
///
/// Two such helpers would pin the same pillar of the curve.
pub fn check_distinct_latest_dates<H>(helpers: &[Rc<H>]) -> Result<()>
where
    H: BootstrapHelper + ?Sized,
{
    for pair in helpers.windows(2) {
        let (a, b) = (pair[0].latest_date(), pair[1].latest_date());
        if a == b {
            return Err(Error::InvalidArgument(format!(
                "more than one instrument with latest date {a}"
            )));
        }
        if a > b {
            return Err(Error::Precondition(format!(
                "helpers are not sorted: {a} comes before {b}"
            )));
        }
    }
    Ok(())
}
