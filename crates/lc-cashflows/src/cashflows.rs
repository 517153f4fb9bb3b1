//! Cash-flow analysis functions operating on a [`Leg`].

use lc_core::errors::Result;
use lc_core::Real;
use lc_termstructures::YieldTermStructure;
use lc_time::Date;

use crate::cashflow::Leg;

/// The maturity (last payment) date of a leg.
pub fn maturity_date(leg: &Leg) -> Option<Date> {
    leg.iter().map(|cf| cf.date()).max()
}

/// Value of the flows still to be paid after `settlement_date`, discounted
/// on `curve` and expressed as of `npv_date`.
pub fn npv(
    leg: &Leg,
    curve: &dyn YieldTermStructure,
    settlement_date: Date,
    npv_date: Date,
) -> Result<Real> {
    let mut total = 0.0;
    for cf in leg.iter().filter(|cf| !cf.has_occurred(settlement_date)) {
        total += cf.amount() * curve.discount_date(cf.date())?;
    }
    Ok(total / curve.discount_date(npv_date)?)
}

/// Interest accrued on `date` by the first coupon not yet paid.
pub fn accrued_amount(leg: &Leg, date: Date) -> Real {
    leg.iter()
        .filter(|cf| !cf.has_occurred(date))
        .find_map(|cf| cf.as_coupon().map(|c| c.accrued_amount(date)))
        .unwrap_or(0.0)
}
