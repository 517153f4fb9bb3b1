//! `CashFlow` trait: the base for all cash-flow types.
//!
//! A cash flow is an amount of money paid or received at a specific date.

use std::fmt;
use std::rc::Rc;

use lc_core::Real;
use lc_time::Date;

use crate::coupon::Coupon;

/// Base trait for all cash flows.
pub trait CashFlow: fmt::Debug {
    /// The date on which this cash flow is paid.
    fn date(&self) -> Date;

    /// The amount of cash paid on the payment date.
    fn amount(&self) -> Real;

    /// Whether this cash flow has already been paid as of `ref_date`.
    ///
    /// A flow paid on `ref_date` itself counts as occurred: it belongs to
    /// whoever held the instrument before settlement.
    fn has_occurred(&self, ref_date: Date) -> bool {
        self.date() <= ref_date
    }

    /// This cash flow as a coupon, if it is one.
    fn as_coupon(&self) -> Option<&dyn Coupon> {
        None
    }
}

/// A sequence of cash flows.
pub type Leg = Vec<Rc<dyn CashFlow>>;

/// A fixed amount at a fixed date.
#[derive(Debug, Clone)]
pub struct SimpleCashFlow {
    amount: Real,
    date: Date,
}

impl SimpleCashFlow {
    /// Create a new simple cash flow.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for SimpleCashFlow {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Real {
        self.amount
    }
}

/// Repayment of (part of) the notional.
#[derive(Debug, Clone)]
pub struct Redemption {
    amount: Real,
    date: Date,
}

impl Redemption {
    /// Create a new redemption.
    pub fn new(amount: Real, date: Date) -> Self {
        Self { amount, date }
    }
}

impl CashFlow for Redemption {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Real {
        self.amount
    }
}
