//! # lc-cashflows
//!
//! Cash flows, fixed-rate coupons, and legs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cashflow;
pub mod cashflows;
pub mod coupon;
pub mod fixed_rate_coupon;

pub use cashflow::{CashFlow, Leg, Redemption, SimpleCashFlow};
pub use cashflows::{accrued_amount, maturity_date, npv};
pub use coupon::Coupon;
pub use fixed_rate_coupon::{FixedRateCoupon, FixedRateLegBuilder};
