//! Discounting bond pricing engine.
//!
//! Prices bonds by discounting their outstanding cash flows on a yield curve:
//!
//! $$\text{NPV} = \sum_{i : d_i > d_\text{settle}} c_i \cdot P(d_i)$$
//!
//! The curve is reached through a handle, which the engine observes: relinking
//! the handle (or, if the handle observes its curve, moving the curve) marks
//! every bond priced by this engine dirty.

use std::rc::Rc;

use lc_cashflows::npv;
use lc_core::errors::Result;
use lc_core::handle::Handle;
use lc_core::patterns::observable::{register_with, Observable, ObservableImpl, Observer};
use lc_instruments::{BondArguments, PricingEngine, PricingResults};
use lc_termstructures::YieldTermStructure;
use tracing::trace;

/// Discounting bond pricing engine.
#[derive(Debug)]
pub struct DiscountingBondEngine {
    discount_curve: Handle<dyn YieldTermStructure>,
    observers: ObservableImpl,
}

impl DiscountingBondEngine {
    /// Create an engine discounting on the curve behind `discount_curve`.
    pub fn new(discount_curve: Handle<dyn YieldTermStructure>) -> Rc<Self> {
        let engine = Rc::new(Self {
            discount_curve,
            observers: ObservableImpl::new(),
        });
        register_with(&engine, &engine.discount_curve);
        engine
    }

    /// The discount curve handle.
    pub fn discount_curve(&self) -> &Handle<dyn YieldTermStructure> {
        &self.discount_curve
    }
}

impl Observable for DiscountingBondEngine {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Observer for DiscountingBondEngine {
    fn update(&self) -> Result<()> {
        self.notify_observers()
    }
}

impl PricingEngine<BondArguments> for DiscountingBondEngine {
    fn calculate(&self, args: &BondArguments) -> Result<PricingResults> {
        let curve = self.discount_curve.current()?;
        let settlement = args.settlement_date;
        let value = npv(&args.cashflows, &*curve, settlement, curve.reference_date()?)?;
        let settlement_value = npv(&args.cashflows, &*curve, settlement, settlement)?;
        trace!(%settlement, value, settlement_value, "discounted bond cash flows");
        Ok(PricingResults::from_value(value).with_settlement_value(settlement_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lc_cashflows::{CashFlow, Leg, SimpleCashFlow};
    use lc_core::handle::RelinkableHandle;
    use lc_core::patterns::observable::Flag;
    use lc_core::Real;
    use lc_quotes::SimpleQuote;
    use lc_termstructures::{FlatForward, ReferenceDate};
    use lc_time::{Actual365Fixed, Date};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat(rate: Real) -> Rc<dyn YieldTermStructure> {
        FlatForward::with_rate(date(2025, 1, 15), rate, Rc::new(Actual365Fixed))
    }

    fn args(settlement: Date, flows: &[(Real, Date)]) -> BondArguments {
        let cashflows: Leg = flows
            .iter()
            .map(|&(a, d)| Rc::new(SimpleCashFlow::new(a, d)) as Rc<dyn CashFlow>)
            .collect();
        BondArguments {
            settlement_date: settlement,
            cashflows,
        }
    }

    #[test]
    fn discounts_single_cashflow() {
        let engine = DiscountingBondEngine::new(Handle::new(flat(0.05)));
        let r = engine
            .calculate(&args(date(2025, 1, 15), &[(105.0, date(2026, 1, 15))]))
            .unwrap();
        assert_abs_diff_eq!(r.value, 105.0 * (-0.05f64).exp(), epsilon = 1e-12);
        assert_eq!(r.settlement_value, Some(r.value));
    }

    #[test]
    fn settlement_value_is_forward() {
        let engine = DiscountingBondEngine::new(Handle::new(flat(0.05)));
        let r = engine
            .calculate(&args(date(2025, 7, 15), &[(100.0, date(2026, 1, 15))]))
            .unwrap();
        let t_pay: f64 = 365.0 / 365.0;
        let t_settle: f64 = 181.0 / 365.0;
        assert_abs_diff_eq!(r.value, 100.0 * (-0.05 * t_pay).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            r.settlement_value.unwrap(),
            100.0 * (-0.05 * (t_pay - t_settle)).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn past_cashflows_excluded() {
        let engine = DiscountingBondEngine::new(Handle::new(flat(0.0)));
        let r = engine
            .calculate(&args(
                date(2025, 6, 15),
                &[(3.0, date(2025, 6, 15)), (103.0, date(2026, 1, 15))],
            ))
            .unwrap();
        assert_abs_diff_eq!(r.value, 103.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_handle_is_not_ready() {
        let engine = DiscountingBondEngine::new(Handle::empty());
        let err = engine
            .calculate(&args(date(2025, 1, 15), &[(100.0, date(2026, 1, 15))]))
            .unwrap_err();
        assert!(err.is_state_ordering());
    }

    #[test]
    fn relinking_notifies_engine_observers() {
        let handle = RelinkableHandle::<dyn YieldTermStructure>::empty();
        let engine = DiscountingBondEngine::new(handle.handle());
        let flag = Flag::new();
        register_with(&flag, &*engine);

        let curve = flat(0.03);
        handle.link_to(curve, true).unwrap();
        assert!(flag.is_up());
    }

    #[test]
    fn curve_moves_forwarded_only_when_observed() {
        let rate = SimpleQuote::new(0.03);
        let curve: Rc<dyn YieldTermStructure> = FlatForward::new(
            ReferenceDate::Fixed(date(2025, 1, 15)),
            rate.handle(),
            Rc::new(Actual365Fixed),
        );

        let observing =
            DiscountingBondEngine::new(Handle::with_observation(Rc::clone(&curve), true));
        let blind = DiscountingBondEngine::new(Handle::with_observation(curve, false));
        let (seen, unseen) = (Flag::new(), Flag::new());
        register_with(&seen, &*observing);
        register_with(&unseen, &*blind);

        rate.set_value(0.035).unwrap();
        assert!(seen.is_up());
        assert!(!unseen.is_up());
    }
}
