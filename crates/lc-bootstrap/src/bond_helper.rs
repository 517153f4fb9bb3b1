//! Fixed-rate bond helper.
//!
//! Calibrates a yield curve to the clean price of a fixed-rate bond.  The
//! bond is synthesized when a trial curve is bound and priced with a
//! [`DiscountingBondEngine`] reading the curve through the helper's own
//! relinkable handle.
//!
//! The handle is linked **without** observation: the solver moves the trial
//! curve on every iteration and the bond must not be marked dirty (nor the
//! helper notified) each time.  [`implied_quote`][BootstrapHelper::implied_quote]
//! forces a recalculation instead.

use std::cell::RefCell;
use std::rc::Rc;

use lc_core::errors::{Error, Result};
use lc_core::handle::{Handle, RelinkableHandle};
use lc_core::patterns::lazy_object::LazyObject;
use lc_core::patterns::observable::{register_with, Observable, ObservableImpl, Observer};
use lc_core::{ensure, Natural, Rate, Real};
use lc_instruments::{fixed_rate_bond, Bond};
use lc_pricingengines::DiscountingBondEngine;
use lc_quotes::Quote;
use lc_termstructures::YieldTermStructure;
use lc_time::{BusinessDayConvention, Date, DayCounter, Frequency, Schedule, Settings};
use tracing::debug;

use crate::bootstrap_helper::BootstrapHelper;

/// Face amount of the synthesized bond; prices are per 100.
const FACE_AMOUNT: Real = 100.0;

/// Bootstrap helper quoting the clean price of a fixed-rate bond.
#[derive(Debug)]
pub struct FixedRateBondHelper {
    price: Handle<dyn Quote>,
    settlement_days: Natural,
    schedule: Schedule,
    coupons: Vec<Rate>,
    payment_day_counter: Rc<dyn DayCounter>,
    payment_convention: BusinessDayConvention,
    redemption: Real,
    issue_date: Option<Date>,
    settings: Settings,
    term_structure: RelinkableHandle<dyn YieldTermStructure>,
    bond: RefCell<Option<Rc<Bond>>>,
    observers: ObservableImpl,
}

impl FixedRateBondHelper {
    /// Create a helper for the bond paying `coupons` on `schedule`.
    ///
    /// `clean_price` and `redemption` are per 100 of face.  The helper
    /// observes the price quote and the session evaluation date.
    ///
    /// # Errors
    /// Fails if no coupon rate is given.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: &Settings,
        clean_price: Handle<dyn Quote>,
        settlement_days: Natural,
        schedule: Schedule,
        coupons: Vec<Rate>,
        payment_day_counter: Rc<dyn DayCounter>,
        payment_convention: BusinessDayConvention,
        redemption: Real,
        issue_date: Option<Date>,
    ) -> Result<Rc<Self>> {
        ensure!(!coupons.is_empty(), "no coupon rates given");
        let helper = Rc::new(Self {
            price: clean_price,
            settlement_days,
            schedule,
            coupons,
            payment_day_counter,
            payment_convention,
            redemption,
            issue_date,
            settings: settings.clone(),
            term_structure: RelinkableHandle::empty(),
            bond: RefCell::new(None),
            observers: ObservableImpl::new(),
        });
        register_with(&helper, &helper.price);
        register_with(&helper, &**settings.evaluation_date());
        Ok(helper)
    }

    /// The bond synthesized by the last binding, if any.
    pub fn bond(&self) -> Option<Rc<Bond>> {
        self.bond.borrow().clone()
    }

    /// Day counter of the coupons.
    pub fn day_counter(&self) -> &dyn DayCounter {
        self.payment_day_counter.as_ref()
    }

    /// Coupon frequency, from the schedule tenor.
    pub fn frequency(&self) -> Frequency {
        self.schedule.tenor().frequency()
    }

    /// The coupon schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Handle on the bound trial curve; empty while unbound.
    pub fn term_structure(&self) -> Handle<dyn YieldTermStructure> {
        self.term_structure.handle()
    }
}

impl Observable for FixedRateBondHelper {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Observer for FixedRateBondHelper {
    fn update(&self) -> Result<()> {
        self.notify_observers()
    }
}

impl BootstrapHelper for FixedRateBondHelper {
    fn quote(&self) -> &Handle<dyn Quote> {
        &self.price
    }

    fn latest_date(&self) -> Date {
        self.schedule.end_date()
    }

    fn set_term_structure(&self, curve: &Rc<dyn YieldTermStructure>) -> Result<()> {
        self.term_structure.link_to_borrowed(curve, false)?;
        let bond = fixed_rate_bond(
            &self.settings,
            self.settlement_days,
            FACE_AMOUNT,
            &self.schedule,
            self.coupons.clone(),
            Rc::clone(&self.payment_day_counter),
            self.payment_convention,
            self.redemption,
            self.issue_date,
        )?;
        bond.set_pricing_engine(DiscountingBondEngine::new(self.term_structure.handle()))?;
        debug!(
            maturity = %self.schedule.end_date(),
            cashflows = bond.cashflows().len(),
            "bond helper bound to trial curve"
        );
        *self.bond.borrow_mut() = Some(bond);
        Ok(())
    }

    fn implied_quote(&self) -> Result<Real> {
        let bond = self
            .bond()
            .ok_or_else(|| Error::NotReady("term structure not set".into()))?;
        bond.recalculate()?;
        bond.clean_price()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lc_core::patterns::observable::Flag;
    use lc_quotes::SimpleQuote;
    use lc_termstructures::{FlatForward, ReferenceDate};
    use lc_time::{Actual365Fixed, NullCalendar, Period, ScheduleBuilder, Thirty360, TimeUnit};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn schedule() -> Schedule {
        ScheduleBuilder::new(
            date(2024, 1, 15),
            date(2027, 1, 15),
            Period::new(6, TimeUnit::Months),
            Rc::new(NullCalendar),
        )
        .build()
        .unwrap()
    }

    fn helper(settings: &Settings, price: &Rc<SimpleQuote>) -> Rc<FixedRateBondHelper> {
        FixedRateBondHelper::new(
            settings,
            price.handle(),
            0,
            schedule(),
            vec![0.05],
            Rc::new(Thirty360),
            BusinessDayConvention::Following,
            100.0,
            Some(date(2024, 1, 15)),
        )
        .unwrap()
    }

    fn flat(rate: Rate) -> (Rc<SimpleQuote>, Rc<dyn YieldTermStructure>) {
        let quote = SimpleQuote::new(rate);
        let curve: Rc<dyn YieldTermStructure> = FlatForward::new(
            ReferenceDate::Fixed(date(2024, 1, 15)),
            quote.handle(),
            Rc::new(Actual365Fixed),
        );
        (quote, curve)
    }

    #[test]
    fn unbound_helper_is_not_ready() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        let err = h.implied_quote().unwrap_err();
        assert!(err.is_state_ordering());
        assert!(err.to_string().contains("term structure not set"));
        assert!(h.bond().is_none());
        assert!(h.term_structure().is_empty());
    }

    #[test]
    fn descriptive_accessors() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        assert_eq!(h.latest_date(), date(2027, 1, 15));
        assert_eq!(h.frequency(), Frequency::Semiannual);
        assert_eq!(h.day_counter().name(), "30/360 (Bond Basis)");
        assert_eq!(h.quote().current().unwrap().value(), Some(100.0));
    }

    #[test]
    fn empty_coupons_rejected() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let err = FixedRateBondHelper::new(
            &settings,
            SimpleQuote::new(100.0).handle(),
            0,
            schedule(),
            vec![],
            Rc::new(Thirty360),
            BusinessDayConvention::Following,
            100.0,
            None,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn repeated_implied_quotes_are_bit_identical() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        let (_rate, curve) = flat(0.04);
        h.set_term_structure(&curve).unwrap();
        let first = h.implied_quote().unwrap();
        for _ in 0..5 {
            assert_eq!(h.implied_quote().unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn implied_quote_follows_curve_on_demand() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        let (rate, curve) = flat(0.04);
        h.set_term_structure(&curve).unwrap();
        let at_4 = h.implied_quote().unwrap();
        rate.set_value(0.06).unwrap();
        let at_6 = h.implied_quote().unwrap();
        assert!(at_6 < at_4);
    }

    #[test]
    fn trial_curve_moves_are_not_observed() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        let (rate, curve) = flat(0.04);
        h.set_term_structure(&curve).unwrap();
        assert!(!h.term_structure().is_observing());

        let bond = h.bond().unwrap();
        h.implied_quote().unwrap();
        let flag = Flag::new();
        register_with(&flag, &*h);
        let recalculations = bond.recalculations();

        rate.set_value(0.05).unwrap();
        assert!(!flag.is_up());
        assert!(bond.is_calculated());
        assert_eq!(bond.recalculations(), recalculations);
    }

    #[test]
    fn market_quote_changes_are_forwarded() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let price = SimpleQuote::new(100.0);
        let h = helper(&settings, &price);
        let flag = Flag::new();
        register_with(&flag, &*h);
        price.set_value(101.0).unwrap();
        assert_eq!(flag.times_raised(), 1);
        settings.set_evaluation_date(date(2024, 1, 16)).unwrap();
        assert_eq!(flag.times_raised(), 2);
    }

    #[test]
    fn dropped_trial_curve_dangles() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        {
            let (_rate, curve) = flat(0.04);
            h.set_term_structure(&curve).unwrap();
        }
        assert!(h.implied_quote().unwrap_err().is_state_ordering());
    }

    #[test]
    fn rebinding_switches_curve() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let h = helper(&settings, &SimpleQuote::new(100.0));
        let (_low_rate, low) = flat(0.02);
        let (_high_rate, high) = flat(0.08);
        h.set_term_structure(&low).unwrap();
        let p_low = h.implied_quote().unwrap();
        h.set_term_structure(&high).unwrap();
        let p_high = h.implied_quote().unwrap();
        assert!(p_low > 100.0);
        assert!(p_high < 100.0);
        assert_abs_diff_eq!(h.quote_error().unwrap(), 100.0 - p_high, epsilon = 1e-12);
    }
}
