//! Bonds.
//!
//! A [`Bond`] holds a leg of cash flows (coupons plus redemption) and prices
//! it with whatever engine is attached.  It observes its engine and the
//! session evaluation date; either changing marks the cached price dirty.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lc_cashflows::{accrued_amount, maturity_date, FixedRateLegBuilder, Leg};
use lc_core::errors::{Error, Result};
use lc_core::patterns::lazy_object::{LazyObject, LazyState};
use lc_core::patterns::observable::{
    register_with, unregister_with, Observable, ObservableImpl, Observer,
};
use lc_core::{ensure, Natural, Rate, Real};
use lc_time::{BusinessDayConvention, Calendar, Date, DayCounter, Schedule, Settings, TimeUnit};
use tracing::trace;

use crate::instrument::{Instrument, PricingEngine, PricingResults};

/// What a bond engine needs to price a bond.
#[derive(Debug, Clone)]
pub struct BondArguments {
    /// Date from which cash flows belong to the buyer.
    pub settlement_date: Date,
    /// Coupons and redemptions.
    pub cashflows: Leg,
}

/// A bond: a leg of cash flows with settlement conventions.
#[derive(Debug)]
pub struct Bond {
    settlement_days: Natural,
    calendar: Rc<dyn Calendar>,
    face_amount: Real,
    issue_date: Option<Date>,
    cashflows: Leg,
    settings: Settings,
    engine: RefCell<Option<Rc<dyn PricingEngine<BondArguments>>>>,
    results: RefCell<PricingResults>,
    settlement: Cell<Option<Date>>,
    state: LazyState,
    observers: ObservableImpl,
}

impl Bond {
    /// Create a bond paying `cashflows`.
    ///
    /// # Errors
    /// Fails if the leg is empty or the face amount is not positive.
    pub fn new(
        settings: &Settings,
        settlement_days: Natural,
        calendar: Rc<dyn Calendar>,
        face_amount: Real,
        issue_date: Option<Date>,
        cashflows: Leg,
    ) -> Result<Rc<Self>> {
        ensure!(!cashflows.is_empty(), "a bond needs at least one cash flow");
        ensure!(face_amount > 0.0, "face amount must be positive, got {face_amount}");
        let bond = Rc::new(Self {
            settlement_days,
            calendar,
            face_amount,
            issue_date,
            cashflows,
            settings: settings.clone(),
            engine: RefCell::new(None),
            results: RefCell::new(PricingResults::default()),
            settlement: Cell::new(None),
            state: LazyState::new(),
            observers: ObservableImpl::new(),
        });
        register_with(&bond, &**settings.evaluation_date());
        Ok(bond)
    }

    /// Attach a pricing engine, replacing (and no longer observing) the
    /// previous one.
    pub fn set_pricing_engine(
        self: &Rc<Self>,
        engine: Rc<dyn PricingEngine<BondArguments>>,
    ) -> Result<()> {
        if let Some(old) = self.engine.borrow_mut().take() {
            unregister_with(self, &*old);
        }
        register_with(self, &*engine);
        *self.engine.borrow_mut() = Some(engine);
        self.mark_dirty()
    }

    /// The attached pricing engine, if any.
    pub fn pricing_engine(&self) -> Option<Rc<dyn PricingEngine<BondArguments>>> {
        self.engine.borrow().clone()
    }

    /// Settlement date for the current evaluation date.
    pub fn settlement_date(&self) -> Result<Date> {
        self.settlement_date_for(self.settings.evaluation_date().value())
    }

    /// Settlement date for trades on `trade_date`.
    pub fn settlement_date_for(&self, trade_date: Date) -> Result<Date> {
        let days = i32::try_from(self.settlement_days).map_err(|_| {
            Error::InvalidArgument(format!(
                "settlement days out of range: {}",
                self.settlement_days
            ))
        })?;
        let settlement = self.calendar.advance(
            trade_date,
            days,
            TimeUnit::Days,
            BusinessDayConvention::Following,
            false,
        )?;
        // Never settle before the bond exists.
        Ok(match self.issue_date {
            Some(issue) => settlement.max(issue),
            None => settlement,
        })
    }

    /// Interest accrued at `settlement`, in currency units.
    pub fn accrued_amount(&self, settlement: Date) -> Real {
        accrued_amount(&self.cashflows, settlement)
    }

    /// Full price per 100 of face, as of the settlement date.
    pub fn dirty_price(&self) -> Result<Real> {
        self.calculate()?;
        let results = self.results.borrow();
        let value = results.settlement_value.ok_or_else(|| {
            Error::Runtime("pricing engine did not provide a settlement value".into())
        })?;
        Ok(value / self.face_amount * 100.0)
    }

    /// Dirty price less accrued interest, per 100 of face.
    pub fn clean_price(&self) -> Result<Real> {
        let dirty = self.dirty_price()?;
        let settlement = self.settlement.get().map_or_else(|| self.settlement_date(), Ok)?;
        Ok(dirty - self.accrued_amount(settlement) / self.face_amount * 100.0)
    }

    /// All results of the last calculation.
    pub fn results(&self) -> Result<PricingResults> {
        self.calculate()?;
        Ok(self.results.borrow().clone())
    }

    /// Coupons and redemptions.
    pub fn cashflows(&self) -> &Leg {
        &self.cashflows
    }

    /// Face (notional) amount.
    pub fn face_amount(&self) -> Real {
        self.face_amount
    }

    /// Issue date, if known.
    pub fn issue_date(&self) -> Option<Date> {
        self.issue_date
    }

    /// Business days between trade and settlement.
    pub fn settlement_days(&self) -> Natural {
        self.settlement_days
    }

    /// Settlement calendar.
    pub fn calendar(&self) -> &Rc<dyn Calendar> {
        &self.calendar
    }
}

impl Observable for Bond {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Observer for Bond {
    fn update(&self) -> Result<()> {
        self.mark_dirty()
    }
}

impl LazyObject for Bond {
    fn perform_calculations(&self) -> Result<()> {
        let settlement = self.settlement_date()?;
        self.settlement.set(Some(settlement));
        if self.is_expired() {
            *self.results.borrow_mut() = PricingResults::from_value(0.0).with_settlement_value(0.0);
            return Ok(());
        }
        let engine = self
            .pricing_engine()
            .ok_or_else(|| Error::NotReady("null pricing engine".into()))?;
        let args = BondArguments {
            settlement_date: settlement,
            cashflows: self.cashflows.clone(),
        };
        let results = engine.calculate(&args)?;
        trace!(%settlement, value = results.value, "bond priced");
        *self.results.borrow_mut() = results;
        Ok(())
    }

    fn lazy_state(&self) -> &LazyState {
        &self.state
    }
}

impl Instrument for Bond {
    fn npv(&self) -> Result<Real> {
        self.calculate()?;
        Ok(self.results.borrow().value)
    }

    fn is_expired(&self) -> bool {
        let today = self.settings.evaluation_date().value();
        self.cashflows.iter().all(|cf| cf.has_occurred(today))
    }

    fn maturity_date(&self) -> Option<Date> {
        maturity_date(&self.cashflows)
    }
}

/// Build a fixed-rate bond.
///
/// `redemption` is quoted per 100 of face.  Coupon rates apply period by
/// period, the last one repeating.
#[allow(clippy::too_many_arguments)]
pub fn fixed_rate_bond(
    settings: &Settings,
    settlement_days: Natural,
    face_amount: Real,
    schedule: &Schedule,
    coupons: Vec<Rate>,
    payment_day_counter: Rc<dyn DayCounter>,
    payment_convention: BusinessDayConvention,
    redemption: Real,
    issue_date: Option<Date>,
) -> Result<Rc<Bond>> {
    let cashflows = FixedRateLegBuilder::new(schedule)
        .with_notional(face_amount)
        .with_coupon_rates(coupons)
        .with_day_counter(payment_day_counter)
        .with_payment_convention(payment_convention)
        .with_redemption(face_amount * redemption / 100.0)
        .build()?;
    Bond::new(
        settings,
        settlement_days,
        Rc::clone(schedule.calendar()),
        face_amount,
        issue_date,
        cashflows,
    )
}
