//! `CapVolatilityVector`: cap volatilities quoted on a strip of option
//! tenors, interpolated in time.
//!
//! The curve is a lazy object.  It observes every volatility quote (and the
//! evaluation date when its reference date floats); a notification only
//! marks it dirty, and the next query
//!
//! 1. rolls each tenor to an option date on the curve's calendar and converts
//!    it to a time with the curve's day counter,
//! 2. re-reads every quote,
//! 3. rebuilds a natural cubic spline through `(time, volatility)`.
//!
//! A curve quoted at a single tenor is flat.  Two or three tenors are
//! rejected: they do not determine a natural spline.

use std::cell::RefCell;
use std::rc::Rc;

use lc_core::errors::{Error, Result};
use lc_core::handle::Handle;
use lc_core::patterns::lazy_object::{LazyObject, LazyState};
use lc_core::patterns::observable::{register_with, Observable, ObservableImpl, Observer};
use lc_core::{Natural, Time, Volatility};
use lc_math::{ConstantInterpolation, CubicNaturalSpline, Interpolation1D};
use lc_quotes::{Quote, SimpleQuote};
use lc_time::{BusinessDayConvention, Calendar, Date, DayCounter, Period, Settings};
use tracing::debug;

use crate::cap_volatility_structure::CapVolatilityStructure;
use crate::term_structure::{ReferenceDate, TermStructure, TermStructureBase};
use crate::volatility_term_structure::VolatilityTermStructure;

/// Market inputs of a [`CapVolatilityVector`].
#[derive(Debug, Clone)]
pub enum VolatilityInputs {
    /// Live quotes; the curve follows them.
    Quotes(Vec<Handle<dyn Quote>>),
    /// Fixed numbers, wrapped in private constant quotes.
    Fixed(Vec<Volatility>),
}

impl VolatilityInputs {
    /// Number of volatilities.
    pub fn len(&self) -> usize {
        match self {
            VolatilityInputs::Quotes(q) => q.len(),
            VolatilityInputs::Fixed(v) => v.len(),
        }
    }

    /// `true` if no volatility is given.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn into_handles(self) -> Vec<Handle<dyn Quote>> {
        match self {
            VolatilityInputs::Quotes(q) => q,
            VolatilityInputs::Fixed(v) => v
                .into_iter()
                .map(|v| SimpleQuote::new(v).handle())
                .collect(),
        }
    }
}

/// Time grid, cached values and the interpolation built from them.
///
/// Replaced as a whole by every calculation.
#[derive(Debug, Default)]
struct Grid {
    option_dates: Vec<Date>,
    option_times: Vec<Time>,
    volatilities: Vec<Volatility>,
    interpolation: Option<Box<dyn Interpolation1D>>,
}

/// Cap volatilities interpolated over option tenors.
#[derive(Debug)]
pub struct CapVolatilityVector {
    base: TermStructureBase,
    business_day_convention: BusinessDayConvention,
    option_tenors: Vec<Period>,
    vol_handles: Vec<Handle<dyn Quote>>,
    grid: RefCell<Grid>,
    state: LazyState,
    observers: ObservableImpl,
}

impl CapVolatilityVector {
    /// Build a curve and calculate it once.
    ///
    /// # Errors
    /// * [`Error::SizeMismatch`] if the tenor and volatility counts differ;
    /// * [`Error::InsufficientKnots`] for two or three tenors (or none);
    /// * a configuration error if the option dates do not increase;
    /// * a not-ready error if a quote has no value.
    pub fn new(
        reference: ReferenceDate,
        calendar: Rc<dyn Calendar>,
        option_tenors: Vec<Period>,
        volatilities: VolatilityInputs,
        business_day_convention: BusinessDayConvention,
        day_counter: Rc<dyn DayCounter>,
    ) -> Result<Rc<Self>> {
        if option_tenors.len() != volatilities.len() {
            return Err(Error::SizeMismatch {
                left: "option tenors",
                left_len: option_tenors.len(),
                right: "cap volatilities",
                right_len: volatilities.len(),
            });
        }
        let curve = Rc::new(Self {
            base: TermStructureBase::new(reference, calendar, day_counter),
            business_day_convention,
            option_tenors,
            vol_handles: volatilities.into_handles(),
            grid: RefCell::new(Grid::default()),
            state: LazyState::new(),
            observers: ObservableImpl::new(),
        });
        for handle in &curve.vol_handles {
            register_with(&curve, handle);
        }
        curve.base.observe_evaluation_date(&curve);
        debug!(
            tenors = curve.option_tenors.len(),
            floating = curve.base.reference().is_floating(),
            "cap volatility vector created"
        );
        curve.calculate()?;
        Ok(curve)
    }

    /// Floating reference date, quoted volatilities.
    pub fn floating_with_quotes(
        settlement_days: Natural,
        settings: &Settings,
        calendar: Rc<dyn Calendar>,
        option_tenors: Vec<Period>,
        volatilities: Vec<Handle<dyn Quote>>,
        business_day_convention: BusinessDayConvention,
        day_counter: Rc<dyn DayCounter>,
    ) -> Result<Rc<Self>> {
        Self::new(
            ReferenceDate::floating(settlement_days, settings),
            calendar,
            option_tenors,
            VolatilityInputs::Quotes(volatilities),
            business_day_convention,
            day_counter,
        )
    }

    /// Fixed reference date, quoted volatilities.
    pub fn fixed_with_quotes(
        reference_date: Date,
        calendar: Rc<dyn Calendar>,
        option_tenors: Vec<Period>,
        volatilities: Vec<Handle<dyn Quote>>,
        business_day_convention: BusinessDayConvention,
        day_counter: Rc<dyn DayCounter>,
    ) -> Result<Rc<Self>> {
        Self::new(
            ReferenceDate::Fixed(reference_date),
            calendar,
            option_tenors,
            VolatilityInputs::Quotes(volatilities),
            business_day_convention,
            day_counter,
        )
    }

    /// Fixed reference date, fixed volatilities.
    pub fn fixed_with_volatilities(
        reference_date: Date,
        calendar: Rc<dyn Calendar>,
        option_tenors: Vec<Period>,
        volatilities: Vec<Volatility>,
        business_day_convention: BusinessDayConvention,
        day_counter: Rc<dyn DayCounter>,
    ) -> Result<Rc<Self>> {
        Self::new(
            ReferenceDate::Fixed(reference_date),
            calendar,
            option_tenors,
            VolatilityInputs::Fixed(volatilities),
            business_day_convention,
            day_counter,
        )
    }

    /// Floating reference date, fixed volatilities.
    pub fn floating_with_volatilities(
        settlement_days: Natural,
        settings: &Settings,
        calendar: Rc<dyn Calendar>,
        option_tenors: Vec<Period>,
        volatilities: Vec<Volatility>,
        business_day_convention: BusinessDayConvention,
        day_counter: Rc<dyn DayCounter>,
    ) -> Result<Rc<Self>> {
        Self::new(
            ReferenceDate::floating(settlement_days, settings),
            calendar,
            option_tenors,
            VolatilityInputs::Fixed(volatilities),
            business_day_convention,
            day_counter,
        )
    }

    /// The quoted option tenors.
    pub fn option_tenors(&self) -> &[Period] {
        &self.option_tenors
    }

    /// The volatility quotes, one per tenor.
    pub fn volatility_handles(&self) -> &[Handle<dyn Quote>] {
        &self.vol_handles
    }

    /// Option expiry dates, one per tenor.
    pub fn option_dates(&self) -> Result<Vec<Date>> {
        self.calculate()?;
        Ok(self.grid.borrow().option_dates.clone())
    }

    /// Option times, one per tenor.
    pub fn option_times(&self) -> Result<Vec<Time>> {
        self.calculate()?;
        Ok(self.grid.borrow().option_times.clone())
    }

    /// The volatilities the curve was last built from.
    pub fn volatilities(&self) -> Result<Vec<Volatility>> {
        self.calculate()?;
        Ok(self.grid.borrow().volatilities.clone())
    }

    fn interpolate(times: &[Time], vols: &[Volatility]) -> Result<Box<dyn Interpolation1D>> {
        if let ([t], [v]) = (times, vols) {
            return Ok(Box::new(ConstantInterpolation::new(*t, *v)?));
        }
        Ok(Box::new(CubicNaturalSpline::new(times, vols)?))
    }
}

impl Observable for CapVolatilityVector {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Observer for CapVolatilityVector {
    fn update(&self) -> Result<()> {
        self.mark_dirty()
    }
}

impl LazyObject for CapVolatilityVector {
    fn perform_calculations(&self) -> Result<()> {
        let reference = self.reference_date()?;
        let mut option_dates = Vec::with_capacity(self.option_tenors.len());
        for tenor in &self.option_tenors {
            option_dates.push(self.option_date_from_tenor(*tenor)?);
        }
        if let Some(i) = option_dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::InvalidArgument(format!(
                "option dates must increase: {} ({}) is not before {} ({})",
                self.option_tenors[i],
                option_dates[i],
                self.option_tenors[i + 1],
                option_dates[i + 1]
            )));
        }
        let day_counter = self.day_counter();
        let option_times: Vec<Time> = option_dates
            .iter()
            .map(|d| day_counter.year_fraction(reference, *d))
            .collect();

        let volatilities = self
            .vol_handles
            .iter()
            .map(|h| h.current()?.require_value())
            .collect::<Result<Vec<_>>>()?;

        let interpolation = Self::interpolate(&option_times, &volatilities)?;
        *self.grid.borrow_mut() = Grid {
            option_dates,
            option_times,
            volatilities,
            interpolation: Some(interpolation),
        };
        Ok(())
    }

    fn lazy_state(&self) -> &LazyState {
        &self.state
    }
}

impl TermStructure for CapVolatilityVector {
    fn base(&self) -> &TermStructureBase {
        &self.base
    }

    fn max_date(&self) -> Result<Date> {
        self.calculate()?;
        self.grid
            .borrow()
            .option_dates
            .last()
            .copied()
            .ok_or_else(|| Error::Runtime("cap volatility vector has no option dates".into()))
    }

    fn max_time(&self) -> Result<Time> {
        self.calculate()?;
        self.grid
            .borrow()
            .option_times
            .last()
            .copied()
            .ok_or_else(|| Error::Runtime("cap volatility vector has no option times".into()))
    }
}

impl VolatilityTermStructure for CapVolatilityVector {
    fn business_day_convention(&self) -> BusinessDayConvention {
        self.business_day_convention
    }
}

impl CapVolatilityStructure for CapVolatilityVector {
    fn volatility_impl(&self, t: Time) -> Result<Volatility> {
        self.calculate()?;
        self.grid
            .borrow()
            .interpolation
            .as_ref()
            .map(|i| i.value(t))
            .ok_or_else(|| Error::Runtime("cap volatility vector is not built".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lc_core::patterns::observable::Flag;
    use lc_core::Real;
    use lc_time::{Actual365Fixed, NullCalendar, Target};
    use proptest::prelude::*;

    const VOLS: [Volatility; 4] = [0.20, 0.22, 0.21, 0.23];

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn tenors(specs: &[&str]) -> Vec<Period> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn fixed_curve(specs: &[&str], vols: &[Volatility]) -> Result<Rc<CapVolatilityVector>> {
        CapVolatilityVector::fixed_with_volatilities(
            date(2024, 1, 15),
            Rc::new(NullCalendar),
            tenors(specs),
            vols.to_vec(),
            BusinessDayConvention::Following,
            Rc::new(Actual365Fixed),
        )
    }

    fn quoted_curve(quotes: &[Rc<SimpleQuote>]) -> Rc<CapVolatilityVector> {
        CapVolatilityVector::fixed_with_quotes(
            date(2024, 1, 15),
            Rc::new(NullCalendar),
            tenors(&["1Y", "2Y", "3Y", "5Y"]),
            quotes.iter().map(|q| q.handle()).collect(),
            BusinessDayConvention::Following,
            Rc::new(Actual365Fixed),
        )
        .unwrap()
    }

    fn simple_quotes(vols: &[Volatility]) -> Vec<Rc<SimpleQuote>> {
        vols.iter().map(|v| SimpleQuote::new(*v)).collect()
    }

    #[test]
    fn option_times_follow_day_counter() {
        let curve = fixed_curve(&["1Y", "2Y", "3Y", "5Y"], &VOLS).unwrap();
        let times = curve.option_times().unwrap();
        let expected = [366.0, 731.0, 1096.0, 1827.0].map(|d: Real| d / 365.0);
        for (t, e) in times.iter().zip(expected) {
            assert_abs_diff_eq!(*t, e, epsilon = 1e-15);
        }
        assert_eq!(curve.max_date().unwrap(), date(2029, 1, 15));
    }

    #[test]
    fn reproduces_knots() {
        let curve = fixed_curve(&["1Y", "2Y", "3Y", "5Y"], &VOLS).unwrap();
        let times = curve.option_times().unwrap();
        for (t, v) in times.iter().zip(VOLS) {
            assert_abs_diff_eq!(curve.volatility(*t).unwrap(), v, epsilon = 1e-12);
        }
        curve.recalculate().unwrap();
        for (t, v) in times.iter().zip(VOLS) {
            assert_abs_diff_eq!(curve.volatility(*t).unwrap(), v, epsilon = 1e-12);
        }
    }

    #[test]
    fn interior_value_is_bracketed() {
        let curve = fixed_curve(&["1Y", "2Y", "3Y", "5Y"], &VOLS).unwrap();
        assert_abs_diff_eq!(
            curve.volatility_for_tenor("2Y".parse().unwrap()).unwrap(),
            0.22,
            epsilon = 1e-12
        );
        let v4 = curve.volatility_at_date(date(2028, 1, 15)).unwrap();
        assert_abs_diff_eq!(v4, 0.212_799_900_630_512_2, epsilon = 1e-12);
        assert!(v4 > 0.21 && v4 < 0.23);
    }

    #[test]
    fn size_mismatch_names_both_counts() {
        let err = fixed_curve(&["1Y", "2Y", "3Y", "5Y"], &VOLS[..3]).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "mismatch between number of option tenors (4) and number of cap volatilities (3)"
        );
    }

    #[test]
    fn two_or_three_tenors_rejected() {
        let err = fixed_curve(&["1Y", "2Y"], &VOLS[..2]).unwrap_err();
        assert!(matches!(err, Error::InsufficientKnots { required: 4, actual: 2, .. }));
        let err = fixed_curve(&["1Y", "2Y", "3Y"], &VOLS[..3]).unwrap_err();
        assert!(matches!(err, Error::InsufficientKnots { required: 4, actual: 3, .. }));
        assert!(fixed_curve(&[], &[]).unwrap_err().is_configuration());
    }

    #[test]
    fn oversized_tenor_rejected() {
        let err = fixed_curve(&["1Y", "2Y", "3Y", "200000000Y"], &VOLS).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, Error::Date(_)));
    }

    #[test]
    fn single_tenor_is_flat() {
        let curve = fixed_curve(&["2Y"], &[0.25]).unwrap();
        assert_eq!(curve.volatility(0.0).unwrap(), 0.25);
        assert_eq!(curve.volatility(1.5).unwrap(), 0.25);
        assert!(curve.volatility(3.0).is_err());
    }

    #[test]
    fn unordered_tenors_rejected() {
        let err = fixed_curve(&["1Y", "3Y", "2Y", "5Y"], &VOLS).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn range_checks() {
        let curve = fixed_curve(&["1Y", "2Y", "3Y", "5Y"], &VOLS).unwrap();
        assert!(curve.volatility(-0.1).unwrap_err().is_configuration());
        assert!(curve.volatility(6.0).is_err());
        assert!(curve.volatility_with(6.0, true).is_ok());
        curve.enable_extrapolation(true);
        assert!(curve.volatility(6.0).is_ok());
    }

    #[test]
    fn follows_quote_mutation() {
        let quotes = simple_quotes(&VOLS);
        let curve = quoted_curve(&quotes);
        let t2 = curve.option_times().unwrap()[1];
        assert_abs_diff_eq!(curve.volatility(t2).unwrap(), 0.22, epsilon = 1e-12);

        quotes[1].set_value(0.24).unwrap();
        assert!(!curve.is_calculated());
        assert_abs_diff_eq!(curve.volatility(t2).unwrap(), 0.24, epsilon = 1e-12);
    }

    #[test]
    fn unrelated_curve_is_untouched() {
        let a = simple_quotes(&VOLS);
        let b = simple_quotes(&VOLS);
        let curve_a = quoted_curve(&a);
        let curve_b = quoted_curve(&b);
        curve_b.volatility(1.0).unwrap();
        let before = curve_b.recalculations();

        a[0].set_value(0.30).unwrap();
        curve_a.volatility(1.0).unwrap();
        curve_b.volatility(1.0).unwrap();
        assert!(curve_b.is_calculated());
        assert_eq!(curve_b.recalculations(), before);
    }

    #[test]
    fn lazy_until_queried() {
        let quotes = simple_quotes(&VOLS);
        let curve = quoted_curve(&quotes);
        assert_eq!(curve.recalculations(), 1);

        quotes[0].set_value(0.19).unwrap();
        quotes[2].set_value(0.20).unwrap();
        assert_eq!(curve.recalculations(), 1);

        curve.volatility(1.5).unwrap();
        curve.volatility(2.5).unwrap();
        curve.volatility_for_tenor("3Y".parse().unwrap()).unwrap();
        assert_eq!(curve.recalculations(), 2);
    }

    #[test]
    fn notifies_downstream_once_per_dirty_period() {
        let quotes = simple_quotes(&VOLS);
        let curve = quoted_curve(&quotes);
        let flag = Flag::new();
        register_with(&flag, &*curve);

        quotes[0].set_value(0.19).unwrap();
        quotes[1].set_value(0.21).unwrap();
        assert_eq!(flag.times_raised(), 1);

        curve.volatility(1.0).unwrap();
        quotes[0].set_value(0.18).unwrap();
        assert_eq!(flag.times_raised(), 2);
    }

    #[test]
    fn unset_quote_surfaces_on_query() {
        let quotes = simple_quotes(&VOLS);
        let curve = quoted_curve(&quotes);
        quotes[3].reset().unwrap();
        assert!(curve.volatility(1.0).unwrap_err().is_state_ordering());
        quotes[3].set_value(0.23).unwrap();
        assert!(curve.volatility(1.0).is_ok());
    }

    #[test]
    fn floating_curve_rolls_with_evaluation_date() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let curve = CapVolatilityVector::floating_with_volatilities(
            2,
            &settings,
            Rc::new(Target),
            tenors(&["1Y", "2Y", "3Y", "5Y"]),
            VOLS.to_vec(),
            BusinessDayConvention::ModifiedFollowing,
            Rc::new(Actual365Fixed),
        )
        .unwrap();
        assert_eq!(curve.reference_date().unwrap(), date(2024, 1, 17));
        let before = curve.option_dates().unwrap();

        settings.set_evaluation_date(date(2024, 3, 15)).unwrap();
        assert!(!curve.is_calculated());
        assert_eq!(curve.reference_date().unwrap(), date(2024, 3, 19));
        let after = curve.option_dates().unwrap();
        assert_ne!(before, after);
        assert_eq!(after[0], date(2025, 3, 19));
    }

    #[test]
    fn floating_quoted_curve() {
        let settings = Settings::with_evaluation_date(date(2024, 1, 15));
        let quotes = simple_quotes(&VOLS);
        let curve = CapVolatilityVector::floating_with_quotes(
            0,
            &settings,
            Rc::new(NullCalendar),
            tenors(&["1Y", "2Y", "3Y", "5Y"]),
            quotes.iter().map(|q| q.handle()).collect(),
            BusinessDayConvention::Following,
            Rc::new(Actual365Fixed),
        )
        .unwrap();
        assert_eq!(curve.volatility_handles().len(), 4);
        assert_abs_diff_eq!(
            curve.volatility_at_date(date(2026, 1, 15)).unwrap(),
            0.22,
            epsilon = 1e-12
        );
    }

    proptest! {
        #[test]
        fn mismatched_counts_always_fail(n in 1usize..8, m in 1usize..8) {
            prop_assume!(n != m);
            let specs: Vec<String> = (1..=n).map(|i| format!("{i}Y")).collect();
            let specs: Vec<&str> = specs.iter().map(String::as_str).collect();
            let vols = vec![0.2; m];
            let err = fixed_curve(&specs, &vols).unwrap_err();
            prop_assert_eq!(
                err,
                Error::SizeMismatch {
                    left: "option tenors",
                    left_len: n,
                    right: "cap volatilities",
                    right_len: m,
                }
            );
        }
    }
}
