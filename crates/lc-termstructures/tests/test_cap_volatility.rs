//! Properties of cap-volatility vectors built from fixed and quoted inputs.

use std::rc::Rc;

use lc_core::patterns::lazy_object::LazyObject;
use lc_quotes::SimpleQuote;
use lc_termstructures::{CapVolatilityStructure, CapVolatilityVector, TermStructure};
use lc_time::{Actual365Fixed, BusinessDayConvention, Date, NullCalendar, Period, TimeUnit};
use proptest::prelude::*;

fn reference() -> Date {
    Date::from_ymd(2024, 1, 15).unwrap()
}

/// Strictly increasing yearly tenors, four to ten of them.
fn tenor_grid() -> impl Strategy<Value = Vec<Period>> {
    proptest::collection::btree_set(1i32..=30, 4..=10).prop_map(|years| {
        years
            .into_iter()
            .map(|y| Period::new(y, TimeUnit::Years))
            .collect()
    })
}

fn grid_with_vols() -> impl Strategy<Value = (Vec<Period>, Vec<f64>)> {
    tenor_grid().prop_flat_map(|tenors| {
        let n = tenors.len();
        (Just(tenors), proptest::collection::vec(0.05f64..0.80, n))
    })
}

proptest! {
    #[test]
    fn fixed_curve_reproduces_knots((tenors, vols) in grid_with_vols()) {
        let curve = CapVolatilityVector::fixed_with_volatilities(
            reference(),
            Rc::new(NullCalendar),
            tenors,
            vols.clone(),
            BusinessDayConvention::Following,
            Rc::new(Actual365Fixed),
        )
        .unwrap();
        let times = curve.option_times().unwrap();
        for (t, v) in times.iter().zip(&vols) {
            prop_assert!((curve.volatility(*t).unwrap() - v).abs() < 1e-12);
        }
        curve.recalculate().unwrap();
        for (t, v) in times.iter().zip(&vols) {
            prop_assert!((curve.volatility(*t).unwrap() - v).abs() < 1e-12);
        }
        prop_assert!((curve.max_time().unwrap() - times[times.len() - 1]).abs() < 1e-15);
    }

    #[test]
    fn quote_changes_rebuild_once(
        (tenors, vols) in grid_with_vols(),
        bump in 0.01f64..0.10,
        pick in 0usize..4,
    ) {
        let quotes: Vec<Rc<SimpleQuote>> = vols.iter().map(|v| SimpleQuote::new(*v)).collect();
        let curve = CapVolatilityVector::fixed_with_quotes(
            reference(),
            Rc::new(NullCalendar),
            tenors,
            quotes.iter().map(|q| q.handle()).collect(),
            BusinessDayConvention::Following,
            Rc::new(Actual365Fixed),
        )
        .unwrap();
        let built = curve.recalculations();

        let new_vol = vols[pick] + bump;
        quotes[pick].set_value(new_vol).unwrap();
        prop_assert_eq!(curve.recalculations(), built);

        let t = curve.option_times().unwrap()[pick];
        prop_assert!((curve.volatility(t).unwrap() - new_vol).abs() < 1e-12);
        curve.volatility(0.5 * t).unwrap();
        prop_assert_eq!(curve.recalculations(), built + 1);
    }
}

#[test]
fn volatility_for_tenor_matches_knot() {
    let curve = CapVolatilityVector::fixed_with_volatilities(
        reference(),
        Rc::new(NullCalendar),
        ["1Y", "2Y", "3Y", "5Y"].iter().map(|s| s.parse().unwrap()).collect(),
        vec![0.20, 0.22, 0.21, 0.23],
        BusinessDayConvention::Following,
        Rc::new(Actual365Fixed),
    )
    .unwrap();
    let v = curve.volatility_for_tenor(Period::new(3, TimeUnit::Years)).unwrap();
    assert!((v - 0.21).abs() < 1e-12);
    assert_eq!(curve.reference_date().unwrap(), reference());
}
