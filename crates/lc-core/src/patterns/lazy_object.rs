//! LazyObject pattern.
//!
//! A `LazyObject` caches the result of an expensive computation and
//! recalculates only when one of its inputs has changed *and* someone asks for
//! a value.  Notifications merely mark the cache dirty; the recomputation is
//! pulled by the next accessor.
//!
//! The bookkeeping lives in [`LazyState`] and uses interior mutability
//! (`Cell`) so that calculations can be triggered through `&self`.

use std::cell::Cell;

use tracing::debug;

use crate::errors::Result;
use crate::patterns::observable::Observable;

/// Trait for objects that lazily compute and cache their results.
///
/// Implementors provide [`perform_calculations`][Self::perform_calculations]
/// and expose their [`LazyState`]; they usually forward
/// [`Observer::update`][crate::patterns::observable::Observer::update] to
/// [`mark_dirty`][Self::mark_dirty].
///
/// # Example
/// ```
/// use std::cell::Cell;
/// use lc_core::{LazyObject, LazyState, Observable, ObservableImpl};
///
/// #[derive(Default)]
/// struct Answer {
///     state: LazyState,
///     observers: ObservableImpl,
///     result: Cell<f64>,
/// }
///
/// impl Observable for Answer {
///     fn observers(&self) -> &ObservableImpl { &self.observers }
/// }
///
/// impl LazyObject for Answer {
///     fn perform_calculations(&self) -> lc_core::Result<()> {
///         self.result.set(42.0);
///         Ok(())
///     }
///     fn lazy_state(&self) -> &LazyState { &self.state }
/// }
///
/// let obj = Answer::default();
/// obj.calculate().unwrap();
/// assert_eq!(obj.result.get(), 42.0);
/// assert_eq!(obj.recalculations(), 1);
/// ```
pub trait LazyObject: Observable {
    /// Perform the actual (expensive) calculation.
    ///
    /// Must be idempotent: it may run again with unchanged inputs after a
    /// forced [`recalculate`][Self::recalculate].
    fn perform_calculations(&self) -> Result<()>;

    /// Caching bookkeeping for this object.
    fn lazy_state(&self) -> &LazyState;

    /// Ensure results are up-to-date.
    ///
    /// Runs [`perform_calculations`][Self::perform_calculations] if the cache
    /// is dirty and the object is not frozen.  If the calculation fails the
    /// cache stays dirty.
    fn calculate(&self) -> Result<()> {
        let state = self.lazy_state();
        if state.calculated.get() || state.is_frozen() {
            return Ok(());
        }
        // Set before calculating so that re-entrant calls return at once.
        state.calculated.set(true);
        if let Err(e) = self.perform_calculations() {
            state.calculated.set(false);
            return Err(e);
        }
        let n = state.recalculations.get() + 1;
        state.recalculations.set(n);
        debug!(
            object = std::any::type_name::<Self>(),
            recalculations = n,
            "lazy object recalculated"
        );
        Ok(())
    }

    /// Mark the cache dirty and forward the notification.
    ///
    /// Observers are only notified when the object was holding a valid result
    /// (or always-forward is enabled); an already-dirty object has told its
    /// observers already.  Re-entrant calls, as happen in cyclic graphs, are
    /// ignored.
    fn mark_dirty(&self) -> Result<()> {
        let state = self.lazy_state();
        if state.updating.replace(true) {
            return Ok(());
        }
        let result = if state.calculated.get() || state.always_forward.get() {
            state.calculated.set(false);
            if state.is_frozen() {
                Ok(())
            } else {
                self.notify_observers()
            }
        } else {
            Ok(())
        };
        state.updating.set(false);
        result
    }

    /// Force an immediate recalculation, even if frozen, then notify
    /// observers.
    fn recalculate(&self) -> Result<()> {
        let state = self.lazy_state();
        let freeze_count = state.freeze_count.replace(0);
        state.calculated.set(false);
        let result = self.calculate();
        state.freeze_count.set(freeze_count);
        let notified = self.notify_observers();
        result.and(notified)
    }

    /// Prevent recalculation until [`unfreeze`][Self::unfreeze] is called.
    fn freeze(&self) {
        let state = self.lazy_state();
        state.freeze_count.set(state.freeze_count.get() + 1);
    }

    /// Undo one call to [`freeze`][Self::freeze].
    ///
    /// When the last freeze is released the object marks itself dirty, since
    /// it may have missed notifications in between.
    fn unfreeze(&self) -> Result<()> {
        let state = self.lazy_state();
        match state.freeze_count.get() {
            0 => Ok(()),
            1 => {
                state.freeze_count.set(0);
                self.mark_dirty()
            }
            n => {
                state.freeze_count.set(n - 1);
                Ok(())
            }
        }
    }

    /// Forward every notification, not only the first after a calculation.
    fn always_forward_notifications(&self) {
        self.lazy_state().always_forward.set(true);
    }

    /// Return `true` if the cache is currently valid.
    fn is_calculated(&self) -> bool {
        self.lazy_state().calculated.get()
    }

    /// Return `true` if recalculation is currently deferred.
    fn is_frozen(&self) -> bool {
        self.lazy_state().is_frozen()
    }

    /// Number of completed calculations so far.
    fn recalculations(&self) -> u64 {
        self.lazy_state().recalculations.get()
    }
}

/// Bookkeeping fields required by [`LazyObject`].
///
/// Embed this in your struct and return it from
/// [`LazyObject::lazy_state`].  A fresh state is dirty.
#[derive(Debug, Default)]
pub struct LazyState {
    calculated: Cell<bool>,
    freeze_count: Cell<u32>,
    updating: Cell<bool>,
    always_forward: Cell<bool>,
    recalculations: Cell<u64>,
}

impl LazyState {
    /// Create a new `LazyState` where the cache is initially stale.
    pub fn new() -> Self {
        Self::default()
    }

    fn is_frozen(&self) -> bool {
        self.freeze_count.get() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::patterns::observable::{
        register_with, Flag, ObservableImpl, ObservableValue, Observer,
    };
    use proptest::prelude::*;
    use std::rc::Rc;

    struct Doubler {
        input: Rc<ObservableValue<f64>>,
        result: Cell<f64>,
        state: LazyState,
        observers: ObservableImpl,
    }

    impl Doubler {
        fn new(input: &Rc<ObservableValue<f64>>) -> Rc<Self> {
            let d = Rc::new(Self {
                input: Rc::clone(input),
                result: Cell::new(0.0),
                state: LazyState::new(),
                observers: ObservableImpl::new(),
            });
            register_with(&d, &**input);
            d
        }

        fn value(&self) -> Result<f64> {
            self.calculate()?;
            Ok(self.result.get())
        }
    }

    impl Observable for Doubler {
        fn observers(&self) -> &ObservableImpl {
            &self.observers
        }
    }

    impl Observer for Doubler {
        fn update(&self) -> Result<()> {
            self.mark_dirty()
        }
    }

    impl LazyObject for Doubler {
        fn perform_calculations(&self) -> Result<()> {
            let x = self.input.get();
            if x.is_nan() {
                return Err(Error::Runtime("NaN input".into()));
            }
            self.result.set(2.0 * x);
            Ok(())
        }

        fn lazy_state(&self) -> &LazyState {
            &self.state
        }
    }

    #[test]
    fn no_calculation_until_queried() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        assert_eq!(d.recalculations(), 0);
        input.set(2.0).unwrap();
        input.set(3.0).unwrap();
        assert_eq!(d.recalculations(), 0);
        assert_eq!(d.value().unwrap(), 6.0);
        assert_eq!(d.recalculations(), 1);
    }

    #[test]
    fn consecutive_queries_calculate_once() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        d.value().unwrap();
        d.value().unwrap();
        assert_eq!(d.recalculations(), 1);
        input.set(5.0).unwrap();
        assert!(!d.is_calculated());
        assert_eq!(d.value().unwrap(), 10.0);
        assert_eq!(d.value().unwrap(), 10.0);
        assert_eq!(d.recalculations(), 2);
    }

    #[test]
    fn forwards_only_when_calculated() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        let flag = Flag::new();
        register_with(&flag, &*d);

        input.set(2.0).unwrap();
        assert!(!flag.is_up(), "dirty object must not forward");

        d.value().unwrap();
        input.set(3.0).unwrap();
        assert_eq!(flag.times_raised(), 1);
        input.set(4.0).unwrap();
        assert_eq!(flag.times_raised(), 1);
    }

    #[test]
    fn always_forward() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        d.always_forward_notifications();
        let flag = Flag::new();
        register_with(&flag, &*d);
        input.set(2.0).unwrap();
        input.set(3.0).unwrap();
        assert_eq!(flag.times_raised(), 2);
    }

    #[test]
    fn freeze_defers_recalculation() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        assert_eq!(d.value().unwrap(), 2.0);
        d.freeze();
        input.set(7.0).unwrap();
        assert_eq!(d.value().unwrap(), 2.0);
        assert!(d.is_frozen());
        d.unfreeze().unwrap();
        assert_eq!(d.value().unwrap(), 14.0);
    }

    #[test]
    fn recalculate_forces_and_notifies() {
        let input = Rc::new(ObservableValue::new(1.0));
        let d = Doubler::new(&input);
        let flag = Flag::new();
        register_with(&flag, &*d);
        d.value().unwrap();
        d.recalculate().unwrap();
        assert_eq!(d.recalculations(), 2);
        assert!(flag.is_up());
        assert!(d.is_calculated());
    }

    #[test]
    fn failed_calculation_stays_dirty() {
        let input = Rc::new(ObservableValue::new(f64::NAN));
        let d = Doubler::new(&input);
        assert!(d.value().is_err());
        assert!(!d.is_calculated());
        input.set(1.5).unwrap();
        assert_eq!(d.value().unwrap(), 3.0);
    }

    struct Node {
        state: LazyState,
        observers: ObservableImpl,
    }

    impl Observable for Node {
        fn observers(&self) -> &ObservableImpl {
            &self.observers
        }
    }

    impl Observer for Node {
        fn update(&self) -> Result<()> {
            self.mark_dirty()
        }
    }

    impl LazyObject for Node {
        fn perform_calculations(&self) -> Result<()> {
            Ok(())
        }

        fn lazy_state(&self) -> &LazyState {
            &self.state
        }
    }

    #[test]
    fn cyclic_graph_terminates() {
        let node = || {
            Rc::new(Node {
                state: LazyState::new(),
                observers: ObservableImpl::new(),
            })
        };
        let a = node();
        let b = node();
        register_with(&a, &*b);
        register_with(&b, &*a);
        a.always_forward_notifications();
        b.always_forward_notifications();
        a.calculate().unwrap();
        b.calculate().unwrap();
        a.mark_dirty().unwrap();
        assert!(!a.is_calculated());
        assert!(!b.is_calculated());
    }

    proptest! {
        #[test]
        fn recalculates_once_per_dirty_period(ops in prop::collection::vec(any::<bool>(), 1..40)) {
            // `true` mutates the input, `false` queries the value.
            let input = Rc::new(ObservableValue::new(0.0));
            let d = Doubler::new(&input);
            let mut dirty = true;
            let mut expected = 0u64;
            for (i, mutate) in ops.into_iter().enumerate() {
                if mutate {
                    input.set(i as f64 + 1.0).unwrap();
                    dirty = true;
                } else {
                    d.value().unwrap();
                    if dirty {
                        expected += 1;
                        dirty = false;
                    }
                }
            }
            prop_assert_eq!(d.recalculations(), expected);
        }
    }
}
