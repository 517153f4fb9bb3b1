//! Observer / Observable graph.
//!
//! * An **Observable** notifies its registered **Observer**s whenever it
//!   changes state.
//! * Observers react in `update()`.  An update only records that something
//!   upstream changed; it never recomputes.
//!
//! Observables hold `Weak` references only, so neither side of an edge keeps
//! the other alive.  Edges are keyed by [`ObserverId`], which makes
//! registration idempotent; entries whose observer has been dropped are
//! pruned on the next notification.
//!
//! Everything here is single-threaded (`Rc`, `RefCell`, `Cell`): none of these
//! types are `Send` or `Sync`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::errors::{Error, Result};

/// Identity of a registered observer.
///
/// Derived from the address of the observer's allocation.  An outstanding
/// `Weak` keeps that allocation reserved, so an id cannot be reused while the
/// edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(usize);

impl ObserverId {
    /// Identity of the observer behind `observer`.
    pub fn of(observer: &Weak<dyn Observer>) -> Self {
        ObserverId(observer.as_ptr() as *const () as usize)
    }
}

/// An object that reacts to changes in [`Observable`]s it has subscribed to.
pub trait Observer {
    /// Called by every observable this observer is registered with when that
    /// observable changes state.
    ///
    /// Implementations must be idempotent: a single logical change may reach
    /// the same observer through several paths.
    fn update(&self) -> Result<()>;
}

/// An object that can notify interested parties when it changes.
///
/// Implementors embed an [`ObservableImpl`] and expose it through
/// [`observers`][Self::observers]; the remaining methods delegate to it.
pub trait Observable {
    /// The embedded observer list.
    fn observers(&self) -> &ObservableImpl;

    /// Register an observer to receive future change notifications.
    ///
    /// Returns `false` if the observer was already registered.
    fn register_observer(&self, observer: Weak<dyn Observer>) -> bool {
        self.observers().register(observer)
    }

    /// Remove a previously registered observer.
    ///
    /// Returns `false` if the observer was not registered.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>) -> bool {
        self.observers().unregister(observer)
    }

    /// Notify all currently registered observers that this object has changed.
    fn notify_observers(&self) -> Result<()> {
        self.observers().notify()
    }
}

/// Register `observer` with `observable`.
///
/// Returns `false` if the edge already existed.
pub fn register_with<O, S>(observer: &Rc<O>, observable: &S) -> bool
where
    O: Observer + 'static,
    S: Observable + ?Sized,
{
    let weak = Rc::downgrade(observer);
    let weak: Weak<dyn Observer> = weak;
    observable.register_observer(weak)
}

/// Remove the edge between `observer` and `observable`, if any.
pub fn unregister_with<O, S>(observer: &Rc<O>, observable: &S) -> bool
where
    O: Observer + 'static,
    S: Observable + ?Sized,
{
    let weak = Rc::downgrade(observer);
    let weak: Weak<dyn Observer> = weak;
    observable.unregister_observer(&weak)
}

/// Observer-list bookkeeping embedded in every observable type.
///
/// Uses interior mutability so that `register`, `unregister`, and `notify`
/// all work through `&self` references.
#[derive(Default)]
pub struct ObservableImpl {
    observers: RefCell<BTreeMap<ObserverId, Weak<dyn Observer>>>,
}

impl ObservableImpl {
    /// Create a new, empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.  Returns `false` if it was already present.
    pub fn register(&self, observer: Weak<dyn Observer>) -> bool {
        let id = ObserverId::of(&observer);
        let mut observers = self.observers.borrow_mut();
        if observers.contains_key(&id) {
            return false;
        }
        observers.insert(id, observer);
        true
    }

    /// Remove an observer.  Returns `false` if it was not present.
    pub fn unregister(&self, observer: &Weak<dyn Observer>) -> bool {
        self.observers
            .borrow_mut()
            .remove(&ObserverId::of(observer))
            .is_some()
    }

    /// `true` if `observer` is currently registered.
    pub fn is_registered(&self, observer: &Weak<dyn Observer>) -> bool {
        self.observers
            .borrow()
            .contains_key(&ObserverId::of(observer))
    }

    /// Number of registered observers that are still alive.
    pub fn len(&self) -> usize {
        self.observers
            .borrow()
            .values()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// `true` if no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notify every live observer, pruning dead entries first.
    ///
    /// The observer set is snapshotted before any `update()` runs, so
    /// observers may register or unregister during notification.  A failing
    /// observer does not stop the others; failures are logged and reported
    /// together once every observer has been called.
    pub fn notify(&self) -> Result<()> {
        let live: Vec<Rc<dyn Observer>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|_, w| w.strong_count() > 0);
            observers.values().filter_map(Weak::upgrade).collect()
        };
        if live.is_empty() {
            return Ok(());
        }
        trace!(observers = live.len(), "notifying observers");

        let mut failed = 0usize;
        let mut first = None;
        for observer in live {
            if let Err(e) = observer.update() {
                warn!(error = %e, "observer failed during notification");
                failed += 1;
                if first.is_none() {
                    first = Some(e);
                }
            }
        }
        match first {
            None => Ok(()),
            Some(first) => Err(Error::Notification {
                failed,
                first: Box::new(first),
            }),
        }
    }
}

impl fmt::Debug for ObservableImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableImpl")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

/// A value that notifies its observers whenever it is changed.
///
/// Setting the value it already holds is not a change and sends nothing.
pub struct ObservableValue<T> {
    value: RefCell<T>,
    observers: ObservableImpl,
}

impl<T: Clone + PartialEq> ObservableValue<T> {
    /// Create a new `ObservableValue` with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            observers: ObservableImpl::new(),
        }
    }

    /// Return a clone of the current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value`; notify observers if it differs from the current one.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> Result<bool> {
        if *self.value.borrow() == value {
            return Ok(false);
        }
        *self.value.borrow_mut() = value;
        self.observers.notify()?;
        Ok(true)
    }
}

impl<T> Observable for ObservableValue<T> {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &*self.value.borrow())
            .finish()
    }
}

/// An observer that raises a flag each time it is notified.
///
/// Handy for checking whether a notification reached a given point of the
/// graph.
#[derive(Debug, Default)]
pub struct Flag {
    up: Cell<bool>,
    raised: Cell<usize>,
}

impl Flag {
    /// A lowered flag, ready to be registered.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Raise the flag.
    pub fn raise(&self) {
        self.up.set(true);
        self.raised.set(self.raised.get() + 1);
    }

    /// Lower the flag.  The raise counter is kept.
    pub fn lower(&self) {
        self.up.set(false);
    }

    /// `true` if the flag has been raised since it was last lowered.
    pub fn is_up(&self) -> bool {
        self.up.get()
    }

    /// Total number of notifications received.
    pub fn times_raised(&self) -> usize {
        self.raised.get()
    }
}

impl Observer for Flag {
    fn update(&self) -> Result<()> {
        self.raise();
        Ok(())
    }
}
