//! `Quote` trait and `SimpleQuote` implementation.

use std::cell::Cell;
use std::rc::Rc;

use lc_core::errors::{Error, Result};
use lc_core::handle::Handle;
use lc_core::patterns::observable::{Observable, ObservableImpl};
use lc_core::Real;
use tracing::trace;

/// A market-observable value.
///
/// Observers registered with a quote are notified every time its value
/// changes.
pub trait Quote: Observable + std::fmt::Debug {
    /// Return the current value.
    ///
    /// Returns `None` if the quote is not currently set.
    fn value(&self) -> Option<Real>;

    /// Return `true` if the quote is currently valid.
    fn is_valid(&self) -> bool {
        self.value().is_some()
    }

    /// The current value, or an error if the quote is not set.
    fn require_value(&self) -> Result<Real> {
        self.value()
            .ok_or_else(|| Error::NotReady("quote has no value".into()))
    }
}

/// A simple, mutable market quote.
///
/// The owner mutates it through [`set_value`][Self::set_value]; consumers read
/// it through a `Handle<dyn Quote>`.
#[derive(Debug, Default)]
pub struct SimpleQuote {
    value: Cell<Option<Real>>,
    observers: ObservableImpl,
}

impl SimpleQuote {
    /// Create a new quote with the given value.
    pub fn new(value: Real) -> Rc<Self> {
        Rc::new(Self {
            value: Cell::new(Some(value)),
            observers: ObservableImpl::new(),
        })
    }

    /// Create an empty (invalid) quote.
    pub fn empty() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Set a new value and return the difference from the previous one
    /// (zero if the quote was unset).
    ///
    /// Observers are notified once, and only if the value actually changed.
    pub fn set_value(&self, value: Real) -> Result<Real> {
        let previous = self.value.replace(Some(value));
        if previous == Some(value) {
            return Ok(0.0);
        }
        trace!(value, ?previous, "quote updated");
        self.observers.notify()?;
        Ok(previous.map_or(0.0, |p| value - p))
    }

    /// Clear the value, making the quote invalid.
    pub fn reset(&self) -> Result<()> {
        if self.value.take().is_none() {
            return Ok(());
        }
        self.observers.notify()
    }

    /// An observing handle on this quote.
    pub fn handle(self: &Rc<Self>) -> Handle<dyn Quote> {
        let quote: Rc<dyn Quote> = Rc::clone(self) as Rc<dyn Quote>;
        Handle::new(quote)
    }
}

impl Observable for SimpleQuote {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<Real> {
        self.value.get()
    }
}
