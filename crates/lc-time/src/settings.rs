//! Session settings.
//!
//! A [`Settings`] value is shared (by cloning, which shares the underlying
//! state) between every object of one pricing session.  Its evaluation date is
//! observable: term structures whose reference date floats with the
//! evaluation date register with it and are marked dirty when it moves.
//!
//! Separate sessions use separate `Settings`, so tests and independent
//! calculations never interfere through a process-wide singleton.

use std::cell::Cell;
use std::rc::Rc;

use lc_core::errors::Result;
use lc_core::patterns::observable::{Observable, ObservableImpl};
use tracing::{debug, warn};

use crate::date::Date;

/// The observable evaluation date of a session.
///
/// Until a date is set explicitly it follows today's date on the local clock.
#[derive(Debug, Default)]
pub struct EvaluationDate {
    value: Cell<Option<Date>>,
    observers: ObservableImpl,
}

impl EvaluationDate {
    /// The current evaluation date.
    pub fn value(&self) -> Date {
        self.value.get().unwrap_or_else(Date::todays_date)
    }

    /// `true` if a date has been set explicitly.
    pub fn is_fixed(&self) -> bool {
        self.value.get().is_some()
    }

    /// Move the evaluation date, notifying observers if it changed.
    pub fn set(&self, date: Date) -> Result<()> {
        if self.value.get() == Some(date) {
            return Ok(());
        }
        self.value.set(Some(date));
        debug!(%date, "evaluation date changed");
        self.observers.notify()
    }

    /// Go back to following today's date.
    pub fn reset(&self) -> Result<()> {
        if self.value.take().is_none() {
            return Ok(());
        }
        debug!("evaluation date reset to today");
        self.observers.notify()
    }
}

impl Observable for EvaluationDate {
    fn observers(&self) -> &ObservableImpl {
        &self.observers
    }
}

/// Settings shared by every object of a session.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    evaluation_date: Rc<EvaluationDate>,
}

impl Settings {
    /// Fresh settings following today's date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh settings with a fixed evaluation date.
    pub fn with_evaluation_date(date: Date) -> Self {
        let settings = Self::default();
        settings.evaluation_date.value.set(Some(date));
        settings
    }

    /// The observable evaluation date.
    pub fn evaluation_date(&self) -> &Rc<EvaluationDate> {
        &self.evaluation_date
    }

    /// Shorthand for `evaluation_date().set(date)`.
    pub fn set_evaluation_date(&self, date: Date) -> Result<()> {
        self.evaluation_date.set(date)
    }
}

/// Overrides the evaluation date for a scope and restores the previous
/// setting when dropped.
#[derive(Debug)]
pub struct ScopedEvaluationDate<'a> {
    settings: &'a Settings,
    saved: Option<Date>,
}

impl<'a> ScopedEvaluationDate<'a> {
    /// Set `date` as evaluation date until the guard is dropped.
    pub fn new(settings: &'a Settings, date: Date) -> Result<Self> {
        let guard = Self {
            settings,
            saved: settings.evaluation_date.value.get(),
        };
        settings.set_evaluation_date(date)?;
        Ok(guard)
    }
}

impl Drop for ScopedEvaluationDate<'_> {
    fn drop(&mut self) {
        let evaluation_date = &self.settings.evaluation_date;
        let restored = match self.saved {
            Some(date) => evaluation_date.set(date),
            None => evaluation_date.reset(),
        };
        if let Err(e) = restored {
            warn!(error = %e, "observer failed while restoring the evaluation date");
        }
    }
}
