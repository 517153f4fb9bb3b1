//! # lc-time
//!
//! Date, calendar, day counter, schedule, and business-day-convention types,
//! plus the session [`Settings`] carrying the observable evaluation date.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Calendar trait and built-in implementations.
pub mod calendar;

/// Concrete market calendars.
pub mod calendars;

/// `Date` type.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

/// Payment / event frequency.
pub mod frequency;

/// `Period`: a time span in a `TimeUnit`.
pub mod period;

/// `Schedule`: an ordered sequence of dates.
pub mod schedule;

/// Session settings and the observable evaluation date.
pub mod settings;

/// `TimeUnit`: days, weeks, months, years.
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::{Calendar, NullCalendar, WeekendsOnly};
pub use calendars::target::Target;
pub use chrono::Weekday;
pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, ActualActualIsda, DayCounter, Thirty360};
pub use frequency::Frequency;
pub use period::Period;
pub use schedule::{DateGeneration, Schedule, ScheduleBuilder};
pub use settings::{EvaluationDate, ScopedEvaluationDate, Settings};
pub use time_unit::TimeUnit;
