//! Concrete market calendars.

pub mod target;
