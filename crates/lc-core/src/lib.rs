//! # lc-core
//!
//! Core types, traits, and error definitions for lazycurve.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace – type aliases, the error hierarchy, the
//! Observer/Observable graph, the `Handle` indirection cell and the
//! `LazyObject` caching protocol.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` macros.
pub mod errors;

/// Shared, optionally relinkable reference cells (`Handle<T>`, `RelinkableHandle<T>`).
pub mod handle;

/// Design patterns: observable, lazy_object.
pub mod patterns;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Integer type used for signed counts such as settlement days.
pub type Integer = i32;

/// Non-negative integer type.
pub type Natural = u32;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use handle::{Handle, RelinkableHandle};
pub use patterns::lazy_object::{LazyObject, LazyState};
pub use patterns::observable::{
    register_with, unregister_with, Flag, Observable, ObservableImpl, ObservableValue, Observer,
    ObserverId,
};
