//! # qc-core
//!
//! Core building blocks shared across the quantcurve workspace: primitive
//! type aliases, the error taxonomy, the Observable/Observer notification
//! plumbing, the `LazyObject` caching pattern, and the relinkable observable
//! `Handle`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Compounding conventions.
pub mod compounding;

/// Error types and the `ensure!` macro.
pub mod errors;

/// Relinkable observable reference (`Handle<T>`).
pub mod handle;

/// Design patterns: observable, lazy object.
pub mod patterns;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// A time measurement in years.
pub type Time = Real;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A spread over a reference rate.
pub type Spread = Real;

/// A discount factor in [0, 1].
pub type DiscountFactor = Real;

/// A probability in [0, 1].
pub type Probability = Real;

/// Alias used for array sizes / indices.
pub type Size = usize;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use compounding::Compounding;
pub use errors::{Error, Result};
pub use handle::Handle;
pub use patterns::lazy_object::{LazyObject, LazyState};
pub use patterns::observable::{Observable, ObservableImpl, Observer};
