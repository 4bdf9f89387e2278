//! Error types for quantcurve.
//!
//! Two distinct channels share this enum: contract violations raised eagerly
//! at construction/validation time (`DataIntegrity`, `ArbitrageViolation`,
//! `Date`, `InvalidArgument`) and expected calibration failures raised lazily
//! when a consumer forces a recalculation (`BootstrapFailed`, `Solver`).
//! `EmptyHandle` is raised at the point of dereference, never earlier.

use thiserror::Error;

/// The top-level error type used throughout quantcurve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An empty (unlinked) handle was dereferenced.
    #[error("empty handle cannot be dereferenced")]
    EmptyHandle,

    /// Invalid input data: non-increasing pillars, probabilities outside
    /// [0, 1], empty instrument lists, and similar construction-time checks.
    #[error("data integrity: {0}")]
    DataIntegrity(String),

    /// A calibrated curve admits arbitrage (e.g. increasing survival
    /// probability).
    #[error("arbitrage violation: {0}")]
    ArbitrageViolation(String),

    /// The bootstrap failed at a pillar or exhausted its refinement budget.
    ///
    /// Raised lazily from `calculate()`; the curve stays dirty, so a later
    /// query retries the bootstrap from scratch.
    #[error("bootstrap failed at pillar {pillar}: {detail}")]
    BootstrapFailed {
        /// Index of the offending pillar (0 = curve reference node).
        pillar: usize,
        /// Human-readable failure description, naming the instrument date.
        detail: String,
    },

    /// A one-dimensional root solver failed (no bracket, iteration cap).
    #[error("solver: {0}")]
    Solver(String),

    /// Date construction or arithmetic error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand `Result` type used throughout quantcurve.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check a data-integrity precondition.
///
/// Returns `Err(Error::DataIntegrity(...))` from the enclosing function when
/// `$cond` is false.
///
/// # Example
/// ```
/// use qc_core::ensure;
/// fn probability(p: f64) -> qc_core::Result<f64> {
///     ensure!((0.0..=1.0).contains(&p), "probability {p} outside [0, 1]");
///     Ok(p)
/// }
/// assert!(probability(0.5).is_ok());
/// assert!(probability(1.5).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::DataIntegrity(
                format!($($msg)*)
            ));
        }
    };
}
