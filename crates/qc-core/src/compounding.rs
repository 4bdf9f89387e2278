//! Compounding conventions.

/// How interest is compounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compounding {
    /// Simple interest: `1 + r·t`
    Simple,
    /// Compounded interest: `(1 + r/f)^(f·t)` at frequency `f`.
    Compounded,
    /// Continuously compounded: `e^(r·t)`
    Continuous,
}
