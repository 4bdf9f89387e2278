//! # qc-termstructures
//!
//! Term structures: trait hierarchy, flat reference implementations, and
//! the piecewise bootstrapped curve with its helpers, traits policies, and
//! iterative solver.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Bootstrap helpers: instrument wrappers that expose a market quote and an
/// implied quote off a candidate curve.
pub mod bootstrap_helpers;

/// Per-family bootstrap policies (node meaning, guesses, brackets).
pub mod bootstrap_traits;

/// Default-probability term structures.
pub mod default_probability_term_structure;

/// Inflation term structures.
pub mod inflation_term_structure;

/// The pillar-by-pillar bootstrap engine.
pub mod iterative_bootstrap;

/// The lazily bootstrapped piecewise curve.
pub mod piecewise_curve;

/// Base term-structure trait.
pub mod term_structure;

/// Yield/discount term structures.
pub mod yield_term_structure;

pub use bootstrap_helpers::{
    BootstrapCurve, BootstrapHelper, CdsHelper, NodeKind, YoyInflationSwapHelper,
    ZeroCouponInflationSwapHelper,
};
pub use bootstrap_traits::{
    CurveTraits, DefaultDensityTraits, HazardRateTraits, SurvivalProbabilityTraits,
    YoyInflationTraits, ZeroInflationTraits,
};
pub use default_probability_term_structure::{DefaultProbabilityTermStructure, FlatHazardRate};
pub use inflation_term_structure::{YoyInflationTermStructure, ZeroInflationTermStructure};
pub use iterative_bootstrap::IterativeBootstrap;
pub use piecewise_curve::PiecewiseCurve;
pub use term_structure::TermStructure;
pub use yield_term_structure::{FlatForward, YieldTermStructure};
