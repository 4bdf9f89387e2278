//! # qc-math
//!
//! Numerical building blocks: 1D interpolation kernels with exact
//! derivatives and primitives, and 1D root-finding solvers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// 1D interpolation trait, kernels, and factories.
pub mod interpolations;

/// 1D root-finding solvers.
pub mod solvers1d;

pub use interpolations::{
    BackwardFlat, Interpolation1D, InterpolationFactory, Linear, LogLinear,
};
pub use solvers1d::{Bisection, Brent, Solver1D};
