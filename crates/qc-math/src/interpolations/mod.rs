//! 1D interpolation kernels.
//!
//! Every kernel exposes the interpolated value together with its exact
//! first derivative and primitive (the integral from `x_min`), because
//! curve traits need all three: hazard-rate nodes are integrated, survival
//! nodes are read directly, and densities come from derivatives.
//!
//! Kernels own copies of their node arrays; rebuilding one after a node
//! changes is cheap and keeps borrows out of the hot bootstrap loop.

use qc_core::errors::Result;
use qc_core::{ensure, Real};

/// A 1D interpolation `f: R → R` over a strictly increasing grid.
///
/// Queries outside `[x_min, x_max]` extrapolate using the boundary
/// segment.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// Exact first derivative at `x` (one-sided at the nodes).
    fn derivative(&self, x: Real) -> Real;

    /// Exact integral of the interpolant from [`x_min`](Self::x_min) to `x`.
    fn primitive(&self, x: Real) -> Real;

    /// Lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// `true` if `x` lies within the interpolation domain.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Builds an [`Interpolation1D`] from node arrays.
///
/// The bootstrap engine rebuilds the interpolation on every trial value, so
/// curves store a factory rather than a kernel.
pub trait InterpolationFactory: std::fmt::Debug {
    /// Build a kernel over `xs` / `ys`.
    ///
    /// `xs` must be strictly increasing and at least two points long.
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>>;
}

fn check_grid(xs: &[Real], ys: &[Real]) -> Result<()> {
    ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
    ensure!(xs.len() == ys.len(), "xs and ys must have the same length");
    ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation nodes must be strictly increasing"
    );
    Ok(())
}

/// Locate the segment index `i` such that `x` falls in `[xs[i], xs[i+1])`,
/// clamped to the boundary segments for out-of-range `x`.
fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Factory for piecewise-linear interpolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

impl InterpolationFactory for Linear {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(LinearInterpolation::new(xs, ys)?))
    }
}

/// Piecewise-linear interpolation.
#[derive(Clone, Debug)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    // Integral from xs[0] up to each node.
    primitives: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct from sorted `xs` and corresponding `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_grid(xs, ys)?;
        let mut primitives = Vec::with_capacity(xs.len());
        let mut acc = 0.0;
        primitives.push(acc);
        for i in 1..xs.len() {
            acc += 0.5 * (ys[i] + ys[i - 1]) * (xs[i] - xs[i - 1]);
            primitives.push(acc);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            primitives,
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.primitives[i] + dx * (self.ys[i] + 0.5 * dx * self.slope(i))
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        *self.xs.last().unwrap()
    }
}

// ── Log-linear ────────────────────────────────────────────────────────────────

/// Factory for log-linear interpolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogLinear;

impl InterpolationFactory for LogLinear {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(LogLinearInterpolation::new(xs, ys)?))
    }
}

/// Log-linear interpolation: linear in `ln(y)`, so each segment is an
/// exponential in `x`.
#[derive(Clone, Debug)]
pub struct LogLinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    log_ys: Vec<Real>,
    primitives: Vec<Real>,
}

impl LogLinearInterpolation {
    /// Construct from sorted `xs` and strictly positive `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_grid(xs, ys)?;
        ensure!(
            ys.iter().all(|&y| y > 0.0),
            "all y values must be positive for log-linear interpolation"
        );
        let log_ys: Vec<Real> = ys.iter().map(|&y| y.ln()).collect();
        let mut primitives = Vec::with_capacity(xs.len());
        let mut acc = 0.0;
        primitives.push(acc);
        for i in 1..xs.len() {
            let dx = xs[i] - xs[i - 1];
            let b = (log_ys[i] - log_ys[i - 1]) / dx;
            acc += if b.abs() < Real::EPSILON {
                ys[i - 1] * dx
            } else {
                (ys[i] - ys[i - 1]) / b
            };
            primitives.push(acc);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            log_ys,
            primitives,
        })
    }

    fn log_slope(&self, i: usize) -> Real {
        (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LogLinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        (self.log_ys[i] + (x - self.xs[i]) * self.log_slope(i)).exp()
    }

    fn derivative(&self, x: Real) -> Real {
        self.log_slope(locate(&self.xs, x)) * self.value(x)
    }

    fn primitive(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let b = self.log_slope(i);
        let partial = if b.abs() < Real::EPSILON {
            self.ys[i] * (x - self.xs[i])
        } else {
            (self.value(x) - self.ys[i]) / b
        };
        self.primitives[i] + partial
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        *self.xs.last().unwrap()
    }
}

// ── Backward-flat ─────────────────────────────────────────────────────────────

/// Factory for backward-flat interpolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackwardFlat;

impl InterpolationFactory for BackwardFlat {
    fn interpolate(&self, xs: &[Real], ys: &[Real]) -> Result<Box<dyn Interpolation1D>> {
        Ok(Box::new(BackwardFlatInterpolation::new(xs, ys)?))
    }
}

/// Backward-flat (piecewise-constant) interpolation: `f(x) = y[i+1]` on
/// `(x[i], x[i+1]]`.
#[derive(Clone, Debug)]
pub struct BackwardFlatInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    primitives: Vec<Real>,
}

impl BackwardFlatInterpolation {
    /// Construct from sorted `xs` and corresponding `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_grid(xs, ys)?;
        let mut primitives = Vec::with_capacity(xs.len());
        let mut acc = 0.0;
        primitives.push(acc);
        for i in 1..xs.len() {
            acc += ys[i] * (xs[i] - xs[i - 1]);
            primitives.push(acc);
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            primitives,
        })
    }
}

impl Interpolation1D for BackwardFlatInterpolation {
    fn value(&self, x: Real) -> Real {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        let i = locate(&self.xs, x);
        // Segments are half-open on the left: f(x[i]) = y[i].
        if x == self.xs[i] {
            self.ys[i]
        } else {
            self.ys[i + 1]
        }
    }

    fn derivative(&self, _x: Real) -> Real {
        0.0
    }

    fn primitive(&self, x: Real) -> Real {
        if x <= self.xs[0] {
            return self.ys[0] * (x - self.xs[0]);
        }
        let i = locate(&self.xs, x);
        self.primitives[i] + self.ys[i + 1] * (x - self.xs[i])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        *self.xs.last().unwrap()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const XS: [Real; 4] = [0.0, 1.0, 2.0, 4.0];
    const YS: [Real; 4] = [1.0, 3.0, 2.0, 2.0];

    #[test]
    fn linear_hits_nodes_and_midpoints() {
        let f = LinearInterpolation::new(&XS, &YS).unwrap();
        for (x, y) in XS.iter().zip(YS.iter()) {
            assert_relative_eq!(f.value(*x), *y);
        }
        assert_relative_eq!(f.value(0.5), 2.0);
        assert_relative_eq!(f.derivative(0.5), 2.0);
        // Extrapolation continues the boundary segment.
        assert_relative_eq!(f.value(5.0), 2.0);
    }

    #[test]
    fn linear_primitive_matches_trapezoids() {
        let f = LinearInterpolation::new(&XS, &YS).unwrap();
        assert_relative_eq!(f.primitive(0.0), 0.0);
        assert_relative_eq!(f.primitive(1.0), 2.0);
        assert_relative_eq!(f.primitive(2.0), 4.5);
        assert_relative_eq!(f.primitive(3.0), 6.5);
    }

    #[test]
    fn log_linear_is_exponential_per_segment() {
        let xs = [0.0, 2.0];
        let ys = [1.0, (2.0f64).exp()];
        let f = LogLinearInterpolation::new(&xs, &ys).unwrap();
        // ln y is linear with slope 1, so f(x) = exp(x).
        assert_relative_eq!(f.value(1.0), 1.0f64.exp(), max_relative = 1e-14);
        assert_relative_eq!(f.derivative(1.0), 1.0f64.exp(), max_relative = 1e-14);
        assert_relative_eq!(
            f.primitive(2.0),
            (2.0f64).exp() - 1.0,
            max_relative = 1e-14
        );
    }

    #[test]
    fn log_linear_rejects_non_positive() {
        assert!(LogLinearInterpolation::new(&[0.0, 1.0], &[1.0, 0.0]).is_err());
    }

    #[test]
    fn backward_flat_value_and_primitive() {
        let f = BackwardFlatInterpolation::new(&XS, &YS).unwrap();
        assert_relative_eq!(f.value(0.5), 3.0);
        assert_relative_eq!(f.value(1.0), 3.0);
        assert_relative_eq!(f.value(1.5), 2.0);
        assert_relative_eq!(f.derivative(0.5), 0.0);
        assert_relative_eq!(f.primitive(1.0), 3.0);
        assert_relative_eq!(f.primitive(3.0), 7.0);
    }

    #[test]
    fn unsorted_grid_rejected() {
        assert!(LinearInterpolation::new(&[0.0, 0.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(LinearInterpolation::new(&[1.0], &[1.0]).is_err());
    }

    proptest! {
        #[test]
        fn linear_stays_within_node_bounds(
            x in 0.0..4.0f64,
            ys in proptest::collection::vec(0.01..10.0f64, 4),
        ) {
            let f = LinearInterpolation::new(&XS, &ys).unwrap();
            let lo = ys.iter().cloned().fold(Real::INFINITY, Real::min);
            let hi = ys.iter().cloned().fold(Real::NEG_INFINITY, Real::max);
            let v = f.value(x);
            prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12);
        }
    }
}
