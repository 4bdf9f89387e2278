//! 1D root-finding solvers.
//!
//! Solvers take the objective as `FnMut(Real) -> Result<Real>` so that a
//! failure inside the objective (a repricing error, an invalid trial
//! curve) aborts the solve instead of being papered over.

use qc_core::errors::{Error, Result};
use qc_core::Real;

const DEFAULT_MAX_EVALUATIONS: u32 = 100;

/// Objective function handed to a solver.
pub type Objective<'a> = &'a mut dyn FnMut(Real) -> Result<Real>;

/// A 1D root finder over a bracketing interval.
pub trait Solver1D: std::fmt::Debug {
    /// Find `x` in `[lo, hi]` with `|f(x)|` within `accuracy` of a root.
    ///
    /// `guess` is a starting point inside the interval; `f(lo)` and `f(hi)`
    /// must have opposite signs.
    fn solve(&self, f: Objective<'_>, accuracy: Real, guess: Real, lo: Real, hi: Real)
        -> Result<Real>;
}

fn check_bracket(lo: Real, hi: Real, flo: Real, fhi: Real) -> Result<()> {
    if flo * fhi > 0.0 {
        return Err(Error::Solver(format!(
            "root not bracketed: f({lo}) = {flo}, f({hi}) = {fhi}"
        )));
    }
    Ok(())
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method: bisection, secant, and inverse quadratic interpolation.
#[derive(Clone, Copy, Debug)]
pub struct Brent {
    max_evaluations: u32,
}

impl Default for Brent {
    fn default() -> Self {
        Brent {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }
}

impl Brent {
    /// A Brent solver with an explicit evaluation budget.
    pub fn with_max_evaluations(max_evaluations: u32) -> Self {
        Brent { max_evaluations }
    }
}

impl Solver1D for Brent {
    fn solve(
        &self,
        f: Objective<'_>,
        accuracy: Real,
        guess: Real,
        lo: Real,
        hi: Real,
    ) -> Result<Real> {
        let fguess = f(guess)?;
        if fguess == 0.0 {
            return Ok(guess);
        }
        let flo = f(lo)?;
        if flo == 0.0 {
            return Ok(lo);
        }
        let fhi = f(hi)?;
        if fhi == 0.0 {
            return Ok(hi);
        }
        // Shrink the bracket around the guess when the sign change allows it.
        let (mut a, mut fa, mut b, mut fb) = if flo * fguess < 0.0 {
            (lo, flo, guess, fguess)
        } else if fguess * fhi < 0.0 {
            (guess, fguess, hi, fhi)
        } else {
            check_bracket(lo, hi, flo, fhi)?;
            (lo, flo, hi, fhi)
        };

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.max_evaluations {
            if fb * fc > 0.0 {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol = 2.0 * Real::EPSILON * b.abs() + 0.5 * accuracy;
            let xm = 0.5 * (c - b);
            if xm.abs() <= tol || fb == 0.0 {
                return Ok(b);
            }
            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (p, q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
                if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }
            a = b;
            fa = fb;
            b += if d.abs() > tol {
                d
            } else if xm > 0.0 {
                tol
            } else {
                -tol
            };
            fb = f(b)?;
        }
        Err(Error::Solver(format!(
            "Brent: maximum evaluations ({}) reached",
            self.max_evaluations
        )))
    }
}

// ── Bisection ─────────────────────────────────────────────────────────────────

/// Plain bisection. Slow but unconditionally convergent on a bracket.
#[derive(Clone, Copy, Debug)]
pub struct Bisection {
    max_evaluations: u32,
}

impl Default for Bisection {
    fn default() -> Self {
        Bisection {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }
}

impl Solver1D for Bisection {
    fn solve(
        &self,
        f: Objective<'_>,
        accuracy: Real,
        _guess: Real,
        lo: Real,
        hi: Real,
    ) -> Result<Real> {
        let mut a = lo;
        let mut b = hi;
        let fa = f(a)?;
        if fa == 0.0 {
            return Ok(a);
        }
        let fb = f(b)?;
        if fb == 0.0 {
            return Ok(b);
        }
        check_bracket(a, b, fa, fb)?;

        let mut fa = fa;
        for _ in 0..self.max_evaluations {
            let mid = 0.5 * (a + b);
            let fm = f(mid)?;
            if fm == 0.0 || 0.5 * (b - a) < accuracy {
                return Ok(mid);
            }
            if fa * fm < 0.0 {
                b = mid;
            } else {
                a = mid;
                fa = fm;
            }
        }
        Err(Error::Solver(format!(
            "Bisection: maximum evaluations ({}) reached",
            self.max_evaluations
        )))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
