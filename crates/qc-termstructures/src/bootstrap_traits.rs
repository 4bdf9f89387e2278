//! Per-family bootstrap policies.
//!
//! A `CurveTraits` object tells the engine what the nodes mean, where to
//! start each pillar's root search, how to bracket it, and what a sane
//! final node array looks like. `valid` distinguishes the cold first pass
//! (previous pillars only) from warm refinement passes (a full previous
//! solution is available in `data`).

use qc_core::errors::{Error, Result};
use qc_core::{Rate, Real, Time};

use crate::bootstrap_helpers::NodeKind;

const AVERAGE_HAZARD: Real = 0.01;
const MAX_HAZARD: Real = 1.0;
const AVERAGE_DENSITY: Real = 0.01;
const INFLATION_GUESS: Rate = 0.02;
const MIN_INFLATION: Rate = -0.10;
const MAX_INFLATION: Rate = 0.50;
const CREDIT_ITERATIONS: usize = 25;
const INFLATION_ITERATIONS: usize = 5;
const TINY: Real = 1.0e-12;

/// Family policy consumed by the bootstrap engine.
pub trait CurveTraits: std::fmt::Debug {
    /// Meaning of the node values.
    fn node_kind(&self) -> NodeKind;

    /// Value of pillar 0 (never solved for).
    fn initial_value(&self) -> Real;

    /// Starting point for the root search at pillar `i`.
    fn guess(&self, i: usize, times: &[Time], data: &[Real], valid: bool) -> Real;

    /// Lower solver bound for pillar `i`.
    fn min_value_after(&self, i: usize, times: &[Time], data: &[Real], valid: bool) -> Real;

    /// Upper solver bound for pillar `i`.
    fn max_value_after(&self, i: usize, times: &[Time], data: &[Real], valid: bool) -> Real;

    /// Commit a solved value, backfilling pillar 0 where the family calls
    /// for it.
    fn update_guess(&self, data: &mut [Real], value: Real, i: usize);

    /// Budget of global refinement passes.
    fn max_iterations(&self) -> usize;

    /// Integrity/arbitrage check on the final node arrays.
    fn validate(&self, times: &[Time], data: &[Real]) -> Result<()>;
}

// ── Credit families ───────────────────────────────────────────────────────────

/// Nodes are survival probabilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurvivalProbabilityTraits;

impl CurveTraits for SurvivalProbabilityTraits {
    fn node_kind(&self) -> NodeKind {
        NodeKind::SurvivalProbability
    }

    fn initial_value(&self) -> Real {
        1.0
    }

    fn guess(&self, i: usize, times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            return data[i];
        }
        let dt = times[i] - times[i - 1];
        data[i - 1] * (-AVERAGE_HAZARD * dt).exp()
    }

    fn min_value_after(&self, i: usize, times: &[Time], data: &[Real], _valid: bool) -> Real {
        let dt = times[i] - times[i - 1];
        data[i - 1] * (-MAX_HAZARD * dt).exp()
    }

    fn max_value_after(&self, i: usize, _times: &[Time], data: &[Real], _valid: bool) -> Real {
        // Survival cannot increase.
        data[i - 1]
    }

    fn update_guess(&self, data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
    }

    fn max_iterations(&self) -> usize {
        CREDIT_ITERATIONS
    }

    fn validate(&self, _times: &[Time], data: &[Real]) -> Result<()> {
        for (i, &s) in data.iter().enumerate() {
            if !(s > 0.0 && s <= 1.0) {
                return Err(Error::DataIntegrity(format!(
                    "survival probability {s} at node {i} outside (0, 1]"
                )));
            }
        }
        for (i, w) in data.windows(2).enumerate() {
            if w[1] > w[0] + TINY {
                return Err(Error::ArbitrageViolation(format!(
                    "survival probability increases from {} to {} at node {}",
                    w[0],
                    w[1],
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

/// Nodes are instantaneous hazard rates; pillar 0 mirrors pillar 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct HazardRateTraits;

impl CurveTraits for HazardRateTraits {
    fn node_kind(&self) -> NodeKind {
        NodeKind::HazardRate
    }

    fn initial_value(&self) -> Real {
        AVERAGE_HAZARD
    }

    fn guess(&self, i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            data[i]
        } else if i == 1 {
            AVERAGE_HAZARD
        } else {
            data[i - 1]
        }
    }

    fn min_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            let min = data[1..].iter().cloned().fold(Real::INFINITY, Real::min);
            (min / 2.0).max(TINY)
        } else {
            TINY
        }
    }

    fn max_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            let max = data[1..].iter().cloned().fold(0.0, Real::max);
            (max * 2.0).max(MAX_HAZARD)
        } else {
            MAX_HAZARD
        }
    }

    fn update_guess(&self, data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = data[1];
        }
    }

    fn max_iterations(&self) -> usize {
        CREDIT_ITERATIONS
    }

    fn validate(&self, _times: &[Time], data: &[Real]) -> Result<()> {
        for (i, &h) in data.iter().enumerate() {
            if h < 0.0 {
                return Err(Error::ArbitrageViolation(format!(
                    "negative hazard rate {h} at node {i}"
                )));
            }
        }
        Ok(())
    }
}

/// Nodes are default densities; pillar 0 mirrors pillar 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultDensityTraits;

impl CurveTraits for DefaultDensityTraits {
    fn node_kind(&self) -> NodeKind {
        NodeKind::DefaultDensity
    }

    fn initial_value(&self) -> Real {
        AVERAGE_DENSITY
    }

    fn guess(&self, i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            data[i]
        } else if i == 1 {
            AVERAGE_DENSITY
        } else {
            data[i - 1]
        }
    }

    fn min_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        if valid {
            let min = data[1..].iter().cloned().fold(Real::INFINITY, Real::min);
            (min / 2.0).max(TINY)
        } else {
            TINY
        }
    }

    fn max_value_after(&self, i: usize, times: &[Time], data: &[Real], valid: bool) -> Real {
        // The trial density must keep the cumulative integral below 1, or
        // survival goes negative and helper pricing blows up. Cap the node
        // by the survival remaining at the previous pillar spread over the
        // segment.
        let mut integral = 0.0;
        for k in 1..i {
            integral += 0.5 * (data[k - 1] + data[k]) * (times[k] - times[k - 1]);
        }
        let remaining = (1.0 - integral).max(TINY);
        let cap = remaining / (times[i] - times[i - 1]);
        if valid {
            let max = data[1..].iter().cloned().fold(0.0, Real::max);
            (max * 2.0).min(cap)
        } else {
            cap.min(MAX_HAZARD)
        }
    }

    fn update_guess(&self, data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = data[1];
        }
    }

    fn max_iterations(&self) -> usize {
        CREDIT_ITERATIONS
    }

    fn validate(&self, _times: &[Time], data: &[Real]) -> Result<()> {
        for (i, &f) in data.iter().enumerate() {
            if f < 0.0 {
                return Err(Error::ArbitrageViolation(format!(
                    "negative default density {f} at node {i}"
                )));
            }
        }
        Ok(())
    }
}

// ── Inflation families ────────────────────────────────────────────────────────

fn inflation_guess(i: usize, data: &[Real], valid: bool) -> Rate {
    if valid {
        data[i]
    } else if i == 1 {
        INFLATION_GUESS
    } else {
        data[i - 1]
    }
}

/// Warm brackets widen the observed node range by its span plus 1 %,
/// clamped to the cold bounds' order of magnitude.
fn inflation_bracket(data: &[Real], valid: bool) -> (Rate, Rate) {
    if !valid {
        return (MIN_INFLATION, MAX_INFLATION);
    }
    let min = data[1..].iter().cloned().fold(Real::INFINITY, Real::min);
    let max = data[1..].iter().cloned().fold(Real::NEG_INFINITY, Real::max);
    let pad = (max - min) + 0.01;
    ((min - pad).max(-0.99), (max + pad).min(1.0))
}

fn validate_inflation(data: &[Real]) -> Result<()> {
    for (i, &r) in data.iter().enumerate() {
        if r <= -1.0 {
            return Err(Error::DataIntegrity(format!(
                "inflation rate {r} at node {i} not above -100%"
            )));
        }
    }
    Ok(())
}

/// Nodes are breakeven zero-inflation rates; pillar 0 holds the base rate.
#[derive(Clone, Copy, Debug)]
pub struct ZeroInflationTraits {
    /// Today's known (base) zero-inflation rate.
    pub base_rate: Rate,
}

impl CurveTraits for ZeroInflationTraits {
    fn node_kind(&self) -> NodeKind {
        NodeKind::ZeroInflationRate
    }

    fn initial_value(&self) -> Real {
        self.base_rate
    }

    fn guess(&self, i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_guess(i, data, valid)
    }

    fn min_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_bracket(data, valid).0
    }

    fn max_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_bracket(data, valid).1
    }

    fn update_guess(&self, data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
    }

    fn max_iterations(&self) -> usize {
        INFLATION_ITERATIONS
    }

    fn validate(&self, _times: &[Time], data: &[Real]) -> Result<()> {
        validate_inflation(data)
    }
}

/// Nodes are year-on-year inflation rates; pillar 0 holds the base rate.
#[derive(Clone, Copy, Debug)]
pub struct YoyInflationTraits {
    /// Today's known (base) year-on-year rate.
    pub base_rate: Rate,
}

impl CurveTraits for YoyInflationTraits {
    fn node_kind(&self) -> NodeKind {
        NodeKind::YoyInflationRate
    }

    fn initial_value(&self) -> Real {
        self.base_rate
    }

    fn guess(&self, i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_guess(i, data, valid)
    }

    fn min_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_bracket(data, valid).0
    }

    fn max_value_after(&self, _i: usize, _times: &[Time], data: &[Real], valid: bool) -> Real {
        inflation_bracket(data, valid).1
    }

    fn update_guess(&self, data: &mut [Real], value: Real, i: usize) {
        data[i] = value;
    }

    fn max_iterations(&self) -> usize {
        INFLATION_ITERATIONS
    }

    fn validate(&self, _times: &[Time], data: &[Real]) -> Result<()> {
        validate_inflation(data)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
