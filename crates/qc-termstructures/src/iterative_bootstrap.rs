//! The pillar-by-pillar iterative bootstrap.
//!
//! Generic over the curve family (via `CurveTraits`), the instruments
//! (via `BootstrapHelper`), the interpolation, and the root solver. The
//! engine is stateless between runs: it takes node ownership of nothing
//! and returns freshly built arrays.

use qc_core::errors::{Error, Result};
use qc_core::{Real, Time};
use qc_math::{Brent, Interpolation1D, InterpolationFactory, Solver1D};
use qc_time::{Date, DayCounter};

use crate::bootstrap_helpers::{BootstrapCurve, BootstrapHelper};
use crate::bootstrap_traits::CurveTraits;

const DEFAULT_ACCURACY: Real = 1.0e-12;
// Pillars closer than this (in years) are considered coincident.
const MIN_TIME_GAP: Time = 1.0e-8;

/// Everything a bootstrap run produces.
pub struct BootstrapResult {
    /// Node dates, starting at the curve's initial date.
    pub dates: Vec<Date>,
    /// Node times, starting at 0.
    pub times: Vec<Time>,
    /// Calibrated node values.
    pub data: Vec<Real>,
    /// Interpolation over the final arrays.
    pub interpolation: Box<dyn Interpolation1D>,
}

/// The bootstrap engine: an accuracy target and a root solver.
#[derive(Debug)]
pub struct IterativeBootstrap {
    accuracy: Real,
    solver: Box<dyn Solver1D>,
}

impl Default for IterativeBootstrap {
    fn default() -> Self {
        IterativeBootstrap {
            accuracy: DEFAULT_ACCURACY,
            solver: Box::new(Brent::default()),
        }
    }
}

impl IterativeBootstrap {
    /// An engine with explicit accuracy and solver.
    pub fn new(accuracy: Real, solver: Box<dyn Solver1D>) -> Self {
        IterativeBootstrap { accuracy, solver }
    }

    /// The repricing accuracy target.
    pub fn accuracy(&self) -> Real {
        self.accuracy
    }

    /// Run one bootstrap against the given helpers.
    pub fn run(
        &self,
        reference_date: Date,
        day_counter: &dyn DayCounter,
        traits: &dyn CurveTraits,
        helpers: &[Box<dyn BootstrapHelper>],
        factory: &dyn InterpolationFactory,
    ) -> Result<BootstrapResult> {
        // Instruments already expired at the reference date drop out.
        let alive: Vec<&dyn BootstrapHelper> = helpers
            .iter()
            .map(|h| h.as_ref())
            .filter(|h| h.latest_date() > reference_date)
            .collect();
        if alive.is_empty() {
            return Err(Error::DataIntegrity(
                "no helper matures after the curve reference date".into(),
            ));
        }

        let mut dates = Vec::with_capacity(alive.len() + 1);
        let mut times = Vec::with_capacity(alive.len() + 1);
        dates.push(reference_date);
        times.push(0.0);
        for helper in &alive {
            let pillar = helper.latest_date();
            let t = day_counter.year_fraction(reference_date, pillar);
            if t <= *times.last().unwrap() + MIN_TIME_GAP {
                return Err(Error::DataIntegrity(format!(
                    "pillar {pillar} does not strictly follow the previous one"
                )));
            }
            dates.push(pillar);
            times.push(t);
        }

        let targets: Vec<Real> = alive.iter().map(|h| h.quote()).collect::<Result<_>>()?;

        let n = times.len();
        let mut data = vec![traits.initial_value(); n];

        // Cold pass: each pillar sees only the nodes up to itself.
        for i in 1..n {
            self.solve_pillar(
                i, true, reference_date, day_counter, traits, alive[i - 1], targets[i - 1],
                &times, &mut data, factory,
            )?;
        }

        // Warm refinement over the full curve until the nodes settle.
        let mut passes = 0;
        loop {
            passes += 1;
            if passes > traits.max_iterations() {
                return Err(Error::BootstrapFailed {
                    pillar: n - 1,
                    detail: format!(
                        "not converged after {} refinement passes",
                        traits.max_iterations()
                    ),
                });
            }
            let previous = data.clone();
            for i in 1..n {
                self.solve_pillar(
                    i, false, reference_date, day_counter, traits, alive[i - 1], targets[i - 1],
                    &times, &mut data, factory,
                )?;
            }
            let change = data
                .iter()
                .zip(&previous)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, Real::max);
            if change < self.accuracy {
                break;
            }
        }

        traits.validate(&times, &data)?;
        let interpolation = factory.interpolate(&times, &data)?;
        Ok(BootstrapResult {
            dates,
            times,
            data,
            interpolation,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_pillar(
        &self,
        i: usize,
        cold: bool,
        reference_date: Date,
        day_counter: &dyn DayCounter,
        traits: &dyn CurveTraits,
        helper: &dyn BootstrapHelper,
        target: Real,
        times: &[Time],
        data: &mut [Real],
        factory: &dyn InterpolationFactory,
    ) -> Result<()> {
        let valid = !cold;
        let guess = traits.guess(i, times, data, valid);
        let lo = traits.min_value_after(i, times, data, valid);
        let hi = traits.max_value_after(i, times, data, valid);
        if !(lo < hi) {
            return Err(Error::BootstrapFailed {
                pillar: i,
                detail: format!("degenerate bracket [{lo}, {hi}]"),
            });
        }

        // On the cold pass the interpolation spans only pillars <= i; the
        // instrument is assumed insensitive to later nodes.
        let span = if cold { i + 1 } else { times.len() };
        let kind = traits.node_kind();
        let mut objective = |x: Real| -> Result<Real> {
            traits.update_guess(data, x, i);
            let interpolation = factory.interpolate(&times[..span], &data[..span])?;
            let view = BootstrapCurve {
                reference_date,
                day_counter,
                times: &times[..span],
                data: &data[..span],
                interpolation: interpolation.as_ref(),
                kind,
            };
            Ok(helper.implied_quote(&view)? - target)
        };

        // The solver runs a notch tighter than the pass-level convergence
        // check, so successive refinement passes can actually settle.
        let root = self
            .solver
            .solve(&mut objective, 0.1 * self.accuracy, guess.clamp(lo, hi), lo, hi)
            .map_err(|e| match e {
                Error::Solver(detail) => Error::BootstrapFailed { pillar: i, detail },
                other => other,
            })?;
        traits.update_guess(data, root, i);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap_helpers::ZeroCouponInflationSwapHelper;
    use crate::bootstrap_traits::ZeroInflationTraits;
    use approx::assert_relative_eq;
    use qc_core::Handle;
    use qc_math::Linear;
    use qc_quotes::SimpleQuote;
    use qc_time::{Actual365Fixed, Date, TimeUnit};

    #[test]
    fn zero_inflation_nodes_hit_their_quotes() {
        let today = Date::from_ymd(2025, 6, 2).unwrap();
        let mut helpers: Vec<Box<dyn BootstrapHelper>> = Vec::new();
        for (years, rate) in [(5, 0.02), (10, 0.022)] {
            let maturity = today.advance(years, TimeUnit::Years).unwrap();
            helpers.push(Box::new(
                ZeroCouponInflationSwapHelper::new(
                    Handle::new(SimpleQuote::new(rate)),
                    today,
                    maturity,
                )
                .unwrap(),
            ));
        }

        let result = IterativeBootstrap::default()
            .run(
                today,
                &Actual365Fixed,
                &ZeroInflationTraits { base_rate: 0.02 },
                &helpers,
                &Linear,
            )
            .unwrap();

        assert_eq!(result.data.len(), 3);
        assert_relative_eq!(result.data[1], 0.02, epsilon = 1e-10);
        assert_relative_eq!(result.data[2], 0.022, epsilon = 1e-10);
    }

    #[test]
    fn expired_helpers_are_dropped_and_empty_sets_rejected() {
        let today = Date::from_ymd(2025, 6, 2).unwrap();
        let yesterday = today.add_days(-365).unwrap();
        let helpers: Vec<Box<dyn BootstrapHelper>> = vec![Box::new(
            ZeroCouponInflationSwapHelper::new(
                Handle::new(SimpleQuote::new(0.02)),
                yesterday,
                today,
            )
            .unwrap(),
        )];
        let err = IterativeBootstrap::default().run(
            today,
            &Actual365Fixed,
            &ZeroInflationTraits { base_rate: 0.02 },
            &helpers,
            &Linear,
        );
        assert!(matches!(err, Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn duplicate_pillars_are_rejected() {
        let today = Date::from_ymd(2025, 6, 2).unwrap();
        let maturity = today.advance(5, TimeUnit::Years).unwrap();
        let make = || -> Box<dyn BootstrapHelper> {
            Box::new(
                ZeroCouponInflationSwapHelper::new(
                    Handle::new(SimpleQuote::new(0.02)),
                    today,
                    maturity,
                )
                .unwrap(),
            )
        };
        let helpers = vec![make(), make()];
        let err = IterativeBootstrap::default().run(
            today,
            &Actual365Fixed,
            &ZeroInflationTraits { base_rate: 0.02 },
            &helpers,
            &Linear,
        );
        assert!(matches!(err, Err(Error::DataIntegrity(_))));
    }
}
