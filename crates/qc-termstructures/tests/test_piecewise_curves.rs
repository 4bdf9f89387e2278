//! End-to-end tests of bootstrapped piecewise curves.

use std::sync::Arc;

use approx::assert_relative_eq;
use qc_core::errors::Error;
use qc_core::{Handle, Real};
use qc_math::{BackwardFlat, InterpolationFactory, Linear};
use qc_quotes::SimpleQuote;
use qc_termstructures::{
    BootstrapCurve, BootstrapHelper, CdsHelper, DefaultDensityTraits,
    DefaultProbabilityTermStructure, FlatForward, HazardRateTraits, IterativeBootstrap, NodeKind,
    PiecewiseCurve, SurvivalProbabilityTraits, TermStructure, YieldTermStructure,
    YoyInflationSwapHelper, YoyInflationTermStructure, ZeroCouponInflationSwapHelper,
    ZeroInflationTermStructure, ZeroInflationTraits, YoyInflationTraits,
};
use qc_time::{Actual365Fixed, Date, DayCounter, EvaluationContext, Period, TimeUnit};

fn today() -> Date {
    Date::from_ymd(2025, 6, 2).unwrap()
}

// Pillar times under Actual/365F are not whole years (leap days), so
// node-value assertions must query at the pillar's actual time.
fn pillar_time(curve: &PiecewiseCurve, years: i32) -> f64 {
    let pillar = today().advance(years, TimeUnit::Years).unwrap();
    curve.time_from_reference(pillar)
}

fn cds_market(
    context: &Arc<EvaluationContext>,
    spreads: &[(i32, Real)],
) -> (Vec<Box<dyn BootstrapHelper>>, Vec<Arc<SimpleQuote>>) {
    let discount: Arc<dyn YieldTermStructure> =
        FlatForward::new(context.clone(), 0.02, Box::new(Actual365Fixed));
    let mut helpers: Vec<Box<dyn BootstrapHelper>> = Vec::new();
    let mut quotes = Vec::new();
    for &(years, spread) in spreads {
        let quote = SimpleQuote::new(spread);
        quotes.push(quote.clone());
        helpers.push(Box::new(
            CdsHelper::from_tenor(
                Handle::new(quote),
                Period::new(years, TimeUnit::Years),
                context,
                0.4,
                Handle::new(discount.clone()),
            )
            .unwrap(),
        ));
    }
    (helpers, quotes)
}

fn hazard_curve(
    context: Arc<EvaluationContext>,
    spreads: &[(i32, Real)],
) -> (Arc<PiecewiseCurve>, Vec<Arc<SimpleQuote>>) {
    let (helpers, quotes) = cds_market(&context, spreads);
    let curve = PiecewiseCurve::new(
        context,
        Box::new(Actual365Fixed),
        Box::new(HazardRateTraits),
        helpers,
        Box::new(BackwardFlat),
        IterativeBootstrap::default(),
    )
    .unwrap();
    (curve, quotes)
}

fn zero_inflation_curve(
    context: Arc<EvaluationContext>,
    quotes: &[(i32, Real)],
) -> Arc<PiecewiseCurve> {
    let base = context.evaluation_date();
    let helpers: Vec<Box<dyn BootstrapHelper>> = quotes
        .iter()
        .map(|&(years, rate)| {
            let maturity = base.advance(years, TimeUnit::Years).unwrap();
            Box::new(
                ZeroCouponInflationSwapHelper::new(
                    Handle::new(SimpleQuote::new(rate)),
                    base,
                    maturity,
                )
                .unwrap(),
            ) as Box<dyn BootstrapHelper>
        })
        .collect();
    PiecewiseCurve::new(
        context,
        Box::new(Actual365Fixed),
        Box::new(ZeroInflationTraits { base_rate: quotes[0].1 }),
        helpers,
        Box::new(Linear),
        IterativeBootstrap::default(),
    )
    .unwrap()
}

/// The pieces a standalone [`BootstrapCurve`] view needs, rebuilt from a
/// calibrated curve's nodes so fresh helpers can reprice against it.
struct ViewParts {
    dates: Vec<Date>,
    times: Vec<Real>,
    data: Vec<Real>,
    interpolation: Box<dyn qc_math::Interpolation1D>,
}

impl ViewParts {
    fn of(curve: &Arc<PiecewiseCurve>, factory: &dyn InterpolationFactory) -> Self {
        let nodes = curve.nodes().unwrap();
        let reference = nodes[0].0;
        let mut dates = Vec::new();
        let mut times = Vec::new();
        let mut data = Vec::new();
        for (date, value) in nodes {
            times.push(Actual365Fixed.year_fraction(reference, date));
            data.push(value);
            dates.push(date);
        }
        let interpolation = factory.interpolate(&times, &data).unwrap();
        ViewParts {
            dates,
            times,
            data,
            interpolation,
        }
    }

    fn view(&self, kind: NodeKind) -> BootstrapCurve<'_> {
        BootstrapCurve {
            reference_date: self.dates[0],
            day_counter: &Actual365Fixed,
            times: &self.times,
            data: &self.data,
            interpolation: self.interpolation.as_ref(),
            kind,
        }
    }
}

#[test]
fn relinking_one_handle_clone_redirects_all() {
    let ctx = EvaluationContext::new(today());
    let low = zero_inflation_curve(ctx.clone(), &[(5, 0.01)]);
    let high = zero_inflation_curve(ctx, &[(5, 0.03)]);

    let h1: Handle<dyn ZeroInflationTermStructure> = Handle::new(low);
    let h2 = h1.clone();
    assert_relative_eq!(h2.value().unwrap().zero_inflation_rate(5.0).unwrap(), 0.01, epsilon = 1e-10);

    h1.link_to(high);
    assert_relative_eq!(h2.value().unwrap().zero_inflation_rate(5.0).unwrap(), 0.03, epsilon = 1e-10);
    assert_eq!(h1, h2);
}

#[test]
fn empty_handle_dereference_fails() {
    let handle: Handle<dyn DefaultProbabilityTermStructure> = Handle::empty();
    assert!(matches!(handle.value(), Err(Error::EmptyHandle)));
}

#[test]
fn evaluation_date_move_recomputes_exactly_once() {
    let ctx = EvaluationContext::new(today());
    let (curve, _quotes) = hazard_curve(ctx.clone(), &[(5, 0.01)]);

    curve.survival_probability(1.0).unwrap();
    curve.survival_probability(2.0).unwrap();
    assert_eq!(curve.bootstrap_count(), 1);

    ctx.set_evaluation_date(today().add_days(1).unwrap());
    assert_eq!(curve.bootstrap_count(), 1);

    curve.survival_probability(1.0).unwrap();
    curve.survival_probability(2.0).unwrap();
    assert_eq!(curve.bootstrap_count(), 2);
}

#[test]
fn five_year_cds_reprices_at_the_quoted_spread() {
    let ctx = EvaluationContext::new(today());
    let (curve, _quotes) = hazard_curve(ctx.clone(), &[(5, 0.01)]);

    // Rebuild the helper and view to check the round trip.
    let (helpers, _) = cds_market(&ctx, &[(5, 0.01)]);
    let parts = ViewParts::of(&curve, &BackwardFlat);
    let implied = helpers[0].implied_quote(&parts.view(NodeKind::HazardRate)).unwrap();
    assert!((implied - 0.01).abs() < 1e-10, "implied spread {implied}");

    // Sanity: hazard close to spread / (1 - recovery).
    let hazard = curve.hazard_rate(2.5).unwrap();
    assert_relative_eq!(hazard, 0.01 / 0.6, max_relative = 0.05);
}

#[test]
fn every_cds_helper_reprices_on_a_multi_pillar_curve() {
    let ctx = EvaluationContext::new(today());
    let spreads = [(1, 0.008), (3, 0.010), (5, 0.012)];
    let (curve, _quotes) = hazard_curve(ctx.clone(), &spreads);

    let (helpers, quotes) = cds_market(&ctx, &spreads);
    let parts = ViewParts::of(&curve, &BackwardFlat);
    let view = parts.view(NodeKind::HazardRate);
    for (helper, quote) in helpers.iter().zip(&quotes) {
        use qc_quotes::Quote;
        let implied = helper.implied_quote(&view).unwrap();
        let target = quote.value().unwrap();
        assert!(
            (implied - target).abs() < 1e-10,
            "implied {implied} vs quoted {target}"
        );
    }
}

#[test]
fn survival_probabilities_never_increase() {
    let ctx = EvaluationContext::new(today());
    let (curve, _quotes) = hazard_curve(ctx, &[(1, 0.008), (3, 0.010), (5, 0.012)]);

    let mut previous = curve.survival_probability(0.0).unwrap();
    assert_relative_eq!(previous, 1.0);
    for step in 1..=40 {
        let t = step as Real * 0.25;
        let s = curve.survival_probability(t).unwrap();
        assert!(s <= previous + 1e-14, "survival increased at t = {t}");
        assert!(s > 0.0);
        previous = s;
    }
}

#[test]
fn survival_family_agrees_with_hazard_family_at_the_pillar() {
    let ctx = EvaluationContext::new(today());
    let (hazard, _q1) = hazard_curve(ctx.clone(), &[(5, 0.01)]);

    let (helpers, _q2) = cds_market(&ctx, &[(5, 0.01)]);
    let survival = PiecewiseCurve::new(
        ctx,
        Box::new(Actual365Fixed),
        Box::new(SurvivalProbabilityTraits),
        helpers,
        Box::new(Linear),
        IterativeBootstrap::default(),
    )
    .unwrap();

    let pillar = today().advance(5, TimeUnit::Years).unwrap();
    let t = Actual365Fixed.year_fraction(today(), pillar);
    let s_hazard = hazard.survival_probability(t).unwrap();
    let s_survival = survival.survival_probability(t).unwrap();
    // Same instrument, different node parameterizations: the pillar-date
    // survival agrees to the precision the leg discretization allows.
    assert_relative_eq!(s_hazard, s_survival, max_relative = 1e-3);
}

#[test]
fn default_density_family_calibrates_a_decreasing_survival() {
    let ctx = EvaluationContext::new(today());
    let (helpers, _quotes) = cds_market(&ctx, &[(5, 0.01)]);
    let curve = PiecewiseCurve::new(
        ctx,
        Box::new(Actual365Fixed),
        Box::new(DefaultDensityTraits),
        helpers,
        Box::new(Linear),
        IterativeBootstrap::default(),
    )
    .unwrap();

    let mut previous = curve.survival_probability(0.0).unwrap();
    for step in 1..=20 {
        let t = step as Real * 0.25;
        let s = curve.survival_probability(t).unwrap();
        assert!(s <= previous + 1e-14 && s > 0.0);
        previous = s;
    }
    // 100 bp over five years: roughly 8% cumulative default probability.
    let p5 = curve.default_probability(5.0).unwrap();
    assert!(p5 > 0.05 && p5 < 0.12, "5y default probability {p5}");
}

#[test]
fn identical_inputs_give_bitwise_identical_curves() {
    let build = || {
        let ctx = EvaluationContext::new(today());
        let (curve, _quotes) = hazard_curve(ctx, &[(1, 0.008), (3, 0.010), (5, 0.012)]);
        curve.nodes().unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(a.len(), b.len());
    for ((da, va), (db, vb)) in a.iter().zip(&b) {
        assert_eq!(da, db);
        assert_eq!(va.to_bits(), vb.to_bits(), "node value differs in bits");
    }
}

#[test]
fn zero_inflation_curve_is_monotone_between_pillars() {
    let ctx = EvaluationContext::new(today());
    let curve = zero_inflation_curve(ctx, &[(5, 0.02), (10, 0.022), (20, 0.025)]);

    let (t5, t10, t20) = (
        pillar_time(&curve, 5),
        pillar_time(&curve, 10),
        pillar_time(&curve, 20),
    );
    assert_relative_eq!(curve.zero_inflation_rate(t5).unwrap(), 0.02, epsilon = 1e-9);
    assert_relative_eq!(curve.zero_inflation_rate(t10).unwrap(), 0.022, epsilon = 1e-9);
    assert_relative_eq!(curve.zero_inflation_rate(t20).unwrap(), 0.025, epsilon = 1e-9);

    let seven_year = curve.zero_inflation_rate(7.0).unwrap();
    assert!(
        seven_year > 0.02 && seven_year < 0.022,
        "7y rate {seven_year} outside the 5y/10y range"
    );

    // Flat extrapolation past the last pillar.
    assert_relative_eq!(
        curve.zero_inflation_rate(30.0).unwrap(),
        0.025,
        epsilon = 1e-9
    );
}

#[test]
fn yoy_curve_bootstraps_and_answers_its_own_family_only() {
    let ctx = EvaluationContext::new(today());
    let base = ctx.evaluation_date();
    let helpers: Vec<Box<dyn BootstrapHelper>> = [(5, 0.021), (10, 0.023)]
        .iter()
        .map(|&(years, rate)| {
            let maturity = base.advance(years, TimeUnit::Years).unwrap();
            Box::new(
                YoyInflationSwapHelper::new(Handle::new(SimpleQuote::new(rate)), base, maturity)
                    .unwrap(),
            ) as Box<dyn BootstrapHelper>
        })
        .collect();
    let curve = PiecewiseCurve::new(
        ctx,
        Box::new(Actual365Fixed),
        Box::new(YoyInflationTraits { base_rate: 0.021 }),
        helpers,
        Box::new(Linear),
        IterativeBootstrap::default(),
    )
    .unwrap();

    let (t5, t10) = (pillar_time(&curve, 5), pillar_time(&curve, 10));
    assert_relative_eq!(curve.yoy_inflation_rate(t5).unwrap(), 0.021, epsilon = 1e-9);
    assert_relative_eq!(curve.yoy_inflation_rate(t10).unwrap(), 0.023, epsilon = 1e-9);
    assert!(curve.zero_inflation_rate(t5).is_err());
}

#[test]
fn failed_bootstrap_leaves_curve_dirty_and_retries() {
    // A 5y CDS quoted at 90% cannot be matched by any hazard rate in the
    // bracket (the fair spread tops out near (1 - R) * h_max), so the
    // solve must fail without committing state.
    let ctx = EvaluationContext::new(today());
    let (curve, quotes) = hazard_curve(ctx, &[(5, 0.90)]);

    assert!(matches!(
        curve.survival_probability(1.0),
        Err(Error::BootstrapFailed { pillar: 1, .. })
    ));
    assert_eq!(curve.bootstrap_count(), 0);

    // Correcting the quote lets the next query recalibrate.
    quotes[0].set_value(0.01);
    assert!(curve.survival_probability(1.0).unwrap() > 0.9);
    assert_eq!(curve.bootstrap_count(), 1);
}

#[test]
fn quote_update_flows_through_a_relinkable_discount_handle() {
    // The CDS helpers observe their discount handle; relinking it must
    // invalidate the curve.
    let ctx = EvaluationContext::new(today());
    let discount_a: Arc<dyn YieldTermStructure> =
        FlatForward::new(ctx.clone(), 0.02, Box::new(Actual365Fixed));
    let handle = Handle::new(discount_a);

    let helper = CdsHelper::from_tenor(
        Handle::new(SimpleQuote::new(0.01)),
        Period::new(5, TimeUnit::Years),
        &ctx,
        0.4,
        handle.clone(),
    )
    .unwrap();
    let curve = PiecewiseCurve::new(
        ctx.clone(),
        Box::new(Actual365Fixed),
        Box::new(HazardRateTraits),
        vec![Box::new(helper)],
        Box::new(BackwardFlat),
        IterativeBootstrap::default(),
    )
    .unwrap();

    let before = curve.survival_probability(5.0).unwrap();
    assert_eq!(curve.bootstrap_count(), 1);

    let discount_b: Arc<dyn YieldTermStructure> =
        FlatForward::new(ctx, 0.05, Box::new(Actual365Fixed));
    handle.link_to(discount_b);

    let after = curve.survival_probability(5.0).unwrap();
    assert_eq!(curve.bootstrap_count(), 2);
    // Higher discounting changes the calibrated hazard, if only slightly.
    assert!((before - after).abs() > 1e-12);
}

#[test]
fn max_date_is_the_last_pillar() {
    let ctx = EvaluationContext::new(today());
    let (curve, _quotes) = hazard_curve(ctx, &[(1, 0.008), (5, 0.012)]);
    assert_eq!(
        curve.max_date(),
        today().advance(5, TimeUnit::Years).unwrap()
    );
}
