//! Property invariants of the calculation pipeline: non-negativity,
//! monotonicity, aggregation linearity, rate scaling, empty-input
//! neutrality, and run-to-run determinism.

use std::error::Error;
use std::sync::Arc;

use hazard_curve_lib::auxilary::approx_equal;
use hazard_curve_lib::config::CalcConfig;
use hazard_curve_lib::configs::demo_model;
use hazard_curve_lib::errors::HazardError;
use hazard_curve_lib::exceedance::ExceedanceModel;
use hazard_curve_lib::gmm::{Gmm, GmmInput, GmmSet, GroundMotionModeling, ScalarGroundMotion};
use hazard_curve_lib::imt::Imt;
use hazard_curve_lib::pipeline::HazardCalculator;
use hazard_curve_lib::site::{Location, Site};
use hazard_curve_lib::source::{
    Distances, FixedSurface, HazardModel, Rupture, Source, SourceSet, SourceType,
};

struct ConstantGmm {
    mean: f64,
    sigma: f64,
}

impl GroundMotionModeling for ConstantGmm {
    fn supports(&self, _imt: Imt) -> bool {
        true
    }

    fn calc(&self, _input: &GmmInput, _imt: Imt) -> ScalarGroundMotion {
        ScalarGroundMotion::new(self.mean, self.sigma)
    }
}

fn constant_gmm_set() -> Result<GmmSet, HazardError> {
    GmmSet::builder()
        .gmm_model(
            Gmm::Mf2013Crustal,
            Arc::new(ConstantGmm {
                mean: 0.0,
                sigma: 0.6,
            }),
            1.0,
            None,
        )
        .build()
}

fn fixed_source(name: &str, rates: &[f64]) -> Source {
    let ruptures = rates
        .iter()
        .enumerate()
        .map(|(i, &rate)| {
            Rupture::new(
                rate,
                5.5 + 0.4 * i as f64,
                0.0,
                Arc::new(FixedSurface {
                    distances: Distances {
                        r_jb: 20.0 + 5.0 * i as f64,
                        r_rup: 21.0 + 5.0 * i as f64,
                        r_x: 20.0 + 5.0 * i as f64,
                    },
                    dip: 60.0,
                    width: 12.0,
                    z_top: 1.0,
                }),
            )
        })
        .collect();
    Source::new(name, Location::new(0.0, 0.0), ruptures)
}

fn fault_model(name: &str, sources: Vec<Source>) -> Result<HazardModel, Box<dyn Error>> {
    let set = SourceSet::faults(
        name,
        SourceType::Fault,
        1.0,
        300.0,
        constant_gmm_set()?,
        sources,
    )?;
    Ok(HazardModel::new(name, vec![set]))
}

fn test_config() -> Result<CalcConfig, HazardError> {
    CalcConfig::builder()
        .imt(Imt::Pga)
        .exceedance_model(ExceedanceModel::TruncationUpperOnly)
        .build()
}

fn test_site() -> Site {
    Site::new(Location::new(0.0, 0.0), 760.0)
}

#[test]
fn test_demo_model_curves_non_negative_and_non_increasing() -> Result<(), Box<dyn Error>> {
    let model = demo_model()?;
    let config = CalcConfig::builder()
        .imts([Imt::Pga, Imt::Pgv, Imt::Sa1P0])
        .build()?;
    let site = Site::new(Location::new(142.5, 50.0), 500.0);
    let calculator = HazardCalculator::with_threads(2)?;
    let result = calculator.hazard_curve(&model, &config, &site)?;

    for (_, curve) in result.total_curves()?.iter() {
        assert!(curve.ys().iter().all(|&y| y >= 0.0));
        for pair in curve.ys().windows(2) {
            assert!(pair[1] <= pair[0] + 1e-15);
        }
    }
    Ok(())
}

#[test]
fn test_aggregation_is_linear_over_disjoint_sources() -> Result<(), Box<dyn Error>> {
    let calculator = HazardCalculator::with_threads(1)?;
    let config = test_config()?;
    let site = test_site();

    let only_a = fault_model("a", vec![fixed_source("a", &[1e-3, 4e-4])])?;
    let only_b = fault_model("b", vec![fixed_source("b", &[2e-3])])?;
    let union = fault_model(
        "ab",
        vec![
            fixed_source("a", &[1e-3, 4e-4]),
            fixed_source("b", &[2e-3]),
        ],
    )?;

    let totals_a = calculator.hazard_curve(&only_a, &config, &site)?.total_curves()?;
    let totals_b = calculator.hazard_curve(&only_b, &config, &site)?.total_curves()?;
    let totals_union = calculator.hazard_curve(&union, &config, &site)?.total_curves()?;

    let a = totals_a.get(Imt::Pga).unwrap();
    let b = totals_b.get(Imt::Pga).unwrap();
    let both = totals_union.get(Imt::Pga).unwrap();
    for i in 0..a.len() {
        assert!(approx_equal(both.ys()[i], a.ys()[i] + b.ys()[i], 1e-15));
    }
    Ok(())
}

#[test]
fn test_rate_scaling_scales_curves() -> Result<(), Box<dyn Error>> {
    let calculator = HazardCalculator::with_threads(1)?;
    let config = test_config()?;
    let site = test_site();
    let k = 3.0;

    let base = fault_model("base", vec![fixed_source("s", &[1e-3, 4e-4])])?;
    let scaled = fault_model("scaled", vec![fixed_source("s", &[k * 1e-3, k * 4e-4])])?;

    let base_totals = calculator.hazard_curve(&base, &config, &site)?.total_curves()?;
    let scaled_totals = calculator.hazard_curve(&scaled, &config, &site)?.total_curves()?;

    let base_curve = base_totals.get(Imt::Pga).unwrap();
    let scaled_curve = scaled_totals.get(Imt::Pga).unwrap();
    for i in 0..base_curve.len() {
        assert!(approx_equal(scaled_curve.ys()[i], k * base_curve.ys()[i], 1e-15));
    }
    Ok(())
}

#[test]
fn test_empty_source_contributes_nothing() -> Result<(), Box<dyn Error>> {
    let calculator = HazardCalculator::with_threads(1)?;
    let config = test_config()?;
    let site = test_site();

    let without = fault_model("without", vec![fixed_source("s", &[1e-3])])?;
    let with_empty = fault_model(
        "with empty",
        vec![fixed_source("s", &[1e-3]), fixed_source("hollow", &[])],
    )?;

    let lhs = calculator.hazard_curve(&without, &config, &site)?.total_curves()?;
    let rhs = calculator.hazard_curve(&with_empty, &config, &site)?.total_curves()?;
    assert_eq!(lhs.get(Imt::Pga).unwrap().ys(), rhs.get(Imt::Pga).unwrap().ys());
    Ok(())
}

#[test]
fn test_multi_site_sweep_matches_single_site_runs() -> Result<(), Box<dyn Error>> {
    use hazard_curve_lib::vectorized::{hazard_curve_vec, uniform_hazard_levels};

    let model = fault_model("sweep", vec![fixed_source("s", &[1e-3, 4e-4])])?;
    let config = test_config()?;
    let sites = vec![
        Site::new(Location::new(0.0, 0.0), 760.0),
        Site::new(Location::new(0.1, 0.0), 400.0),
    ];

    let results = hazard_curve_vec(&model, &config, &sites)?;
    assert_eq!(results.len(), 2);
    let calculator = HazardCalculator::with_threads(1)?;
    for (result, site) in results.iter().zip(&sites) {
        let single = calculator.hazard_curve(&model, &config, site)?;
        let swept = result.total_curves()?;
        let lone = single.total_curves()?;
        assert_eq!(swept.get(Imt::Pga).unwrap().ys(), lone.get(Imt::Pga).unwrap().ys());
    }

    // The fixture GMM ignores site terms, so both sites see the same
    // curve; a rate on the curve interpolates to the same level twice.
    let rate = results[0].total_curves()?.get(Imt::Pga).unwrap().ys()[5];
    let levels = uniform_hazard_levels(&results, &sites, Imt::Pga, rate)?;
    assert_eq!(levels.len(), 2);
    assert!(levels[0].level.is_some());
    assert_eq!(levels[0].level, levels[1].level);
    Ok(())
}

#[test]
fn test_runs_are_bit_exact_across_pool_sizes() -> Result<(), Box<dyn Error>> {
    let model = demo_model()?;
    let config = CalcConfig::builder().imts([Imt::Pga, Imt::Pgv]).build()?;
    let site = Site::new(Location::new(142.5, 50.0), 500.0);

    let serial = HazardCalculator::with_threads(1)?
        .hazard_curve(&model, &config, &site)?
        .total_curves()?;
    let parallel = HazardCalculator::with_threads(4)?
        .hazard_curve(&model, &config, &site)?
        .total_curves()?;

    for (imt, curve) in serial.iter() {
        assert_eq!(curve.ys(), parallel.get(imt).unwrap().ys());
    }
    Ok(())
}
