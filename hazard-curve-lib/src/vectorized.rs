//! # Vectorized Hazard Calculations
//!
//! Hazard maps repeat the same calculation over hundreds or thousands
//! of sites. This module runs those sweeps data-parallel with
//! [`Rayon`] and turns the per-site results into the level grids a map
//! actually plots.
//!
//! ## Features
//!
//! - **Parallel multi-site hazard:** One pipeline pass per site, fanned
//!   out across worker threads.
//! - **Uniform hazard level extraction:** Interpolate each site's total
//!   curve at a target annual exceedance rate (e.g. 1/475 per year),
//!   producing the per-site ground motion values a hazard map plots.
//! - **Level grid summaries:** Spread of the extracted levels across a
//!   grid, for quick sanity checks before plotting.
//!
//! ## Primary Types and Functions
//!
//! - [`hazard_curve_vec`]: Sweep a slice of [`Site`]s through the full
//!   pipeline.
//! - [`uniform_hazard_levels`]: Extract per-site ground motion levels at
//!   a target annual rate.
//! - [`compute_level_stats`]: Summarize the spread of extracted
//!   [`HazardLevelPoint`] values.
//! - [`Stats`]: The computed grid summary.
//!
//! ## Parallelism
//!
//! Sweeps run on the global
//! [`Rayon`](https://docs.rs/rayon/latest/rayon/) pool (sized by
//! `RAYON_NUM_THREADS`, or one thread per logical CPU); use
//! [`HazardCalculator`](crate::pipeline::HazardCalculator) directly
//! when a calculation needs its own pool.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::CalcConfig;
use crate::consolidate::HazardResult;
use crate::errors::HazardError;
use crate::imt::Imt;
use crate::pipeline::hazard_curve;
use crate::site::Site;
use crate::source::HazardModel;

/// Run the hazard pipeline over every site of a sweep in parallel.
///
/// Each site gets a full pipeline pass on the global Rayon pool;
/// results come back in site order, and the first failing site aborts
/// the sweep.
///
/// # Arguments
///
/// * `model` - The hazard model.
/// * `config` - Calculation configuration shared by all sites.
/// * `sites` - The sites to calculate hazard for.
///
/// # Returns
///
/// A `Vec<HazardResult>` parallel to `sites`.
///
/// # Errors
///
/// The first configuration, data, or internal error observed.
pub fn hazard_curve_vec(
    model: &HazardModel,
    config: &CalcConfig,
    sites: &[Site],
) -> Result<Vec<HazardResult>, HazardError> {
    sites
        .par_iter()
        .map(|site| hazard_curve(model, config, site))
        .collect()
}

/// A site with the ground motion level exceeded at a target annual rate.
#[derive(Debug, Serialize)]
pub struct HazardLevelPoint {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Intensity-measure type of the level.
    pub imt: Imt,
    /// Interpolated ground motion level in the IMT's linear units, or
    /// `None` when the target rate lies outside the site's curve.
    pub level: Option<f64>,
}

/// Extract per-site ground motion levels at a target annual rate from
/// already-computed hazard results.
///
/// `results` must be parallel to `sites`, as returned by
/// [`hazard_curve_vec`]. Sites whose total curve does not bracket the
/// target rate yield `None` levels.
///
/// # Errors
///
/// A configuration error when `imt` was not part of the calculation.
pub fn uniform_hazard_levels(
    results: &[HazardResult],
    sites: &[Site],
    imt: Imt,
    rate: f64,
) -> Result<Vec<HazardLevelPoint>, HazardError> {
    if results.len() != sites.len() {
        return Err(HazardError::internal(format!(
            "{} results for {} sites",
            results.len(),
            sites.len()
        )));
    }
    let mut points = Vec::with_capacity(sites.len());
    for (result, site) in results.iter().zip(sites) {
        let totals = result.total_curves()?;
        let Some(curve) = totals.get(imt) else {
            return Err(HazardError::config(format!(
                "{imt} was not part of the calculation"
            )));
        };
        points.push(HazardLevelPoint {
            lon: site.location.lon,
            lat: site.location.lat,
            imt,
            level: curve.ground_motion_at_rate(rate),
        });
    }
    Ok(points)
}

/// Spread of a hazard level grid.
#[derive(Debug, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Summarize the spread of a uniform hazard level grid.
///
/// Sites whose curve did not bracket the target rate carry no level and
/// are skipped. The sum and variance reductions run on the Rayon pool,
/// which pays off on map-scale grids; ordering the levels once serves
/// the median and the extrema together.
///
/// # Returns
///
/// `None` when no point carries a level, otherwise a [`Stats`] holding
/// the mean, sample standard deviation, minimum, maximum, and median of
/// the extracted levels.
pub fn compute_level_stats(points: &[HazardLevelPoint]) -> Option<Stats> {
    let mut levels: Vec<f64> = points.iter().filter_map(|p| p.level).collect();
    if levels.is_empty() {
        return None;
    }
    levels.sort_by(f64::total_cmp);

    let n = levels.len() as f64;
    let mean = levels.par_iter().sum::<f64>() / n;
    let std_dev = if levels.len() > 1 {
        let variance = levels
            .par_iter()
            .map(|level| (level - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    let mid = levels.len() / 2;
    let median = if levels.len() % 2 == 0 {
        0.5 * (levels[mid - 1] + levels[mid])
    } else {
        levels[mid]
    };

    Some(Stats {
        mean,
        std_dev,
        min: levels[0],
        max: levels[levels.len() - 1],
        median,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_point(level: Option<f64>) -> HazardLevelPoint {
        HazardLevelPoint {
            lon: 0.0,
            lat: 0.0,
            imt: Imt::Pga,
            level,
        }
    }

    #[test]
    fn test_compute_level_stats() {
        // PGA levels (g) of a small map grid, deliberately unsorted;
        // mean 0.3, squared deviations 0.04 + 0.01 + 0 + 0.09 over n−1.
        let points: Vec<_> = [0.3, 0.6, 0.1, 0.2]
            .into_iter()
            .map(|v| level_point(Some(v)))
            .collect();

        let stats = compute_level_stats(&points).unwrap();

        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.std_dev - (0.14_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.6);
        assert!((stats.median - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_stats_skip_missing_levels() {
        let points = vec![level_point(Some(2.0)), level_point(None)];
        let stats = compute_level_stats(&points).unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_stats_of_nothing() {
        let points = vec![level_point(None)];
        assert!(compute_level_stats(&points).is_none());
    }
}
