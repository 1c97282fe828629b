//! Ground-motion-to-curve transformation.
//!
//! The third pipeline stage folds a source's ground motion tensors into
//! per-(IMT, GMM) exceedance curves: for each rupture, the configured
//! exceedance model fills a scratch curve over the natural-log model grid,
//! which is then scaled by the rupture's annual rate and accumulated. The
//! result curves share x values with the linear model curve of their IMT.

use crate::config::CalcConfig;
use crate::curve::Curve;
use crate::dense::DenseMap;
use crate::errors::HazardError;
use crate::gmm::Gmm;
use crate::ground_motions::{HazardGroundMotions, MotionTensors};
use crate::imt::Imt;

/// The exceedance curves of a single ordinary source.
pub struct HazardCurves {
    ground_motions: HazardGroundMotions,
    curves: DenseMap<Imt, DenseMap<Gmm, Curve>>,
}

impl HazardCurves {
    /// The ground motions these curves were computed from.
    pub fn ground_motions(&self) -> &HazardGroundMotions {
        &self.ground_motions
    }

    /// Minimum Joyner-Boore distance of the parent source, km.
    pub fn min_distance(&self) -> f64 {
        self.ground_motions.min_distance()
    }

    /// The curve tensor, indexed IMT → GMM.
    pub fn curves(&self) -> &DenseMap<Imt, DenseMap<Gmm, Curve>> {
        &self.curves
    }

    /// The curve of one (IMT, GMM) cell, if present.
    pub fn curve(&self, imt: Imt, gmm: Gmm) -> Option<&Curve> {
        self.curves.get(imt).and_then(|by_gmm| by_gmm.get(gmm))
    }
}

/// Accumulate rate-scaled exceedance curves over a motion tensor.
///
/// `scales[i]` multiplies the exceedance contribution of rupture `i`: the
/// annual rate in the ordinary branch, the magnitude-variant weight in
/// the cluster branch.
pub(crate) fn accumulate_tensor_curves(
    tensors: &MotionTensors,
    scales: &[f64],
    config: &CalcConfig,
) -> Result<DenseMap<Imt, DenseMap<Gmm, Curve>>, HazardError> {
    let model = config.exceedance_model();
    let n = config.truncation_level();
    let mut curves = DenseMap::new();
    for (imt, by_gmm) in tensors.iter() {
        let xs = config
            .model_curve(imt)
            .ok_or_else(|| HazardError::internal(format!("no model curve for {imt}")))?;
        let log_xs = config
            .log_model_curve(imt)
            .ok_or_else(|| HazardError::internal(format!("no log model curve for {imt}")))?;
        let mut util = vec![0.0; xs.len()];
        let mut imt_curves = DenseMap::new();
        for (gmm, motions) in by_gmm.iter() {
            if motions.means.len() != scales.len() {
                return Err(HazardError::internal(format!(
                    "({imt}, {}) holds {} motions for {} ruptures",
                    gmm.name(),
                    motions.means.len(),
                    scales.len()
                )));
            }
            let mut gmm_curve = Curve::zeroed(xs.clone());
            for (i, &scale) in scales.iter().enumerate() {
                model.fill(motions.means[i], motions.sigmas[i], n, imt, log_xs, &mut util);
                gmm_curve.add_scaled_ys(&util, scale)?;
            }
            imt_curves.insert(gmm, gmm_curve);
        }
        curves.insert(imt, imt_curves);
    }
    Ok(curves)
}

/// Transform a source's ground motions into its exceedance curves.
pub fn ground_motions_to_curves(
    ground_motions: HazardGroundMotions,
    config: &CalcConfig,
) -> Result<HazardCurves, HazardError> {
    let scales: Vec<f64> = ground_motions
        .inputs()
        .entries()
        .iter()
        .map(|t| t.rate)
        .collect();
    let curves = accumulate_tensor_curves(ground_motions.tensors(), &scales, config)?;
    Ok(HazardCurves {
        ground_motions,
        curves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auxilary::approx_equal;
    use crate::exceedance::ExceedanceModel;
    use crate::gmm::{GmmInput, GmmSet, GroundMotionModeling, ScalarGroundMotion};
    use crate::ground_motions::inputs_to_ground_motions;
    use crate::inputs::source_to_inputs;
    use crate::site::{Location, Site};
    use crate::source::{Distances, FixedSurface, Rupture, Source};

    struct Constant {
        mean: f64,
        sigma: f64,
    }

    impl GroundMotionModeling for Constant {
        fn supports(&self, _imt: Imt) -> bool {
            true
        }

        fn calc(&self, _input: &GmmInput, _imt: Imt) -> ScalarGroundMotion {
            ScalarGroundMotion::new(self.mean, self.sigma)
        }
    }

    fn curves_for(rates: &[f64]) -> HazardCurves {
        let surface = Arc::new(FixedSurface {
            distances: Distances {
                r_jb: 20.0,
                r_rup: 20.0,
                r_x: 20.0,
            },
            dip: 90.0,
            width: 10.0,
            z_top: 0.0,
        });
        let ruptures = rates
            .iter()
            .map(|&rate| {
                let surface: Arc<dyn crate::source::RuptureSurface> =
                    Arc::clone(&surface) as Arc<dyn crate::source::RuptureSurface>;
                Rupture::new(rate, 6.5, 0.0, surface)
            })
            .collect();
        let source = Source::new("fixture", Location::new(0.0, 0.0), ruptures);
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        let gmm_set = GmmSet::builder()
            .gmm_model(
                Gmm::Mf2013Crustal,
                Arc::new(Constant {
                    mean: 0.0,
                    sigma: 0.6,
                }),
                1.0,
                None,
            )
            .build()
            .unwrap();
        let config = CalcConfig::builder()
            .imt(Imt::Pga)
            .exceedance_model(ExceedanceModel::TruncationOff)
            .model_curve(Imt::Pga, vec![0.01, 0.1, 1.0])
            .build()
            .unwrap();
        let inputs = source_to_inputs(&source, &site).unwrap();
        let motions = inputs_to_ground_motions(inputs, &gmm_set, config.imts()).unwrap();
        ground_motions_to_curves(motions, &config).unwrap()
    }

    #[test]
    fn test_single_rupture_curve_values() {
        let curves = curves_for(&[1e-3]);
        let curve = curves.curve(Imt::Pga, Gmm::Mf2013Crustal).unwrap();
        // 1e-3 · Φ̄(ln(x)/0.6) at x = 1.0 is exactly half the rate.
        assert!(approx_equal(curve.y_at(1.0).unwrap(), 5.0e-4, 1e-9));
        let y_low = curve.y_at(0.01).unwrap();
        assert!(y_low > 9.99e-4 && y_low <= 1e-3);
    }

    #[test]
    fn test_rates_accumulate_linearly() {
        let single = curves_for(&[1e-3]);
        let double = curves_for(&[1e-3, 1e-3]);
        let y_single = single.curve(Imt::Pga, Gmm::Mf2013Crustal).unwrap().y_at(0.1).unwrap();
        let y_double = double.curve(Imt::Pga, Gmm::Mf2013Crustal).unwrap().y_at(0.1).unwrap();
        assert!(approx_equal(y_double, 2.0 * y_single, 1e-15));
    }
}
