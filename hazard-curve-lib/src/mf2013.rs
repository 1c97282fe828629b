//! Morikawa & Fujiwara (2013) ground motion model.
//!
//! Predicts the log-normal distribution (mean, standard deviation in
//! natural-log units) of PGA, PGV, and spectral acceleration from the
//! rupture and site predictors in [`GmmInput`]. One model instance carries
//! a coefficient row per supported IMT; coefficient presets are registered
//! in [`configs`](crate::configs).

use crate::auxilary::{CMS2_PER_G, DL, is_missing_depth};
use crate::dense::DenseMap;
use crate::gmm::{GmmInput, GroundMotionModeling, ScalarGroundMotion};
use crate::imt::Imt;

/// Morikawa & Fujiwara (2013) coefficients for one IMT.
///
/// The published equation operates in log10 of cm/s² (PGA, SA) or cm/s
/// (PGV); `sigma` is likewise in log10 units.
#[derive(Debug, Clone, Copy)]
pub struct Mf2013Coeffs {
    /// Magnitude upper limit (Mw0)
    pub mw0: f64,
    /// Coefficient for magnitude scaling
    pub a: f64,
    /// Coefficient for distance scaling
    pub b: f64,
    /// Constant term
    pub c: f64,
    /// Distance damping parameter
    pub d: f64,
    /// Exponent scaling factor for distance damping
    pub e: f64,
    /// Standard deviation of the log10 ground motion
    pub sigma: f64,
    /// Coefficient for deep sedimentary layer correction
    pub pd: f64,
    /// Minimum depth for deep sedimentary layer correction, m
    pub dl_min: f64,
    /// Reference depth for deep layer correction, m
    pub d0: f64,
    /// Coefficient for Vs30 amplification term
    pub ps: f64,
    /// Maximum Vs30 considered for amplification (Vs_max)
    pub vs_max: f64,
    /// Reference Vs30 value (V0)
    pub v0: f64,
}

/// A Morikawa & Fujiwara (2013) model with per-IMT coefficient rows.
pub struct Mf2013 {
    name: &'static str,
    coeffs: DenseMap<Imt, Mf2013Coeffs>,
}

impl Mf2013 {
    /// Assemble a model from coefficient rows.
    pub fn new(name: &'static str, rows: Vec<(Imt, Mf2013Coeffs)>) -> Self {
        Self {
            name,
            coeffs: rows.into_iter().collect(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// log10 of the median ground motion, in cm/s² (PGA, SA) or cm/s (PGV).
    fn log10_median(&self, c: &Mf2013Coeffs, input: &GmmInput) -> f64 {
        let magnitude = input.mw.min(c.mw0);
        let a_m_w = c.a * magnitude;
        let r_rup = input.r_rup;

        // Deep sedimentary layer correction; z1p0 (km) stands in for the
        // depth to the reference velocity horizon, with a default when
        // the site does not supply one.
        let dl = if is_missing_depth(input.z1p0) {
            DL
        } else {
            input.z1p0 * 1000.
        };
        let g_d = c.pd * (dl.max(c.dl_min) / c.d0).log10();

        // Main GMPE equation (log10 of predicted motion)
        let log_a = (a_m_w + c.b * r_rup + c.c)
            - (r_rup + c.d * 10.0_f64.powf(c.e * magnitude)).log10();

        // Apply deep layer correction
        let log_agd = log_a + g_d;

        // Vs30 site amplification
        let gs = c.ps * (input.vs30.min(c.vs_max) / c.v0).log10();
        log_agd + gs
    }
}

impl GroundMotionModeling for Mf2013 {
    fn supports(&self, imt: Imt) -> bool {
        self.coeffs.contains(imt)
    }

    /// Compute the log-normal ground motion at a site for one rupture.
    ///
    /// PGA and SA are returned in natural-log g units, PGV in natural-log
    /// cm/s; sigma is converted from the published log10 value.
    fn calc(&self, input: &GmmInput, imt: Imt) -> ScalarGroundMotion {
        // Callers gate on supports(); an unsupported IMT yields a
        // non-finite motion that the pipeline rejects.
        let Some(c) = self.coeffs.get(imt) else {
            return ScalarGroundMotion::new(f64::NAN, f64::NAN);
        };
        let log10_median = self.log10_median(c, input);
        let mean = match imt {
            Imt::Pgv => log10_median * std::f64::consts::LN_10,
            _ => log10_median * std::f64::consts::LN_10 - CMS2_PER_G.ln(),
        };
        ScalarGroundMotion::new(mean, c.sigma * std::f64::consts::LN_10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxilary::approx_equal;
    use crate::configs::gmm_instance;
    use crate::gmm::Gmm;

    fn input_at(r_rup: f64, vs30: f64) -> GmmInput {
        GmmInput {
            mw: 6.5,
            r_jb: r_rup,
            r_rup,
            r_x: r_rup,
            dip: 90.0,
            width: 10.0,
            z_top: 0.0,
            z_hyp: 5.0,
            rake: 0.0,
            vs30,
            vs_inferred: true,
            z2p5: f64::NAN,
            z1p0: f64::NAN,
        }
    }

    #[test]
    fn test_supports_follows_coefficient_rows() {
        let crustal = gmm_instance(Gmm::Mf2013Crustal);
        assert!(crustal.supports(Imt::Pga));
        assert!(crustal.supports(Imt::Pgv));
        assert!(crustal.supports(Imt::Sa1P0));
        assert!(!crustal.supports(Imt::Sa0P05));

        let regional = gmm_instance(Gmm::Sakh2018As1997);
        assert!(regional.supports(Imt::Pga));
        assert!(!regional.supports(Imt::Pgv));
    }

    #[test]
    fn test_motion_decays_with_distance() {
        let crustal = gmm_instance(Gmm::Mf2013Crustal);
        let near = crustal.calc(&input_at(10.0, 400.0), Imt::Pga);
        let far = crustal.calc(&input_at(120.0, 400.0), Imt::Pga);
        assert!(near.mean > far.mean);
        assert!(near.sigma > 0.0);
        assert!(approx_equal(near.sigma, far.sigma, 1e-12));
    }

    #[test]
    fn test_stiffer_sites_shake_less() {
        let crustal = gmm_instance(Gmm::Mf2013Crustal);
        let soft = crustal.calc(&input_at(20.0, 250.0), Imt::Pga);
        let stiff = crustal.calc(&input_at(20.0, 1200.0), Imt::Pga);
        assert!(soft.mean > stiff.mean);
    }

    #[test]
    fn test_magnitude_saturates_at_mw0() {
        let crustal = gmm_instance(Gmm::Mf2013Crustal);
        let mut at_cap = input_at(50.0, 400.0);
        at_cap.mw = 8.1;
        let mut above_cap = at_cap;
        above_cap.mw = 9.0;
        let a = crustal.calc(&at_cap, Imt::Pga);
        let b = crustal.calc(&above_cap, Imt::Pga);
        assert!(approx_equal(a.mean, b.mean, 1e-12));
    }

    #[test]
    fn test_unsupported_imt_yields_non_finite() {
        let regional = gmm_instance(Gmm::Ab1995As1997);
        let gm = regional.calc(&input_at(20.0, 400.0), Imt::Pgv);
        assert!(gm.mean.is_nan());
    }
}
