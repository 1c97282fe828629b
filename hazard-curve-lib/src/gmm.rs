//! Ground motion model definitions and traits.
//!
//! This module provides the fundamental data structures for representing
//! rupture- and site-specific predictor vectors, log-normal ground motion
//! results, and the core trait for implementing specific ground motion
//! models (GMMs). It also defines [`GmmSet`], the distance-weighted group
//! of GMMs applicable to a source set.

use std::sync::Arc;

use crate::auxilary::approx_equal;
use crate::dense::{DenseKey, DenseMap};
use crate::errors::HazardError;
use crate::imt::Imt;

/// A log-normal ground motion: mean and standard deviation in natural-log
/// units of the intensity measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarGroundMotion {
    /// Mean (natural log of the median ground motion).
    pub mean: f64,
    /// Aleatory standard deviation, in natural-log units.
    pub sigma: f64,
}

impl ScalarGroundMotion {
    /// Create a new ScalarGroundMotion instance.
    pub fn new(mean: f64, sigma: f64) -> Self {
        Self { mean, sigma }
    }
}

/// Rupture- and site-specific predictor vector for a GMM evaluation.
///
/// Any of the depth-to-velocity-horizon fields may carry the missing
/// sentinel; GMMs are expected to tolerate it.
#[derive(Debug, Clone, Copy)]
pub struct GmmInput {
    /// Moment magnitude.
    pub mw: f64,
    /// Joyner-Boore distance (to the surface projection of the rupture), km.
    pub r_jb: f64,
    /// Closest distance to the rupture plane, km.
    pub r_rup: f64,
    /// Distance from the surface trace, positive on the hanging wall, km.
    pub r_x: f64,
    /// Rupture plane dip, degrees.
    pub dip: f64,
    /// Down-dip rupture width, km.
    pub width: f64,
    /// Depth to the top of the rupture plane, km.
    pub z_top: f64,
    /// Hypocentral depth, km; derived as `z_top + sin(dip) * width / 2`.
    pub z_hyp: f64,
    /// Rake angle, degrees.
    pub rake: f64,
    /// Site vs30, m/s.
    pub vs30: f64,
    /// Whether vs30 was inferred rather than measured.
    pub vs_inferred: bool,
    /// Depth to a shear-wave velocity of 2.5 km/s, km. May be missing.
    pub z2p5: f64,
    /// Depth to a shear-wave velocity of 1.0 km/s, km. May be missing.
    pub z1p0: f64,
}

/// Trait representing a ground motion model (GMM).
///
/// Implementors map a predictor vector to a log-normal ground motion
/// distribution for a supported IMT. Instances are resolved once per
/// source set and shared read-only across calculation tasks, so they must
/// be pure: idempotent and free of hidden mutable state.
pub trait GroundMotionModeling: Send + Sync {
    /// Whether the model supports `imt`.
    ///
    /// The calculation pipeline filters unsupported (GMM, IMT) pairs
    /// before invoking [`calc`](GroundMotionModeling::calc).
    fn supports(&self, imt: Imt) -> bool;

    /// Compute the log-normal ground motion for a predictor vector.
    ///
    /// # Arguments
    ///
    /// * `input` - Rupture and site predictors.
    /// * `imt` - Intensity-measure type; must be supported.
    ///
    /// # Returns
    ///
    /// Mean and standard deviation in natural-log units.
    fn calc(&self, input: &GmmInput, imt: Imt) -> ScalarGroundMotion;
}

/// Identifiers of the ground motion models known to this release.
///
/// The set is closed so tensors can be indexed by ordinal; concrete
/// coefficient presets live in [`configs`](crate::configs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gmm {
    /// Morikawa & Fujiwara (2013), crustal events.
    Mf2013Crustal,
    /// Morikawa & Fujiwara (2013), interplate events.
    Mf2013Interplate,
    /// Morikawa & Fujiwara (2013), intraplate events.
    Mf2013Intraplate,
    /// Regional recalibration after Atkinson & Boore (1995).
    Ab1995,
    /// Regional recalibration after Abrahamson & Silva (1997).
    As1997,
    /// Regional recalibration after Akkar, Sandikkaya & Bommer (2013).
    Asb2013,
    /// Regional recalibration after JSGGA (2022).
    Jsgga2022,
    /// Combined AB1995 / AS1997 recalibration.
    Ab1995As1997,
    /// Combined AB1995 / ASB2013 recalibration.
    Ab1995Asb2013,
    /// Sakhalin (2018) recalibration with AS1997 site terms.
    Sakh2018As1997,
}

/// All GMM identifiers, in ordinal order.
pub const ALL_GMMS: [Gmm; 10] = [
    Gmm::Mf2013Crustal,
    Gmm::Mf2013Interplate,
    Gmm::Mf2013Intraplate,
    Gmm::Ab1995,
    Gmm::As1997,
    Gmm::Asb2013,
    Gmm::Jsgga2022,
    Gmm::Ab1995As1997,
    Gmm::Ab1995Asb2013,
    Gmm::Sakh2018As1997,
];

impl Gmm {
    /// Short display name of the model.
    pub fn name(self) -> &'static str {
        match self {
            Gmm::Mf2013Crustal => "MF2013 crustal",
            Gmm::Mf2013Interplate => "MF2013 interplate",
            Gmm::Mf2013Intraplate => "MF2013 intraplate",
            Gmm::Ab1995 => "AB1995",
            Gmm::As1997 => "AS1997",
            Gmm::Asb2013 => "ASB2013",
            Gmm::Jsgga2022 => "JSGGA2022",
            Gmm::Ab1995As1997 => "AB1995/AS1997",
            Gmm::Ab1995Asb2013 => "AB1995/ASB2013",
            Gmm::Sakh2018As1997 => "Sakh2018/AS1997",
        }
    }

    /// The preset instance of this model from the built-in registry.
    pub fn instance(self) -> Arc<dyn GroundMotionModeling> {
        crate::configs::gmm_instance(self)
    }
}

impl DenseKey for Gmm {
    const COUNT: usize = ALL_GMMS.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        ALL_GMMS[index]
    }
}

struct GmmEntry {
    gmm: Gmm,
    model: Arc<dyn GroundMotionModeling>,
    weight: f64,
    max_distance: f64,
}

impl std::fmt::Debug for GmmEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmmEntry")
            .field("gmm", &self.gmm)
            .field("weight", &self.weight)
            .field("max_distance", &self.max_distance)
            .finish()
    }
}

/// The GMMs applicable to a source set, with distance-dependent weighting.
///
/// Each entry carries a logic-tree weight and an applicability distance.
/// [`gmm_weight_map`](GmmSet::gmm_weight_map) drops entries whose
/// applicability interval does not cover a source's distance and
/// renormalizes the remaining weights to sum to one.
#[derive(Debug)]
pub struct GmmSet {
    entries: Vec<GmmEntry>,
}

impl GmmSet {
    /// Start building a GmmSet.
    pub fn builder() -> GmmSetBuilder {
        GmmSetBuilder {
            entries: Vec::new(),
        }
    }

    /// Iterate the GMM identifiers in the set.
    pub fn gmms(&self) -> impl Iterator<Item = Gmm> + '_ {
        self.entries.iter().map(|e| e.gmm)
    }

    /// Iterate (identifier, model) pairs in the set.
    pub fn models(&self) -> impl Iterator<Item = (Gmm, &Arc<dyn GroundMotionModeling>)> {
        self.entries.iter().map(|e| (e.gmm, &e.model))
    }

    /// The model registered for `gmm`, if present.
    pub fn model(&self, gmm: Gmm) -> Option<&Arc<dyn GroundMotionModeling>> {
        self.entries
            .iter()
            .find(|e| e.gmm == gmm)
            .map(|e| &e.model)
    }

    /// The normalized GMM weights applicable at `distance` (km).
    ///
    /// GMMs whose applicability interval does not cover `distance` are
    /// dropped and the remaining weights renormalized to sum to one. The
    /// map is empty when no GMM covers the distance.
    pub fn gmm_weight_map(&self, distance: f64) -> DenseMap<Gmm, f64> {
        let total: f64 = self
            .entries
            .iter()
            .filter(|e| distance <= e.max_distance)
            .map(|e| e.weight)
            .sum();
        let mut map = DenseMap::new();
        if total <= 0.0 {
            return map;
        }
        for entry in &self.entries {
            if distance <= entry.max_distance {
                map.insert(entry.gmm, entry.weight / total);
            }
        }
        map
    }
}

/// Builder for [`GmmSet`].
pub struct GmmSetBuilder {
    entries: Vec<GmmEntry>,
}

impl GmmSetBuilder {
    /// Add a GMM with its logic-tree weight, resolving the preset
    /// instance from the built-in registry. Applicable at any distance.
    pub fn gmm(self, gmm: Gmm, weight: f64) -> Self {
        self.gmm_model(gmm, gmm.instance(), weight, None)
    }

    /// Add a registry GMM applicable only out to `max_distance` (km).
    pub fn gmm_capped(self, gmm: Gmm, weight: f64, max_distance: f64) -> Self {
        self.gmm_model(gmm, gmm.instance(), weight, Some(max_distance))
    }

    /// Add a GMM with an explicit model instance.
    ///
    /// This is the seam for opaque, externally supplied models; `None`
    /// for `max_distance` means applicable at any distance.
    pub fn gmm_model(
        mut self,
        gmm: Gmm,
        model: Arc<dyn GroundMotionModeling>,
        weight: f64,
        max_distance: Option<f64>,
    ) -> Self {
        self.entries.push(GmmEntry {
            gmm,
            model,
            weight,
            max_distance: max_distance.unwrap_or(f64::INFINITY),
        });
        self
    }

    /// Finalize the set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the set is empty, a GMM appears
    /// twice, a weight is not in (0, 1], or weights do not sum to one.
    pub fn build(self) -> Result<GmmSet, HazardError> {
        if self.entries.is_empty() {
            return Err(HazardError::config("a GmmSet requires at least one GMM"));
        }
        let mut seen: DenseMap<Gmm, ()> = DenseMap::new();
        let mut total = 0.0;
        for entry in &self.entries {
            if seen.insert(entry.gmm, ()).is_some() {
                return Err(HazardError::config(format!(
                    "GMM `{}` listed more than once",
                    entry.gmm.name()
                )));
            }
            if !(entry.weight > 0.0 && entry.weight <= 1.0) {
                return Err(HazardError::config(format!(
                    "GMM `{}` weight {} outside (0, 1]",
                    entry.gmm.name(),
                    entry.weight
                )));
            }
            total += entry.weight;
        }
        if !approx_equal(total, 1.0, 1e-6) {
            return Err(HazardError::config(format!(
                "GMM weights sum to {total}, expected 1"
            )));
        }
        Ok(GmmSet {
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    impl GroundMotionModeling for Constant {
        fn supports(&self, _imt: Imt) -> bool {
            true
        }

        fn calc(&self, _input: &GmmInput, _imt: Imt) -> ScalarGroundMotion {
            ScalarGroundMotion::new(0.0, 0.6)
        }
    }

    fn two_gmm_set() -> GmmSet {
        GmmSet::builder()
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Constant), 0.6, None)
            .gmm_model(Gmm::Mf2013Interplate, Arc::new(Constant), 0.4, Some(100.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_weight_map_normalized_near() {
        let map = two_gmm_set().gmm_weight_map(30.0);
        assert_eq!(map.len(), 2);
        assert!(approx_equal(*map.get(Gmm::Mf2013Crustal).unwrap(), 0.6, 1e-12));
        assert!(approx_equal(
            *map.get(Gmm::Mf2013Interplate).unwrap(),
            0.4,
            1e-12
        ));
        let sum: f64 = map.values().sum();
        assert!(approx_equal(sum, 1.0, 1e-12));
    }

    #[test]
    fn test_weight_map_drops_capped_entry_and_renormalizes() {
        let map = two_gmm_set().gmm_weight_map(200.0);
        assert_eq!(map.len(), 1);
        assert!(approx_equal(*map.get(Gmm::Mf2013Crustal).unwrap(), 1.0, 1e-12));
    }

    #[test]
    fn test_builder_rejects_bad_weights() {
        let err = GmmSet::builder()
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Constant), 0.6, None)
            .build()
            .unwrap_err();
        assert!(matches!(err, HazardError::Config(_)));

        let err = GmmSet::builder()
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Constant), 0.5, None)
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Constant), 0.5, None)
            .build()
            .unwrap_err();
        assert!(matches!(err, HazardError::Config(_)));
    }
}
