//! Curve consolidation.
//!
//! The fourth pipeline stage rolls the per-source curves of one source
//! set into a [`HazardCurveSet`]: GMM weights are looked up at each
//! source's minimum Joyner-Boore distance and applied into per-(IMT, GMM)
//! accumulators, and `total_curves` — summed over GMMs and scaled by the
//! source set's logic-tree weight — is finalized exactly once, at build
//! time. The final stage collects all curve sets into the immutable
//! [`HazardResult`].
//!
//! Accumulation happens in source-enumeration order, which keeps repeated
//! runs bit-exact regardless of task completion order.

use std::sync::Arc;

use crate::cluster::ClusterCurves;
use crate::config::CalcConfig;
use crate::curve::Curve;
use crate::curves::HazardCurves;
use crate::dense::DenseMap;
use crate::errors::HazardError;
use crate::gmm::Gmm;
use crate::imt::Imt;
use crate::source::{SourceSet, SourceType};

/// The retained per-source curves of a curve set, for downstream
/// analysis such as deaggregation.
pub enum SourceCurves {
    Fault(Vec<HazardCurves>),
    Cluster(Vec<ClusterCurves>),
}

/// The rollup of one source set.
pub struct HazardCurveSet {
    name: String,
    kind: SourceType,
    weight: f64,
    sources: SourceCurves,
    gmm_curves: DenseMap<Imt, DenseMap<Gmm, Curve>>,
    total_curves: DenseMap<Imt, Curve>,
}

impl std::fmt::Debug for HazardCurveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HazardCurveSet")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .finish()
    }
}

impl HazardCurveSet {
    /// Name of the source set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The structural family of the set.
    pub fn kind(&self) -> SourceType {
        self.kind
    }

    /// Logic-tree weight of the set.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The retained per-source curves.
    pub fn sources(&self) -> &SourceCurves {
        &self.sources
    }

    /// GMM-weighted (but not set-weighted) curves, indexed IMT → GMM.
    pub fn gmm_curves(&self) -> &DenseMap<Imt, DenseMap<Gmm, Curve>> {
        &self.gmm_curves
    }

    /// The GMM-weighted curve of one (IMT, GMM) cell.
    pub fn gmm_curve(&self, imt: Imt, gmm: Gmm) -> Option<&Curve> {
        self.gmm_curves.get(imt).and_then(|by_gmm| by_gmm.get(gmm))
    }

    /// Per-IMT totals: summed over GMMs and scaled by the set weight.
    pub fn total_curves(&self) -> &DenseMap<Imt, Curve> {
        &self.total_curves
    }

    /// The total curve for one IMT.
    pub fn total_curve(&self, imt: Imt) -> Option<&Curve> {
        self.total_curves.get(imt)
    }
}

/// Accumulating builder for [`HazardCurveSet`].
///
/// Owned by the consolidator's single task; building consumes it, so the
/// totals are finalized exactly once.
pub struct HazardCurveSetBuilder<'a> {
    source_set: &'a SourceSet,
    gmm_curves: DenseMap<Imt, DenseMap<Gmm, Curve>>,
    sources: SourceCurves,
}

impl<'a> HazardCurveSetBuilder<'a> {
    /// Start a builder with zeroed accumulators for every requested IMT
    /// and every GMM of the set.
    pub fn new(source_set: &'a SourceSet, config: &CalcConfig) -> Self {
        let mut gmm_curves = DenseMap::new();
        for &imt in config.imts() {
            if let Some(xs) = config.model_curve(imt) {
                let mut by_gmm = DenseMap::new();
                for gmm in source_set.gmm_set().gmms() {
                    by_gmm.insert(gmm, Curve::zeroed(Arc::clone(xs)));
                }
                gmm_curves.insert(imt, by_gmm);
            }
        }
        let sources = match source_set.kind() {
            SourceType::Cluster => SourceCurves::Cluster(Vec::new()),
            _ => SourceCurves::Fault(Vec::new()),
        };
        Self {
            source_set,
            gmm_curves,
            sources,
        }
    }

    /// Accumulate one ordinary source's curves.
    ///
    /// GMM weights come from the set's weight map at the source's minimum
    /// distance; GMMs absent from the map are dropped.
    pub fn add_source(&mut self, curves: HazardCurves) -> Result<(), HazardError> {
        let SourceCurves::Fault(retained) = &mut self.sources else {
            return Err(HazardError::internal(
                "ordinary curves offered to a cluster consolidator",
            ));
        };
        let weights = self
            .source_set
            .gmm_set()
            .gmm_weight_map(curves.min_distance());
        accumulate_weighted(&mut self.gmm_curves, curves.curves(), &weights, 1.0)?;
        retained.push(curves);
        Ok(())
    }

    /// Accumulate one cluster's curves.
    ///
    /// The applied weight is the GMM weight at the cluster's minimum
    /// distance times the cluster's own logic-tree weight.
    pub fn add_cluster(&mut self, curves: ClusterCurves) -> Result<(), HazardError> {
        let SourceCurves::Cluster(retained) = &mut self.sources else {
            return Err(HazardError::internal(
                "cluster curves offered to an ordinary consolidator",
            ));
        };
        let weights = self
            .source_set
            .gmm_set()
            .gmm_weight_map(curves.min_distance());
        accumulate_weighted(
            &mut self.gmm_curves,
            curves.curves(),
            &weights,
            curves.cluster_weight(),
        )?;
        retained.push(curves);
        Ok(())
    }

    /// Finalize the curve set, computing the set-weighted totals.
    pub fn build(self) -> Result<HazardCurveSet, HazardError> {
        let weight = self.source_set.weight();
        let mut total_curves = DenseMap::new();
        for (imt, by_gmm) in self.gmm_curves.iter() {
            let mut total: Option<Curve> = None;
            for (_, curve) in by_gmm.iter() {
                match &mut total {
                    Some(t) => t.add(curve)?,
                    None => total = Some(curve.clone()),
                }
            }
            if let Some(mut total) = total {
                total.scale(weight);
                total_curves.insert(imt, total);
            }
        }
        Ok(HazardCurveSet {
            name: self.source_set.name().to_string(),
            kind: self.source_set.kind(),
            weight,
            sources: self.sources,
            gmm_curves: self.gmm_curves,
            total_curves,
        })
    }
}

fn accumulate_weighted(
    accumulators: &mut DenseMap<Imt, DenseMap<Gmm, Curve>>,
    curves: &DenseMap<Imt, DenseMap<Gmm, Curve>>,
    weights: &DenseMap<Gmm, f64>,
    scale: f64,
) -> Result<(), HazardError> {
    for (imt, by_gmm) in curves.iter() {
        let Some(acc_by_gmm) = accumulators.get_mut(imt) else {
            return Err(HazardError::internal(format!(
                "no accumulator registered for {imt}"
            )));
        };
        for (gmm, curve) in by_gmm.iter() {
            let Some(&weight) = weights.get(gmm) else {
                // GMM not applicable at this distance.
                continue;
            };
            let Some(acc) = acc_by_gmm.get_mut(gmm) else {
                return Err(HazardError::internal(format!(
                    "no accumulator registered for ({imt}, {})",
                    gmm.name()
                )));
            };
            acc.add_scaled(curve, weight * scale)?;
        }
    }
    Ok(())
}

/// The final result of a hazard calculation: the curve sets of the model
/// keyed by source type, with the union of model curves used.
#[derive(Debug)]
pub struct HazardResult {
    sets: DenseMap<SourceType, Vec<HazardCurveSet>>,
    model_curves: DenseMap<Imt, Arc<[f64]>>,
}

impl HazardResult {
    /// The curve sets of one source type, in model-enumeration order.
    pub fn curve_sets(&self, kind: SourceType) -> &[HazardCurveSet] {
        self.sets.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate (source type, curve sets) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SourceType, &[HazardCurveSet])> {
        self.sets.iter().map(|(kind, sets)| (kind, sets.as_slice()))
    }

    /// The model curves used by the calculation.
    pub fn model_curves(&self) -> &DenseMap<Imt, Arc<[f64]>> {
        &self.model_curves
    }

    /// Total number of curve sets.
    pub fn len(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }

    /// Whether the result holds no curve sets.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Downstream aggregation: the per-IMT sum of all set totals.
    ///
    /// Set weights were already applied when each set's totals were
    /// finalized, so this is a plain sum.
    pub fn total_curves(&self) -> Result<DenseMap<Imt, Curve>, HazardError> {
        let mut totals: DenseMap<Imt, Curve> = DenseMap::new();
        for set in self.sets.values().flatten() {
            for (imt, curve) in set.total_curves().iter() {
                match totals.get_mut(imt) {
                    Some(total) => total.add(curve)?,
                    None => {
                        totals.insert(imt, curve.clone());
                    }
                }
            }
        }
        Ok(totals)
    }
}

/// Collect per-set rollups into the final result.
pub(crate) fn consolidate_curve_sets(
    curve_sets: Vec<HazardCurveSet>,
    model_curves: DenseMap<Imt, Arc<[f64]>>,
) -> HazardResult {
    let mut sets: DenseMap<SourceType, Vec<HazardCurveSet>> = DenseMap::new();
    for set in curve_sets {
        match sets.get_mut(set.kind()) {
            Some(list) => list.push(set),
            None => {
                sets.insert(set.kind(), vec![set]);
            }
        }
    }
    HazardResult { sets, model_curves }
}
