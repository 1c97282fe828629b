//! Cluster-source pipeline branch.
//!
//! A cluster is a set of faults believed to rupture jointly. Each
//! constituent fault may carry several magnitude variants; a variant's
//! relative weight lives on [`ClusterRuptureInput::weight`], a field of
//! its own — distinct from the annual `rate` of ordinary ruptures, which
//! for a cluster lives on the cluster source itself.
//!
//! Per (IMT, GMM), the branch first collapses each fault's magnitude
//! variants into a weighted expected-exceedance curve, then combines the
//! per-fault curves with inclusion-exclusion over independent faults,
//! `P = 1 − ∏(1 − P_f)`, and finally scales by the cluster's annual rate.

use crate::config::CalcConfig;
use crate::curve::Curve;
use crate::curves::accumulate_tensor_curves;
use crate::dense::DenseMap;
use crate::errors::HazardError;
use crate::gmm::{Gmm, GmmInput, GmmSet};
use crate::ground_motions::{MotionTensors, compute_tensors};
use crate::imt::Imt;
use crate::inputs::build_gmm_input;
use crate::site::Site;
use crate::source::ClusterSource;

/// A predictor vector paired with the weight of its magnitude variant.
#[derive(Debug, Clone, Copy)]
pub struct ClusterRuptureInput {
    /// Relative weight of this magnitude variant within its fault.
    pub weight: f64,
    /// Rupture and site predictors.
    pub input: GmmInput,
}

impl AsRef<GmmInput> for ClusterRuptureInput {
    fn as_ref(&self) -> &GmmInput {
        &self.input
    }
}

/// The magnitude-variant inputs of one constituent fault.
#[derive(Debug, Clone)]
pub struct ClusterFaultInputs {
    fault_name: String,
    variants: Vec<ClusterRuptureInput>,
}

impl ClusterFaultInputs {
    /// Name of the fault.
    pub fn fault_name(&self) -> &str {
        &self.fault_name
    }

    /// The magnitude variants, in enumeration order.
    pub fn variants(&self) -> &[ClusterRuptureInput] {
        &self.variants
    }
}

/// The inputs of a cluster source: one entry per constituent fault.
pub struct ClusterInputs {
    cluster_name: String,
    rate: f64,
    weight: f64,
    min_distance: f64,
    faults: Vec<ClusterFaultInputs>,
}

impl ClusterInputs {
    /// Name of the cluster.
    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Annual rate of the joint rupture event.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Logic-tree weight of the cluster.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Minimum Joyner-Boore distance over all variants of all faults, km.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// The per-fault inputs; list length equals the number of faults.
    pub fn faults(&self) -> &[ClusterFaultInputs] {
        &self.faults
    }
}

/// Transform a cluster source into its per-fault GMM inputs for a site.
pub fn cluster_to_inputs(
    cluster: &ClusterSource,
    site: &Site,
) -> Result<ClusterInputs, HazardError> {
    let mut faults = Vec::with_capacity(cluster.faults().len());
    let mut min_distance = f64::INFINITY;
    for fault in cluster.faults() {
        let mut variants = Vec::with_capacity(fault.len());
        for rupture in fault.ruptures() {
            let input = build_gmm_input(rupture, site, fault.name())?;
            min_distance = min_distance.min(input.r_jb);
            variants.push(ClusterRuptureInput {
                weight: rupture.rate,
                input,
            });
        }
        faults.push(ClusterFaultInputs {
            fault_name: fault.name().to_string(),
            variants,
        });
    }
    Ok(ClusterInputs {
        cluster_name: cluster.name().to_string(),
        rate: cluster.rate(),
        weight: cluster.weight(),
        min_distance,
        faults,
    })
}

/// The ground motions of one constituent fault.
pub struct ClusterFaultGroundMotions {
    inputs: ClusterFaultInputs,
    tensors: MotionTensors,
}

impl ClusterFaultGroundMotions {
    /// The inputs these motions were computed from.
    pub fn inputs(&self) -> &ClusterFaultInputs {
        &self.inputs
    }

    /// The motion tensors.
    pub fn tensors(&self) -> &MotionTensors {
        &self.tensors
    }
}

/// The ground motions of a cluster source, mirroring the shape of its
/// inputs.
pub struct ClusterGroundMotions {
    cluster_name: String,
    rate: f64,
    weight: f64,
    min_distance: f64,
    faults: Vec<ClusterFaultGroundMotions>,
}

impl ClusterGroundMotions {
    /// Name of the cluster.
    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    /// Annual rate of the joint rupture event.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Logic-tree weight of the cluster.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Minimum Joyner-Boore distance over all faults, km.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// The per-fault ground motions.
    pub fn faults(&self) -> &[ClusterFaultGroundMotions] {
        &self.faults
    }
}

/// Transform cluster inputs into per-fault ground motion tensors.
pub fn cluster_inputs_to_ground_motions(
    inputs: ClusterInputs,
    gmm_set: &GmmSet,
    imts: &[Imt],
) -> Result<ClusterGroundMotions, HazardError> {
    let ClusterInputs {
        cluster_name,
        rate,
        weight,
        min_distance,
        faults,
    } = inputs;
    let mut fault_motions = Vec::with_capacity(faults.len());
    for fault in faults {
        let context = format!("cluster `{cluster_name}` fault `{}`", fault.fault_name());
        let tensors = compute_tensors(fault.variants(), gmm_set, imts, &context)?;
        fault_motions.push(ClusterFaultGroundMotions {
            inputs: fault,
            tensors,
        });
    }
    Ok(ClusterGroundMotions {
        cluster_name,
        rate,
        weight,
        min_distance,
        faults: fault_motions,
    })
}

/// The joint exceedance curves of a cluster source, already scaled by the
/// cluster's annual rate.
pub struct ClusterCurves {
    ground_motions: ClusterGroundMotions,
    curves: DenseMap<Imt, DenseMap<Gmm, Curve>>,
}

impl ClusterCurves {
    /// The ground motions these curves were computed from.
    pub fn ground_motions(&self) -> &ClusterGroundMotions {
        &self.ground_motions
    }

    /// Minimum Joyner-Boore distance of the cluster, km.
    pub fn min_distance(&self) -> f64 {
        self.ground_motions.min_distance()
    }

    /// Logic-tree weight of the cluster.
    pub fn cluster_weight(&self) -> f64 {
        self.ground_motions.weight()
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

/// Pointwise joint exceedance over independent per-fault curves:
/// `1 − ∏(1 − p_f)` at each ground motion level.
pub fn cluster_exceed_prob(fault_curves: &[Curve]) -> Result<Curve, HazardError> {
    let Some(first) = fault_curves.first() else {
        return Err(HazardError::internal(
            "joint exceedance of an empty fault set",
        ));
    };
    let mut ys = vec![1.0; first.len()];
    for curve in fault_curves {
        if curve.len() != first.len() {
            return Err(HazardError::internal(
                "per-fault curves disagree on grid shape",
            ));
        }
        for (y, p) in ys.iter_mut().zip(curve.ys()) {
            *y *= 1.0 - p;
        }
    }
    for y in &mut ys {
        *y = 1.0 - *y;
    }
    Curve::new(first.xs_shared(), ys)
}

/// Transform cluster ground motions into joint exceedance curves.
///
/// Per (IMT, GMM): collapse each fault's magnitude variants into a
/// weighted expected-exceedance curve, combine the per-fault curves with
/// inclusion-exclusion, and scale by the cluster's annual rate.
pub fn cluster_ground_motions_to_curves(
    ground_motions: ClusterGroundMotions,
    config: &CalcConfig,
) -> Result<ClusterCurves, HazardError> {
    let mut per_fault: DenseMap<Imt, DenseMap<Gmm, Vec<Curve>>> = DenseMap::new();
    for fault in ground_motions.faults() {
        let weights: Vec<f64> = fault.inputs().variants().iter().map(|v| v.weight).collect();
        let fault_curves = accumulate_tensor_curves(fault.tensors(), &weights, config)?;
        for (imt, by_gmm) in fault_curves.iter() {
            for (gmm, curve) in by_gmm.iter() {
                per_fault
                    .get_or_insert_with(imt, DenseMap::new)
                    .get_or_insert_with(gmm, Vec::new)
                    .push(curve.clone());
            }
        }
    }

    let rate = ground_motions.rate();
    let mut curves = DenseMap::new();
    for (imt, by_gmm) in per_fault.iter() {
        let mut imt_curves = DenseMap::new();
        for (gmm, fault_curves) in by_gmm.iter() {
            let mut joint = cluster_exceed_prob(fault_curves)?;
            joint.scale(rate);
            imt_curves.insert(gmm, joint);
        }
        curves.insert(imt, imt_curves);
    }
    Ok(ClusterCurves {
        ground_motions,
        curves,
    })
}
