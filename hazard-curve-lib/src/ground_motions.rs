//! Predictor-to-ground-motion transformation.
//!
//! The second pipeline stage evaluates every applicable (GMM, IMT) pair
//! over a source's inputs, producing two parallel tensors of means and
//! sigmas whose rupture axis matches the input list entry-wise. The
//! tensors are filled through a count-checked builder: a cell that does
//! not hold exactly one value per rupture is a contract violation.

use crate::dense::DenseMap;
use crate::errors::HazardError;
use crate::gmm::{Gmm, GmmInput, GmmSet, ScalarGroundMotion};
use crate::imt::Imt;
use crate::inputs::HazardInputs;

/// Parallel mean/sigma vectors for one (IMT, GMM) cell, indexed by
/// rupture.
#[derive(Debug, Clone, Default)]
pub struct GroundMotions {
    pub means: Vec<f64>,
    pub sigmas: Vec<f64>,
}

/// Tensors of ground motions indexed IMT → GMM → rupture.
pub type MotionTensors = DenseMap<Imt, DenseMap<Gmm, GroundMotions>>;

/// The ground motions of a single ordinary source.
pub struct HazardGroundMotions {
    inputs: HazardInputs,
    tensors: MotionTensors,
}

impl HazardGroundMotions {
    /// The inputs these motions were computed from.
    pub fn inputs(&self) -> &HazardInputs {
        &self.inputs
    }

    /// Minimum Joyner-Boore distance of the parent source, km.
    pub fn min_distance(&self) -> f64 {
        self.inputs.min_distance()
    }

    /// The motion tensors.
    pub fn tensors(&self) -> &MotionTensors {
        &self.tensors
    }

    /// The motions of one (IMT, GMM) cell, if the pair was applicable.
    pub fn motions(&self, imt: Imt, gmm: Gmm) -> Option<&GroundMotions> {
        self.tensors.get(imt).and_then(|by_gmm| by_gmm.get(gmm))
    }
}

/// Count-checked builder for motion tensors.
///
/// Owned by exactly one task; finalization consumes the builder, so a
/// second finalization is unrepresentable. An incomplete fill is an
/// internal error.
pub struct MotionTensorsBuilder {
    expected: usize,
    tensors: MotionTensors,
}

impl MotionTensorsBuilder {
    /// Start a builder expecting `expected` values per (IMT, GMM) cell.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            tensors: DenseMap::new(),
        }
    }

    /// Append a ground motion to the (imt, gmm) cell.
    pub fn add(&mut self, imt: Imt, gmm: Gmm, gm: ScalarGroundMotion) {
        let expected = self.expected;
        let cell = self
            .tensors
            .get_or_insert_with(imt, DenseMap::new)
            .get_or_insert_with(gmm, || GroundMotions {
                means: Vec::with_capacity(expected),
                sigmas: Vec::with_capacity(expected),
            });
        cell.means.push(gm.mean);
        cell.sigmas.push(gm.sigma);
    }

    /// Finalize the tensors, verifying every cell is completely filled.
    pub fn build(self) -> Result<MotionTensors, HazardError> {
        for (imt, by_gmm) in self.tensors.iter() {
            for (gmm, cell) in by_gmm.iter() {
                if cell.means.len() != self.expected || cell.sigmas.len() != self.expected {
                    return Err(HazardError::internal(format!(
                        "ground motion cell ({imt}, {}) holds {} of {} values",
                        gmm.name(),
                        cell.means.len(),
                        self.expected
                    )));
                }
            }
        }
        Ok(self.tensors)
    }
}

/// Evaluate every applicable (GMM, IMT) pair over a list of predictor
/// vectors.
///
/// GMMs that do not support an IMT are filtered out before evaluation.
/// Shared by the ordinary and cluster branches, whose list element types
/// differ only in the meaning of their scaling field.
pub(crate) fn compute_tensors<T: AsRef<GmmInput>>(
    items: &[T],
    gmm_set: &GmmSet,
    imts: &[Imt],
    context: &str,
) -> Result<MotionTensors, HazardError> {
    let mut builder = MotionTensorsBuilder::new(items.len());
    for (gmm, model) in gmm_set.models() {
        for &imt in imts {
            if !model.supports(imt) {
                continue;
            }
            for item in items {
                let gm = model.calc(item.as_ref(), imt);
                if !(gm.mean.is_finite() && gm.sigma.is_finite()) {
                    return Err(HazardError::data(format!(
                        "{} returned a non-finite motion for {imt} in {context}",
                        gmm.name()
                    )));
                }
                builder.add(imt, gmm, gm);
            }
        }
    }
    builder.build()
}

/// Transform a source's inputs into its ground motion tensors.
///
/// # Errors
///
/// Data errors when a model returns a non-finite mean or sigma.
pub fn inputs_to_ground_motions(
    inputs: HazardInputs,
    gmm_set: &GmmSet,
    imts: &[Imt],
) -> Result<HazardGroundMotions, HazardError> {
    let context = format!("source `{}`", inputs.source_name());
    let tensors = compute_tensors(inputs.entries(), gmm_set, imts, &context)?;
    Ok(HazardGroundMotions { inputs, tensors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::gmm::GroundMotionModeling;

    struct Fixed(f64, f64);

    impl GroundMotionModeling for Fixed {
        fn supports(&self, imt: Imt) -> bool {
            imt != Imt::Pgv
        }

        fn calc(&self, _input: &GmmInput, _imt: Imt) -> ScalarGroundMotion {
            ScalarGroundMotion::new(self.0, self.1)
        }
    }

    fn any_input() -> GmmInput {
        GmmInput {
            mw: 6.0,
            r_jb: 20.0,
            r_rup: 20.0,
            r_x: 20.0,
            dip: 90.0,
            width: 10.0,
            z_top: 0.0,
            z_hyp: 5.0,
            rake: 0.0,
            vs30: 760.0,
            vs_inferred: true,
            z2p5: f64::NAN,
            z1p0: f64::NAN,
        }
    }

    struct Item(GmmInput);

    impl AsRef<GmmInput> for Item {
        fn as_ref(&self) -> &GmmInput {
            &self.0
        }
    }

    #[test]
    fn test_unsupported_imt_cells_are_absent() {
        let set = GmmSet::builder()
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Fixed(0.0, 0.6)), 1.0, None)
            .build()
            .unwrap();
        let items = vec![Item(any_input()), Item(any_input())];
        let tensors =
            compute_tensors(&items, &set, &[Imt::Pga, Imt::Pgv], "test").unwrap();
        let pga = tensors.get(Imt::Pga).and_then(|m| m.get(Gmm::Mf2013Crustal));
        assert_eq!(pga.unwrap().means.len(), 2);
        assert!(tensors.get(Imt::Pgv).is_none());
    }

    #[test]
    fn test_non_finite_motion_is_a_data_error() {
        let set = GmmSet::builder()
            .gmm_model(
                Gmm::Mf2013Crustal,
                Arc::new(Fixed(f64::NAN, 0.6)),
                1.0,
                None,
            )
            .build()
            .unwrap();
        let items = vec![Item(any_input())];
        let err = compute_tensors(&items, &set, &[Imt::Pga], "test").unwrap_err();
        assert!(matches!(err, HazardError::Data(_)));
    }

    #[test]
    fn test_builder_count_check() {
        let mut builder = MotionTensorsBuilder::new(2);
        builder.add(Imt::Pga, Gmm::Mf2013Crustal, ScalarGroundMotion::new(0.0, 0.5));
        let err = builder.build().unwrap_err();
        assert!(matches!(err, HazardError::Internal(_)));
    }

    #[test]
    fn test_empty_inputs_build_empty_tensors() {
        let set = GmmSet::builder()
            .gmm_model(Gmm::Mf2013Crustal, Arc::new(Fixed(0.0, 0.6)), 1.0, None)
            .build()
            .unwrap();
        let items: Vec<Item> = Vec::new();
        let tensors = compute_tensors(&items, &set, &[Imt::Pga], "test").unwrap();
        assert!(tensors.is_empty());
    }
}
