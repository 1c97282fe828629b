//! Rupture-to-predictor transformation.
//!
//! The first pipeline stage flattens a source into [`HazardInputs`]: one
//! [`TemporalGmmInput`] per rupture, carrying the annual occurrence rate
//! next to the full predictor vector, plus a cached minimum Joyner-Boore
//! distance used downstream for distance-dependent GMM weighting.

use crate::errors::HazardError;
use crate::gmm::GmmInput;
use crate::site::Site;
use crate::source::{Rupture, Source};

/// A predictor vector paired with the annual rate of its rupture.
#[derive(Debug, Clone, Copy)]
pub struct TemporalGmmInput {
    /// Occurrence rate of the underlying rupture, events per year.
    pub rate: f64,
    /// Rupture and site predictors.
    pub input: GmmInput,
}

impl AsRef<GmmInput> for TemporalGmmInput {
    fn as_ref(&self) -> &GmmInput {
        &self.input
    }
}

/// The ordered GMM inputs of a single source.
///
/// The list length equals the number of ruptures enumerated from the
/// source; an empty list is a valid no-op, not an error.
#[derive(Debug, Clone)]
pub struct HazardInputs {
    source_name: String,
    inputs: Vec<TemporalGmmInput>,
    min_distance: f64,
}

impl HazardInputs {
    /// Name of the parent source.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The per-rupture entries, in rupture-enumeration order.
    pub fn entries(&self) -> &[TemporalGmmInput] {
        &self.inputs
    }

    /// Minimum Joyner-Boore distance across all entries, km.
    ///
    /// Infinite when the source produced no ruptures.
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the source produced no ruptures.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Build the predictor vector for one rupture at one site.
pub(crate) fn build_gmm_input(
    rupture: &Rupture,
    site: &Site,
    source_name: &str,
) -> Result<GmmInput, HazardError> {
    let surface = rupture.surface.as_ref();
    let distances = surface.distance_to(&site.location);
    let dip = surface.dip();
    let width = surface.width();
    let z_top = surface.depth();
    if !(distances.r_jb.is_finite() && distances.r_rup.is_finite() && distances.r_x.is_finite()) {
        return Err(HazardError::data(format!(
            "source `{source_name}` produced non-finite distances at M{}",
            rupture.mag
        )));
    }
    if !(dip.is_finite() && width.is_finite() && z_top.is_finite()) {
        return Err(HazardError::data(format!(
            "source `{source_name}` produced non-finite geometry at M{}",
            rupture.mag
        )));
    }
    let z_hyp = z_top + dip.to_radians().sin() * width / 2.0;
    Ok(GmmInput {
        mw: rupture.mag,
        r_jb: distances.r_jb,
        r_rup: distances.r_rup,
        r_x: distances.r_x,
        dip,
        width,
        z_top,
        z_hyp,
        rake: rupture.rake,
        vs30: site.vs30,
        vs_inferred: site.vs_inferred,
        z2p5: site.z2p5,
        z1p0: site.z1p0,
    })
}

/// Transform a source into its ordered GMM inputs for a site.
///
/// # Errors
///
/// Data errors when rupture geometry yields non-finite values.
pub fn source_to_inputs(source: &Source, site: &Site) -> Result<HazardInputs, HazardError> {
    let mut inputs = Vec::with_capacity(source.len());
    let mut min_distance = f64::INFINITY;
    for rupture in source.ruptures() {
        let input = build_gmm_input(rupture, site, source.name())?;
        min_distance = min_distance.min(input.r_jb);
        inputs.push(TemporalGmmInput {
            rate: rupture.rate,
            input,
        });
    }
    Ok(HazardInputs {
        source_name: source.name().to_string(),
        inputs,
        min_distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auxilary::approx_equal;
    use crate::site::Location;
    use crate::source::{Distances, FixedSurface};

    fn fixed_source(r_jbs: &[f64]) -> Source {
        let ruptures = r_jbs
            .iter()
            .map(|&r_jb| {
                Rupture::new(
                    1e-3,
                    6.5,
                    0.0,
                    Arc::new(FixedSurface {
                        distances: Distances {
                            r_jb,
                            r_rup: r_jb + 1.0,
                            r_x: r_jb,
                        },
                        dip: 30.0,
                        width: 12.0,
                        z_top: 2.0,
                    }),
                )
            })
            .collect();
        Source::new("fixture", Location::new(0.0, 0.0), ruptures)
    }

    #[test]
    fn test_inputs_mirror_rupture_enumeration() {
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        let inputs = source_to_inputs(&fixed_source(&[40.0, 15.0, 25.0]), &site).unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(approx_equal(inputs.min_distance(), 15.0, 1e-12));
        assert!(approx_equal(inputs.entries()[0].input.r_jb, 40.0, 1e-12));
    }

    #[test]
    fn test_z_hyp_derivation() {
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        let inputs = source_to_inputs(&fixed_source(&[10.0]), &site).unwrap();
        // z_top + sin(30°) * width / 2 = 2 + 0.5 * 6 = 5
        assert!(approx_equal(inputs.entries()[0].input.z_hyp, 5.0, 1e-12));
    }

    #[test]
    fn test_empty_source_is_a_no_op() {
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        let inputs = source_to_inputs(&fixed_source(&[]), &site).unwrap();
        assert!(inputs.is_empty());
        assert!(inputs.min_distance().is_infinite());
    }

    #[test]
    fn test_non_finite_geometry_is_a_data_error() {
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        let source = fixed_source(&[f64::NAN]);
        let err = source_to_inputs(&source, &site).unwrap_err();
        assert!(matches!(err, HazardError::Data(_)));
    }
}
