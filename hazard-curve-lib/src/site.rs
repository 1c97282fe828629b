//! Geographic locations and sites of interest.
//!
//! A [`Site`] is the point a hazard curve is computed for, together with
//! the site-condition parameters consumed by ground motion models. Depth
//! parameters may carry the "missing" sentinel from
//! [`auxilary::MISSING_DEPTH`](crate::auxilary::MISSING_DEPTH); models are
//! expected to tolerate it.

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::auxilary::{MISSING_DEPTH, is_missing_depth};
use crate::errors::HazardError;

/// Allowed range of vs30, in m/s.
pub const VS30_RANGE: (f64, f64) = (150.0, 2000.0);

/// Allowed range of z1p0 (depth to a shear-wave velocity of 1.0 km/s), in km.
pub const Z1P0_RANGE: (f64, f64) = (0.0, 2.0);

/// Allowed range of z2p5 (depth to a shear-wave velocity of 2.5 km/s), in km.
pub const Z2P5_RANGE: (f64, f64) = (0.0, 5.0);

/// A geographic location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Longitude in decimal degrees. Example: `142.23567`
    pub lon: f64,
    /// Latitude in decimal degrees. Example: `50.35927`
    pub lat: f64,
}

impl Location {
    /// Create a new Location instance.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Haversine distance to another location, in kilometers.
    pub fn distance_to(&self, other: &Location) -> f64 {
        Haversine.distance(
            Point::new(self.lon, self.lat),
            Point::new(other.lon, other.lat),
        ) / 1000.
    }
}

/// The site a hazard curve is computed for.
#[derive(Debug, Clone, Copy)]
pub struct Site {
    /// Site location.
    pub location: Location,
    /// Average shear-wave velocity (m/s) in the top 30 meters of soil.
    pub vs30: f64,
    /// Whether `vs30` was inferred rather than measured.
    pub vs_inferred: bool,
    /// Depth to a shear-wave velocity of 1.0 km/s, in km. May be missing.
    pub z1p0: f64,
    /// Depth to a shear-wave velocity of 2.5 km/s, in km. May be missing.
    pub z2p5: f64,
}

impl Site {
    /// Create a site with the given location and vs30; depth parameters
    /// default to the missing sentinel and `vs30` is flagged as inferred.
    pub fn new(location: Location, vs30: f64) -> Self {
        Self {
            location,
            vs30,
            vs_inferred: true,
            z1p0: MISSING_DEPTH,
            z2p5: MISSING_DEPTH,
        }
    }

    /// Set `z1p0`, in km.
    pub fn with_z1p0(mut self, z1p0: f64) -> Self {
        self.z1p0 = z1p0;
        self
    }

    /// Set `z2p5`, in km.
    pub fn with_z2p5(mut self, z2p5: f64) -> Self {
        self.z2p5 = z2p5;
        self
    }

    /// Flag `vs30` as measured.
    pub fn with_measured_vs30(mut self) -> Self {
        self.vs_inferred = false;
        self
    }

    /// Validate site parameters against their published ranges.
    ///
    /// Depth parameters carrying the missing sentinel are accepted.
    pub fn validate(&self) -> Result<(), HazardError> {
        check_range("vs30", self.vs30, VS30_RANGE, false)?;
        check_range("z1p0", self.z1p0, Z1P0_RANGE, true)?;
        check_range("z2p5", self.z2p5, Z2P5_RANGE, true)?;
        if !self.location.lon.is_finite() || !self.location.lat.is_finite() {
            return Err(HazardError::config("site location must be finite"));
        }
        Ok(())
    }
}

fn check_range(
    name: &str,
    value: f64,
    (lo, hi): (f64, f64),
    missing_ok: bool,
) -> Result<(), HazardError> {
    if missing_ok && is_missing_depth(value) {
        return Ok(());
    }
    if !(value >= lo && value <= hi) {
        return Err(HazardError::config(format!(
            "{name} = {value} outside allowed range [{lo}, {hi}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxilary::approx_equal;

    #[test]
    fn test_distance_to_self_is_zero() {
        let loc = Location::new(142.5, 50.0);
        assert!(approx_equal(loc.distance_to(&loc), 0.0, 1e-9));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Location::new(142.5, 50.0);
        let b = Location::new(143.0, 50.5);
        assert!(approx_equal(
            a.distance_to(&b),
            b.distance_to(&a),
            1e-9
        ));
    }

    #[test]
    fn test_site_defaults() {
        let site = Site::new(Location::new(0.0, 0.0), 760.0);
        assert!(site.vs_inferred);
        assert!(site.z1p0.is_nan());
        assert!(site.validate().is_ok());
    }

    #[test]
    fn test_site_validation_rejects_out_of_range() {
        let site = Site::new(Location::new(0.0, 0.0), 100.0);
        assert!(matches!(site.validate(), Err(HazardError::Config(_))));

        let site = Site::new(Location::new(0.0, 0.0), 760.0).with_z1p0(3.0);
        assert!(matches!(site.validate(), Err(HazardError::Config(_))));

        let site = Site::new(Location::new(0.0, 0.0), 760.0).with_z2p5(4.9);
        assert!(site.validate().is_ok());
    }
}
