//! Numerical constants and small helpers shared across the pipeline.

/// Acceleration of gravity at the Earth's surface, m/s²; anchors the
/// cm/s²-to-g unit conversions of the GMPE implementations.
pub const G_GLOBAL: f64 = 9.81;

/// Conversion factor from cm/s² to units of g.
pub const CMS2_PER_G: f64 = 100.0 * G_GLOBAL;

/// Default depth (in meters) to the deep sedimentary layer used by GMPE
/// basin corrections when a site does not supply one.
pub const DL: f64 = 250.;

/// Sentinel for a site depth parameter (`z1p0`, `z2p5`) that is not known.
///
/// Ground motion models are expected to recognize the sentinel and fall
/// back to their default basin terms.
pub const MISSING_DEPTH: f64 = f64::NAN;

/// Check whether a depth parameter carries the "missing" sentinel.
pub fn is_missing_depth(value: f64) -> bool {
    value.is_nan()
}

/// Whether two floating-point values agree to within an absolute
/// tolerance.
///
/// Exceedance curves are long sums of small annual rates, so comparing
/// them against closed-form expectations with `==` is hopeless; tests
/// and validation code state the tolerance they accept instead.
///
/// # Examples
///
/// ```
/// use hazard_curve_lib::auxilary::approx_equal;
/// assert!(approx_equal(4.99e-4, 5.00e-4, 2e-6));
/// assert!(!approx_equal(4.99e-4, 5.00e-4, 1e-7));
/// ```
pub fn approx_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Round a value to a fixed number of decimal digits.
///
/// Used when summarizing ground motion levels for display, where a
/// hazard map cell does not need fifteen significant digits.
///
/// # Examples
///
/// ```
/// use hazard_curve_lib::auxilary::round_to_places;
/// assert_eq!(round_to_places(6.049647, 2), 6.05);
/// ```
pub fn round_to_places(val: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (val * factor).round() / factor
}

/// Clamp a probability to the closed interval [0, 1].
///
/// Double-precision rounding in the bounded renormalization of truncated
/// exceedance models may push results a few ulps outside the interval.
pub fn clip01(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_equal_at_annual_rate_scale() {
        // Rates a hazard curve actually carries: ~1e-4 per year.
        assert!(approx_equal(1.4999e-4, 1.5e-4, 1e-7));
        assert!(!approx_equal(1.4e-4, 1.5e-4, 1e-7));
    }

    #[test]
    fn test_approx_equal_is_strict_under_tiny_epsilon() {
        assert!(approx_equal(0.75, 0.75, 1e-15));
        assert!(!approx_equal(0.75, 0.7500001, 1e-15));
    }

    #[test]
    fn test_round_to_places() {
        // A PGA level in g and a PGV level in cm/s.
        assert_eq!(round_to_places(0.53278, 3), 0.533);
        assert_eq!(round_to_places(92.847, 1), 92.8);
        assert_eq!(round_to_places(-0.0826, 2), -0.08);
        assert_eq!(round_to_places(501.0, 0), 501.0);
    }

    #[test]
    fn test_clip01() {
        assert_eq!(clip01(-1e-17), 0.0);
        assert_eq!(clip01(1.0 + 1e-15), 1.0);
        assert_eq!(clip01(0.5), 0.5);
    }

    #[test]
    fn test_missing_depth_sentinel() {
        assert!(is_missing_depth(MISSING_DEPTH));
        assert!(!is_missing_depth(1.5));
    }
}
