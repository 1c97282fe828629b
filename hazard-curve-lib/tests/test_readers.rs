use std::error::Error;

use hazard_curve_lib::auxilary::{approx_equal, is_missing_depth};
use hazard_curve_lib::readers::read_sites;

const EPSILON: f64 = 1e-6;
const CSV_DELIMETER: u8 = b'\t';
const SITES_FILE: &str = "tests/data/test_sites.txt";

#[test]
fn test_read_sites_with_mixed_depth_columns() -> Result<(), Box<dyn Error>> {
    let sites = read_sites(SITES_FILE, CSV_DELIMETER)?;
    assert_eq!(sites.len(), 3);

    let mut lon: f64 = 0.;
    let mut lat: f64 = 0.;
    let mut vs30: f64 = 0.;
    for site in &sites {
        lon += site.location.lon;
        lat += site.location.lat;
        vs30 += site.vs30;
    }
    assert!(approx_equal(lon, 428.1, EPSILON));
    assert!(approx_equal(lat, 151.6, EPSILON));
    assert!(approx_equal(vs30, 1610., EPSILON));

    // The first row has no depth columns; the rest carry both.
    assert!(is_missing_depth(sites[0].z1p0));
    assert!(is_missing_depth(sites[0].z2p5));
    let mut z1p0: f64 = 0.;
    for site in &sites[1..] {
        match is_missing_depth(site.z1p0) {
            true => return Err("that value should not be parsed as missing".into()),
            false => z1p0 += site.z1p0,
        }
    }
    assert!(approx_equal(z1p0, 0.65, EPSILON));

    Ok(())
}

#[test]
fn test_read_sites_are_valid() -> Result<(), Box<dyn Error>> {
    let sites = read_sites(SITES_FILE, CSV_DELIMETER)?;
    for site in &sites {
        site.validate()?;
    }
    Ok(())
}
