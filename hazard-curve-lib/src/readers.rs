//! # Site Input Readers
//!
//! Deserializes tabular site files — the grids hazard maps are computed
//! over — into [`Site`] instances ready for the calculation pipeline.
//!
//! ## Features
//!
//! - Load site locations and site conditions (longitude, latitude,
//!   vs30, and the optional basin depths z1p0 and z2p5).
//! - Delimiter is caller-chosen, so tab- and comma-separated grids both
//!   work.
//! - Input files carry no header row; short rows simply omit the depth
//!   columns.
//!
//! ## Example File Format (tab-delimited)
//!
//! ```text
//! 142.523 52.913  300 0.25    1.2
//! 142.600 50.100  350
//! ```
//!
//! Column order is fixed:
//!
//! 1. longitude, decimal degrees
//! 2. latitude, decimal degrees
//! 3. vs30, m/s
//! 4. z1p0, km (optional)
//! 5. z2p5, km (optional)
//!
//! ## Errors
//!
//! File I/O and row deserialization failures surface as boxed errors;
//! site-range validation is a separate, later step.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::auxilary::MISSING_DEPTH;
use crate::site::{Location, Site};

#[derive(Debug, Deserialize)]
struct SiteRecord {
    lon: f64,
    lat: f64,
    vs30: f64,
    #[serde(default)]
    z1p0: Option<f64>,
    #[serde(default)]
    z2p5: Option<f64>,
}

/// Reads the [`Site`]s of a headerless delimited text file.
///
/// Each row becomes one site; rows that stop after the vs30 column get
/// the missing-depth sentinel for `z1p0` and `z2p5`, which downstream
/// ground motion models know to default.
///
/// # Arguments
///
/// * `path` — Path to the input file.
/// * `delim` — Delimiter byte (e.g., `b'\t'` for tab, `b','` for comma).
///
/// # Example
///
/// ```rust
/// use hazard_curve_lib::readers::read_sites;
///
/// let sites = read_sites("tests/data/test_sites.txt", b'\t').unwrap();
/// println!("First site: {:?}", sites[0]);
/// ```
///
/// # Errors
///
/// A boxed error when the file cannot be opened or a row does not
/// deserialize into a site record.
pub fn read_sites<P: AsRef<Path>>(path: P, delim: u8) -> Result<Vec<Site>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut sites = Vec::new();

    for result in rdr.deserialize() {
        let record: SiteRecord = result?;
        sites.push(Site {
            location: Location::new(record.lon, record.lat),
            vs30: record.vs30,
            vs_inferred: true,
            z1p0: record.z1p0.unwrap_or(MISSING_DEPTH),
            z2p5: record.z2p5.unwrap_or(MISSING_DEPTH),
        });
    }

    Ok(sites)
}
