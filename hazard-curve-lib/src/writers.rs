//! # Hazard Curve Output Writers
//!
//! Serializes computed hazard curves and level grids to delimited text
//! files, the lingua franca of downstream plotting scripts.
//!
//! ## Features
//!
//! - Serialize total hazard curves (per IMT) and uniform hazard level
//!   grids into delimited text.
//! - Delimiter is caller-chosen, matching the reader side.
//! - A header row names the columns.
//!
//! ## Example Output Format (tab-delimited)
//!
//! ```text
//! imt	ground_motion	annual_rate
//! PGA	0.0025	0.00094
//! PGA	0.0045	0.00089
//! ```

use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::consolidate::HazardResult;
use crate::vectorized::HazardLevelPoint;

#[derive(Debug, Serialize)]
struct CurveRecord {
    imt: String,
    ground_motion: f64,
    annual_rate: f64,
}

/// Writes the total hazard curves of a result to a delimited text file.
///
/// One row per (IMT, ground motion level) pair, with the aggregated
/// annual exceedance rate in the last column and a header row describing
/// the columns.
///
/// # Arguments
///
/// * `path` — The output file path.
/// * `delim` — Delimiter byte (e.g., `b','` for comma, `b'\t'` for tab).
/// * `result` — The hazard result to serialize.
///
/// # Errors
///
/// A boxed error when the file cannot be created or a record fails to
/// serialize.
pub fn write_total_curves<P: AsRef<Path>>(
    path: P,
    delim: u8,
    result: &HazardResult,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;

    let mut wtr = WriterBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .from_writer(file);

    for (imt, curve) in result.total_curves()?.iter() {
        for (x, y) in curve.points() {
            wtr.serialize(CurveRecord {
                imt: imt.to_string(),
                ground_motion: x,
                annual_rate: y,
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a uniform hazard level grid to a delimited text file.
///
/// One row per [`HazardLevelPoint`], after a header row naming the
/// columns; sites whose curve did not bracket the target rate produce
/// an empty level field.
///
/// # Arguments
///
/// * `path` — The output file path.
/// * `delim` — Delimiter byte (e.g., `b','` for comma, `b'\t'` for tab).
/// * `points` — The level grid to write.
///
/// # Errors
///
/// A boxed error when the file cannot be created or a point fails to
/// serialize.
pub fn write_hazard_level_points<P: AsRef<Path>>(
    path: P,
    delim: u8,
    points: &[HazardLevelPoint],
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;

    let mut wtr = WriterBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .from_writer(file);

    for point in points {
        wtr.serialize(point)?;
    }

    wtr.flush()?;
    Ok(())
}
