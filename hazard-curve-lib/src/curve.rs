//! Exceedance-curve sequences.
//!
//! A [`Curve`] pairs an immutable, shared x grid (ground motion levels)
//! with owned y values (annual exceedance rates). All curves produced for
//! one IMT share the x grid of the configured model curve, so accumulation
//! across ruptures, ground motion models, and sources reduces to pointwise
//! arithmetic over equal-length slices.

use std::sync::Arc;

use crate::errors::HazardError;

/// An x/y sequence with a shared immutable x grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    xs: Arc<[f64]>,
    ys: Vec<f64>,
}

impl Curve {
    /// Create a curve with the given x grid and all y values zero.
    pub fn zeroed(xs: Arc<[f64]>) -> Self {
        let ys = vec![0.0; xs.len()];
        Self { xs, ys }
    }

    /// Create a curve from matching x and y sequences.
    pub fn new(xs: Arc<[f64]>, ys: Vec<f64>) -> Result<Self, HazardError> {
        if xs.len() != ys.len() {
            return Err(HazardError::internal(format!(
                "curve shape mismatch: {} x-values, {} y-values",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self { xs, ys })
    }

    /// The shared x grid.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// A handle to the shared x grid.
    pub fn xs_shared(&self) -> Arc<[f64]> {
        Arc::clone(&self.xs)
    }

    /// The y values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Iterate (x, y) pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// The y value at the point whose x equals `x`, if the grid contains it.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.xs.iter().position(|&v| v == x).map(|i| self.ys[i])
    }

    /// Add another curve pointwise. Both curves must share a grid shape.
    pub fn add(&mut self, other: &Curve) -> Result<(), HazardError> {
        self.add_scaled(other, 1.0)
    }

    /// Add `scale * other` pointwise. Both curves must share a grid shape.
    pub fn add_scaled(&mut self, other: &Curve, scale: f64) -> Result<(), HazardError> {
        if self.len() != other.len() {
            return Err(HazardError::internal(format!(
                "cannot combine curves of {} and {} points",
                self.len(),
                other.len()
            )));
        }
        for (y, other_y) in self.ys.iter_mut().zip(other.ys.iter()) {
            *y += scale * other_y;
        }
        Ok(())
    }

    /// Add a raw y slice pointwise, scaled.
    pub(crate) fn add_scaled_ys(&mut self, ys: &[f64], scale: f64) -> Result<(), HazardError> {
        if self.len() != ys.len() {
            return Err(HazardError::internal(format!(
                "cannot accumulate {} values into a {}-point curve",
                ys.len(),
                self.len()
            )));
        }
        for (y, v) in self.ys.iter_mut().zip(ys.iter()) {
            *y += scale * v;
        }
        Ok(())
    }

    /// Multiply every y value by `scale`.
    pub fn scale(&mut self, scale: f64) {
        for y in &mut self.ys {
            *y *= scale;
        }
    }

    /// The ground motion level at which this exceedance curve crosses
    /// `rate`, by log-log interpolation between bracketing points.
    ///
    /// Returns `None` when `rate` lies outside the curve's range or the
    /// bracketing y values are not positive.
    pub fn ground_motion_at_rate(&self, rate: f64) -> Option<f64> {
        if rate <= 0.0 {
            return None;
        }
        for i in 0..self.len().saturating_sub(1) {
            let (y0, y1) = (self.ys[i], self.ys[i + 1]);
            if y0 == rate {
                return Some(self.xs[i]);
            }
            if y0 > rate && rate >= y1 && y1 > 0.0 {
                let t = (rate.ln() - y0.ln()) / (y1.ln() - y0.ln());
                let log_x = self.xs[i].ln() + t * (self.xs[i + 1].ln() - self.xs[i].ln());
                return Some(log_x.exp());
            }
        }
        None
    }
}
