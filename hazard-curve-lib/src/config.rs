//! Calculation configuration.
//!
//! [`CalcConfig`] fixes, for one calculation: the IMTs of interest, the
//! exceedance (σ/truncation) model, the truncation level, and the model
//! curve (the x grid of ground motion levels) for each IMT. Natural-log
//! copies of the model curves are derived once at build time, since the
//! exceedance models operate in log ground-motion space.

use std::sync::Arc;

use crate::dense::DenseMap;
use crate::errors::HazardError;
use crate::exceedance::ExceedanceModel;
use crate::imt::Imt;

/// Default ground motion levels for PGA and SA curves, in g.
pub const DEFAULT_GM_LEVELS: [f64; 20] = [
    0.0025, 0.0045, 0.0075, 0.0113, 0.0169, 0.0253, 0.0380, 0.0570, 0.0854, 0.128, 0.192, 0.288,
    0.432, 0.649, 0.973, 1.46, 2.19, 3.28, 4.92, 7.38,
];

/// Default ground motion levels for PGV curves, in cm/s.
pub const DEFAULT_PGV_LEVELS: [f64; 20] = [
    0.0100, 0.0177, 0.0312, 0.0552, 0.0976, 0.173, 0.305, 0.539, 0.953, 1.68, 2.98, 5.26, 9.30,
    16.4, 29.1, 51.3, 90.8, 160.0, 284.0, 501.0,
];

/// Immutable configuration of one hazard calculation.
#[derive(Debug)]
pub struct CalcConfig {
    imts: Vec<Imt>,
    exceedance_model: ExceedanceModel,
    truncation_level: f64,
    model_curves: DenseMap<Imt, Arc<[f64]>>,
    log_model_curves: DenseMap<Imt, Arc<[f64]>>,
}

impl CalcConfig {
    /// Start building a configuration.
    pub fn builder() -> CalcConfigBuilder {
        CalcConfigBuilder {
            imts: Vec::new(),
            exceedance_model: ExceedanceModel::TruncationUpperOnly,
            truncation_level: 3.0,
            custom_curves: DenseMap::new(),
        }
    }

    /// The requested IMTs, in request order.
    pub fn imts(&self) -> &[Imt] {
        &self.imts
    }

    /// The configured exceedance model.
    pub fn exceedance_model(&self) -> ExceedanceModel {
        self.exceedance_model
    }

    /// Truncation level, in standard deviations.
    pub fn truncation_level(&self) -> f64 {
        self.truncation_level
    }

    /// The model curve x grid for `imt`, in linear ground-motion units.
    pub fn model_curve(&self, imt: Imt) -> Option<&Arc<[f64]>> {
        self.model_curves.get(imt)
    }

    /// The natural-log counterpart of the model curve for `imt`.
    pub fn log_model_curve(&self, imt: Imt) -> Option<&Arc<[f64]>> {
        self.log_model_curves.get(imt)
    }

    /// All configured model curves.
    pub fn model_curves(&self) -> &DenseMap<Imt, Arc<[f64]>> {
        &self.model_curves
    }
}

/// Builder for [`CalcConfig`].
pub struct CalcConfigBuilder {
    imts: Vec<Imt>,
    exceedance_model: ExceedanceModel,
    truncation_level: f64,
    custom_curves: DenseMap<Imt, Vec<f64>>,
}

impl CalcConfigBuilder {
    /// Request an IMT. Repeated requests are ignored.
    pub fn imt(mut self, imt: Imt) -> Self {
        if !self.imts.contains(&imt) {
            self.imts.push(imt);
        }
        self
    }

    /// Request several IMTs.
    pub fn imts(mut self, imts: impl IntoIterator<Item = Imt>) -> Self {
        for imt in imts {
            self = self.imt(imt);
        }
        self
    }

    /// Select the exceedance model. Defaults to
    /// [`ExceedanceModel::TruncationUpperOnly`].
    pub fn exceedance_model(mut self, model: ExceedanceModel) -> Self {
        self.exceedance_model = model;
        self
    }

    /// Set the truncation level, in standard deviations. Defaults to 3.
    pub fn truncation_level(mut self, n: f64) -> Self {
        self.truncation_level = n;
        self
    }

    /// Override the model curve for an IMT with explicit ground motion
    /// levels in linear units. IMTs without an override use the default
    /// grids.
    pub fn model_curve(mut self, imt: Imt, levels: Vec<f64>) -> Self {
        self.custom_curves.insert(imt, levels);
        self
    }

    /// Finalize the configuration.
    ///
    /// # Errors
    ///
    /// Configuration errors for an empty IMT set, a negative or non-finite
    /// truncation level, or a model curve that is empty or not strictly
    /// increasing over positive values.
    pub fn build(self) -> Result<CalcConfig, HazardError> {
        if self.imts.is_empty() {
            return Err(HazardError::config("at least one IMT must be requested"));
        }
        if !(self.truncation_level >= 0.0 && self.truncation_level.is_finite()) {
            return Err(HazardError::config(format!(
                "truncation level {} must be a nonnegative finite number",
                self.truncation_level
            )));
        }
        let mut custom_curves = self.custom_curves;
        let mut model_curves = DenseMap::new();
        let mut log_model_curves = DenseMap::new();
        for &imt in &self.imts {
            let levels = match custom_curves.get_mut(imt) {
                Some(levels) => std::mem::take(levels),
                None => default_levels(imt).to_vec(),
            };
            validate_levels(imt, &levels)?;
            let log_levels: Vec<f64> = levels.iter().map(|x| x.ln()).collect();
            model_curves.insert(imt, Arc::from(levels.into_boxed_slice()));
            log_model_curves.insert(imt, Arc::from(log_levels.into_boxed_slice()));
        }
        Ok(CalcConfig {
            imts: self.imts,
            exceedance_model: self.exceedance_model,
            truncation_level: self.truncation_level,
            model_curves,
            log_model_curves,
        })
    }
}

fn default_levels(imt: Imt) -> &'static [f64] {
    match imt {
        Imt::Pgv => &DEFAULT_PGV_LEVELS,
        _ => &DEFAULT_GM_LEVELS,
    }
}

fn validate_levels(imt: Imt, levels: &[f64]) -> Result<(), HazardError> {
    if levels.is_empty() {
        return Err(HazardError::config(format!(
            "model curve for {imt} is empty"
        )));
    }
    for pair in levels.windows(2) {
        if !(pair[1] > pair[0]) {
            return Err(HazardError::config(format!(
                "model curve for {imt} must be strictly increasing"
            )));
        }
    }
    if !levels.iter().all(|x| x.is_finite() && *x > 0.0) {
        return Err(HazardError::config(format!(
            "model curve for {imt} must hold positive finite values"
        )));
    }
    Ok(())
}
