//! Error taxonomy for the hazard calculation pipeline.
//!
//! Configuration problems are reported synchronously, before any
//! calculation task is scheduled. Data and internal errors are raised
//! inside tasks; the orchestrator surfaces the first one observed and
//! discards the rest. Nothing is retried, as the computation is
//! deterministic.

use thiserror::Error;

/// Errors produced by hazard curve calculations.
#[derive(Error, Debug)]
pub enum HazardError {
    /// Missing or out-of-range option values, unsupported IMTs, empty IMT
    /// sets, or model curves absent for a requested IMT. Raised before any
    /// task starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A rupture surface returned non-finite distances, or a ground motion
    /// model returned a non-finite mean or sigma. Fatal; aborts the run.
    #[error("data error: {0}")]
    Data(String),

    /// A builder contract violation such as an incomplete tensor fill.
    /// Fatal.
    #[error("internal error: {0}")]
    Internal(String),

    /// Cooperative cancellation was requested by the caller.
    #[error("calculation cancelled")]
    Cancelled,
}

impl HazardError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        HazardError::Config(msg.into())
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        HazardError::Data(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        HazardError::Internal(msg.into())
    }
}
