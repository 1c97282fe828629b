//! Hazard calculation orchestrator.
//!
//! The pipeline is a directed acyclic graph of pure transformations:
//!
//! ```text
//! SourceSet → inputs → ground motions → curves → HazardCurveSet → HazardResult
//! ```
//!
//! Source sets, and the sources within each set, fan out across a Rayon
//! worker pool; every per-source task runs the full transform chain to
//! completion without suspension. The orchestrator blocks at two barriers
//! per source set (gathering per-source curves before consolidation) and
//! one final barrier (gathering per-set rollups).
//!
//! ## Determinism
//!
//! Consolidation runs in source-enumeration order, not task-completion
//! order, so repeated runs are bit-exact regardless of pool size. This
//! policy is stable within a release.
//!
//! ## Failure
//!
//! Any task failure aborts the whole calculation: the first error
//! observed is surfaced, pending work is discarded, and no partial result
//! is produced. Cancellation is cooperative via [`CancelToken`]; in-flight
//! tasks are not preempted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::cluster::{
    cluster_ground_motions_to_curves, cluster_inputs_to_ground_motions, cluster_to_inputs,
};
use crate::config::CalcConfig;
use crate::consolidate::{
    HazardCurveSet, HazardCurveSetBuilder, HazardResult, consolidate_curve_sets,
};
use crate::curves::{HazardCurves, ground_motions_to_curves};
use crate::errors::HazardError;
use crate::ground_motions::inputs_to_ground_motions;
use crate::inputs::source_to_inputs;
use crate::site::Site;
use crate::source::{HazardModel, SourceSet, Sources};

/// Cooperative cancellation handle.
///
/// Tasks poll the token at entry; a cancelled calculation fails with
/// [`HazardError::Cancelled`] and produces no partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), HazardError> {
        if self.is_cancelled() {
            Err(HazardError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// A hazard calculator with an explicitly owned worker pool.
///
/// The pool is a constructor argument rather than process-global state so
/// tests can inject a single-threaded pool for deterministic property
/// checks.
pub struct HazardCalculator {
    pool: rayon::ThreadPool,
}

impl HazardCalculator {
    /// Create a calculator whose pool is sized to the logical CPU count.
    pub fn new() -> Result<Self, HazardError> {
        Self::build_pool(None)
    }

    /// Create a calculator with a fixed number of worker threads.
    pub fn with_threads(threads: usize) -> Result<Self, HazardError> {
        Self::build_pool(Some(threads))
    }

    fn build_pool(threads: Option<usize>) -> Result<Self, HazardError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| HazardError::internal(format!("failed to build worker pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Compute mean hazard curves for a site.
    ///
    /// # Errors
    ///
    /// Configuration errors are raised synchronously, before any task is
    /// scheduled; data and internal errors abort the calculation with no
    /// partial result.
    pub fn hazard_curve(
        &self,
        model: &HazardModel,
        config: &CalcConfig,
        site: &Site,
    ) -> Result<HazardResult, HazardError> {
        self.hazard_curve_cancellable(model, config, site, &CancelToken::new())
    }

    /// [`hazard_curve`](HazardCalculator::hazard_curve) with a
    /// caller-held cancellation token.
    pub fn hazard_curve_cancellable(
        &self,
        model: &HazardModel,
        config: &CalcConfig,
        site: &Site,
        cancel: &CancelToken,
    ) -> Result<HazardResult, HazardError> {
        self.pool.install(|| calc(model, config, site, cancel))
    }
}

/// Compute mean hazard curves for a site on the global Rayon pool.
///
/// See [`HazardCalculator`] for pool control and cancellation.
pub fn hazard_curve(
    model: &HazardModel,
    config: &CalcConfig,
    site: &Site,
) -> Result<HazardResult, HazardError> {
    calc(model, config, site, &CancelToken::new())
}

fn calc(
    model: &HazardModel,
    config: &CalcConfig,
    site: &Site,
    cancel: &CancelToken,
) -> Result<HazardResult, HazardError> {
    site.validate()?;
    let curve_sets: Vec<HazardCurveSet> = model
        .source_sets()
        .par_iter()
        .map(|set| curve_set_for(set, config, site, cancel))
        .collect::<Result<_, _>>()?;
    Ok(consolidate_curve_sets(curve_sets, config.model_curves().clone()))
}

fn curve_set_for(
    source_set: &SourceSet,
    config: &CalcConfig,
    site: &Site,
    cancel: &CancelToken,
) -> Result<HazardCurveSet, HazardError> {
    cancel.check()?;
    let mut builder = HazardCurveSetBuilder::new(source_set, config);
    match source_set.sources() {
        Sources::Faults(_) => {
            let sources: Vec<_> = source_set.sources_within(site).collect();
            let curves: Vec<HazardCurves> = sources
                .into_par_iter()
                .map(|source| {
                    cancel.check()?;
                    let inputs = source_to_inputs(source, site)?;
                    let motions =
                        inputs_to_ground_motions(inputs, source_set.gmm_set(), config.imts())?;
                    ground_motions_to_curves(motions, config)
                })
                .collect::<Result<_, _>>()?;
            // Barrier: all per-source tasks are done; consolidate in
            // enumeration order.
            for source_curves in curves {
                builder.add_source(source_curves)?;
            }
        }
        Sources::Clusters(_) => {
            let clusters: Vec<_> = source_set.clusters_within(site).collect();
            let curves: Vec<_> = clusters
                .into_par_iter()
                .map(|cluster| {
                    cancel.check()?;
                    let inputs = cluster_to_inputs(cluster, site)?;
                    let motions =
                        cluster_inputs_to_ground_motions(inputs, source_set.gmm_set(), config.imts())?;
                    cluster_ground_motions_to_curves(motions, config)
                })
                .collect::<Result<_, _>>()?;
            for cluster_curves in curves {
                builder.add_cluster(cluster_curves)?;
            }
        }
    }
    builder.build()
}
