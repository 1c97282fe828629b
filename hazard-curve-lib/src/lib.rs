//! # `hazard_curve_lib`
//!
//! **A performant, modular Rust library for probabilistic seismic hazard
//! analysis (PSHA) hazard curve calculation.**
//!
//! This crate provides the staged, concurrent calculation pipeline that,
//! given a hazard model (a catalog of earthquake sources grouped into
//! source sets), a set of ground motion models (GMMs), and a site of
//! interest, produces mean hazard curves — annual exceedance rate as a
//! function of ground motion level — at one or more intensity-measure
//! types (IMTs).
//!
//! ## Features
//!
//! - Modular ground motion model interface via the
//!   [`GroundMotionModeling`](crate::gmm::GroundMotionModeling) trait,
//!   with distance-dependent GMM weighting
//!   ([`GmmSet`](crate::gmm::GmmSet)).
//! - Full implementation of the **Morikawa & Fujiwara (2013)** GMPE
//!   family as log-normal (mean, sigma) models via the
//!   [`mf2013`](crate::mf2013) module.
//! - Six selectable σ/truncation models for the log-normal exceedance
//!   distribution, including an IMT-indexed intensity clamp
//!   ([`exceedance`](crate::exceedance)).
//! - Ordinary and cluster source families: independent rate summation for
//!   the former, joint-probability collapse of magnitude variants for the
//!   latter ([`cluster`](crate::cluster)).
//! - Parallelized calculation across sources and source sets with Rayon,
//!   deterministic up to bit-exact reproducibility
//!   ([`pipeline`](crate::pipeline)).
//! - CSV-based readers and writers for site inputs and hazard curve
//!   outputs.
//!
//! ## Module Overview
//!
//! - [`auxilary`](crate::auxilary) — Supporting utility functions (internal use).
//! - [`cluster`](crate::cluster) — Cluster-source pipeline branch.
//! - [`config`](crate::config) — Calculation configuration and model curves.
//! - [`configs`](crate::configs) — Predefined GMM presets and a demo model.
//! - [`consolidate`](crate::consolidate) — Curve rollups and the final result.
//! - [`curve`](crate::curve) — Exceedance-curve sequences.
//! - [`curves`](crate::curves) — Ground-motion-to-curve transformation.
//! - [`dense`](crate::dense) — Dense enum-indexed maps for the inner tensors.
//! - [`errors`](crate::errors) — Error taxonomy.
//! - [`exceedance`](crate::exceedance) — σ/truncation exceedance models.
//! - [`gmm`](crate::gmm) — Core GMM data types and trait definitions.
//! - [`ground_motions`](crate::ground_motions) — Predictor-to-motion transformation.
//! - [`imt`](crate::imt) — Intensity-measure types.
//! - [`inputs`](crate::inputs) — Rupture-to-predictor transformation.
//! - [`mf2013`](crate::mf2013) — Morikawa & Fujiwara (2013) GMPE family.
//! - [`pipeline`](crate::pipeline) — Calculation orchestrator.
//! - [`readers`](crate::readers) — CSV-based site input loaders.
//! - [`site`](crate::site) — Locations and site parameters.
//! - [`source`](crate::source) — Ruptures, sources, and source sets.
//! - [`vectorized`](crate::vectorized) — Parallel multi-site hazard and map levels.
//! - [`writers`](crate::writers) — CSV-based hazard curve writers.
//!
//! ## Example
//!
//! ```rust
//! use hazard_curve_lib::config::CalcConfig;
//! use hazard_curve_lib::configs::demo_model;
//! use hazard_curve_lib::imt::Imt;
//! use hazard_curve_lib::pipeline::hazard_curve;
//! use hazard_curve_lib::site::{Location, Site};
//!
//! let model = demo_model().unwrap();
//! let config = CalcConfig::builder()
//!     .imts([Imt::Pga, Imt::Sa1P0])
//!     .build()
//!     .unwrap();
//! let site = Site::new(Location::new(142.5, 50.0), 500.0);
//!
//! let result = hazard_curve(&model, &config, &site).unwrap();
//! for (imt, curve) in result.total_curves().unwrap().iter() {
//!     println!("{imt}: {:?}", curve.ys());
//! }
//! ```
//!
//! ## Parallelism
//!
//! This crate uses [`Rayon`](https://docs.rs/rayon/latest/rayon/) for
//! data-parallel hazard calculations. The
//! [`HazardCalculator`](crate::pipeline::HazardCalculator) owns its
//! worker pool explicitly, so tests can inject a single-threaded pool;
//! the free [`hazard_curve`](crate::pipeline::hazard_curve) entry point
//! runs on the global pool.
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0
//! ([Apache-2.0](http://www.apache.org/licenses/LICENSE-2.0))
//!
//! ---
//!
//! ```text
//! Copyright 2025 Andrey Stepnov, GEOPHYSTECH LLC
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.
//! ```
//! ---

pub mod auxilary;
pub mod cluster;
pub mod config;
pub mod configs;
pub mod consolidate;
pub mod curve;
pub mod curves;
pub mod dense;
pub mod errors;
pub mod exceedance;
pub mod gmm;
pub mod ground_motions;
pub mod imt;
pub mod inputs;
pub mod mf2013;
pub mod pipeline;
pub mod readers;
pub mod site;
pub mod source;
pub mod vectorized;
pub mod writers;
