//! Exceedance probability models.
//!
//! A hazard curve integrates, over all ruptures, the probability that a
//! log-normally distributed ground motion exceeds each level of a model
//! curve. The variants of [`ExceedanceModel`] differ in how the log-normal
//! distribution is truncated. All models operate in natural-log
//! ground-motion space: the x values handed to them are `ln` of the model
//! curve's linear values.
//!
//! The untruncated complementary CDF is computed as
//! `erfc((x − μ) / (σ√2)) / 2`, which stays stable far from the mean:
//! values many standard deviations out yield exactly 0 or 1 rather than
//! NaN. Truncated variants renormalize with
//! `clip01((p − pHi) / (pLo − pHi))`; the clamp absorbs double-precision
//! rounding that may push results a few ulps outside [0, 1].

use std::fmt;
use std::str::FromStr;

use statrs::function::erf::erfc;

use crate::auxilary::clip01;
use crate::imt::Imt;

/// Truncation variants of the log-normal exceedance distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceedanceModel {
    /// Complementary step at the mean: 1 below μ, 0 at or above. Ignores
    /// σ and the truncation level.
    None,
    /// Pure complementary normal CDF; no truncation.
    TruncationOff,
    /// Renormalized so that the probability of exceeding μ + nσ is zero.
    TruncationUpperOnly,
    /// Symmetric two-sided truncation at μ ± nσ.
    TruncationLowerUpper,
    /// Equal-weight mixture of two untruncated normals at 0.8σ and 1.2σ,
    /// after the PEER tectonic-region mixture model.
    PeerMixtureModel,
    /// Upper truncation at `min(μ + nσ, ln(clamp(imt)))` with the
    /// NSHM CEUS maximum-intensity clamps.
    NshmCeusMaxIntensity,
}

/// All exceedance models, in declaration order.
pub const ALL_EXCEEDANCE_MODELS: [ExceedanceModel; 6] = [
    ExceedanceModel::None,
    ExceedanceModel::TruncationOff,
    ExceedanceModel::TruncationUpperOnly,
    ExceedanceModel::TruncationLowerUpper,
    ExceedanceModel::PeerMixtureModel,
    ExceedanceModel::NshmCeusMaxIntensity,
];

impl ExceedanceModel {
    /// Probability of exceeding the natural-log ground motion `x` under a
    /// log-normal distribution with natural-log mean `mean` and standard
    /// deviation `sigma`, truncated at `n` standard deviations.
    ///
    /// Models that ignore `n` do so silently.
    pub fn exceedance(self, mean: f64, sigma: f64, n: f64, imt: Imt, x: f64) -> f64 {
        match self {
            ExceedanceModel::None => {
                if x < mean {
                    1.0
                } else {
                    0.0
                }
            }
            ExceedanceModel::TruncationOff => prob_exceed(mean, sigma, x),
            ExceedanceModel::TruncationUpperOnly => bounded(
                prob_exceed(mean, sigma, x),
                prob_exceed(mean, sigma, mean + n * sigma),
                1.0,
            ),
            ExceedanceModel::TruncationLowerUpper => bounded(
                prob_exceed(mean, sigma, x),
                prob_exceed(mean, sigma, mean + n * sigma),
                prob_exceed(mean, sigma, mean - n * sigma),
            ),
            ExceedanceModel::PeerMixtureModel => {
                0.5 * (prob_exceed(mean, sigma * 0.8, x) + prob_exceed(mean, sigma * 1.2, x))
            }
            ExceedanceModel::NshmCeusMaxIntensity => {
                let x_limit = (mean + n * sigma).min(imt.ceus_max_intensity().ln());
                bounded(
                    prob_exceed(mean, sigma, x),
                    prob_exceed(mean, sigma, x_limit),
                    1.0,
                )
            }
        }
    }

    /// Populate `out` with the exceedance probability at each natural-log
    /// ground motion in `log_xs`.
    ///
    /// Per-rupture truncation bounds are computed once, outside the grid
    /// loop.
    pub fn fill(self, mean: f64, sigma: f64, n: f64, imt: Imt, log_xs: &[f64], out: &mut [f64]) {
        debug_assert_eq!(log_xs.len(), out.len());
        match self {
            ExceedanceModel::None => {
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = if x < mean { 1.0 } else { 0.0 };
                }
            }
            ExceedanceModel::TruncationOff => {
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = prob_exceed(mean, sigma, x);
                }
            }
            ExceedanceModel::TruncationUpperOnly => {
                let p_hi = prob_exceed(mean, sigma, mean + n * sigma);
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = bounded(prob_exceed(mean, sigma, x), p_hi, 1.0);
                }
            }
            ExceedanceModel::TruncationLowerUpper => {
                let p_hi = prob_exceed(mean, sigma, mean + n * sigma);
                let p_lo = prob_exceed(mean, sigma, mean - n * sigma);
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = bounded(prob_exceed(mean, sigma, x), p_hi, p_lo);
                }
            }
            ExceedanceModel::PeerMixtureModel => {
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = 0.5
                        * (prob_exceed(mean, sigma * 0.8, x)
                            + prob_exceed(mean, sigma * 1.2, x));
                }
            }
            ExceedanceModel::NshmCeusMaxIntensity => {
                let x_limit = (mean + n * sigma).min(imt.ceus_max_intensity().ln());
                let p_hi = prob_exceed(mean, sigma, x_limit);
                for (y, &x) in out.iter_mut().zip(log_xs) {
                    *y = bounded(prob_exceed(mean, sigma, x), p_hi, 1.0);
                }
            }
        }
    }
}

impl fmt::Display for ExceedanceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExceedanceModel::None => "NONE",
            ExceedanceModel::TruncationOff => "TRUNCATION_OFF",
            ExceedanceModel::TruncationUpperOnly => "TRUNCATION_UPPER_ONLY",
            ExceedanceModel::TruncationLowerUpper => "TRUNCATION_LOWER_UPPER",
            ExceedanceModel::PeerMixtureModel => "PEER_MIXTURE_MODEL",
            ExceedanceModel::NshmCeusMaxIntensity => "NSHM_CEUS_MAX_INTENSITY",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ExceedanceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EXCEEDANCE_MODELS
            .iter()
            .copied()
            .find(|m| m.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unrecognized exceedance model `{s}`"))
    }
}

/// Complementary CDF of a normal distribution at `x`.
fn prob_exceed(mean: f64, sigma: f64, x: f64) -> f64 {
    0.5 * erfc((x - mean) / (sigma * std::f64::consts::SQRT_2))
}

/// Renormalize a probability against truncation bounds and clamp the
/// floating-point residue into [0, 1].
fn bounded(p: f64, p_hi: f64, p_lo: f64) -> f64 {
    clip01((p - p_hi) / (p_lo - p_hi))
}
