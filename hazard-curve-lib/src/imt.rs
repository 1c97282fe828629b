//! Intensity-measure types (IMTs).
//!
//! An IMT is the scalar ground motion parameter a hazard curve is computed
//! for: peak ground acceleration (PGA, in g), peak ground velocity (PGV, in
//! cm/s), or spectral acceleration SA(T) (in g) at one of the standard
//! structural periods. The set is closed for a given release so that the
//! pipeline's inner tensors can be indexed by ordinal.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::dense::DenseKey;

/// Intensity-measure type of a ground motion or hazard curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Imt {
    /// Peak ground acceleration, in units of g.
    Pga,
    /// Peak ground velocity, in cm/s.
    Pgv,
    Sa0P01,
    Sa0P02,
    Sa0P03,
    Sa0P05,
    Sa0P075,
    Sa0P1,
    Sa0P15,
    Sa0P2,
    Sa0P25,
    Sa0P3,
    Sa0P4,
    Sa0P5,
    Sa0P75,
    Sa1P0,
    Sa1P5,
    Sa2P0,
    Sa3P0,
    Sa4P0,
    Sa5P0,
    Sa7P5,
    Sa10P0,
}

/// All supported IMTs, in ordinal order.
pub const ALL_IMTS: [Imt; 23] = [
    Imt::Pga,
    Imt::Pgv,
    Imt::Sa0P01,
    Imt::Sa0P02,
    Imt::Sa0P03,
    Imt::Sa0P05,
    Imt::Sa0P075,
    Imt::Sa0P1,
    Imt::Sa0P15,
    Imt::Sa0P2,
    Imt::Sa0P25,
    Imt::Sa0P3,
    Imt::Sa0P4,
    Imt::Sa0P5,
    Imt::Sa0P75,
    Imt::Sa1P0,
    Imt::Sa1P5,
    Imt::Sa2P0,
    Imt::Sa3P0,
    Imt::Sa4P0,
    Imt::Sa5P0,
    Imt::Sa7P5,
    Imt::Sa10P0,
];

impl Imt {
    /// The structural period of a spectral acceleration, in seconds.
    ///
    /// `None` for PGA and PGV.
    pub fn period(self) -> Option<f64> {
        match self {
            Imt::Pga | Imt::Pgv => None,
            Imt::Sa0P01 => Some(0.01),
            Imt::Sa0P02 => Some(0.02),
            Imt::Sa0P03 => Some(0.03),
            Imt::Sa0P05 => Some(0.05),
            Imt::Sa0P075 => Some(0.075),
            Imt::Sa0P1 => Some(0.1),
            Imt::Sa0P15 => Some(0.15),
            Imt::Sa0P2 => Some(0.2),
            Imt::Sa0P25 => Some(0.25),
            Imt::Sa0P3 => Some(0.3),
            Imt::Sa0P4 => Some(0.4),
            Imt::Sa0P5 => Some(0.5),
            Imt::Sa0P75 => Some(0.75),
            Imt::Sa1P0 => Some(1.0),
            Imt::Sa1P5 => Some(1.5),
            Imt::Sa2P0 => Some(2.0),
            Imt::Sa3P0 => Some(3.0),
            Imt::Sa4P0 => Some(4.0),
            Imt::Sa5P0 => Some(5.0),
            Imt::Sa7P5 => Some(7.5),
            Imt::Sa10P0 => Some(10.0),
        }
    }

    /// Whether this is a spectral acceleration.
    pub fn is_sa(self) -> bool {
        self.period().is_some()
    }

    /// The spectral acceleration IMT for a structural period, if the period
    /// is part of the supported set.
    pub fn from_period(period: f64) -> Option<Imt> {
        ALL_IMTS
            .iter()
            .copied()
            .find(|imt| imt.period().is_some_and(|p| p == period))
    }

    /// The NSHM CEUS maximum-intensity clamp for this IMT.
    ///
    /// The value bounds ground motion in linear units (g for PGA and SA,
    /// cm/s for PGV); IMTs without a published clamp are unbounded.
    pub fn ceus_max_intensity(self) -> f64 {
        match self {
            Imt::Pga => 3.0,
            Imt::Pgv => 400.0,
            sa if sa.period().is_some_and(|p| p < 0.075) => 6.0,
            _ => f64::INFINITY,
        }
    }
}

impl DenseKey for Imt {
    const COUNT: usize = ALL_IMTS.len();

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        ALL_IMTS[index]
    }
}

impl fmt::Display for Imt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imt::Pga => write!(f, "PGA"),
            Imt::Pgv => write!(f, "PGV"),
            sa => write!(f, "SA({}s)", sa.period().unwrap_or_default()),
        }
    }
}

impl Serialize for Imt {
    /// Serialize as the display name, e.g. `"PGA"` or `"SA(0.2s)"`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Imt {
    type Err = String;

    /// Parse `"PGA"`, `"PGV"`, or a spectral period such as `"SA(0.2s)"`
    /// or the bare period `"0.2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("PGA") {
            return Ok(Imt::Pga);
        }
        if trimmed.eq_ignore_ascii_case("PGV") {
            return Ok(Imt::Pgv);
        }
        let period_text = trimmed
            .strip_prefix("SA(")
            .or_else(|| trimmed.strip_prefix("sa("))
            .and_then(|t| t.strip_suffix(')'))
            .map(|t| t.trim_end_matches('s'))
            .unwrap_or(trimmed);
        let period: f64 = period_text
            .parse()
            .map_err(|_| format!("unrecognized IMT `{s}`"))?;
        Imt::from_period(period).ok_or_else(|| format!("unsupported SA period `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_round_trip() {
        for (i, imt) in ALL_IMTS.iter().enumerate() {
            assert_eq!(imt.index(), i);
            assert_eq!(Imt::from_index(i), *imt);
        }
    }

    #[test]
    fn test_periods() {
        assert_eq!(Imt::Pga.period(), None);
        assert_eq!(Imt::Sa0P2.period(), Some(0.2));
        assert_eq!(Imt::from_period(1.0), Some(Imt::Sa1P0));
        assert_eq!(Imt::from_period(0.33), None);
    }

    #[test]
    fn test_ceus_clamps() {
        assert_eq!(Imt::Pga.ceus_max_intensity(), 3.0);
        assert_eq!(Imt::Pgv.ceus_max_intensity(), 400.0);
        assert_eq!(Imt::Sa0P05.ceus_max_intensity(), 6.0);
        assert!(Imt::Sa0P075.ceus_max_intensity().is_infinite());
        assert!(Imt::Sa1P0.ceus_max_intensity().is_infinite());
    }

    #[test]
    fn test_parse() {
        assert_eq!("pga".parse::<Imt>().unwrap(), Imt::Pga);
        assert_eq!("PGV".parse::<Imt>().unwrap(), Imt::Pgv);
        assert_eq!("SA(0.2s)".parse::<Imt>().unwrap(), Imt::Sa0P2);
        assert_eq!("3.0".parse::<Imt>().unwrap(), Imt::Sa3P0);
        assert!("SA(0.33s)".parse::<Imt>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Imt::Pga.to_string(), "PGA");
        assert_eq!(Imt::Sa0P75.to_string(), "SA(0.75s)");
    }
}
