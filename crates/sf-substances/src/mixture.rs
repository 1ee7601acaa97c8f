//! Reference feed mixtures and feed compositions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SubstanceError, SubstanceResult};
use crate::substance::{Substance, SubstanceMap};

/// Allowed deviation of a composition sum from one.
pub const COMPOSITION_TOL: f64 = 1e-6;

/// Steel-mill off-gases with tabulated compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceMixture {
    /// Blast furnace / basic oxygen furnace gas.
    #[serde(rename = "B(O)FG")]
    Bofg,
    /// Coke oven gas.
    #[serde(rename = "COG")]
    Cog,
}

fn fractions(values: [f64; Substance::COUNT]) -> SubstanceMap<f64> {
    let mut i = 0;
    SubstanceMap::from_fn(|_| {
        let v = values[i];
        i += 1;
        v
    })
}

impl ReferenceMixture {
    pub fn key(&self) -> &'static str {
        match self {
            ReferenceMixture::Bofg => "B(O)FG",
            ReferenceMixture::Cog => "COG",
        }
    }

    /// Mole fractions applied when the mixture is used as a feed.
    pub fn feed_fractions(&self) -> SubstanceMap<f64> {
        // CO, CO2, H2, O2, N2, CH4, H2O
        match self {
            ReferenceMixture::Bofg => fractions([0.24, 0.22, 0.04, 0.0, 0.47, 0.0, 0.03]),
            ReferenceMixture::Cog => fractions([0.04, 0.01, 0.62, 0.0, 0.06, 0.22, 0.05]),
        }
    }

    /// Composition used for mass conversions of the mixture.
    ///
    /// Tabulated separately from the feed fractions; the two differ slightly.
    pub fn weighting_fractions(&self) -> SubstanceMap<f64> {
        match self {
            ReferenceMixture::Bofg => fractions([0.25, 0.217, 0.037, 0.0, 0.456, 0.0, 0.04]),
            ReferenceMixture::Cog => fractions([0.042, 0.012, 0.621, 0.0, 0.059, 0.225, 0.041]),
        }
    }

    /// Mean molar weight [kg/mol].
    pub fn molar_weight(&self) -> f64 {
        self.weighting_fractions().molar_weight()
    }
}

impl fmt::Display for ReferenceMixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ReferenceMixture {
    type Err = SubstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B(O)FG" | "BOFG" | "BFG" => Ok(ReferenceMixture::Bofg),
            "COG" => Ok(ReferenceMixture::Cog),
            _ => Err(SubstanceError::UnknownMixture(s.to_string())),
        }
    }
}

/// Composition used to fix an initial stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedComposition {
    Reference(ReferenceMixture),
    Explicit(SubstanceMap<f64>),
}

impl FeedComposition {
    /// Build from `(name, fraction)` pairs. Unlisted substances get 0.
    pub fn from_pairs<'a, I>(pairs: I) -> SubstanceResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut y = SubstanceMap::<f64>::default();
        for (name, v) in pairs {
            let k: Substance = name.parse()?;
            y[k] = v;
        }
        Self::explicit(y)
    }

    /// Validated explicit composition.
    pub fn explicit(y: SubstanceMap<f64>) -> SubstanceResult<Self> {
        for (k, &v) in y.iter() {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(SubstanceError::InvalidComposition {
                    what: format!("fraction of {k} is {v}"),
                });
            }
        }
        let total = y.total();
        if (total - 1.0).abs() > COMPOSITION_TOL {
            return Err(SubstanceError::InvalidComposition {
                what: format!("fractions sum to {total}"),
            });
        }
        Ok(FeedComposition::Explicit(y))
    }

    pub fn fractions(&self) -> SubstanceMap<f64> {
        match self {
            FeedComposition::Reference(mix) => mix.feed_fractions(),
            FeedComposition::Explicit(y) => *y,
        }
    }
}

impl From<ReferenceMixture> for FeedComposition {
    fn from(mix: ReferenceMixture) -> Self {
        FeedComposition::Reference(mix)
    }
}
