//! Catalogue of supported gas-phase reactions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SubstanceError;
use crate::substance::Substance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reaction {
    /// Water-gas shift: CO + H2O = CO2 + H2
    Wgsr,
    /// Steam methane reforming: CH4 + H2O = CO + 3 H2
    Smr,
    /// Dry reforming: CO2 + CH4 = 2 CO + 2 H2
    Cdr,
    /// Partial oxidation: CH4 + 0.5 O2 = CO + 2 H2
    Por,
}

impl Reaction {
    pub const ALL: [Reaction; 4] = [Reaction::Wgsr, Reaction::Smr, Reaction::Cdr, Reaction::Por];

    pub fn key(&self) -> &'static str {
        match self {
            Reaction::Wgsr => "WGSR",
            Reaction::Smr => "SMR",
            Reaction::Cdr => "CDR",
            Reaction::Por => "POR",
        }
    }

    /// Reaction enthalpy [MJ/mol key component].
    pub fn enthalpy(&self) -> f64 {
        let kj_per_mol = match self {
            Reaction::Wgsr => -41.1,
            Reaction::Smr => 234.7,
            Reaction::Cdr => 247.0,
            Reaction::Por => -35.9,
        };
        kj_per_mol / 1000.0
    }

    /// Component whose conversion defines the extent of reaction.
    pub fn key_component(&self) -> Substance {
        match self {
            Reaction::Wgsr => Substance::CO,
            Reaction::Smr | Reaction::Cdr | Reaction::Por => Substance::CH4,
        }
    }

    /// Stoichiometric coefficient of `k`, normalised to the key component.
    pub fn coefficient(&self, k: Substance) -> f64 {
        use Substance::*;
        match (self, k) {
            (Reaction::Wgsr, CO | H2O) => -1.0,
            (Reaction::Wgsr, CO2 | H2) => 1.0,
            (Reaction::Smr, CO) => 1.0,
            (Reaction::Smr, H2) => 3.0,
            (Reaction::Smr, H2O | CH4) => -1.0,
            (Reaction::Cdr, CO | H2) => 2.0,
            (Reaction::Cdr, CO2 | CH4) => -1.0,
            (Reaction::Por, CO) => 1.0,
            (Reaction::Por, H2) => 2.0,
            (Reaction::Por, O2) => -0.5,
            (Reaction::Por, CH4) => -1.0,
            _ => 0.0,
        }
    }

    /// Net change in moles per mole of key component converted.
    pub fn mole_change(&self) -> f64 {
        match self {
            Reaction::Wgsr => 0.0,
            Reaction::Smr | Reaction::Cdr => 2.0,
            Reaction::Por => 1.5,
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Reaction {
    type Err = SubstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WGSR" => Ok(Reaction::Wgsr),
            "SMR" => Ok(Reaction::Smr),
            "CDR" => Ok(Reaction::Cdr),
            "POR" => Ok(Reaction::Por),
            _ => Err(SubstanceError::UnknownReaction(s.to_string())),
        }
    }
}
