//! The fixed substance set every composition vector is indexed over.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::SubstanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Substance {
    CO,
    CO2,
    H2,
    O2,
    N2,
    CH4,
    H2O,
}

impl Substance {
    pub const COUNT: usize = 7;

    /// Declaration order; also the order of every `SubstanceMap`.
    pub const ALL: [Substance; Self::COUNT] = [
        Substance::CO,
        Substance::CO2,
        Substance::H2,
        Substance::O2,
        Substance::N2,
        Substance::CH4,
        Substance::H2O,
    ];

    /// Substances that get an explicit component balance; water is closed by Σy = 1.
    pub fn balanced() -> impl Iterator<Item = Substance> {
        Self::ALL.into_iter().filter(|k| *k != Substance::H2O)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Substance::CO => "CO",
            Substance::CO2 => "CO2",
            Substance::H2 => "H2",
            Substance::O2 => "O2",
            Substance::N2 => "N2",
            Substance::CH4 => "CH4",
            Substance::H2O => "H2O",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }

    /// Molar weight [kg/mol] as used by the flowsheet balances.
    pub fn molar_weight(&self) -> f64 {
        let g_per_mol = match self {
            Substance::CO => 28.0,
            Substance::CO2 => 44.0,
            Substance::H2O => 18.0,
            Substance::H2 => 2.0,
            Substance::O2 => 32.0,
            Substance::N2 => 28.0,
            Substance::CH4 => 16.0,
        };
        g_per_mol / 1000.0
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Substance {
    type Err = SubstanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CO" | "CARBON MONOXIDE" => Ok(Substance::CO),
            "CO2" | "CARBON DIOXIDE" => Ok(Substance::CO2),
            "H2" | "HYDROGEN" => Ok(Substance::H2),
            "O2" | "OXYGEN" => Ok(Substance::O2),
            "N2" | "NITROGEN" => Ok(Substance::N2),
            "CH4" | "METHANE" => Ok(Substance::CH4),
            "H2O" | "WATER" => Ok(Substance::H2O),
            _ => Err(SubstanceError::UnknownSubstance(s.to_string())),
        }
    }
}

/// One value per substance, in `Substance::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstanceMap<T>([T; Substance::COUNT]);

impl<T> SubstanceMap<T> {
    pub fn from_fn(mut f: impl FnMut(Substance) -> T) -> Self {
        Self(Substance::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Substance, &T)> {
        Substance::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(Substance, &T) -> U) -> SubstanceMap<U> {
        SubstanceMap::from_fn(|k| f(k, &self[k]))
    }
}

impl<T: Copy + Default> Default for SubstanceMap<T> {
    fn default() -> Self {
        Self([T::default(); Substance::COUNT])
    }
}

impl<T> Index<Substance> for SubstanceMap<T> {
    type Output = T;
    fn index(&self, k: Substance) -> &T {
        &self.0[k.slot()]
    }
}

impl<T> IndexMut<Substance> for SubstanceMap<T> {
    fn index_mut(&mut self, k: Substance) -> &mut T {
        &mut self.0[k.slot()]
    }
}

impl SubstanceMap<f64> {
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Mean molar weight [kg/mol] of a fraction vector.
    pub fn molar_weight(&self) -> f64 {
        self.iter().map(|(k, y)| y * k.molar_weight()).sum()
    }
}
