//! Named quantities exchanged between the flowsheet and the inventory.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sf_expr::Bounds;

use crate::error::AssemblyError;

/// Bounds of every connector variable.
pub const CONNECTOR_BOUNDS: Bounds = Bounds::symmetric(10_000.0);

/// Connector vocabulary. Each name matches an intermediate flow of the
/// technology matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Connector {
    MillGasCog,
    Hydrogen,
    Electricity,
    Heat,
    Syngas11,
    Syngas21,
    CarbonDioxide,
    Methane,
    Oxygen,
    MillGasBfg,
    CarbonMonoxide,
    Co2ToAtmosphere,
    Steam,
}

impl Connector {
    pub const ALL: [Connector; 13] = [
        Connector::MillGasCog,
        Connector::Hydrogen,
        Connector::Electricity,
        Connector::Heat,
        Connector::Syngas11,
        Connector::Syngas21,
        Connector::CarbonDioxide,
        Connector::Methane,
        Connector::Oxygen,
        Connector::MillGasBfg,
        Connector::CarbonMonoxide,
        Connector::Co2ToAtmosphere,
        Connector::Steam,
    ];

    /// Intermediate-flow name in the technology matrix.
    pub fn flow_name(&self) -> &'static str {
        match self {
            Connector::MillGasCog => "Mill gas COG [kg]",
            Connector::Hydrogen => "Hydrogen (H2) [kg]",
            Connector::Electricity => "Electricity [MJ]",
            Connector::Heat => "Heat [MJ]",
            Connector::Syngas11 => "SYNTHESIS GAS (1:1)",
            Connector::Syngas21 => "SYNTHESIS GAS (2:1)",
            Connector::CarbonDioxide => "Carbon dioxide (CO2) [kg]",
            Connector::Methane => "Methane (CH4) [kg]",
            Connector::Oxygen => "Oxygen (O2) [kg]",
            Connector::MillGasBfg => "Mill gas BFG/BOFG [kg]",
            Connector::CarbonMonoxide => "Carbon monoxide (CO) [kg]",
            Connector::Co2ToAtmosphere => "CO2 to atm [kg]",
            Connector::Steam => "STEAM [kg]",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flow_name())
    }
}

impl FromStr for Connector {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Connector::ALL
            .into_iter()
            .find(|c| c.flow_name() == s)
            .ok_or_else(|| AssemblyError::UndeclaredConnector(s.to_string()))
    }
}
