//! Named bundles of process deactivations and overrides.

use std::fmt;

use crate::error::{InventoryError, InventoryResult};

pub const GRID_MIX_2020: &str = "EU-28: Electricity from grid mix (2020)";
pub const WIND_POWER: &str = "EU-28: Electricity from wind power ts";
pub const USER_DEFINED_ELECTRICITY: &str = "Electricity, user-defined";

const SEPARATION_ASPEN: [&str; 5] = [
    "Trennung BFG I, Energieaufwand aus Aspen",
    "Trennung BFG II, Energieaufwand aus Aspen",
    "Trennung COG, Energieaufwand aus Aspen",
    "ideale Trennung BFG, ohne Energieaufwand,  Zusammensetzung aus background data",
    "ideale Trennung COG, ohne Energieaufwand, Zusammensetzung aus background data",
];

const LOW_TRL_CCU: [&str; 10] = [
    "Benzene from CO2 (SC)",
    "CO from CO2 (SC)",
    "Ethylene from CO2 via H2",
    "Ethylene oxide from CO2 (SC)",
    "Propylene from CO2 (SC)",
    "Styrene from CO2 (SC)",
    "Toluene from CO2 (SC)",
    "Xylene (ORTHO) from CO2 (SC)",
    "Xylene (PARA) from CO2 (SC)",
    "Ethylene from CO2 via CH4",
];

/// Number of leading processes that make up the high-TRL CCU routes.
pub const HIGH_TRL_CCU_COUNT: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    ElectricityToday,
    /// User-supplied electricity impact [kg CO2-eq per unit].
    ElectricityUserDefined { impact: f64 },
    ElectricityBestCase,
    SeparationGdp,
    SeparationGdpLinearized,
    CcuHighTrlOnly,
    NoHighTrlCcu,
}

/// One step of a scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioAction {
    Deactivate(String),
    OverrideElementary { process: String, value: f64 },
}

fn off(names: &[&str]) -> Vec<ScenarioAction> {
    names
        .iter()
        .map(|n| ScenarioAction::Deactivate(n.to_string()))
        .collect()
}

impl Scenario {
    /// Parse a scenario identifier. `impact` is required for the user-defined
    /// electricity scenario and ignored otherwise.
    pub fn from_name(name: &str, impact: Option<f64>) -> InventoryResult<Self> {
        Ok(match name {
            "Electricity Today" => Scenario::ElectricityToday,
            "Electricity user-defined" => {
                let impact = impact.ok_or_else(|| InventoryError::ScenarioInput {
                    scenario: name.to_string(),
                    what: "an electricity impact value".to_string(),
                })?;
                Scenario::ElectricityUserDefined { impact }
            }
            "Electricity Best Case" => Scenario::ElectricityBestCase,
            "Separation GDP" => Scenario::SeparationGdp,
            "Separation GDP linearized" => Scenario::SeparationGdpLinearized,
            "CCU high TRL only" => Scenario::CcuHighTrlOnly,
            "No high TRL CCU" => Scenario::NoHighTrlCcu,
            other => return Err(InventoryError::UnknownScenario(other.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::ElectricityToday => "Electricity Today",
            Scenario::ElectricityUserDefined { .. } => "Electricity user-defined",
            Scenario::ElectricityBestCase => "Electricity Best Case",
            Scenario::SeparationGdp => "Separation GDP",
            Scenario::SeparationGdpLinearized => "Separation GDP linearized",
            Scenario::CcuHighTrlOnly => "CCU high TRL only",
            Scenario::NoHighTrlCcu => "No high TRL CCU",
        }
    }

    /// The fixed action sequence; `processes` is the inventory's process list
    /// in column order.
    pub fn actions(&self, processes: &[String]) -> InventoryResult<Vec<ScenarioAction>> {
        Ok(match self {
            Scenario::ElectricityToday => off(&[WIND_POWER, USER_DEFINED_ELECTRICITY]),
            Scenario::ElectricityUserDefined { impact } => {
                let mut actions = off(&[GRID_MIX_2020, WIND_POWER]);
                actions.push(ScenarioAction::OverrideElementary {
                    process: USER_DEFINED_ELECTRICITY.to_string(),
                    value: *impact,
                });
                actions
            }
            Scenario::ElectricityBestCase => off(&[GRID_MIX_2020, USER_DEFINED_ELECTRICITY]),
            Scenario::SeparationGdp => {
                let mut actions = off(&["GDP today", "GDP best case"]);
                actions.extend(off(&SEPARATION_ASPEN));
                actions
            }
            Scenario::SeparationGdpLinearized => off(&SEPARATION_ASPEN),
            Scenario::CcuHighTrlOnly => off(&LOW_TRL_CCU),
            Scenario::NoHighTrlCcu => {
                if processes.len() < HIGH_TRL_CCU_COUNT {
                    return Err(InventoryError::ScenarioInput {
                        scenario: self.name().to_string(),
                        what: format!("at least {HIGH_TRL_CCU_COUNT} processes"),
                    });
                }
                processes[..HIGH_TRL_CCU_COUNT]
                    .iter()
                    .map(|p| ScenarioAction::Deactivate(p.clone()))
                    .collect()
            }
        })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
