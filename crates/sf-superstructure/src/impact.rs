//! Impact factors for flowsheet-only objectives.

use serde::{Deserialize, Serialize};

/// Global-warming factors [kg CO2-eq per unit].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactors {
    /// Per kJ of electricity (grid mix 2020).
    pub electricity: f64,
    /// Per kJ of heat from natural gas.
    pub heat: f64,
    pub carbon_monoxide: f64,
    pub hydrogen: f64,
    pub carbon_dioxide: f64,
    pub oxygen: f64,
    /// Per kg of 2:1 synthesis gas.
    pub syngas_21: f64,
    pub steam: f64,
}

impl Default for ImpactFactors {
    fn default() -> Self {
        Self {
            electricity: 0.1072 / 1000.0,
            heat: 0.0686 / 1000.0,
            carbon_monoxide: 0.579,
            hydrogen: 10.8,
            carbon_dioxide: 1.0,
            oxygen: 0.144,
            syngas_21: 1.954,
            steam: 0.237,
        }
    }
}
