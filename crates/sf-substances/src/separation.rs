//! Separation parameters for adsorption and membrane units.

use crate::error::{SubstanceError, SubstanceResult};
use crate::substance::Substance;

/// Zeolite heat capacity [MJ/(kg K)].
pub const ZEOLITE_HEAT_CAPACITY: f64 = 1.0 / 1000.0;

/// PSA pressure-ratio parameter for the key component.
pub fn psa_beta(key: Substance) -> SubstanceResult<f64> {
    match key {
        Substance::H2 => Ok(0.02),
        Substance::CO2 => Ok(0.024),
        other => Err(SubstanceError::UnsupportedKey {
            table: "PSA beta",
            key: other.to_string(),
        }),
    }
}

fn h2_permeability(k: Substance) -> f64 {
    match k {
        Substance::CO => 2.4,
        Substance::CH4 => 2.3,
        Substance::CO2 => 38.0,
        Substance::H2 => 165.0,
        Substance::O2 => 8.3,
        Substance::N2 => 1.4,
        Substance::H2O => 1.0,
    }
}

fn co2_permeance_ratio(k: Substance) -> f64 {
    match k {
        Substance::CO => 140.0,
        Substance::CH4 => 200.0,
        Substance::H2 => 175.0,
        Substance::O2 => 200.0,
        Substance::N2 => 160.0,
        Substance::H2O => 160.0,
        Substance::CO2 => 1.0,
    }
}

/// Relative permeability alpha(k / key) of a membrane selective for `key`.
pub fn msp_alpha(k: Substance, key: Substance) -> SubstanceResult<f64> {
    match key {
        Substance::H2 => Ok(h2_permeability(k) / h2_permeability(key)),
        Substance::CO2 => Ok(1.0 / co2_permeance_ratio(k)),
        other => Err(SubstanceError::UnsupportedKey {
            table: "membrane permeability",
            key: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_alpha_is_one() {
        assert_eq!(msp_alpha(Substance::H2, Substance::H2).unwrap(), 1.0);
        assert_eq!(msp_alpha(Substance::CO2, Substance::CO2).unwrap(), 1.0);
    }

    #[test]
    fn h2_membrane_ratios() {
        let a = msp_alpha(Substance::CO2, Substance::H2).unwrap();
        assert!((a - 38.0 / 165.0).abs() < 1e-12);
    }

    #[test]
    fn co2_membrane_ratios() {
        let a = msp_alpha(Substance::N2, Substance::CO2).unwrap();
        assert!((a - 1.0 / 160.0).abs() < 1e-12);
    }

    #[test]
    fn unsupported_keys() {
        assert!(psa_beta(Substance::CO).is_err());
        assert!(msp_alpha(Substance::H2, Substance::CH4).is_err());
        assert_eq!(psa_beta(Substance::H2).unwrap(), 0.02);
    }
}
