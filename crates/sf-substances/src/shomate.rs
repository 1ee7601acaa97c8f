//! Shomate correlations for ideal-gas heat capacity and enthalpy.
//!
//! All correlations use the reduced temperature `t = T / 1000` (T in K).
//! Heat capacity is in J/(mol K); enthalpy is returned in MJ/mol.
//!
//! O2 and N2 carry two coefficient sets. The set is chosen from the current
//! temperature value when an expression is built, not re-evaluated during a
//! solve.

use sf_core::VarId;
use sf_core::constants::R_GAS;
use sf_expr::Expr;

use crate::substance::{Substance, SubstanceMap};

/// Reduced temperature below which O2 uses its low-range coefficients.
pub const O2_SWITCH_KK: f64 = 0.7;
/// Reduced temperature below which N2 uses its low-range coefficients.
pub const N2_SWITCH_KK: f64 = 0.5;

/// One Shomate coefficient set (A..F, H).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shomate {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub h: f64,
}

const fn set(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, h: f64) -> Shomate {
    Shomate { a, b, c, d, e, f, h }
}

const CO: Shomate = set(25.56, 6.096, 4.05, -2.67, 0.131, -118.0, -110.52);
const CO2: Shomate = set(24.99, 55.19, -33.69, 7.95, -0.14, -403.61, -393.52);
const H2: Shomate = set(33.066, -11.363, 11.43, -2.77, -0.158, -9.98, 0.0);
const O2_LOW: Shomate = set(31.32, -20.23, 57.86, -36.5, -0.0073, -8.903, 0.0);
const O2_HIGH: Shomate = set(30.032, 8.77, -3.988, 0.788, -0.741, -11.324, 0.0);
// The low-range nitrogen set shares the hydrogen coefficients.
const N2_LOW: Shomate = H2;
const N2_HIGH: Shomate = set(19.505, 19.887, -8.598, 1.369, 0.527, -4.935, 0.0);
const CH4: Shomate = set(-0.703, 108.477, -42.521, 5.862, 0.678, -76.843, -74.873);
const H2O: Shomate = set(30.092, 6.8323, 6.7934, -2.5344, 0.0843, -250.88, -241.82);

impl Shomate {
    /// Coefficients for `k` at reduced temperature `t_kk` (kK).
    pub fn for_substance(k: Substance, t_kk: f64) -> Shomate {
        match k {
            Substance::CO => CO,
            Substance::CO2 => CO2,
            Substance::H2 => H2,
            Substance::O2 if t_kk < O2_SWITCH_KK => O2_LOW,
            Substance::O2 => O2_HIGH,
            Substance::N2 if t_kk < N2_SWITCH_KK => N2_LOW,
            Substance::N2 => N2_HIGH,
            Substance::CH4 => CH4,
            Substance::H2O => H2O,
        }
    }

    /// cp [J/(mol K)] at reduced temperature `t`.
    pub fn heat_capacity(&self, t: f64) -> f64 {
        self.a + self.b * t + self.c * t.powi(2) + self.d * t.powi(3) + self.e * t.powi(-2)
    }

    /// Sensible enthalpy h(T) - h(298.15 K) [kJ/mol] at reduced temperature `t`.
    pub fn enthalpy(&self, t: f64) -> f64 {
        self.a * t + self.b * t.powi(2) / 2.0 + self.c * t.powi(3) / 3.0 + self.d * t.powi(4) / 4.0
            - self.e / t
            + self.f
            - self.h
    }

    pub fn heat_capacity_expr(&self, t: &Expr) -> Expr {
        self.a
            + self.b * t.clone()
            + self.c * t.clone().powi(2)
            + self.d * t.clone().powi(3)
            + self.e * t.clone().powi(-2)
    }

    pub fn enthalpy_expr(&self, t: &Expr) -> Expr {
        self.a * t.clone()
            + self.b * t.clone().powi(2) / 2.0
            + self.c * t.clone().powi(3) / 3.0
            + self.d * t.clone().powi(4) / 4.0
            - self.e / t.clone()
            + (self.f - self.h)
    }
}

fn reduced(temperature: VarId) -> Expr {
    Expr::var(temperature) / 1000.0
}

/// Mixture molar enthalpy [MJ/mol] of a stream as an expression.
pub fn enthalpy_expr(temperature: VarId, t_current_k: f64, y: &SubstanceMap<VarId>) -> Expr {
    let t = reduced(temperature);
    let t_kk = t_current_k / 1000.0;
    let h = Expr::sum(
        y.iter()
            .map(|(k, &yk)| Expr::var(yk) * Shomate::for_substance(k, t_kk).enthalpy_expr(&t)),
    );
    h / 1000.0
}

/// Mixture molar heat capacity [J/(mol K)] as an expression.
pub fn heat_capacity_expr(temperature: VarId, t_current_k: f64, y: &SubstanceMap<VarId>) -> Expr {
    let t = reduced(temperature);
    let t_kk = t_current_k / 1000.0;
    Expr::sum(
        y.iter().map(|(k, &yk)| {
            Expr::var(yk) * Shomate::for_substance(k, t_kk).heat_capacity_expr(&t)
        }),
    )
}

/// Heat-capacity ratio cp / (cp - R) as an expression.
pub fn kappa_expr(temperature: VarId, t_current_k: f64, y: &SubstanceMap<VarId>) -> Expr {
    let cp = heat_capacity_expr(temperature, t_current_k, y);
    cp.clone() / (cp - R_GAS)
}

/// Numeric mixture enthalpy [MJ/mol]; the range switch follows `t_k` itself.
pub fn enthalpy(t_k: f64, y: &SubstanceMap<f64>) -> f64 {
    let t = t_k / 1000.0;
    y.iter()
        .map(|(k, yk)| yk * Shomate::for_substance(k, t).enthalpy(t))
        .sum::<f64>()
        / 1000.0
}

/// Numeric mixture heat capacity [J/(mol K)].
pub fn heat_capacity(t_k: f64, y: &SubstanceMap<f64>) -> f64 {
    let t = t_k / 1000.0;
    y.iter()
        .map(|(k, yk)| yk * Shomate::for_substance(k, t).heat_capacity(t))
        .sum()
}

/// Numeric heat-capacity ratio.
pub fn kappa(t_k: f64, y: &SubstanceMap<f64>) -> f64 {
    let cp = heat_capacity(t_k, y);
    cp / (cp - R_GAS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_expr::{Bounds, VariableStore};

    fn pure(k: Substance) -> SubstanceMap<f64> {
        SubstanceMap::from_fn(|j| if j == k { 1.0 } else { 0.0 })
    }

    #[test]
    fn sensible_enthalpy_vanishes_at_reference_temperature() {
        for k in [Substance::CO2, Substance::H2, Substance::CH4, Substance::H2O] {
            let h = enthalpy(298.15, &pure(k));
            assert!(h.abs() < 1e-4, "{k}: h = {h}");
        }
    }

    #[test]
    fn enthalpy_rises_with_temperature() {
        let y = pure(Substance::CO);
        assert!(enthalpy(900.0, &y) > enthalpy(600.0, &y));
    }

    #[test]
    fn range_switch() {
        assert_eq!(Shomate::for_substance(Substance::O2, 0.69), O2_LOW);
        assert_eq!(Shomate::for_substance(Substance::O2, 0.7), O2_HIGH);
        assert_eq!(Shomate::for_substance(Substance::N2, 0.4), H2);
        assert_eq!(Shomate::for_substance(Substance::N2, 0.5), N2_HIGH);
    }

    #[test]
    fn kappa_of_diatomic_gas() {
        let k = kappa(300.0, &pure(Substance::N2));
        assert!(k > 1.35 && k < 1.45, "kappa = {k}");
    }

    #[test]
    fn expressions_match_numeric_evaluation() {
        let mut vars = VariableStore::new();
        let t = vars.add("T", Bounds::new(200.0, 2000.0), 850.0).unwrap();
        let yv = SubstanceMap::from_fn(|k| {
            vars.add(format!("y[{k}]"), Bounds::unit_interval(), 0.0).unwrap()
        });
        let mut y = SubstanceMap::<f64>::default();
        y[Substance::CO] = 0.3;
        y[Substance::H2] = 0.5;
        y[Substance::N2] = 0.2;
        for (k, &id) in yv.iter() {
            vars.set_value(id, y[k]).unwrap();
        }
        let values = vars.values();

        let h = enthalpy_expr(t, 850.0, &yv).eval(&values);
        assert!((h - enthalpy(850.0, &y)).abs() < 1e-12);
        let kap = kappa_expr(t, 850.0, &yv).eval(&values);
        assert!((kap - kappa(850.0, &y)).abs() < 1e-12);
    }
}
