//! Pressure- and temperature-swing adsorption.

use sf_expr::{ConstraintBlock, Expr, VariableStore};
use sf_substances::{ZEOLITE_HEAT_CAPACITY, psa_beta};

use crate::error::UnitResult;
use crate::separator::SeparatorPorts;
use crate::traits::{Attribute, Attributes, UnitOperation};
use sf_core::VarId;
use sf_core::constants::ZERO_CELSIUS_K;

/// Maximum PSA feed pressure [bar].
pub const PSA_MAX_INLET_PRESSURE: f64 = 30.0;

fn separator_attributes(ports: &SeparatorPorts) -> Attributes {
    vec![
        ("i_in", Attribute::Stream(ports.inlet.index)),
        ("i_prod", Attribute::Stream(ports.product.index)),
        ("i_bp", Attribute::Stream(ports.byproduct.index)),
        ("k_prod", Attribute::Substance(ports.key)),
    ]
}

/// Pressure swing adsorption.
///
/// ```text
/// p_prod / p_in = y_in,key · (1 - ζ / (1 - β_key))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Psa {
    pub name: String,
    pub ports: SeparatorPorts,
    beta: f64,
}

impl Psa {
    /// Fails for key components without a tabulated β.
    pub fn new(name: impl Into<String>, ports: SeparatorPorts) -> UnitResult<Self> {
        let beta = psa_beta(ports.key)?;
        Ok(Self {
            name: name.into(),
            ports,
            beta,
        })
    }
}

impl UnitOperation for Psa {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Pressure Swing Adsorption"
    }

    fn attributes(&self) -> Attributes {
        separator_attributes(&self.ports)
    }

    fn build(&self, _vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let SeparatorPorts {
            inlet: i,
            product: p,
            key,
            ..
        } = self.ports;
        let mut block = ConstraintBlock::new(self.name.as_str());
        self.ports.add_to(&mut block);

        block.add_le("psa_p_lim", i.p(), PSA_MAX_INLET_PRESSURE);
        block.add_eq(
            "psa_a23",
            p.p() / i.p(),
            i.y(key) * (1.0 - self.ports.zeta() / (1.0 - self.beta)),
        );
        self.ports.add_pure_product(&mut block, "psa");
        block.add_eq("psa_t_prod", p.t(), i.t());
        Ok(block)
    }
}

/// Operating constants of the TSA model.
pub mod tsa {
    use super::ZERO_CELSIUS_K;

    /// Adsorption temperature [K].
    pub const T_ADSORPTION: f64 = 50.0 + ZERO_CELSIUS_K;
    /// Desorption temperature [K].
    pub const T_DESORPTION: f64 = 250.0 + ZERO_CELSIUS_K;
    /// Loading of saturated sorbent [kg/kg].
    pub const LOADING_RICH: f64 = 0.02;
    /// Loading of regenerated sorbent [kg/kg].
    pub const LOADING_LEAN: f64 = 0.005;
    pub const MAX_RECOVERY: f64 = 0.9;
}

/// Sorbent-side variables of a TSA unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SorbentVars {
    /// Regeneration heat [kW].
    pub heat: VarId,
    /// Sorbent mass flow [kg/s].
    pub mass_flow: VarId,
    pub loading_rich: VarId,
    pub loading_lean: VarId,
}

/// Temperature swing adsorption on zeolite.
#[derive(Debug, Clone, PartialEq)]
pub struct Tsa {
    pub name: String,
    pub ports: SeparatorPorts,
    pub sorbent: SorbentVars,
}

impl Tsa {
    pub fn new(name: impl Into<String>, ports: SeparatorPorts, sorbent: SorbentVars) -> Self {
        Self {
            name: name.into(),
            ports,
            sorbent,
        }
    }
}

impl UnitOperation for Tsa {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Temperature Swing Adsorption"
    }

    fn attributes(&self) -> Attributes {
        separator_attributes(&self.ports)
    }

    fn build(&self, _vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let SeparatorPorts {
            inlet: i,
            product: p,
            byproduct: b,
            key,
            ..
        } = self.ports;
        let s = &self.sorbent;
        let m_s = Expr::var(s.mass_flow);
        let mut block = ConstraintBlock::new(self.name.as_str());
        self.ports.add_to(&mut block);

        block.add_le("tsa_prod_rec_upper", self.ports.zeta(), tsa::MAX_RECOVERY);
        block.add_eq(
            "tsa_q",
            0.0,
            Expr::var(s.heat)
                - ZEOLITE_HEAT_CAPACITY
                    * m_s.clone()
                    * 1000.0
                    * (tsa::T_DESORPTION - tsa::T_ADSORPTION),
        );
        block.add_eq(
            "tsa_mb",
            i.component_flow(key) - b.component_flow(key),
            1.0 / key.molar_weight()
                * m_s
                * 1000.0
                * (Expr::var(s.loading_rich) - Expr::var(s.loading_lean)),
        );
        block.add_eq("tsa_x_rich", Expr::var(s.loading_rich), tsa::LOADING_RICH);
        block.add_eq("tsa_x_lean", Expr::var(s.loading_lean), tsa::LOADING_LEAN);
        block.add_eq("tsa_temp_in", i.t(), tsa::T_ADSORPTION);
        block.add_eq("tsa_temp_out", p.t(), tsa::T_DESORPTION);
        block.add_eq("tsa_isobar", p.p(), i.p());
        self.ports.add_pure_product(&mut block, "tsa");
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{State, pure, stream};
    use sf_core::Tolerances;
    use sf_expr::Bounds;
    use sf_substances::{Substance, SubstanceMap};

    fn ports(vars: &mut VariableStore, key: Substance) -> SeparatorPorts {
        SeparatorPorts {
            inlet: stream(vars, 1),
            product: stream(vars, 2),
            byproduct: stream(vars, 3),
            recovery: vars.add("zeta", Bounds::unit_interval(), 0.0).unwrap(),
            key,
        }
    }

    /// Inlet: 100 mol/s of 60 % H2 / 40 % CO, 80 % H2 recovery.
    fn set_h2_split(vars: &mut VariableStore, ports: &SeparatorPorts, t_prod: f64, p_prod: f64) {
        let mut y_in = SubstanceMap::default();
        y_in[Substance::H2] = 0.6;
        y_in[Substance::CO] = 0.4;
        let mut y_bp = SubstanceMap::default();
        y_bp[Substance::H2] = 12.0 / 52.0;
        y_bp[Substance::CO] = 40.0 / 52.0;
        State::new(100.0, 320.0, 20.0, y_in).apply(vars, &ports.inlet);
        State::new(48.0, t_prod, p_prod, pure(Substance::H2)).apply(vars, &ports.product);
        State::new(52.0, 320.0, 20.0, y_bp).apply(vars, &ports.byproduct);
        vars.set_value(ports.recovery, 0.8).unwrap();
    }

    #[test]
    fn psa_point_is_feasible() {
        let mut vars = VariableStore::new();
        let ports = ports(&mut vars, Substance::H2);
        let p_prod = 20.0 * 0.6 * (1.0 - 0.8 / (1.0 - 0.02));
        set_h2_split(&mut vars, &ports, 320.0, p_prod);

        let unit = Psa::new("PSA1", ports).unwrap();
        let block = unit.build(&vars).unwrap();
        let values = vars.values();
        let violated: Vec<_> = block.violated(&values, Tolerances::feasibility()).collect();
        assert!(violated.is_empty(), "{violated:?}");
        assert_eq!(unit.attributes()[3], ("k_prod", Attribute::Substance(Substance::H2)));
    }

    #[test]
    fn psa_rejects_untabulated_key() {
        let mut vars = VariableStore::new();
        let ports = ports(&mut vars, Substance::CO);
        assert!(Psa::new("PSA1", ports).is_err());
    }

    #[test]
    fn psa_feed_pressure_cap() {
        let mut vars = VariableStore::new();
        let ports = ports(&mut vars, Substance::H2);
        vars.set_value(ports.inlet.pressure, 35.0).unwrap();
        let block = Psa::new("PSA1", ports).unwrap().build(&vars).unwrap();
        let values = vars.values();
        assert!(
            !block
                .get("psa_p_lim")
                .unwrap()
                .is_satisfied(&values, Tolerances::feasibility())
        );
    }

    #[test]
    fn tsa_point_is_feasible() {
        let mut vars = VariableStore::new();
        let ports = ports(&mut vars, Substance::H2);
        set_h2_split(&mut vars, &ports, tsa::T_DESORPTION, 20.0);
        let sorbent = SorbentVars {
            heat: vars.add("q", Bounds::new(-5000.0, 10_000.0), 0.0).unwrap(),
            mass_flow: vars.add("m_s", Bounds::new(0.0, 100.0), 0.0).unwrap(),
            loading_rich: vars.add("X_rich", Bounds::new(0.0, 10.0), 0.0).unwrap(),
            loading_lean: vars.add("X_lean", Bounds::new(0.0, 10.0), 0.0).unwrap(),
        };
        vars.set_value(ports.inlet.temperature, tsa::T_ADSORPTION).unwrap();
        vars.set_value(ports.byproduct.temperature, tsa::T_ADSORPTION).unwrap();
        // 48 mol/s H2 adsorbed = 1/0.002 · m_s · 1000 · 0.015
        let m_s = 48.0 * 0.002 / 1000.0 / 0.015;
        vars.set_value(sorbent.mass_flow, m_s).unwrap();
        vars.set_value(sorbent.loading_rich, 0.02).unwrap();
        vars.set_value(sorbent.loading_lean, 0.005).unwrap();
        vars.set_value(sorbent.heat, 0.001 * m_s * 1000.0 * 200.0).unwrap();

        let block = Tsa::new("TSA1", ports, sorbent).build(&vars).unwrap();
        let values = vars.values();
        let violated: Vec<_> = block.violated(&values, Tolerances::feasibility()).collect();
        assert!(violated.is_empty(), "{violated:?}");
    }
}
