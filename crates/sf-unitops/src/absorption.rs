//! Chemical absorption (amine scrubbing).

use sf_expr::{ConstraintBlock, Expr, VariableStore};

use crate::error::UnitResult;
use crate::separator::SeparatorPorts;
use crate::traits::{Attribute, Attributes, UnitOperation};
use sf_core::VarId;
use sf_core::constants::ZERO_CELSIUS_K;

/// Absorber feed temperature [K].
pub const CCA_T_ABSORPTION: f64 = 40.0 + ZERO_CELSIUS_K;
/// Stripper product temperature [K].
pub const CCA_T_DESORPTION: f64 = 120.0 + ZERO_CELSIUS_K;
/// Absorber pressure [bar].
pub const CCA_PRESSURE: f64 = 1.5;
/// Regeneration heat [MJ/kg key component].
pub const CCA_SPECIFIC_HEAT: f64 = 4200.0 / 1000.0;
pub const CCA_MAX_RECOVERY: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct Cca {
    pub name: String,
    pub ports: SeparatorPorts,
    /// Regeneration heat [kW].
    pub heat: VarId,
}

impl Cca {
    pub fn new(name: impl Into<String>, ports: SeparatorPorts, heat: VarId) -> Self {
        Self {
            name: name.into(),
            ports,
            heat,
        }
    }
}

impl UnitOperation for Cca {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Chemical Absorption"
    }

    fn attributes(&self) -> Attributes {
        vec![
            ("i_in", Attribute::Stream(self.ports.inlet.index)),
            ("i_prod", Attribute::Stream(self.ports.product.index)),
            ("i_bp", Attribute::Stream(self.ports.byproduct.index)),
            ("k_prod", Attribute::Substance(self.ports.key)),
        ]
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

        block.add_eq(
            "cca_heat",
            Expr::var(self.heat),
            CCA_SPECIFIC_HEAT * p.n() * key.molar_weight(),
        );
        block.add_eq("cca_temp_in", i.t(), CCA_T_ABSORPTION);
        block.add_eq("cca_temp_out", p.t(), CCA_T_DESORPTION);
        block.add_eq("cca_p_in", i.p(), CCA_PRESSURE);
        block.add_eq("cca_p_prod", p.p(), i.p());
        self.ports.add_pure_product(&mut block, "cca");
        block.add_le("cca_prod_rec", self.ports.zeta(), CCA_MAX_RECOVERY);
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

    #[test]
    fn co2_capture_point() {
        let mut vars = VariableStore::new();
        let ports = SeparatorPorts {
            inlet: stream(&mut vars, 1),
            product: stream(&mut vars, 2),
            byproduct: stream(&mut vars, 3),
            recovery: vars.add("zeta", Bounds::unit_interval(), 0.0).unwrap(),
            key: Substance::CO2,
        };
        let q = vars.add("q", Bounds::new(-5000.0, 10_000.0), 0.0).unwrap();

        let mut y_in = SubstanceMap::default();
        y_in[Substance::CO2] = 0.2;
        y_in[Substance::N2] = 0.8;
        let mut y_bp = SubstanceMap::default();
        y_bp[Substance::CO2] = 2.0 / 82.0;
        y_bp[Substance::N2] = 80.0 / 82.0;
        State::new(100.0, CCA_T_ABSORPTION, 1.5, y_in).apply(&mut vars, &ports.inlet);
        State::new(18.0, CCA_T_DESORPTION, 1.5, pure(Substance::CO2)).apply(&mut vars, &ports.product);
        State::new(82.0, CCA_T_ABSORPTION, 1.5, y_bp).apply(&mut vars, &ports.byproduct);
        vars.set_value(ports.recovery, 0.9).unwrap();
        vars.set_value(q, 4.2 * 18.0 * 0.044).unwrap();

        let block = Cca::new("CCA1", ports, q).build(&vars).unwrap();
        let values = vars.values();
        let violated: Vec<_> = block.violated(&values, Tolerances::feasibility()).collect();
        assert!(violated.is_empty(), "{violated:?}");

        vars.set_value(ports.recovery, 0.95).unwrap();
        let values = vars.values();
        assert!(
            block
                .violated(&values, Tolerances::feasibility())
                .any(|c| c.name == "cca_prod_rec")
        );
    }
}
