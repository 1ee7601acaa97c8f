//! Membrane separation process.

use sf_expr::{ConstraintBlock, VariableStore};
use sf_substances::{Substance, SubstanceMap, msp_alpha};

use crate::error::UnitResult;
use crate::separator::SeparatorPorts;
use crate::traits::{Attribute, Attributes, UnitOperation};

/// Maximum feed pressure [bar].
pub const MSP_MAX_INLET_PRESSURE: f64 = 14.0;
/// Permeate pressure [bar].
pub const MSP_PERMEATE_PRESSURE: f64 = 1.0;
/// Lower recovery bound; keeps the permeate flow away from zero.
pub const MSP_MIN_RECOVERY: f64 = 0.1;

/// Single-stage membrane, permeate as product.
///
/// Pressure ratio and recovery are linked through the key-component balance,
/// and every other non-water component permeates according to its relative
/// permeability α(k/key).
#[derive(Debug, Clone, PartialEq)]
pub struct Msp {
    pub name: String,
    pub ports: SeparatorPorts,
    alpha: SubstanceMap<f64>,
}

impl Msp {
    /// Fails for key components without a permeability table.
    pub fn new(name: impl Into<String>, ports: SeparatorPorts) -> UnitResult<Self> {
        let mut alpha = SubstanceMap::default();
        for k in Substance::ALL {
            alpha[k] = msp_alpha(k, ports.key)?;
        }
        Ok(Self {
            name: name.into(),
            ports,
            alpha,
        })
    }

    pub fn alpha(&self, k: Substance) -> f64 {
        self.alpha[k]
    }
}

impl UnitOperation for Msp {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Membrane Separation Process"
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
        let zeta = self.ports.zeta();
        let mut block = ConstraintBlock::new(self.name.as_str());
        self.ports.add_to(&mut block);

        block.add_le("msp_p_lim_in", i.p(), MSP_MAX_INLET_PRESSURE);
        block.add_eq("msp_p_lim_out", p.p(), MSP_PERMEATE_PRESSURE);
        block.add_ge("msp_func1", i.p(), p.p());
        block.add_ge("msp_func2", zeta.clone(), MSP_MIN_RECOVERY);
        block.add_eq(
            "msp_a18",
            p.p() / i.p(),
            (i.y(key) / p.y(key)) * (1.0 - zeta.clone()) / (1.0 - i.y(key) * zeta.clone()),
        );

        for k in Substance::balanced().filter(|&k| k != key) {
            let alpha = self.alpha[k];
            let permeate = alpha * zeta.clone() * i.y(k) * i.n() * i.y(key);
            let driving = i.y(key)
                * (2.0 - zeta.clone() - alpha * zeta.clone() / (1.0 - i.y(key) * zeta.clone()))
                - 2.0 * p.y(key) * p.p() * (1.0 - alpha) / i.p();
            block.add_eq(
                format!("msp_a20[{k}]"),
                p.component_flow(k),
                permeate / driving,
            );
        }
        block.add_eq("msp_t_prod", p.t(), i.t());
        Ok(block)
    }
}
