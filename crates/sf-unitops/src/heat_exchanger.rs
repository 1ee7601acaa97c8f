//! Heat exchanger model.

use sf_expr::{ConstraintBlock, Expr, VariableStore};
use sf_substances::Substance;

use crate::error::UnitResult;
use crate::stream::Stream;
use crate::traits::{Attribute, Attributes, EFFICIENCY, UnitOperation};
use sf_core::VarId;

/// Isobaric heater/cooler. Duty is `(h_out - h_in) / η · n_in`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatExchanger {
    pub name: String,
    pub inlet: Stream,
    pub outlet: Stream,
    /// Heat duty [kW]; negative for cooling.
    pub heat: VarId,
}

impl HeatExchanger {
    pub fn new(name: impl Into<String>, inlet: Stream, outlet: Stream, heat: VarId) -> Self {
        Self {
            name: name.into(),
            inlet,
            outlet,
            heat,
        }
    }
}

impl UnitOperation for HeatExchanger {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Heat Exchanger"
    }

    fn attributes(&self) -> Attributes {
        vec![
            ("i_in", Attribute::Stream(self.inlet.index)),
            ("i_out", Attribute::Stream(self.outlet.index)),
        ]
    }

    fn build(&self, vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let (i, o) = (&self.inlet, &self.outlet);
        let mut block = ConstraintBlock::new(self.name.as_str());

        block.add_eq("heatx_mb", i.n(), o.n());
        for k in Substance::balanced() {
            block.add_eq(format!("heatx_cb[{k}]"), o.y(k), i.y(k));
        }
        block.add_eq("heatx_cc", o.y(Substance::H2O), o.water_by_closure());
        let dh = o.enthalpy(vars)? - i.enthalpy(vars)?;
        block.add_eq("heatx_eb", Expr::var(self.heat), dh / EFFICIENCY * i.n());
        block.add_eq("heatx_isobar", o.p(), i.p());
        Ok(block)
    }
}
