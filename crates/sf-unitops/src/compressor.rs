//! Compressor model.

use sf_expr::{ConstraintBlock, Expr, VariableStore};
use sf_substances::Substance;

use crate::error::UnitResult;
use crate::stream::Stream;
use crate::traits::{Attribute, Attributes, EFFICIENCY, UnitOperation};
use sf_core::VarId;

/// Adiabatic gas compressor.
///
/// ## Model
///
/// ```text
/// T_out / T_in = (p_out / p_in)^((κ - 1) / κ)      κ from inlet state
/// w = (h_out - h_in) / η · n_in                    η = 0.7
/// ```
///
/// Flow and composition pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressor {
    pub name: String,
    pub inlet: Stream,
    pub outlet: Stream,
    /// Shaft work [kW].
    pub work: VarId,
}

impl Compressor {
    pub fn new(name: impl Into<String>, inlet: Stream, outlet: Stream, work: VarId) -> Self {
        Self {
            name: name.into(),
            inlet,
            outlet,
            work,
        }
    }
}

impl UnitOperation for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Compressor"
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

        let kappa = i.kappa(vars)?;
        let exponent = (kappa.clone() - 1.0) / kappa;
        block.add_eq("comp_istr", o.t() / i.t(), (o.p() / i.p()).powf(exponent));
        block.add_eq("comp_mb", o.n(), i.n());
        for k in Substance::balanced() {
            block.add_eq(format!("comp_cb[{k}]"), o.y(k), i.y(k));
        }
        let dh = o.enthalpy(vars)? - i.enthalpy(vars)?;
        block.add_eq("comp_eb", Expr::var(self.work), dh / EFFICIENCY * i.n());
        block.add_eq("comp_cc", o.y(Substance::H2O), o.water_by_closure());
        Ok(block)
    }
}
