//! Stream splitter.

use sf_expr::{ConstraintBlock, Expr, VariableStore};
use sf_substances::Substance;

use crate::error::UnitResult;
use crate::stream::Stream;
use crate::traits::{Attribute, Attributes, UnitOperation};
use sf_core::VarId;

/// Divides one stream into two outlets of identical state.
///
/// `n_prod = split · n_in`; the by-product takes the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    pub name: String,
    pub inlet: Stream,
    pub product: Stream,
    pub byproduct: Stream,
    pub split: VarId,
}

impl Splitter {
    pub fn new(
        name: impl Into<String>,
        inlet: Stream,
        product: Stream,
        byproduct: Stream,
        split: VarId,
    ) -> Self {
        Self {
            name: name.into(),
            inlet,
            product,
            byproduct,
            split,
        }
    }
}

impl UnitOperation for Splitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Splitter"
    }

    fn attributes(&self) -> Attributes {
        vec![
            ("i_in", Attribute::Stream(self.inlet.index)),
            ("i_prod", Attribute::Stream(self.product.index)),
            ("i_bp", Attribute::Stream(self.byproduct.index)),
        ]
    }

    fn build(&self, _vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let (i, p, b) = (&self.inlet, &self.product, &self.byproduct);
        let mut block = ConstraintBlock::new(self.name.as_str());

        block.add_eq("split_p_prod", i.p(), p.p());
        block.add_eq("split_t_prod", i.t(), p.t());
        block.add_eq("split_p_bp", i.p(), b.p());
        block.add_eq("split_t_bp", i.t(), b.t());
        block.add_eq("split_split", i.n() * Expr::var(self.split), p.n());
        block.add_eq("split_mb", i.n(), b.n() + p.n());
        for k in Substance::balanced() {
            block.add_eq(format!("split_y[{k}]"), i.y(k), p.y(k));
            block.add_eq(format!("split_cb[{k}]"), i.y(k), b.y(k));
        }
        block.add_eq("split_cc_prod", 1.0, p.fraction_sum());
        block.add_eq("split_cc_bp", 1.0, b.fraction_sum());
        Ok(block)
    }
}
