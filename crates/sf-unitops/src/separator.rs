//! Shared separator sub-model used by PSA, TSA, MSP and CCA.

use sf_expr::{ConstraintBlock, Expr};
use sf_substances::Substance;

use crate::stream::Stream;
use sf_core::VarId;

/// Three-port separation: inlet split into a product enriched in `key` and a
/// by-product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatorPorts {
    pub inlet: Stream,
    pub product: Stream,
    pub byproduct: Stream,
    /// Product recovery of the key component.
    pub recovery: VarId,
    pub key: Substance,
}

impl SeparatorPorts {
    pub fn zeta(&self) -> Expr {
        Expr::var(self.recovery)
    }

    /// Balances common to every separator.
    pub(crate) fn add_to(&self, block: &mut ConstraintBlock) {
        let (i, p, b) = (&self.inlet, &self.product, &self.byproduct);

        block.add_eq("sep_mb", i.n(), p.n() + b.n());
        for k in Substance::balanced() {
            block.add_eq(
                format!("sep_cb[{k}]"),
                i.component_flow(k),
                p.component_flow(k) + b.component_flow(k),
            );
        }
        block.add_eq(
            "sep_prodrec",
            p.component_flow(self.key),
            self.zeta() * i.component_flow(self.key),
        );
        block.add_eq("sep_cc_prod", 1.0, p.fraction_sum());
        block.add_eq("sep_cc_bp", 1.0, b.fraction_sum());
        block.add_eq("sep_p_bp", i.p(), b.p());
        block.add_eq("sep_t_bp", i.t(), b.t());
    }

    /// Product contains only the key component.
    pub(crate) fn add_pure_product(&self, block: &mut ConstraintBlock, prefix: &str) {
        for k in Substance::ALL.into_iter().filter(|&k| k != self.key) {
            block.add_eq(format!("{prefix}_prod_k[{k}]"), self.product.y(k), 0.0);
        }
    }
}
