//! Conversion-based reactor with one or two reactions in series.

use sf_expr::{ConstraintBlock, Expr, VariableStore};
use sf_substances::{Reaction, Substance};
use tracing::warn;

use crate::error::UnitResult;
use crate::stream::Stream;
use crate::traits::{Attribute, Attributes, EFFICIENCY, UnitOperation};
use sf_core::VarId;

/// One reaction and its conversion variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionStep {
    pub reaction: Reaction,
    /// Conversion of the key component.
    pub conversion: VarId,
}

impl ReactionStep {
    pub fn new(reaction: Reaction, conversion: VarId) -> Self {
        Self {
            reaction,
            conversion,
        }
    }

    fn x(&self) -> Expr {
        Expr::var(self.conversion)
    }

    /// ν_k / ν_key
    fn relative(&self, k: Substance) -> f64 {
        let r = self.reaction;
        r.coefficient(k) / r.coefficient(r.key_component())
    }
}

/// Temperature/pressure window and fixed conversions of a reaction set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatingWindow {
    pub t_in: (Option<f64>, Option<f64>),
    pub t_out: (Option<f64>, Option<f64>),
    /// Fixed outlet pressure [bar].
    pub p_out: Option<f64>,
    pub isobaric: bool,
    pub adiabatic: bool,
    pub conversions: [Option<f64>; 2],
}

impl OperatingWindow {
    /// Window for a reaction pairing, keyed on the first reaction.
    pub fn for_reactions(first: Reaction, second: Option<Reaction>) -> Option<Self> {
        match (first, second) {
            (Reaction::Wgsr, _) => Some(Self {
                t_in: (Some(600.0), Some(800.0)),
                t_out: (Some(600.0), Some(800.0)),
                conversions: [Some(0.96), None],
                ..Self::default()
            }),
            (Reaction::Cdr, _) => Some(Self {
                t_in: (Some(1143.0), Some(1313.0)),
                t_out: (Some(1143.0), Some(1313.0)),
                p_out: Some(1.0),
                conversions: [Some(0.9), None],
                ..Self::default()
            }),
            (Reaction::Por, _) => Some(Self {
                t_in: (Some(1000.0), None),
                adiabatic: true,
                conversions: [Some(0.95), None],
                ..Self::default()
            }),
            (Reaction::Smr, Some(Reaction::Wgsr)) => Some(Self {
                t_in: (Some(1153.0), Some(1300.0)),
                t_out: (Some(1153.0), Some(1300.0)),
                isobaric: true,
                conversions: [Some(0.815), Some(0.402)],
                ..Self::default()
            }),
            (Reaction::Smr, _) => None,
        }
    }

    fn add_to(&self, block: &mut ConstraintBlock, r: &Reactor) {
        let (i, o) = (&r.inlet, &r.outlet);
        let (lo, hi) = self.t_in;
        if let Some(lo) = lo {
            block.add_ge("react_t_in_lb", i.t(), lo);
        }
        if let Some(hi) = hi {
            block.add_le("react_t_in_ub", i.t(), hi);
        }
        let (lo, hi) = self.t_out;
        if let Some(lo) = lo {
            block.add_ge("react_t_out_lb", o.t(), lo);
        }
        if let Some(hi) = hi {
            block.add_le("react_t_out_ub", o.t(), hi);
        }
        if let Some(p) = self.p_out {
            block.add_eq("react_p", o.p(), p);
        }
        if self.isobaric {
            block.add_eq("react_p_out", o.p(), i.p());
        }
        if self.adiabatic {
            block.add_eq("react_q", Expr::var(r.heat), 0.0);
        }
        if let Some(x) = self.conversions[0] {
            block.add_eq("react_conversion1", r.first.x(), x);
        }
        if let (Some(x), Some(step)) = (self.conversions[1], r.second) {
            block.add_eq("react_conversion2", step.x(), x);
        }
    }
}

/// Steady-state reactor driven by fixed conversions.
///
/// With two reactions the second acts on the key-component amount left by the
/// first. Heat input enters the energy balance with efficiency 0.7, for
/// reaction pairs as well: an SMR + WGSR reactor is fired, not adiabatic.
#[derive(Debug, Clone, PartialEq)]
pub struct Reactor {
    pub name: String,
    pub inlet: Stream,
    pub outlet: Stream,
    /// Heat input [kW].
    pub heat: VarId,
    pub first: ReactionStep,
    pub second: Option<ReactionStep>,
}

impl Reactor {
    pub fn new(
        name: impl Into<String>,
        inlet: Stream,
        outlet: Stream,
        heat: VarId,
        first: ReactionStep,
        second: Option<ReactionStep>,
    ) -> Self {
        Self {
            name: name.into(),
            inlet,
            outlet,
            heat,
            first,
            second,
        }
    }

    pub fn reactions(&self) -> impl Iterator<Item = Reaction> + '_ {
        std::iter::once(self.first.reaction).chain(self.second.map(|s| s.reaction))
    }

    /// Moles of key component converted per mole of feed, for each step.
    fn extents(&self) -> (Expr, Option<Expr>) {
        let y_in = |k| self.inlet.y(k);
        let key1 = self.first.reaction.key_component();
        let ext1 = self.first.x() * y_in(key1);
        let ext2 = self.second.map(|step| {
            let key2 = step.reaction.key_component();
            let remaining =
                y_in(key2) - self.first.relative(key2) * self.first.x() * y_in(key1);
            step.x() * remaining
        });
        (ext1, ext2)
    }
}

impl UnitOperation for Reactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Reactor"
    }

    fn attributes(&self) -> Attributes {
        let mut attrs = vec![
            ("i_in", Attribute::Stream(self.inlet.index)),
            ("i_out", Attribute::Stream(self.outlet.index)),
            ("reaction 1", Attribute::Reaction(self.first.reaction)),
        ];
        if let Some(step) = self.second {
            attrs.push(("reaction 2", Attribute::Reaction(step.reaction)));
        }
        attrs
    }

    fn build(&self, vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let (i, o) = (&self.inlet, &self.outlet);
        let mut block = ConstraintBlock::new(self.name.as_str());
        let (ext1, ext2) = self.extents();
        let r1 = self.first.reaction;

        // Closure over the full substance set; water is balanced implicitly.
        block.add_eq("react_cc", 1.0, o.fraction_sum());

        let mut growth = 1.0 + r1.mole_change() * ext1.clone();
        let mut released = ext1.clone() * r1.enthalpy();
        if let (Some(step), Some(ext2)) = (self.second, ext2.clone()) {
            growth = growth + step.reaction.mole_change() * ext2.clone();
            released = released + ext2 * step.reaction.enthalpy();
        }
        block.add_eq("react_mb", i.n() * growth, o.n());

        for k in Substance::balanced() {
            let mut y = i.y(k) - self.first.relative(k) * ext1.clone();
            if let (Some(step), Some(ext2)) = (self.second, ext2.clone()) {
                y = y - step.relative(k) * ext2;
            }
            block.add_eq(format!("react_cb[{k}]"), o.component_flow(k), i.n() * y);
        }

        block.add_eq(
            "react_eb",
            i.n() * (i.enthalpy(vars)? - released) + EFFICIENCY * Expr::var(self.heat),
            o.enthalpy(vars)? * o.n(),
        );

        let second = self.second.map(|s| s.reaction);
        match OperatingWindow::for_reactions(r1, second) {
            Some(window) => {
                if second.is_some() && window.conversions[1].is_none() {
                    warn!(reactor = %self.name, "second conversion left unconstrained");
                }
                window.add_to(&mut block, self);
            }
            None => warn!(
                reactor = %self.name,
                reactions = ?self.reactions().collect::<Vec<_>>(),
                "no operating window for reaction set"
            ),
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{State, stream};
    use sf_core::Tolerances;
    use sf_expr::Bounds;
    use sf_substances::{SubstanceMap, shomate};

    struct Rig {
        vars: VariableStore,
        inlet: Stream,
        outlet: Stream,
        heat: VarId,
        x1: VarId,
        x2: VarId,
    }

    fn rig() -> Rig {
        let mut vars = VariableStore::new();
        let inlet = stream(&mut vars, 1);
        let outlet = stream(&mut vars, 2);
        let heat = vars.add("q[R1]", Bounds::new(-5000.0, 10_000.0), 0.0).unwrap();
        let x1 = vars.add("conversion[R1a]", Bounds::unit_interval(), 0.0).unwrap();
        let x2 = vars.add("conversion[R1b]", Bounds::unit_interval(), 0.0).unwrap();
        Rig {
            vars,
            inlet,
            outlet,
            heat,
            x1,
            x2,
        }
    }

    #[test]
    fn dry_reforming_point() {
        let mut r = rig();
        let mut y_in = SubstanceMap::default();
        y_in[Substance::CO2] = 0.5;
        y_in[Substance::CH4] = 0.5;
        // 45 mol/s CH4 converted.
        let mut y_out = SubstanceMap::default();
        y_out[Substance::CO] = 90.0 / 190.0;
        y_out[Substance::H2] = 90.0 / 190.0;
        y_out[Substance::CO2] = 5.0 / 190.0;
        y_out[Substance::CH4] = 5.0 / 190.0;
        State::new(100.0, 1200.0, 5.0, y_in).apply(&mut r.vars, &r.inlet);
        State::new(190.0, 1200.0, 1.0, y_out).apply(&mut r.vars, &r.outlet);
        r.vars.set_value(r.x1, 0.9).unwrap();
        let q = (shomate::enthalpy(1200.0, &y_out) * 190.0 - shomate::enthalpy(1200.0, &y_in) * 100.0
            + 45.0 * Reaction::Cdr.enthalpy())
            / 0.7;
        r.vars.set_value(r.heat, q).unwrap();

        let unit = Reactor::new(
            "R1",
            r.inlet,
            r.outlet,
            r.heat,
            ReactionStep::new(Reaction::Cdr, r.x1),
            None,
        );
        let block = unit.build(&r.vars).unwrap();
        let values = r.vars.values();
        let violated: Vec<_> = block.violated(&values, Tolerances::feasibility()).collect();
        assert!(violated.is_empty(), "{violated:?}");
        assert!(q > 0.0, "dry reforming is endothermic");
    }

    #[test]
    fn reforming_with_shift() {
        let mut r = rig();
        let mut y_in = SubstanceMap::default();
        y_in[Substance::CH4] = 0.25;
        y_in[Substance::H2O] = 0.75;
        let (x1, x2) = (0.815, 0.402);
        // Per 100 mol feed: SMR converts 25·x1 CH4, WGSR then converts x2 of the CO.
        let e1 = 25.0 * x1;
        let e2 = x2 * e1;
        let mut flows = SubstanceMap::<f64>::default();
        flows[Substance::CH4] = 25.0 - e1;
        flows[Substance::CO] = e1 - e2;
        flows[Substance::CO2] = e2;
        flows[Substance::H2] = 3.0 * e1 + e2;
        flows[Substance::H2O] = 75.0 - e1 - e2;
        let n_out = flows.total();
        let y_out = flows.map(|_, f| f / n_out);
        State::new(100.0, 1200.0, 20.0, y_in).apply(&mut r.vars, &r.inlet);
        State::new(n_out, 1250.0, 20.0, y_out).apply(&mut r.vars, &r.outlet);
        r.vars.set_value(r.x1, x1).unwrap();
        r.vars.set_value(r.x2, x2).unwrap();
        let released = e1 * Reaction::Smr.enthalpy() + e2 * Reaction::Wgsr.enthalpy();
        let q = (shomate::enthalpy(1250.0, &y_out) * n_out - shomate::enthalpy(1200.0, &y_in) * 100.0
            + released)
            / 0.7;
        r.vars.set_value(r.heat, q).unwrap();

        let unit = Reactor::new(
            "R1",
            r.inlet,
            r.outlet,
            r.heat,
            ReactionStep::new(Reaction::Smr, r.x1),
            Some(ReactionStep::new(Reaction::Wgsr, r.x2)),
        );
        let block = unit.build(&r.vars).unwrap();
        let values = r.vars.values();
        let violated: Vec<_> = block.violated(&values, Tolerances::feasibility()).collect();
        assert!(violated.is_empty(), "{violated:?}");
        assert_eq!(unit.attributes().len(), 4);
    }

    #[test]
    fn partial_oxidation_is_adiabatic() {
        let r = rig();
        let unit = Reactor::new(
            "R2",
            r.inlet,
            r.outlet,
            r.heat,
            ReactionStep::new(Reaction::Por, r.x1),
            None,
        );
        let block = unit.build(&r.vars).unwrap();
        assert!(block.get("react_q").is_some());
        assert!(block.get("react_t_in_ub").is_none());
        assert_eq!(block.get("react_conversion1").unwrap().rhs, Expr::Const(0.95));
    }

    #[test]
    fn unmatched_pairing_has_no_window() {
        assert!(OperatingWindow::for_reactions(Reaction::Smr, None).is_none());
        let w = OperatingWindow::for_reactions(Reaction::Wgsr, Some(Reaction::Smr)).unwrap();
        assert_eq!(w.conversions, [Some(0.96), None]);
    }
}
