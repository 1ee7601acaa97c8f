//! Two-inlet adiabatic mixer.

use sf_expr::{ConstraintBlock, VariableStore};
use sf_substances::Substance;

use crate::error::UnitResult;
use crate::stream::Stream;
use crate::traits::{Attribute, Attributes, UnitOperation};

/// How the outlet pressure of a mixer is tied to its inlets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixerPressure {
    /// Outlet equals whichever inlet has the lower pressure *at build time*.
    /// The choice is structural and does not follow the solution.
    #[default]
    LowerAtBuild,
    /// Outlet equals the first inlet.
    First,
    /// Outlet equals the second inlet.
    Second,
    /// Outlet may not exceed either inlet.
    BoundedByBoth,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mixer {
    pub name: String,
    pub inlets: [Stream; 2],
    pub outlet: Stream,
    pub pressure: MixerPressure,
}

impl Mixer {
    pub fn new(name: impl Into<String>, inlet_1: Stream, inlet_2: Stream, outlet: Stream) -> Self {
        Self {
            name: name.into(),
            inlets: [inlet_1, inlet_2],
            outlet,
            pressure: MixerPressure::default(),
        }
    }

    pub fn with_pressure(mut self, pressure: MixerPressure) -> Self {
        self.pressure = pressure;
        self
    }
}

impl UnitOperation for Mixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_label(&self) -> &'static str {
        "Mixer"
    }

    fn attributes(&self) -> Attributes {
        vec![
            ("i_in_1", Attribute::Stream(self.inlets[0].index)),
            ("i_in_2", Attribute::Stream(self.inlets[1].index)),
            ("i_out", Attribute::Stream(self.outlet.index)),
        ]
    }

    fn build(&self, vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        let [a, b] = &self.inlets;
        let o = &self.outlet;
        let mut block = ConstraintBlock::new(self.name.as_str());

        block.add_eq("mix_mb", o.n(), a.n() + b.n());
        for k in Substance::balanced() {
            block.add_eq(
                format!("mix_cb[{k}]"),
                o.component_flow(k),
                a.component_flow(k) + b.component_flow(k),
            );
        }
        block.add_eq(
            "mix_eb",
            o.enthalpy(vars)? * o.n(),
            a.enthalpy(vars)? * a.n() + b.enthalpy(vars)? * b.n(),
        );
        block.add_eq("mix_cc", o.y(Substance::H2O), o.water_by_closure());

        match self.pressure {
            MixerPressure::LowerAtBuild => {
                let lower = if vars.value(a.pressure)? >= vars.value(b.pressure)? {
                    b
                } else {
                    a
                };
                block.add_eq("mix_p", lower.p(), o.p());
            }
            MixerPressure::First => block.add_eq("mix_p", a.p(), o.p()),
            MixerPressure::Second => block.add_eq("mix_p", b.p(), o.p()),
            MixerPressure::BoundedByBoth => {
                block.add_le("mix_p_1", o.p(), a.p());
                block.add_le("mix_p_2", o.p(), b.p());
            }
        }
        Ok(block)
    }
}
