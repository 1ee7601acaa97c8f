//! Closed set of unit operations.

use sf_expr::{ConstraintBlock, VariableStore};

use crate::absorption::Cca;
use crate::adsorption::{Psa, Tsa};
use crate::compressor::Compressor;
use crate::error::UnitResult;
use crate::heat_exchanger::HeatExchanger;
use crate::membrane::Msp;
use crate::mixer::Mixer;
use crate::reactor::Reactor;
use crate::splitter::Splitter;
use crate::traits::{Attributes, UnitOperation};

#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Compressor(Compressor),
    HeatExchanger(HeatExchanger),
    Mixer(Mixer),
    Splitter(Splitter),
    Psa(Psa),
    Tsa(Tsa),
    Msp(Msp),
    Cca(Cca),
    Reactor(Reactor),
}

impl Unit {
    fn inner(&self) -> &dyn UnitOperation {
        match self {
            Unit::Compressor(u) => u,
            Unit::HeatExchanger(u) => u,
            Unit::Mixer(u) => u,
            Unit::Splitter(u) => u,
            Unit::Psa(u) => u,
            Unit::Tsa(u) => u,
            Unit::Msp(u) => u,
            Unit::Cca(u) => u,
            Unit::Reactor(u) => u,
        }
    }
}

impl UnitOperation for Unit {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn type_label(&self) -> &'static str {
        self.inner().type_label()
    }

    fn attributes(&self) -> Attributes {
        self.inner().attributes()
    }

    fn build(&self, vars: &VariableStore) -> UnitResult<ConstraintBlock> {
        self.inner().build(vars)
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Unit {
            fn from(u: $variant) -> Self {
                Unit::$variant(u)
            }
        })*
    };
}

impl_from!(Compressor, HeatExchanger, Mixer, Splitter, Psa, Tsa, Msp, Cca, Reactor);
