//! Material streams as bundles of decision variables.

use std::fmt;

use serde::{Deserialize, Serialize};
use sf_expr::{Bounds, Expr, VariableStore};
use sf_substances::{Substance, SubstanceMap, shomate};

use crate::error::UnitResult;
use sf_core::VarId;

/// Pressure range of every stream [bar].
pub const PRESSURE_BOUNDS: Bounds = Bounds::new(1.0, 50.0);
/// Temperature range of every stream [K].
pub const TEMPERATURE_BOUNDS: Bounds = Bounds::new(200.0, 2000.0);
/// Molar flow range of every stream [mol/s].
pub const FLOW_BOUNDS: Bounds = Bounds::new(0.0, 70_000.0);

const PRESSURE_INIT: f64 = 1.0;
const TEMPERATURE_INIT: f64 = 300.0;
const FLOW_INIT: f64 = 10_000.0;
const FRACTION_INIT: f64 = 0.0;

/// Author-assigned stream label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamIndex(pub u32);

impl fmt::Display for StreamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StreamIndex {
    fn from(i: u32) -> Self {
        StreamIndex(i)
    }
}

/// How a stream's state is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    /// Determined by the solution.
    Free,
    /// Flow, temperature, pressure and composition pinned.
    FixedInitial,
    /// Temperature, pressure and composition pinned; flow sized by the optimizer.
    FixedUtility,
}

impl StreamKind {
    pub fn label(&self) -> &'static str {
        match self {
            StreamKind::Free => "Free",
            StreamKind::FixedInitial => "Fixed (initial)",
            StreamKind::FixedUtility => "Fixed (utility)",
        }
    }

    pub fn is_fixed(&self) -> bool {
        !matches!(self, StreamKind::Free)
    }
}

/// Handles to the state variables of one stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stream {
    pub index: StreamIndex,
    /// Molar flow [mol/s].
    pub flow: VarId,
    /// Temperature [K].
    pub temperature: VarId,
    /// Pressure [bar].
    pub pressure: VarId,
    pub fractions: SubstanceMap<VarId>,
}

impl Stream {
    /// Allocate a fresh variable bundle for `index`.
    pub fn allocate(index: StreamIndex, vars: &mut VariableStore) -> UnitResult<Self> {
        let pressure = vars.add(format!("p[{index}]"), PRESSURE_BOUNDS, PRESSURE_INIT)?;
        let temperature = vars.add(format!("t[{index}]"), TEMPERATURE_BOUNDS, TEMPERATURE_INIT)?;
        let flow = vars.add(format!("n[{index}]"), FLOW_BOUNDS, FLOW_INIT)?;
        let mut fractions = SubstanceMap::from_fn(|_| flow);
        for k in Substance::ALL {
            fractions[k] = vars.add(
                format!("y[{index},{k}]"),
                Bounds::unit_interval(),
                FRACTION_INIT,
            )?;
        }
        Ok(Self {
            index,
            flow,
            temperature,
            pressure,
            fractions,
        })
    }

    pub fn n(&self) -> Expr {
        Expr::var(self.flow)
    }

    pub fn t(&self) -> Expr {
        Expr::var(self.temperature)
    }

    pub fn p(&self) -> Expr {
        Expr::var(self.pressure)
    }

    pub fn y(&self, k: Substance) -> Expr {
        Expr::var(self.fractions[k])
    }

    /// Component molar flow n·y_k.
    pub fn component_flow(&self, k: Substance) -> Expr {
        self.n() * self.y(k)
    }

    /// Σ_k y_k over the full substance set.
    pub fn fraction_sum(&self) -> Expr {
        Expr::sum(Substance::ALL.map(|k| self.y(k)))
    }

    /// 1 - Σ y_k over every substance except water.
    pub fn water_by_closure(&self) -> Expr {
        1.0 - Expr::sum(Substance::balanced().map(|k| self.y(k)))
    }

    /// Mixture molar enthalpy [MJ/mol]. The Shomate range is taken from the
    /// current temperature value.
    pub fn enthalpy(&self, vars: &VariableStore) -> UnitResult<Expr> {
        let t_now = vars.value(self.temperature)?;
        Ok(shomate::enthalpy_expr(self.temperature, t_now, &self.fractions))
    }

    /// Heat-capacity ratio cp/cv of the mixture.
    pub fn kappa(&self, vars: &VariableStore) -> UnitResult<Expr> {
        let t_now = vars.value(self.temperature)?;
        Ok(shomate::kappa_expr(self.temperature, t_now, &self.fractions))
    }

    /// Every variable of the bundle.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        [self.flow, self.temperature, self.pressure]
            .into_iter()
            .chain(self.fractions.iter().map(|(_, &id)| id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_uses_stream_bounds() {
        let mut vars = VariableStore::new();
        let s = Stream::allocate(StreamIndex(7), &mut vars).unwrap();
        assert_eq!(vars.len(), 10);
        let n = vars.get(s.flow).unwrap();
        assert_eq!(n.name, "n[7]");
        assert_eq!(n.bounds, FLOW_BOUNDS);
        assert_eq!(n.value, 10_000.0);
        assert_eq!(vars.value(s.temperature).unwrap(), 300.0);
        assert_eq!(vars.get(s.fractions[Substance::H2O]).unwrap().name, "y[7,H2O]");
        assert_eq!(s.variables().count(), 10);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(StreamKind::FixedUtility.label(), "Fixed (utility)");
        assert!(!StreamKind::Free.is_fixed());
    }

    #[test]
    fn closure_expressions() {
        let mut vars = VariableStore::new();
        let s = Stream::allocate(StreamIndex(1), &mut vars).unwrap();
        vars.set_value(s.fractions[Substance::CO], 0.4).unwrap();
        vars.set_value(s.fractions[Substance::H2], 0.5).unwrap();
        let values = vars.values();
        assert!((s.water_by_closure().eval(&values) - 0.1).abs() < 1e-12);
        assert!((s.fraction_sum().eval(&values) - 0.9).abs() < 1e-12);
    }
}
