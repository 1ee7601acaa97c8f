//! Auxiliary decision variables of units, keyed by unit name.

use sf_core::{Registry, VarId};
use sf_expr::{Bounds, Expr, VariableStore};

use crate::error::AssemblyResult;

/// Work [kW].
pub const WORK_BOUNDS: Bounds = Bounds::new(0.0, 2000.0);
/// Heat duty [kW].
pub const HEAT_BOUNDS: Bounds = Bounds::new(-5000.0, 10_000.0);
/// Recovery, conversion and split fractions.
pub const FRACTION_BOUNDS: Bounds = Bounds::unit_interval();
/// Sorbent mass flow [kg/s].
pub const SORBENT_FLOW_BOUNDS: Bounds = Bounds::new(0.0, 100.0);
/// Sorbent loading [kg/kg].
pub const LOADING_BOUNDS: Bounds = Bounds::new(0.0, 10.0);

/// Mass flow and loadings of one sorption unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SorbentHandles {
    pub mass_flow: VarId,
    pub loading_rich: VarId,
    pub loading_lean: VarId,
}

/// Index sets and variable containers for unit-level quantities.
#[derive(Debug, Clone, Default)]
pub struct UnitVariables {
    work: Registry<String, VarId>,
    heat: Registry<String, VarId>,
    recovery: Registry<String, VarId>,
    conversion: Registry<String, VarId>,
    split: Registry<String, VarId>,
    sorbent: Registry<String, SorbentHandles>,
}

fn add(
    set: &mut Registry<String, VarId>,
    kind: &'static str,
    symbol: &str,
    key: &str,
    bounds: Bounds,
    vars: &mut VariableStore,
) -> AssemblyResult<VarId> {
    let id = vars.add(format!("{symbol}[{key}]"), bounds, 0.0)?;
    Ok(*set.insert_new(kind, key.to_string(), id)?)
}

impl UnitVariables {
    pub fn add_work(&mut self, unit: &str, vars: &mut VariableStore) -> AssemblyResult<VarId> {
        add(&mut self.work, "work point", "w", unit, WORK_BOUNDS, vars)
    }

    pub fn add_heat(&mut self, unit: &str, vars: &mut VariableStore) -> AssemblyResult<VarId> {
        add(&mut self.heat, "heat point", "q", unit, HEAT_BOUNDS, vars)
    }

    pub fn add_recovery(&mut self, unit: &str, vars: &mut VariableStore) -> AssemblyResult<VarId> {
        add(&mut self.recovery, "recovery point", "zeta", unit, FRACTION_BOUNDS, vars)
    }

    /// `key` is the unit name followed by the reaction key, e.g. `R1CDR`.
    pub fn add_conversion(&mut self, key: &str, vars: &mut VariableStore) -> AssemblyResult<VarId> {
        add(&mut self.conversion, "conversion point", "conversion", key, FRACTION_BOUNDS, vars)
    }

    pub fn add_split(&mut self, unit: &str, vars: &mut VariableStore) -> AssemblyResult<VarId> {
        add(&mut self.split, "split point", "split", unit, FRACTION_BOUNDS, vars)
    }

    pub fn add_sorbent(
        &mut self,
        unit: &str,
        vars: &mut VariableStore,
    ) -> AssemblyResult<SorbentHandles> {
        let handles = SorbentHandles {
            mass_flow: vars.add(format!("m_s[{unit}]"), SORBENT_FLOW_BOUNDS, 0.0)?,
            loading_rich: vars.add(format!("X_rich[{unit}]"), LOADING_BOUNDS, 0.0)?,
            loading_lean: vars.add(format!("X_lean[{unit}]"), LOADING_BOUNDS, 0.0)?,
        };
        Ok(*self
            .sorbent
            .insert_new("sorbent point", unit.to_string(), handles)?)
    }

    pub fn work(&self, unit: &str) -> Option<VarId> {
        self.work.get(unit).copied()
    }

    pub fn heat(&self, unit: &str) -> Option<VarId> {
        self.heat.get(unit).copied()
    }

    pub fn recovery(&self, unit: &str) -> Option<VarId> {
        self.recovery.get(unit).copied()
    }

    pub fn conversion(&self, key: &str) -> Option<VarId> {
        self.conversion.get(key).copied()
    }

    pub fn split(&self, unit: &str) -> Option<VarId> {
        self.split.get(unit).copied()
    }

    pub fn sorbent(&self, unit: &str) -> Option<SorbentHandles> {
        self.sorbent.get(unit).copied()
    }

    pub fn work_points(&self) -> impl Iterator<Item = (&str, VarId)> {
        self.work.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn heat_points(&self) -> impl Iterator<Item = (&str, VarId)> {
        self.heat.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Σ w over all work points.
    pub fn total_work(&self) -> Expr {
        Expr::sum(self.work.values().map(|&v| Expr::var(v)))
    }

    /// Σ q over all heat points.
    pub fn total_heat(&self) -> Expr {
        Expr::sum(self.heat.values().map(|&v| Expr::var(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;

    #[test]
    fn one_variable_per_key() {
        let mut vars = VariableStore::new();
        let mut uv = UnitVariables::default();
        let w = uv.add_work("C1", &mut vars).unwrap();
        assert_eq!(uv.work("C1"), Some(w));
        assert_eq!(vars.get(w).unwrap().name, "w[C1]");
        assert!(matches!(
            uv.add_work("C1", &mut vars),
            Err(AssemblyError::Registry(_))
        ));
    }

    #[test]
    fn totals_sum_points() {
        let mut vars = VariableStore::new();
        let mut uv = UnitVariables::default();
        let a = uv.add_heat("HE1", &mut vars).unwrap();
        let b = uv.add_heat("R1", &mut vars).unwrap();
        vars.set_value(a, 120.0).unwrap();
        vars.set_value(b, -20.0).unwrap();
        assert_eq!(uv.total_heat().eval(&vars.values()), 100.0);
        assert_eq!(uv.total_work().eval(&vars.values()), 0.0);
    }
}
