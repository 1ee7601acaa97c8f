//! Decision variables.

use crate::error::{ExprError, ExprResult};
use sf_core::VarId;

/// Closed interval a variable is restricted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub const fn unit_interval() -> Self {
        Self::new(0.0, 1.0)
    }

    pub const fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    pub fn contains(&self, v: f64, tol: f64) -> bool {
        v >= self.lower - tol && v <= self.upper + tol
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Continuous,
    /// 0/1 indicator (disjunct selection).
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub bounds: Bounds,
    pub domain: Domain,
    /// Current value: the initial guess until a solution is loaded.
    pub value: f64,
}

/// Append-only arena holding every decision variable of one model.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: Vec<Variable>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a continuous variable. The initial value is clamped into the bounds.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        bounds: Bounds,
        initial: f64,
    ) -> ExprResult<VarId> {
        let name = name.into();
        if !(bounds.lower <= bounds.upper) {
            return Err(ExprError::InvalidBounds {
                name,
                lower: bounds.lower,
                upper: bounds.upper,
            });
        }
        let value = initial.clamp(bounds.lower, bounds.upper);
        Ok(self.push(Variable {
            name,
            bounds,
            domain: Domain::Continuous,
            value,
        }))
    }

    /// Add a binary indicator variable, initialised to 0.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.push(Variable {
            name: name.into(),
            bounds: Bounds::unit_interval(),
            domain: Domain::Binary,
            value: 0.0,
        })
    }

    fn push(&mut self, var: Variable) -> VarId {
        let id = VarId::from_index(self.vars.len() as u32);
        self.vars.push(var);
        id
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, id: VarId) -> ExprResult<&Variable> {
        self.vars.get(id.slot()).ok_or(ExprError::UnknownVar(id))
    }

    pub fn value(&self, id: VarId) -> ExprResult<f64> {
        Ok(self.get(id)?.value)
    }

    pub fn set_value(&mut self, id: VarId, value: f64) -> ExprResult<()> {
        let var = self.vars.get_mut(id.slot()).ok_or(ExprError::UnknownVar(id))?;
        var.value = value;
        Ok(())
    }

    /// Snapshot of all current values, indexed by `VarId::slot`.
    pub fn values(&self) -> Vec<f64> {
        self.vars.iter().map(|v| v.value).collect()
    }

    /// Overwrite every current value (e.g. after a solve).
    pub fn load_values(&mut self, values: &[f64]) -> ExprResult<()> {
        if values.len() != self.vars.len() {
            return Err(ExprError::ValueLength {
                expected: self.vars.len(),
                got: values.len(),
            });
        }
        for (var, &v) in self.vars.iter_mut().zip(values) {
            var.value = v;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, v)| (VarId::from_index(i as u32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_clamps_initial_value() {
        let mut store = VariableStore::new();
        let p = store.add("p[1]", Bounds::new(1.0, 50.0), 0.0).unwrap();
        assert_eq!(store.value(p).unwrap(), 1.0);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut store = VariableStore::new();
        let err = store.add("bad", Bounds::new(2.0, 1.0), 1.5).unwrap_err();
        assert!(matches!(err, ExprError::InvalidBounds { .. }));
    }

    #[test]
    fn load_values_checks_length() {
        let mut store = VariableStore::new();
        store.add("a", Bounds::unit_interval(), 0.0).unwrap();
        assert!(store.load_values(&[0.5, 0.5]).is_err());
        store.load_values(&[0.5]).unwrap();
        assert_eq!(store.values(), vec![0.5]);
    }

    #[test]
    fn binary_indicator() {
        let mut store = VariableStore::new();
        let y = store.add_binary("cdr.indicator");
        let var = store.get(y).unwrap();
        assert_eq!(var.domain, Domain::Binary);
        assert_eq!(var.bounds, Bounds::unit_interval());
    }
}
