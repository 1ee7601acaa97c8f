//! Frozen model handed to a solver.

use sf_core::{Tolerances, VarId};
use sf_expr::{Bounds, ConstraintBlock, Domain, ExprResult, Objective, VariableStore};
use sf_lci::LifeCycleInventory;
use sf_unitops::{StreamIndex, UnitOperation};

use crate::assembler::{StreamEntry, UnitEntry};
use crate::connector::Connector;
use crate::disjunct::{Disjunct, Disjunction};
use crate::variables::UnitVariables;

/// One failed check of a candidate assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Bound {
        variable: String,
        value: f64,
        bounds: Bounds,
    },
    /// Binary variable not at 0 or 1.
    Integrality { variable: String, value: f64 },
    Constraint {
        block: String,
        constraint: String,
        amount: f64,
    },
}

/// Continuous variables, disjunctive groups, inventory block and objective.
#[derive(Debug, Clone)]
pub struct AssembledModel {
    name: String,
    scale: f64,
    vars: VariableStore,
    streams: Vec<StreamEntry>,
    units: Vec<UnitEntry>,
    unit_vars: UnitVariables,
    disjunctions: Vec<Disjunction>,
    blocks: Vec<ConstraintBlock>,
    connectors: Vec<(Connector, VarId)>,
    inventory: Option<LifeCycleInventory>,
    objective: Objective,
}

impl AssembledModel {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        scale: f64,
        vars: VariableStore,
        streams: Vec<StreamEntry>,
        units: Vec<UnitEntry>,
        unit_vars: UnitVariables,
        disjunctions: Vec<Disjunction>,
        blocks: Vec<ConstraintBlock>,
        connectors: Vec<(Connector, VarId)>,
        inventory: Option<LifeCycleInventory>,
        objective: Objective,
    ) -> Self {
        Self {
            name,
            scale,
            vars,
            streams,
            units,
            unit_vars,
            disjunctions,
            blocks,
            connectors,
            inventory,
            objective,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn streams(&self) -> &[StreamEntry] {
        &self.streams
    }

    pub fn stream(&self, index: impl Into<StreamIndex>) -> Option<&StreamEntry> {
        let index = index.into();
        self.streams.iter().find(|e| e.stream.index == index)
    }

    pub fn units(&self) -> &[UnitEntry] {
        &self.units
    }

    pub fn unit(&self, name: &str) -> Option<&UnitEntry> {
        self.units.iter().find(|u| u.unit.name() == name)
    }

    /// Work, heat, recovery, conversion, split and sorbent variables.
    pub fn unit_variables(&self) -> &UnitVariables {
        &self.unit_vars
    }

    pub fn disjunctions(&self) -> &[Disjunction] {
        &self.disjunctions
    }

    /// Top-level blocks that are not owned by a unit.
    pub fn global_blocks(&self) -> &[ConstraintBlock] {
        &self.blocks
    }

    pub fn connectors(&self) -> &[(Connector, VarId)] {
        &self.connectors
    }

    pub fn inventory(&self) -> Option<&LifeCycleInventory> {
        self.inventory.as_ref()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Overwrite current values, e.g. with a solver's assignment.
    pub fn load_values(&mut self, values: &[f64]) -> ExprResult<()> {
        self.vars.load_values(values)
    }

    pub fn disjunct(&self, name: &str) -> Option<&Disjunct> {
        self.disjunctions
            .iter()
            .flat_map(|d| d.disjuncts())
            .find(|d| d.name == name)
    }

    fn disjunct_active(&self, name: Option<&str>, values: &[f64]) -> bool {
        match name {
            None => true,
            Some(n) => self.disjunct(n).is_some_and(|d| d.is_selected(values)),
        }
    }

    /// Whether a unit's block is enforced at `values`.
    pub fn unit_active(&self, unit: &UnitEntry, values: &[f64]) -> bool {
        self.disjunct_active(unit.disjunct.as_deref(), values)
    }

    /// Blocks enforced at `values`: top-level blocks, units outside any
    /// disjunct, units and constraints of selected disjuncts, and the inventory.
    pub fn active_blocks<'a>(
        &'a self,
        values: &'a [f64],
    ) -> impl Iterator<Item = &'a ConstraintBlock> + 'a {
        let units = self
            .units
            .iter()
            .filter(move |u| self.unit_active(u, values))
            .map(|u| &u.block);
        let disjuncts = self
            .disjunctions
            .iter()
            .flat_map(|d| d.disjuncts())
            .filter(move |d| d.is_selected(values))
            .map(|d| &d.constraints);
        self.blocks
            .iter()
            .chain(units)
            .chain(disjuncts)
            .chain(self.inventory.iter().flat_map(|lci| lci.blocks()))
    }

    /// Every failed check at `values`: variable bounds, integrality of
    /// indicators, exactly-one per disjunction and the active blocks.
    ///
    /// Constraints of unselected disjuncts are not evaluated.
    pub fn violations(&self, values: &[f64], tol: Tolerances) -> Vec<Violation> {
        let mut out = Vec::new();
        for (id, var) in self.vars.iter() {
            let value = values.get(id.slot()).copied().unwrap_or(f64::NAN);
            if !value.is_finite() || !var.bounds.contains(value, tol.abs) {
                out.push(Violation::Bound {
                    variable: var.name.clone(),
                    value,
                    bounds: var.bounds,
                });
            } else if var.domain == Domain::Binary
                && value.min(1.0 - value).abs() > tol.abs
            {
                out.push(Violation::Integrality {
                    variable: var.name.clone(),
                    value,
                });
            }
        }
        for d in &self.disjunctions {
            let c = d.exactly_one();
            if !c.is_satisfied(values, tol) {
                out.push(Violation::Constraint {
                    block: d.name().to_string(),
                    amount: c.violation(values),
                    constraint: c.name,
                });
            }
        }
        for block in self.active_blocks(values) {
            for c in block.violated(values, tol) {
                out.push(Violation::Constraint {
                    block: block.name().to_string(),
                    constraint: c.name.clone(),
                    amount: c.violation(values),
                });
            }
        }
        out
    }

    pub fn is_feasible(&self, values: &[f64], tol: Tolerances) -> bool {
        self.violations(values, tol).is_empty()
    }

    /// Type label and disjunct of every unit, in declaration order.
    pub fn unit_summary(&self) -> impl Iterator<Item = (&str, &'static str, Option<&str>)> {
        self.units
            .iter()
            .map(|u| (u.unit.name(), u.unit.type_label(), u.disjunct.as_deref()))
    }
}
