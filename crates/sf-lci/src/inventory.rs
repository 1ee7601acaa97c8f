//! Linear life-cycle-inventory sub-model.
//!
//! Decision variables: one activity level `s_p ≥ 0` per process, one net
//! flow `y_u` per intermediate flow, and two objective accumulators. All
//! quantities are divided by the model's scale factor.
//!
//! ```text
//! define_y[u]:              Σ_p A[u,p]·s_p + c_u - y_u = 0
//! capacity_constraints1[u]: Σ_{A>0} A[u,p]·s_p + c_u - cap_u/scale ≥ 0   (cap_u > 0)
//! capacity_constraints2[u]: y_u ≥ 0                                      (cap_u > 0)
//! demand_constraints[u]:    y_u = 0                                      (otherwise)
//! ```
//!
//! `c_u` is the connector term attached to flow `u`, if any.

use std::collections::HashMap;

use sf_core::{VarId, ensure_finite};
use sf_expr::{Bounds, ConstraintBlock, Expr, Objective, VariableStore};
use tracing::{debug, info};

use crate::data::InventoryData;
use crate::error::{InventoryError, InventoryResult};
use crate::scenario::{Scenario, ScenarioAction};

/// Magnitude limit of unscaled inventory quantities.
pub const UNSCALED_LIMIT: f64 = 1e18;

/// Terms Σ coef·var restricted to coefficients accepted by `keep`.
fn weighted_sum(coefs: &[f64], vars: &[VarId], keep: impl Fn(f64) -> bool) -> Expr {
    Expr::sum(
        coefs
            .iter()
            .zip(vars)
            .filter(|&(&c, _)| keep(c))
            .map(|(&c, &v)| c * Expr::var(v)),
    )
}

#[derive(Debug, Clone)]
pub struct LifeCycleInventory {
    name: String,
    data: InventoryData,
    scale: f64,
    /// Current elementary-flow coefficients (scenarios may override).
    elementary: Vec<f64>,
    activity: Vec<VarId>,
    flow: Vec<VarId>,
    cradle_to_gate: VarId,
    gate_to_grave: VarId,
    lookup: HashMap<String, usize>,
    /// Flows that received a connector term, in row order.
    connected: Vec<String>,

    define_y: Option<ConstraintBlock>,
    capacity: ConstraintBlock,
    non_negative: ConstraintBlock,
    demand: ConstraintBlock,
    deactivated: ConstraintBlock,
    caps: ConstraintBlock,
    objective_definition: Option<ConstraintBlock>,
    objective: Option<Objective>,
}

impl LifeCycleInventory {
    /// Allocate the inventory variables in `vars`.
    pub fn set_up(
        name: impl Into<String>,
        data: InventoryData,
        scale: f64,
        vars: &mut VariableStore,
    ) -> InventoryResult<Self> {
        if ensure_finite(scale, "scale factor")? <= 0.0 {
            return Err(InventoryError::InvalidScale(scale));
        }
        let name = name.into();
        let ub = UNSCALED_LIMIT / scale;

        let activity = data
            .processes()
            .iter()
            .map(|p| vars.add(format!("{name}.s[{p}]"), Bounds::new(0.0, ub), 0.0))
            .collect::<Result<Vec<_>, _>>()?;
        let flow = data
            .flows()
            .iter()
            .map(|u| vars.add(format!("{name}.y[{u}]"), Bounds::symmetric(ub), 0.0))
            .collect::<Result<Vec<_>, _>>()?;
        let cradle_to_gate =
            vars.add(format!("{name}.obj_cradle2gate"), Bounds::symmetric(ub), 0.0)?;
        let gate_to_grave =
            vars.add(format!("{name}.obj_gate2grave"), Bounds::symmetric(ub), 0.0)?;

        let lookup = data
            .processes()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        info!(
            inventory = %name,
            processes = activity.len(),
            flows = flow.len(),
            scale,
            "inventory variables allocated"
        );

        Ok(Self {
            elementary: data.elementary().to_vec(),
            data,
            scale,
            activity,
            flow,
            cradle_to_gate,
            gate_to_grave,
            lookup,
            connected: Vec::new(),
            define_y: None,
            capacity: ConstraintBlock::new("capacity_constraints1"),
            non_negative: ConstraintBlock::new("capacity_constraints2"),
            demand: ConstraintBlock::new("demand_constraints"),
            deactivated: ConstraintBlock::new("deactivated_processes"),
            caps: ConstraintBlock::new("activity_caps"),
            objective_definition: None,
            objective: None,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn data(&self) -> &InventoryData {
        &self.data
    }

    pub fn processes(&self) -> &[String] {
        self.data.processes()
    }

    pub fn flows(&self) -> &[String] {
        self.data.flows()
    }

    pub fn elementary(&self) -> &[f64] {
        &self.elementary
    }

    fn process_index(&self, process: &str) -> InventoryResult<usize> {
        self.lookup
            .get(process)
            .copied()
            .ok_or_else(|| InventoryError::UnknownProcess(process.to_string()))
    }

    /// Activity variable of a process.
    pub fn activity(&self, process: &str) -> InventoryResult<VarId> {
        Ok(self.activity[self.process_index(process)?])
    }

    /// Net-flow variable of an intermediate flow.
    pub fn flow(&self, flow: &str) -> InventoryResult<VarId> {
        self.data
            .flows()
            .iter()
            .position(|f| f == flow)
            .map(|u| self.flow[u])
            .ok_or_else(|| InventoryError::UnknownFlow(flow.to_string()))
    }

    pub fn activities(&self) -> impl Iterator<Item = (&str, VarId)> {
        self.processes()
            .iter()
            .map(String::as_str)
            .zip(self.activity.iter().copied())
    }

    pub fn cradle_to_gate(&self) -> VarId {
        self.cradle_to_gate
    }

    pub fn gate_to_grave(&self) -> VarId {
        self.gate_to_grave
    }

    /// Build flow definitions plus capacity or demand constraints.
    ///
    /// `connectors` maps intermediate-flow names to the term injected into
    /// that flow's balance. Every key must name an intermediate flow.
    pub fn construct_flow_constraints(
        &mut self,
        connectors: &HashMap<String, Expr>,
    ) -> InventoryResult<()> {
        if self.define_y.is_some() {
            return Err(InventoryError::AlreadyBuilt {
                what: "flow constraints",
            });
        }
        if let Some(unmatched) = connectors
            .keys()
            .find(|c| !self.data.flows().contains(*c))
        {
            return Err(InventoryError::UnmatchedConnector(unmatched.clone()));
        }

        let mut define_y = ConstraintBlock::new("define_y");
        let mut connected = Vec::with_capacity(connectors.len());
        for (u, flow_name) in self.data.flows().iter().enumerate() {
            let row = self.data.row(u)?;
            let y = Expr::var(self.flow[u]);
            let connect = match connectors.get(flow_name) {
                Some(term) => {
                    connected.push(flow_name.clone());
                    term.clone()
                }
                None => Expr::zero(),
            };

            define_y.add_eq(
                format!("define_y[{flow_name}]"),
                weighted_sum(&row, &self.activity, |c| c != 0.0) + connect.clone() - y.clone(),
                0.0,
            );

            let cap = self.data.capacity()[u];
            if cap > 0.0 {
                self.capacity.add_ge(
                    format!("capacity[{flow_name}]"),
                    weighted_sum(&row, &self.activity, |c| c > 0.0) + connect
                        - cap / self.scale,
                    0.0,
                );
                self.non_negative
                    .add_ge(format!("y_nonneg[{flow_name}]"), y, 0.0);
            } else {
                self.demand.add_eq(format!("demand[{flow_name}]"), y, 0.0);
            }
        }

        info!(
            inventory = %self.name,
            capacity = self.capacity.len(),
            demand = self.demand.len(),
            connectors = connectors.len(),
            "inventory flow constraints built"
        );
        self.define_y = Some(define_y);
        self.connected = connected;
        Ok(())
    }

    /// Force a process's activity to zero. Repeating the call adds a redundant
    /// copy of the same constraint.
    pub fn deactivate_process(&mut self, process: &str) -> InventoryResult<()> {
        let s = self.activity(process)?;
        debug!(inventory = %self.name, process, "process deactivated");
        self.deactivated
            .add_eq(format!("deactivated[{process}]"), Expr::var(s), 0.0);
        Ok(())
    }

    /// Upper-bound a process's (scaled) activity.
    pub fn cap_process(&mut self, process: &str, upper: f64) -> InventoryResult<()> {
        ensure_finite(upper, "activity cap")?;
        let s = self.activity(process)?;
        self.caps
            .add_le(format!("cap[{process}]"), Expr::var(s), upper);
        Ok(())
    }

    /// Replace the elementary-flow coefficient of a process.
    ///
    /// Must happen before the objective is constructed.
    pub fn override_elementary(&mut self, process: &str, value: f64) -> InventoryResult<()> {
        let p = self.check_override(process, value)?;
        debug!(inventory = %self.name, process, value, "elementary flow overridden");
        self.elementary[p] = value;
        Ok(())
    }

    fn check_override(&self, process: &str, value: f64) -> InventoryResult<usize> {
        if self.objective.is_some() {
            return Err(InventoryError::AlreadyBuilt {
                what: "objective (elementary flows are frozen)",
            });
        }
        ensure_finite(value, "elementary flow")?;
        self.process_index(process)
    }

    /// Resolve a scenario against this inventory without changing it.
    ///
    /// Every process the scenario touches must exist, and overrides require
    /// the objective to be unbuilt.
    pub fn plan_scenario(&self, scenario: &Scenario) -> InventoryResult<Vec<ScenarioAction>> {
        let actions = scenario.actions(self.processes())?;
        for action in &actions {
            match action {
                ScenarioAction::Deactivate(process) => {
                    self.process_index(process)?;
                }
                ScenarioAction::OverrideElementary { process, value } => {
                    self.check_override(process, *value)?;
                }
            }
        }
        Ok(actions)
    }

    /// Apply a scenario's action sequence. Nothing is applied if any step
    /// would fail.
    pub fn activate_scenario(&mut self, scenario: &Scenario) -> InventoryResult<()> {
        let actions = self.plan_scenario(scenario)?;
        info!(inventory = %self.name, %scenario, steps = actions.len(), "scenario activated");
        for action in actions {
            match action {
                ScenarioAction::Deactivate(process) => self.deactivate_process(&process)?,
                ScenarioAction::OverrideElementary { process, value } => {
                    self.override_elementary(&process, value)?
                }
            }
        }
        Ok(())
    }

    /// Define the cradle-to-gate and gate-to-grave accumulators and the
    /// objective (their sum, minimised).
    pub fn construct_objective(&mut self) -> InventoryResult<()> {
        if self.objective.is_some() {
            return Err(InventoryError::AlreadyBuilt { what: "objective" });
        }
        let mut block = ConstraintBlock::new("objective_definition");
        block.add_eq(
            "define_cradle2gate",
            Expr::var(self.cradle_to_gate),
            weighted_sum(&self.elementary, &self.activity, |c| c != 0.0),
        );
        block.add_eq(
            "define_gate2grave",
            Expr::var(self.gate_to_grave),
            weighted_sum(self.data.end_of_life(), &self.flow, |c| c != 0.0),
        );
        self.objective_definition = Some(block);
        self.objective = Some(Objective::minimize(
            Expr::var(self.cradle_to_gate) + Expr::var(self.gate_to_grave),
        ));
        Ok(())
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Intermediate flows whose balance carries a connector term.
    pub fn connected_flows(&self) -> &[String] {
        &self.connected
    }

    pub fn is_flow_built(&self) -> bool {
        self.define_y.is_some()
    }

    /// All constraint blocks built so far.
    pub fn blocks(&self) -> impl Iterator<Item = &ConstraintBlock> {
        self.define_y
            .iter()
            .chain([
                &self.capacity,
                &self.non_negative,
                &self.demand,
                &self.deactivated,
                &self.caps,
            ])
            .chain(self.objective_definition.iter())
    }

    /// Every variable owned by the inventory.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.activity
            .iter()
            .chain(&self.flow)
            .copied()
            .chain([self.cradle_to_gate, self.gate_to_grave])
    }
}
