//! Read-only view of a solved model for export.
//!
//! Every flow-like number passes through [`clean_value`] with
//! [`REPORT_ZERO_BAND`]; inventory quantities are multiplied back by the
//! model scale.

use std::collections::BTreeMap;

use serde::Serialize;
use sf_core::{REPORT_ZERO_BAND, VarId, clean_value, constants::ZERO_CELSIUS_K};
use sf_substances::Substance;
use sf_superstructure::{AssembledModel, Connector};
use sf_unitops::{Attribute, StreamIndex, UnitOperation};

use crate::error::{SolverError, SolverResult};

fn clean(v: f64) -> f64 {
    clean_value(v, REPORT_ZERO_BAND)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamReport {
    pub index: StreamIndex,
    pub label: &'static str,
    pub flow: f64,
    pub temperature_k: f64,
    pub temperature_c: f64,
    pub pressure_bar: f64,
    pub composition: BTreeMap<Substance, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    pub name: String,
    pub type_label: &'static str,
    pub attributes: Vec<(&'static str, Attribute)>,
    pub disjunct: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisjunctionReport {
    pub name: String,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub name: String,
    pub activity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorReport {
    pub connector: Connector,
    pub flow: &'static str,
    pub value: f64,
}

/// Objective value and, with an inventory, its life-cycle split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectiveReport {
    pub value: f64,
    pub cradle_to_gate: Option<f64>,
    pub gate_to_grave: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolvedModel {
    pub name: String,
    pub solver: String,
    pub solve_time_s: f64,
    pub scale: f64,
    pub objective: ObjectiveReport,
    pub streams: Vec<StreamReport>,
    pub units: Vec<UnitReport>,
    pub disjunctions: Vec<DisjunctionReport>,
    pub processes: Vec<ProcessReport>,
    pub connectors: Vec<ConnectorReport>,
    #[serde(skip)]
    values: Vec<f64>,
}

impl SolvedModel {
    /// Collect the report for `values`, which must cover every variable.
    pub fn collect(
        model: &AssembledModel,
        values: Vec<f64>,
        solver: impl Into<String>,
        solve_time_s: f64,
    ) -> SolverResult<Self> {
        let expected = model.vars().len();
        if values.len() != expected {
            return Err(SolverError::AssignmentLength {
                expected,
                got: values.len(),
            });
        }
        let at = |id: VarId| values[id.slot()];
        let scale = model.scale();

        let streams = model
            .streams()
            .iter()
            .map(|e| {
                let s = &e.stream;
                let t = at(s.temperature);
                StreamReport {
                    index: s.index,
                    label: e.kind.label(),
                    flow: clean(at(s.flow)),
                    temperature_k: t,
                    temperature_c: t - ZERO_CELSIUS_K,
                    pressure_bar: at(s.pressure),
                    composition: s.fractions.iter().map(|(k, &id)| (k, clean(at(id)))).collect(),
                }
            })
            .collect();

        let uv = model.unit_variables();
        let units = model
            .units()
            .iter()
            .map(|u| {
                let name = u.unit.name();
                UnitReport {
                    name: name.to_string(),
                    type_label: u.unit.type_label(),
                    attributes: u.unit.attributes(),
                    disjunct: u.disjunct.clone(),
                    active: model.unit_active(u, &values),
                    work: uv.work(name).map(|id| clean(at(id))),
                    heat: uv.heat(name).map(|id| clean(at(id))),
                }
            })
            .collect();

        let disjunctions = model
            .disjunctions()
            .iter()
            .map(|d| DisjunctionReport {
                name: d.name().to_string(),
                selected: d.selected(&values).map(|s| s.name.clone()),
            })
            .collect();

        let processes = model
            .inventory()
            .map(|lci| {
                lci.activities()
                    .map(|(name, id)| ProcessReport {
                        name: name.to_string(),
                        activity: clean(at(id) * scale),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let connectors = model
            .connectors()
            .iter()
            .map(|&(c, id)| ConnectorReport {
                connector: c,
                flow: c.flow_name(),
                value: clean(at(id)),
            })
            .collect();

        let objective = ObjectiveReport {
            value: clean(model.objective().value(&values)),
            cradle_to_gate: model
                .inventory()
                .map(|lci| clean(at(lci.cradle_to_gate()) * scale)),
            gate_to_grave: model
                .inventory()
                .map(|lci| clean(at(lci.gate_to_grave()) * scale)),
        };

        Ok(Self {
            name: model.name().to_string(),
            solver: solver.into(),
            solve_time_s,
            scale,
            objective,
            streams,
            units,
            disjunctions,
            processes,
            connectors,
            values,
        })
    }

    /// Raw solver value, before cleanup or rescaling.
    pub fn value(&self, id: VarId) -> Option<f64> {
        self.values.get(id.slot()).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn stream(&self, index: impl Into<StreamIndex>) -> Option<&StreamReport> {
        let index = index.into();
        self.streams.iter().find(|s| s.index == index)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.name == name)
    }

    pub fn process(&self, name: &str) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.name == name)
    }

    /// Units whose disjunct was selected, or that sit outside any disjunct.
    pub fn active_units(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.active)
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
