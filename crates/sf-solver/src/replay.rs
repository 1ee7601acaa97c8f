//! Solver that replays an assignment produced elsewhere.
//!
//! An external optimizer writes its result as JSON keyed by variable name;
//! [`ReplaySolver`] maps it back onto a model's variable slots. Variables
//! absent from the file keep their current value.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sf_superstructure::AssembledModel;
use tracing::debug;

use crate::error::SolverResult;
use crate::outcome::{SolveOutcome, Solver};
use crate::settings::SolverSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Feasible,
    Infeasible,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAssignment {
    pub status: AssignmentStatus,
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NamedAssignment {
    pub fn feasible(values: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            status: AssignmentStatus::Feasible,
            values: values.into_iter().collect(),
            message: None,
        }
    }

    pub fn from_json_str(s: &str) -> SolverResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load_json(path: &Path) -> SolverResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> SolverResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone)]
pub struct ReplaySolver {
    assignment: NamedAssignment,
}

impl ReplaySolver {
    pub fn new(assignment: NamedAssignment) -> Self {
        Self { assignment }
    }
}

impl Solver for ReplaySolver {
    fn name(&self) -> &str {
        "replay"
    }

    fn solve(&self, model: &AssembledModel, _settings: &SolverSettings) -> SolveOutcome {
        match self.assignment.status {
            AssignmentStatus::Infeasible => return SolveOutcome::Infeasible,
            AssignmentStatus::Failed => {
                let message = self.assignment.message.clone().unwrap_or_default();
                return SolveOutcome::Failed(message);
            }
            AssignmentStatus::Feasible => {}
        }

        let slots: HashMap<&str, usize> = model
            .vars()
            .iter()
            .map(|(id, v)| (v.name.as_str(), id.slot()))
            .collect();
        let mut values = model.vars().values();
        for (name, &value) in &self.assignment.values {
            match slots.get(name.as_str()) {
                Some(&slot) => values[slot] = value,
                None => return SolveOutcome::Failed(format!("unknown variable {name}")),
            }
        }
        debug!(
            model = model.name(),
            assigned = self.assignment.values.len(),
            total = values.len(),
            "assignment replayed"
        );
        SolveOutcome::Feasible(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_json() {
        let json = r#"{"status": "infeasible"}"#;
        let a = NamedAssignment::from_json_str(json).unwrap();
        assert_eq!(a.status, AssignmentStatus::Infeasible);
        assert!(a.values.is_empty());
    }

    #[test]
    fn failed_assignment_carries_message() {
        let a = NamedAssignment {
            status: AssignmentStatus::Failed,
            values: BTreeMap::new(),
            message: Some("maxIterations exceeded".into()),
        };
        let json = a.to_json().unwrap();
        assert!(json.contains("maxIterations"));
        assert_eq!(NamedAssignment::from_json_str(&json).unwrap(), a);
    }
}
