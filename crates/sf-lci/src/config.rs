//! Declarative inventory set-up.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sf_core::ensure_finite;
use tracing::debug;

use crate::error::InventoryResult;
use crate::inventory::LifeCycleInventory;
use crate::scenario::Scenario;

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
}

impl ScenarioConfig {
    pub fn resolve(&self) -> InventoryResult<Scenario> {
        Scenario::from_name(&self.name, self.impact)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityCap {
    pub process: String,
    pub upper: f64,
}

/// Scenarios, deactivations and caps, applied in that order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryConfig {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
    #[serde(default)]
    pub deactivate: Vec<String>,
    #[serde(default)]
    pub caps: Vec<ActivityCap>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            scenarios: Vec::new(),
            deactivate: Vec::new(),
            caps: Vec::new(),
        }
    }
}

impl InventoryConfig {
    pub fn from_yaml_str(s: &str) -> InventoryResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load_yaml(path: &Path) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Resolve every scenario name up front so a bad entry fails before
    /// anything is applied.
    pub fn scenarios(&self) -> InventoryResult<Vec<Scenario>> {
        self.scenarios.iter().map(ScenarioConfig::resolve).collect()
    }

    /// Apply the configuration. Every entry is checked against `lci` first,
    /// so an error leaves the inventory unchanged.
    pub fn apply(&self, lci: &mut LifeCycleInventory) -> InventoryResult<()> {
        let scenarios = self.scenarios()?;
        for scenario in &scenarios {
            lci.plan_scenario(scenario)?;
        }
        for process in &self.deactivate {
            lci.activity(process)?;
        }
        for cap in &self.caps {
            ensure_finite(cap.upper, "activity cap")?;
            lci.activity(&cap.process)?;
        }

        for scenario in &scenarios {
            lci.activate_scenario(scenario)?;
        }
        for process in &self.deactivate {
            lci.deactivate_process(process)?;
        }
        for cap in &self.caps {
            lci.cap_process(&cap.process, cap.upper)?;
        }
        debug!(
            inventory = lci.name(),
            scenarios = self.scenarios.len(),
            deactivated = self.deactivate.len(),
            caps = self.caps.len(),
            "inventory configuration applied"
        );
        Ok(())
    }
}
