//! Solver selection and tolerances, loadable from YAML.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// LP solvers the inventory sub-model may be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LpSolver {
    Glpk,
    Gurobi,
}

impl LpSolver {
    pub fn as_str(&self) -> &'static str {
        match self {
            LpSolver::Glpk => "glpk",
            LpSolver::Gurobi => "gurobi",
        }
    }
}

impl fmt::Display for LpSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LpSolver {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glpk" => Ok(LpSolver::Glpk),
            "gurobi" => Ok(LpSolver::Gurobi),
            other => Err(SolverError::UnknownLpSolver(other.to_string())),
        }
    }
}

impl TryFrom<String> for LpSolver {
    type Error = SolverError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LpSolver> for String {
    fn from(s: LpSolver) -> Self {
        s.as_str().to_string()
    }
}

/// How the disjunctive solve obtains its first feasible configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// Cover every disjunct at least once before the main iterations.
    #[default]
    SetCovering,
    /// Start from the configuration with the most active indicators.
    MaxBinary,
    /// Keep the indicator values already loaded in the model.
    FixDisjuncts,
    NoInit,
}

impl InitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitStrategy::SetCovering => "set_covering",
            InitStrategy::MaxBinary => "max_binary",
            InitStrategy::FixDisjuncts => "fix_disjuncts",
            InitStrategy::NoInit => "no_init",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Subproblem solver for the nonlinear flowsheet.
    pub nlp_solver: String,
    /// Master-problem solver for the indicator variables.
    pub mip_solver: String,
    pub lp_solver: LpSolver,
    /// Constraint tolerance passed to the solver.
    pub tolerance: f64,
    /// Wall-clock limit [s]. Unbounded when absent.
    pub time_limit_s: Option<f64>,
    pub init_strategy: InitStrategy,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            nlp_solver: "ipopt".to_string(),
            mip_solver: "glpk".to_string(),
            lp_solver: LpSolver::Glpk,
            tolerance: 1e-10,
            time_limit_s: None,
            init_strategy: InitStrategy::SetCovering,
        }
    }
}

impl SolverSettings {
    pub fn from_yaml_str(s: &str) -> SolverResult<Self> {
        let settings: Self = serde_yaml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_yaml(path: &Path) -> SolverResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SolverError::Settings {
                what: format!("tolerance must be positive, got {}", self.tolerance),
            });
        }
        if let Some(limit) = self.time_limit_s {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(SolverError::Settings {
                    what: format!("time limit must be positive, got {limit}"),
                });
            }
        }
        for (what, name) in [("nlp_solver", &self.nlp_solver), ("mip_solver", &self.mip_solver)] {
            if name.trim().is_empty() {
                return Err(SolverError::Settings {
                    what: format!("{what} is empty"),
                });
            }
        }
        Ok(())
    }
}
