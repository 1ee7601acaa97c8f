//! The solver boundary: an assembled model goes out, an outcome comes back.

use sf_superstructure::AssembledModel;

use crate::settings::SolverSettings;

/// Result of one solve.
///
/// Infeasibility and solver failure are kept apart from a feasible point so
/// that a zero objective can never stand in for "no solution".
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Full assignment, indexed by variable slot.
    Feasible(Vec<f64>),
    Infeasible,
    Failed(String),
}

impl SolveOutcome {
    pub fn is_feasible(&self) -> bool {
        matches!(self, SolveOutcome::Feasible(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SolveOutcome::Feasible(_) => "feasible",
            SolveOutcome::Infeasible => "infeasible",
            SolveOutcome::Failed(_) => "failed",
        }
    }
}

/// External numerical procedure for disjunctive models.
///
/// Implementations run synchronously and may take arbitrarily long; any
/// time limit comes from `settings`.
pub trait Solver {
    fn name(&self) -> &str;

    fn solve(&self, model: &AssembledModel, settings: &SolverSettings) -> SolveOutcome;
}
