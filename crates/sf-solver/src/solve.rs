//! Solve driver: runs a [`Solver`], verifies its assignment and builds the report.

use std::time::Instant;

use serde::Serialize;
use sf_core::Tolerances;
use sf_superstructure::{AssembledModel, Violation};
use tracing::{info, warn};

use crate::error::{SolverError, SolverResult};
use crate::outcome::{SolveOutcome, Solver};
use crate::report::SolvedModel;
use crate::settings::SolverSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SolveTiming {
    pub solve_time_s: f64,
    pub verify_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub enum RunResult {
    Solved(Box<SolvedModel>),
    Infeasible,
    Failed(String),
}

impl RunResult {
    pub fn label(&self) -> &'static str {
        match self {
            RunResult::Solved(_) => "solved",
            RunResult::Infeasible => "infeasible",
            RunResult::Failed(_) => "failed",
        }
    }
}

/// One call of [`solve_model`].
#[derive(Debug, Clone)]
pub struct SolveRun {
    pub solver: String,
    pub timing: SolveTiming,
    pub result: RunResult,
}

impl SolveRun {
    pub fn solved(&self) -> Option<&SolvedModel> {
        match &self.result {
            RunResult::Solved(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, RunResult::Infeasible)
    }
}

fn describe(v: &Violation) -> String {
    match v {
        Violation::Bound {
            variable,
            value,
            bounds,
        } => format!(
            "{variable} = {value} outside [{}, {}]",
            bounds.lower, bounds.upper
        ),
        Violation::Integrality { variable, value } => {
            format!("{variable} = {value} is not binary")
        }
        Violation::Constraint {
            block,
            constraint,
            amount,
        } => format!("{block}/{constraint} violated by {amount}"),
    }
}

/// Hand `model` to `solver`.
///
/// A feasible assignment is checked against every active constraint at
/// `tol` and loaded into the model's variables. An assignment that fails
/// the check is an error; infeasibility and solver failure are returned as
/// [`RunResult`] variants.
pub fn solve_model(
    model: &mut AssembledModel,
    solver: &dyn Solver,
    settings: &SolverSettings,
    tol: Tolerances,
) -> SolverResult<SolveRun> {
    settings.validate()?;
    let started = Instant::now();
    let mut timing = SolveTiming::default();
    info!(
        model = model.name(),
        solver = solver.name(),
        nlp = %settings.nlp_solver,
        mip = %settings.mip_solver,
        lp = %settings.lp_solver,
        init = settings.init_strategy.as_str(),
        variables = model.vars().len(),
        "solve started"
    );

    let outcome = solver.solve(model, settings);
    timing.solve_time_s = started.elapsed().as_secs_f64();

    let result = match outcome {
        SolveOutcome::Feasible(values) => {
            let verify_started = Instant::now();
            let expected = model.vars().len();
            if values.len() != expected {
                return Err(SolverError::AssignmentLength {
                    expected,
                    got: values.len(),
                });
            }
            let violations = model.violations(&values, tol);
            if let Some(first) = violations.first() {
                return Err(SolverError::InvalidSolution {
                    solver: solver.name().to_string(),
                    count: violations.len(),
                    first: describe(first),
                });
            }
            model.load_values(&values)?;
            timing.verify_time_s = verify_started.elapsed().as_secs_f64();
            let solved = SolvedModel::collect(model, values, solver.name(), timing.solve_time_s)?;
            RunResult::Solved(Box::new(solved))
        }
        SolveOutcome::Infeasible => {
            warn!(model = model.name(), solver = solver.name(), "model infeasible");
            RunResult::Infeasible
        }
        SolveOutcome::Failed(message) => {
            warn!(model = model.name(), solver = solver.name(), %message, "solver failed");
            RunResult::Failed(message)
        }
    };

    timing.total_time_s = started.elapsed().as_secs_f64();
    info!(
        model = model.name(),
        solver = solver.name(),
        outcome = result.label(),
        total_time_s = timing.total_time_s,
        "solve finished"
    );
    Ok(SolveRun {
        solver: solver.name().to_string(),
        timing,
        result,
    })
}
