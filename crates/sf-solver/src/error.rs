//! Error types for the solve boundary.

use sf_core::SfError;
use sf_expr::ExprError;
use thiserror::Error;

/// Errors raised around a solve. An infeasible model is not an error; see
/// [`crate::SolveOutcome`].
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Unknown LP solver: {0} (expected glpk or gurobi)")]
    UnknownLpSolver(String),

    #[error("Invalid solver settings: {what}")]
    Settings { what: String },

    #[error("Assignment has {got} values, model has {expected} variables")]
    AssignmentLength { expected: usize, got: usize },

    #[error("Solver {solver} returned an assignment violating {count} checks, first: {first}")]
    InvalidSolution {
        solver: String,
        count: usize,
        first: String,
    },

    #[error("Expression error: {0}")]
    Expr(#[from] ExprError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for SfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::UnknownLpSolver(name) => SfError::NotFound {
                kind: "LP solver",
                key: name,
            },
            SolverError::InvalidSolution { .. } | SolverError::AssignmentLength { .. } => {
                SfError::Invariant {
                    what: e.to_string(),
                }
            }
            other => SfError::Config {
                what: other.to_string(),
            },
        }
    }
}
