//! sf-solver: the boundary between an assembled superstructure and an
//! external optimizer.
//!
//! Provides:
//! - `Solver` trait and `SolveOutcome` (feasible / infeasible / failed)
//! - `SolverSettings` with the LP solver vocabulary
//! - `solve_model`: runs a solver, verifies the assignment, times the call
//! - `SolvedModel`: serialisable per-stream, per-unit and per-process report
//!   with zero-band cleanup
//! - `ReplaySolver` for assignments computed out of process

pub mod error;
pub mod outcome;
pub mod replay;
pub mod report;
pub mod settings;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use outcome::{SolveOutcome, Solver};
pub use replay::{AssignmentStatus, NamedAssignment, ReplaySolver};
pub use report::{
    ConnectorReport, DisjunctionReport, ObjectiveReport, ProcessReport, SolvedModel,
    StreamReport, UnitReport,
};
pub use settings::{InitStrategy, LpSolver, SolverSettings};
pub use solve::{RunResult, SolveRun, SolveTiming, solve_model};
