//! sf-superstructure: disjunctive flowsheet assembly for synflow.
//!
//! Provides:
//! - `Superstructure`: declares streams, units and disjunct alternatives,
//!   owns the global index sets and unit variable containers
//! - Connector vocabulary coupling the flowsheet to the inventory sub-model
//! - `AssembledModel`: the frozen result, with a feasibility evaluator that
//!   honours exactly-one disjunct selection
//! - `Superstructure::inventory_only` for technology-choice runs without a
//!   flowsheet
//!
//! Typical flow:
//! 1. Fix feed streams and create units (top-level or inside disjuncts)
//! 2. Declare and define connectors, set up and import an inventory
//! 3. `create_disjunctions()` to freeze the model for a solver

pub mod assembler;
pub mod connector;
pub mod disjunct;
pub mod error;
pub mod impact;
pub mod model;
mod standalone;
pub mod variables;

pub use assembler::{SeparationSpec, StreamEntry, Superstructure, UnitEntry, UnitSpec};
pub use connector::{CONNECTOR_BOUNDS, Connector};
pub use disjunct::{Disjunct, Disjunction};
pub use error::{AssemblyError, AssemblyResult};
pub use impact::ImpactFactors;
pub use model::{AssembledModel, Violation};
pub use variables::{SorbentHandles, UnitVariables};
