//! Core trait for unit-operation constraint generators.

use std::fmt;

use serde::Serialize;
use sf_expr::{ConstraintBlock, VariableStore};
use sf_substances::{Reaction, Substance};

use crate::error::UnitResult;
use crate::stream::StreamIndex;

/// Isentropic/thermal efficiency shared by compressors, heat exchangers and
/// reactor heat input.
pub const EFFICIENCY: f64 = 0.7;

/// Value of one reporting attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attribute {
    Stream(StreamIndex),
    Substance(Substance),
    Reaction(Reaction),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Stream(i) => write!(f, "{i}"),
            Attribute::Substance(k) => write!(f, "{k}"),
            Attribute::Reaction(r) => write!(f, "{r}"),
        }
    }
}

/// Ordered attribute map of a unit.
pub type Attributes = Vec<(&'static str, Attribute)>;

/// A unit operation: a pure generator of constraints over bound streams and
/// auxiliary variables.
///
/// `build` only reads the variable store; current values are consulted where a
/// correlation range or a structural choice depends on them.
pub trait UnitOperation {
    fn name(&self) -> &str;

    /// Human-readable type label used in reports.
    fn type_label(&self) -> &'static str;

    /// Key stream indices and parameters for reporting.
    fn attributes(&self) -> Attributes;

    /// Emit the unit's constraint block.
    fn build(&self, vars: &VariableStore) -> UnitResult<ConstraintBlock>;
}
