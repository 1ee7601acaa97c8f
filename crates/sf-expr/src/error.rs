//! Error types for symbolic model construction.

use sf_core::{SfError, VarId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Invalid bounds for variable {name}: [{lower}, {upper}]")]
    InvalidBounds {
        name: String,
        lower: f64,
        upper: f64,
    },

    #[error("Unknown variable {0:?}")]
    UnknownVar(VarId),

    #[error("Value vector has {got} entries, model has {expected} variables")]
    ValueLength { expected: usize, got: usize },
}

pub type ExprResult<T> = Result<T, ExprError>;

impl From<ExprError> for SfError {
    fn from(e: ExprError) -> Self {
        match e {
            ExprError::InvalidBounds { .. } => SfError::InvalidArg {
                what: e.to_string(),
            },
            ExprError::UnknownVar(id) => SfError::NotFound {
                kind: "variable",
                key: id.to_string(),
            },
            ExprError::ValueLength { .. } => SfError::Invariant {
                what: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_conversion() {
        let err = ExprError::UnknownVar(VarId::from_index(3));
        let sf: SfError = err.into();
        assert!(matches!(sf, SfError::NotFound { kind: "variable", .. }));
    }
}
