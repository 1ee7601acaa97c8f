//! Error types for unit-operation construction.

use sf_core::SfError;
use sf_expr::ExprError;
use sf_substances::SubstanceError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Property data error: {0}")]
    Substance(#[from] SubstanceError),

    #[error("Model variable error: {0}")]
    Expr(#[from] ExprError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}

pub type UnitResult<T> = Result<T, UnitError>;

impl From<UnitError> for SfError {
    fn from(e: UnitError) -> Self {
        match e {
            UnitError::Substance(inner) => inner.into(),
            UnitError::Expr(inner) => inner.into(),
            UnitError::InvalidArg { what } => SfError::InvalidArg { what },
        }
    }
}
