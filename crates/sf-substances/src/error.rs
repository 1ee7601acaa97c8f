//! Substance and property-table errors.

use sf_core::SfError;
use thiserror::Error;

pub type SubstanceResult<T> = Result<T, SubstanceError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstanceError {
    #[error("Unknown substance: {0}")]
    UnknownSubstance(String),

    #[error("Unknown reference mixture: {0}")]
    UnknownMixture(String),

    #[error("Unknown chemical reaction: {0}")]
    UnknownReaction(String),

    #[error("No {table} data for key component {key}")]
    UnsupportedKey { table: &'static str, key: String },

    #[error("Invalid composition: {what}")]
    InvalidComposition { what: String },
}

impl From<SubstanceError> for SfError {
    fn from(err: SubstanceError) -> Self {
        match err {
            SubstanceError::UnknownSubstance(key) => SfError::NotFound {
                kind: "substance",
                key,
            },
            SubstanceError::UnknownMixture(key) => SfError::NotFound {
                kind: "reference mixture",
                key,
            },
            SubstanceError::UnknownReaction(key) => SfError::NotFound {
                kind: "reaction",
                key,
            },
            other => SfError::Config {
                what: other.to_string(),
            },
        }
    }
}
