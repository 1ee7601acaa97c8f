//! Inventory errors.

use sf_core::SfError;
use sf_expr::ExprError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Inconsistent inventory dimensions: {what}")]
    Dimension { what: String },

    #[error("Input matrix is not one-dimensional ({rows}x{cols})")]
    NotOneDimensional { rows: usize, cols: usize },

    #[error(transparent)]
    Core(#[from] SfError),

    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    #[error("Unknown intermediate flow: {0}")]
    UnknownFlow(String),

    #[error("Unknown scenario for LCI: {0}")]
    UnknownScenario(String),

    #[error("Scenario '{scenario}' requires {what}")]
    ScenarioInput { scenario: String, what: String },

    #[error("Connector '{0}' has no matching intermediate flow")]
    UnmatchedConnector(String),

    #[error("{what} already constructed")]
    AlreadyBuilt { what: &'static str },

    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),

    #[error("Model variable error: {0}")]
    Expr(#[from] ExprError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<InventoryError> for SfError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::UnknownProcess(key) => SfError::NotFound {
                kind: "process",
                key,
            },
            InventoryError::UnknownFlow(key) => SfError::NotFound {
                kind: "intermediate flow",
                key,
            },
            InventoryError::UnknownScenario(key) => SfError::NotFound {
                kind: "scenario",
                key,
            },
            InventoryError::Expr(inner) => inner.into(),
            InventoryError::Core(inner) => inner,
            other => SfError::Config {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = InventoryError::NotOneDimensional { rows: 2, cols: 3 };
        assert!(err.to_string().contains("2x3"));
    }

    #[test]
    fn scenario_error_maps_to_not_found() {
        let sf: SfError = InventoryError::UnknownScenario("Nuclear".into()).into();
        assert!(matches!(sf, SfError::NotFound { kind: "scenario", .. }));
        let sf: SfError = InventoryError::InvalidScale(0.0).into();
        assert!(matches!(sf, SfError::Config { .. }));
    }
}
