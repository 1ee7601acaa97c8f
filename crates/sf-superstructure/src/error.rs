//! Error types for superstructure assembly.

use sf_core::SfError;
use sf_expr::ExprError;
use sf_lci::InventoryError;
use sf_substances::SubstanceError;
use sf_unitops::{StreamIndex, UnitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Unit construction failed: {0}")]
    Unit(#[from] UnitError),

    #[error("Property data error: {0}")]
    Substance(#[from] SubstanceError),

    #[error("Model variable error: {0}")]
    Expr(#[from] ExprError),

    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Registry(#[from] SfError),

    #[error("Stream {0} has not been created")]
    UnknownStream(StreamIndex),

    #[error("Stream {0} is already fixed")]
    StreamAlreadyFixed(StreamIndex),

    #[error("Invalid initial state for stream {index}: {what}")]
    InvalidInitialState { index: StreamIndex, what: String },

    #[error("Unknown disjunct: {0}")]
    UnknownDisjunct(String),

    #[error("Disjunct {disjunct} belongs to {existing}, not {requested}")]
    DisjunctGroupConflict {
        disjunct: String,
        existing: String,
        requested: String,
    },

    #[error("Disjunction {disjunction} has {count} disjunct(s); at least 2 are required")]
    TooFewDisjuncts { disjunction: String, count: usize },

    #[error("Connector {0} has not been declared")]
    UndeclaredConnector(String),

    #[error("Connector {0} is defined more than once in the same scope")]
    ConnectorRedefined(String),

    #[error("Connector {0} has no defining equality")]
    ConnectorUndefined(String),

    #[error("Connector {connector} is defined in some disjuncts but not in {disjunct}")]
    ConnectorUndefinedInDisjunct { connector: String, disjunct: String },

    #[error("Connector {0} does not enter the inventory balance of its flow")]
    ConnectorNotCoupled(String),

    #[error("Inventory flow {0} carries a connector term that no connector declares")]
    UnknownCoupling(String),

    #[error("Inventory scale {inventory} differs from flowsheet scale {flowsheet}")]
    ScaleMismatch { flowsheet: f64, inventory: f64 },

    #[error("Inventory is incomplete: {what}")]
    InventoryIncomplete { what: &'static str },

    #[error("An inventory has already been imported")]
    InventoryAlreadyImported,

    #[error("No objective: set one or import an inventory")]
    MissingObjective,
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;

impl From<AssemblyError> for SfError {
    fn from(e: AssemblyError) -> Self {
        match e {
            AssemblyError::Unit(inner) => inner.into(),
            AssemblyError::Substance(inner) => inner.into(),
            AssemblyError::Expr(inner) => inner.into(),
            AssemblyError::Inventory(inner) => inner.into(),
            AssemblyError::Registry(inner) => inner,
            AssemblyError::UnknownStream(index) => SfError::NotFound {
                kind: "stream",
                key: index.to_string(),
            },
            AssemblyError::UnknownDisjunct(name) => SfError::NotFound {
                kind: "disjunct",
                key: name,
            },
            AssemblyError::UndeclaredConnector(name) => SfError::NotFound {
                kind: "connector",
                key: name,
            },
            other => SfError::Config {
                what: other.to_string(),
            },
        }
    }
}
