use thiserror::Error;

pub type SfResult<T> = Result<T, SfError>;

/// Workspace-wide error. Every crate-specific error converts into this one.
///
/// `Config` covers everything detected while building a model: unknown
/// reaction, scenario or LP solver names, malformed inventory data,
/// incompatible redeclarations and incomplete connector coupling. Such
/// errors abort construction; nothing built so far is handed to a solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SfError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Fatal configuration error, model build aborted: {what}")]
    Config { what: String },

    #[error("Duplicate {kind}: {key}")]
    Duplicate { kind: &'static str, key: String },

    #[error("Unknown {kind}: {key}")]
    NotFound { kind: &'static str, key: String },

    /// A solution or value vector does not fit the model it was applied to.
    #[error("Inconsistent model state: {what}")]
    Invariant { what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_read_as_fatal() {
        let err = SfError::Config {
            what: "unknown reaction XYZ".into(),
        };
        assert_eq!(
            err.to_string(),
            "Fatal configuration error, model build aborted: unknown reaction XYZ"
        );
    }
}
