//! sf-core: stable foundation for synflow.
//!
//! Contains:
//! - units (uom SI types + constructors, kelvin/bar accessors)
//! - numeric (Real + tolerances + report cleanup)
//! - ids (decision-variable handles)
//! - registry (insertion-ordered keyed storage with duplicate detection)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod registry;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SfError, SfResult};
pub use ids::*;
pub use numeric::*;
pub use registry::Registry;
pub use units::*;
