//! sf-substances: species data for synflow flowsheets.
//!
//! Provides:
//! - `Substance` and `SubstanceMap`: the fixed seven-component set
//! - Shomate enthalpy and heat-capacity correlations (numeric and symbolic)
//! - Reference steel-mill gases and validated feed compositions
//! - Reaction catalogue (enthalpy, key component, stoichiometry)
//! - PSA/membrane separation parameters

pub mod error;
pub mod mixture;
pub mod reaction;
pub mod separation;
pub mod shomate;
pub mod substance;

pub use error::{SubstanceError, SubstanceResult};
pub use mixture::{COMPOSITION_TOL, FeedComposition, ReferenceMixture};
pub use reaction::Reaction;
pub use separation::{ZEOLITE_HEAT_CAPACITY, msp_alpha, psa_beta};
pub use substance::{Substance, SubstanceMap};
