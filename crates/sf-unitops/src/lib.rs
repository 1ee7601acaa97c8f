//! sf-unitops: unit-operation library for synflow flowsheets.
//!
//! Provides:
//! - `Stream`: handles to the flow/temperature/pressure/composition variables of a stream
//! - `UnitOperation`: constraint generators over bound streams
//! - Compressor, heat exchanger, mixer, splitter
//! - Separator-based units: PSA, TSA, membrane (MSP), chemical absorption (CCA)
//! - Conversion reactor with reaction-specific operating windows
//!
//! Component balances skip water; its fraction follows from the closure
//! constraint of each outlet.

pub mod absorption;
pub mod adsorption;
pub mod compressor;
pub mod error;
pub mod heat_exchanger;
pub mod membrane;
pub mod mixer;
pub mod reactor;
pub mod separator;
pub mod splitter;
pub mod stream;
pub mod traits;
pub mod unit;

pub use absorption::Cca;
pub use adsorption::{Psa, SorbentVars, Tsa};
pub use compressor::Compressor;
pub use error::{UnitError, UnitResult};
pub use heat_exchanger::HeatExchanger;
pub use membrane::Msp;
pub use mixer::{Mixer, MixerPressure};
pub use reactor::{OperatingWindow, ReactionStep, Reactor};
pub use separator::SeparatorPorts;
pub use splitter::Splitter;
pub use stream::{Stream, StreamIndex, StreamKind};
pub use traits::{Attribute, Attributes, EFFICIENCY, UnitOperation};
pub use unit::Unit;
