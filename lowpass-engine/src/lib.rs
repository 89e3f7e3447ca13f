//! LowPass Engine: host-side glue around the filter core.
//!
//! Crate layout:
//! - [`graph`]   : `Engine<P>`, the multi-channel block harness
//! - [`params`]  : parameter metadata, `ParameterSource`, lock-free `SharedParams`
//! - [`presets`] : factory presets and JSON preset banks
//! - [`signals`] : impulse / step / sine / noise test signals
//! - [`error`]   : configuration-time errors
//!
//! The block methods never allocate, lock or log. Everything that can fail
//! does so at configuration time and returns [`EngineError`].

pub mod error;
pub mod graph;
pub mod params;
pub mod presets;
pub mod signals;

// Re-export some commonly used items to make downstream imports ergonomic.
pub use error::{EngineError, Result};
pub use graph::Engine;
pub use lowpass_core::filter::FilterParameters;
pub use params::{ParamId, ParamInfo, ParameterSource, SharedParams, PARAMS};
pub use presets::{FactoryPresets, PresetBank, PresetLookup};
pub use signals::{Signal, SignalGen};
