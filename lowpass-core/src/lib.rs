#![cfg_attr(not(feature = "std"), no_std)]
//! LowPass Core: no_std-ready resonant low-pass filter.
//!
//! Features
//! - `std`      : (default) use the Rust standard library
//! - `no-std`   : build with `#![no_std]` and use the `libm` math backend
//!
//! Modules
//! - [`dsp`]      : math backend, sample trait, dB/linear helpers
//! - [`coeffs`]   : closed-form coefficient design
//! - [`filter`]   : `FilterEngine` (parameter clamping, coefficient cache, recurrence)
//! - [`response`] : magnitude response curves
//!
//! Design
//! - No heap allocations; one engine per channel, `&mut self` on every mutation
//! - Coefficients are recomputed only when the normalized parameters change
//! - Out-of-range controls are clamped, never rejected

pub mod coeffs;
pub mod dsp;
pub mod filter;
pub mod response;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::coeffs::{calculate, CoefficientDesign, Coefficients, LowPassDesign};
    pub use crate::dsp::{db_to_lin, lin_to_db, Sample};
    pub use crate::filter::{
        FilterEngine, FilterParameters, HistoryState, NormalizedParameters, DEFAULT_CUTOFF_HZ,
        DEFAULT_RESONANCE_DB, MAX_CUTOFF_HZ, MAX_CUTOFF_NORMALIZED, MAX_RESONANCE_DB,
        MIN_CUTOFF_HZ, MIN_RESONANCE_DB,
    };
    pub use crate::response::{fill_response, magnitude_at, Response, NUM_RESPONSE_FREQUENCIES};
}

#[cfg(test)]
mod smoke {

    #[test]
    fn prelude_exists() {
        use crate::prelude::*;
        let _ = db_to_lin(-6.0);
        let mut lp = FilterEngine::new();
        let mut block = [1.0_f32, 0.0, 0.0, 0.0];
        lp.process_in_place(&mut block, 48_000.0, FilterParameters::default());
        let mut curve = [Response::default(); 8];
        fill_response(lp.coefficients(), 48_000.0, &mut curve);
    }
}
