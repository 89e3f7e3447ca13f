//! Parameter surface the filter presents to a host or UI.
//!
//! Two controls, both plain floats in engineering units:
//! - Cutoff    : Hz, logarithmic knob, [20, 20000], default 1000
//! - Resonance : dB, linear knob, [-20, 20], default 0
//!
//! The audio thread only ever sees a [`ParameterSource`], read once per block.
//! [`SharedParams`] is the lock-free store a control thread writes into.

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use atomic_float::AtomicF32;
use lowpass_core::filter::{
    FilterParameters, DEFAULT_CUTOFF_HZ, DEFAULT_RESONANCE_DB, MAX_CUTOFF_HZ, MAX_RESONANCE_DB,
    MIN_CUTOFF_HZ, MIN_RESONANCE_DB,
};

use crate::error::{EngineError, Result};

/// Stable parameter ids. The numeric values are part of the C ABI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ParamId {
    Cutoff = 0,
    Resonance = 1,
}

impl ParamId {
    pub const ALL: [ParamId; 2] = [ParamId::Cutoff, ParamId::Resonance];

    pub fn from_index(i: u32) -> Result<Self> {
        match i {
            0 => Ok(ParamId::Cutoff),
            1 => Ok(ParamId::Resonance),
            other => Err(EngineError::UnknownParameter(other)),
        }
    }

    #[inline]
    pub fn index(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn info(self) -> &'static ParamInfo {
        &PARAMS[self as usize]
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamUnit {
    Hertz,
    Decibels,
}

impl ParamUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            ParamUnit::Hertz => "Hz",
            ParamUnit::Decibels => "dB",
        }
    }
}

/// How a control's value maps onto a `[0, 1]` knob position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParameterRange {
    Linear(f32, f32),
    Logarithmic(f32, f32),
}

impl ParameterRange {
    #[inline]
    pub fn min(&self) -> f32 {
        match *self {
            Self::Linear(min, _) | Self::Logarithmic(min, _) => min,
        }
    }

    #[inline]
    pub fn max(&self) -> f32 {
        match *self {
            Self::Linear(_, max) | Self::Logarithmic(_, max) => max,
        }
    }

    /// Value in engineering units -> knob position in `[0, 1]`.
    pub fn to_normalized(&self, x: f32) -> f32 {
        let x = x.clamp(self.min(), self.max());
        match *self {
            Self::Linear(min, max) => (x - min) / (max - min),
            Self::Logarithmic(min, max) => (x / min).ln() / (max / min).ln(),
        }
    }

    /// Knob position in `[0, 1]` -> value in engineering units.
    pub fn from_normalized(&self, n: f32) -> f32 {
        let n = n.clamp(0.0, 1.0);
        match *self {
            Self::Linear(min, max) => min + n * (max - min),
            Self::Logarithmic(min, max) => min * (max / min).powf(n),
        }
    }
}

/// Static description of one control.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamInfo {
    pub id: ParamId,
    pub name: &'static str,
    pub unit: ParamUnit,
    pub range: ParameterRange,
    pub default: f32,
}

impl ParamInfo {
    #[inline] pub fn min(&self) -> f32 { self.range.min() }
    #[inline] pub fn max(&self) -> f32 { self.range.max() }
    #[inline] pub fn is_logarithmic(&self) -> bool { matches!(self.range, ParameterRange::Logarithmic(..)) }

    /// Format a value for display, e.g. `"1000.0 Hz"`.
    pub fn display(&self, value: f32) -> String {
        format!("{value:.1} {}", self.unit.symbol())
    }
}

pub static PARAMS: [ParamInfo; 2] = [
    ParamInfo {
        id: ParamId::Cutoff,
        name: "Cutoff",
        unit: ParamUnit::Hertz,
        range: ParameterRange::Logarithmic(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ),
        default: DEFAULT_CUTOFF_HZ,
    },
    ParamInfo {
        id: ParamId::Resonance,
        name: "Resonance",
        unit: ParamUnit::Decibels,
        range: ParameterRange::Linear(MIN_RESONANCE_DB, MAX_RESONANCE_DB),
        default: DEFAULT_RESONANCE_DB,
    },
];

/// Anything that can hand the filter its current controls.
///
/// Called once at the start of every block on the audio thread, so
/// implementations must not block or allocate.
pub trait ParameterSource {
    fn filter_parameters(&self) -> FilterParameters;
}

impl ParameterSource for FilterParameters {
    #[inline]
    fn filter_parameters(&self) -> FilterParameters {
        *self
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for Arc<T> {
    #[inline]
    fn filter_parameters(&self) -> FilterParameters {
        (**self).filter_parameters()
    }
}

impl<T: ParameterSource + ?Sized> ParameterSource for &T {
    #[inline]
    fn filter_parameters(&self) -> FilterParameters {
        (**self).filter_parameters()
    }
}

/// Lock-free parameter store shared between a control thread and the audio
/// thread. Values are stored as given; the filter core does the clamping.
#[derive(Debug)]
pub struct SharedParams {
    cutoff_hz: AtomicF32,
    resonance_db: AtomicF32,
}

impl SharedParams {
    pub fn new(initial: FilterParameters) -> Self {
        Self {
            cutoff_hz: AtomicF32::new(initial.cutoff_hz),
            resonance_db: AtomicF32::new(initial.resonance_db),
        }
    }

    #[inline]
    fn slot(&self, id: ParamId) -> &AtomicF32 {
        match id {
            ParamId::Cutoff => &self.cutoff_hz,
            ParamId::Resonance => &self.resonance_db,
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.slot(id).load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, id: ParamId, value: f32) {
        self.slot(id).store(value, Ordering::Relaxed);
    }

    /// Set a control from a `[0, 1]` knob position.
    pub fn set_normalized(&self, id: ParamId, n: f32) {
        self.set(id, id.info().range.from_normalized(n));
    }

    pub fn set_parameters(&self, params: FilterParameters) {
        self.set(ParamId::Cutoff, params.cutoff_hz);
        self.set(ParamId::Resonance, params.resonance_db);
    }

    /// Restore every control to its default.
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.set(id, id.info().default);
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(FilterParameters::default())
    }
}

impl ParameterSource for SharedParams {
    #[inline]
    fn filter_parameters(&self) -> FilterParameters {
        FilterParameters::new(self.get(ParamId::Cutoff), self.get(ParamId::Resonance))
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_ids() {
        for id in ParamId::ALL {
            assert_eq!(id.info().id, id);
            assert_eq!(ParamId::from_index(id.index()).unwrap(), id);
        }
        assert!(matches!(ParamId::from_index(7), Err(EngineError::UnknownParameter(7))));
    }

    #[test]
    fn declared_ranges_and_defaults() {
        let cut = ParamId::Cutoff.info();
        assert_eq!((cut.min(), cut.max(), cut.default), (20.0, 20_000.0, 1_000.0));
        assert!(cut.is_logarithmic());
        assert_eq!(cut.unit, ParamUnit::Hertz);

        let res = ParamId::Resonance.info();
        assert_eq!((res.min(), res.max(), res.default), (-20.0, 20.0, 0.0));
        assert!(!res.is_logarithmic());
        assert_eq!(res.display(-3.0), "-3.0 dB");
    }

    #[test]
    fn log_knob_puts_geometric_mean_in_the_middle() {
        let range = ParamId::Cutoff.info().range;
        assert!((range.to_normalized(632.455_5) - 0.5).abs() < 1e-4);
        assert!((range.from_normalized(0.5) - 632.455_5).abs() < 0.05);
        assert_eq!(range.to_normalized(5.0), 0.0);
        assert!((range.from_normalized(1.0) - 20_000.0).abs() < 0.5);
    }

    #[test]
    fn linear_knob_roundtrip() {
        let range = ParamId::Resonance.info().range;
        for v in [-20.0, -7.5, 0.0, 12.0, 20.0] {
            let back = range.from_normalized(range.to_normalized(v));
            assert!((back - v).abs() < 1e-4, "v={v} back={back}");
        }
        assert_eq!(range.to_normalized(0.0), 0.5);
    }

    #[test]
    fn shared_params_round_trip_values() {
        let p = SharedParams::default();
        assert_eq!(p.filter_parameters(), FilterParameters::default());

        p.set(ParamId::Cutoff, 440.0);
        p.set(ParamId::Resonance, -3.0);
        assert_eq!(p.filter_parameters(), FilterParameters::new(440.0, -3.0));

        p.set_normalized(ParamId::Resonance, 1.0);
        assert_eq!(p.get(ParamId::Resonance), 20.0);

        p.reset_to_defaults();
        assert_eq!(p.filter_parameters(), FilterParameters::default());
    }

    #[test]
    fn shared_params_visible_across_threads() {
        let p = Arc::new(SharedParams::default());
        let writer = Arc::clone(&p);
        std::thread::spawn(move || writer.set_parameters(FilterParameters::new(250.0, 6.0)))
            .join()
            .unwrap();
        assert_eq!(p.filter_parameters(), FilterParameters::new(250.0, 6.0));
    }
}
