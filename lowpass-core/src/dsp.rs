//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Clean, side-effect free helpers that are easy to test
//!
//! All filter math runs in `f64`; sample buffers may be `f32` or `f64`
//! through the [`Sample`] trait.

use num_traits::float::FloatCore;
use num_traits::AsPrimitive;

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // libm (C math) in no_std
    if #[cfg(feature = "no-std")] {
        #[inline] pub(crate) fn m_sin(x: f64) -> f64 { libm::sin(x) }
        #[inline] pub(crate) fn m_cos(x: f64) -> f64 { libm::cos(x) }
        #[inline] pub(crate) fn m_pow(x: f64, y: f64) -> f64 { libm::pow(x, y) }
        #[inline] pub(crate) fn m_log10(x: f64) -> f64 { libm::log10(x) }
        #[inline] pub(crate) fn m_sqrt(x: f64) -> f64 { libm::sqrt(x) }
    // std backend
    } else {
        #[inline] pub(crate) fn m_sin(x: f64) -> f64 { x.sin() }
        #[inline] pub(crate) fn m_cos(x: f64) -> f64 { x.cos() }
        #[inline] pub(crate) fn m_pow(x: f64, y: f64) -> f64 { x.powf(y) }
        #[inline] pub(crate) fn m_log10(x: f64) -> f64 { x.log10() }
        #[inline] pub(crate) fn m_sqrt(x: f64) -> f64 { x.sqrt() }
    }
}

// --------------------------------- Constants -------------------------------------

pub use core::f64::consts::PI;

/// A very small epsilon used in denormal handling and safe divisions.
pub const EPS_SMALL: f64 = 1.0e-20;

/// Floor returned by [`lin_to_db`] for silent (or negative) magnitudes.
pub const DB_FLOOR: f64 = -240.0;

// --------------------------------- Sample type -----------------------------------

/// Audio sample element a filter block can be made of.
///
/// Implemented for `f32` (the usual host buffer format) and `f64`.
pub trait Sample: FloatCore + AsPrimitive<f64> {
    fn from_f64(v: f64) -> Self;

    #[inline]
    fn into_f64(self) -> f64 {
        self.as_()
    }
}

impl Sample for f32 {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

// --------------------------------- Utilities -------------------------------------

/// Clamp `x` into `[lo, hi]`. NaN passes through unchanged.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

/// Flush f64 subnormals to 0.0. Every normal value passes through unchanged.
#[inline]
pub fn kill_denormals(x: f64) -> f64 {
    if x.is_subnormal() { 0.0 } else { x }
}

// --------------------------------- dB / linear -----------------------------------

/// Convert dB to linear gain: lin = 10^(db/20).
#[inline]
pub fn db_to_lin(db: f64) -> f64 {
    m_pow(10.0, db / 20.0)
}

/// Convert linear gain to dB: db = 20*log10(lin). Clamps silence to [`DB_FLOOR`].
#[inline]
pub fn lin_to_db(lin: f64) -> f64 {
    if lin <= EPS_SMALL { DB_FLOOR } else { 20.0 * m_log10(lin) }
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_lin_roundtrip() {
        for db in [-60.0, -20.0, -6.0, 0.0, 6.0, 12.0, 20.0] {
            let back = lin_to_db(db_to_lin(db));
            assert!((db - back).abs() < 1e-9, "db={db}, back={back}");
        }
    }

    #[test]
    fn db_reference_points() {
        assert!((db_to_lin(20.0) - 10.0).abs() < 1e-12);
        assert!((db_to_lin(-20.0) - 0.1).abs() < 1e-12);
        assert_eq!(db_to_lin(0.0), 1.0);
        assert_eq!(lin_to_db(0.0), DB_FLOOR);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(-30.0, -20.0, 20.0), -20.0);
        assert_eq!(clamp(50.0, -20.0, 20.0), 20.0);
        assert_eq!(clamp(3.5, -20.0, 20.0), 3.5);
    }

    #[test]
    fn only_subnormals_are_flushed() {
        assert_eq!(kill_denormals(f64::MIN_POSITIVE / 4.0), 0.0);
        assert_eq!(kill_denormals(-f64::MIN_POSITIVE / 1.0e3), 0.0);
        assert_eq!(kill_denormals(f64::MIN_POSITIVE), f64::MIN_POSITIVE);
        assert_eq!(kill_denormals(1.0e-30), 1.0e-30);
        assert_eq!(kill_denormals(-1.0e-25), -1.0e-25);
        assert_eq!(kill_denormals(0.25), 0.25);
    }

    #[test]
    fn sample_conversions() {
        assert_eq!(<f32 as Sample>::from_f64(0.5), 0.5_f32);
        assert_eq!(0.25_f32.into_f64(), 0.25);
        assert_eq!(<f64 as Sample>::from_f64(-1.5), -1.5);
    }
}
