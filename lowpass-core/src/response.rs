//! Magnitude response of a coefficient set.
//!
//! Evaluates `|H(e^{jω})|` for
//!
//! ```text
//!          a0 + a1 z^-1 + a2 z^-2
//! H(z) = --------------------------
//!           1 + b1 z^-1 + b2 z^-2
//! ```
//!
//! at log-spaced frequencies, for display curves and analysis. Output goes
//! into caller-owned storage, so a UI thread can refresh a fixed buffer
//! without allocating.

use crate::coeffs::Coefficients;
use crate::dsp::{lin_to_db, m_cos, m_pow, m_sin, m_sqrt, PI};
use crate::filter::{MAX_CUTOFF_NORMALIZED, MIN_CUTOFF_HZ};

/// Default number of points in a response curve.
pub const NUM_RESPONSE_FREQUENCIES: usize = 512;

/// One point of a magnitude response curve. C layout, so FFI callers can
/// pass arrays of it straight through.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Response {
    pub freq_hz: f64,
    pub magnitude_db: f64,
}

/// Linear magnitude of `coeffs` at `freq_hz`.
#[inline]
pub fn magnitude_at(coeffs: &Coefficients, freq_hz: f64, sample_rate: f64) -> f64 {
    let w = 2.0 * PI * freq_hz / sample_rate;
    let (c1, s1) = (m_cos(w), m_sin(w));
    let (c2, s2) = (m_cos(2.0 * w), m_sin(2.0 * w));

    let num_re = coeffs.a0 + coeffs.a1 * c1 + coeffs.a2 * c2;
    let num_im = -(coeffs.a1 * s1 + coeffs.a2 * s2);
    let den_re = 1.0 + coeffs.b1 * c1 + coeffs.b2 * c2;
    let den_im = -(coeffs.b1 * s1 + coeffs.b2 * s2);

    let den = den_re * den_re + den_im * den_im;
    if den <= 0.0 {
        return f64::INFINITY;
    }
    m_sqrt((num_re * num_re + num_im * num_im) / den)
}

/// Frequency of point `i` out of `n`, log-spaced from the minimum cutoff up
/// to the normalized-cutoff ceiling.
#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn response_frequency(i: usize, n: usize, sample_rate: f64) -> f64 {
    let lo = f64::from(MIN_CUTOFF_HZ);
    let hi = 0.5 * sample_rate * MAX_CUTOFF_NORMALIZED;
    if n <= 1 || hi <= lo {
        return lo;
    }
    lo * m_pow(hi / lo, i as f64 / (n - 1) as f64)
}

/// Fill `out` with the magnitude response (dB) of `coeffs`.
pub fn fill_response(coeffs: &Coefficients, sample_rate: f64, out: &mut [Response]) {
    let n = out.len();
    for (i, point) in out.iter_mut().enumerate() {
        let freq_hz = response_frequency(i, n, sample_rate);
        *point = Response {
            freq_hz,
            magnitude_db: lin_to_db(magnitude_at(coeffs, freq_hz, sample_rate)),
        };
    }
}

// ------------------------------------ Tests --------------------------------------
