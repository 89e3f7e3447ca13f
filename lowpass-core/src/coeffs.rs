//! Coefficient design for the resonant two-pole low-pass.
//!
//! The design is closed form: a normalized cutoff in `(0, 1)` (1 = Nyquist)
//! and a resonance in dB map to five recursive coefficients
//!
//! ```text
//! y[n] = a0*x[n] + a1*x[n-1] + a2*x[n-2] - b1*y[n-1] - b2*y[n-2]
//! ```
//!
//! Callers keep the normalized cutoff strictly below 1; at Nyquist the
//! sine term collapses and the design degenerates.

use crate::dsp::{db_to_lin, m_cos, m_sin, PI};

/// Recursive filter coefficients. `a*` feed forward, `b*` feed back.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Coefficients {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub b1: f64,
    pub b2: f64,
}

impl Coefficients {
    /// All five coefficients are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a0.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
    }
}

/// Maps `(cutoff_normalized, resonance_db)` to [`Coefficients`].
///
/// [`FilterEngine`](crate::filter::FilterEngine) is generic over this so the
/// design can be swapped or instrumented.
pub trait CoefficientDesign {
    fn calculate(&self, cutoff_normalized: f64, resonance_db: f64) -> Coefficients;
}

/// The closed-form resonant low-pass design.
#[derive(Copy, Clone, Debug, Default)]
pub struct LowPassDesign;

impl CoefficientDesign for LowPassDesign {
    #[inline]
    fn calculate(&self, cutoff_normalized: f64, resonance_db: f64) -> Coefficients {
        calculate(cutoff_normalized, resonance_db)
    }
}

/// Compute low-pass coefficients.
///
/// - `cutoff_normalized`: cutoff / Nyquist, in `(0, 1)`
/// - `resonance_db`     : positive values sharpen the peak at cutoff, negative values damp it
#[inline]
pub fn calculate(cutoff_normalized: f64, resonance_db: f64) -> Coefficients {
    // dB -> linear, inverted: more resonance means less damping
    let r = db_to_lin(-resonance_db);

    let w = PI * cutoff_normalized;
    let k = 0.5 * r * m_sin(w);
    let c1 = 0.5 * (1.0 - k) / (1.0 + k);
    let c2 = (0.5 + c1) * m_cos(w);
    let c3 = (0.5 + c1 - c2) * 0.25;

    Coefficients {
        a0: 2.0 * c3,
        a1: 4.0 * c3,
        a2: 2.0 * c3,
        b1: 2.0 * -c2,
        b2: 2.0 * c1,
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dc_gain(c: &Coefficients) -> f64 {
        (c.a0 + c.a1 + c.a2) / (1.0 + c.b1 + c.b2)
    }

    #[test]
    fn finite_across_parameter_grid() {
        let mut cut = 1.0e-4;
        while cut <= 0.99 {
            let mut res = -20.0;
            while res <= 20.0 {
                let c = calculate(cut, res);
                assert!(c.is_finite(), "cut={cut} res={res} -> {c:?}");
                res += 0.5;
            }
            cut *= 1.25;
        }
        assert!(calculate(0.99, 20.0).is_finite());
        assert!(calculate(0.99, -20.0).is_finite());
    }

    #[test]
    fn feed_forward_is_binomial() {
        let c = calculate(0.3, 4.0);
        assert_eq!(c.a1, 2.0 * c.a0);
        assert_eq!(c.a2, c.a0);
    }

    #[test]
    fn unity_gain_at_dc() {
        for (cut, res) in [(0.01, 0.0), (0.0453, 0.0), (0.2, -12.0), (0.8, 15.0)] {
            let g = dc_gain(&calculate(cut, res));
            assert!((g - 1.0).abs() < 1e-9, "cut={cut} res={res} g={g}");
        }
    }

    #[test]
    fn poles_stay_inside_unit_circle() {
        // |p|^2 = b2 for a complex pole pair; b2 = (1-k)/(1+k) < 1 whenever k > 0
        for res in [-20.0, 0.0, 20.0] {
            for cut in [0.001, 0.1, 0.5, 0.99] {
                let c = calculate(cut, res);
                assert!(c.b2 < 1.0 && c.b2 > -1.0, "cut={cut} res={res} b2={}", c.b2);
                assert!(c.b1.abs() < 1.0 + c.b2, "cut={cut} res={res} {c:?}");
            }
        }
    }

    #[test]
    fn known_values_at_1k_44k1() {
        let c = calculate(1000.0 * 2.0 / 44_100.0, 0.0);
        assert!((c.a0 - 0.004_730_417).abs() < 1e-8, "{c:?}");
        assert!((c.b1 + 1.848_496_916).abs() < 1e-8, "{c:?}");
        assert!((c.b2 - 0.867_418_586).abs() < 1e-8, "{c:?}");
    }

    #[test]
    fn design_trait_matches_free_function() {
        assert_eq!(LowPassDesign.calculate(0.25, 6.0), calculate(0.25, 6.0));
    }
}
