//! The filter engine: parameter normalization, coefficient caching and the
//! per-sample recurrence.
//!
//! One [`FilterEngine`] serves exactly one channel. It holds the two-sample
//! input/output history and the coefficients last computed for it, and only
//! re-runs the coefficient design when the normalized parameters differ from
//! the ones applied on the previous block.
//!
//! Real-time rules for the block methods:
//! - no allocation, no locking, no I/O
//! - parameters are read once per block and held for the whole block
//! - samples are processed strictly in order (each output depends on the two
//!   previous inputs and outputs)

use crate::coeffs::{CoefficientDesign, Coefficients, LowPassDesign};
use crate::dsp::{clamp, kill_denormals, Sample};

/// Lowest cutoff the engine will honor, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Top of the cutoff control range, in Hz.
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;
pub const DEFAULT_CUTOFF_HZ: f32 = 1_000.0;

pub const MIN_RESONANCE_DB: f32 = -20.0;
pub const MAX_RESONANCE_DB: f32 = 20.0;
pub const DEFAULT_RESONANCE_DB: f32 = 0.0;

/// Ceiling for cutoff / Nyquist. Keeps the design away from the degenerate
/// point at Nyquist. Independent of resonance.
pub const MAX_CUTOFF_NORMALIZED: f64 = 0.99;

/// Control values as the host hands them over, once per block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilterParameters {
    pub cutoff_hz: f32,
    pub resonance_db: f32,
}

impl FilterParameters {
    #[inline]
    pub const fn new(cutoff_hz: f32, resonance_db: f32) -> Self {
        Self { cutoff_hz, resonance_db }
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_HZ, DEFAULT_RESONANCE_DB)
    }
}

/// Clamped parameters in the form the coefficient design consumes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NormalizedParameters {
    /// Cutoff / Nyquist, in `(0, MAX_CUTOFF_NORMALIZED]`.
    pub cutoff_normalized: f64,
    /// Resonance clamped to `[MIN_RESONANCE_DB, MAX_RESONANCE_DB]`.
    pub resonance_db: f64,
}

impl NormalizedParameters {
    /// "Never calculated". The negative cutoff lies outside the legal domain,
    /// so the first comparison against real parameters always fails.
    pub const NEVER: Self = Self { cutoff_normalized: -1.0, resonance_db: -1.0 };

    /// Clamp and normalize `params` for `sample_rate`.
    ///
    /// `sample_rate` must be positive; this is not checked. NaN controls fall
    /// back to their defaults.
    #[inline]
    pub fn from_params(params: FilterParameters, sample_rate: f64) -> Self {
        let nyquist_factor = 2.0 / sample_rate;

        let cutoff = if params.cutoff_hz.is_nan() { DEFAULT_CUTOFF_HZ } else { params.cutoff_hz };
        let mut cutoff_normalized = if cutoff < MIN_CUTOFF_HZ {
            f64::from(MIN_CUTOFF_HZ) * nyquist_factor
        } else {
            f64::from(cutoff) * nyquist_factor
        };
        if cutoff_normalized > MAX_CUTOFF_NORMALIZED {
            cutoff_normalized = MAX_CUTOFF_NORMALIZED;
        }

        let res = if params.resonance_db.is_nan() { DEFAULT_RESONANCE_DB } else { params.resonance_db };
        let resonance_db = clamp(
            f64::from(res),
            f64::from(MIN_RESONANCE_DB),
            f64::from(MAX_RESONANCE_DB),
        );

        Self { cutoff_normalized, resonance_db }
    }
}

/// Last two inputs (`x1`, `x2`) and outputs (`y1`, `y2`).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HistoryState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Single-channel resonant low-pass.
///
/// Generic over the coefficient design; [`LowPassDesign`] is the default.
/// Every mutating call takes `&mut self`, so one instance belongs to one
/// audio thread.
#[derive(Clone, Debug)]
pub struct FilterEngine<D: CoefficientDesign = LowPassDesign> {
    design: D,
    coeffs: Coefficients,
    history: HistoryState,
    last: NormalizedParameters,
}

impl FilterEngine<LowPassDesign> {
    #[inline]
    pub fn new() -> Self {
        Self::with_design(LowPassDesign)
    }
}

impl Default for FilterEngine<LowPassDesign> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: CoefficientDesign> FilterEngine<D> {
    /// Create an engine around a custom coefficient design.
    #[inline]
    pub fn with_design(design: D) -> Self {
        Self {
            design,
            coeffs: Coefficients::default(),
            history: HistoryState::default(),
            last: NormalizedParameters::NEVER,
        }
    }

    /// Zero the history and force the next block to recompute coefficients.
    ///
    /// Call after any discontinuity (transport stop, seek, stream restart).
    #[inline]
    pub fn reset(&mut self) {
        self.history = HistoryState::default();
        self.last = NormalizedParameters::NEVER;
    }

    /// Normalize `params` and recompute coefficients if they changed since
    /// the last block. Returns `true` when a recalculation happened.
    ///
    /// The comparison is exact on purpose: held controls produce bit-identical
    /// values and skip the design entirely.
    #[inline]
    #[allow(clippy::float_cmp)]
    pub fn prepare(&mut self, sample_rate: f64, params: FilterParameters) -> bool {
        let p = NormalizedParameters::from_params(params, sample_rate);
        if p.cutoff_normalized != self.last.cutoff_normalized
            || p.resonance_db != self.last.resonance_db
        {
            self.coeffs = self.design.calculate(p.cutoff_normalized, p.resonance_db);
            self.last = p;
            true
        } else {
            false
        }
    }

    /// Run the recurrence for one sample with the current coefficients.
    #[inline]
    pub fn tick(&mut self, x: f64) -> f64 {
        let c = &self.coeffs;
        let h = &mut self.history;

        let y = kill_denormals(c.a0 * x + c.a1 * h.x1 + c.a2 * h.x2 - c.b1 * h.y1 - c.b2 * h.y2);

        h.x2 = h.x1;
        h.x1 = x;
        h.y2 = h.y1;
        h.y1 = y;
        y
    }

    /// Filter `input` into `output`.
    ///
    /// Both slices should have the same length; if they differ, only the
    /// common prefix is processed.
    #[inline]
    pub fn process<S: Sample>(
        &mut self,
        input: &[S],
        output: &mut [S],
        sample_rate: f64,
        params: FilterParameters,
    ) {
        self.prepare(sample_rate, params);
        for (x, y) in input.iter().zip(output.iter_mut()) {
            *y = S::from_f64(self.tick(x.into_f64()));
        }
    }

    /// Filter `block` in place.
    #[inline]
    pub fn process_in_place<S: Sample>(
        &mut self,
        block: &mut [S],
        sample_rate: f64,
        params: FilterParameters,
    ) {
        self.prepare(sample_rate, params);
        for s in block.iter_mut() {
            *s = S::from_f64(self.tick(s.into_f64()));
        }
    }

    #[inline] pub fn coefficients(&self) -> &Coefficients { &self.coeffs }
    #[inline] pub fn history(&self) -> &HistoryState { &self.history }
    #[inline] pub fn design(&self) -> &D { &self.design }

    /// Parameters the current coefficients were computed from, or `None`
    /// before the first block / after a reset.
    #[inline]
    pub fn last_applied(&self) -> Option<NormalizedParameters> {
        if self.last == NormalizedParameters::NEVER { None } else { Some(self.last) }
    }
}

// ------------------------------------ Tests --------------------------------------
