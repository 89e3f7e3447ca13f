//! Realtime block harness.
//!
//! [`Engine`] owns one [`FilterEngine`] per channel, the stream's sample rate
//! and a [`ParameterSource`]. Each block reads the parameters exactly once and
//! runs every channel with that snapshot. Channels are independent: same
//! controls, separate history.
//!
//! Design goals
//! - All allocation happens in `new`; the block methods are allocation free
//! - Configuration errors surface at construction / reconfiguration time
//! - Generic over the parameter source, so hosts can plug in fixed values,
//!   a shared atomic store, or their own automation reader

use log::debug;
use lowpass_core::coeffs::{calculate, Coefficients};
use lowpass_core::filter::{FilterEngine, NormalizedParameters};
use lowpass_core::response::{fill_response, Response};

use crate::error::{EngineError, Result};
use crate::params::ParameterSource;

pub struct Engine<P: ParameterSource> {
    sr: f64,
    params: P,
    channels: Vec<FilterEngine>,
}

#[inline]
fn check_sample_rate(sr: f64) -> Result<f64> {
    if sr.is_finite() && sr > 0.0 { Ok(sr) } else { Err(EngineError::InvalidSampleRate(sr)) }
}

impl<P: ParameterSource> Engine<P> {
    /// Build an engine for `channels` independent channels at `sample_rate` Hz.
    pub fn new(params: P, sample_rate: f64, channels: usize) -> Result<Self> {
        let sr = check_sample_rate(sample_rate)?;
        if channels == 0 {
            return Err(EngineError::NoChannels);
        }
        debug!("engine: {channels} channel(s) at {sr} Hz");
        Ok(Self { sr, params, channels: vec![FilterEngine::new(); channels] })
    }

    /// Reconfigure for a new stream rate. Every channel is reset, since the
    /// old history belongs to a different time base.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let sr = check_sample_rate(sample_rate)?;
        if sr != self.sr {
            debug!("engine: sample rate {} -> {} Hz", self.sr, sr);
            self.sr = sr;
            self.reset();
        }
        Ok(())
    }

    /// Discontinuity (transport stop, seek): clear every channel's history.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.reset();
        }
    }

    #[inline] pub fn sample_rate(&self) -> f64 { self.sr }
    #[inline] pub fn channel_count(&self) -> usize { self.channels.len() }
    #[inline] pub fn params(&self) -> &P { &self.params }
    #[inline] pub fn params_mut(&mut self) -> &mut P { &mut self.params }
    #[inline] pub fn channel(&self, i: usize) -> Option<&FilterEngine> { self.channels.get(i) }

    /// Process an interleaved buffer in place. A trailing partial frame is
    /// left untouched. Returns the number of frames processed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn process_interleaved(&mut self, buf: &mut [f32]) -> usize {
        self.prepare();
        let n = self.channels.len();

        let mut frames = 0;
        for frame in buf.chunks_exact_mut(n) {
            for (s, ch) in frame.iter_mut().zip(self.channels.iter_mut()) {
                *s = ch.tick(f64::from(*s)) as f32;
            }
            frames += 1;
        }
        frames
    }

    /// Process one buffer per channel, in place.
    pub fn process_planar(&mut self, planes: &mut [&mut [f32]]) -> Result<()> {
        if planes.len() != self.channels.len() {
            return Err(EngineError::ChannelMismatch { expected: self.channels.len(), got: planes.len() });
        }
        let params = self.params.filter_parameters();
        for (plane, ch) in planes.iter_mut().zip(self.channels.iter_mut()) {
            ch.process_in_place(&mut plane[..], self.sr, params);
        }
        Ok(())
    }

    /// Coefficients the current parameters map to at the current sample
    /// rate, whether or not a block has run with them yet.
    pub fn current_coefficients(&self) -> Coefficients {
        let p = NormalizedParameters::from_params(self.params.filter_parameters(), self.sr);
        calculate(p.cutoff_normalized, p.resonance_db)
    }

    /// Magnitude response for the current parameters and sample rate.
    pub fn response(&self, out: &mut [Response]) {
        fill_response(&self.current_coefficients(), self.sr, out);
    }

    /// Read the parameters once and bring every channel's coefficients up to date.
    #[inline]
    fn prepare(&mut self) {
        let params = self.params.filter_parameters();
        for ch in &mut self.channels {
            ch.prepare(self.sr, params);
        }
    }
}

// ------------------------------------ Tests --------------------------------------
