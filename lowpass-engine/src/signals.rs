//! Test signals for driving the filter without an input file.
//!
//! Everything here is mono and allocation free once constructed. White noise
//! uses a seeded `StdRng`, so renders are reproducible.
//!
//! Contents:
//! - `Signal`    : which waveform to produce, parsed from CLI names
//! - `SignalGen` : stateful generator, one sample at a time or block fills

use std::f32::consts::TAU;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EngineError;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Signal {
    /// A single 1.0 followed by silence.
    Impulse,
    /// Constant `level` (a DC step from silence).
    Step { level: f32 },
    Sine { freq_hz: f32, amp: f32 },
    /// Uniform white noise in `[-amp, amp]`.
    Noise { amp: f32 },
}

impl FromStr for Signal {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "impulse" => Ok(Signal::Impulse),
            "step" | "dc" => Ok(Signal::Step { level: 0.5 }),
            "sine" => Ok(Signal::Sine { freq_hz: 440.0, amp: 0.5 }),
            "noise" => Ok(Signal::Noise { amp: 0.25 }),
            other => Err(EngineError::UnknownSignal(other.to_string())),
        }
    }
}

pub struct SignalGen {
    signal: Signal,
    sr: f32,
    phase: f32, // [0,1)
    n: u64,
    seed: u64,
    rng: StdRng,
}

impl SignalGen {
    pub fn new(signal: Signal, sr: f32, seed: u64) -> Self {
        Self {
            signal,
            sr: sr.max(1.0),
            phase: 0.0,
            n: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline] pub fn signal(&self) -> Signal { self.signal }

    /// Restart from sample zero with the original seed.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.n = 0;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Advance one sample.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let s = match self.signal {
            Signal::Impulse => if self.n == 0 { 1.0 } else { 0.0 },
            Signal::Step { level } => level,
            Signal::Sine { freq_hz, amp } => {
                let s = amp * (TAU * self.phase).sin();
                self.phase = (self.phase + freq_hz / self.sr) % 1.0;
                s
            }
            Signal::Noise { amp } => amp * self.rng.gen_range(-1.0_f32..=1.0),
        };
        self.n += 1;
        s
    }

    /// Fill a mono block.
    pub fn fill(&mut self, out: &mut [f32]) {
        for s in out.iter_mut() {
            *s = self.next();
        }
    }

    /// Fill an interleaved block, duplicating each sample to every channel.
    pub fn fill_interleaved(&mut self, out: &mut [f32], channels: usize) {
        for frame in out.chunks_mut(channels.max(1)) {
            let s = self.next();
            frame.fill(s);
        }
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_names() {
        assert_eq!("impulse".parse::<Signal>().unwrap(), Signal::Impulse);
        assert_eq!("DC".parse::<Signal>().unwrap(), Signal::Step { level: 0.5 });
        assert!(matches!("sine".parse::<Signal>(), Ok(Signal::Sine { .. })));
        assert!(matches!("square".parse::<Signal>(), Err(EngineError::UnknownSignal(_))));
    }

    #[test]
    fn impulse_then_silence() {
        let mut g = SignalGen::new(Signal::Impulse, 48_000.0, 0);
        let mut block = [9.0_f32; 8];
        g.fill(&mut block);
        assert_eq!(block, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn noise_is_bounded_and_reproducible() {
        let mut a = SignalGen::new(Signal::Noise { amp: 0.25 }, 48_000.0, 7);
        let mut first = [0.0_f32; 256];
        a.fill(&mut first);
        assert!(first.iter().all(|s| s.abs() <= 0.25));

        a.reset();
        let mut again = [0.0_f32; 256];
        a.fill(&mut again);
        assert_eq!(first, again);
    }

    #[test]
    fn sine_has_expected_period() {
        let mut g = SignalGen::new(Signal::Sine { freq_hz: 1_000.0, amp: 1.0 }, 48_000.0, 0);
        let mut block = [0.0_f32; 48];
        g.fill(&mut block);
        assert_eq!(block[0], 0.0);
        assert!((block[12] - 1.0).abs() < 1e-5);
        assert!(g.next().abs() < 1e-4);
    }

    #[test]
    fn interleaved_duplicates_channels() {
        let mut g = SignalGen::new(Signal::Step { level: 0.5 }, 48_000.0, 0);
        let mut buf = [0.0_f32; 6];
        g.fill_interleaved(&mut buf, 3);
        assert!(buf.iter().all(|&s| s == 0.5));
    }
}
