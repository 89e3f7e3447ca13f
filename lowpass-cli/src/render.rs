//! Offline rendering: WAV in -> filter -> WAV out, or test signal -> WAV out.

use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use lowpass_engine::{Engine, FilterParameters, SignalGen};

/// Frames handed to the engine per block, like a host callback would.
pub const BLOCK_FRAMES: usize = 512;

/// Interleaved audio held in memory.
#[derive(Debug)]
pub struct Audio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl Audio {
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }
}

#[allow(clippy::cast_precision_loss)]
pub fn read_wav(path: &Path) -> Result<Audio> {
    let mut reader = hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    debug!("read {}: {:?}, {} samples", path.display(), spec, samples.len());
    Ok(Audio { sample_rate: spec.sample_rate, channels: spec.channels, samples })
}

pub fn write_wav(path: &Path, audio: &Audio) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &s in &audio.samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Run `audio` through a fresh engine, block by block, in place.
pub fn filter_audio(audio: &mut Audio, params: FilterParameters) -> Result<()> {
    if audio.channels == 0 {
        bail!("audio has no channels");
    }
    let channels = usize::from(audio.channels);
    let mut engine = Engine::new(params, f64::from(audio.sample_rate), channels)?;
    for block in audio.samples.chunks_mut(BLOCK_FRAMES * channels) {
        engine.process_interleaved(block);
    }
    Ok(())
}

/// Generate `frames` of a test signal, duplicated across `channels`.
pub fn generate(gen: &mut SignalGen, sample_rate: u32, channels: u16, frames: usize) -> Audio {
    let mut samples = vec![0.0_f32; frames * usize::from(channels)];
    gen.fill_interleaved(&mut samples, usize::from(channels));
    Audio { sample_rate, channels, samples }
}

pub fn render_file(input: &Path, output: &Path, params: FilterParameters) -> Result<()> {
    let mut audio = read_wav(input)?;
    let peak_in = audio.peak();
    filter_audio(&mut audio, params)?;
    write_wav(output, &audio)?;
    info!(
        "{} -> {}: {} frames x {} ch @ {} Hz, peak {:.3} -> {:.3}",
        input.display(),
        output.display(),
        audio.frames(),
        audio.channels,
        audio.sample_rate,
        peak_in,
        audio.peak()
    );
    Ok(())
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lowpass_engine::Signal;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lowpass-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn dc_step_passes_through() {
        let mut gen = SignalGen::new(Signal::Step { level: 0.5 }, 44_100.0, 0);
        let mut audio = generate(&mut gen, 44_100, 2, 4 * BLOCK_FRAMES);
        filter_audio(&mut audio, FilterParameters::new(1_000.0, 0.0)).unwrap();
        let tail = &audio.samples[audio.samples.len() - 2..];
        assert!(tail.iter().all(|s| (s - 0.5).abs() < 1e-4), "{tail:?}");
    }

    #[test]
    fn wav_file_round_trip_through_filter() {
        let input = temp_path("in.wav");
        let output = temp_path("out.wav");

        let mut gen = SignalGen::new(Signal::Noise { amp: 0.25 }, 48_000.0, 3);
        write_wav(&input, &generate(&mut gen, 48_000, 1, 3_000)).unwrap();

        render_file(&input, &output, FilterParameters::new(500.0, 0.0)).unwrap();
        let filtered = read_wav(&output).unwrap();
        assert_eq!(filtered.frames(), 3_000);
        assert_eq!(filtered.sample_rate, 48_000);
        assert!(filtered.samples.iter().all(|s| s.is_finite()));
        assert!(filtered.peak() < 0.25);

        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn int_wav_is_scaled_to_unit_range() {
        let path = temp_path("int.wav");
        let spec = hound::WavSpec { channels: 1, sample_rate: 8_000, bits_per_sample: 16, sample_format: hound::SampleFormat::Int };
        let mut w = hound::WavWriter::create(&path, spec).unwrap();
        w.write_sample(i16::MAX).unwrap();
        w.write_sample(-16_384_i16).unwrap();
        w.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        assert!((audio.samples[0] - 1.0).abs() < 1e-4);
        assert_eq!(audio.samples[1], -0.5);
        std::fs::remove_file(&path).unwrap();
    }
}
