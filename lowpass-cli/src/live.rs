//! Live playback: test signal -> filter -> output device, through cpal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use lowpass_engine::{Engine, SharedParams, SignalGen};

use crate::args::Args;

/// Scratch frames per callback chunk. Allocated once, before the stream starts.
const SCRATCH_FRAMES: usize = 1024;

pub fn list_output_devices() -> Result<()> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(args: &Args) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = &args.device_name {
        for d in host.output_devices()? {
            if d.name()? == *name { return Ok(d); }
        }
        bail!("requested device not found: {name}");
    }
    host.default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))
}

fn choose_config(
    device: &cpal::Device,
    req_sr: Option<u32>,
    req_ch: Option<u16>,
) -> Result<cpal::SupportedStreamConfig> {
    if req_sr.is_none() && req_ch.is_none() {
        return Ok(device.default_output_config()?);
    }

    // Score each range: sample-rate distance dominates, channel distance breaks ties.
    let mut best: Option<(u64, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let ch     = range.channels();
        let sr_min = range.min_sample_rate().0;
        let sr_max = range.max_sample_rate().0;

        let ch_pen = match req_ch { Some(c) => u64::from(ch.abs_diff(c)), None => 0 };
        let sr_pen = match req_sr {
            Some(sr) => if (sr_min..=sr_max).contains(&sr) { 0 } else { u64::from(sr_min.abs_diff(sr).min(sr_max.abs_diff(sr))) },
            None => 0,
        };

        let score = sr_pen.saturating_mul(1000) + ch_pen;
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, range));
        }
    }

    let (_, range) = best.ok_or_else(|| anyhow!("no supported output configs"))?;
    let pick_sr = match req_sr {
        Some(sr) => cpal::SampleRate(sr.clamp(range.min_sample_rate().0, range.max_sample_rate().0)),
        None => range.max_sample_rate(),
    };
    Ok(range.with_sample_rate(pick_sr))
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut engine: Engine<Arc<SharedParams>>,
    mut gen: SignalGen,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let channels = usize::from(cfg.channels);
    let mut scratch = vec![0.0_f32; SCRATCH_FRAMES * channels];

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            for chunk in output.chunks_mut(scratch.len()) {
                let buf = &mut scratch[..chunk.len()];
                gen.fill_interleaved(buf, channels);
                engine.process_interleaved(buf);
                for (o, s) in chunk.iter_mut().zip(buf.iter()) {
                    *o = T::from_sample(s.clamp(-1.0, 1.0));
                }
            }
        },
        |e: cpal::StreamError| error!("stream error: {e}"),
        None,
    )?;
    Ok(stream)
}

/// Play `signal` through the filter until `--duration` elapses (or forever).
#[allow(clippy::cast_precision_loss)]
pub fn play(args: &Args, params: Arc<SharedParams>, signal: lowpass_engine::Signal) -> Result<()> {
    let device  = pick_device(args)?;
    let sup_cfg = choose_config(&device, args.sample_rate, args.channels)?;
    let sample_format = sup_cfg.sample_format();
    let cfg: cpal::StreamConfig = sup_cfg.config();

    let sr = cfg.sample_rate.0;
    let engine = Engine::new(params, f64::from(sr), usize::from(cfg.channels))?;
    let gen = SignalGen::new(signal, sr as f32, 0x5eed);

    info!("device: {}", device.name()?);
    info!("stream: {cfg:?} (sample format {sample_format:?})");

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, engine, gen)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, engine, gen)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, engine, gen)?,
        other => bail!("unsupported device sample format: {other:?}"),
    };
    stream.play()?;

    match args.duration_sec {
        Some(d) => {
            info!("playing for {d} s");
            std::thread::sleep(Duration::try_from_secs_f32(d).unwrap_or_default());
            Ok(())
        }
        None => {
            info!("playing; press Ctrl+C to stop");
            loop { std::thread::sleep(Duration::from_millis(500)); }
        }
    }
}
