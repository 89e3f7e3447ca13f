//! LowPass CLI: render files, play test signals, inspect the response.

mod args;
mod live;
mod render;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{info, warn, LevelFilter};
use lowpass_core::response::{Response, NUM_RESPONSE_FREQUENCIES};
use lowpass_engine::{Engine, FilterParameters, ParamId, SharedParams, Signal, SignalGen};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::args::{parse_args, Args, USAGE};

const DEFAULT_SAMPLE_RATE: u32 = 44_100;
const DEFAULT_DURATION_SEC: f32 = 2.0;

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    // A second init (tests, embedding) is harmless; keep whichever logger won.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn print_presets(args: &Args) -> Result<()> {
    let bank = args.preset_bank()?;
    let cut = ParamId::Cutoff.info();
    let res = ParamId::Resonance.info();
    println!("Presets:");
    for p in bank.iter() {
        println!(
            "{:>4}  {:<20} {:>12}  {:>8}",
            p.id,
            p.name,
            cut.display(p.params.cutoff_hz),
            res.display(p.params.resonance_db)
        );
    }
    Ok(())
}

fn print_response(params: FilterParameters, sample_rate: u32) -> Result<()> {
    let engine = Engine::new(params, f64::from(sample_rate), 1)?;
    let mut curve = [Response::default(); NUM_RESPONSE_FREQUENCIES];
    engine.response(&mut curve);
    println!("# cutoff {} Hz, resonance {} dB, sample rate {} Hz", params.cutoff_hz, params.resonance_db, sample_rate);
    println!("# freq_hz\tmagnitude_db");
    for p in &curve {
        println!("{:.2}\t{:.3}", p.freq_hz, p.magnitude_db);
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn render_signal(args: &Args, signal: Signal, params: FilterParameters) -> Result<()> {
    let Some(output) = &args.output else { bail!("--output is required to render a signal") };
    let sr = args.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let channels = args.channels.unwrap_or(1).max(1);
    let seconds = args.duration_sec.unwrap_or(DEFAULT_DURATION_SEC).max(0.0);
    let frames = (seconds * sr as f32) as usize;

    let mut gen = SignalGen::new(signal, sr as f32, 0x5eed);
    let mut audio = render::generate(&mut gen, sr, channels, frames);
    render::filter_audio(&mut audio, params)?;
    render::write_wav(output, &audio)?;
    info!("{signal:?} -> {}: {frames} frames x {channels} ch @ {sr} Hz, peak {:.3}", output.display(), audio.peak());
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1));
    init_logging(args.verbose);
    for u in &args.unknown {
        warn!("unknown or malformed arg: {u}");
    }

    if args.help {
        print!("{USAGE}");
        return Ok(());
    }
    if args.list_devices {
        return live::list_output_devices();
    }
    if args.list_presets {
        return print_presets(&args);
    }

    let bank = args.preset_bank()?;
    let params = args.filter_parameters(&bank)?;
    info!(
        "filter: cutoff {}, resonance {}",
        ParamId::Cutoff.info().display(params.cutoff_hz),
        ParamId::Resonance.info().display(params.resonance_db)
    );

    if args.response {
        return print_response(params, args.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE));
    }

    let signal: Signal = args.signal.as_deref().unwrap_or("noise").parse()?;

    if let Some(input) = &args.input {
        let output = args.output.as_ref().context("--input needs --output")?;
        return render::render_file(input, output, params);
    }
    if args.play {
        return live::play(&args, Arc::new(SharedParams::new(params)), signal);
    }
    if args.output.is_some() {
        return render_signal(&args, signal, params);
    }

    print!("{USAGE}");
    Ok(())
}
