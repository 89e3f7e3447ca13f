//! `--key=value` argument parsing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use lowpass_engine::{FilterParameters, PresetBank, PresetLookup};

pub const USAGE: &str = "\
usage: lowpass [options]

  --input=FILE          filter a WAV file (requires --output)
  --output=FILE         write the result as 32-bit float WAV
  --play                play a test signal through the filter on an audio device
  --signal=NAME         impulse | step | sine | noise   (default: noise)
  --cutoff=HZ           cutoff frequency, 20..20000     (default: 1000)
  --resonance=DB        resonance, -20..20              (default: 0)
  --preset=ID           start from a preset (0, 1 or an id from --preset-bank)
  --preset-bank=FILE    JSON preset bank layered over the factory presets
  --sample-rate=HZ      sample rate for generated signals / device
  --channels=N          channel count for generated signals / device
  --duration=SECONDS    length of generated renders, or playback time
  --device=NAME         output device for --play
  --response            print the magnitude response (Hz, dB)
  --list-presets        print the available presets
  --list-devices        print the available output devices
  --verbose             debug logging
";

#[derive(Debug, Default)]
pub struct Args {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub play: bool,
    pub signal: Option<String>,
    pub cutoff: Option<f32>,
    pub resonance: Option<f32>,
    pub preset: Option<i32>,
    pub preset_bank: Option<PathBuf>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub duration_sec: Option<f32>,
    pub device_name: Option<String>,
    pub response: bool,
    pub list_presets: bool,
    pub list_devices: bool,
    pub verbose: bool,
    pub help: bool,
    /// Arguments that were not understood; reported once logging is up.
    pub unknown: Vec<String>,
}

fn num<T: std::str::FromStr>(key: &str, v: &str, unknown: &mut Vec<String>) -> Option<T> {
    let parsed = v.parse().ok();
    if parsed.is_none() {
        unknown.push(format!("{key}{v}"));
    }
    parsed
}

pub fn parse_args<I: IntoIterator<Item = String>>(it: I) -> Args {
    let mut a = Args::default();
    for s in it {
        match s.as_str() {
            "--play"         => { a.play = true; continue; }
            "--response"     => { a.response = true; continue; }
            "--list-presets" => { a.list_presets = true; continue; }
            "--list-devices" => { a.list_devices = true; continue; }
            "--verbose" | "-v" => { a.verbose = true; continue; }
            "--help" | "-h"  => { a.help = true; continue; }
            _ => {}
        }
        if let Some(rest) = s.strip_prefix("--input=")       { a.input = Some(rest.into());                          continue; }
        if let Some(rest) = s.strip_prefix("--output=")      { a.output = Some(rest.into());                         continue; }
        if let Some(rest) = s.strip_prefix("--signal=")      { a.signal = Some(rest.to_string());                    continue; }
        if let Some(rest) = s.strip_prefix("--cutoff=")      { a.cutoff = num("--cutoff=", rest, &mut a.unknown);    continue; }
        if let Some(rest) = s.strip_prefix("--resonance=")   { a.resonance = num("--resonance=", rest, &mut a.unknown); continue; }
        if let Some(rest) = s.strip_prefix("--preset=")      { a.preset = num("--preset=", rest, &mut a.unknown);    continue; }
        if let Some(rest) = s.strip_prefix("--preset-bank=") { a.preset_bank = Some(rest.into());                    continue; }
        if let Some(rest) = s.strip_prefix("--sample-rate=") { a.sample_rate = num("--sample-rate=", rest, &mut a.unknown); continue; }
        if let Some(rest) = s.strip_prefix("--channels=")    { a.channels = num("--channels=", rest, &mut a.unknown); continue; }
        if let Some(rest) = s.strip_prefix("--duration=")    { a.duration_sec = num("--duration=", rest, &mut a.unknown); continue; }
        if let Some(rest) = s.strip_prefix("--device=")      { a.device_name = Some(rest.to_string());               continue; }
        a.unknown.push(s);
    }
    a
}

impl Args {
    /// Factory presets, with the user bank layered on top when one is given.
    pub fn preset_bank(&self) -> Result<PresetBank> {
        match &self.preset_bank {
            Some(path) => Ok(PresetBank::load(path)
                .with_context(|| format!("loading preset bank {}", path.display()))?
                .with_factory()),
            None => Ok(PresetBank::factory()),
        }
    }

    /// Starting parameters: preset (if any), then explicit overrides.
    pub fn filter_parameters(&self, bank: &PresetBank) -> Result<FilterParameters> {
        let mut params = match self.preset {
            Some(id) => bank.preset(id)?,
            None => FilterParameters::default(),
        };
        if let Some(c) = self.cutoff {
            params.cutoff_hz = c;
        }
        if let Some(r) = self.resonance {
            params.resonance_db = r;
        }
        Ok(params)
    }
}

// ------------------------------------ Tests --------------------------------------
