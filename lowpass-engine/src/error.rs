//! Configuration-time errors. Nothing on the audio path returns these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("engine needs at least one channel")]
    NoChannels,

    #[error("buffer has {got} channels, engine was built for {expected}")]
    ChannelMismatch { expected: usize, got: usize },

    #[error("unknown parameter id {0}")]
    UnknownParameter(u32),

    #[error("unknown preset id {0}")]
    UnknownPreset(i32),

    #[error("duplicate preset id {0} in bank")]
    DuplicatePreset(i32),

    #[error("unknown test signal `{0}` (expected impulse, step, sine or noise)")]
    UnknownSignal(String),

    #[error("failed to read preset bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse preset bank: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
