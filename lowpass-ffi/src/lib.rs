//! C ABI wrapper for the LowPass filter.
//!
//! Exposes functions to create/destroy a filter, process interleaved f32
//! audio, set controls, apply factory presets and read the magnitude
//! response.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `LowpassFilter` (heap-allocated; you own/delete it).
//! - Status-returning functions return `LOWPASS_OK` (0) or a negative code.
//! - Every function tolerates a null handle.
//! - Functions that take pointers are `unsafe`: a non-null pointer must be
//!   valid for the access each function documents.
//!
//! Threading
//! - Process/reset/sample-rate calls belong to the audio thread.
//! - `lowpass_set_parameter` / `lowpass_apply_preset` may be called from any
//!   one control thread; values are picked up at the next block.

use std::sync::Arc;

use log::debug;
use lowpass_engine::{Engine, EngineError, FactoryPresets, ParamId, SharedParams};

/// One point of a magnitude response curve (`{ double freq_hz; double magnitude_db; }`).
pub use lowpass_core::response::Response as LowpassResponse;

pub const LOWPASS_OK: i32 = 0;
pub const LOWPASS_ERR_NULL: i32 = -1;
pub const LOWPASS_ERR_INVALID_ARGUMENT: i32 = -2;
pub const LOWPASS_ERR_UNKNOWN_PARAMETER: i32 = -3;
pub const LOWPASS_ERR_UNKNOWN_PRESET: i32 = -4;

/// Opaque filter handle we hand to C.
pub struct LowpassFilter {
    params: Arc<SharedParams>,
    engine: Engine<Arc<SharedParams>>,
}

fn status(e: &EngineError) -> i32 {
    match e {
        EngineError::UnknownParameter(_) => LOWPASS_ERR_UNKNOWN_PARAMETER,
        EngineError::UnknownPreset(_) => LOWPASS_ERR_UNKNOWN_PRESET,
        _ => LOWPASS_ERR_INVALID_ARGUMENT,
    }
}

// --- Creation / destruction -------------------------------------------------------

/// Create a filter for `channels` interleaved channels at `sample_rate` Hz,
/// with default controls. Returns null if either argument is invalid.
#[no_mangle]
pub extern "C" fn lowpass_create(sample_rate: f64, channels: u32) -> *mut LowpassFilter {
    let params = Arc::new(SharedParams::default());
    match Engine::new(Arc::clone(&params), sample_rate, channels as usize) {
        Ok(engine) => Box::into_raw(Box::new(LowpassFilter { params, engine })),
        Err(e) => {
            debug!("lowpass_create: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroy a filter previously returned by `lowpass_create`.
///
/// # Safety
/// `filter` must be null or a pointer from `lowpass_create` that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn lowpass_destroy(filter: *mut LowpassFilter) {
    if !filter.is_null() {
        unsafe { drop(Box::from_raw(filter)); }
    }
}

/// Reconfigure for a new stream sample rate. Resets the filter history.
///
/// # Safety
/// `filter` must be null or a live handle from `lowpass_create`, not used
/// concurrently from another thread.
#[no_mangle]
pub unsafe extern "C" fn lowpass_set_sample_rate(filter: *mut LowpassFilter, sample_rate: f64) -> i32 {
    let Some(f) = (unsafe { filter.as_mut() }) else { return LOWPASS_ERR_NULL };
    match f.engine.set_sample_rate(sample_rate) {
        Ok(()) => LOWPASS_OK,
        Err(e) => status(&e),
    }
}

/// Clear the filter history (transport stop, seek).
///
/// # Safety
/// Same as [`lowpass_set_sample_rate`].
#[no_mangle]
pub unsafe extern "C" fn lowpass_reset(filter: *mut LowpassFilter) {
    if let Some(f) = unsafe { filter.as_mut() } {
        f.engine.reset();
    }
}

// --- Rendering -------------------------------------------------------------------

/// Filter `frames` interleaved frames of `buffer` in place.
///
/// Returns the number of frames processed (0 on error).
///
/// # Safety
/// `filter` as for [`lowpass_set_sample_rate`]. `buffer` must be null or
/// valid for reads and writes of `frames * channels` floats.
#[no_mangle]
pub unsafe extern "C" fn lowpass_process_interleaved_f32(
    filter: *mut LowpassFilter,
    buffer: *mut f32,
    frames: u32,
) -> u32 {
    if buffer.is_null() || frames == 0 {
        return 0;
    }
    let Some(f) = (unsafe { filter.as_mut() }) else { return 0 };
    let len = frames as usize * f.engine.channel_count();
    let buf = unsafe { std::slice::from_raw_parts_mut(buffer, len) };
    u32::try_from(f.engine.process_interleaved(buf)).unwrap_or(0)
}

// --- Parameters -------------------------------------------------------------------

/// Set control `id` (0 = cutoff Hz, 1 = resonance dB).
///
/// # Safety
/// `filter` must be null or a live handle from `lowpass_create`.
#[no_mangle]
pub unsafe extern "C" fn lowpass_set_parameter(filter: *mut LowpassFilter, id: u32, value: f32) -> i32 {
    let Some(f) = (unsafe { filter.as_ref() }) else { return LOWPASS_ERR_NULL };
    match ParamId::from_index(id) {
        Ok(pid) => {
            f.params.set(pid, value);
            LOWPASS_OK
        }
        Err(e) => status(&e),
    }
}

/// Read control `id` into `*out_value`.
///
/// # Safety
/// `filter` must be null or a live handle. `out_value` must be null or
/// valid for one `float` write.
#[no_mangle]
pub unsafe extern "C" fn lowpass_get_parameter(filter: *const LowpassFilter, id: u32, out_value: *mut f32) -> i32 {
    let Some(f) = (unsafe { filter.as_ref() }) else { return LOWPASS_ERR_NULL };
    let Some(out) = (unsafe { out_value.as_mut() }) else { return LOWPASS_ERR_NULL };
    match ParamId::from_index(id) {
        Ok(pid) => {
            *out = f.params.get(pid);
            LOWPASS_OK
        }
        Err(e) => status(&e),
    }
}

/// Apply factory preset `id` (0 = "Preset One", 1 = "Preset Two").
///
/// # Safety
/// `filter` must be null or a live handle from `lowpass_create`.
#[no_mangle]
pub unsafe extern "C" fn lowpass_apply_preset(filter: *mut LowpassFilter, id: i32) -> i32 {
    let Some(f) = (unsafe { filter.as_ref() }) else { return LOWPASS_ERR_NULL };
    match f.params.apply_preset(&FactoryPresets, id) {
        Ok(_) => LOWPASS_OK,
        Err(e) => status(&e),
    }
}

// --- Analysis ---------------------------------------------------------------------

/// Fill `out[0..count]` with the magnitude response of the current settings,
/// log-spaced from 20 Hz to just below Nyquist. Returns the number of points written.
///
/// # Safety
/// `filter` must be null or a live handle. `out` must be null or valid for
/// writes of `count` `LowpassResponse` values.
#[no_mangle]
pub unsafe extern "C" fn lowpass_frequency_response(
    filter: *const LowpassFilter,
    out: *mut LowpassResponse,
    count: u32,
) -> u32 {
    if out.is_null() || count == 0 {
        return 0;
    }
    let Some(f) = (unsafe { filter.as_ref() }) else { return 0 };
    let points = unsafe { std::slice::from_raw_parts_mut(out, count as usize) };
    f.engine.response(points);
    count
}

// ------------------------------------ Tests --------------------------------------
