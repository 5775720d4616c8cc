//! Temperature → palette index quantizer.
//!
//! Samples in `[min, max]` are spread over the palette with a uniform step of
//! `(ceil(max + 1) - floor(min - 1)) / (PALETTE_SIZE - 1)`. The one-degree
//! padding on both bounds keeps the hottest sample below the last palette
//! entry, so no index is clamped and the bilinear blend of two valid indices
//! is always valid as well.

use micromath::F32;

use crate::config::{PALETTE_SIZE, SENSOR_PIXELS};

/// Step used when the bounds are not finite.
const FALLBACK_STEP: f32 = 1.0;

/// Temperature difference covered by one palette index.
///
/// Never zero: a flat frame (`min == max`) still spans the two padding
/// degrees. Non-finite or inverted bounds fall back to one degree per index.
pub fn quantization_step(
    min: f32,
    max: f32,
) -> f32 {
    if !(min.is_finite() && max.is_finite()) {
        return FALLBACK_STEP;
    }
    let range = F32(max + 1.0).ceil().0 - F32(min - 1.0).floor().0;
    let step = range / (PALETTE_SIZE - 1) as f32;
    if step > 0.0 { step } else { FALLBACK_STEP }
}

/// Palette index of a single sample.
///
/// The float-to-int cast truncates toward zero and saturates, so a sample
/// below `min` maps to 0 and NaN maps to 0.
#[inline]
pub fn quantize_sample(
    value: f32,
    min: f32,
    step: f32,
) -> u8 {
    ((value - min) / step) as u8
}

/// Quantize a whole frame into `out`.
pub fn quantize(
    samples: &[f32; SENSOR_PIXELS],
    min: f32,
    max: f32,
    out: &mut [u8; SENSOR_PIXELS],
) {
    let step = quantization_step(min, max);
    for (index, sample) in out.iter_mut().zip(samples.iter()) {
        *index = quantize_sample(*sample, min, step);
    }
}

// =============================================================================
// Tests
// =============================================================================
