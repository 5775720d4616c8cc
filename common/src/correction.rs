//! Broken and outlier pixel correction.
//!
//! Every MLX90640 leaves the factory with a per-pixel calibration word in
//! EEPROM. A word of zero marks a broken pixel, a set lowest bit marks an
//! outlier. The device adapter scans those words once at start-up into a
//! [`BadPixels`] list, and every frame then has the listed pixels replaced by
//! an estimate from their neighbours before min/max are taken. Left in place,
//! a single dead pixel would set the frame's bounds and squash the rest of the
//! image into a few palette entries.
//!
//! # Estimates
//!
//! - **Chess pattern:** the four diagonal neighbours belong to the same
//!   subpage, so the pixel becomes their median (two of them on the border
//!   rows and columns, one in the corners).
//! - **Interleaved pattern:** rows belong to one subpage, so the pixel is
//!   extrapolated along its row from the flatter side, or averaged from its
//!   direct neighbours when that side is itself bad or too short.

use heapless::Vec;
use micromath::F32;

use crate::acquisition::ReadoutPattern;
use crate::config::{SENSOR_HEIGHT, SENSOR_WIDTH};
use crate::frame::SensorFrame;

/// Bad pixels a sensor may report (four broken plus four outliers).
pub const MAX_BAD_PIXELS: usize = 8;

/// More pixels are marked bad than an MLX90640 can have.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TooManyBadPixels;

/// Whether a pixel calibration word marks its pixel as broken or an outlier.
#[inline]
pub const fn is_bad_pixel_word(word: u16) -> bool { word == 0 || word & 1 != 0 }

/// Indices of the pixels to replace in every frame, in scan order.
#[derive(Clone, Default, Debug)]
pub struct BadPixels {
    indices: Vec<u16, MAX_BAD_PIXELS>,
}

impl BadPixels {
    pub const fn new() -> Self { Self { indices: Vec::new() } }

    /// Build the list from all pixel calibration words, row-major.
    pub fn scan(words: impl IntoIterator<Item = u16>) -> Result<Self, TooManyBadPixels> {
        let mut bad = Self::new();
        for (index, word) in words.into_iter().enumerate() {
            bad.record(index, word)?;
        }
        Ok(bad)
    }

    /// Add pixel `index` if its calibration `word` marks it bad.
    pub fn record(
        &mut self,
        index: usize,
        word: u16,
    ) -> Result<(), TooManyBadPixels> {
        if is_bad_pixel_word(word) {
            self.indices.push(index as u16).map_err(|_| TooManyBadPixels)?;
        }
        Ok(())
    }

    #[inline]
    pub fn contains(
        &self,
        index: usize,
    ) -> bool {
        self.indices.iter().any(|&i| usize::from(i) == index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u16] { &self.indices }

    #[inline]
    pub fn is_empty(&self) -> bool { self.indices.is_empty() }
}

/// Replace every listed pixel of `samples` with an estimate from its
/// neighbours.
///
/// Pixels are corrected in list order, so a later estimate may use an earlier
/// corrected value.
pub fn correct_bad_pixels(
    samples: &mut SensorFrame,
    bad: &BadPixels,
    pattern: ReadoutPattern,
) {
    for &index in bad.as_slice() {
        let index = usize::from(index);
        if index >= samples.len() {
            continue;
        }
        let estimate = match pattern {
            ReadoutPattern::Chess => diagonal_estimate(samples, index),
            ReadoutPattern::Interleaved => row_estimate(samples, bad, index),
        };
        samples[index] = estimate;
    }
}

fn diagonal_estimate(
    samples: &SensorFrame,
    index: usize,
) -> f32 {
    const W: usize = SENSOR_WIDTH;
    let row = index / W;
    let col = index % W;
    let first_col = col == 0;
    let last_col = col == W - 1;

    let up_left = || samples[index - W - 1];
    let up_right = || samples[index - W + 1];
    let down_left = || samples[index + W - 1];
    let down_right = || samples[index + W + 1];

    if row == 0 {
        if first_col {
            down_right()
        } else if last_col {
            down_left()
        } else {
            (down_left() + down_right()) / 2.0
        }
    } else if row == SENSOR_HEIGHT - 1 {
        if first_col {
            up_right()
        } else if last_col {
            up_left()
        } else {
            (up_left() + up_right()) / 2.0
        }
    } else if first_col {
        (up_right() + down_right()) / 2.0
    } else if last_col {
        (up_left() + down_left()) / 2.0
    } else {
        median_of_four([up_left(), up_right(), down_left(), down_right()])
    }
}

fn row_estimate(
    samples: &SensorFrame,
    bad: &BadPixels,
    index: usize,
) -> f32 {
    let col = index % SENSOR_WIDTH;
    let average = || (samples[index - 1] + samples[index + 1]) / 2.0;

    match col {
        0 => samples[index + 1],
        c if c == SENSOR_WIDTH - 1 => samples[index - 1],
        c if c == 1 || c == SENSOR_WIDTH - 2 => average(),
        _ if bad.contains(index - 2) || bad.contains(index + 2) => average(),
        _ => {
            let right_slope = samples[index + 1] - samples[index + 2];
            let left_slope = samples[index - 1] - samples[index - 2];
            if F32(right_slope).abs().0 > F32(left_slope).abs().0 {
                samples[index - 1] + left_slope
            } else {
                samples[index + 1] + right_slope
            }
        }
    }
}

fn median_of_four(mut values: [f32; 4]) -> f32 {
    values.sort_unstable_by(f32::total_cmp);
    (values[1] + values[2]) / 2.0
}

// =============================================================================
// Tests
// =============================================================================
