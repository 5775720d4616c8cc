//! The frame buffer exchanged between the acquisition and render loops.
//!
//! There is exactly one [`FrameBuffer`] for the lifetime of the process. It is
//! allocated before either loop starts and then only moves by value through
//! the [`Exchange`](crate::exchange::Exchange), so at any instant it is owned by
//! the acquisition loop, by the render loop, or by neither (in transit).

use crate::config::{SENSOR_PIXELS, SENSOR_WIDTH};
use crate::quantize::quantize;

/// One calibrated sensor frame in degrees Celsius, row-major.
pub type SensorFrame = [f32; SENSOR_PIXELS];

/// Quantized frame plus the temperature bounds it was scaled with.
#[derive(Clone)]
pub struct FrameBuffer {
    /// Coldest sample of the frame.
    pub min: f32,
    /// Hottest sample of the frame.
    pub max: f32,
    /// Palette indices, row-major, `SENSOR_WIDTH` per row.
    pub values: [u8; SENSOR_PIXELS],
}

impl FrameBuffer {
    /// Create an empty (all index 0) frame buffer.
    pub const fn new() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            values: [0; SENSOR_PIXELS],
        }
    }

    /// Palette index of sensor cell `(x, y)`.
    #[inline]
    pub fn value(
        &self,
        x: usize,
        y: usize,
    ) -> u8 {
        self.values[y * SENSOR_WIDTH + x]
    }

    /// Store the bounds and quantize `samples` into this buffer.
    pub fn load(
        &mut self,
        samples: &SensorFrame,
        min: f32,
        max: f32,
    ) {
        self.min = min;
        self.max = max;
        quantize(samples, min, max, &mut self.values);
    }
}

impl Default for FrameBuffer {
    fn default() -> Self { Self::new() }
}

/// Coldest and hottest sample of a frame.
pub fn min_max(samples: &[f32]) -> (f32, f32) {
    let Some((&first, rest)) = samples.split_first() else {
        return (0.0, 0.0);
    };
    rest.iter().fold((first, first), |(min, max), &value| {
        (if value < min { value } else { min }, if value > max { value } else { max })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SENSOR_HEIGHT;

    #[test]
    fn test_min_max() {
        let mut samples = [21.5f32; SENSOR_PIXELS];
        samples[3] = 18.25;
        samples[SENSOR_PIXELS - 1] = 36.0;
        assert_eq!(min_max(&samples), (18.25, 36.0));
    }

    #[test]
    fn test_min_max_empty() {
        assert_eq!(min_max(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_value_is_row_major() {
        let mut frame = FrameBuffer::new();
        frame.values[SENSOR_WIDTH + 2] = 9;
        frame.values[(SENSOR_HEIGHT - 1) * SENSOR_WIDTH + SENSOR_WIDTH - 1] = 200;
        assert_eq!(frame.value(2, 1), 9);
        assert_eq!(frame.value(SENSOR_WIDTH - 1, SENSOR_HEIGHT - 1), 200);
    }

    #[test]
    fn test_load_sets_bounds() {
        let mut samples = [25.0f32; SENSOR_PIXELS];
        samples[0] = 20.0;
        samples[1] = 30.0;

        let mut frame = FrameBuffer::new();
        frame.load(&samples, 20.0, 30.0);
        assert_eq!((frame.min, frame.max), (20.0, 30.0));
        assert_eq!(frame.values[0], 0);
        assert_eq!(frame.values[2], 106);
        assert!(frame.values[1] > frame.values[2]);
    }
}
