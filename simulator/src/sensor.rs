//! Synthetic thermal sensor.
//!
//! Produces a room-temperature background with a slight vertical gradient and
//! a warm blob (a hand, a face) wandering across the field of view on a
//! Lissajous path. Reads are paced like the real sensor and fail periodically
//! so the acquisition retry path is exercised.

use std::fmt;
use std::thread;
use std::time::Duration;

use thermocam_common::ThermalSensor;
use thermocam_common::config::{SENSOR_HEIGHT, SENSOR_WIDTH};
use thermocam_common::frame::SensorFrame;

use crate::timing::{DROPOUT_EVERY, SENSOR_FRAME_TIME};

/// Background temperature at the top row.
const AMBIENT: f32 = 21.0;

/// Background increase per row (the floor is warmer than the ceiling).
const ROW_GRADIENT: f32 = 0.08;

/// Blob temperature above ambient at its center.
const BLOB_PEAK: f32 = 13.5;

/// Blob radius (standard deviation, in sensor cells).
const BLOB_SIGMA: f32 = 3.0;

/// Simulated read failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDropout {
    pub read: u32,
}

impl fmt::Display for SensorDropout {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "no acknowledge on read #{}", self.read)
    }
}

impl std::error::Error for SensorDropout {}

/// Scene generator behind the [`ThermalSensor`] trait.
pub struct SyntheticSensor {
    reads: u32,
    frame_time: Duration,
}

impl SyntheticSensor {
    /// Sensor paced at the configured refresh rate.
    pub fn new() -> Self { Self::with_frame_time(SENSOR_FRAME_TIME) }

    pub fn with_frame_time(frame_time: Duration) -> Self { Self { reads: 0, frame_time } }
}

impl ThermalSensor for SyntheticSensor {
    type Error = SensorDropout;

    async fn read_frame(
        &mut self,
        out: &mut SensorFrame,
    ) -> Result<(), Self::Error> {
        thread::sleep(self.frame_time);
        self.reads = self.reads.wrapping_add(1);
        if self.reads % DROPOUT_EVERY == 0 {
            return Err(SensorDropout { read: self.reads });
        }

        render_scene(self.reads as f32 * SENSOR_FRAME_TIME.as_secs_f32(), out);
        Ok(())
    }
}

/// Fill `out` with the scene at time `t` seconds.
pub fn render_scene(
    t: f32,
    out: &mut SensorFrame,
) {
    let cx = (SENSOR_WIDTH as f32 - 1.0) / 2.0 + 11.0 * (0.7 * t).cos();
    let cy = (SENSOR_HEIGHT as f32 - 1.0) / 2.0 + 7.0 * (1.1 * t).sin();
    let spread = 2.0 * BLOB_SIGMA * BLOB_SIGMA;

    for (i, sample) in out.iter_mut().enumerate() {
        let x = (i % SENSOR_WIDTH) as f32;
        let y = (i / SENSOR_WIDTH) as f32;
        let d2 = (x - cx).powi(2) + (y - cy).powi(2);
        *sample = AMBIENT + ROW_GRADIENT * y + BLOB_PEAK * (-d2 / spread).exp();
    }
}
