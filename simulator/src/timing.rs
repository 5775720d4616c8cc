//! Timing constants for the simulator.
//!
//! These constants use `std::time::Duration` which is not available in `no_std`
//! environments, so they are defined here rather than in the common crate.

use std::time::Duration;

use thermocam_common::acquisition::SensorSettings;
use thermocam_common::config::FPS_INTERVAL_MS;

/// Time the synthetic sensor takes per frame (one subpage at the default rate).
pub const SENSOR_FRAME_TIME: Duration =
    Duration::from_micros((1_000_000.0 / SensorSettings::DEFAULT.refresh_rate.hz()) as u64);

/// Every n-th synthetic read fails, like an occasional I2C NAK on the device.
pub const DROPOUT_EVERY: u32 = 97;

/// Interval of the fps ticker thread.
pub const FPS_INTERVAL: Duration = Duration::from_millis(FPS_INTERVAL_MS);
