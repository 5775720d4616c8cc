//! Board configuration.
//!
//! # Pin Map
//!
//! | Signal          | GPIO | Peripheral |
//! |-----------------|------|------------|
//! | MLX90640 SDA    | 16   | I2C0       |
//! | MLX90640 SCL    | 17   | I2C0       |
//! | SSD1351 SCK     | 10   | SPI1       |
//! | SSD1351 MOSI    | 11   | SPI1       |
//! | SSD1351 CS      | 13   | GPIO       |
//! | SSD1351 DC      | 9    | GPIO       |
//! | SSD1351 RST     | 15   | GPIO       |
//! | Interpolation   | 14   | GPIO, touch button (high while touched) |
//! | Freeze          | 18   | GPIO, touch button (high while touched) |
//!
//! Peripherals are typed in embassy-rp, so the pins themselves are picked in
//! `main.rs`. This module holds everything else.

use thermocam_common::acquisition::SensorSettings;
use thermocam_common::config::{DEFAULT_INTERPOLATION, DEFAULT_MIRROR};
use thermocam_common::{Interpolation, Mirror};

// =============================================================================
// Buses
// =============================================================================

/// MLX90640 I2C clock (fast mode plus).
pub const I2C_FREQUENCY_HZ: u32 = 1_000_000;

/// SSD1351 SPI clock.
pub const SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// MLX90640 7-bit I2C address (factory default).
pub const SENSOR_ADDRESS: u8 = 0x33;

/// EEPROM address of the first per-pixel calibration word.
pub const PIXEL_CALIBRATION_ADDRESS: u16 = 0x2440;

// =============================================================================
// Timing
// =============================================================================

/// Delay between power-up and the first sensor access.
///
/// The MLX90640 needs 80 ms plus two subpage periods before its first valid
/// frame. At the slowest rate this board ever boots at, 540 ms covers that.
pub const SENSOR_STARTUP_DELAY_MS: u64 = 540;

/// Back-off between two "frame ready?" polls of the sensor status register.
pub const SENSOR_POLL_INTERVAL_MS: u64 = 1;

/// Length of each phase of the SSD1351 reset pulse.
pub const DISPLAY_RESET_MS: u64 = 50;

// =============================================================================
// Sensor and Render Options
// =============================================================================

/// Rate, pattern, resolution and emissivity written to the sensor at start-up.
pub const SENSOR_SETTINGS: SensorSettings = SensorSettings::DEFAULT;

/// Interpolation mode before the toggle button is touched.
pub const START_INTERPOLATION: Interpolation = if cfg!(feature = "nearest-default") {
    Interpolation::Nearest
} else {
    DEFAULT_INTERPOLATION
};

/// Image orientation.
pub const MIRROR: Mirror = Mirror {
    horizontal: DEFAULT_MIRROR.horizontal && !cfg!(feature = "no-mirror-horizontal"),
    vertical: DEFAULT_MIRROR.vertical || cfg!(feature = "mirror-vertical"),
};

// =============================================================================
// Multicore
// =============================================================================

/// Stack size for core 1 (render loop, input and frame-rate tasks).
pub const CORE1_STACK_SIZE: usize = 16 * 1024;
