//! Sensor and display geometry.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Every size used by the render path is derived here at compile time, so the
//! per-pixel loops never divide by a runtime value. The fixed-point factors for
//! bilinear interpolation live in [`interpolate`](crate::interpolate) next to
//! the code that relies on them.

use crate::interpolate::{Interpolation, Mirror};

// =============================================================================
// Sensor Configuration (MLX90640 32x24 thermopile array)
// =============================================================================

/// Number of sensor columns.
pub const SENSOR_WIDTH: usize = 32;

/// Number of sensor rows.
pub const SENSOR_HEIGHT: usize = 24;

/// Number of samples in one sensor frame.
pub const SENSOR_PIXELS: usize = SENSOR_WIDTH * SENSOR_HEIGHT;

// =============================================================================
// Display Configuration (SSD1351 128x128 OLED)
// =============================================================================

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 128;

/// Width and height of one sensor cell on the display.
pub const PIXEL_SIZE: u32 = SCREEN_WIDTH / SENSOR_WIDTH as u32;

/// Width of the thermal image on the display.
pub const GRAPH_WIDTH: u32 = SENSOR_WIDTH as u32 * PIXEL_SIZE;

/// Height of the thermal image on the display.
pub const GRAPH_HEIGHT: u32 = SENSOR_HEIGHT as u32 * PIXEL_SIZE;

/// Height of the min/fps/max text strip directly below the image.
pub const STATS_HEIGHT: u32 = 16;

/// Top edge of the palette legend strip.
pub const LEGEND_Y: u32 = GRAPH_HEIGHT + STATS_HEIGHT;

/// Height of the palette legend strip (fills the rest of the screen).
pub const LEGEND_HEIGHT: u32 = SCREEN_HEIGHT - LEGEND_Y;

const _: () = assert!(PIXEL_SIZE >= 1);
const _: () = assert!(GRAPH_WIDTH == SCREEN_WIDTH);
const _: () = assert!(LEGEND_Y < SCREEN_HEIGHT);

// =============================================================================
// Palette Configuration
// =============================================================================

/// Number of colors in the heat map.
///
/// Indices are stored as `u8`, so the table can never be larger than 256.
pub const PALETTE_SIZE: usize = 256;

const _: () = assert!(PALETTE_SIZE >= 2);
const _: () = assert!(PALETTE_SIZE <= 256);

// =============================================================================
// Timing and Input
// =============================================================================

/// Interval over which rendered frames are counted for the fps label.
pub const FPS_INTERVAL_MS: u64 = 1000;

/// Minimum time between two accepted input edges.
pub const DEBOUNCE_MS: u64 = 50;

// =============================================================================
// Render Defaults
// =============================================================================

/// Interpolation mode used until the toggle button is touched.
pub const DEFAULT_INTERPOLATION: Interpolation = Interpolation::Bilinear;

/// The sensor looks at the scene, the viewer looks at the sensor: flip X so the
/// image reads like a mirror.
pub const DEFAULT_MIRROR: Mirror = Mirror {
    horizontal: true,
    vertical: false,
};
