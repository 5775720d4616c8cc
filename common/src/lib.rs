//! Streaming core for the MLX90640 → SSD1351 thermal camera.
//!
//! This crate contains everything between the sensor driver and the display
//! driver, and is shared by the Pico 2 firmware and the desktop simulator:
//!
//! - [`config`]: Sensor/display geometry and compile-time validation
//! - [`colors`]: Gradient anchor sets and overlay colors
//! - [`palette`]: Piecewise-linear color gradient table
//! - [`quantize`]: Temperature → palette index quantizer
//! - [`frame`]: The frame buffer handed between the two cores
//! - [`correction`]: Broken and outlier pixel replacement
//! - [`exchange`]: Single-slot ownership-transfer channel between the loops
//! - [`interpolate`]: Nearest-neighbor and fixed-point bilinear upscaling
//! - [`overlay`]: Legend strip and min/fps/max labels
//! - [`controls`]: Interpolation/freeze flags and the frame-rate counter
//! - [`input`]: Debounced edge detection for the two touch buttons
//! - [`acquisition`]: Sensor-side control loop
//! - [`render`]: Display-side control loop
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p thermocam-common
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the firmware links the crate as `no_std`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod acquisition;
pub mod colors;
pub mod config;
pub mod controls;
pub mod correction;
pub mod exchange;
pub mod frame;
pub mod input;
pub mod interpolate;
pub mod overlay;
pub mod palette;
pub mod quantize;
pub mod render;
pub mod styles;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use acquisition::{Acquisition, ThermalSensor};
pub use controls::{Controls, FrameRate};
pub use exchange::Exchange;
pub use frame::{FrameBuffer, SensorFrame};
pub use interpolate::{Interpolation, Mirror};
pub use palette::Palette;
pub use render::{FrameSink, Render};
