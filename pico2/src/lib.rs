//! Thermal camera firmware library: testable modules for the Pico 2 build.
//!
//! This library contains the board-level logic that can be tested on the
//! host machine. The binary (`main.rs`) uses this library and adds the
//! embassy-rp specific drivers and tasks.
//!
//! - [`config`]: Pin map, bus frequencies, timing and render options
//! - [`ssd1351`]: SSD1351 command set and the RGB565 framebuffer `DrawTarget`
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p thermocam-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p thermocam-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod ssd1351;
