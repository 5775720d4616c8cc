//! MLX90640 Thermal Camera Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Streams the 32×24 MLX90640 thermal image to a 128×128 SSD1351 OLED.
//!
//! # Architecture
//!
//! The two cores form a pipeline around a single frame buffer:
//! - Core 0: Reads and calibrates a frame, then quantizes it into the buffer
//!   and hands it to core 1
//! - Core 1: Upscales the buffer onto the display, hands it back, then draws
//!   the stats strip and pushes the framebuffer out via DMA
//!
//! The sensor read on core 0 overlaps with the display transfer on core 1.
//!
//! # Touch Buttons
//!
//! - **GPIO14** (held): Nearest-neighbor instead of bilinear interpolation
//! - **GPIO18** (held): Freeze the current image

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod display;
mod sensor;
mod tasks;

// Re-export testable modules from library for local use
// (These are defined in lib.rs with host-testable code)
mod config {
    pub use thermocam_pico2::config::*;
}
mod ssd1351 {
    pub use thermocam_pico2::ssd1351::*;
}

use defmt::info;
use embassy_executor::{Executor, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::multicore::{Stack, spawn_core1};
use embassy_rp::spi::Spi;
use embassy_time::Timer;
use static_cell::{ConstStaticCell, StaticCell};
use thermocam_common::colors::ACTIVE_GRADIENT;
use thermocam_common::input::InputKind;
use thermocam_common::{Acquisition, Controls, FrameBuffer, FrameRate, Palette};
use {defmt_rtt as _, panic_probe as _};

use crate::config::{CORE1_STACK_SIZE, SENSOR_SETTINGS, SENSOR_STARTUP_DELAY_MS, START_INTERPOLATION};
use crate::display::{Ssd1351Display, display_spi_config};
use crate::sensor::{Mlx90640Sensor, sensor_i2c_config};
use crate::ssd1351::FRAME_BYTES;
use crate::tasks::{FrameExchange, frame_rate_task, input_task, render_task};

// =============================================================================
// Shared State
// =============================================================================

/// Mailboxes carrying the frame buffer between the cores.
static EXCHANGE: FrameExchange = FrameExchange::new();

/// Interpolation and freeze toggles (written by the input tasks).
static CONTROLS: Controls = Controls::new(START_INTERPOLATION);

/// Rendered-frame counter (written by render, snapshotted by the ticker).
static FRAME_RATE: FrameRate = FrameRate::new();

/// The one frame buffer, primed into the acquisition side at start-up.
static FRAME: ConstStaticCell<FrameBuffer> = ConstStaticCell::new(FrameBuffer::new());

/// Color table built from the active gradient at start-up.
static PALETTE: StaticCell<Palette> = StaticCell::new();

/// Display framebuffer (32 KB, RGB565 big-endian).
static FRAMEBUFFER: ConstStaticCell<[u8; FRAME_BYTES]> = ConstStaticCell::new([0; FRAME_BYTES]);

static CORE1_STACK: ConstStaticCell<Stack<CORE1_STACK_SIZE>> = ConstStaticCell::new(Stack::new());
static CORE1_EXECUTOR: StaticCell<Executor> = StaticCell::new();

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"thermocam"),
    embassy_rp::binary_info::rp_program_description!(c"MLX90640 thermal camera on an SSD1351 OLED"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Thermal camera starting...");
    let p = embassy_rp::init(Default::default());

    // Display pins: CS=13, DC=9, RST=15, SCK=10, MOSI=11 (SPI1, TX only)
    let cs = Output::new(p.PIN_13, Level::High);
    let dc = Output::new(p.PIN_9, Level::Low);
    let rst = Output::new(p.PIN_15, Level::High);
    let spi = Spi::new_txonly(p.SPI1, p.PIN_10, p.PIN_11, p.DMA_CH0, display_spi_config());
    let display = Ssd1351Display::new(spi, dc, cs, rst, FRAMEBUFFER.take());

    // Touch buttons drive their output high while touched
    let interpolation_button = Input::new(p.PIN_14, Pull::Down);
    let freeze_button = Input::new(p.PIN_18, Pull::Down);

    let palette: &'static Palette = PALETTE.init(Palette::new(ACTIVE_GRADIENT));
    assert!(EXCHANGE.prime(FRAME.take()).is_ok(), "frame buffer primed twice");

    spawn_core1(p.CORE1, CORE1_STACK.take(), move || {
        let executor = CORE1_EXECUTOR.init(Executor::new());
        executor.run(|spawner| {
            spawner.spawn(render_task(display, palette, &CONTROLS, &FRAME_RATE, &EXCHANGE)).unwrap();
            spawner.spawn(input_task(interpolation_button, InputKind::Interpolation, &CONTROLS)).unwrap();
            spawner.spawn(input_task(freeze_button, InputKind::Freeze, &CONTROLS)).unwrap();
            spawner.spawn(frame_rate_task(&FRAME_RATE)).unwrap();
        })
    });
    info!("Core 1 started");

    // Sensor: SDA=16, SCL=17 (I2C0), after its power-on settling time
    Timer::after_millis(SENSOR_STARTUP_DELAY_MS).await;
    let bus = I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, sensor_i2c_config());
    let sensor = Mlx90640Sensor::new(bus, SENSOR_SETTINGS).expect("MLX90640 not responding");
    info!("Sensor configured: {}", SENSOR_SETTINGS);
    info!("Bad pixels corrected per frame: {}", sensor.bad_pixels().as_slice());

    let mut acquisition = Acquisition::new(EXCHANGE.acquisition(), sensor);
    acquisition.run().await
}
