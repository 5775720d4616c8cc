//! MLX90640 Thermal Camera Simulator for Desktop.
//!
//! Runs the shared streaming core against a synthetic sensor and an SDL2
//! window, with the same two-loop structure as the firmware:
//! - Acquisition thread: synthetic reads, quantization, hand-off
//! - Main thread: render loop (SDL must live on the main thread)
//! - Ticker thread: once-per-second fps snapshot
//!
//! # Keys
//!
//! - **I** (held): Nearest-neighbor instead of bilinear interpolation
//! - **F** (held): Freeze the current image
//!
//! Set `RUST_LOG=debug` for per-second fps and dropout details.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

mod buttons;
mod sensor;
mod sink;
mod timing;

use std::thread;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_graphics_simulator::SimulatorEvent;
use embedded_graphics_simulator::sdl2::Keycode;
use pollster::block_on;
use thermocam_common::colors::ACTIVE_GRADIENT;
use thermocam_common::config::{DEFAULT_INTERPOLATION, DEFAULT_MIRROR};
use thermocam_common::input::InputKind;
use thermocam_common::{Acquisition, Controls, Exchange, FrameBuffer, FrameRate, Palette, Render};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::buttons::Buttons;
use crate::sensor::SyntheticSensor;
use crate::sink::SimulatorSink;
use crate::timing::FPS_INTERVAL;

static EXCHANGE: Exchange<CriticalSectionRawMutex, Box<FrameBuffer>> = Exchange::new();
static CONTROLS: Controls = Controls::new(DEFAULT_INTERPOLATION);
static FRAME_RATE: FrameRate = FrameRate::new();

fn key_input(keycode: Keycode) -> Option<InputKind> {
    match keycode {
        Keycode::I => Some(InputKind::Interpolation),
        Keycode::F => Some(InputKind::Freeze),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let palette = Palette::new(ACTIVE_GRADIENT);
    assert!(EXCHANGE.prime(Box::new(FrameBuffer::new())).is_ok(), "frame buffer primed twice");

    thread::Builder::new()
        .name("acquisition".into())
        .spawn(|| {
            let mut acquisition = Acquisition::new(EXCHANGE.acquisition(), SyntheticSensor::new());
            loop {
                if let Err(error) = block_on(acquisition.cycle()) {
                    warn!(failed_reads = acquisition.failed_reads(), "sensor read failed: {error}");
                }
            }
        })
        .expect("failed to spawn acquisition thread");

    thread::Builder::new()
        .name("fps".into())
        .spawn(|| {
            loop {
                thread::sleep(FPS_INTERVAL);
                let fps = FRAME_RATE.tick();
                debug!(fps, "frame rate");
            }
        })
        .expect("failed to spawn fps thread");

    let sink = SimulatorSink::new("MLX90640 Thermal Camera");
    let mut render = Render::new(EXCHANGE.render(), sink, &palette, &CONTROLS, &FRAME_RATE, DEFAULT_MIRROR);
    block_on(render.start());
    info!(mode = ?CONTROLS.interpolation(), mirror = ?DEFAULT_MIRROR, "simulator started (hold I: nearest, hold F: freeze)");

    let started = Instant::now();
    let mut buttons = Buttons::new();

    loop {
        block_on(render.cycle());

        for event in render.display_mut().events() {
            match event {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } if !repeat => {
                    if let Some(kind) = key_input(keycode) {
                        buttons.set_held(kind, true);
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(kind) = key_input(keycode) {
                        buttons.set_held(kind, false);
                    }
                }
                _ => {}
            }
        }

        buttons.sync(started.elapsed().as_millis() as u64, &CONTROLS);
    }
}
