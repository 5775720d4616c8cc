//! Async tasks running on core 1.
//!
//! - `render`: Display init, legend, then the render loop
//! - `input`: One instance per touch button, feeding the render toggles
//! - `frame_rate`: Once-per-second fps snapshot for the stats strip

mod frame_rate;
mod input;
mod render;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
pub use frame_rate::frame_rate_task;
pub use input::input_task;
pub use render::render_task;
use thermocam_common::{Exchange, FrameBuffer};

/// Exchange carrying the single static frame buffer between the cores.
pub type FrameExchange = Exchange<CriticalSectionRawMutex, &'static mut FrameBuffer>;
