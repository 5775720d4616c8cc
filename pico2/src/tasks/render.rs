//! Render task: owns the display and runs the render loop forever.

use defmt::{info, warn};
use thermocam_common::{Controls, FrameRate, Palette, Render};

use super::FrameExchange;
use crate::config::MIRROR;
use crate::display::Ssd1351Display;

#[embassy_executor::task]
pub async fn render_task(
    mut display: Ssd1351Display<'static>,
    palette: &'static Palette,
    controls: &'static Controls,
    frame_rate: &'static FrameRate,
    exchange: &'static FrameExchange,
) {
    if let Err(error) = display.init().await {
        warn!("Display init failed: {}", error);
    }
    info!("Display initialized");

    let mut render = Render::new(exchange.render(), display, palette, controls, frame_rate, MIRROR);
    render.start().await;
    info!("Render loop started ({}, {})", controls.interpolation(), MIRROR);

    render.run().await
}
