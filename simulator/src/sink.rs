//! SDL2 window standing in for the SSD1351.
//!
//! Drawing goes into a `SimulatorDisplay`; `present` copies it to the window,
//! just as the device pushes its RAM framebuffer to the panel.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use thermocam_common::FrameSink;
use thermocam_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Window scale (a 128×128 panel is tiny on a desktop screen).
const SCALE: u32 = 4;

pub struct SimulatorSink {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl SimulatorSink {
    pub fn new(title: &str) -> Self {
        let output_settings = OutputSettingsBuilder::new().scale(SCALE).build();
        Self {
            display: SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            window: Window::new(title, &output_settings),
        }
    }

    /// Window events since the last call (key presses, close button).
    pub fn events(&mut self) -> impl Iterator<Item = SimulatorEvent> + '_ { self.window.events() }
}

impl OriginDimensions for SimulatorSink {
    fn size(&self) -> Size { self.display.size() }
}

impl DrawTarget for SimulatorSink {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color)
    }
}

impl FrameSink for SimulatorSink {
    async fn present(&mut self) -> Result<(), Self::Error> {
        self.window.update(&self.display);
        Ok(())
    }
}
