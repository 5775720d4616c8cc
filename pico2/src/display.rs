//! Async SSD1351 OLED driver for embassy-rp.
//!
//! Drawing goes into a RAM [`Framebuffer`]; [`FrameSink::present`] pushes it
//! to the panel over SPI1 with an async DMA transfer.
//!
//! # Performance Optimizations
//!
//! - **Async DMA:** `present()` streams the 32 KB frame without blocking the CPU,
//!   so the core-1 executor keeps serving button edges and the fps ticker
//! - **Blocking opcode writes:** single command bytes skip the DMA setup
//! - **Full-screen window:** every present rewrites the whole panel, so there is
//!   no dirty-region bookkeeping

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Async, Config as SpiConfig, Error as SpiError, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use thermocam_common::FrameSink;

use crate::config::{DISPLAY_RESET_MS, SPI_FREQUENCY_HZ};
use crate::ssd1351::{FRAME_BYTES, FULL_WINDOW, Framebuffer, INIT_SEQUENCE, WRITE_RAM};

/// SPI configuration for the SSD1351 (write-only, mode 0).
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = SPI_FREQUENCY_HZ;
    config
}

/// SSD1351 panel plus its local framebuffer.
pub struct Ssd1351Display<'d> {
    spi: Spi<'d, SPI1, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
    rst: Output<'d>,
    framebuffer: Framebuffer<'d>,
}

impl<'d> Ssd1351Display<'d> {
    /// Create a display from the SPI peripheral, control pins and frame memory.
    pub fn new(
        spi: Spi<'d, SPI1, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
        rst: Output<'d>,
        buffer: &'d mut [u8; FRAME_BYTES],
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            framebuffer: Framebuffer::new(buffer),
        }
    }

    /// Pulse reset and send the power-on configuration.
    pub async fn init(&mut self) -> Result<(), SpiError> {
        self.rst.set_high();
        Timer::after_millis(DISPLAY_RESET_MS).await;
        self.rst.set_low();
        Timer::after_millis(DISPLAY_RESET_MS).await;
        self.rst.set_high();
        Timer::after_millis(DISPLAY_RESET_MS).await;

        for command in INIT_SEQUENCE {
            self.write_command(command.opcode, command.data)?;
        }
        Ok(())
    }

    /// Send an opcode (DC low) and its parameters (DC high) with CS held low.
    fn write_command(
        &mut self,
        opcode: u8,
        data: &[u8],
    ) -> Result<(), SpiError> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[opcode]);
        if result.is_ok() && !data.is_empty() {
            self.dc.set_high();
            result = self.spi.blocking_write(data);
        }
        self.cs.set_high();
        result
    }
}

impl OriginDimensions for Ssd1351Display<'_> {
    fn size(&self) -> Size { self.framebuffer.size() }
}

impl DrawTarget for Ssd1351Display<'_> {
    type Color = Rgb565;
    type Error = SpiError;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels).map_err(|never| match never {})
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.framebuffer.fill_contiguous(area, colors).map_err(|never| match never {})
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color).map_err(|never| match never {})
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.framebuffer.clear(color).map_err(|never| match never {})
    }
}

impl FrameSink for Ssd1351Display<'_> {
    /// Select the full window and stream the framebuffer via async DMA.
    async fn present(&mut self) -> Result<(), Self::Error> {
        for (opcode, args) in FULL_WINDOW {
            self.write_command(opcode, &args)?;
        }

        // WRITE_RAM then the frame with CS held low
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[WRITE_RAM]);
        if result.is_ok() {
            self.dc.set_high();
            result = self.spi.write(self.framebuffer.as_bytes()).await;
        }
        self.cs.set_high();
        result
    }
}
