//! SSD1351 command set and local RGB565 framebuffer.
//!
//! The panel is driven write-only over SPI: every command is one opcode byte
//! sent with DC low, followed by its parameter bytes sent with DC high. The
//! whole 128×128 image is kept in RAM in the panel's native big-endian RGB565
//! layout, so a frame goes out as one contiguous DMA transfer after
//! `SET_COLUMN` / `SET_ROW` / `WRITE_RAM`.
//!
//! # Performance Optimizations
//!
//! - **Native byte order:** pixels are stored exactly as the panel expects them,
//!   so `present()` is a single DMA transfer with no conversion pass
//! - **Row slices:** `fill_solid()` writes whole row spans, which covers every
//!   nearest-neighbor block and the overlay strips

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Panel dimensions.
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 128;

/// Size of one RGB565 frame in bytes.
pub const FRAME_BYTES: usize = WIDTH * HEIGHT * 2;

// SSD1351 Commands
pub const SET_COLUMN: u8 = 0x15;
pub const WRITE_RAM: u8 = 0x5C;
pub const SET_ROW: u8 = 0x75;
pub const SET_REMAP: u8 = 0xA0;
pub const START_LINE: u8 = 0xA1;
pub const DISPLAY_OFFSET: u8 = 0xA2;
pub const NORMAL_DISPLAY: u8 = 0xA6;
pub const FUNCTION_SELECT: u8 = 0xAB;
pub const DISPLAY_OFF: u8 = 0xAE;
pub const DISPLAY_ON: u8 = 0xAF;
pub const PRECHARGE: u8 = 0xB1;
pub const CLOCK_DIV: u8 = 0xB3;
pub const SET_VSL: u8 = 0xB4;
pub const SET_GPIO: u8 = 0xB5;
pub const PRECHARGE2: u8 = 0xB6;
pub const VCOMH: u8 = 0xBE;
pub const CONTRAST_ABC: u8 = 0xC1;
pub const CONTRAST_MASTER: u8 = 0xC7;
pub const MUX_RATIO: u8 = 0xCA;
pub const COMMAND_LOCK: u8 = 0xFD;

// SET_REMAP flags
const REMAP_COLOR_SWAP: u8 = 0x04; // C-B-A color order
const REMAP_COM_REVERSE: u8 = 0x10; // Scan COM[N-1] to COM0
const REMAP_COM_SPLIT: u8 = 0x20; // Odd/even COM split
const REMAP_65K: u8 = 0x40; // 16-bit color depth

/// One opcode plus its parameter bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Command {
    pub opcode: u8,
    pub data: &'static [u8],
}

impl Command {
    const fn new(
        opcode: u8,
        data: &'static [u8],
    ) -> Self {
        Self { opcode, data }
    }
}

/// Power-on configuration, sent once after the hardware reset pulse.
pub const INIT_SEQUENCE: &[Command] = &[
    Command::new(COMMAND_LOCK, &[0x12]),
    Command::new(COMMAND_LOCK, &[0xB1]),
    Command::new(DISPLAY_OFF, &[]),
    Command::new(CLOCK_DIV, &[0xF1]),
    Command::new(MUX_RATIO, &[(HEIGHT - 1) as u8]),
    Command::new(DISPLAY_OFFSET, &[0x00]),
    Command::new(START_LINE, &[0x00]),
    Command::new(SET_GPIO, &[0x00]),
    Command::new(FUNCTION_SELECT, &[0x01]),
    Command::new(PRECHARGE, &[0x32]),
    Command::new(VCOMH, &[0x05]),
    Command::new(NORMAL_DISPLAY, &[]),
    Command::new(CONTRAST_ABC, &[0xC8, 0x80, 0xC8]),
    Command::new(CONTRAST_MASTER, &[0x0F]),
    Command::new(SET_VSL, &[0xA0, 0xB5, 0x55]),
    Command::new(PRECHARGE2, &[0x01]),
    Command::new(SET_REMAP, &[REMAP_65K | REMAP_COM_SPLIT | REMAP_COM_REVERSE | REMAP_COLOR_SWAP]),
    Command::new(DISPLAY_ON, &[]),
];

/// Column and row address commands selecting the inclusive window
/// `(x0, y0)..=(x1, y1)`.
pub const fn window_commands(
    x0: u8,
    y0: u8,
    x1: u8,
    y1: u8,
) -> [(u8, [u8; 2]); 2] {
    [(SET_COLUMN, [x0, x1]), (SET_ROW, [y0, y1])]
}

/// Address window covering the whole panel.
pub const FULL_WINDOW: [(u8, [u8; 2]); 2] = window_commands(0, 0, (WIDTH - 1) as u8, (HEIGHT - 1) as u8);

// =============================================================================
// Framebuffer
// =============================================================================

/// `DrawTarget` over a big-endian RGB565 frame in RAM.
pub struct Framebuffer<'a> {
    bytes: &'a mut [u8; FRAME_BYTES],
}

impl<'a> Framebuffer<'a> {
    /// Wrap `bytes` as a framebuffer. The contents are left as they are.
    pub fn new(bytes: &'a mut [u8; FRAME_BYTES]) -> Self { Self { bytes } }

    /// Raw frame, ready to stream after `WRITE_RAM`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.bytes.as_slice() }

    #[inline]
    const fn offset(
        x: usize,
        y: usize,
    ) -> usize {
        (y * WIDTH + x) * 2
    }

    #[inline]
    fn set_pixel(
        &mut self,
        point: Point,
        color: Rgb565,
    ) {
        if point.x >= 0 && point.x < WIDTH as i32 && point.y >= 0 && point.y < HEIGHT as i32 {
            let idx = Self::offset(point.x as usize, point.y as usize);
            self.bytes[idx..idx + 2].copy_from_slice(&to_bytes(color));
        }
    }
}

#[inline]
fn to_bytes(color: Rgb565) -> [u8; 2] { RawU16::from(color).into_inner().to_be_bytes() }

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size { Size::new(WIDTH as u32, HEIGHT as u32) }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(
        &mut self,
        area: &Rectangle,
        colors: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors arrive in row-major order for the whole (unclipped) area
        self.draw_iter(area.points().zip(colors).map(|(point, color)| Pixel(point, color)))
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable = area.intersection(&self.bounding_box());
        if drawable.is_zero_sized() {
            return Ok(());
        }

        let bytes = to_bytes(color);
        let x = drawable.top_left.x as usize;
        let span = drawable.size.width as usize * 2;
        for y in drawable.rows() {
            let start = Self::offset(x, y as usize);
            for pixel in self.bytes[start..start + span].chunks_exact_mut(2) {
                pixel.copy_from_slice(&bytes);
            }
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let bytes = to_bytes(color);
        for pixel in self.bytes.chunks_exact_mut(2) {
            pixel.copy_from_slice(&bytes);
        }
        Ok(())
    }
}
