//! Upscaling of the 32×24 index grid to the 128×96 display image.
//!
//! Two interchangeable strategies:
//!
//! - **Nearest-neighbor:** every sensor cell becomes one `PIXEL_SIZE²` block,
//!   drawn with a single `fill_solid` call.
//! - **Bilinear:** every output pixel is blended from its four surrounding
//!   sensor cells using 7-bit fixed-point weights. Blending happens in palette
//!   index space, and the color is looked up only once the index is final.
//!
//! Mirroring is applied to output coordinates only: sampling is identical,
//! only the position a finished pixel is written to changes.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{GRAPH_HEIGHT, GRAPH_WIDTH, PIXEL_SIZE, SENSOR_HEIGHT, SENSOR_WIDTH};
use crate::frame::FrameBuffer;
use crate::palette::Palette;

// =============================================================================
// Fixed-Point Configuration
// =============================================================================

/// Number of fractional bits in source coordinates.
pub const FRACTION_BITS: u32 = 7;

/// Mask selecting the fractional part of a source coordinate.
pub const FRACTION_MASK: i32 = (1 << FRACTION_BITS) - 1;

/// Source columns advanced per output column, in 1/128 units.
pub const MX: i32 = (((SENSOR_WIDTH as i32) - 1) << FRACTION_BITS) / GRAPH_WIDTH as i32;

/// Source rows advanced per output row, in 1/128 units.
pub const MY: i32 = (((SENSOR_HEIGHT as i32) - 1) << FRACTION_BITS) / GRAPH_HEIGHT as i32;

// The right/bottom neighbor of the last output pixel must still be inside the grid
const _: () = assert!((((GRAPH_WIDTH as i32 - 1) * MX) >> FRACTION_BITS) + 1 <= SENSOR_WIDTH as i32 - 1);
const _: () = assert!((((GRAPH_HEIGHT as i32 - 1) * MY) >> FRACTION_BITS) + 1 <= SENSOR_HEIGHT as i32 - 1);
const _: () = assert!(MX > 0 && MY > 0);

// =============================================================================
// Render Options
// =============================================================================

/// Upscaling strategy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interpolation {
    /// One solid block per sensor cell.
    Nearest,
    /// Fixed-point bilinear blend per output pixel.
    Bilinear,
}

/// Axis flips applied to output coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mirror {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Mirror {
    /// Display position of output pixel `(x, y)`.
    #[inline]
    pub const fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Point {
        let x = if self.horizontal { GRAPH_WIDTH as i32 - 1 - x } else { x };
        let y = if self.vertical { GRAPH_HEIGHT as i32 - 1 - y } else { y };
        Point::new(x, y)
    }

    /// Top-left display corner of the block for sensor cell `(x, y)`.
    ///
    /// A flipped block is anchored at its far edge so it stays inside the image.
    #[inline]
    pub const fn block(
        &self,
        x: usize,
        y: usize,
    ) -> Point {
        let left = x as i32 * PIXEL_SIZE as i32;
        let top = y as i32 * PIXEL_SIZE as i32;
        let x = if self.horizontal { GRAPH_WIDTH as i32 - PIXEL_SIZE as i32 - left } else { left };
        let y = if self.vertical { GRAPH_HEIGHT as i32 - PIXEL_SIZE as i32 - top } else { top };
        Point::new(x, y)
    }
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw `frame` into the image area with the selected strategy.
pub fn draw_frame<D>(
    display: &mut D,
    frame: &FrameBuffer,
    palette: &Palette,
    mode: Interpolation,
    mirror: Mirror,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match mode {
        Interpolation::Nearest => draw_nearest(display, frame, palette, mirror),
        Interpolation::Bilinear => draw_bilinear(display, frame, palette, mirror),
    }
}

/// Nearest-neighbor: one solid block per sensor cell.
pub fn draw_nearest<D>(
    display: &mut D,
    frame: &FrameBuffer,
    palette: &Palette,
    mirror: Mirror,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let size = Size::new(PIXEL_SIZE, PIXEL_SIZE);
    for y in 0..SENSOR_HEIGHT {
        for x in 0..SENSOR_WIDTH {
            let color = palette.color(frame.value(x, y));
            display.fill_solid(&Rectangle::new(mirror.block(x, y), size), color)?;
        }
    }
    Ok(())
}

/// Bilinear: every output pixel blended from its four neighbors.
///
/// All pixels are streamed through a single `draw_iter` call.
pub fn draw_bilinear<D>(
    display: &mut D,
    frame: &FrameBuffer,
    palette: &Palette,
    mirror: Mirror,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let pixels = (0..GRAPH_HEIGHT as i32).flat_map(move |y| {
        (0..GRAPH_WIDTH as i32).map(move |x| Pixel(mirror.pixel(x, y), palette.color(bilinear_index(frame, x, y))))
    });
    display.draw_iter(pixels)
}

/// Blended palette index for output pixel `(x, y)` (before mirroring).
///
/// Horizontal blend first, then vertical, each `a + ((t * (b - a)) >> 7)`.
/// The arithmetic shift floors toward the lower input, so the result always
/// lies between the inputs and fits in `u8`.
#[inline]
pub fn bilinear_index(
    frame: &FrameBuffer,
    x: i32,
    y: i32,
) -> u8 {
    let sx = x * MX;
    let sy = y * MY;
    let x0 = (sx >> FRACTION_BITS) as usize;
    let y0 = (sy >> FRACTION_BITS) as usize;
    let tx = sx & FRACTION_MASK;
    let ty = sy & FRACTION_MASK;

    let v00 = i32::from(frame.value(x0, y0));
    let v10 = i32::from(frame.value(x0 + 1, y0));
    let v01 = i32::from(frame.value(x0, y0 + 1));
    let v11 = i32::from(frame.value(x0 + 1, y0 + 1));

    let top = v00 + ((tx * (v10 - v00)) >> FRACTION_BITS);
    let bottom = v01 + ((tx * (v11 - v01)) >> FRACTION_BITS);
    (top + ((ty * (bottom - top)) >> FRACTION_BITS)) as u8
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::HEAT;
    use crate::config::{PALETTE_SIZE, SCREEN_WIDTH, SENSOR_PIXELS};
    use crate::testing::TestCanvas;

    const TOP: u8 = (PALETTE_SIZE - 1) as u8;

    fn frame_from(f: impl Fn(usize, usize) -> u8) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        for y in 0..SENSOR_HEIGHT {
            for x in 0..SENSOR_WIDTH {
                frame.values[y * SENSOR_WIDTH + x] = f(x, y);
            }
        }
        frame
    }

    fn assert_image_uniform(
        canvas: &TestCanvas,
        color: Rgb565,
    ) {
        for y in 0..GRAPH_HEIGHT as i32 {
            for x in 0..GRAPH_WIDTH as i32 {
                assert_eq!(canvas.pixel(x, y), Some(color), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_fixed_point_factors() {
        assert_eq!(MX, 31);
        assert_eq!(MY, 30);
    }

    #[test]
    fn test_constant_grid_nearest() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|_, _| 77);
        let mut canvas = TestCanvas::new();

        draw_nearest(&mut canvas, &frame, &palette, Mirror::default()).ok();
        assert_image_uniform(&canvas, palette.color(77));
        assert_eq!(canvas.fill_calls, SENSOR_PIXELS, "one draw call per sensor cell");
        assert_eq!(canvas.out_of_bounds, 0);
    }

    #[test]
    fn test_constant_grid_bilinear() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|_, _| 200);
        let mut canvas = TestCanvas::new();

        draw_bilinear(&mut canvas, &frame, &palette, Mirror::default()).ok();
        assert_image_uniform(&canvas, palette.color(200));
        assert_eq!(canvas.out_of_bounds, 0);
    }

    #[test]
    fn test_bilinear_midpoint_averages_corners() {
        // Output (64, 32) samples source (15, 7)..(16, 8) with tx = ty = 64
        assert_eq!((64 * MX) >> FRACTION_BITS, 15);
        assert_eq!((64 * MX) & FRACTION_MASK, 64);
        assert_eq!((32 * MY) >> FRACTION_BITS, 7);
        assert_eq!((32 * MY) & FRACTION_MASK, 64);

        // Left column 0, right column N-1
        let frame = frame_from(|x, _| if x <= 15 { 0 } else { TOP });
        assert_eq!(bilinear_index(&frame, 64, 32), 127);

        // Top row 0, bottom row N-1
        let frame = frame_from(|_, y| if y <= 7 { 0 } else { TOP });
        assert_eq!(bilinear_index(&frame, 64, 32), 127);
    }

    #[test]
    fn test_bilinear_stays_between_inputs() {
        // Every blend lies between the smallest and largest of its four corners
        let checkerboard = frame_from(|x, y| if (x + y) % 2 == 0 { 0 } else { TOP });
        let scattered = frame_from(|x, y| ((x * 37 + y * 91) % PALETTE_SIZE) as u8);
        for frame in [&checkerboard, &scattered] {
            for y in 0..GRAPH_HEIGHT as i32 {
                for x in 0..GRAPH_WIDTH as i32 {
                    let x0 = ((x * MX) >> FRACTION_BITS) as usize;
                    let y0 = ((y * MY) >> FRACTION_BITS) as usize;
                    let corners = [
                        frame.value(x0, y0),
                        frame.value(x0 + 1, y0),
                        frame.value(x0, y0 + 1),
                        frame.value(x0 + 1, y0 + 1),
                    ];
                    let low = corners.iter().copied().min().unwrap_or(0);
                    let high = corners.iter().copied().max().unwrap_or(TOP);

                    let index = bilinear_index(frame, x, y);
                    assert!(
                        (low..=high).contains(&index),
                        "({x}, {y}) blended to {index}, corners {corners:?}"
                    );
                }
            }
        }

        let frame = frame_from(|x, _| (x * 8) as u8);
        for y in 0..GRAPH_HEIGHT as i32 {
            let mut previous = 0u8;
            for x in 0..GRAPH_WIDTH as i32 {
                let index = bilinear_index(&frame, x, y);
                assert!(index >= previous, "ramp stays monotonic");
                previous = index;
            }
        }
    }

    #[test]
    fn test_horizontal_mirror_nearest() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|x, _| if x < SENSOR_WIDTH / 2 { 0 } else { TOP });
        let mirror = Mirror {
            horizontal: true,
            vertical: false,
        };
        let mut canvas = TestCanvas::new();

        draw_nearest(&mut canvas, &frame, &palette, mirror).ok();
        for y in 0..GRAPH_HEIGHT as i32 {
            assert_eq!(canvas.pixel(0, y), Some(palette.color(TOP)));
            assert_eq!(canvas.pixel(GRAPH_WIDTH as i32 - 1, y), Some(palette.color(0)));
        }
        assert_eq!(canvas.out_of_bounds, 0, "flipped blocks stay inside the image");
    }

    #[test]
    fn test_horizontal_mirror_bilinear() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|x, _| if x < SENSOR_WIDTH / 2 { 0 } else { TOP });
        let mirror = Mirror {
            horizontal: true,
            vertical: false,
        };
        let mut canvas = TestCanvas::new();

        draw_bilinear(&mut canvas, &frame, &palette, mirror).ok();
        for y in 0..GRAPH_HEIGHT as i32 {
            assert_eq!(canvas.pixel(0, y), Some(palette.color(TOP)));
            assert_eq!(canvas.pixel(SCREEN_WIDTH as i32 - 1, y), Some(palette.color(0)));
        }
    }

    #[test]
    fn test_vertical_mirror_moves_rows() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|_, y| if y == 0 { TOP } else { 0 });
        let mirror = Mirror {
            horizontal: false,
            vertical: true,
        };
        let mut canvas = TestCanvas::new();

        draw_nearest(&mut canvas, &frame, &palette, mirror).ok();
        assert_eq!(canvas.pixel(5, GRAPH_HEIGHT as i32 - 1), Some(palette.color(TOP)));
        assert_eq!(canvas.pixel(5, GRAPH_HEIGHT as i32 - PIXEL_SIZE as i32), Some(palette.color(TOP)));
        assert_eq!(canvas.pixel(5, 0), Some(palette.color(0)));
    }

    #[test]
    fn test_draw_frame_dispatch() {
        let palette = Palette::new(&HEAT);
        let frame = frame_from(|_, _| 3);

        let mut canvas = TestCanvas::new();
        draw_frame(&mut canvas, &frame, &palette, Interpolation::Nearest, Mirror::default()).ok();
        assert_eq!(canvas.fill_calls, SENSOR_PIXELS);
        assert_eq!(canvas.iter_calls, 0);

        let mut canvas = TestCanvas::new();
        draw_frame(&mut canvas, &frame, &palette, Interpolation::Bilinear, Mirror::default()).ok();
        assert_eq!(canvas.fill_calls, 0);
        assert_eq!(canvas.iter_calls, 1);
    }
}
