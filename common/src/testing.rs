//! Recording draw target for host tests.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::render::FrameSink;

/// In-memory 128×128 screen that remembers which pixels were written.
pub struct TestCanvas {
    pixels: Vec<Option<Rgb565>>,
    /// Number of `fill_solid` calls.
    pub fill_calls: usize,
    /// Number of `draw_iter` calls.
    pub iter_calls: usize,
    /// Pixels that fell outside the screen.
    pub out_of_bounds: usize,
    /// Number of completed `present` calls.
    pub presents: usize,
}

impl TestCanvas {
    pub fn new() -> Self {
        Self {
            pixels: vec![None; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            fill_calls: 0,
            iter_calls: 0,
            out_of_bounds: 0,
            presents: 0,
        }
    }

    /// Color last written at `(x, y)`, `None` if never written or off-screen.
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        self.index(Point::new(x, y)).and_then(|i| self.pixels[i])
    }

    /// Whether any pixel inside `area` holds `color`.
    pub fn any_in(
        &self,
        area: &Rectangle,
        color: Rgb565,
    ) -> bool {
        area.points().any(|p| self.pixel(p.x, p.y) == Some(color))
    }

    fn index(
        &self,
        point: Point,
    ) -> Option<usize> {
        let inside = point.x >= 0 && point.y >= 0 && (point.x as u32) < SCREEN_WIDTH && (point.y as u32) < SCREEN_HEIGHT;
        inside.then(|| point.y as usize * SCREEN_WIDTH as usize + point.x as usize)
    }

    fn plot(
        &mut self,
        point: Point,
        color: Rgb565,
    ) {
        match self.index(point) {
            Some(i) => self.pixels[i] = Some(color),
            None => self.out_of_bounds += 1,
        }
    }
}

impl OriginDimensions for TestCanvas {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for TestCanvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.iter_calls += 1;
        for Pixel(point, color) in pixels {
            self.plot(point, color);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        self.fill_calls += 1;
        for point in area.points() {
            self.plot(point, color);
        }
        Ok(())
    }
}

impl FrameSink for TestCanvas {
    async fn present(&mut self) -> Result<(), Self::Error> {
        self.presents += 1;
        Ok(())
    }
}
