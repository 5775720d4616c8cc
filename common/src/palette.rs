//! Piecewise-linear color gradient table.
//!
//! The palette is built once at start-up and then only read: the render loop
//! looks up one entry per output pixel and the legend strip draws the whole
//! table. Both happen after construction, so the table is shared by plain
//! reference with no synchronization.
//!
//! # Algorithm
//!
//! For output index `c` in `0..N` and `K` anchors, the position in anchor space
//! is `t = c * (K - 1) / (N - 1)`. Whole positions copy the anchor; anything in
//! between blends the two neighbouring anchors channel by channel and rounds to
//! the nearest integer. There is no gamma correction.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use micromath::F32;

use crate::config::PALETTE_SIZE;

/// Fill `out` with a gradient running through `anchors` in order.
///
/// `out[0]` is `anchors[0]` and the last entry is the last anchor. Needs at
/// least two anchors and two output entries. Shorter inputs leave `out`
/// untouched.
pub fn fill_gradient(
    anchors: &[Rgb888],
    out: &mut [Rgb888],
) {
    let k = anchors.len();
    let n = out.len();
    if k < 2 || n < 2 {
        return;
    }

    for (c, slot) in out.iter_mut().enumerate() {
        // Integer numerator keeps the last position exactly K - 1
        let t = (c * (k - 1)) as f32 / (n - 1) as f32;
        let i = t as usize;
        let fraction = t - i as f32;

        *slot = if fraction == 0.0 {
            anchors[i]
        } else {
            let from = anchors[i];
            let to = anchors[i + 1];
            Rgb888::new(
                blend_channel(from.r(), to.r(), fraction),
                blend_channel(from.g(), to.g(), fraction),
                blend_channel(from.b(), to.b(), fraction),
            )
        };
    }
}

#[inline]
fn blend_channel(
    from: u8,
    to: u8,
    fraction: f32,
) -> u8 {
    let value = (f32::from(to) - f32::from(from)) * fraction + f32::from(from);
    F32(value).round().0 as u8
}

/// Display-native color table indexed by quantized temperature.
pub struct Palette {
    colors: [Rgb565; PALETTE_SIZE],
}

impl Palette {
    /// Build the table from gradient anchors.
    pub fn new(anchors: &[Rgb888]) -> Self {
        let mut gradient = [Rgb888::BLACK; PALETTE_SIZE];
        fill_gradient(anchors, &mut gradient);

        let mut colors = [Rgb565::BLACK; PALETTE_SIZE];
        for (native, rgb) in colors.iter_mut().zip(gradient.iter()) {
            *native = Rgb565::from(*rgb);
        }
        Self { colors }
    }

    /// Color for a palette index.
    ///
    /// `PALETTE_SIZE` is 256 at most, so every `u8` below it is in range. The
    /// quantizer never produces an index past `PALETTE_SIZE - 1`.
    #[inline]
    pub fn color(
        &self,
        index: u8,
    ) -> Rgb565 {
        self.colors[usize::from(index).min(PALETTE_SIZE - 1)]
    }

    /// All entries, coldest first.
    #[inline]
    pub fn as_slice(&self) -> &[Rgb565] { &self.colors }
}

// =============================================================================
// Tests
// =============================================================================
