//! Display-side control loop.
//!
//! # Frame Pipeline
//!
//! ```text
//!   receive ──▶ frozen? ──yes──▶ send back ─────────────────────────▶ done
//!                  │
//!                  no
//!                  ▼
//!   draw image ──▶ copy min/max ──▶ send back ──▶ draw stats ──▶ present
//! ```
//!
//! The frame buffer goes back to the acquisition loop as soon as the image is
//! in the draw target. Text formatting, the stats strip and the display
//! transfer all overlap with the next sensor read.

use core::ops::Deref;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::BLACK;
use crate::controls::{Controls, FrameRate};
use crate::exchange::RenderPort;
use crate::frame::FrameBuffer;
use crate::interpolate::{Mirror, draw_frame};
use crate::overlay::{StatsLabels, draw_legend, draw_stats};
use crate::palette::Palette;

/// A draw target whose contents only reach the panel on [`present`](Self::present).
///
/// Drawing goes into a local framebuffer (or window surface); `present`
/// pushes it out.
#[allow(async_fn_in_trait)]
pub trait FrameSink: DrawTarget<Color = Rgb565> {
    /// Push everything drawn so far to the panel.
    async fn present(&mut self) -> Result<(), Self::Error>;
}

/// What a render cycle did with the frame it received.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Image and stats drawn and presented.
    Rendered,
    /// Freeze held: buffer returned untouched, screen unchanged.
    Frozen,
}

/// Draws frames from the exchange onto a [`FrameSink`].
pub struct Render<'a, M: RawMutex, D, T> {
    port: RenderPort<'a, M, T>,
    display: D,
    palette: &'a Palette,
    controls: &'a Controls,
    frame_rate: &'a FrameRate,
    mirror: Mirror,
}

impl<'a, M, D, T> Render<'a, M, D, T>
where
    M: RawMutex,
    D: FrameSink,
    T: Deref<Target = FrameBuffer>,
{
    pub const fn new(
        port: RenderPort<'a, M, T>,
        display: D,
        palette: &'a Palette,
        controls: &'a Controls,
        frame_rate: &'a FrameRate,
        mirror: Mirror,
    ) -> Self {
        Self {
            port,
            display,
            palette,
            controls,
            frame_rate,
            mirror,
        }
    }

    /// Clear the screen and draw the static legend.
    pub async fn start(&mut self) {
        self.display.clear(BLACK).ok();
        draw_legend(&mut self.display, self.palette).ok();
        self.display.present().await.ok();
    }

    /// Receive one frame and draw it, unless frozen.
    pub async fn cycle(&mut self) -> CycleOutcome {
        let frame = self.port.receive().await;

        if self.controls.is_frozen() {
            self.port.send(frame).await;
            return CycleOutcome::Frozen;
        }

        draw_frame(&mut self.display, &frame, self.palette, self.controls.interpolation(), self.mirror).ok();
        let (min, max) = (frame.min, frame.max);
        self.port.send(frame).await;

        draw_stats(&mut self.display, &StatsLabels::new(min, max, self.frame_rate.fps())).ok();
        self.display.present().await.ok();
        self.frame_rate.record_frame();
        CycleOutcome::Rendered
    }

    /// Draw frames forever.
    pub async fn run(&mut self) -> ! {
        loop {
            self.cycle().await;
        }
    }

    /// The draw target.
    #[inline]
    pub const fn display(&self) -> &D { &self.display }

    /// The draw target, for polling input on hosts where it owns the window.
    #[inline]
    pub fn display_mut(&mut self) -> &mut D { &mut self.display }
}

// =============================================================================
// Tests
// =============================================================================
