//! Run-time toggles and the frame-rate counter.
//!
//! Both are written from an asynchronous context (button edges, the 1 s
//! timer) and read by the render loop once per frame. They use `Relaxed`
//! atomics: the render loop may act on a value up to one frame stale, which
//! only delays a purely visual change by one frame.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::input::{Edge, InputKind};
use crate::interpolate::Interpolation;

// =============================================================================
// Render Toggles
// =============================================================================

/// Interpolation mode and freeze flag.
pub struct Controls {
    bilinear: AtomicBool,
    freeze: AtomicBool,
}

impl Controls {
    /// Create controls starting in `mode`, not frozen.
    pub const fn new(mode: Interpolation) -> Self {
        Self {
            bilinear: AtomicBool::new(matches!(mode, Interpolation::Bilinear)),
            freeze: AtomicBool::new(false),
        }
    }

    /// Current interpolation mode.
    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        if self.bilinear.load(Ordering::Relaxed) {
            Interpolation::Bilinear
        } else {
            Interpolation::Nearest
        }
    }

    /// Whether the render loop should skip drawing and hand frames straight back.
    #[inline]
    pub fn is_frozen(&self) -> bool { self.freeze.load(Ordering::Relaxed) }

    /// Set the interpolation mode directly.
    #[inline]
    pub fn set_interpolation(
        &self,
        mode: Interpolation,
    ) {
        self.bilinear.store(matches!(mode, Interpolation::Bilinear), Ordering::Relaxed);
    }

    /// Set the freeze flag directly.
    #[inline]
    pub fn set_frozen(
        &self,
        frozen: bool,
    ) {
        self.freeze.store(frozen, Ordering::Relaxed);
    }

    /// Apply a button edge.
    ///
    /// Both buttons act while held: touching the interpolation button
    /// switches to nearest-neighbor until released, touching the freeze button
    /// holds the current image until released.
    pub fn apply(
        &self,
        kind: InputKind,
        edge: Edge,
    ) {
        match (kind, edge) {
            (InputKind::Interpolation, Edge::Rising) => self.set_interpolation(Interpolation::Nearest),
            (InputKind::Interpolation, Edge::Falling) => self.set_interpolation(Interpolation::Bilinear),
            (InputKind::Freeze, Edge::Rising) => self.set_frozen(true),
            (InputKind::Freeze, Edge::Falling) => self.set_frozen(false),
        }
    }
}

impl Default for Controls {
    fn default() -> Self { Self::new(crate::config::DEFAULT_INTERPOLATION) }
}

// =============================================================================
// Frame Rate
// =============================================================================

/// Rendered-frame counter, snapshotted once per interval.
pub struct FrameRate {
    frames: AtomicU32,
    fps: AtomicU32,
}

impl FrameRate {
    /// Create a counter with no frames and no measurement yet.
    pub const fn new() -> Self {
        Self {
            frames: AtomicU32::new(0),
            fps: AtomicU32::new(0),
        }
    }

    /// Count one rendered (non-frozen) frame.
    #[inline]
    pub fn record_frame(&self) { self.frames.fetch_add(1, Ordering::Relaxed); }

    /// Publish the frames counted since the last tick and start a new interval.
    ///
    /// Called once per [`FPS_INTERVAL_MS`](crate::config::FPS_INTERVAL_MS).
    pub fn tick(&self) -> u32 {
        let frames = self.frames.swap(0, Ordering::Relaxed);
        self.fps.store(frames, Ordering::Relaxed);
        frames
    }

    /// Frames rendered during the last complete interval.
    #[inline]
    pub fn fps(&self) -> u32 { self.fps.load(Ordering::Relaxed) }
}

impl Default for FrameRate {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_button_is_momentary() {
        let controls = Controls::new(Interpolation::Bilinear);
        controls.apply(InputKind::Interpolation, Edge::Rising);
        assert_eq!(controls.interpolation(), Interpolation::Nearest);
        controls.apply(InputKind::Interpolation, Edge::Falling);
        assert_eq!(controls.interpolation(), Interpolation::Bilinear);
    }

    #[test]
    fn test_freeze_button_is_momentary() {
        let controls = Controls::new(Interpolation::Nearest);
        assert!(!controls.is_frozen());
        controls.apply(InputKind::Freeze, Edge::Rising);
        assert!(controls.is_frozen());
        assert_eq!(controls.interpolation(), Interpolation::Nearest, "freeze leaves the mode alone");
        controls.apply(InputKind::Freeze, Edge::Falling);
        assert!(!controls.is_frozen());
    }

    #[test]
    fn test_frame_rate_tick_snapshots_and_resets() {
        let rate = FrameRate::new();
        assert_eq!(rate.fps(), 0);

        for _ in 0..31 {
            rate.record_frame();
        }
        assert_eq!(rate.fps(), 0, "nothing published before the first tick");
        assert_eq!(rate.tick(), 31);
        assert_eq!(rate.fps(), 31);

        rate.record_frame();
        assert_eq!(rate.fps(), 31, "snapshot holds until the next tick");
        assert_eq!(rate.tick(), 1);
        assert_eq!(rate.fps(), 1);

        assert_eq!(rate.tick(), 0);
        assert_eq!(rate.fps(), 0);
    }
}
