//! Debounced edge detection for the two touch buttons.
//!
//! The touch sensors drive their output high while touched. Edges reach the
//! firmware as GPIO interrupts and the simulator as key events. Both feed the
//! raw level through an [`EdgeDetector`], which filters contact chatter and
//! reports the transitions that [`Controls::apply`](crate::controls::Controls::apply) acts on.
//!
//! Timestamps are passed in by the caller, so this module has no clock
//! dependency.

use crate::config::DEBOUNCE_MS;

/// Level transition of a button input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Input went high (button touched).
    Rising,
    /// Input went low (button released).
    Falling,
}

/// Which button an edge came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputKind {
    /// Held: nearest-neighbor instead of bilinear.
    Interpolation,
    /// Held: keep showing the current image.
    Freeze,
}

/// Level tracker with time-based debounce.
pub struct EdgeDetector {
    level: bool,
    last_change_ms: Option<u64>,
}

impl EdgeDetector {
    /// Create a detector for an input that idles low.
    pub const fn new() -> Self {
        Self {
            level: false,
            last_change_ms: None,
        }
    }

    /// Feed the current input level.
    ///
    /// Returns the edge if the level changed and the previous accepted change
    /// was at least [`DEBOUNCE_MS`] ago. A change inside the debounce window
    /// is ignored, and a later reading at the new level will report it.
    pub fn update(
        &mut self,
        level: bool,
        now_ms: u64,
    ) -> Option<Edge> {
        if level == self.level {
            return None;
        }

        if let Some(last) = self.last_change_ms
            && now_ms.saturating_sub(last) < DEBOUNCE_MS
        {
            return None;
        }

        self.level = level;
        self.last_change_ms = Some(now_ms);
        Some(if level { Edge::Rising } else { Edge::Falling })
    }

    /// Last accepted level.
    #[inline]
    pub const fn level(&self) -> bool { self.level }

    /// Level the next reported edge moves to.
    ///
    /// Waiting for the input to reach this level (rather than for a pin edge)
    /// cannot miss a transition that happened while the previous reading was
    /// being processed: if the input is already there, the wait ends at once.
    #[inline]
    pub const fn awaited_level(&self) -> bool { !self.level }
}

impl Default for EdgeDetector {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(false, 0), None);
        assert_eq!(detector.update(true, 10), Some(Edge::Rising));
        assert!(detector.level());
        assert_eq!(detector.update(true, 20), None);
        assert_eq!(detector.update(false, 200), Some(Edge::Falling));
        assert!(!detector.level());
    }

    #[test]
    fn test_bounce_is_filtered() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(true, 1000), Some(Edge::Rising));
        // Contact chatter inside the window
        assert_eq!(detector.update(false, 1005), None);
        assert_eq!(detector.update(true, 1010), None);
        assert_eq!(detector.update(false, 1000 + DEBOUNCE_MS - 1), None);
        assert!(detector.level());
        // Settled low after the window
        assert_eq!(detector.update(false, 1000 + DEBOUNCE_MS), Some(Edge::Falling));
    }

    #[test]
    fn test_awaited_level_follows_accepted_edges() {
        let mut detector = EdgeDetector::new();
        assert!(detector.awaited_level(), "idle low, waiting for a touch");

        // After an accepted touch the release is awaited
        assert_eq!(detector.update(true, 0), Some(Edge::Rising));
        assert!(!detector.awaited_level());

        // A rejected bounce leaves the awaited level unchanged, so the settled
        // reading after the window still reports the release
        assert_eq!(detector.update(false, DEBOUNCE_MS - 1), None);
        assert!(!detector.awaited_level());
        assert_eq!(detector.update(false, DEBOUNCE_MS), Some(Edge::Falling));
        assert!(detector.awaited_level());
    }

    #[test]
    fn test_first_edge_is_never_debounced() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(true, 0), Some(Edge::Rising));
    }
}
