//! Keyboard stand-ins for the two touch buttons.
//!
//! Key events only record whether a key is held. [`Buttons::sync`] then feeds
//! the held state through the same [`EdgeDetector`] the firmware uses, once per
//! render cycle, so a change the debounce window rejected is picked up by a
//! later sync.

use thermocam_common::Controls;
use thermocam_common::input::{EdgeDetector, InputKind};
use tracing::info;

struct Button {
    kind: InputKind,
    held: bool,
    detector: EdgeDetector,
}

impl Button {
    const fn new(kind: InputKind) -> Self {
        Self {
            kind,
            held: false,
            detector: EdgeDetector::new(),
        }
    }
}

/// Held state and debounce for both buttons.
pub struct Buttons {
    buttons: [Button; 2],
}

impl Buttons {
    pub const fn new() -> Self {
        Self {
            buttons: [Button::new(InputKind::Interpolation), Button::new(InputKind::Freeze)],
        }
    }

    /// Record a key going down (`true`) or up (`false`).
    pub fn set_held(
        &mut self,
        kind: InputKind,
        held: bool,
    ) {
        if let Some(button) = self.buttons.iter_mut().find(|b| b.kind == kind) {
            button.held = held;
        }
    }

    /// Apply any debounced edges to `controls`.
    pub fn sync(
        &mut self,
        now_ms: u64,
        controls: &Controls,
    ) {
        for button in &mut self.buttons {
            if let Some(edge) = button.detector.update(button.held, now_ms) {
                controls.apply(button.kind, edge);
                info!(button = ?button.kind, ?edge, mode = ?controls.interpolation(), frozen = controls.is_frozen(), "button edge");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use thermocam_common::Interpolation;
    use thermocam_common::config::DEBOUNCE_MS;

    use super::*;

    #[test]
    fn test_held_key_maps_to_controls() {
        let controls = Controls::new(Interpolation::Bilinear);
        let mut buttons = Buttons::new();

        buttons.set_held(InputKind::Interpolation, true);
        buttons.sync(0, &controls);
        assert_eq!(controls.interpolation(), Interpolation::Nearest);

        buttons.set_held(InputKind::Interpolation, false);
        buttons.sync(DEBOUNCE_MS, &controls);
        assert_eq!(controls.interpolation(), Interpolation::Bilinear);
    }

    #[test]
    fn test_quick_tap_is_applied_late() {
        let controls = Controls::new(Interpolation::Bilinear);
        let mut buttons = Buttons::new();

        buttons.set_held(InputKind::Freeze, true);
        buttons.sync(1000, &controls);
        buttons.set_held(InputKind::Freeze, false);
        buttons.sync(1010, &controls);
        assert!(controls.is_frozen(), "release inside the debounce window is held back");

        buttons.sync(1000 + DEBOUNCE_MS, &controls);
        assert!(!controls.is_frozen());
    }
}
