//! Gradient anchor colors and overlay colors.
//!
//! Anchors are defined as 8-bit-per-channel [`Rgb888`] so the gradient is
//! interpolated at full precision. The finished palette is converted once to
//! the display's native [`Rgb565`] (5 bits red, 6 bits green, 5 bits blue).
//!
//! The heat map is inspired by
//! <http://www.andrewnoske.com/wiki/Code_-_heatmaps_and_color_gradients>.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

// =============================================================================
// Overlay Colors
// =============================================================================

/// Background of the stats strip.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Label text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Anchor Colors
// =============================================================================

pub const ANCHOR_BLACK: Rgb888 = Rgb888::new(0, 0, 0);
pub const ANCHOR_RED: Rgb888 = Rgb888::new(255, 38, 0);
pub const ANCHOR_YELLOW: Rgb888 = Rgb888::new(255, 255, 0);
pub const ANCHOR_GREEN: Rgb888 = Rgb888::new(0, 249, 0);
pub const ANCHOR_BLUE: Rgb888 = Rgb888::new(4, 51, 255);
pub const ANCHOR_ORANGE: Rgb888 = Rgb888::new(255, 147, 0);
pub const ANCHOR_CYAN: Rgb888 = Rgb888::new(0, 253, 255);
pub const ANCHOR_PURPLE: Rgb888 = Rgb888::new(148, 33, 146);
pub const ANCHOR_WHITE: Rgb888 = Rgb888::new(255, 255, 255);

// =============================================================================
// Gradients
// =============================================================================

/// Black through the rainbow to white. Cold objects fade into the background.
pub const HEAT: [Rgb888; 7] = [
    ANCHOR_BLACK,
    ANCHOR_BLUE,
    ANCHOR_CYAN,
    ANCHOR_GREEN,
    ANCHOR_YELLOW,
    ANCHOR_RED,
    ANCHOR_WHITE,
];

/// Rainbow without the black/white ends. Slightly more contrast in the middle.
pub const RAINBOW: [Rgb888; 5] = [ANCHOR_BLUE, ANCHOR_CYAN, ANCHOR_GREEN, ANCHOR_YELLOW, ANCHOR_RED];

/// Two-color blue → red ramp.
pub const BLUE_RED: [Rgb888; 2] = [ANCHOR_BLUE, ANCHOR_RED];

/// Two-color purple → orange ramp.
pub const VIOLET_ORANGE: [Rgb888; 2] = [ANCHOR_PURPLE, ANCHOR_ORANGE];

/// Plain intensity ramp.
pub const GRAYSCALE: [Rgb888; 2] = [ANCHOR_BLACK, ANCHOR_WHITE];

/// Gradient compiled into the firmware. There is no run-time palette switch.
pub const ACTIVE_GRADIENT: &[Rgb888] = &HEAT;

const _: () = assert!(ACTIVE_GRADIENT.len() >= 2);
