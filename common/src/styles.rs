//! Pre-computed static text styles for the stats strip.
//!
//! `MonoTextStyle` and `TextStyle` are `const`, so nothing is constructed per
//! frame: the render loop only formats the three numbers and draws them.
//!
//! Labels are positioned from their measured bounding box, so a single
//! left-aligned, top-baseline style covers all three.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_9_POINT;

use crate::colors::WHITE;

/// Left-aligned text hanging from its top edge.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Top).build();

/// White stats text on the black strip.
pub const STATS_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_9_POINT, WHITE);
