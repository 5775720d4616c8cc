//! Everything on screen that is not the thermal image.
//!
//! ```text
//!   y = 0    ┌────────────────────────┐
//!            │      thermal image     │  GRAPH_HEIGHT
//!   y = 96   ├────────────────────────┤
//!            │ 20      31 fps      30 │  STATS_HEIGHT, redrawn every frame
//!   y = 112  ├────────────────────────┤
//!            │ ▁▂▃▄▅▆▇ palette legend │  LEGEND_HEIGHT, drawn once
//!   y = 128  └────────────────────────┘
//! ```

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::BLACK;
use crate::config::{GRAPH_HEIGHT, LEGEND_HEIGHT, LEGEND_Y, PALETTE_SIZE, SCREEN_WIDTH, STATS_HEIGHT};
use crate::palette::Palette;
use crate::styles::{STATS_STYLE, TOP_LEFT};

/// Vertical offset of the labels inside the stats strip.
const TEXT_OFFSET: i32 = 4;

/// Horizontal gap between the labels and the screen edges.
const EDGE_MARGIN: i32 = 1;

/// Capacity of a temperature label.
const TEMP_LABEL_LEN: usize = 8;

/// Capacity of the fps label ("4294967295 fps").
const FPS_LABEL_LEN: usize = 16;

// =============================================================================
// Labels
// =============================================================================

/// Formatted text for the stats strip.
pub struct StatsLabels {
    pub min: String<TEMP_LABEL_LEN>,
    pub fps: String<FPS_LABEL_LEN>,
    pub max: String<TEMP_LABEL_LEN>,
}

impl StatsLabels {
    /// Format whole-degree bounds and the frame rate.
    ///
    /// A temperature too wide for its label (only possible for garbage
    /// readings) is shown as `--`.
    pub fn new(
        min: f32,
        max: f32,
        fps: u32,
    ) -> Self {
        let mut fps_label = String::new();
        write!(fps_label, "{fps} fps").ok();
        Self {
            min: temperature_label(min),
            fps: fps_label,
            max: temperature_label(max),
        }
    }
}

fn temperature_label(value: f32) -> String<TEMP_LABEL_LEN> {
    let mut label = String::new();
    if write!(label, "{value:.0}").is_err() {
        label.clear();
        label.push_str("--").ok();
    }
    label
}

// =============================================================================
// Drawing
// =============================================================================

/// Draw the palette legend strip along the bottom edge.
///
/// Column `x` shows palette entry `x * PALETTE_SIZE / SCREEN_WIDTH`.
pub fn draw_legend<D>(
    display: &mut D,
    palette: &Palette,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let size = Size::new(1, LEGEND_HEIGHT);
    for x in 0..SCREEN_WIDTH {
        let index = (x as usize * PALETTE_SIZE / SCREEN_WIDTH as usize) as u8;
        let column = Rectangle::new(Point::new(x as i32, LEGEND_Y as i32), size);
        display.fill_solid(&column, palette.color(index))?;
    }
    Ok(())
}

/// Clear the stats strip and draw min (left), fps (centered) and max (right).
pub fn draw_stats<D>(
    display: &mut D,
    labels: &StatsLabels,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let strip = Rectangle::new(Point::new(0, GRAPH_HEIGHT as i32), Size::new(SCREEN_WIDTH, STATS_HEIGHT));
    display.fill_solid(&strip, BLACK)?;

    let y = GRAPH_HEIGHT as i32 + TEXT_OFFSET;
    let screen = SCREEN_WIDTH as i32;
    let min = Text::with_text_style(&labels.min, Point::new(EDGE_MARGIN, y), STATS_STYLE, TOP_LEFT);
    let fps = Text::with_text_style(&labels.fps, Point::new(0, y), STATS_STYLE, TOP_LEFT);
    let max = Text::with_text_style(&labels.max, Point::new(0, y), STATS_STYLE, TOP_LEFT);

    let fps_x = (screen - fps.bounding_box().size.width as i32) / 2;
    let max_x = screen - EDGE_MARGIN - max.bounding_box().size.width as i32;

    min.draw(display)?;
    fps.translate(Point::new(fps_x, 0)).draw(display)?;
    max.translate(Point::new(max_x, 0)).draw(display)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::ContainsPoint;

    use super::*;
    use crate::colors::{HEAT, WHITE};
    use crate::config::{LEGEND_Y, SCREEN_HEIGHT};
    use crate::testing::TestCanvas;

    fn strip() -> Rectangle { Rectangle::new(Point::new(0, GRAPH_HEIGHT as i32), Size::new(SCREEN_WIDTH, STATS_HEIGHT)) }

    /// Box covered by `text` drawn from `x` in the stats row.
    fn label_box(
        text: &str,
        x: i32,
    ) -> Rectangle {
        Text::with_text_style(text, Point::new(x, GRAPH_HEIGHT as i32 + TEXT_OFFSET), STATS_STYLE, TOP_LEFT).bounding_box()
    }

    fn label_width(text: &str) -> i32 { label_box(text, 0).size.width as i32 }

    #[test]
    fn test_labels_round_to_whole_degrees() {
        let labels = StatsLabels::new(20.0, 30.0, 31);
        assert_eq!(labels.min.as_str(), "20");
        assert_eq!(labels.max.as_str(), "30");
        assert_eq!(labels.fps.as_str(), "31 fps");

        let labels = StatsLabels::new(-4.2, 36.7, 0);
        assert_eq!(labels.min.as_str(), "-4");
        assert_eq!(labels.max.as_str(), "37");
        assert_eq!(labels.fps.as_str(), "0 fps");
    }

    #[test]
    fn test_oversized_temperature_label() {
        let labels = StatsLabels::new(-1.0e12, f32::MAX, u32::MAX);
        assert_eq!(labels.min.as_str(), "--");
        assert_eq!(labels.max.as_str(), "--");
        assert_eq!(labels.fps.as_str(), "4294967295 fps");
    }

    #[test]
    fn test_legend_columns() {
        let palette = Palette::new(&HEAT);
        let mut canvas = TestCanvas::new();
        draw_legend(&mut canvas, &palette).ok();

        assert_eq!(canvas.fill_calls, SCREEN_WIDTH as usize);
        for y in LEGEND_Y as i32..SCREEN_HEIGHT as i32 {
            assert_eq!(canvas.pixel(0, y), Some(palette.color(0)));
            assert_eq!(canvas.pixel(64, y), Some(palette.color(128)));
            assert_eq!(canvas.pixel(127, y), Some(palette.color(254)));
        }
        assert_eq!(canvas.pixel(0, LEGEND_Y as i32 - 1), None, "legend stays below the stats strip");
        assert_eq!(canvas.out_of_bounds, 0);
    }

    #[test]
    fn test_stats_strip_is_cleared_and_labelled() {
        let marker = Rgb565::new(31, 0, 0);
        let mut canvas = TestCanvas::new();
        canvas.fill_solid(&strip(), marker).ok();

        draw_stats(&mut canvas, &StatsLabels::new(20.0, 30.0, 31)).ok();

        assert!(!canvas.any_in(&strip(), marker), "strip fully repainted");
        assert!(canvas.any_in(&strip(), WHITE), "labels drawn");
        assert_eq!(canvas.out_of_bounds, 0);

        // Image area untouched
        assert_eq!(canvas.pixel(0, GRAPH_HEIGHT as i32 - 1), None);
    }

    #[test]
    fn test_label_placement() {
        let mut canvas = TestCanvas::new();
        draw_stats(&mut canvas, &StatsLabels::new(20.0, 30.0, 31)).ok();

        let max_label = label_width("30");
        let left = Rectangle::new(Point::new(0, GRAPH_HEIGHT as i32), Size::new(16, STATS_HEIGHT));
        let right_x = SCREEN_WIDTH as i32 - max_label - 1;
        let right = Rectangle::new(
            Point::new(right_x, GRAPH_HEIGHT as i32),
            Size::new(max_label as u32, STATS_HEIGHT),
        );
        assert!(canvas.any_in(&left, WHITE), "min label on the left");
        assert!(canvas.any_in(&right, WHITE), "max label on the right");

        // One-pixel margin on both edges and above the text
        for y in GRAPH_HEIGHT as i32..(GRAPH_HEIGHT + STATS_HEIGHT) as i32 {
            assert_eq!(canvas.pixel(0, y), Some(BLACK));
            assert_eq!(canvas.pixel(SCREEN_WIDTH as i32 - 1, y), Some(BLACK));
        }
        for x in 0..SCREEN_WIDTH as i32 {
            assert_eq!(canvas.pixel(x, GRAPH_HEIGHT as i32), Some(BLACK));
        }
    }

    #[test]
    fn test_labels_stay_inside_measured_boxes() {
        let labels = StatsLabels::new(-40.0, 125.0, u32::MAX);
        let mut canvas = TestCanvas::new();
        draw_stats(&mut canvas, &labels).ok();

        let screen = SCREEN_WIDTH as i32;
        let fps_x = (screen - label_width(&labels.fps)) / 2;
        let boxes = [
            label_box(&labels.min, EDGE_MARGIN),
            label_box(&labels.fps, fps_x),
            label_box(&labels.max, screen - EDGE_MARGIN - label_width(&labels.max)),
        ];

        // Max ends one pixel short of the edge, fps is centered to the pixel
        let max_box = boxes[2];
        assert_eq!(max_box.top_left.x + max_box.size.width as i32, screen - EDGE_MARGIN);
        let fps_right_gap = screen - fps_x - label_width(&labels.fps);
        assert!((fps_x - fps_right_gap).abs() <= 1);

        // Even the widest fps label leaves the temperatures clear
        assert!(boxes[0].intersection(&boxes[1]).is_zero_sized());
        assert!(boxes[1].intersection(&boxes[2]).is_zero_sized());

        let mut inked = 0;
        for point in strip().points() {
            if canvas.pixel(point.x, point.y) == Some(WHITE) {
                inked += 1;
                assert!(boxes.iter().any(|b| b.contains(point)), "stray ink at {point:?}");
            }
        }
        assert!(inked > 0);
    }
}
