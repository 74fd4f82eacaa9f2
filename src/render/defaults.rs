//! Default sizes, margins and colors (all in pixels)

use crate::types::Rgba;

/// Gap between consecutive children of an array.
pub const ARRAY_GAP: i32 = 5;
/// Margin a crossed-out node leaves around its child.
pub const CROSSED_OUT_MARGIN: i32 = 2;
/// Margin a metrics frame leaves around its child; also the tick length.
pub const METRICS_MARGIN: i32 = 5;
/// Horizontal room reserved on each side for a parenthesis glyph.
pub const PARENTHESES_MARGIN: i32 = 4;
/// Margin between a key border and its label.
pub const KEY_MARGIN: i32 = 5;
pub const KEY_CORNER_RADIUS: f64 = 2.0;
pub const KEY_FONT_NAME: &str = "Arial";
pub const KEY_FONT_SIZE_DELTA: f64 = -2.0;

/// Gap on both sides of an infix operator.
pub const INFIX_GAP: i32 = 5;
/// Gap on both sides of an argument separator.
pub const COMMA_GAP: i32 = 2;
/// Gap between a function name and its parenthesized arguments.
pub const CALL_GAP: i32 = 2;

pub const FONT_NAME: &str = "Times New Roman";
pub const FONT_SIZE: f64 = 14.0;
/// Relative size changes never shrink a font below this.
pub const MIN_FONT_SIZE: f64 = 1.0;
/// Smallest size offered by the font-size form.
pub const MIN_FORM_FONT_SIZE: i64 = 6;

pub const METRICS_COLOR: Rgba = Rgba::new(127.0 / 255.0, 127.0 / 255.0, 127.0 / 255.0, 1.0);
pub const SELECTION_COLOR: Rgba = Rgba::new(211.0 / 255.0, 211.0 / 255.0, 211.0 / 255.0, 1.0);
pub const PLACEHOLDER_COLOR: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

/// Largest width, height or baseline a Rectangle accepts.
pub const MAX_PIXEL_SIZE: i32 = 1 << 20;

/// Margin the SVG surface leaves around the root node.
pub const MARGIN: i32 = 4;
