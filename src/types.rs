//! Geometry and color primitives shared by layout and paint.
//!
//! Layout works in whole pixels (`Extent`, `Offset`); painting works in
//! floating point (`PaintPoint`, `PaintRect`) so strokes can sit on half
//! pixels.

use std::fmt;

use glam::{DVec2, IVec2};

/// Offset of a child's top-left corner relative to its parent's top-left corner.
pub type Offset = IVec2;

/// Absolute position on the paint surface.
pub type PaintPoint = DVec2;

/// Round `value / 2` to the nearest integer, halves away from zero.
///
/// Composite nodes use this to center their cross-axis baseline.
#[inline]
pub fn half_round(value: i32) -> i32 {
    value / 2 + value % 2
}

/// Box of a measured node: size plus the two alignment baselines.
///
/// ```text
///        vert_baseline
///      |<---->|
///      +------:--------+  ---
///      |      :        |   ^ horz_baseline
///      |......:........|  ---
///      |      :        |
///      +------:--------+
///      |<------------->| width
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: i32,
    pub height: i32,
    /// Distance from the top edge to the line side-by-side siblings align on.
    pub horz_baseline: i32,
    /// Distance from the left edge to the line stacked siblings align on.
    pub vert_baseline: i32,
}

impl Extent {
    pub const ZERO: Extent = Extent {
        width: 0,
        height: 0,
        horz_baseline: 0,
        vert_baseline: 0,
    };

    pub const fn new(width: i32, height: i32, horz_baseline: i32, vert_baseline: i32) -> Self {
        Self {
            width,
            height,
            horz_baseline,
            vert_baseline,
        }
    }

    /// A box of the given size whose baselines run through its middle.
    pub fn centered(width: i32, height: i32) -> Self {
        Self::new(width, height, half_round(height), half_round(width))
    }

    /// Grow the box by `margin` on every side, shifting both baselines with it.
    ///
    /// Sizes saturate at `i32::MAX`.
    pub fn inflate(self, margin: i32) -> Self {
        let both = margin.saturating_mul(2);
        Self {
            width: self.width.saturating_add(both),
            height: self.height.saturating_add(both),
            horz_baseline: self.horz_baseline.saturating_add(margin),
            vert_baseline: self.vert_baseline.saturating_add(margin),
        }
    }

    /// Whether both baselines fall inside the box.
    pub fn is_well_formed(&self) -> bool {
        self.width >= 0
            && self.height >= 0
            && (0..=self.height).contains(&self.horz_baseline)
            && (0..=self.width).contains(&self.vert_baseline)
    }

    /// The paint-space rectangle this box covers when its top-left sits at `origin`.
    pub fn rect_at(&self, origin: PaintPoint) -> PaintRect {
        PaintRect::new(origin, DVec2::new(self.width as f64, self.height as f64))
    }
}

/// Axis-aligned rectangle in paint space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintRect {
    pub origin: PaintPoint,
    pub size: DVec2,
}

impl PaintRect {
    pub fn new(origin: PaintPoint, size: DVec2) -> Self {
        Self { origin, size }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(width, height))
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }
}

/// Color with red, green, blue and alpha channels, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Build an opaque color from 8-bit channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
            1.0,
        )
    }

    /// Whether every channel lies in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        [self.red, self.green, self.blue, self.alpha]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

/// CSS form: `rgba(R%,G%,B%,A)`.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}%,{}%,{}%,{})",
            self.red * 100.0,
            self.green * 100.0,
            self.blue * 100.0,
            self.alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_round_rounds_halves_away_from_zero() {
        assert_eq!(half_round(0), 0);
        assert_eq!(half_round(1), 1);
        assert_eq!(half_round(34), 17);
        assert_eq!(half_round(35), 18);
        assert_eq!(half_round(-3), -2);
        assert_eq!(half_round(i32::MAX), 1 << 30);
    }

    #[test]
    fn inflate_moves_baselines_with_margin() {
        let e = Extent::new(10, 20, 8, 4).inflate(5);
        assert_eq!(e, Extent::new(20, 30, 13, 9));
    }

    #[test]
    fn centered_extent_is_well_formed() {
        let e = Extent::centered(7, 9);
        assert_eq!(e.horz_baseline, 5);
        assert_eq!(e.vert_baseline, 4);
        assert!(e.is_well_formed());
    }

    #[test]
    fn baseline_outside_box_is_not_well_formed() {
        assert!(!Extent::new(10, 10, 11, 0).is_well_formed());
        assert!(!Extent::new(10, 10, 0, -1).is_well_formed());
    }

    #[test]
    fn rgba_css_uses_percent_channels() {
        let c = Rgba::new(1.0, 0.5, 0.0, 0.25);
        assert_eq!(c.to_string(), "rgba(100%,50%,0%,0.25)");
    }

    #[test]
    fn rgba_validity() {
        assert!(Rgba::BLACK.is_valid());
        assert!(!Rgba::new(1.5, 0.0, 0.0, 1.0).is_valid());
    }
}
