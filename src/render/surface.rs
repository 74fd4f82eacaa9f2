//! Paint surfaces
//!
//! A [`Surface`] supplies text metrics during measure and receives drawing
//! primitives during paint. [`DisplayList`] records the primitives in order.

use std::fmt;

use glam::DVec2;

use super::context::FontInfo;
use crate::types::{PaintPoint, PaintRect, Rgba};

/// Drawing primitives a host must provide
pub trait Surface {
    /// Width and height of `text` set in `font`.
    fn text_size(&mut self, font: &FontInfo, text: &str) -> DVec2;

    fn fill_rect(&mut self, rect: PaintRect, color: Rgba);

    fn stroke_rect(&mut self, rect: PaintRect, color: Rgba);

    /// Stroke independent line segments as one path.
    fn stroke_lines(&mut self, segments: &[(PaintPoint, PaintPoint)], color: Rgba);

    /// Stroke rounded rectangles as one path.
    fn stroke_round_rects(&mut self, rects: &[PaintRect], radius: f64, color: Rgba);

    /// Stroke a quadratic curve.
    fn stroke_curve(&mut self, from: PaintPoint, control: PaintPoint, to: PaintPoint, color: Rgba);

    /// Draw `text` with its top-left corner at `origin`.
    fn fill_text(&mut self, text: &str, origin: PaintPoint, font: &FontInfo, color: Rgba);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: PaintRect,
        color: Rgba,
    },
    StrokeRect {
        rect: PaintRect,
        color: Rgba,
    },
    Lines {
        segments: Vec<(PaintPoint, PaintPoint)>,
        color: Rgba,
    },
    RoundRects {
        rects: Vec<PaintRect>,
        radius: f64,
        color: Rgba,
    },
    Curve {
        from: PaintPoint,
        control: PaintPoint,
        to: PaintPoint,
        color: Rgba,
    },
    Text {
        text: String,
        origin: PaintPoint,
        font: FontInfo,
        color: Rgba,
    },
}

/// Surface that records every primitive.
///
/// Text metrics are fixed-pitch: each character advances half the font size
/// and a line is exactly one font size tall.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Recorded text runs, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &FontInfo)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, font, .. } => Some((text.as_str(), font)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn text_size(&mut self, font: &FontInfo, text: &str) -> DVec2 {
        let chars = text.chars().count() as f64;
        DVec2::new(chars * font.size / 2.0, font.size)
    }

    fn fill_rect(&mut self, rect: PaintRect, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: PaintRect, color: Rgba) {
        self.ops.push(DrawOp::StrokeRect { rect, color });
    }

    fn stroke_lines(&mut self, segments: &[(PaintPoint, PaintPoint)], color: Rgba) {
        self.ops.push(DrawOp::Lines {
            segments: segments.to_vec(),
            color,
        });
    }

    fn stroke_round_rects(&mut self, rects: &[PaintRect], radius: f64, color: Rgba) {
        self.ops.push(DrawOp::RoundRects {
            rects: rects.to_vec(),
            radius,
            color,
        });
    }

    fn stroke_curve(&mut self, from: PaintPoint, control: PaintPoint, to: PaintPoint, color: Rgba) {
        self.ops.push(DrawOp::Curve {
            from,
            control,
            to,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, origin: PaintPoint, font: &FontInfo, color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
        });
    }
}

struct Pt(PaintPoint);

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.x, self.0.y)
    }
}

struct Area(PaintRect);

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", Pt(self.0.origin), self.0.width(), self.0.height())
    }
}

/// One line per primitive, for snapshots and debugging.
impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::FillRect { rect, color } => write!(f, "fill-rect {} {}", Area(*rect), color),
            DrawOp::StrokeRect { rect, color } => write!(f, "stroke-rect {} {}", Area(*rect), color),
            DrawOp::Lines { segments, color } => {
                write!(f, "lines")?;
                for (a, b) in segments {
                    write!(f, " {}-{}", Pt(*a), Pt(*b))?;
                }
                write!(f, " {}", color)
            }
            DrawOp::RoundRects { rects, radius, color } => {
                write!(f, "round-rects r={}", radius)?;
                for rect in rects {
                    write!(f, " [{}]", Area(*rect))?;
                }
                write!(f, " {}", color)
            }
            DrawOp::Curve {
                from,
                control,
                to,
                color,
            } => write!(f, "curve {} {} {} {}", Pt(*from), Pt(*control), Pt(*to), color),
            DrawOp::Text {
                text,
                origin,
                font,
                color,
            } => {
                write!(f, "text {:?} {} {} {}", text, Pt(*origin), font.name, font.size)?;
                if font.bold {
                    write!(f, " bold")?;
                }
                if font.italic {
                    write!(f, " italic")?;
                }
                write!(f, " {}", color)
            }
        }
    }
}

impl fmt::Display for DisplayList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            writeln!(f, "{}", op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pitch_metrics() {
        let mut list = DisplayList::new();
        let size = list.text_size(&FontInfo::new("Arial", 10.0), "abc");
        assert_eq!(size, DVec2::new(15.0, 10.0));
    }

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new();
        list.fill_rect(PaintRect::from_xywh(0.0, 0.0, 2.0, 3.0), Rgba::BLACK);
        list.stroke_lines(&[(DVec2::ZERO, DVec2::new(1.0, 1.0))], Rgba::WHITE);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.to_string(),
            "fill-rect 0,0 2x3 rgba(0%,0%,0%,1)\nlines 0,0-1,1 rgba(100%,100%,100%,1)\n"
        );
    }
}
