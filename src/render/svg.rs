//! SVG generation

use glam::DVec2;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::context::FontInfo;
use super::surface::Surface;
use crate::errors::SvgError;
use crate::types::{Extent, PaintPoint, PaintRect, Rgba};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Proportional character widths in hundredths of an em-ish unit, indexed
/// from `' '` to `'~'`.
#[rustfmt::skip]
const CHAR_WIDTHS: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Width of a character outside the table.
const WIDE_CHAR: u32 = 100;
/// Ratio between a table unit sum of 100 and the font size.
const ADVANCE_PER_EM: f64 = 0.08 / 0.14;
/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;
/// Fraction of the line height above the alphabetic baseline.
const ASCENT: f64 = 0.85;
const BOLD_WIDENING: f64 = 1.1;

/// Sum of the character widths of `text`.
pub fn text_units(text: &str) -> u32 {
    text.chars()
        .map(|c| {
            if (' '..='~').contains(&c) {
                CHAR_WIDTHS[(c as usize) - 0x20] as u32
            } else {
                WIDE_CHAR
            }
        })
        .sum()
}

/// Surface that accumulates SVG elements
pub struct SvgSurface {
    writer: Writer<Vec<u8>>,
    error: Option<SvgError>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
            error: None,
        }
    }

    /// Wrap the painted elements in an `<svg>` root sized to `extent` plus `margin`.
    ///
    /// Fails with the first write error met while painting, if any.
    pub fn finish(self, extent: Extent, margin: i32, background: Option<Rgba>) -> Result<String, SvgError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let body = self.writer.into_inner();
        let margins = margin.saturating_mul(2);
        let width = extent.width.saturating_add(margins).to_string();
        let height = extent.height.saturating_add(margins).to_string();
        let view_box = format!("0 0 {width} {height}");

        let mut root = SvgSurface::new();
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NAMESPACE));
        svg.push_attribute(("viewBox", view_box.as_str()));
        svg.push_attribute(("width", width.as_str()));
        svg.push_attribute(("height", height.as_str()));
        root.emit(Event::Start(svg));
        if let Some(bg) = background {
            let fill = bg.to_string();
            root.element(
                "rect",
                &[
                    ("x", "0"),
                    ("y", "0"),
                    ("width", width.as_str()),
                    ("height", height.as_str()),
                    ("fill", fill.as_str()),
                ],
            );
        }
        root.writer.get_mut().extend_from_slice(&body);
        root.emit(Event::End(BytesEnd::new("svg")));

        if let Some(error) = root.error {
            return Err(error);
        }
        String::from_utf8(root.writer.into_inner()).map_err(|source| SvgError::Write {
            source: source.into(),
        })
    }

    /// Write one event, keeping only the first failure.
    fn emit(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(source) = self.writer.write_event(event) {
            self.error = Some(SvgError::Write {
                source: source.into(),
            });
        }
    }

    fn element(&mut self, name: &str, attributes: &[(&str, &str)]) {
        let mut start = BytesStart::new(name);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.emit(Event::Empty(start));
    }

    fn rect(&mut self, rect: &PaintRect, paint: &[(&str, &str)]) {
        let (x, y) = (fmt_num(rect.x()), fmt_num(rect.y()));
        let (width, height) = (fmt_num(rect.width()), fmt_num(rect.height()));
        let mut attributes = vec![
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
        ];
        attributes.extend_from_slice(paint);
        self.element("rect", &attributes);
    }

    fn stroke_path(&mut self, data: &str, color: Rgba) {
        let stroke = color.to_string();
        self.element("path", &[("d", data), ("fill", "none"), ("stroke", stroke.as_str())]);
    }
}

fn round_rect_path(rect: &PaintRect, radius: f64) -> String {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
    format!(
        "M{},{}L{},{}Q{},{} {},{}L{},{}Q{},{} {},{}L{},{}Q{},{} {},{}L{},{}Q{},{} {},{}Z",
        fmt_num(x + r), fmt_num(y),
        fmt_num(x + w - r), fmt_num(y),
        fmt_num(x + w), fmt_num(y), fmt_num(x + w), fmt_num(y + r),
        fmt_num(x + w), fmt_num(y + h - r),
        fmt_num(x + w), fmt_num(y + h), fmt_num(x + w - r), fmt_num(y + h),
        fmt_num(x + r), fmt_num(y + h),
        fmt_num(x), fmt_num(y + h), fmt_num(x), fmt_num(y + h - r),
        fmt_num(x), fmt_num(y + r),
        fmt_num(x), fmt_num(y), fmt_num(x + r), fmt_num(y),
    )
}

impl Surface for SvgSurface {
    fn text_size(&mut self, font: &FontInfo, text: &str) -> DVec2 {
        let mut width = text_units(text) as f64 * 0.01 * font.size * ADVANCE_PER_EM;
        if font.bold {
            width *= BOLD_WIDENING;
        }
        DVec2::new(width, font.size * LINE_HEIGHT)
    }

    fn fill_rect(&mut self, rect: PaintRect, color: Rgba) {
        let fill = color.to_string();
        self.rect(&rect, &[("fill", fill.as_str())]);
    }

    fn stroke_rect(&mut self, rect: PaintRect, color: Rgba) {
        let stroke = color.to_string();
        self.rect(&rect, &[("fill", "none"), ("stroke", stroke.as_str())]);
    }

    fn stroke_lines(&mut self, segments: &[(PaintPoint, PaintPoint)], color: Rgba) {
        if segments.is_empty() {
            return;
        }
        let data: String = segments
            .iter()
            .map(|(from, to)| {
                format!(
                    "M{},{}L{},{}",
                    fmt_num(from.x),
                    fmt_num(from.y),
                    fmt_num(to.x),
                    fmt_num(to.y)
                )
            })
            .collect();
        self.stroke_path(&data, color);
    }

    fn stroke_round_rects(&mut self, rects: &[PaintRect], radius: f64, color: Rgba) {
        if rects.is_empty() {
            return;
        }
        let data: String = rects.iter().map(|rect| round_rect_path(rect, radius)).collect();
        self.stroke_path(&data, color);
    }

    fn stroke_curve(&mut self, from: PaintPoint, control: PaintPoint, to: PaintPoint, color: Rgba) {
        let data = format!(
            "M{},{}Q{},{} {},{}",
            fmt_num(from.x),
            fmt_num(from.y),
            fmt_num(control.x),
            fmt_num(control.y),
            fmt_num(to.x),
            fmt_num(to.y)
        );
        self.stroke_path(&data, color);
    }

    fn fill_text(&mut self, text: &str, origin: PaintPoint, font: &FontInfo, color: Rgba) {
        let baseline = origin.y + font.size * LINE_HEIGHT * ASCENT;
        let mut start = BytesStart::new("text");
        start.push_attribute(("x", fmt_num(origin.x).as_str()));
        start.push_attribute(("y", fmt_num(baseline).as_str()));
        start.push_attribute(("font-family", font.name.as_str()));
        start.push_attribute(("font-size", fmt_num(font.size).as_str()));
        if font.bold {
            start.push_attribute(("font-weight", "bold"));
        }
        if font.italic {
            start.push_attribute(("font-style", "italic"));
        }
        start.push_attribute(("fill", color.to_string().as_str()));

        self.emit(Event::Start(start));
        self.emit(Event::Text(BytesText::new(text)));
        self.emit(Event::End(BytesEnd::new("text")));
    }
}

/// Format a coordinate with at most three decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{:.3}", rounded);
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}
