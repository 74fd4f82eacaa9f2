//! Measure and paint entry points
//!
//! This module is organized into submodules:
//! - `defaults`: Default margins, gaps, fonts and colors
//! - `context`: The paint context and its scoped style stack
//! - `surface`: The `Surface` trait and the recording `DisplayList`
//! - `svg`: SVG generation

pub mod context;
pub mod defaults;
pub mod surface;
pub mod svg;

// Re-export commonly used items
pub use context::{Context, FontInfo, Scoped, Style};
pub use surface::{DisplayList, DrawOp, Surface};
pub use svg::SvgSurface;

use crate::errors::SvgError;
use crate::node::{Node, Visual};
use crate::types::{Extent, PaintPoint, Rgba};

/// Settings a render starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Font in effect at the root.
    pub font: FontInfo,
    /// Room left around the root by [`render_svg`].
    pub margin: i32,
    /// Fill painted behind the whole SVG document, if any.
    pub background: Option<Rgba>,
    /// Initial fill and stroke color.
    pub foreground: Rgba,
}

impl RenderOptions {
    fn style(&self) -> Style {
        Style {
            font: self.font.clone(),
            fill: self.foreground,
            stroke: self.foreground,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font: FontInfo::default(),
            margin: defaults::MARGIN,
            background: None,
            foreground: Rgba::BLACK,
        }
    }
}

/// Measure `root` and its whole subtree against `surface`'s text metrics.
pub fn layout(root: &mut Node, surface: &mut dyn Surface, options: &RenderOptions) -> Extent {
    let mut ctx = Context::new(surface, options.style());
    root.measure(&mut ctx);
    let extent = root.extent();
    crate::log::debug!(
        tag = root.tag(),
        width = extent.width,
        height = extent.height,
        "layout done"
    );
    extent
}

/// Paint a measured `root` with its top-left corner at `origin`.
pub fn paint(root: &Node, surface: &mut dyn Surface, options: &RenderOptions, origin: PaintPoint) {
    let mut ctx = Context::new(surface, options.style());
    root.paint(&mut ctx, origin);
}

/// Measure and paint `root` into a standalone SVG document.
pub fn render_svg(root: &mut Node, options: &RenderOptions) -> Result<String, SvgError> {
    let mut svg = SvgSurface::new();
    let extent = layout(root, &mut svg, options);
    let margin = options.margin as f64;
    paint(root, &mut svg, options, PaintPoint::new(margin, margin));
    svg.finish(extent, options.margin, options.background)
}

/// Measure and paint `root` at the origin into a fresh [`DisplayList`].
pub fn render_display_list(root: &mut Node, options: &RenderOptions) -> DisplayList {
    let mut list = DisplayList::new();
    layout(root, &mut list, options);
    paint(root, &mut list, options, PaintPoint::ZERO);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Bold, Key, Symbol, Toggle};

    #[test]
    fn svg_document_covers_root_plus_margin() {
        let mut root: Node = Symbol::new("ab").into();
        let svg = render_svg(&mut root, &RenderOptions::default()).unwrap();
        let extent = root.extent();
        let (w, h) = (extent.width + 8, extent.height + 8);
        assert!(svg.contains(&format!(r#"viewBox="0 0 {w} {h}""#)));
        assert!(svg.contains(">ab</text>"));
    }

    #[test]
    fn display_list_records_styled_text() {
        let mut root: Node = Bold::new(Toggle::default(), Key::new(Symbol::new("x").into()).into()).into();
        let list = render_display_list(&mut root, &RenderOptions::default());
        let (text, font) = list.texts().next().unwrap();
        assert_eq!(text, "x");
        assert_eq!(font.name, "Arial");
        assert_eq!(font.size, 12.0);
        assert!(font.bold);
    }
}
