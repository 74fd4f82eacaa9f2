//! Paint context - the style stack threaded through measure and paint

use std::ops::{Deref, DerefMut};

use glam::DVec2;

use super::defaults;
use super::surface::Surface;
use crate::types::{PaintPoint, PaintRect, Rgba};

/// Current font selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl FontInfo {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    pub fn set_size_absolute(&mut self, size: f64) {
        self.size = size.max(defaults::MIN_FONT_SIZE);
    }

    pub fn set_size_relative(&mut self, delta: f64) {
        self.set_size_absolute(self.size + delta);
    }
}

impl Default for FontInfo {
    fn default() -> Self {
        Self::new(defaults::FONT_NAME, defaults::FONT_SIZE)
    }
}

/// Everything a decoration may override for its subtree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub font: FontInfo,
    pub fill: Rgba,
    pub stroke: Rgba,
}

/// Measure/paint context
///
/// Owns the current [`Style`] and borrows the surface for the duration of
/// one traversal. Style changes go through [`Context::scoped`] or
/// [`Context::styled`], whose guard puts the previous style back when it
/// goes out of scope.
pub struct Context<'s> {
    surface: &'s mut dyn Surface,
    style: Style,
}

impl<'s> Context<'s> {
    pub fn new(surface: &'s mut dyn Surface, style: Style) -> Self {
        Self { surface, style }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn font(&self) -> &FontInfo {
        &self.style.font
    }

    /// Snapshot the style; it is restored when the guard drops.
    pub fn scoped(&mut self) -> Scoped<'_, 's> {
        let saved = self.style.clone();
        Scoped {
            ctx: self,
            saved: Some(saved),
        }
    }

    /// Snapshot the style, then apply `change` to it.
    pub fn styled(&mut self, change: impl FnOnce(&mut Style)) -> Scoped<'_, 's> {
        let mut scope = self.scoped();
        change(&mut scope.style);
        scope
    }

    /// Size of `text` in the current font.
    pub fn text_size(&mut self, text: &str) -> DVec2 {
        self.surface.text_size(&self.style.font, text)
    }

    pub fn fill_rect(&mut self, rect: PaintRect) {
        self.surface.fill_rect(rect, self.style.fill);
    }

    pub fn stroke_rect(&mut self, rect: PaintRect) {
        self.surface.stroke_rect(rect, self.style.stroke);
    }

    pub fn stroke_lines(&mut self, segments: &[(PaintPoint, PaintPoint)]) {
        self.surface.stroke_lines(segments, self.style.stroke);
    }

    pub fn stroke_round_rects(&mut self, rects: &[PaintRect], radius: f64) {
        self.surface.stroke_round_rects(rects, radius, self.style.stroke);
    }

    pub fn stroke_curve(&mut self, from: PaintPoint, control: PaintPoint, to: PaintPoint) {
        self.surface.stroke_curve(from, control, to, self.style.stroke);
    }

    pub fn fill_text(&mut self, text: &str, origin: PaintPoint) {
        self.surface.fill_text(text, origin, &self.style.font, self.style.fill);
    }
}

/// Guard returned by [`Context::scoped`]; derefs to the context.
pub struct Scoped<'a, 's> {
    ctx: &'a mut Context<'s>,
    saved: Option<Style>,
}

impl<'s> Deref for Scoped<'_, 's> {
    type Target = Context<'s>;

    fn deref(&self) -> &Context<'s> {
        self.ctx
    }
}

impl<'s> DerefMut for Scoped<'_, 's> {
    fn deref_mut(&mut self) -> &mut Context<'s> {
        self.ctx
    }
}

impl Drop for Scoped<'_, '_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.ctx.style = saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::DisplayList;

    #[test]
    fn scoped_restores_style_on_drop() {
        let mut list = DisplayList::new();
        let mut ctx = Context::new(&mut list, Style::default());
        {
            let mut scope = ctx.styled(|s| {
                s.font.bold = true;
                s.font.set_name("Arial");
                s.fill = Rgba::WHITE;
            });
            assert!(scope.font().bold);
            scope.style_mut().font.set_size_relative(3.0);
            assert_eq!(scope.font().size, defaults::FONT_SIZE + 3.0);
        }
        assert_eq!(ctx.style(), &Style::default());
    }

    #[test]
    fn nested_scopes_unwind_in_order() {
        let mut list = DisplayList::new();
        let mut ctx = Context::new(&mut list, Style::default());
        {
            let mut outer = ctx.styled(|s| s.font.italic = true);
            {
                let inner = outer.styled(|s| s.font.italic = false);
                assert!(!inner.font().italic);
            }
            assert!(outer.font().italic);
        }
        assert!(!ctx.font().italic);
    }

    #[test]
    fn relative_size_is_clamped() {
        let mut font = FontInfo::new("Arial", 3.0);
        font.set_size_relative(-10.0);
        assert_eq!(font.size, defaults::MIN_FONT_SIZE);
    }
}
