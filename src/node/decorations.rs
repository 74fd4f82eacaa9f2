//! Single-child decorations
//!
//! Each wrapper measures its child first, then derives its own box from the
//! child's. Style-affecting wrappers change the context through a scoped
//! guard around both the child's measure and its paint, so the change never
//! leaks to siblings.

use super::fields::{checked_color, out_of_range, unit_interval};
use super::{Field, FieldValue, Fields, Node, Slot, Visual};
use crate::errors::FieldError;
use crate::render::{Context, Style, defaults};
use crate::types::{Extent, Offset, PaintPoint, PaintRect, Rgba, half_round};

/// The child sits at the origin and the box is the child's.
fn pass_through(child: &mut Slot, ctx: &mut Context<'_>) -> Extent {
    child.measure(ctx);
    child.offset = Offset::ZERO;
    child.extent()
}

/// The child sits `margin` in from every edge.
fn framed(child: &mut Slot, ctx: &mut Context<'_>, margin: i32) -> Extent {
    child.measure(ctx);
    child.offset = Offset::splat(margin);
    child.extent().inflate(margin)
}

macro_rules! single_child {
    () => {
        fn children(&self) -> &[Slot] {
            std::slice::from_ref(&self.child)
        }

        fn children_mut(&mut self) -> &mut [Slot] {
            std::slice::from_mut(&mut self.child)
        }

        fn extent(&self) -> Extent {
            self.extent
        }
    };
}

// ============================================================================
// Geometry decorations
// ============================================================================

/// Draws a diagonal stroke across its child.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossedOut {
    child: Slot,
    extent: Extent,
}

impl CrossedOut {
    pub const TAG: &'static str = "Visualization.CrossedOut";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for CrossedOut {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = framed(&mut self.child, ctx, defaults::CROSSED_OUT_MARGIN);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        self.child.paint(ctx, origin);
        let (w, h) = (self.extent.width as f64, self.extent.height as f64);
        ctx.stroke_lines(&[(
            PaintPoint::new(origin.x, origin.y + h),
            PaintPoint::new(origin.x + w, origin.y),
        )]);
    }
}

impl Fields for CrossedOut {}

/// Debug frame: a gray border with ticks marking the child's baselines.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    child: Slot,
    extent: Extent,
}

impl Metrics {
    pub const TAG: &'static str = "Visualization.Metrics";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for Metrics {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = framed(&mut self.child, ctx, defaults::METRICS_MARGIN);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        {
            let mut frame = ctx.styled(|s| s.stroke = defaults::METRICS_COLOR);
            frame.stroke_rect(self.extent.rect_at(origin));

            let tick = defaults::METRICS_MARGIN as f64;
            let child = self.child.extent();
            let (x, y) = (origin.x, origin.y);
            let (w, h) = (self.extent.width as f64, self.extent.height as f64);
            let bx = x + tick + child.vert_baseline as f64;
            let by = y + tick + child.horz_baseline as f64;
            frame.stroke_lines(&[
                (PaintPoint::new(bx, y), PaintPoint::new(bx, y + tick)),
                (PaintPoint::new(bx, y + h), PaintPoint::new(bx, y + h - tick)),
                (PaintPoint::new(x, by), PaintPoint::new(x + tick, by)),
                (PaintPoint::new(x + w, by), PaintPoint::new(x + w - tick, by)),
            ]);
        }
        self.child.paint(ctx, origin);
    }
}

impl Fields for Metrics {}

/// Paints a light highlight behind its child.
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    child: Slot,
    extent: Extent,
}

impl Selected {
    pub const TAG: &'static str = "Visualization.Selected";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for Selected {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = pass_through(&mut self.child, ctx);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        {
            let mut highlight = ctx.styled(|s| s.fill = defaults::SELECTION_COLOR);
            highlight.fill_rect(self.child.extent().rect_at(self.child.origin_in(origin)));
        }
        self.child.paint(ctx, origin);
    }
}

impl Fields for Selected {}

/// Reserves room on both sides and asks the child to draw its own parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Parentheses {
    child: Slot,
    extent: Extent,
}

impl Parentheses {
    pub const TAG: &'static str = "Visualization.Parentheses";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for Parentheses {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let margin = defaults::PARENTHESES_MARGIN;
        self.child.measure(ctx);
        self.child.offset = Offset::new(margin, 0);
        let child = self.child.extent();
        self.extent = Extent::new(
            child.width.saturating_add(2 * margin),
            child.height,
            child.horz_baseline,
            child.vert_baseline.saturating_add(margin),
        );
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        self.child.paint(ctx, origin);
        self.child.node.draw_parentheses_around(ctx, self.child.origin_in(origin));
    }
}

impl Fields for Parentheses {}

/// Semantic marker with no visual or geometric effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Spurious {
    child: Slot,
    extent: Extent,
}

impl Spurious {
    pub const TAG: &'static str = "Visualization.Spurious";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for Spurious {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = pass_through(&mut self.child, ctx);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        self.child.paint(ctx, origin);
    }
}

impl Fields for Spurious {}

/// Keyboard key: smaller sans-serif label inside a triple rounded border.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    child: Slot,
    extent: Extent,
}

impl Key {
    pub const TAG: &'static str = "Visualization.Key";

    pub fn new(child: Node) -> Self {
        Self {
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    fn label_style(style: &mut Style) {
        style.font.set_name(defaults::KEY_FONT_NAME);
        style.font.set_size_relative(defaults::KEY_FONT_SIZE_DELTA);
    }
}

impl Visual for Key {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let margin = defaults::KEY_MARGIN;
        {
            let mut label = ctx.styled(Key::label_style);
            self.child.measure(&mut label);
        }
        self.child.offset = Offset::splat(margin);
        let child = self.child.extent();
        let height = child.height.saturating_add(2 * margin);
        // The vertical baseline ignores the left margin.
        self.extent = Extent::new(
            child.width.saturating_add(2 * margin),
            height,
            half_round(height),
            half_round(child.width),
        );
        crate::log::debug!(width = self.extent.width, height = self.extent.height, "measured key");
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let mut label = ctx.styled(Key::label_style);
        self.child.paint(&mut label, origin);

        let (x, y) = (origin.x + 0.5, origin.y + 0.5);
        let (w, h) = (self.extent.width as f64, self.extent.height as f64);
        let borders: Vec<PaintRect> = (0..3)
            .map(|inset| PaintRect::from_xywh(x, y, w - inset as f64, h - inset as f64))
            .collect();
        label.stroke_round_rects(&borders, defaults::KEY_CORNER_RADIUS);
    }
}

impl Fields for Key {}

// ============================================================================
// Style decorations
// ============================================================================

/// Paints its child with fill and stroke set to one color.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    color: Rgba,
    child: Slot,
    extent: Extent,
}

impl Color {
    pub const TAG: &'static str = "Visualization.Color";

    /// Channels are taken as given; use [`Color::try_new`] for outside input.
    pub fn new(color: Rgba, child: Node) -> Self {
        Self {
            color,
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    /// Like [`Color::new`], rejecting channels outside `[0, 1]`.
    pub fn try_new(color: Rgba, child: Node) -> Result<Self, FieldError> {
        Ok(Self::new(checked_color(color)?, child))
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

impl Visual for Color {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = pass_through(&mut self.child, ctx);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let color = self.color;
        let mut colored = ctx.styled(|s| {
            s.fill = color;
            s.stroke = color;
        });
        self.child.paint(&mut colored, origin);
    }
}

impl Fields for Color {
    fn fields(&self) -> &'static [Field] {
        &[Field::Red, Field::Green, Field::Blue, Field::Alpha]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        let channel = match field {
            Field::Red => self.color.red,
            Field::Green => self.color.green,
            Field::Blue => self.color.blue,
            Field::Alpha => self.color.alpha,
            _ => return Err(unknown(Self::TAG, field)),
        };
        Ok(FieldValue::Float(channel))
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        let channel = match field {
            Field::Red => &mut self.color.red,
            Field::Green => &mut self.color.green,
            Field::Blue => &mut self.color.blue,
            Field::Alpha => &mut self.color.alpha,
            _ => return Err(unknown(Self::TAG, field)),
        };
        *channel = unit_interval(field, &value)?;
        Ok(())
    }
}

/// How a bold or italic decoration changes the current flag.
///
/// With `is_set` the flag becomes `value`. Otherwise `value = true` flips
/// the current flag and `value = false` leaves it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub value: bool,
    pub is_set: bool,
}

impl Toggle {
    pub const fn new(value: bool, is_set: bool) -> Self {
        Self { value, is_set }
    }

    pub fn apply(self, current: bool) -> bool {
        if self.is_set {
            self.value
        } else if self.value {
            !current
        } else {
            current
        }
    }

    fn field(self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Value => Some(FieldValue::Bool(self.value)),
            Field::Set => Some(FieldValue::Bool(self.is_set)),
            _ => None,
        }
    }

    fn set_field(&mut self, field: Field, value: &FieldValue) -> Option<Result<(), FieldError>> {
        let target = match field {
            Field::Value => &mut self.value,
            Field::Set => &mut self.is_set,
            _ => return None,
        };
        Some(value.as_bool(field).map(|v| *target = v))
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Self::new(true, true)
    }
}

const TOGGLE_FIELDS: &[Field] = &[Field::Value, Field::Set];

/// Sets or flips the bold flag for its child.
#[derive(Debug, Clone, PartialEq)]
pub struct Bold {
    toggle: Toggle,
    child: Slot,
    extent: Extent,
}

impl Bold {
    pub const TAG: &'static str = "Visualization.Bold";

    pub fn new(toggle: Toggle, child: Node) -> Self {
        Self {
            toggle,
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    pub fn toggle(&self) -> Toggle {
        self.toggle
    }
}

impl Visual for Bold {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let toggle = self.toggle;
        let mut bold = ctx.styled(|s| s.font.bold = toggle.apply(s.font.bold));
        self.extent = pass_through(&mut self.child, &mut bold);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let toggle = self.toggle;
        let mut bold = ctx.styled(|s| s.font.bold = toggle.apply(s.font.bold));
        self.child.paint(&mut bold, origin);
    }
}

impl Fields for Bold {
    fn fields(&self) -> &'static [Field] {
        TOGGLE_FIELDS
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        self.toggle.field(field).ok_or_else(|| unknown(Self::TAG, field))
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match self.toggle.set_field(field, &value) {
            Some(result) => result,
            None => Err(unknown(Self::TAG, field)),
        }
    }
}

/// Sets or flips the italic flag for its child.
#[derive(Debug, Clone, PartialEq)]
pub struct Italic {
    toggle: Toggle,
    child: Slot,
    extent: Extent,
}

impl Italic {
    pub const TAG: &'static str = "Visualization.Italic";

    pub fn new(toggle: Toggle, child: Node) -> Self {
        Self {
            toggle,
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    pub fn toggle(&self) -> Toggle {
        self.toggle
    }
}

impl Visual for Italic {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let toggle = self.toggle;
        let mut italic = ctx.styled(|s| s.font.italic = toggle.apply(s.font.italic));
        self.extent = pass_through(&mut self.child, &mut italic);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let toggle = self.toggle;
        let mut italic = ctx.styled(|s| s.font.italic = toggle.apply(s.font.italic));
        self.child.paint(&mut italic, origin);
    }
}

impl Fields for Italic {
    fn fields(&self) -> &'static [Field] {
        TOGGLE_FIELDS
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        self.toggle.field(field).ok_or_else(|| unknown(Self::TAG, field))
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match self.toggle.set_field(field, &value) {
            Some(result) => result,
            None => Err(unknown(Self::TAG, field)),
        }
    }
}

/// Sets an absolute font size for its child.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSize {
    size: f64,
    child: Slot,
    extent: Extent,
}

impl FontSize {
    pub const TAG: &'static str = "Visualization.FontSize";

    /// `size` must be positive.
    pub fn new(size: f64, child: Node) -> Self {
        Self {
            size,
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

impl Visual for FontSize {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let size = self.size;
        let mut sized = ctx.styled(|s| s.font.set_size_absolute(size));
        self.extent = pass_through(&mut self.child, &mut sized);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let size = self.size;
        let mut sized = ctx.styled(|s| s.font.set_size_absolute(size));
        self.child.paint(&mut sized, origin);
    }
}

impl Fields for FontSize {
    fn fields(&self) -> &'static [Field] {
        &[Field::Size]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Size => Ok(FieldValue::Float(self.size)),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Size => {
                let size = value.as_float(field)?;
                if size <= 0.0 {
                    return Err(out_of_range(field, format!("{size} is not positive")));
                }
                self.size = size;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

/// Grows or shrinks the current font size for its child.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSizeIncrement {
    increment: f64,
    child: Slot,
    extent: Extent,
}

impl FontSizeIncrement {
    pub const TAG: &'static str = "Visualization.FontSizeIncrement";

    pub fn new(increment: f64, child: Node) -> Self {
        Self {
            increment,
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    pub fn increment(&self) -> f64 {
        self.increment
    }
}

impl Visual for FontSizeIncrement {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let delta = self.increment;
        let mut sized = ctx.styled(|s| s.font.set_size_relative(delta));
        self.extent = pass_through(&mut self.child, &mut sized);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let delta = self.increment;
        let mut sized = ctx.styled(|s| s.font.set_size_relative(delta));
        self.child.paint(&mut sized, origin);
    }
}

impl Fields for FontSizeIncrement {
    fn fields(&self) -> &'static [Field] {
        &[Field::Increment]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Increment => Ok(FieldValue::Float(self.increment)),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Increment => {
                self.increment = value.as_float(field)?;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

/// Sets the font family for its child.
#[derive(Debug, Clone, PartialEq)]
pub struct FontName {
    name: String,
    child: Slot,
    extent: Extent,
}

impl FontName {
    pub const TAG: &'static str = "Visualization.FontName";

    /// `name` must not be empty.
    pub fn new(name: impl Into<String>, child: Node) -> Self {
        Self {
            name: name.into(),
            child: Slot::new(child),
            extent: Extent::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Visual for FontName {
    single_child!();

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let mut named = ctx.styled(|s| s.font.set_name(&self.name));
        self.extent = pass_through(&mut self.child, &mut named);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let mut named = ctx.styled(|s| s.font.set_name(&self.name));
        self.child.paint(&mut named, origin);
    }
}

impl Fields for FontName {
    fn fields(&self) -> &'static [Field] {
        &[Field::Name]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Name => Ok(FieldValue::Text(self.name.clone())),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Name => {
                let name = value.into_text(field)?;
                if name.is_empty() {
                    return Err(out_of_range(field, "font name is empty"));
                }
                self.name = name;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

fn unknown(tag: &'static str, field: Field) -> FieldError {
    FieldError::UnknownField {
        tag,
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Rectangle;
    use crate::render::{DisplayList, DrawOp};

    fn rect(w: i32, h: i32, hb: i32, vb: i32) -> Node {
        Rectangle::new(w, h, hb, vb).into()
    }

    fn measured(mut node: Node) -> Node {
        let mut list = DisplayList::new();
        let mut ctx = Context::new(&mut list, Style::default());
        node.measure(&mut ctx);
        node
    }

    #[test]
    fn style_wrappers_keep_child_geometry() {
        let child = Extent::new(30, 12, 7, 11);
        let wrappers: Vec<Node> = vec![
            Color::new(Rgba::WHITE, rect(30, 12, 7, 11)).into(),
            Bold::new(Toggle::default(), rect(30, 12, 7, 11)).into(),
            Italic::new(Toggle::new(true, false), rect(30, 12, 7, 11)).into(),
            FontSize::new(20.0, rect(30, 12, 7, 11)).into(),
            FontSizeIncrement::new(-3.0, rect(30, 12, 7, 11)).into(),
            FontName::new("Courier", rect(30, 12, 7, 11)).into(),
            Selected::new(rect(30, 12, 7, 11)).into(),
            Spurious::new(rect(30, 12, 7, 11)).into(),
        ];
        for node in wrappers {
            let node = measured(node);
            assert_eq!(node.extent(), child, "{}", node.tag());
            assert_eq!(node.children()[0].offset, Offset::ZERO);
        }
    }

    #[test]
    fn framing_wrappers_add_margin() {
        let crossed = measured(CrossedOut::new(rect(30, 12, 7, 11)).into());
        assert_eq!(crossed.extent(), Extent::new(34, 16, 9, 13));
        assert_eq!(crossed.children()[0].offset, Offset::new(2, 2));

        let metrics = measured(Metrics::new(rect(30, 12, 7, 11)).into());
        assert_eq!(metrics.extent(), Extent::new(40, 22, 12, 16));
        assert_eq!(metrics.children()[0].offset, Offset::new(5, 5));
    }

    #[test]
    fn parentheses_widen_horizontally_only() {
        let node = measured(Parentheses::new(rect(30, 12, 7, 11)).into());
        assert_eq!(node.extent(), Extent::new(38, 12, 7, 15));
        assert_eq!(node.children()[0].offset, Offset::new(4, 0));
    }

    #[test]
    fn key_baselines_follow_box_height_and_label_width() {
        let node = measured(Key::new(rect(31, 12, 2, 3)).into());
        assert_eq!(node.extent(), Extent::new(41, 22, 11, 16));
        assert!(node.extent().is_well_formed());
    }

    #[test]
    fn margins_saturate_on_huge_children() {
        let node = measured(Parentheses::new(rect(i32::MAX, 12, 7, i32::MAX)).into());
        assert_eq!(node.extent().width, i32::MAX);
        assert_eq!(node.extent().vert_baseline, i32::MAX);

        let node = measured(Key::new(rect(i32::MAX, 12, 2, 3)).into());
        assert_eq!(node.extent().width, i32::MAX);
        assert_eq!(node.extent().height, 22);

        let node = measured(CrossedOut::new(rect(i32::MAX, i32::MAX, 0, 0)).into());
        assert_eq!(node.extent().width, i32::MAX);
        assert_eq!(node.extent().horz_baseline, 2);
    }

    #[test]
    fn toggle_semantics() {
        assert!(Toggle::new(true, true).apply(false));
        assert!(!Toggle::new(false, true).apply(true));
        assert!(!Toggle::new(true, false).apply(true));
        assert!(Toggle::new(true, false).apply(false));
        assert!(Toggle::new(false, false).apply(true));
        assert!(!Toggle::new(false, false).apply(false));
    }

    #[test]
    fn crossed_out_paints_child_then_diagonal() {
        let node = measured(CrossedOut::new(rect(10, 6, 3, 5)).into());
        let mut list = DisplayList::new();
        let mut ctx = Context::new(&mut list, Style::default());
        node.paint(&mut ctx, PaintPoint::new(1.0, 1.0));
        drop(ctx);
        insta::assert_snapshot!(list.to_string(), @"lines 1,11-15,1 rgba(0%,0%,0%,1)");
    }

    #[test]
    fn selected_highlight_is_painted_under_child() {
        let inner: Node = Color::new(Rgba::WHITE, Metrics::new(rect(10, 6, 3, 5)).into()).into();
        let node = measured(Selected::new(inner).into());
        let mut list = DisplayList::new();
        let mut ctx = Context::new(&mut list, Style::default());
        node.paint(&mut ctx, PaintPoint::ZERO);
        drop(ctx);

        let ops = list.ops();
        assert!(matches!(
            ops[0],
            DrawOp::FillRect { rect, color } if color == defaults::SELECTION_COLOR && rect.size.x == 20.0
        ));
        assert!(matches!(ops[1], DrawOp::StrokeRect { color, .. } if color == defaults::METRICS_COLOR));
        assert_eq!(ops.len(), 3);
    }

    #[test]
    fn color_channels_are_range_checked() {
        let mut node: Node = Color::new(Rgba::BLACK, rect(1, 1, 0, 0)).into();
        assert!(node.set_field(Field::Red, FieldValue::Float(0.5)).is_ok());
        let err = node.set_field(Field::Alpha, FieldValue::Float(1.5)).unwrap_err();
        assert!(matches!(err, FieldError::OutOfRange { field: "Alpha", .. }));
    }

    #[test]
    fn font_size_must_be_positive() {
        let mut node: Node = FontSize::new(12.0, rect(1, 1, 0, 0)).into();
        assert!(node.set_field(Field::Size, FieldValue::Float(0.0)).is_err());
        assert_eq!(node.field(Field::Size), Ok(FieldValue::Float(12.0)));
    }
}
