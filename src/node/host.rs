//! Host expression nodes
//!
//! The minimal set of leaves, lists and calls the rewrite rules read and
//! replace. Text leaves size themselves from the surface's text metrics;
//! lists, calls and infix operations interleave their children with text
//! runs and line everything up with [`arrange`].

use super::arrays::{Axis, arrange};
use super::fields::{checked_color, out_of_range, unit_interval};
use super::{Field, FieldValue, Fields, Node, Slot, Visual, slots};
use crate::errors::{FieldError, StructureError};
use crate::render::{Context, defaults};
use crate::types::{Extent, Offset, PaintPoint, Rgba};

/// Box of `text` in the current font, rounded up to whole pixels.
pub(crate) fn text_extent(ctx: &mut Context<'_>, text: &str) -> Extent {
    let size = ctx.text_size(text);
    Extent::centered(size.x.ceil() as i32, size.y.ceil() as i32)
}

fn unknown(tag: &'static str, field: Field) -> FieldError {
    FieldError::UnknownField {
        tag,
        field: field.to_string(),
    }
}

// ============================================================================
// Text leaves
// ============================================================================

/// A symbol, shown by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    name: String,
    extent: Extent,
}

impl Symbol {
    pub const TAG: &'static str = "Symbolic.Symbol";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extent: Extent::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Visual for Symbol {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = text_extent(ctx, &self.name);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        ctx.fill_text(&self.name, origin);
    }
}

impl Fields for Symbol {
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
                self.name = value.into_text(field)?;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

/// Largest magnitude a double holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    value: f64,
    extent: Extent,
}

impl Number {
    pub const TAG: &'static str = "Math.Number";

    pub fn new(value: f64) -> Self {
        Self {
            value,
            extent: Extent::ZERO,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value as an integer, if it is integral and exactly representable.
    pub fn native_integer(&self) -> Option<i64> {
        let v = self.value;
        (v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER).then_some(v as i64)
    }

    fn text(&self) -> String {
        self.value.to_string()
    }
}

impl Visual for Number {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = text_extent(ctx, &self.text());
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        ctx.fill_text(&self.text(), origin);
    }
}

impl Fields for Number {
    fn fields(&self) -> &'static [Field] {
        &[Field::Value]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Value => Ok(FieldValue::Float(self.value)),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Value => {
                self.value = value.as_float(field)?;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

/// A string literal, shown in double quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Str {
    value: String,
    extent: Extent,
}

impl Str {
    pub const TAG: &'static str = "String.String";

    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            extent: Extent::ZERO,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn text(&self) -> String {
        format!("\"{}\"", self.value)
    }
}

impl Visual for Str {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = text_extent(ctx, &self.text());
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        ctx.fill_text(&self.text(), origin);
    }
}

impl Fields for Str {
    fn fields(&self) -> &'static [Field] {
        &[Field::Value]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Value => Ok(FieldValue::Text(self.value.clone())),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Value => {
                self.value = value.into_text(field)?;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}

/// `Logic.True` or `Logic.False`; the value is carried by the tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    value: bool,
    extent: Extent,
}

impl Boolean {
    pub const TRUE_TAG: &'static str = "Logic.True";
    pub const FALSE_TAG: &'static str = "Logic.False";

    pub fn new(value: bool) -> Self {
        Self {
            value,
            extent: Extent::ZERO,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    fn text(&self) -> &'static str {
        if self.value { "true" } else { "false" }
    }
}

impl Visual for Boolean {
    fn tag(&self) -> &'static str {
        if self.value { Self::TRUE_TAG } else { Self::FALSE_TAG }
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        self.extent = text_extent(ctx, self.text());
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        ctx.fill_text(self.text(), origin);
    }
}

impl Fields for Boolean {}

/// A color literal, shown as a filled square one font size wide.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorValue {
    color: Rgba,
    extent: Extent,
}

impl ColorValue {
    pub const TAG: &'static str = "Color.Color";

    /// Channels are taken as given; use [`ColorValue::try_new`] for outside input.
    pub fn new(color: Rgba) -> Self {
        Self {
            color,
            extent: Extent::ZERO,
        }
    }

    pub fn try_new(color: Rgba) -> Result<Self, FieldError> {
        Ok(Self::new(checked_color(color)?))
    }

    pub fn color(&self) -> Rgba {
        self.color
    }
}

impl Visual for ColorValue {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let side = ctx.font().size.ceil() as i32;
        self.extent = Extent::centered(side, side);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let color = self.color;
        let mut swatch = ctx.styled(|s| s.fill = color);
        let rect = self.extent.rect_at(origin);
        swatch.fill_rect(rect);
        swatch.stroke_rect(rect);
    }
}

impl Fields for ColorValue {
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

/// Empty position waiting to be filled in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Null {
    extent: Extent,
}

impl Null {
    pub const TAG: &'static str = "Null";
}

impl Visual for Null {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let size = ctx.font().size;
        self.extent = Extent::centered((size / 2.0).ceil() as i32, size.ceil() as i32);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        let mut placeholder = ctx.styled(|s| s.stroke = defaults::PLACEHOLDER_COLOR);
        placeholder.stroke_rect(self.extent.rect_at(origin));
    }
}

impl Fields for Null {}

// ============================================================================
// Runs: children interleaved with text
// ============================================================================

/// One element of a run, in layout order.
enum Piece<'a> {
    Text(&'a str),
    Child(usize),
}

/// A text run placed by the last measure.
#[derive(Debug, Clone, PartialEq)]
struct Glyph {
    text: String,
    offset: Offset,
}

/// Measure `children`, then lay out `pieces` horizontally.
fn measure_run(ctx: &mut Context<'_>, children: &mut [Slot], pieces: &[Piece<'_>], gap: i32) -> (Extent, Vec<Glyph>) {
    for child in children.iter_mut() {
        child.measure(ctx);
    }
    let extents: Vec<Extent> = pieces
        .iter()
        .map(|piece| match piece {
            Piece::Text(text) => text_extent(ctx, text),
            Piece::Child(i) => children[*i].extent(),
        })
        .collect();
    let arrangement = arrange(Axis::Horizontal, &extents, gap);

    let mut glyphs = Vec::new();
    for (piece, offset) in pieces.iter().zip(arrangement.offsets) {
        match piece {
            Piece::Text(text) => glyphs.push(Glyph {
                text: text.to_string(),
                offset,
            }),
            Piece::Child(i) => children[*i].offset = offset,
        }
    }
    (arrangement.extent, glyphs)
}

fn paint_run(ctx: &mut Context<'_>, children: &[Slot], glyphs: &[Glyph], origin: PaintPoint) {
    for glyph in glyphs {
        ctx.fill_text(&glyph.text, origin + glyph.offset.as_dvec2());
    }
    for child in children {
        child.paint(ctx, origin);
    }
}

/// `open`, the children separated by `separator`, then `close`.
fn bracketed<'a>(open: &'a str, count: usize, separator: &'a str, close: &'a str) -> Vec<Piece<'a>> {
    let mut pieces = vec![Piece::Text(open)];
    for i in 0..count {
        if i > 0 {
            pieces.push(Piece::Text(separator));
        }
        pieces.push(Piece::Child(i));
    }
    pieces.push(Piece::Text(close));
    pieces
}

/// An ordered list, shown as `(a, b, c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    children: Vec<Slot>,
    glyphs: Vec<Glyph>,
    extent: Extent,
}

impl List {
    pub const TAG: &'static str = "List.List";

    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children: slots(children),
            glyphs: Vec::new(),
            extent: Extent::ZERO,
        }
    }
}

impl Visual for List {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let pieces = bracketed("(", self.children.len(), ",", ")");
        (self.extent, self.glyphs) = measure_run(ctx, &mut self.children, &pieces, defaults::COMMA_GAP);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        paint_run(ctx, &self.children, &self.glyphs, origin);
    }

    fn children(&self) -> &[Slot] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut self.children
    }
}

impl Fields for List {}

/// A function the rewrite rules know how to reduce
#[derive(Debug, PartialEq, Eq)]
pub struct Function {
    pub tag: &'static str,
    /// Name shown in front of the arguments.
    pub mnemonic: &'static str,
    pub min: usize,
    pub max: usize,
}

const fn function(tag: &'static str, mnemonic: &'static str, min: usize, max: usize) -> Function {
    Function { tag, mnemonic, min, max }
}

/// Every reducible function with its argument count range.
pub const FUNCTIONS: &[Function] = &[
    function("Visualization.CreateRectangle", "CreateRectangle", 4, 5),
    function("Visualization.SetColor", "SetColor", 2, 2),
    function("Visualization.SetBold", "SetBold", 1, 3),
    function("Visualization.SetItalic", "SetItalic", 1, 3),
    function("Visualization.SetFontSize", "SetFontSize", 2, 2),
    function("Visualization.SetFontSizeIncrement", "SetFontSizeIncrement", 2, 2),
    function("Visualization.SetFontName", "SetFontName", 2, 2),
    function("Visualization.CreateInfix", "CreateInfix", 2, 2),
];

impl Function {
    pub fn lookup(tag: &str) -> Option<&'static Function> {
        FUNCTIONS.iter().find(|f| f.tag == tag)
    }
}

/// Application of a [`Function`], shown as `Name(a, b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    function: &'static Function,
    children: Vec<Slot>,
    glyphs: Vec<Glyph>,
    extent: Extent,
}

impl Call {
    pub fn new(tag: &str, arguments: Vec<Node>) -> Result<Self, StructureError> {
        let function = Function::lookup(tag).ok_or_else(|| StructureError::UnknownTag { tag: tag.to_string() })?;
        let got = arguments.len();
        if got < function.min || got > function.max {
            return Err(StructureError::arity(tag, function.min, Some(function.max), got));
        }
        Ok(Self {
            function,
            children: slots(arguments),
            glyphs: Vec::new(),
            extent: Extent::ZERO,
        })
    }

    pub fn function(&self) -> &'static Function {
        self.function
    }

    pub fn argument(&self, index: usize) -> Option<&Node> {
        self.children.get(index).map(|slot| &*slot.node)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Node> + '_ {
        self.children.iter().map(|slot| &*slot.node)
    }
}

impl Visual for Call {
    fn tag(&self) -> &'static str {
        self.function.tag
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let mut pieces = vec![Piece::Text(self.function.mnemonic)];
        pieces.extend(bracketed("(", self.children.len(), ",", ")"));
        (self.extent, self.glyphs) = measure_run(ctx, &mut self.children, &pieces, defaults::CALL_GAP);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        paint_run(ctx, &self.children, &self.glyphs, origin);
    }

    fn children(&self) -> &[Slot] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut self.children
    }
}

impl Fields for Call {}

/// N-ary operation, operands separated by the operator text.
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    operator: String,
    children: Vec<Slot>,
    glyphs: Vec<Glyph>,
    extent: Extent,
}

impl Infix {
    pub const TAG: &'static str = "Visualization.Infix";

    pub fn new(operator: impl Into<String>, operands: Vec<Node>) -> Result<Self, StructureError> {
        if operands.len() < 2 {
            return Err(StructureError::arity(Self::TAG, 2, None, operands.len()));
        }
        Ok(Self {
            operator: operator.into(),
            children: slots(operands),
            glyphs: Vec::new(),
            extent: Extent::ZERO,
        })
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }
}

impl Visual for Infix {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extent(&self) -> Extent {
        self.extent
    }

    fn measure(&mut self, ctx: &mut Context<'_>) {
        let mut pieces = Vec::with_capacity(2 * self.children.len());
        for i in 0..self.children.len() {
            if i > 0 {
                pieces.push(Piece::Text(&self.operator));
            }
            pieces.push(Piece::Child(i));
        }
        (self.extent, self.glyphs) = measure_run(ctx, &mut self.children, &pieces, defaults::INFIX_GAP);
    }

    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        paint_run(ctx, &self.children, &self.glyphs, origin);
    }

    fn children(&self) -> &[Slot] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut self.children
    }
}

impl Fields for Infix {
    fn fields(&self) -> &'static [Field] {
        &[Field::Operator]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        match field {
            Field::Operator => Ok(FieldValue::Text(self.operator.clone())),
            _ => Err(unknown(Self::TAG, field)),
        }
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        match field {
            Field::Operator => {
                let operator = value.into_text(field)?;
                if operator.chars().any(char::is_control) {
                    return Err(out_of_range(field, "operator contains control characters"));
                }
                self.operator = operator;
                Ok(())
            }
            _ => Err(unknown(Self::TAG, field)),
        }
    }
}
