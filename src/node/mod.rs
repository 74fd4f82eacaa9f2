//! Expression tree nodes
//!
//! Every node implements [`Visual`]: `measure` computes its [`Extent`] and
//! places its children bottom-up, `paint` draws it top-down from the
//! geometry of the most recent `measure`. [`Fields`] exposes the typed
//! fields a node declares. Both are dispatched over the [`Node`] enum.
//!
//! - `decorations`: single-child wrappers (color, bold, key, ...)
//! - `arrays`: the baseline-aligned row/column algorithm, arrays and rectangles
//! - `host`: the host leaves and call nodes rewrite rules operate on
//! - `fields`: field names, values and serialization

pub mod arrays;
pub mod decorations;
pub mod fields;
pub mod host;

use enum_dispatch::enum_dispatch;

pub use arrays::{Arrangement, Axis, HorizontalArray, Rectangle, VerticalArray, arrange};
pub use decorations::{
    Bold, Color, CrossedOut, FontName, FontSize, FontSizeIncrement, Italic, Key, Metrics, Parentheses, Selected,
    Spurious, Toggle,
};
pub use fields::{Field, FieldValue};
pub use host::{Boolean, Call, ColorValue, FUNCTIONS, Function, Infix, List, Null, Number, Str, Symbol};

use crate::errors::{FieldError, StructureError};
use crate::render::Context;
use crate::render::defaults;
use crate::types::{Extent, Offset, PaintPoint};

/// The two-phase layout contract
#[enum_dispatch]
pub trait Visual {
    /// Serialization and rule-dispatch tag, e.g. `Visualization.Bold`.
    fn tag(&self) -> &'static str;

    /// Geometry computed by the last `measure`.
    fn extent(&self) -> Extent;

    /// Measure the subtree, then set this node's extent and its children's offsets.
    fn measure(&mut self, ctx: &mut Context<'_>);

    /// Paint the subtree with this node's top-left corner at `origin`.
    fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint);

    fn children(&self) -> &[Slot] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [Slot] {
        &mut []
    }

    /// Draw a parenthesis in the margin on each side of this node.
    fn draw_parentheses_around(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        draw_parentheses(ctx, origin, self.extent());
    }
}

/// Typed fields of a node
#[enum_dispatch]
pub trait Fields: Visual {
    /// Declared fields, in serialization order.
    fn fields(&self) -> &'static [Field] {
        &[]
    }

    fn field(&self, field: Field) -> Result<FieldValue, FieldError> {
        Err(FieldError::UnknownField {
            tag: self.tag(),
            field: field.to_string(),
        })
    }

    fn set_field(&mut self, field: Field, value: FieldValue) -> Result<(), FieldError> {
        let _ = value;
        Err(FieldError::UnknownField {
            tag: self.tag(),
            field: field.to_string(),
        })
    }
}

/// Any node of the expression tree
#[enum_dispatch(Visual, Fields)]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    CrossedOut(CrossedOut),
    Metrics(Metrics),
    Rectangle(Rectangle),
    HorizontalArray(HorizontalArray),
    VerticalArray(VerticalArray),
    Color(Color),
    Bold(Bold),
    Italic(Italic),
    FontSize(FontSize),
    FontSizeIncrement(FontSizeIncrement),
    FontName(FontName),
    Selected(Selected),
    Parentheses(Parentheses),
    Spurious(Spurious),
    Key(Key),
    Infix(Infix),
    Symbol(Symbol),
    Number(Number),
    Str(Str),
    Boolean(Boolean),
    ColorValue(ColorValue),
    List(List),
    Call(Call),
    Null(Null),
}

/// A child position: the owned node, the offset its parent gave it during
/// measure, and an optional error mark left by a failed rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub node: Box<Node>,
    pub offset: Offset,
    pub error: Option<String>,
}

impl Slot {
    pub fn new(node: Node) -> Self {
        Self {
            node: Box::new(node),
            offset: Offset::ZERO,
            error: None,
        }
    }

    pub fn extent(&self) -> Extent {
        self.node.extent()
    }

    pub fn measure(&mut self, ctx: &mut Context<'_>) {
        self.node.measure(ctx);
    }

    /// Paint the child relative to its parent's `origin`.
    pub fn paint(&self, ctx: &mut Context<'_>, origin: PaintPoint) {
        self.node.paint(ctx, self.origin_in(origin));
    }

    /// Absolute origin of the child given its parent's `origin`.
    pub fn origin_in(&self, origin: PaintPoint) -> PaintPoint {
        origin + self.offset.as_dvec2()
    }

    pub fn is_in_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Take the node out, leaving a placeholder behind.
    pub fn take(&mut self) -> Node {
        std::mem::replace(&mut *self.node, Node::placeholder())
    }
}

impl From<Node> for Slot {
    fn from(node: Node) -> Self {
        Slot::new(node)
    }
}

pub(crate) fn slots(children: Vec<Node>) -> Vec<Slot> {
    children.into_iter().map(Slot::new).collect()
}

/// Child count a tag accepts, as `(min, max)`; `None` means unbounded.
pub fn arity(tag: &str) -> Option<(usize, Option<usize>)> {
    let arity = match tag {
        CrossedOut::TAG | Metrics::TAG | Color::TAG | Bold::TAG | Italic::TAG | FontSize::TAG
        | FontSizeIncrement::TAG | FontName::TAG | Selected::TAG | Parentheses::TAG | Spurious::TAG
        | Key::TAG => (1, Some(1)),
        HorizontalArray::TAG | VerticalArray::TAG | Infix::TAG => (2, None),
        Rectangle::TAG | Symbol::TAG | Number::TAG | Str::TAG | Boolean::TRUE_TAG | Boolean::FALSE_TAG
        | ColorValue::TAG | Null::TAG => (0, Some(0)),
        List::TAG => (0, None),
        _ => {
            let function = Function::lookup(tag)?;
            (function.min, Some(function.max))
        }
    };
    Some(arity)
}

impl Node {
    /// Build a node from its tag and children, with default field values.
    pub fn from_tag(tag: &str, children: Vec<Node>) -> Result<Node, StructureError> {
        let (min, max) = arity(tag).ok_or_else(|| StructureError::UnknownTag { tag: tag.to_string() })?;
        let got = children.len();
        if got < min || max.is_some_and(|max| got > max) {
            return Err(StructureError::arity(tag, min, max, got));
        }

        let mut children = children.into_iter();
        fn only(children: &mut std::vec::IntoIter<Node>) -> Node {
            children.next().unwrap_or_else(Node::placeholder)
        }

        let node: Node = match tag {
            CrossedOut::TAG => CrossedOut::new(only(&mut children)).into(),
            Metrics::TAG => Metrics::new(only(&mut children)).into(),
            Color::TAG => Color::new(crate::types::Rgba::BLACK, only(&mut children)).into(),
            Bold::TAG => Bold::new(Toggle::default(), only(&mut children)).into(),
            Italic::TAG => Italic::new(Toggle::default(), only(&mut children)).into(),
            FontSize::TAG => FontSize::new(defaults::FONT_SIZE, only(&mut children)).into(),
            FontSizeIncrement::TAG => FontSizeIncrement::new(0.0, only(&mut children)).into(),
            FontName::TAG => FontName::new(defaults::FONT_NAME, only(&mut children)).into(),
            Selected::TAG => Selected::new(only(&mut children)).into(),
            Parentheses::TAG => Parentheses::new(only(&mut children)).into(),
            Spurious::TAG => Spurious::new(only(&mut children)).into(),
            Key::TAG => Key::new(only(&mut children)).into(),
            Rectangle::TAG => Rectangle::default().into(),
            Symbol::TAG => Symbol::new("").into(),
            Number::TAG => Number::new(0.0).into(),
            Str::TAG => Str::new("").into(),
            Boolean::TRUE_TAG => Boolean::new(true).into(),
            Boolean::FALSE_TAG => Boolean::new(false).into(),
            ColorValue::TAG => ColorValue::new(crate::types::Rgba::BLACK).into(),
            Null::TAG => Null::default().into(),
            HorizontalArray::TAG => HorizontalArray::new(children.collect())?.into(),
            VerticalArray::TAG => VerticalArray::new(children.collect())?.into(),
            Infix::TAG => Infix::new("", children.collect())?.into(),
            List::TAG => List::new(children.collect()).into(),
            _ => Call::new(tag, children.collect())?.into(),
        };
        Ok(node)
    }

    /// Wrap `child` in the single-child node named by `tag`.
    pub fn wrap(tag: &str, child: Node) -> Result<Node, StructureError> {
        Node::from_tag(tag, vec![child])
    }

    /// Empty placeholder for a position still to be filled.
    pub fn placeholder() -> Node {
        Node::Null(Null::default())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Null(_))
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index).map(|slot| &*slot.node)
    }

    /// Visit the subtree in pre-order.
    pub fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        visit(self);
        for slot in self.children() {
            slot.node.walk(visit);
        }
    }

    /// Whether any slot in the subtree carries an error mark.
    pub fn has_errors(&self) -> bool {
        self.children()
            .iter()
            .any(|slot| slot.is_in_error() || slot.node.has_errors())
    }
}

/// Draw `(` and `)` in the [`defaults::PARENTHESES_MARGIN`] on each side of `extent`.
pub fn draw_parentheses(ctx: &mut Context<'_>, origin: PaintPoint, extent: Extent) {
    let (x, y) = (origin.x, origin.y);
    let (w, h) = (extent.width as f64, extent.height as f64);
    let margin = defaults::PARENTHESES_MARGIN as f64;
    let (top, mid, bottom) = (y + 0.5, y + h / 2.0, y + h - 0.5);

    ctx.stroke_curve(
        PaintPoint::new(x - 1.5, top),
        PaintPoint::new(x - margin - 1.5, mid),
        PaintPoint::new(x - 1.5, bottom),
    );
    ctx.stroke_curve(
        PaintPoint::new(x + w + 1.5, top),
        PaintPoint::new(x + w + margin + 1.5, mid),
        PaintPoint::new(x + w + 1.5, bottom),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_tags_take_exactly_one_child() {
        let err = Node::from_tag(Bold::TAG, vec![]).unwrap_err();
        assert!(matches!(err, StructureError::Arity { got: 0, .. }));

        let two = vec![Symbol::new("a").into(), Symbol::new("b").into()];
        assert!(Node::from_tag(Key::TAG, two).is_err());
    }

    #[test]
    fn arrays_need_two_children() {
        let one = vec![Symbol::new("a").into()];
        let err = Node::from_tag(VerticalArray::TAG, one).unwrap_err();
        assert_eq!(err.to_string(), "Visualization.VerticalArray takes at least 2 children, got 1");
        assert!(Node::from_tag(HorizontalArray::TAG, vec![]).is_err());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = Node::from_tag("Nope.Nothing", vec![]).unwrap_err();
        assert_eq!(
            err,
            StructureError::UnknownTag {
                tag: "Nope.Nothing".into()
            }
        );
    }

    #[test]
    fn calls_use_function_table_arity() {
        let target: Node = Symbol::new("x").into();
        let call = Node::from_tag("Visualization.SetBold", vec![target]).unwrap();
        assert_eq!(call.tag(), "Visualization.SetBold");

        let err = Node::from_tag("Visualization.SetColor", vec![Symbol::new("x").into()]).unwrap_err();
        assert!(matches!(err, StructureError::Arity { got: 1, .. }));
    }

    #[test]
    fn has_errors_sees_nested_marks() {
        let mut node = Node::wrap(Bold::TAG, Node::wrap(Key::TAG, Symbol::new("x").into()).unwrap()).unwrap();
        assert!(!node.has_errors());
        node.children_mut()[0].node.children_mut()[0].set_error("bad");
        assert!(node.has_errors());
    }

    #[test]
    fn slot_take_leaves_placeholder() {
        let mut slot = Slot::new(Symbol::new("x").into());
        let taken = slot.take();
        assert_eq!(taken.tag(), Symbol::TAG);
        assert!(slot.node.is_placeholder());
    }
}
