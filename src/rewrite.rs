//! Rewrite rules turning setter calls into decoration nodes
//!
//! A [`Rule`] inspects one call node. It either builds the replacement,
//! declines so other rules may try, or fails on the first bad operand.
//! [`reduce`] applies the rule for a node's tag and marks the failing
//! operand's slot; [`normalize`] does that bottom-up over a whole tree.

use crate::errors::RewriteError;
use crate::log::{debug, warn};
use crate::node::{Bold, Call, Color, FontName, FontSize, FontSizeIncrement, Infix, Italic, Node, Rectangle, Toggle, Visual};
use crate::render::defaults;

/// Outcome of a successful rule application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// The call was replaced in place.
    Replaced,
    /// The rule does not apply; the call is unchanged.
    Declined,
}

/// A rule body: `Ok(Some(node))` replaces the call, `Ok(None)` declines.
pub type Rule = fn(&mut Call) -> Result<Option<Node>, RewriteError>;

pub const CREATE_RECTANGLE: &str = "Visualization.CreateRectangle";
pub const SET_COLOR: &str = "Visualization.SetColor";
pub const SET_BOLD: &str = "Visualization.SetBold";
pub const SET_ITALIC: &str = "Visualization.SetItalic";
pub const SET_FONT_SIZE: &str = "Visualization.SetFontSize";
pub const SET_FONT_SIZE_INCREMENT: &str = "Visualization.SetFontSizeIncrement";
pub const SET_FONT_NAME: &str = "Visualization.SetFontName";
pub const CREATE_INFIX: &str = "Visualization.CreateInfix";

/// The rule registered for a function tag.
pub fn reducer_for(tag: &str) -> Option<Rule> {
    let rule: Rule = match tag {
        CREATE_RECTANGLE => create_rectangle,
        SET_COLOR => set_color,
        SET_BOLD | SET_ITALIC => set_bold_italic,
        SET_FONT_SIZE | SET_FONT_SIZE_INCREMENT => set_font_size,
        SET_FONT_NAME => set_font_name,
        CREATE_INFIX => create_infix,
        _ => return None,
    };
    Some(rule)
}

/// Apply the rule for `node`'s tag, replacing `node` on success.
///
/// On failure the offending operand's slot is marked in error and the call
/// is left otherwise untouched.
pub fn reduce(node: &mut Node) -> Result<Reduction, RewriteError> {
    let Node::Call(call) = node else {
        return Ok(Reduction::Declined);
    };
    let Some(rule) = reducer_for(call.tag()) else {
        return Ok(Reduction::Declined);
    };

    match rule(call) {
        Ok(Some(replacement)) => {
            debug!(from = call.tag(), to = replacement.tag(), "rule applied");
            *node = replacement;
            Ok(Reduction::Replaced)
        }
        Ok(None) => {
            debug!(tag = call.tag(), "rule declined");
            Ok(Reduction::Declined)
        }
        Err(error) => {
            warn!(%error, "rule failed");
            if let Some(slot) = call.children_mut().get_mut(error.operand()) {
                slot.set_error(error.to_string());
            }
            Err(error)
        }
    }
}

/// Reduce every call in the tree, children before parents.
///
/// A failure stops reduction of the enclosing calls but not of unrelated
/// subtrees. Returns every failure in the order it happened.
pub fn normalize(root: &mut Node) -> Vec<RewriteError> {
    let mut errors = Vec::new();
    normalize_into(root, &mut errors);
    errors
}

fn normalize_into(node: &mut Node, errors: &mut Vec<RewriteError>) -> bool {
    let mut ok = true;
    for slot in node.children_mut() {
        ok &= normalize_into(&mut slot.node, errors);
    }
    if !ok {
        return false;
    }
    match reduce(node) {
        Ok(_) => true,
        Err(error) => {
            errors.push(error);
            false
        }
    }
}

// ============================================================================
// Operand readers
// ============================================================================

fn integer_operand(call: &Call, index: usize) -> Option<i64> {
    match call.argument(index) {
        Some(Node::Number(number)) => number.native_integer(),
        _ => None,
    }
}

/// `Ok(None)` when the optional operand is absent.
fn boolean_operand(call: &Call, index: usize) -> Result<Option<bool>, RewriteError> {
    match call.argument(index) {
        None => Ok(None),
        Some(Node::Boolean(boolean)) => Ok(Some(boolean.value())),
        Some(_) => Err(RewriteError::TypeMismatch {
            function: call.function().tag,
            operand: index,
            expected: "a boolean",
        }),
    }
}

fn invalid(call: &Call, operand: usize, message: &str) -> RewriteError {
    RewriteError::InvalidArgument {
        function: call.function().tag,
        operand,
        message: message.to_string(),
    }
}

/// Take the decorated operand out of the call.
fn target(call: &mut Call) -> Node {
    call.children_mut()[0].take()
}

// ============================================================================
// Rules
// ============================================================================

fn create_rectangle(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let pixels = |index| integer_operand(call, index).and_then(|v| i32::try_from(v).ok());

    let sizes = 1..=defaults::MAX_PIXEL_SIZE;

    let width = pixels(0)
        .filter(|w| sizes.contains(w))
        .ok_or_else(|| invalid(call, 0, "width must be a positive integer within the pixel limit"))?;
    let height = pixels(1)
        .filter(|h| sizes.contains(h))
        .ok_or_else(|| invalid(call, 1, "height must be a positive integer within the pixel limit"))?;
    let horz_baseline = pixels(2)
        .filter(|b| (0..=height).contains(b))
        .ok_or_else(|| invalid(call, 2, "horizontal baseline must lie between 0 and the height"))?;
    let vert_baseline = pixels(3)
        .filter(|b| (0..=width).contains(b))
        .ok_or_else(|| invalid(call, 3, "vertical baseline must lie between 0 and the width"))?;

    Ok(Some(Rectangle::new(width, height, horz_baseline, vert_baseline).into()))
}

fn set_color(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let color = match call.argument(1) {
        Some(Node::ColorValue(value)) => value.color(),
        _ => {
            return Err(RewriteError::TypeMismatch {
                function: call.function().tag,
                operand: 1,
                expected: "a color",
            });
        }
    };
    if !color.is_valid() {
        return Err(invalid(call, 1, "color channels must lie between 0 and 1"));
    }
    Ok(Some(Color::new(color, target(call)).into()))
}

fn set_bold_italic(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let value = boolean_operand(call, 1)?.unwrap_or(true);
    let is_set = boolean_operand(call, 2)?.unwrap_or(true);
    let toggle = Toggle::new(value, is_set);

    let node = if call.tag() == SET_BOLD {
        Bold::new(toggle, target(call)).into()
    } else {
        Italic::new(toggle, target(call)).into()
    };
    Ok(Some(node))
}

fn set_font_size(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let absolute = call.tag() == SET_FONT_SIZE;
    let Some(parameter) = integer_operand(call, 1) else {
        return Err(invalid(call, 1, "expected an integer"));
    };

    let node = if absolute {
        if parameter <= 0 {
            return Err(invalid(call, 1, "font size must be positive"));
        }
        FontSize::new(parameter as f64, target(call)).into()
    } else {
        FontSizeIncrement::new(parameter as f64, target(call)).into()
    };
    Ok(Some(node))
}

fn set_font_name(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let name = match call.argument(1) {
        Some(Node::Str(name)) => name.value().to_string(),
        _ => {
            return Err(RewriteError::TypeMismatch {
                function: call.function().tag,
                operand: 1,
                expected: "a string",
            });
        }
    };
    if name.is_empty() {
        return Err(invalid(call, 1, "font name is empty"));
    }
    Ok(Some(FontName::new(name, target(call)).into()))
}

fn create_infix(call: &mut Call) -> Result<Option<Node>, RewriteError> {
    let Some(Node::Str(operator)) = call.argument(0) else {
        return Ok(None);
    };
    let Some(operands) = call.argument(1) else {
        return Ok(None);
    };
    let operands: Vec<Node> = operands.children().iter().map(|slot| (*slot.node).clone()).collect();
    match Infix::new(operator.value(), operands) {
        Ok(infix) => Ok(Some(infix.into())),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Boolean, ColorValue, Field, FieldValue, Fields, List, Number, Str, Symbol};
    use crate::types::Rgba;

    fn call(tag: &str, arguments: Vec<Node>) -> Node {
        Node::from_tag(tag, arguments).unwrap()
    }

    fn num(v: f64) -> Node {
        Number::new(v).into()
    }

    fn x() -> Node {
        Symbol::new("x").into()
    }

    #[test]
    fn every_function_has_a_rule() {
        for function in crate::node::FUNCTIONS {
            assert!(reducer_for(function.tag).is_some(), "{}", function.tag);
        }
        assert!(reducer_for("Visualization.Bold").is_none());
    }

    #[test]
    fn create_rectangle_accepts_baselines_on_the_edge() {
        let mut node = call(CREATE_RECTANGLE, vec![num(10.0), num(20.0), num(20.0), num(10.0)]);
        assert_eq!(reduce(&mut node), Ok(Reduction::Replaced));
        assert_eq!(node.tag(), Rectangle::TAG);
        assert_eq!(node.field(Field::Height), Ok(FieldValue::Int(20)));
    }

    #[test]
    fn create_rectangle_rejects_baseline_past_height() {
        let mut node = call(CREATE_RECTANGLE, vec![num(10.0), num(20.0), num(21.0), num(5.0)]);
        let err = reduce(&mut node).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidArgument { operand: 2, .. }));
        assert!(node.children()[2].is_in_error());
        assert!(!node.children()[3].is_in_error());
        assert_eq!(node.tag(), CREATE_RECTANGLE);
    }

    #[test]
    fn create_rectangle_rejects_baseline_past_width() {
        let mut node = call(CREATE_RECTANGLE, vec![num(10.0), num(20.0), num(0.0), num(11.0)]);
        assert_eq!(reduce(&mut node).unwrap_err().operand(), 3);
    }

    #[test]
    fn create_rectangle_rejects_sizes_past_the_pixel_limit() {
        let mut node = call(CREATE_RECTANGLE, vec![num(2147483647.0), num(1.0), num(0.0), num(0.0)]);
        let err = reduce(&mut node).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidArgument { operand: 0, .. }));
        assert!(node.children()[0].is_in_error());

        let limit = f64::from(defaults::MAX_PIXEL_SIZE);
        let mut node = call(CREATE_RECTANGLE, vec![num(1.0), num(limit + 1.0), num(0.0), num(0.0)]);
        assert_eq!(reduce(&mut node).unwrap_err().operand(), 1);

        let mut node = call(CREATE_RECTANGLE, vec![num(limit), num(limit), num(0.0), num(0.0)]);
        assert_eq!(reduce(&mut node), Ok(Reduction::Replaced));
    }

    #[test]
    fn create_rectangle_names_first_bad_operand() {
        let mut node = call(CREATE_RECTANGLE, vec![num(0.0), num(-1.0), num(0.5), x()]);
        assert_eq!(reduce(&mut node).unwrap_err().operand(), 0);

        let mut node = call(CREATE_RECTANGLE, vec![num(3.0), num(2.5), num(0.0), num(0.0)]);
        assert_eq!(reduce(&mut node).unwrap_err().operand(), 1);
    }

    #[test]
    fn set_color_copies_channels() {
        let color = Rgba::new(0.25, 0.5, 0.75, 1.0);
        let mut node = call(SET_COLOR, vec![x(), ColorValue::new(color).into()]);
        reduce(&mut node).unwrap();
        match &node {
            Node::Color(c) => assert_eq!(c.color(), color),
            other => panic!("expected a color node, got {}", other.tag()),
        }
        assert_eq!(node.child(0).map(|n| n.tag()), Some(Symbol::TAG));
    }

    #[test]
    fn set_color_requires_a_color() {
        let mut node = call(SET_COLOR, vec![x(), num(1.0)]);
        let err = reduce(&mut node).unwrap_err();
        assert!(matches!(err, RewriteError::TypeMismatch { operand: 1, .. }));
        assert!(node.children()[1].is_in_error());
    }

    #[test]
    fn set_color_rejects_channels_outside_unit_interval() {
        let color = Rgba::new(0.25, 1.5, 0.75, 1.0);
        let mut node = call(SET_COLOR, vec![x(), ColorValue::new(color).into()]);
        let err = reduce(&mut node).unwrap_err();
        assert!(matches!(err, RewriteError::InvalidArgument { operand: 1, .. }));
        assert_eq!(node.tag(), SET_COLOR);
    }

    #[test]
    fn set_bold_defaults_to_set_true() {
        let mut node = call(SET_BOLD, vec![x()]);
        reduce(&mut node).unwrap();
        assert_eq!(node.field(Field::Value), Ok(FieldValue::Bool(true)));
        assert_eq!(node.field(Field::Set), Ok(FieldValue::Bool(true)));
    }

    #[test]
    fn set_italic_reads_boolean_operands() {
        let mut node = call(SET_ITALIC, vec![x(), Boolean::new(false).into(), Boolean::new(false).into()]);
        reduce(&mut node).unwrap();
        assert_eq!(node.tag(), Italic::TAG);
        assert_eq!(node.field(Field::Value), Ok(FieldValue::Bool(false)));
        assert_eq!(node.field(Field::Set), Ok(FieldValue::Bool(false)));
    }

    #[test]
    fn set_bold_rejects_non_boolean() {
        let mut node = call(SET_BOLD, vec![x(), Boolean::new(true).into(), num(1.0)]);
        let err = reduce(&mut node).unwrap_err();
        assert!(matches!(err, RewriteError::TypeMismatch { operand: 2, .. }));
    }

    #[test]
    fn font_size_must_be_positive_integer() {
        let mut node = call(SET_FONT_SIZE, vec![x(), num(0.0)]);
        assert!(reduce(&mut node).is_err());

        let mut node = call(SET_FONT_SIZE, vec![x(), num(12.5)]);
        assert!(reduce(&mut node).is_err());

        let mut node = call(SET_FONT_SIZE, vec![x(), num(12.0)]);
        reduce(&mut node).unwrap();
        assert_eq!(node.field(Field::Size), Ok(FieldValue::Float(12.0)));
    }

    #[test]
    fn font_size_increment_may_be_negative() {
        let mut node = call(SET_FONT_SIZE_INCREMENT, vec![x(), num(-3.0)]);
        reduce(&mut node).unwrap();
        assert_eq!(node.field(Field::Increment), Ok(FieldValue::Float(-3.0)));
    }

    #[test]
    fn set_font_name_requires_non_empty_string() {
        let mut node = call(SET_FONT_NAME, vec![x(), Symbol::new("Arial").into()]);
        assert!(matches!(reduce(&mut node), Err(RewriteError::TypeMismatch { .. })));

        let mut node = call(SET_FONT_NAME, vec![x(), Str::new("").into()]);
        assert!(matches!(reduce(&mut node), Err(RewriteError::InvalidArgument { .. })));

        let mut node = call(SET_FONT_NAME, vec![x(), Str::new("Courier").into()]);
        reduce(&mut node).unwrap();
        assert_eq!(node.field(Field::Name), Ok(FieldValue::Text("Courier".into())));
    }

    #[test]
    fn create_infix_declines_instead_of_failing() {
        let operands: Node = List::new(vec![x(), x()]).into();
        let mut node = call(CREATE_INFIX, vec![x(), operands]);
        assert_eq!(reduce(&mut node), Ok(Reduction::Declined));
        assert!(!node.has_errors());

        let short: Node = List::new(vec![x()]).into();
        let mut node = call(CREATE_INFIX, vec![Str::new("+").into(), short]);
        assert_eq!(reduce(&mut node), Ok(Reduction::Declined));
    }

    #[test]
    fn create_infix_clones_operands() {
        let operands: Node = List::new(vec![x(), num(2.0), x()]).into();
        let mut node = call(CREATE_INFIX, vec![Str::new("+").into(), operands]);
        assert_eq!(reduce(&mut node), Ok(Reduction::Replaced));
        assert_eq!(node.tag(), Infix::TAG);
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.field(Field::Operator), Ok(FieldValue::Text("+".into())));
    }

    #[test]
    fn normalize_reduces_inside_out() {
        let inner = call(SET_BOLD, vec![x()]);
        let mut root = call(SET_COLOR, vec![inner, ColorValue::new(Rgba::WHITE).into()]);
        let errors = normalize(&mut root);
        assert!(errors.is_empty());
        assert_eq!(root.tag(), Color::TAG);
        assert_eq!(root.child(0).map(|n| n.tag()), Some(Bold::TAG));
    }

    #[test]
    fn normalize_stops_above_a_failure() {
        let bad = call(SET_FONT_SIZE, vec![x(), num(-1.0)]);
        let mut root = call(SET_BOLD, vec![bad]);
        let errors = normalize(&mut root);
        assert_eq!(errors.len(), 1);
        assert_eq!(root.tag(), SET_BOLD);
        assert!(root.has_errors());
    }
}
