//! Edition and action commands
//!
//! An [`Edition`] inserts a new node around the current selection; an
//! [`Action`] edits the fields of an existing decoration. Both ask for values
//! through [`Forms`], a synchronous value provider supplied by the host.
//! A form returning `None` was dismissed and leaves the tree untouched.

use crate::errors::{EditionError, FieldError, StructureError};
use crate::log::debug;
use crate::node::{
    self, Bold, Color, CrossedOut, Field, FieldValue, Fields, FontName, FontSize, FontSizeIncrement, HorizontalArray,
    Italic, Key, Metrics, Node, Parentheses, Selected, Spurious, Toggle, VerticalArray,
};
use crate::node::fields::checked_color;
use crate::render::defaults;
use crate::rewrite;
use crate::types::Rgba;

/// Kind of editor row a command is invoked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Input,
    /// Read-only evaluation result.
    Output,
}

/// Value provider for commands that need user input
pub trait Forms {
    fn select_color(&mut self, initial: Rgba) -> Option<Rgba>;

    fn select_toggle(&mut self, initial: Toggle) -> Option<Toggle>;

    /// Pick an integer in `min..=max`; `None` bounds are open.
    fn select_integer(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>, initial: i64) -> Option<i64>;

    fn prompt_text(&mut self, prompt: &str, initial: &str) -> Option<String>;
}

const FONT_SIZE_PROMPT: &str = "Font size";
const FONT_SIZE_INCREMENT_PROMPT: &str = "Font size increment";
const FONT_NAME_PROMPT: &str = "Font name";

/// Ask for a font name until the answer is non-empty or the form is dismissed.
fn prompt_font_name(forms: &mut dyn Forms, initial: &str) -> Option<String> {
    let mut answer = initial.to_string();
    loop {
        answer = forms.prompt_text(FONT_NAME_PROMPT, &answer)?;
        if !answer.is_empty() {
            return Some(answer);
        }
    }
}

// ============================================================================
// Editions
// ============================================================================

/// How an edition builds its node around the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edition {
    /// The selection becomes the only child.
    Wrapper(&'static str),
    /// The selection becomes the first child, a placeholder the second.
    Binary(&'static str),
    /// `slots` children, all placeholders except the selection at `selection`.
    Multiple {
        tag: &'static str,
        slots: usize,
        selection: usize,
    },
    Color,
    Bold,
    Italic,
    FontSize,
    FontSizeIncrement,
    FontName,
}

/// A registered edition with its menu placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionEntry {
    pub path: &'static str,
    pub name: &'static str,
    pub edition: Edition,
}

const fn entry(path: &'static str, name: &'static str, edition: Edition) -> EditionEntry {
    EditionEntry { path, name, edition }
}

const VISUALIZATION: &str = "Visualization";
const REFLECTION: &str = "Reflection";

/// Every edition, in menu order.
pub const EDITIONS: &[EditionEntry] = &[
    entry(VISUALIZATION, "Crossed out", Edition::Wrapper(CrossedOut::TAG)),
    entry(VISUALIZATION, "Metrics", Edition::Wrapper(Metrics::TAG)),
    entry(
        VISUALIZATION,
        "Create rectangle",
        Edition::Multiple {
            tag: rewrite::CREATE_RECTANGLE,
            slots: 4,
            selection: 0,
        },
    ),
    entry(VISUALIZATION, "Selected", Edition::Wrapper(Selected::TAG)),
    entry(VISUALIZATION, "Parentheses", Edition::Wrapper(Parentheses::TAG)),
    entry(VISUALIZATION, "Spurious", Edition::Wrapper(Spurious::TAG)),
    entry(VISUALIZATION, "Key", Edition::Wrapper(Key::TAG)),
    entry(VISUALIZATION, "Horizontal array", Edition::Binary(HorizontalArray::TAG)),
    entry(VISUALIZATION, "Vertical array", Edition::Binary(VerticalArray::TAG)),
    entry(VISUALIZATION, "Color", Edition::Color),
    entry(VISUALIZATION, "Bold", Edition::Bold),
    entry(VISUALIZATION, "Italic", Edition::Italic),
    entry(VISUALIZATION, "Font size", Edition::FontSize),
    entry(VISUALIZATION, "Font size increment", Edition::FontSizeIncrement),
    entry(VISUALIZATION, "Font name", Edition::FontName),
    entry(REFLECTION, "Set color", Edition::Binary(rewrite::SET_COLOR)),
    entry(REFLECTION, "Set bold", Edition::Wrapper(rewrite::SET_BOLD)),
    entry(REFLECTION, "Set italic", Edition::Wrapper(rewrite::SET_ITALIC)),
    entry(REFLECTION, "Set font size", Edition::Binary(rewrite::SET_FONT_SIZE)),
    entry(
        REFLECTION,
        "Set font size increment",
        Edition::Binary(rewrite::SET_FONT_SIZE_INCREMENT),
    ),
    entry(REFLECTION, "Set font name", Edition::Binary(rewrite::SET_FONT_NAME)),
];

/// Fail unless `tag` accepts `count` children.
fn check_arity(tag: &str, count: usize) -> Result<(), StructureError> {
    let (min, max) = node::arity(tag).ok_or_else(|| StructureError::UnknownTag { tag: tag.to_string() })?;
    if count < min || max.is_some_and(|max| count > max) {
        return Err(StructureError::arity(tag, min, max, count));
    }
    Ok(())
}

impl Edition {
    /// Replace `selection` with the new node built around it.
    ///
    /// Returns `Ok(false)` when a form was dismissed. On error the selection
    /// is left as it was.
    pub fn apply(self, selection: &mut Node, forms: &mut dyn Forms) -> Result<bool, EditionError> {
        let build: Box<dyn FnOnce(Node) -> Result<Node, StructureError>> = match self {
            Edition::Wrapper(tag) => {
                check_arity(tag, 1)?;
                Box::new(move |child| Node::wrap(tag, child))
            }
            Edition::Binary(tag) => {
                check_arity(tag, 2)?;
                Box::new(move |child| Node::from_tag(tag, vec![child, Node::placeholder()]))
            }
            Edition::Multiple {
                tag,
                slots,
                selection: index,
            } => {
                check_arity(tag, slots)?;
                Box::new(move |child| {
                    let mut children: Vec<Node> = (0..slots).map(|_| Node::placeholder()).collect();
                    if let Some(slot) = children.get_mut(index) {
                        *slot = child;
                    }
                    Node::from_tag(tag, children)
                })
            }
            Edition::Color => {
                let Some(color) = forms.select_color(Rgba::BLACK) else {
                    return Ok(false);
                };
                let color = checked_color(color)?;
                Box::new(move |child| Ok(Color::new(color, child).into()))
            }
            Edition::Bold => {
                let Some(toggle) = forms.select_toggle(Toggle::default()) else {
                    return Ok(false);
                };
                Box::new(move |child| Ok(Bold::new(toggle, child).into()))
            }
            Edition::Italic => {
                let Some(toggle) = forms.select_toggle(Toggle::default()) else {
                    return Ok(false);
                };
                Box::new(move |child| Ok(Italic::new(toggle, child).into()))
            }
            Edition::FontSize => {
                let initial = defaults::FONT_SIZE as i64;
                let min = Some(defaults::MIN_FORM_FONT_SIZE);
                let Some(size) = forms.select_integer(FONT_SIZE_PROMPT, min, None, initial) else {
                    return Ok(false);
                };
                Box::new(move |child| Ok(FontSize::new(size as f64, child).into()))
            }
            Edition::FontSizeIncrement => {
                let Some(increment) = forms.select_integer(FONT_SIZE_INCREMENT_PROMPT, None, None, 0) else {
                    return Ok(false);
                };
                Box::new(move |child| Ok(FontSizeIncrement::new(increment as f64, child).into()))
            }
            Edition::FontName => {
                let Some(name) = prompt_font_name(forms, "") else {
                    return Ok(false);
                };
                Box::new(move |child| Ok(FontName::new(name, child).into()))
            }
        };

        *selection = build(selection.clone())?;
        debug!(tag = node::Visual::tag(selection), "edition applied");
        Ok(true)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Field edit offered on an existing decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Color,
    Bold,
    Italic,
    FontSize,
    FontSizeIncrement,
    FontName,
}

impl Action {
    /// The action registered for nodes with `tag`.
    pub fn for_tag(tag: &str) -> Option<Action> {
        let action = match tag {
            Color::TAG => Action::Color,
            Bold::TAG => Action::Bold,
            Italic::TAG => Action::Italic,
            FontSize::TAG => Action::FontSize,
            FontSizeIncrement::TAG => Action::FontSizeIncrement,
            FontName::TAG => Action::FontName,
            _ => return None,
        };
        Some(action)
    }

    /// Output rows are read-only.
    pub fn is_available_now(self, row: RowKind) -> bool {
        row != RowKind::Output
    }

    pub fn description(self) -> &'static str {
        match self {
            Action::Color => "Change color...",
            Action::Bold => "Change bold...",
            Action::Italic => "Change italic...",
            Action::FontSize => "Change font size...",
            Action::FontSizeIncrement => "Change font size increment...",
            Action::FontName => "Change font name...",
        }
    }

    /// Edit `node`'s fields through `forms`.
    ///
    /// Returns `Ok(false)` when the form was dismissed.
    pub fn do_action(self, node: &mut Node, forms: &mut dyn Forms) -> Result<bool, FieldError> {
        match self {
            Action::Color => {
                let channels = [Field::Red, Field::Green, Field::Blue, Field::Alpha];
                let mut current = [0.0; 4];
                for (value, field) in current.iter_mut().zip(channels) {
                    *value = node.field(field)?.as_float(field)?;
                }
                let [red, green, blue, alpha] = current;
                let Some(color) = forms.select_color(Rgba::new(red, green, blue, alpha)) else {
                    return Ok(false);
                };
                let color = checked_color(color)?;
                let chosen = [color.red, color.green, color.blue, color.alpha];
                for (field, value) in channels.into_iter().zip(chosen) {
                    node.set_field(field, FieldValue::Float(value))?;
                }
            }
            Action::Bold | Action::Italic => {
                let value = node.field(Field::Value)?.as_bool(Field::Value)?;
                let is_set = node.field(Field::Set)?.as_bool(Field::Set)?;
                let Some(toggle) = forms.select_toggle(Toggle::new(value, is_set)) else {
                    return Ok(false);
                };
                node.set_field(Field::Value, FieldValue::Bool(toggle.value))?;
                node.set_field(Field::Set, FieldValue::Bool(toggle.is_set))?;
            }
            Action::FontSize => {
                let current = node.field(Field::Size)?.as_float(Field::Size)?;
                let min = Some(defaults::MIN_FORM_FONT_SIZE);
                let Some(size) = forms.select_integer(FONT_SIZE_PROMPT, min, None, current.round() as i64) else {
                    return Ok(false);
                };
                node.set_field(Field::Size, FieldValue::Float(size as f64))?;
            }
            Action::FontSizeIncrement => {
                let current = node.field(Field::Increment)?.as_float(Field::Increment)?;
                let Some(increment) =
                    forms.select_integer(FONT_SIZE_INCREMENT_PROMPT, None, None, current.round() as i64)
                else {
                    return Ok(false);
                };
                node.set_field(Field::Increment, FieldValue::Float(increment as f64))?;
            }
            Action::FontName => {
                let current = node.field(Field::Name)?.into_text(Field::Name)?;
                let Some(name) = prompt_font_name(forms, &current) else {
                    return Ok(false);
                };
                node.set_field(Field::Name, FieldValue::Text(name))?;
            }
        }
        debug!(action = self.description(), "action applied");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Symbol, Visual};
    use std::collections::VecDeque;

    /// Answers forms from queues; an empty queue dismisses the form.
    #[derive(Default)]
    struct Scripted {
        colors: VecDeque<Rgba>,
        toggles: VecDeque<Toggle>,
        integers: VecDeque<i64>,
        texts: VecDeque<String>,
        asked: Vec<String>,
    }

    impl Forms for Scripted {
        fn select_color(&mut self, initial: Rgba) -> Option<Rgba> {
            self.asked.push(format!("color {initial}"));
            self.colors.pop_front()
        }

        fn select_toggle(&mut self, initial: Toggle) -> Option<Toggle> {
            self.asked.push(format!("toggle {} {}", initial.value, initial.is_set));
            self.toggles.pop_front()
        }

        fn select_integer(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>, initial: i64) -> Option<i64> {
            self.asked.push(format!("{prompt} {min:?} {max:?} {initial}"));
            self.integers.pop_front()
        }

        fn prompt_text(&mut self, prompt: &str, initial: &str) -> Option<String> {
            self.asked.push(format!("{prompt} {initial:?}"));
            self.texts.pop_front()
        }
    }

    fn selection() -> Node {
        Symbol::new("x").into()
    }

    fn contains_symbol(node: &Node) -> bool {
        let mut found = false;
        node.walk(&mut |n| found |= n.tag() == Symbol::TAG);
        found
    }

    #[test]
    fn wrapper_edition_wraps_selection() {
        let mut node = selection();
        let applied = Edition::Wrapper(Key::TAG).apply(&mut node, &mut Scripted::default());
        assert_eq!(applied, Ok(true));
        assert_eq!(node.tag(), Key::TAG);
        assert_eq!(node.child(0).map(|c| c.tag()), Some(Symbol::TAG));
    }

    #[test]
    fn binary_edition_adds_placeholder() {
        let mut node = selection();
        Edition::Binary(rewrite::SET_COLOR)
            .apply(&mut node, &mut Scripted::default())
            .unwrap();
        assert_eq!(node.tag(), rewrite::SET_COLOR);
        assert!(node.child(1).is_some_and(Node::is_placeholder));
    }

    #[test]
    fn multiple_edition_puts_selection_in_its_slot() {
        let mut node = selection();
        let edition = Edition::Multiple {
            tag: rewrite::CREATE_RECTANGLE,
            slots: 4,
            selection: 0,
        };
        edition.apply(&mut node, &mut Scripted::default()).unwrap();
        let tags: Vec<&str> = node.children().iter().map(|s| s.node.tag()).collect();
        assert_eq!(tags, [Symbol::TAG, "Null", "Null", "Null"]);
    }

    #[test]
    fn dismissed_form_leaves_selection() {
        let mut node = selection();
        let mut forms = Scripted::default();
        assert_eq!(Edition::Color.apply(&mut node, &mut forms), Ok(false));
        assert_eq!(node.tag(), Symbol::TAG);
        assert_eq!(forms.asked, ["color rgba(0%,0%,0%,1)"]);
    }

    #[test]
    fn font_size_edition_offers_minimum_six() {
        let mut node = selection();
        let mut forms = Scripted {
            integers: VecDeque::from([18]),
            ..Default::default()
        };
        Edition::FontSize.apply(&mut node, &mut forms).unwrap();
        assert_eq!(forms.asked, ["Font size Some(6) None 14"]);
        assert_eq!(node.field(Field::Size), Ok(FieldValue::Float(18.0)));
    }

    #[test]
    fn font_name_edition_reprompts_while_empty() {
        let mut node = selection();
        let mut forms = Scripted {
            texts: VecDeque::from([String::new(), "Courier".to_string()]),
            ..Default::default()
        };
        assert_eq!(Edition::FontName.apply(&mut node, &mut forms), Ok(true));
        assert_eq!(forms.asked.len(), 2);
        assert_eq!(node.field(Field::Name), Ok(FieldValue::Text("Courier".into())));
    }

    #[test]
    fn every_registered_edition_builds_a_node() {
        for entry in EDITIONS {
            let mut forms = Scripted {
                colors: VecDeque::from([Rgba::WHITE]),
                toggles: VecDeque::from([Toggle::default()]),
                integers: VecDeque::from([10]),
                texts: VecDeque::from(["Arial".to_string()]),
                ..Default::default()
            };
            let mut node = selection();
            assert_eq!(entry.edition.apply(&mut node, &mut forms), Ok(true), "{}", entry.name);
            assert!(contains_symbol(&node), "{}", entry.name);
        }
    }

    #[test]
    fn bold_action_starts_from_current_fields() {
        let mut node: Node = Bold::new(Toggle::new(false, true), selection()).into();
        let action = Action::for_tag(node.tag()).unwrap();
        let mut forms = Scripted {
            toggles: VecDeque::from([Toggle::new(true, false)]),
            ..Default::default()
        };
        assert_eq!(action.do_action(&mut node, &mut forms), Ok(true));
        assert_eq!(forms.asked, ["toggle false true"]);
        assert_eq!(node.field(Field::Set), Ok(FieldValue::Bool(false)));
    }

    #[test]
    fn color_action_round_trips_channels() {
        let mut node: Node = Color::new(Rgba::new(0.5, 0.5, 0.5, 1.0), selection()).into();
        let mut forms = Scripted {
            colors: VecDeque::from([Rgba::new(1.0, 0.0, 0.0, 0.5)]),
            ..Default::default()
        };
        Action::Color.do_action(&mut node, &mut forms).unwrap();
        assert_eq!(node.field(Field::Alpha), Ok(FieldValue::Float(0.5)));
        assert_eq!(node.field(Field::Red), Ok(FieldValue::Float(1.0)));
    }

    #[test]
    fn color_action_rejects_bad_channel_before_writing() {
        let mut node: Node = Color::new(Rgba::new(0.5, 0.5, 0.5, 1.0), selection()).into();
        let before = node.clone();
        let mut forms = Scripted {
            colors: VecDeque::from([Rgba::new(1.0, 2.0, 0.0, 1.0)]),
            ..Default::default()
        };
        let result = Action::Color.do_action(&mut node, &mut forms);
        assert!(matches!(result, Err(FieldError::OutOfRange { field: "Green", .. })));
        assert_eq!(node, before);
        assert_eq!(node.field(Field::Red), Ok(FieldValue::Float(0.5)));
    }

    #[test]
    fn color_edition_rejects_bad_channel() {
        let mut node = selection();
        let mut forms = Scripted {
            colors: VecDeque::from([Rgba::new(0.0, 0.0, -0.5, 1.0)]),
            ..Default::default()
        };
        let result = Edition::Color.apply(&mut node, &mut forms);
        assert!(matches!(
            result,
            Err(EditionError::Field(FieldError::OutOfRange { field: "Blue", .. }))
        ));
        assert_eq!(node, selection());
    }

    #[test]
    fn failed_edition_keeps_selection() {
        let mut node = selection();
        let result = Edition::Wrapper(HorizontalArray::TAG).apply(&mut node, &mut Scripted::default());
        assert!(matches!(result, Err(EditionError::Structure(StructureError::Arity { .. }))));
        assert_eq!(node, selection());

        let result = Edition::Binary("Nope.Nothing").apply(&mut node, &mut Scripted::default());
        assert!(matches!(result, Err(EditionError::Structure(StructureError::UnknownTag { .. }))));
        assert_eq!(node, selection());
    }

    #[test]
    fn actions_are_unavailable_on_output_rows() {
        assert!(Action::FontName.is_available_now(RowKind::Input));
        assert!(!Action::FontName.is_available_now(RowKind::Output));
        assert_eq!(Action::for_tag(Key::TAG), None);
    }
}
