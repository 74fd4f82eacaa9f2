//! Read and write the textual tree notation
//!
//! A node is written as its tag, an optional bracketed attribute list and an
//! optional parenthesized child list:
//!
//! ```text
//! Visualization.Bold[Value="True", Set="False"](Symbolic.Symbol[Name="x"])
//! ```
//!
//! Attributes are the node's serialized fields. Missing attributes keep the
//! defaults [`Node::from_tag`] gives.

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::errors::{FieldError, NotationError};
use crate::node::{Field, Fields, Node, Visual};
use crate::{NotationParser, Rule};

/// Name diagnostics use when the caller gives none.
const ANONYMOUS: &str = "<input>";

/// Read a tree from `source`.
pub fn parse(source: &str) -> Result<Node, NotationError> {
    parse_named(ANONYMOUS, source)
}

/// Read a tree from `source`, naming it `name` in diagnostics.
pub fn parse_named(name: &str, source: &str) -> Result<Node, NotationError> {
    let reader = Reader { name, source };
    let pairs = NotationParser::parse(Rule::document, source).map_err(|e| reader.syntax(e))?;

    let root = pairs
        .flat_map(|pair| pair.into_inner())
        .find(|pair| pair.as_rule() == Rule::node);
    match root {
        Some(pair) => reader.read_node(pair),
        None => Err(NotationError::Syntax {
            message: "expected a node".to_string(),
            src: reader.src(),
            span: SourceSpan::from((0, source.len())),
        }),
    }
}

struct Reader<'a> {
    name: &'a str,
    source: &'a str,
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from((span.start(), span.end() - span.start()))
}

impl Reader<'_> {
    fn src(&self) -> NamedSource<String> {
        NamedSource::new(self.name, self.source.to_string())
    }

    fn syntax(&self, error: pest::error::Error<Rule>) -> NotationError {
        let span = match error.location {
            InputLocation::Pos(pos) => SourceSpan::from((pos, 0)),
            InputLocation::Span((start, end)) => SourceSpan::from((start, end - start)),
        };
        NotationError::Syntax {
            message: error.variant.message().into_owned(),
            src: self.src(),
            span,
        }
    }

    fn read_node(&self, pair: Pair<'_, Rule>) -> Result<Node, NotationError> {
        let span = span_of(&pair);
        let mut tag = "";
        let mut attributes = None;
        let mut children = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::tag => tag = inner.as_str(),
                Rule::attributes => attributes = Some(inner),
                Rule::children => {
                    for child in inner.into_inner() {
                        children.push(self.read_node(child)?);
                    }
                }
                _ => {}
            }
        }

        let mut node = Node::from_tag(tag, children).map_err(|error| NotationError::Structure {
            error,
            src: self.src(),
            span,
        })?;
        if let Some(attributes) = attributes {
            self.apply_attributes(&mut node, attributes)?;
        }
        Ok(node)
    }

    /// Overlay the given attributes on the node's current serialized fields.
    fn apply_attributes(&self, node: &mut Node, pair: Pair<'_, Rule>) -> Result<(), NotationError> {
        let span = span_of(&pair);
        let field_error = |error| NotationError::Field {
            error,
            src: self.src(),
            span,
        };

        let declared = node.fields();
        let mut strings = node.serialization_strings().map_err(field_error)?;
        let mut given: Vec<Field> = Vec::new();

        for attribute in pair.into_inner() {
            let attribute_span = span_of(&attribute);
            let mut parts = attribute.into_inner();
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };

            let slot = name
                .as_str()
                .parse::<Field>()
                .ok()
                .and_then(|field| declared.iter().position(|d| *d == field).map(|i| (field, i)));
            let Some((field, index)) = slot else {
                return Err(field_error(FieldError::UnknownField {
                    tag: node.tag(),
                    field: name.as_str().to_string(),
                }));
            };
            if given.contains(&field) {
                return Err(NotationError::DuplicateAttribute {
                    name: field.to_string(),
                    src: self.src(),
                    span: attribute_span,
                });
            }
            given.push(field);

            let raw = value.into_inner().next().map_or("", |inner| inner.as_str());
            strings[index] = unescape(raw);
        }

        node.set_serialization_strings(&strings).map_err(field_error)
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write `node` and its subtree in the notation [`parse`] reads.
pub fn to_notation(node: &Node) -> Result<String, FieldError> {
    let mut out = String::new();
    write_node(node, &mut out)?;
    Ok(out)
}

fn write_node(node: &Node, out: &mut String) -> Result<(), FieldError> {
    out.push_str(node.tag());

    let names = node.serialization_names();
    if !names.is_empty() {
        let values = node.serialization_strings()?;
        out.push('[');
        for (i, (name, value)) in names.iter().zip(&values).enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push(']');
    }

    let children = node.children();
    if !children.is_empty() {
        out.push('(');
        for (i, slot) in children.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_node(&slot.node, out)?;
        }
        out.push(')');
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StructureError;
    use crate::node::{Bold, FieldValue, Infix, Number, Rectangle, Str, Symbol, Toggle};

    #[test]
    fn reads_nested_decorations() {
        let node = parse(r#"Visualization.Bold[Value="True", Set="False"](Symbolic.Symbol[Name="x"])"#).unwrap();
        assert_eq!(node.tag(), Bold::TAG);
        assert_eq!(node.field(Field::Set), Ok(FieldValue::Bool(false)));
        let child = node.child(0).unwrap();
        assert_eq!(child.field(Field::Name), Ok(FieldValue::Text("x".into())));
    }

    #[test]
    fn missing_attributes_keep_defaults() {
        let node = parse(r#"Visualization.Bold[Value="False"](Null)"#).unwrap();
        assert_eq!(node.field(Field::Value), Ok(FieldValue::Bool(false)));
        assert_eq!(node.field(Field::Set), Ok(FieldValue::Bool(true)));
    }

    #[test]
    fn comments_and_whitespace_are_ignored() {
        let source = "
            # a rectangle inside an array
            Visualization.HorizontalArray(
                Visualization.Rectangle[Width=\"3\"],
                Null
            )
        ";
        let node = parse(source).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.child(0).unwrap().field(Field::Width), Ok(FieldValue::Int(3)));
    }

    #[test]
    fn escapes_survive_a_round_trip() {
        let node: Node = Str::new(r#"say "hi" \ bye"#).into();
        let written = to_notation(&node).unwrap();
        assert_eq!(written, r#"String.String[Value="say \"hi\" \\ bye"]"#);
        assert_eq!(parse(&written).unwrap(), node);
    }

    #[test]
    fn written_trees_read_back_equal() {
        let node: Node = Bold::new(
            Toggle::new(false, true),
            Infix::new(
                "+",
                vec![
                    Number::new(0.25).into(),
                    Rectangle::new(10, 20, 5, 3).into(),
                    Symbol::new("y").into(),
                ],
            )
            .unwrap()
            .into(),
        )
        .into();
        let written = to_notation(&node).unwrap();
        assert_eq!(parse(&written).unwrap(), node);
    }

    #[test]
    fn unknown_attribute_is_an_error() {
        let err = parse(r#"Visualization.Key[Size="3"](Null)"#).unwrap_err();
        assert!(matches!(
            err,
            NotationError::Field {
                error: FieldError::UnknownField { .. },
                ..
            }
        ));
    }

    #[test]
    fn duplicate_attribute_is_an_error() {
        let err = parse(r#"Symbolic.Symbol[Name="a", Name="b"]"#).unwrap_err();
        match err {
            NotationError::DuplicateAttribute { name, span, .. } => {
                assert_eq!(name, "Name");
                assert_eq!(span.offset(), 26);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn arity_errors_point_at_the_node() {
        let err = parse("Visualization.Key(Null, Null)").unwrap_err();
        match err {
            NotationError::Structure { error, span, .. } => {
                assert!(matches!(error, StructureError::Arity { got: 2, .. }));
                assert_eq!(span.offset(), 0);
                assert_eq!(span.len(), 29);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_source_is_a_syntax_error() {
        let err = parse("Visualization.Key(Null").unwrap_err();
        assert!(matches!(err, NotationError::Syntax { .. }));
        assert!(parse(r#"Symbolic.Symbol[Name=x]"#).is_err());
    }
}
