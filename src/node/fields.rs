//! Field names, typed field values and the string serialization boundary

use std::fmt;
use std::str::FromStr;

use super::{Fields, Node, Visual};
use crate::errors::FieldError;
use crate::types::Rgba;

/// Every field any node declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Width,
    Height,
    HorizontalBaseline,
    VerticalBaseline,
    Red,
    Green,
    Blue,
    Alpha,
    Value,
    Set,
    Size,
    Increment,
    Name,
    Operator,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Width,
        Field::Height,
        Field::HorizontalBaseline,
        Field::VerticalBaseline,
        Field::Red,
        Field::Green,
        Field::Blue,
        Field::Alpha,
        Field::Value,
        Field::Set,
        Field::Size,
        Field::Increment,
        Field::Name,
        Field::Operator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Width => "Width",
            Field::Height => "Height",
            Field::HorizontalBaseline => "HorizontalBaseline",
            Field::VerticalBaseline => "VerticalBaseline",
            Field::Red => "Red",
            Field::Green => "Green",
            Field::Blue => "Blue",
            Field::Alpha => "Alpha",
            Field::Value => "Value",
            Field::Set => "Set",
            Field::Size => "Size",
            Field::Increment => "Increment",
            Field::Name => "Name",
            Field::Operator => "Operator",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a field name no node declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldName(pub String);

impl fmt::Display for UnknownFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field name: {}", self.0)
    }
}

impl std::error::Error for UnknownFieldName {}

impl FromStr for Field {
    type Err = UnknownFieldName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFieldName(s.to_string()))
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_int(&self, field: Field) -> Result<i64, FieldError> {
        match self {
            FieldValue::Int(v) => Ok(*v),
            _ => Err(wrong_type(field, "an integer")),
        }
    }

    /// Floats accept integers too.
    pub fn as_float(&self, field: Field) -> Result<f64, FieldError> {
        match self {
            FieldValue::Float(v) => Ok(*v),
            FieldValue::Int(v) => Ok(*v as f64),
            _ => Err(wrong_type(field, "a number")),
        }
    }

    pub fn as_bool(&self, field: Field) -> Result<bool, FieldError> {
        match self {
            FieldValue::Bool(v) => Ok(*v),
            _ => Err(wrong_type(field, "a boolean")),
        }
    }

    pub fn into_text(self, field: Field) -> Result<String, FieldError> {
        match self {
            FieldValue::Text(v) => Ok(v),
            _ => Err(wrong_type(field, "a string")),
        }
    }

    /// Decode `token` as a value of the same kind as `self`.
    pub fn parse_like(&self, token: &str) -> Result<FieldValue, FieldError> {
        let invalid_number = || FieldError::InvalidNumber {
            token: token.to_string(),
        };
        match self {
            FieldValue::Int(_) => token.trim().parse().map(FieldValue::Int).map_err(|_| invalid_number()),
            FieldValue::Float(_) => match token.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(FieldValue::Float(v)),
                _ => Err(invalid_number()),
            },
            FieldValue::Bool(_) => match token {
                "True" => Ok(FieldValue::Bool(true)),
                "False" => Ok(FieldValue::Bool(false)),
                _ => Err(FieldError::InvalidBoolean {
                    token: token.to_string(),
                }),
            },
            FieldValue::Text(_) => Ok(FieldValue::Text(token.to_string())),
        }
    }
}

/// Serialized form: booleans as `True`/`False`, numbers in shortest form.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Bool(true) => f.write_str("True"),
            FieldValue::Bool(false) => f.write_str("False"),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

pub(crate) fn wrong_type(field: Field, expected: &'static str) -> FieldError {
    FieldError::WrongType {
        field: field.as_str(),
        expected,
    }
}

pub(crate) fn out_of_range(field: Field, message: impl Into<String>) -> FieldError {
    FieldError::OutOfRange {
        field: field.as_str(),
        message: message.into(),
    }
}

/// Check that a color channel lies in `[0, 1]`.
pub(crate) fn unit_interval(field: Field, value: &FieldValue) -> Result<f64, FieldError> {
    let v = value.as_float(field)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(out_of_range(field, format!("{v} is outside [0, 1]")))
    }
}

/// `color` unchanged, or an error naming its first channel outside `[0, 1]`.
pub(crate) fn checked_color(color: Rgba) -> Result<Rgba, FieldError> {
    let channels = [
        (Field::Red, color.red),
        (Field::Green, color.green),
        (Field::Blue, color.blue),
        (Field::Alpha, color.alpha),
    ];
    for (field, value) in channels {
        unit_interval(field, &FieldValue::Float(value))?;
    }
    Ok(color)
}

impl Node {
    /// Field names in serialization order.
    pub fn serialization_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.as_str()).collect()
    }

    /// Field values, encoded in the order of [`Node::serialization_names`].
    pub fn serialization_strings(&self) -> Result<Vec<String>, FieldError> {
        self.fields()
            .iter()
            .map(|field| self.field(*field).map(|v| v.to_string()))
            .collect()
    }

    /// Decode `strings`, given in the order of [`Node::serialization_names`].
    ///
    /// Fields are decoded in order; the first malformed token aborts with an
    /// error naming it, leaving earlier fields already set.
    pub fn set_serialization_strings<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<(), FieldError> {
        let fields = self.fields();
        if strings.len() != fields.len() {
            return Err(FieldError::Count {
                tag: self.tag(),
                expected: fields.len(),
                got: strings.len(),
            });
        }
        for (field, token) in fields.iter().zip(strings) {
            let value = self.field(*field)?.parse_like(token.as_ref())?;
            self.set_field(*field, value)?;
        }
        Ok(())
    }

    /// Set one field from its serialized string.
    pub fn set_serialized(&mut self, field: Field, token: &str) -> Result<(), FieldError> {
        let value = self.field(field)?.parse_like(token)?;
        self.set_field(field, value)
    }
}
