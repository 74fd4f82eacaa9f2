//! Error types with diagnostics using miette
//!
//! Structural and field errors come from building or editing trees, rewrite
//! errors from setter rules, and notation errors carry source spans. SVG
//! errors come from serializing a painted document.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Structure Errors
// ============================================================================

/// Errors raised while assembling a tree
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("unknown tag: {tag}")]
    #[diagnostic(code(exprviz::structure::unknown_tag))]
    UnknownTag { tag: String },

    #[error("{tag} takes {expected} children, got {got}")]
    #[diagnostic(code(exprviz::structure::arity))]
    Arity {
        tag: String,
        expected: String,
        got: usize,
    },
}

impl StructureError {
    pub(crate) fn arity(tag: &str, min: usize, max: Option<usize>, got: usize) -> Self {
        let expected = match max {
            Some(max) if max == min => format!("exactly {min}"),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        StructureError::Arity {
            tag: tag.to_string(),
            expected,
            got,
        }
    }
}

// ============================================================================
// Field Errors
// ============================================================================

/// Errors from field access and from decoding serialized field strings
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("{tag} has no field {field}")]
    #[diagnostic(code(exprviz::field::unknown))]
    UnknownField { tag: &'static str, field: String },

    #[error("field {field} expects {expected}")]
    #[diagnostic(code(exprviz::field::wrong_type))]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid number: {token}")]
    #[diagnostic(code(exprviz::field::invalid_number))]
    InvalidNumber { token: String },

    #[error("invalid boolean: {token}")]
    #[diagnostic(
        code(exprviz::field::invalid_boolean),
        help("only `True` and `False` are recognized")
    )]
    InvalidBoolean { token: String },

    #[error("{tag} serializes {expected} fields, got {got}")]
    #[diagnostic(code(exprviz::field::count))]
    Count {
        tag: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid value for {field}: {message}")]
    #[diagnostic(code(exprviz::field::out_of_range))]
    OutOfRange {
        field: &'static str,
        message: String,
    },
}

// ============================================================================
// Edition Errors
// ============================================================================

/// Errors from inserting a node around the selection
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EditionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Field(#[from] FieldError),
}

// ============================================================================
// Rewrite Errors
// ============================================================================

/// Failure of a single rewrite-rule application.
///
/// `operand` is the zero-based index of the call argument that was marked in
/// error.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("invalid argument {operand} of {function}: {message}")]
    #[diagnostic(code(exprviz::rewrite::invalid_argument))]
    InvalidArgument {
        function: &'static str,
        operand: usize,
        message: String,
    },

    #[error("type mismatch in argument {operand} of {function}: expected {expected}")]
    #[diagnostic(code(exprviz::rewrite::type_mismatch))]
    TypeMismatch {
        function: &'static str,
        operand: usize,
        expected: &'static str,
    },
}

impl RewriteError {
    /// Index of the offending operand.
    pub fn operand(&self) -> usize {
        match self {
            RewriteError::InvalidArgument { operand, .. } | RewriteError::TypeMismatch { operand, .. } => *operand,
        }
    }
}

// ============================================================================
// Notation Errors
// ============================================================================

/// Errors that occur while reading the textual tree notation
#[derive(Error, Diagnostic, Debug)]
pub enum NotationError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(exprviz::notation::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{error}")]
    #[diagnostic(code(exprviz::notation::structure))]
    Structure {
        error: StructureError,
        #[source_code]
        src: NamedSource<String>,
        #[label("in this node")]
        span: SourceSpan,
    },

    #[error("{error}")]
    #[diagnostic(code(exprviz::notation::field))]
    Field {
        error: FieldError,
        #[source_code]
        src: NamedSource<String>,
        #[label("while reading these attributes")]
        span: SourceSpan,
    },

    #[error("duplicate attribute {name}")]
    #[diagnostic(code(exprviz::notation::duplicate_attribute))]
    DuplicateAttribute {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("already given")]
        span: SourceSpan,
    },
}

// ============================================================================
// SVG Errors
// ============================================================================

/// Errors from serializing an SVG document
#[derive(Error, Diagnostic, Debug)]
pub enum SvgError {
    #[error("failed to write SVG: {source}")]
    #[diagnostic(code(exprviz::svg::write))]
    Write {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
