//! Visual decoration nodes for symbolic expression trees.
//!
//! A tree of [`Node`]s is laid out in two phases: `measure` computes each
//! node's box and baselines bottom-up, `paint` draws top-down onto a
//! [`Surface`](render::Surface). Decorations (color, bold, keys, frames, ...)
//! wrap a single child; arrays align several children on a shared baseline.
//! Setter calls such as `Visualization.SetColor` are turned into decorations
//! by the rules in [`rewrite`].
//!
//! ```
//! let svg = exprviz::render_svg(r#"Visualization.Key(Symbolic.Symbol[Name="x"])"#).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

use pest_derive::Parser;

mod log;

pub mod edition;
pub mod errors;
pub mod node;
pub mod notation;
pub mod render;
pub mod rewrite;
pub mod types;

pub use errors::{EditionError, FieldError, NotationError, RewriteError, StructureError, SvgError};
pub use node::{Field, FieldValue, Fields, Node, Slot, Visual};
pub use render::RenderOptions;
pub use types::{Extent, Offset, PaintPoint, Rgba};

#[derive(Parser)]
#[grammar = "notation.pest"]
pub struct NotationParser;

/// Read a tree from its textual notation.
///
/// Returns the root node, or an error with diagnostics.
pub fn parse(source: &str) -> Result<Node, miette::Report> {
    Ok(notation::parse(source)?)
}

/// Read a tree, reduce every setter call in it, and render it to SVG.
///
/// Rule failures do not abort the render; the offending operands are drawn
/// as they are.
pub fn render_svg(source: &str) -> Result<String, miette::Report> {
    let mut root = parse(source)?;
    normalize(&mut root);
    Ok(render::render_svg(&mut root, &RenderOptions::default())?)
}

/// Reduce every setter call in the tree, returning the failures.
pub fn normalize(root: &mut Node) -> Vec<RewriteError> {
    rewrite::normalize(root)
}
