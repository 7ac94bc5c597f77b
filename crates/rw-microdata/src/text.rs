//! Plain-text visitors for microdata nodes.
//!
//! Both kinds add nothing of their own; the writer still renders children,
//! so scopes read as their content and properties as their display text.

use rw_renderer::{Node, RenderError, TextWriter};

pub(crate) fn pass_through(_w: &mut TextWriter, _node: &Node) -> Result<(), RenderError> {
    Ok(())
}
