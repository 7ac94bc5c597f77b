//! HTML visitors for microdata nodes.

use std::fmt::Write;

use rw_renderer::{HtmlWriter, Node, RenderError, escape_html};

use crate::{ItemProp, ItemScope};

pub(crate) fn scope_enter(w: &mut HtmlWriter, node: &Node) -> Result<(), RenderError> {
    let scope = node
        .downcast::<ItemScope>()
        .ok_or(RenderError::NodeMismatch {
            expected: ItemScope::KIND,
        })?;

    let mut tag = format!("<{}", scope.tag());
    if let Some(id) = scope.id() {
        write!(tag, r#" id="{}""#, escape_html(id)).unwrap();
    }
    if !scope.classes().is_empty() {
        write!(tag, r#" class="{}""#, escape_html(&scope.classes().join(" "))).unwrap();
    }
    write!(tag, r#" itemscope itemtype="{}""#, escape_html(scope.itemtype())).unwrap();
    if let Some(itemprop) = scope.itemprop() {
        write!(tag, r#" itemprop="{}""#, escape_html(itemprop)).unwrap();
    }
    tag.push('>');

    w.open(&tag, format!("</{}>", scope.tag()));
    Ok(())
}

pub(crate) fn prop_enter(w: &mut HtmlWriter, node: &Node) -> Result<(), RenderError> {
    let prop = node
        .downcast::<ItemProp>()
        .ok_or(RenderError::NodeMismatch {
            expected: ItemProp::KIND,
        })?;

    let name = escape_html(prop.name());
    match prop.href() {
        Some(href) => w.open(
            &format!(r#"<a itemprop="{name}" href="{}">"#, escape_html(href)),
            "</a>",
        ),
        None => w.open(&format!(r#"<span itemprop="{name}">"#), "</span>"),
    }
    Ok(())
}

/// Closes whatever the matching enter visitor opened.
pub(crate) fn exit(w: &mut HtmlWriter, _node: &Node) -> Result<(), RenderError> {
    w.close();
    Ok(())
}

/// Paragraphs directly inside a compact scope render without `<p>`.
pub(crate) fn is_compact_scope_paragraph(paragraph: &Node, parent: Option<&Node>) -> bool {
    paragraph.is_paragraph()
        && parent
            .and_then(Node::downcast::<ItemScope>)
            .is_some_and(ItemScope::compact)
}
