//! HTML writer.
//!
//! Walks a document tree and produces semantic HTML5. Built-in node kinds are
//! handled here; extension kinds dispatch to the enter/exit visitors in the
//! [`Registry`].
//!
//! Every element pushes its closing markup on a context stack when entered and
//! pops it when left, so visitors never need to remember what they opened.

use std::fmt::Write;

use pulldown_cmark::Alignment;

use crate::state::escape_html;
use crate::{Node, NodeKind, Registry, RenderError, RendererConfig};

/// HTML output buffer handed to node visitors.
///
/// # Example
///
/// ```
/// use rw_renderer::HtmlWriter;
///
/// let mut writer = HtmlWriter::new();
/// writer.open("<em>", "</em>");
/// writer.push_text("a < b");
/// writer.close();
/// assert_eq!(writer.into_body(), "<em>a &lt; b</em>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlWriter {
    body: String,
    context: Vec<String>,
}

impl HtmlWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: String::with_capacity(4096),
            context: Vec::new(),
        }
    }

    /// Append raw markup.
    pub fn push_str(&mut self, markup: &str) {
        self.body.push_str(markup);
    }

    /// Append escaped text.
    pub fn push_text(&mut self, text: &str) {
        self.body.push_str(&escape_html(text));
    }

    /// Append opening markup and remember the markup that closes it.
    pub fn open(&mut self, markup: &str, closing: impl Into<String>) {
        self.body.push_str(markup);
        self.context.push(closing.into());
    }

    /// Remember closing markup without writing anything now.
    pub fn push_context(&mut self, closing: impl Into<String>) {
        self.context.push(closing.into());
    }

    /// Write the most recently remembered closing markup.
    pub fn close(&mut self) {
        if let Some(closing) = self.context.pop() {
            self.body.push_str(&closing);
        }
    }

    /// Output written so far.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the writer and return the output.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    pub(crate) fn write_document(
        &mut self,
        document: &Node,
        registry: &Registry,
        config: &RendererConfig,
    ) -> Result<(), RenderError> {
        let walk = Walk { registry, config };
        match document.kind {
            NodeKind::Document => walk.children(self, document),
            _ => walk.node(self, document, None),
        }
    }
}

struct Walk<'a> {
    registry: &'a Registry,
    config: &'a RendererConfig,
}

impl Walk<'_> {
    fn children(&self, w: &mut HtmlWriter, node: &Node) -> Result<(), RenderError> {
        for child in &node.children {
            self.node(w, child, Some(node))?;
        }
        Ok(())
    }

    fn node(&self, w: &mut HtmlWriter, node: &Node, parent: Option<&Node>) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Extension(ext) => {
                let registration =
                    self.registry
                        .node(ext.kind())
                        .ok_or_else(|| RenderError::UnknownNode {
                            kind: ext.kind().to_owned(),
                        })?;
                (registration.html.enter)(w, node)?;
                self.children(w, node)?;
                (registration.html.exit)(w, node)
            }
            NodeKind::Paragraph => {
                if self.is_compact(node, parent) {
                    w.push_context(String::new());
                } else {
                    w.open("<p>", "</p>");
                }
                self.children(w, node)?;
                w.close();
                Ok(())
            }
            NodeKind::CodeBlock { language, content } => {
                code_block(w, language.as_deref(), content);
                Ok(())
            }
            NodeKind::Image { src, title } => {
                image(w, src, &node.text_content(), title);
                Ok(())
            }
            NodeKind::Text(text) => {
                w.push_text(text);
                Ok(())
            }
            NodeKind::Code(code) => {
                write!(w.body, "<code>{}</code>", escape_html(code)).unwrap();
                Ok(())
            }
            NodeKind::Html(html) => {
                w.push_str(html);
                Ok(())
            }
            NodeKind::SoftBreak => {
                w.push_str("\n");
                Ok(())
            }
            NodeKind::HardBreak => {
                w.push_str("<br>");
                Ok(())
            }
            NodeKind::Rule => {
                w.push_str("<hr>");
                Ok(())
            }
            NodeKind::TaskListMarker(checked) => {
                w.push_str(if *checked {
                    r#"<input type="checkbox" disabled checked>"#
                } else {
                    r#"<input type="checkbox" disabled>"#
                });
                Ok(())
            }
            NodeKind::Problematic { source, block } => {
                let tag = if *block { "pre" } else { "span" };
                write!(
                    w.body,
                    r#"<{tag} class="problematic">{}</{tag}>"#,
                    escape_html(source)
                )
                .unwrap();
                Ok(())
            }
            NodeKind::Document | NodeKind::Group => self.children(w, node),
            kind => {
                start_tag(w, kind);
                self.children(w, node)?;
                w.close();
                Ok(())
            }
        }
    }

    /// Registered rules first, then the built-in heuristic.
    fn is_compact(&self, paragraph: &Node, parent: Option<&Node>) -> bool {
        self.registry.is_compact_paragraph(paragraph, parent)
            || (self.config.compact_paragraphs && is_simple_container_child(parent))
    }
}

/// Whether `parent` is a container whose only child is the paragraph.
pub(crate) fn is_simple_container_child(parent: Option<&Node>) -> bool {
    parent.is_some_and(|p| {
        p.children.len() == 1
            && matches!(
                p.kind,
                NodeKind::Item
                    | NodeKind::BlockQuote
                    | NodeKind::DefinitionListDefinition
                    | NodeKind::Extension(_)
            )
    })
}

/// Open a built-in container element.
fn start_tag(w: &mut HtmlWriter, kind: &NodeKind) {
    match kind {
        NodeKind::Heading(level) => w.open(&format!("<h{level}>"), format!("</h{level}>")),
        NodeKind::BlockQuote => w.open("<blockquote>", "</blockquote>"),
        NodeKind::List(start) => match start {
            Some(1) => w.open("<ol>", "</ol>"),
            Some(n) => w.open(&format!(r#"<ol start="{n}">"#), "</ol>"),
            None => w.open("<ul>", "</ul>"),
        },
        NodeKind::Item => w.open("<li>", "</li>"),
        NodeKind::DefinitionList => w.open("<dl>", "</dl>"),
        NodeKind::DefinitionListTitle => w.open("<dt>", "</dt>"),
        NodeKind::DefinitionListDefinition => w.open("<dd>", "</dd>"),
        NodeKind::Table => w.open("<table>", "</tbody></table>"),
        NodeKind::TableHead => w.open("<thead><tr>", "</tr></thead><tbody>"),
        NodeKind::TableRow => w.open("<tr>", "</tr>"),
        NodeKind::TableCell { header, alignment } => {
            let tag = if *header { "th" } else { "td" };
            let align = alignment_style(*alignment);
            w.open(&format!("<{tag}{align}>"), format!("</{tag}>"));
        }
        NodeKind::Emphasis => w.open("<em>", "</em>"),
        NodeKind::Strong => w.open("<strong>", "</strong>"),
        NodeKind::Strikethrough => w.open("<s>", "</s>"),
        NodeKind::Superscript => w.open("<sup>", "</sup>"),
        NodeKind::Subscript => w.open("<sub>", "</sub>"),
        NodeKind::Link { href, title } => {
            let mut tag = format!(r#"<a href="{}""#, escape_html(href));
            if !title.is_empty() {
                write!(tag, r#" title="{}""#, escape_html(title)).unwrap();
            }
            tag.push('>');
            w.open(&tag, "</a>");
        }
        // Leaf kinds are written directly by the walker
        _ => w.push_context(String::new()),
    }
}

fn alignment_style(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "",
        Alignment::Left => r#" style="text-align: left""#,
        Alignment::Center => r#" style="text-align: center""#,
        Alignment::Right => r#" style="text-align: right""#,
    }
}

fn code_block(w: &mut HtmlWriter, lang: Option<&str>, content: &str) {
    if let Some(lang) = lang {
        write!(
            w.body,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(lang),
            escape_html(content)
        )
        .unwrap();
    } else {
        write!(w.body, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
    }
}

fn image(w: &mut HtmlWriter, src: &str, alt: &str, title: &str) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    write!(
        w.body,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        escape_html(src),
        escape_html(alt)
    )
    .unwrap();
}
