//! Plain-text writer.
//!
//! Produces readable plain text: blocks are separated by blank lines,
//! headings are underlined, code blocks are indented four spaces, and list
//! items get `-` or `N.` markers. Extension kinds dispatch to their text
//! visitors when registered; otherwise only their children are written.
//!
//! Consecutive compact paragraphs are written on consecutive lines.

use crate::html::is_simple_container_child;
use crate::{Node, NodeKind, Registry, RenderError, RendererConfig};

#[derive(Debug)]
struct ListState {
    next_number: Option<u64>,
}

/// Plain-text output buffer handed to node visitors.
///
/// # Example
///
/// ```
/// use rw_renderer::TextWriter;
///
/// let mut writer = TextWriter::new();
/// writer.push_str("first");
/// writer.end_block();
/// writer.push_str("second");
/// assert_eq!(writer.into_text(), "first\n\nsecond\n");
/// ```
#[derive(Debug, Default)]
pub struct TextWriter {
    lines: Vec<String>,
    current: String,
    needs_blank: bool,
    /// Next block continues the current one (list marker, definition).
    suppress_blank: bool,
    /// Last block was a compact paragraph; the next one joins it.
    compact_run: bool,
    quote_depth: usize,
    indent_stack: Vec<usize>,
    list_stack: Vec<ListState>,
}

impl TextWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append inline text to the current line.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.begin_line();
        self.current.push_str(text);
    }

    /// Finish the current line.
    pub fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let line = std::mem::take(&mut self.current);
            self.lines.push(line.trim_end().to_owned());
        }
    }

    /// Finish the current block; the next block starts after a blank line.
    pub fn end_block(&mut self) {
        self.flush_line();
        self.needs_blank = true;
    }

    /// Consume the writer and return the output.
    #[must_use]
    pub fn into_text(mut self) -> String {
        self.flush_line();
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    fn flush_blank(&mut self) {
        self.compact_run = false;
        if self.suppress_blank {
            self.suppress_blank = false;
            self.needs_blank = false;
            return;
        }
        self.flush_line();
        if self.needs_blank && !self.lines.is_empty() {
            let blank = self.quote_prefix().trim_end().to_owned();
            self.lines.push(blank);
        }
        self.needs_blank = false;
    }

    fn quote_prefix(&self) -> String {
        "> ".repeat(self.quote_depth)
    }

    fn begin_line(&mut self) {
        if self.current.is_empty() {
            self.current = self.quote_prefix();
            let indent: usize = self.indent_stack.iter().sum();
            self.current.push_str(&" ".repeat(indent));
        }
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
    fn children(&self, w: &mut TextWriter, node: &Node) -> Result<(), RenderError> {
        for child in &node.children {
            self.node(w, child, Some(node))?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn node(
        &self,
        w: &mut TextWriter,
        node: &Node,
        parent: Option<&Node>,
    ) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Extension(ext) => {
                let text = self
                    .registry
                    .node(ext.kind())
                    .and_then(|registration| registration.text);
                w.compact_run = false;
                match text {
                    Some(visitors) => {
                        (visitors.enter)(w, node)?;
                        self.children(w, node)?;
                        (visitors.exit)(w, node)
                    }
                    None => self.children(w, node),
                }
            }
            NodeKind::Paragraph => {
                let compact = self.registry.is_compact_paragraph(node, parent)
                    || (self.config.compact_paragraphs && is_simple_container_child(parent));
                if compact && w.compact_run {
                    w.flush_line();
                    w.needs_blank = false;
                } else {
                    w.flush_blank();
                }
                self.children(w, node)?;
                w.flush_line();
                w.needs_blank = true;
                w.compact_run = compact;
                Ok(())
            }
            NodeKind::Heading(level) => {
                w.flush_blank();
                let start = w.lines.len();
                self.children(w, node)?;
                w.flush_line();
                if let Some(line) = w.lines.get(start) {
                    let width = line
                        .chars()
                        .count()
                        .saturating_sub(w.quote_prefix().chars().count());
                    let marker = if *level == 1 { "=" } else { "-" };
                    let underline = format!("{}{}", w.quote_prefix(), marker.repeat(width));
                    w.lines.push(underline);
                }
                w.needs_blank = true;
                Ok(())
            }
            NodeKind::CodeBlock { content, .. } => {
                w.flush_blank();
                for line in content.lines() {
                    w.push_str("    ");
                    w.current.push_str(line);
                    w.flush_line();
                }
                w.needs_blank = true;
                Ok(())
            }
            NodeKind::BlockQuote => {
                w.flush_blank();
                w.quote_depth += 1;
                self.children(w, node)?;
                w.flush_line();
                w.quote_depth -= 1;
                w.needs_blank = true;
                Ok(())
            }
            NodeKind::List(start) => {
                if w.list_stack.is_empty() {
                    w.flush_blank();
                }
                w.list_stack.push(ListState { next_number: *start });
                self.children(w, node)?;
                w.list_stack.pop();
                w.flush_line();
                if w.list_stack.is_empty() {
                    w.needs_blank = true;
                }
                Ok(())
            }
            NodeKind::Item => {
                w.flush_line();
                if w.needs_blank && !w.lines.is_empty() {
                    w.flush_blank();
                }
                let marker = match w.list_stack.last_mut() {
                    Some(ListState {
                        next_number: Some(n),
                    }) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_owned(),
                };
                w.push_str(&marker);
                w.indent_stack.push(marker.len());
                w.suppress_blank = true;
                let result = self.children(w, node);
                w.flush_line();
                w.indent_stack.pop();
                w.suppress_blank = false;
                result
            }
            NodeKind::DefinitionList => {
                w.flush_blank();
                self.children(w, node)?;
                w.end_block();
                Ok(())
            }
            NodeKind::DefinitionListTitle => {
                w.flush_line();
                self.children(w, node)?;
                w.flush_line();
                Ok(())
            }
            NodeKind::DefinitionListDefinition => {
                w.indent_stack.push(4);
                w.suppress_blank = true;
                let result = self.children(w, node);
                w.flush_line();
                w.indent_stack.pop();
                w.suppress_blank = false;
                result
            }
            NodeKind::Table => {
                w.flush_blank();
                self.children(w, node)?;
                w.end_block();
                Ok(())
            }
            NodeKind::TableHead | NodeKind::TableRow => {
                w.flush_line();
                for (index, cell) in node.children.iter().enumerate() {
                    if index > 0 {
                        w.push_str(" | ");
                    }
                    self.children(w, cell)?;
                }
                w.flush_line();
                Ok(())
            }
            NodeKind::Image { .. } => {
                w.push_str(&node.text_content());
                Ok(())
            }
            NodeKind::Text(text) | NodeKind::Code(text) => {
                w.push_str(text);
                Ok(())
            }
            NodeKind::SoftBreak => {
                w.push_str(" ");
                Ok(())
            }
            NodeKind::HardBreak => {
                w.flush_line();
                Ok(())
            }
            NodeKind::Rule => {
                w.flush_blank();
                w.push_str("----");
                w.end_block();
                Ok(())
            }
            NodeKind::TaskListMarker(checked) => {
                w.push_str(if *checked { "[x] " } else { "[ ] " });
                Ok(())
            }
            NodeKind::Problematic { source, block } => {
                if *block {
                    w.flush_blank();
                    for line in source.lines() {
                        w.push_str(line);
                        w.flush_line();
                    }
                    w.needs_blank = true;
                } else {
                    w.push_str(source);
                }
                Ok(())
            }
            NodeKind::Html(_) => Ok(()),
            _ => self.children(w, node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtensionNode, NodeRegistration, Renderer};
    use pretty_assertions::assert_eq;

    fn text(markdown: &str) -> String {
        Renderer::new(Registry::new())
            .render_markdown_text(markdown)
            .unwrap()
    }

    #[test]
    fn test_paragraphs_and_headings() {
        assert_eq!(
            text("# Title\n\nOne *two*\nthree\n\n## Part\n\nEnd"),
            "Title\n=====\n\nOne two three\n\nPart\n----\n\nEnd\n"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(text("- a\n- b\n\nAfter"), "- a\n- b\n\nAfter\n");
        assert_eq!(text("2. x\n3. y"), "2. x\n3. y\n");
    }

    #[test]
    fn test_loose_list() {
        assert_eq!(text("- a\n\n- b"), "- a\n\n- b\n");
    }

    #[test]
    fn test_nested_list_indent() {
        assert_eq!(text("- a\n  - b"), "- a\n  - b\n");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            text("Run:\n\n```sh\nmake\nmake test\n```"),
            "Run:\n\n    make\n    make test\n"
        );
    }

    #[test]
    fn test_block_quote() {
        assert_eq!(text("> one\n>\n> two"), "> one\n>\n> two\n");
    }

    #[test]
    fn test_table() {
        assert_eq!(
            text("| a | b |\n|---|---|\n| 1 | 2 |"),
            "a | b\n1 | 2\n"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(text(""), "");
    }

    #[derive(Debug)]
    struct Boxed;

    impl ExtensionNode for Boxed {
        fn kind(&self) -> &'static str {
            "boxed"
        }
    }

    fn noop_html(_: &mut crate::HtmlWriter, _: &Node) -> Result<(), RenderError> {
        Ok(())
    }

    #[test]
    fn test_extension_children_and_compact_rule() {
        let mut registry = Registry::new();
        registry
            .add_node("boxed", NodeRegistration::html(noop_html, noop_html))
            .unwrap();
        registry.add_compact_paragraph_rule(|_, parent| {
            parent.is_some_and(|p| p.extension_kind() == Some("boxed"))
        });
        let paragraph = |s: &str| Node::new(NodeKind::Paragraph).with_children(vec![Node::text(s)]);
        let doc = Node::new(NodeKind::Document).with_children(vec![
            paragraph("before"),
            Node::extension(Boxed).with_children(vec![paragraph("one"), paragraph("two")]),
            paragraph("after"),
        ]);

        let out = Renderer::new(registry).render_text(&doc).unwrap();
        assert_eq!(out, "before\n\none\ntwo\n\nafter\n");
    }
}
