//! Markdown renderer with pluggable directives and node kinds.

use std::path::PathBuf;

use pulldown_cmark::{Options, Parser};

use crate::builder::TreeBuilder;
use crate::directive::processor::preprocess;
use crate::{Diagnostic, HtmlWriter, Node, NodeKind, Registry, TextWriter};

/// Error raised while writing a document tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Extension node kind with no visitors for the active writer.
    #[error("no visitors registered for node kind `{kind}`")]
    UnknownNode {
        /// Node kind name.
        kind: String,
    },
    /// Visitor called with a node of another kind.
    #[error("visitor expected a `{expected}` node")]
    NodeMismatch {
        /// Node kind the visitor handles.
        expected: &'static str,
    },
}

/// Renderer configuration.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    ///
    /// Default: true
    pub gfm: bool,
    /// Render a paragraph without its wrapper when it is the only child of a
    /// list item, block quote, definition, or extension node.
    ///
    /// Default: false
    pub compact_paragraphs: bool,
    /// Maximum directive nesting depth.
    ///
    /// Default: 10
    pub max_nesting_depth: usize,
    /// Path to the source file being rendered (if known).
    pub source_path: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            compact_paragraphs: false,
            max_nesting_depth: 10,
            source_path: None,
        }
    }

    /// Enable or disable GitHub Flavored Markdown.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable the built-in compact paragraph heuristic.
    #[must_use]
    pub fn with_compact_paragraphs(mut self, enabled: bool) -> Self {
        self.compact_paragraphs = enabled;
        self
    }

    /// Set the maximum directive nesting depth.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Set the source file path.
    #[must_use]
    pub fn with_source_path(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }
}

/// Parsed document plus the diagnostics collected while building it.
#[derive(Debug)]
pub struct ParseResult {
    /// Root [`NodeKind::Document`] node.
    pub document: Node,
    /// Problems reported by directives and roles.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Diagnostics generated during parsing (e.g., failed directives).
    pub warnings: Vec<Diagnostic>,
}

/// Markdown renderer.
///
/// Holds the extension [`Registry`] and configuration. Rendering takes
/// `&self`, so one renderer can serve any number of documents.
///
/// # Example
///
/// ```
/// use rw_renderer::{Registry, Renderer};
///
/// let renderer = Renderer::new(Registry::new());
/// let result = renderer.render_markdown("# Hello\n\n**Bold** text").unwrap();
/// assert_eq!(result.html, "<h1>Hello</h1><p><strong>Bold</strong> text</p>");
/// ```
#[derive(Debug)]
pub struct Renderer {
    registry: Registry,
    config: RendererConfig,
}

impl Renderer {
    /// Create a renderer with the default configuration.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, RendererConfig::default())
    }

    /// Create a renderer with a custom configuration.
    #[must_use]
    pub fn with_config(registry: Registry, config: RendererConfig) -> Self {
        Self { registry, config }
    }

    /// Registered extensions.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.config.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Parse markdown into a document tree.
    ///
    /// Failing directives and roles do not fail the parse: they are reported
    /// in [`ParseResult::diagnostics`] and kept as problematic nodes.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> ParseResult {
        let mut diagnostics = Vec::new();
        let children = self.parse_fragment(markdown, 0, 0, &mut diagnostics);
        ParseResult {
            document: Node::new(NodeKind::Document).with_children(children),
            diagnostics,
        }
    }

    /// Parse a document fragment at the given nesting depth.
    pub(crate) fn parse_fragment(
        &self,
        markdown: &str,
        line_offset: usize,
        depth: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Node> {
        let preprocessed = preprocess(markdown, &self.registry, line_offset, diagnostics);
        let parser = Parser::new_ext(&preprocessed.source, self.parser_options());
        TreeBuilder::new(self, depth, &preprocessed.pending, diagnostics).build(parser)
    }

    /// Write a document tree as HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if an extension node has no registered visitors or a
    /// visitor rejects its node.
    pub fn render_html(&self, document: &Node) -> Result<String, RenderError> {
        let mut writer = HtmlWriter::new();
        writer.write_document(document, &self.registry, &self.config)?;
        Ok(writer.into_body())
    }

    /// Write a document tree as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if a registered text visitor rejects its node.
    pub fn render_text(&self, document: &Node) -> Result<String, RenderError> {
        let mut writer = TextWriter::new();
        writer.write_document(document, &self.registry, &self.config)?;
        Ok(writer.into_text())
    }

    /// Parse markdown and write it as HTML.
    ///
    /// # Errors
    ///
    /// See [`render_html`](Self::render_html).
    pub fn render_markdown(&self, markdown: &str) -> Result<RenderResult, RenderError> {
        let parsed = self.parse(markdown);
        let html = self.render_html(&parsed.document)?;
        Ok(RenderResult {
            html,
            warnings: parsed.diagnostics,
        })
    }

    /// Parse markdown and write it as plain text.
    ///
    /// # Errors
    ///
    /// See [`render_text`](Self::render_text).
    pub fn render_markdown_text(&self, markdown: &str) -> Result<String, RenderError> {
        let parsed = self.parse(markdown);
        self.render_text(&parsed.document)
    }
}
