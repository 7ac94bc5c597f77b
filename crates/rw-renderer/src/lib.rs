//! Extensible markdown renderer.
//!
//! Markdown is parsed with pulldown-cmark into an owned document tree, which
//! the writers turn into HTML or plain text. Extensions plug in through the
//! [`Registry`]:
//!
//! - block directives (`:::name` ... `:::`) and inline roles (`:name[text]`),
//!   see [`directive`];
//! - extension node kinds ([`ExtensionNode`]) with enter/exit visitors per
//!   writer ([`NodeRegistration`]);
//! - compact-paragraph rules that let a paragraph render without its `<p>`
//!   wrapper depending on its parent.
//!
//! # Example
//!
//! ```
//! use rw_renderer::{Registry, Renderer};
//!
//! let renderer = Renderer::new(Registry::new());
//! let result = renderer.render_markdown("# Hello\n\n**Bold** text").unwrap();
//! assert_eq!(result.html, "<h1>Hello</h1><p><strong>Bold</strong> text</p>");
//! assert!(result.warnings.is_empty());
//! ```

mod builder;
mod diagnostic;
pub mod directive;
mod document;
mod fence;
mod html;
mod registry;
mod renderer;
mod state;
mod text;

pub use diagnostic::{Diagnostic, Severity};
pub use document::{ExtensionNode, Node, NodeKind};
pub use html::HtmlWriter;
pub use registry::{
    CompactRule, Extension, NodeRegistration, NodeVisitors, Registry, RegistryError, VisitFn,
};
pub use renderer::{ParseResult, RenderError, RenderResult, Renderer, RendererConfig};
pub use state::escape_html;
pub use text::TextWriter;
