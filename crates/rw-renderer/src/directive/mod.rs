//! Directive and role extension API.
//!
//! Block directives use container syntax with a body, or leaf syntax
//! without one:
//!
//! ```text
//! :::name[arguments]{#id .class key=value flag}
//! Body parsed as markdown.
//! :::
//!
//! ::name[arguments]{key=value}
//! ```
//!
//! Roles appear inside running text: `:name[raw text]`.
//!
//! # Processing model
//!
//! 1. **Pre-pass**: registered invocations are cut out of the source and
//!    replaced with placeholder tokens. Fenced code is left alone.
//! 2. **Tree building**: pulldown-cmark parses the rewritten source; each
//!    token is resolved by calling its [`BlockDirective`] or [`Role`], whose
//!    nodes are spliced into the tree. Tokens that end up in verbatim text
//!    (code spans, indented code) are restored to the original markup.
//!
//! Handler failures are isolated: the invocation is reported as a
//! [`Diagnostic`](crate::Diagnostic) and kept as raw source.
//!
//! # Example
//!
//! ```
//! use rw_renderer::{Node, NodeKind, Registry, Renderer};
//! use rw_renderer::directive::{DirectiveError, DirectiveOutput, Role, RoleContext};
//!
//! struct KbdRole;
//!
//! impl Role for KbdRole {
//!     fn name(&self) -> &str { "kbd" }
//!
//!     fn run(&self, text: &str, _ctx: &RoleContext<'_>) -> Result<DirectiveOutput, DirectiveError> {
//!         Ok(DirectiveOutput::node(Node::new(NodeKind::Code(text.to_owned()))))
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_role(KbdRole).unwrap();
//!
//! let result = Renderer::new(registry).render_markdown("Press :kbd[Ctrl+C] to copy.").unwrap();
//! assert_eq!(result.html, "<p>Press <code>Ctrl+C</code> to copy.</p>");
//! ```

mod args;
mod block;
mod context;
mod error;
mod output;
mod parser;
pub(crate) mod processor;
mod role;

pub use args::DirectiveArgs;
pub(crate) use block::validate;
pub use block::{BlockDirective, Invocation, OptionKind, OptionSpec};
pub use context::{DirectiveContext, RoleContext};
pub use error::DirectiveError;
pub use output::DirectiveOutput;
pub use role::Role;
