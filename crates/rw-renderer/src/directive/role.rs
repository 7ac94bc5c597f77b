//! Inline role trait.
//!
//! Roles use single-colon syntax within running text: `:name[text]`

use super::{DirectiveError, DirectiveOutput, RoleContext};

/// Handler for inline roles: `:name[text]`
///
/// The bracketed text is handed to the role verbatim; markdown inside it is
/// not interpreted. Roles are registered once and shared, so they take
/// `&self` and must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use rw_renderer::{Node, NodeKind};
/// use rw_renderer::directive::{DirectiveError, DirectiveOutput, Role, RoleContext};
///
/// struct KbdRole;
///
/// impl Role for KbdRole {
///     fn name(&self) -> &str { "kbd" }
///
///     fn run(&self, text: &str, _ctx: &RoleContext<'_>) -> Result<DirectiveOutput, DirectiveError> {
///         Ok(DirectiveOutput::node(Node::new(NodeKind::Code(text.to_owned()))))
///     }
/// }
/// ```
pub trait Role: Send + Sync {
    /// Role name, matched against `:name[...]`.
    fn name(&self) -> &str;

    /// Turn the raw role text into inline nodes.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is malformed; the host reports it and
    /// keeps the raw role source in the output.
    fn run(&self, text: &str, ctx: &RoleContext<'_>) -> Result<DirectiveOutput, DirectiveError>;
}
