//! Extension registry.
//!
//! Extensions contribute block directives, inline roles, node kinds with
//! writer visitors, and compact-paragraph rules. Registration is explicit:
//! names must be unique and a duplicate is rejected instead of replacing the
//! earlier entry.

use std::collections::HashMap;

use crate::directive::{BlockDirective, Role};
use crate::{HtmlWriter, Node, RenderError, TextWriter};

/// Visitor invoked when a writer enters or leaves a node.
pub type VisitFn<W> = fn(&mut W, &Node) -> Result<(), RenderError>;

/// Predicate deciding whether a paragraph renders without its wrapper.
///
/// Called with the paragraph and its parent (`None` at document level).
pub type CompactRule = Box<dyn Fn(&Node, Option<&Node>) -> bool + Send + Sync>;

/// Enter/exit visitor pair for one writer.
pub struct NodeVisitors<W> {
    /// Called before the node's children are written.
    pub enter: VisitFn<W>,
    /// Called after the node's children are written.
    pub exit: VisitFn<W>,
}

impl<W> NodeVisitors<W> {
    /// Create a visitor pair.
    #[must_use]
    pub fn new(enter: VisitFn<W>, exit: VisitFn<W>) -> Self {
        Self { enter, exit }
    }
}

impl<W> Clone for NodeVisitors<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for NodeVisitors<W> {}

/// Writer visitors registered for an extension node kind.
///
/// HTML visitors are mandatory. Without text visitors the text writer renders
/// only the node's children.
#[derive(Clone, Copy)]
pub struct NodeRegistration {
    /// HTML writer visitors.
    pub html: NodeVisitors<HtmlWriter>,
    /// Optional text writer visitors.
    pub text: Option<NodeVisitors<TextWriter>>,
}

impl NodeRegistration {
    /// Registration with HTML visitors only.
    #[must_use]
    pub fn html(enter: VisitFn<HtmlWriter>, exit: VisitFn<HtmlWriter>) -> Self {
        Self {
            html: NodeVisitors::new(enter, exit),
            text: None,
        }
    }

    /// Add text writer visitors.
    #[must_use]
    pub fn with_text(mut self, enter: VisitFn<TextWriter>, exit: VisitFn<TextWriter>) -> Self {
        self.text = Some(NodeVisitors::new(enter, exit));
        self
    }
}

/// Error raised while registering an extension.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A directive with this name already exists.
    #[error("directive `{0}` is already registered")]
    DuplicateDirective(String),
    /// A role with this name already exists.
    #[error("role `{0}` is already registered")]
    DuplicateRole(String),
    /// A node kind with this name already exists.
    #[error("node kind `{0}` is already registered")]
    DuplicateNode(String),
}

/// Bundle of registrations installed in one call.
pub trait Extension {
    /// Register everything this extension provides.
    ///
    /// # Errors
    ///
    /// Returns an error if a name collides with an existing registration.
    fn setup(self, registry: &mut Registry) -> Result<(), RegistryError>;
}

/// Registered directives, roles, node kinds, and paragraph rules.
///
/// # Example
///
/// ```
/// use rw_renderer::{Registry, Renderer};
///
/// let renderer = Renderer::new(Registry::new());
/// let result = renderer.render_markdown("Hello").unwrap();
/// assert_eq!(result.html, "<p>Hello</p>");
/// ```
#[derive(Default)]
pub struct Registry {
    directives: HashMap<String, Box<dyn BlockDirective>>,
    roles: HashMap<String, Box<dyn Role>>,
    nodes: HashMap<&'static str, NodeRegistration>,
    compact_rules: Vec<CompactRule>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block directive.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDirective`] if the name is taken.
    pub fn add_directive<D: BlockDirective + 'static>(
        &mut self,
        directive: D,
    ) -> Result<(), RegistryError> {
        let name = directive.name().to_owned();
        if self.directives.contains_key(&name) {
            return Err(RegistryError::DuplicateDirective(name));
        }
        tracing::debug!(directive = %name, "Registered directive");
        self.directives.insert(name, Box::new(directive));
        Ok(())
    }

    /// Register an inline role.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRole`] if the name is taken.
    pub fn add_role<R: Role + 'static>(&mut self, role: R) -> Result<(), RegistryError> {
        let name = role.name().to_owned();
        if self.roles.contains_key(&name) {
            return Err(RegistryError::DuplicateRole(name));
        }
        tracing::debug!(role = %name, "Registered role");
        self.roles.insert(name, Box::new(role));
        Ok(())
    }

    /// Register writer visitors for an extension node kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateNode`] if the kind is taken.
    pub fn add_node(
        &mut self,
        kind: &'static str,
        registration: NodeRegistration,
    ) -> Result<(), RegistryError> {
        if self.nodes.contains_key(kind) {
            return Err(RegistryError::DuplicateNode(kind.to_owned()));
        }
        tracing::debug!(kind, "Registered node kind");
        self.nodes.insert(kind, registration);
        Ok(())
    }

    /// Add a compact-paragraph rule.
    ///
    /// A paragraph is rendered without its wrapper when any rule returns true.
    pub fn add_compact_paragraph_rule<F>(&mut self, rule: F)
    where
        F: Fn(&Node, Option<&Node>) -> bool + Send + Sync + 'static,
    {
        self.compact_rules.push(Box::new(rule));
    }

    /// Install an extension.
    ///
    /// # Errors
    ///
    /// Propagates the extension's registration error.
    pub fn add_extension<E: Extension>(&mut self, extension: E) -> Result<(), RegistryError> {
        extension.setup(self)
    }

    /// Install an extension, builder style.
    ///
    /// # Errors
    ///
    /// Propagates the extension's registration error.
    pub fn with_extension<E: Extension>(mut self, extension: E) -> Result<Self, RegistryError> {
        self.add_extension(extension)?;
        Ok(self)
    }

    /// Whether a directive with this name is registered.
    #[must_use]
    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Whether a role with this name is registered.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    pub(crate) fn directive(&self, name: &str) -> Option<&dyn BlockDirective> {
        self.directives.get(name).map(|d| &**d)
    }

    pub(crate) fn role(&self, name: &str) -> Option<&dyn Role> {
        self.roles.get(name).map(|r| &**r)
    }

    /// Writer visitors for a node kind.
    #[must_use]
    pub fn node(&self, kind: &str) -> Option<&NodeRegistration> {
        self.nodes.get(kind)
    }

    /// Whether any compact-paragraph rule matches.
    #[must_use]
    pub fn is_compact_paragraph(&self, paragraph: &Node, parent: Option<&Node>) -> bool {
        self.compact_rules.iter().any(|rule| rule(paragraph, parent))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut directives: Vec<&String> = self.directives.keys().collect();
        directives.sort();
        let mut roles: Vec<&String> = self.roles.keys().collect();
        roles.sort();
        let mut nodes: Vec<&&str> = self.nodes.keys().collect();
        nodes.sort();
        f.debug_struct("Registry")
            .field("directives", &directives)
            .field("roles", &roles)
            .field("nodes", &nodes)
            .field("compact_rules", &self.compact_rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeKind;
    use crate::directive::{
        DirectiveContext, DirectiveError, DirectiveOutput, Invocation, RoleContext,
    };

    struct Note;

    impl BlockDirective for Note {
        fn name(&self) -> &'static str {
            "note"
        }

        fn run(
            &self,
            _invocation: &Invocation,
            _ctx: &mut DirectiveContext<'_>,
        ) -> Result<DirectiveOutput, DirectiveError> {
            Ok(DirectiveOutput::default())
        }
    }

    struct Kbd;

    impl Role for Kbd {
        fn name(&self) -> &'static str {
            "kbd"
        }

        fn run(
            &self,
            _text: &str,
            _ctx: &RoleContext<'_>,
        ) -> Result<DirectiveOutput, DirectiveError> {
            Ok(DirectiveOutput::default())
        }
    }

    fn noop_html(_: &mut HtmlWriter, _: &Node) -> Result<(), RenderError> {
        Ok(())
    }

    struct Bundle;

    impl Extension for Bundle {
        fn setup(self, registry: &mut Registry) -> Result<(), RegistryError> {
            registry.add_directive(Note)?;
            registry.add_role(Kbd)?;
            registry.add_node("note", NodeRegistration::html(noop_html, noop_html))?;
            registry.add_compact_paragraph_rule(|_, parent| {
                parent.is_some_and(|p| p.extension_kind() == Some("note"))
            });
            Ok(())
        }
    }

    #[test]
    fn test_extension_setup() {
        let registry = Registry::new().with_extension(Bundle).unwrap();
        assert!(registry.has_directive("note"));
        assert!(registry.has_role("kbd"));
        assert!(registry.node("note").is_some());
        assert!(registry.node("note").unwrap().text.is_none());
        assert!(registry.directive("note").is_some());
        assert!(registry.role("kbd").is_some());
    }

    #[test]
    fn test_duplicate_directive_rejected() {
        let mut registry = Registry::new();
        registry.add_directive(Note).unwrap();
        let err = registry.add_directive(Note).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateDirective(ref n) if n == "note"));
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let registry = Registry::new().with_extension(Bundle).unwrap();
        assert!(registry.with_extension(Bundle).is_err());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut registry = Registry::new();
        let registration = NodeRegistration::html(noop_html, noop_html);
        registry.add_node("note", registration).unwrap();
        let err = registry.add_node("note", registration).unwrap_err();
        assert_eq!(err.to_string(), "node kind `note` is already registered");
    }

    #[test]
    fn test_compact_rules() {
        let registry = Registry::new();
        let paragraph = Node::new(NodeKind::Paragraph);
        assert!(!registry.is_compact_paragraph(&paragraph, None));

        let mut registry = Registry::new();
        registry.add_compact_paragraph_rule(|p, parent| p.is_paragraph() && parent.is_none());
        assert!(registry.is_compact_paragraph(&paragraph, None));
    }
}
