//! Directive output types.

use crate::{Diagnostic, Node};

/// Output of a successful directive or role invocation.
///
/// Holds the nodes to insert in place of the invocation plus any
/// non-fatal messages the handler wants reported.
///
/// # Example
///
/// ```
/// use rw_renderer::Node;
/// use rw_renderer::directive::DirectiveOutput;
///
/// let output = DirectiveOutput::node(Node::text("hello"));
/// assert_eq!(output.nodes.len(), 1);
/// assert!(output.messages.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct DirectiveOutput {
    /// Nodes inserted into the document tree.
    pub nodes: Vec<Node>,
    /// Non-fatal diagnostics reported by the handler.
    pub messages: Vec<Diagnostic>,
}

impl DirectiveOutput {
    /// Output consisting of a single node.
    #[must_use]
    pub fn node(node: Node) -> Self {
        Self::nodes(vec![node])
    }

    /// Output consisting of several nodes.
    #[must_use]
    pub fn nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            messages: Vec::new(),
        }
    }

    /// Attach a diagnostic message.
    #[must_use]
    pub fn with_message(mut self, message: Diagnostic) -> Self {
        self.messages.push(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_message() {
        let output = DirectiveOutput::nodes(Vec::new())
            .with_message(Diagnostic::warning(3, "deprecated option"));
        assert!(output.nodes.is_empty());
        assert_eq!(output.messages.len(), 1);
        assert_eq!(output.messages[0].line, 3);
    }
}
