//! Directive processing context.
//!
//! Gives handlers their source location and, for block directives, access to
//! the host's nested parser.

use std::path::Path;

use super::DirectiveError;
use crate::{Diagnostic, Node, Renderer};

/// Context passed to [`BlockDirective::run`](super::BlockDirective::run).
///
/// # Example
///
/// ```
/// use rw_renderer::{Registry, Renderer};
/// use rw_renderer::directive::DirectiveContext;
///
/// let renderer = Renderer::new(Registry::new());
/// let mut diagnostics = Vec::new();
/// let mut ctx = DirectiveContext::new(&renderer, 1, &mut diagnostics);
///
/// let nodes = ctx.nested_parse("Nested *content*.", 1).unwrap();
/// assert_eq!(nodes.len(), 1);
/// assert!(nodes[0].is_paragraph());
/// ```
pub struct DirectiveContext<'a> {
    /// Path to the source file being rendered (if known).
    pub source_path: Option<&'a Path>,
    /// Line number where the directive appears (1-indexed).
    pub line: usize,
    renderer: &'a Renderer,
    depth: usize,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> DirectiveContext<'a> {
    /// Create a top-level context for a directive at `line`.
    pub fn new(renderer: &'a Renderer, line: usize, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            source_path: renderer.config().source_path.as_deref(),
            line,
            renderer,
            depth: 0,
            diagnostics,
        }
    }

    pub(crate) fn nested(
        renderer: &'a Renderer,
        line: usize,
        depth: usize,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            depth,
            ..Self::new(renderer, line, diagnostics)
        }
    }

    /// Parse a directive body with the host parser, including nested
    /// directives and roles.
    ///
    /// `content_offset` is the line number preceding the first body line, so
    /// diagnostics inside the body point at the right source line.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::NestingTooDeep`] when the configured maximum
    /// nesting depth is exceeded. Failures of inner invocations are reported
    /// as diagnostics and do not fail the outer directive.
    pub fn nested_parse(
        &mut self,
        content: &str,
        content_offset: usize,
    ) -> Result<Vec<Node>, DirectiveError> {
        let max = self.renderer.config().max_nesting_depth;
        if self.depth >= max {
            return Err(DirectiveError::NestingTooDeep { max });
        }

        tracing::debug!(
            line = self.line,
            depth = self.depth + 1,
            "Parsing nested directive content"
        );
        Ok(self
            .renderer
            .parse_fragment(content, content_offset, self.depth + 1, self.diagnostics))
    }

    /// Report a non-fatal diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Context passed to [`Role::run`](super::Role::run).
#[derive(Clone, Copy, Debug)]
pub struct RoleContext<'a> {
    /// Path to the source file being rendered (if known).
    pub source_path: Option<&'a Path>,
    /// Line number where the role appears (1-indexed).
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Registry, RendererConfig};

    #[test]
    fn test_nested_parse() {
        let renderer = Renderer::new(Registry::new());
        let mut diagnostics = Vec::new();
        let mut ctx = DirectiveContext::new(&renderer, 4, &mut diagnostics);

        let nodes = ctx.nested_parse("First\n\nSecond", 4).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(Node::is_paragraph));
    }

    #[test]
    fn test_nesting_limit() {
        let config = RendererConfig::new().with_max_nesting_depth(2);
        let renderer = Renderer::with_config(Registry::new(), config);
        let mut diagnostics = Vec::new();
        let mut ctx = DirectiveContext::nested(&renderer, 1, 2, &mut diagnostics);

        let err = ctx.nested_parse("text", 1).unwrap_err();
        assert!(matches!(err, DirectiveError::NestingTooDeep { max: 2 }));
    }

    #[test]
    fn test_source_path_from_config() {
        let config = RendererConfig::new().with_source_path("docs/team.md");
        let renderer = Renderer::with_config(Registry::new(), config);
        let mut diagnostics = Vec::new();
        let ctx = DirectiveContext::new(&renderer, 1, &mut diagnostics);
        assert_eq!(ctx.source_path, Some(Path::new("docs/team.md")));
    }

    #[test]
    fn test_report() {
        let renderer = Renderer::new(Registry::new());
        let mut diagnostics = Vec::new();
        {
            let mut ctx = DirectiveContext::new(&renderer, 7, &mut diagnostics);
            ctx.report(Diagnostic::warning(7, "note"));
        }
        assert_eq!(diagnostics.len(), 1);
    }
}
