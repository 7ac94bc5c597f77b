//! Block directive trait and invocation data.
//!
//! Block directives use container syntax (`:::name[args]{options}` ... `:::`)
//! or, for body-less invocations, leaf syntax (`::name[args]{options}`).

use super::{DirectiveArgs, DirectiveContext, DirectiveError, DirectiveOutput};

/// How an option value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    /// Value passed through as written; may be empty.
    Unchanged,
    /// Presence-only option; a value is an error.
    Flag,
}

/// Declared option of a block directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as written inside the braces.
    pub name: &'static str,
    /// How the value is interpreted.
    pub kind: OptionKind,
}

impl OptionSpec {
    /// Option whose value is passed through unchanged.
    #[must_use]
    pub const fn unchanged(name: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Unchanged,
        }
    }

    /// Presence-only option.
    #[must_use]
    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Flag,
        }
    }
}

/// A single block directive occurrence in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Directive name.
    pub name: String,
    /// Arguments and options.
    pub args: DirectiveArgs,
    /// Body lines, dedented to the opener's indentation.
    pub content: String,
    /// Line number preceding the first body line.
    pub content_offset: usize,
    /// Line number of the opener (1-indexed).
    pub line: usize,
}

impl Invocation {
    /// Positional arguments.
    #[must_use]
    pub fn arguments(&self) -> Vec<&str> {
        self.args.arguments()
    }

    /// Option value by name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.args.get(name)
    }

    /// Whether an option is present.
    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.args.has(name)
    }

    /// Whether the body holds anything besides whitespace.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Fail with [`DirectiveError::EmptyContent`] unless a body is present.
    ///
    /// # Errors
    ///
    /// Returns an error when the body is empty or whitespace only.
    pub fn assert_has_content(&self) -> Result<(), DirectiveError> {
        if self.has_content() {
            Ok(())
        } else {
            Err(DirectiveError::EmptyContent {
                directive: self.name.clone(),
            })
        }
    }
}

/// Handler for block directives.
///
/// Directives are registered once and shared across renders, so they take
/// `&self` and must be `Send + Sync`. The host checks argument counts, option
/// names and flag values, and body presence against the declarations below
/// before calling [`run`](Self::run). `#name` and `.class` attributes are
/// always accepted.
///
/// # Example
///
/// ```
/// use rw_renderer::{Node, NodeKind};
/// use rw_renderer::directive::{
///     BlockDirective, DirectiveContext, DirectiveError, DirectiveOutput, Invocation,
/// };
///
/// struct Aside;
///
/// impl BlockDirective for Aside {
///     fn name(&self) -> &str { "aside" }
///
///     fn has_content(&self) -> bool { true }
///
///     fn run(
///         &self,
///         invocation: &Invocation,
///         ctx: &mut DirectiveContext<'_>,
///     ) -> Result<DirectiveOutput, DirectiveError> {
///         invocation.assert_has_content()?;
///         let children = ctx.nested_parse(&invocation.content, invocation.content_offset)?;
///         Ok(DirectiveOutput::node(Node::new(NodeKind::BlockQuote).with_children(children)))
///     }
/// }
/// ```
pub trait BlockDirective: Send + Sync {
    /// Directive name, matched against `:::name`.
    fn name(&self) -> &str;

    /// Number of required positional arguments.
    fn required_arguments(&self) -> usize {
        0
    }

    /// Number of optional positional arguments.
    fn optional_arguments(&self) -> usize {
        0
    }

    /// Declared options.
    fn option_spec(&self) -> &[OptionSpec] {
        &[]
    }

    /// Whether the directive accepts a body.
    fn has_content(&self) -> bool {
        false
    }

    /// Turn the invocation into document nodes.
    ///
    /// # Errors
    ///
    /// Returns an error when the invocation is invalid; the host reports it
    /// and keeps the raw directive source in the output.
    fn run(
        &self,
        invocation: &Invocation,
        ctx: &mut DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError>;
}

/// Check an invocation against the directive's declarations.
pub(crate) fn validate(
    directive: &dyn BlockDirective,
    invocation: &Invocation,
) -> Result<(), DirectiveError> {
    let required = directive.required_arguments();
    let max = required + directive.optional_arguments();
    let found = invocation.arguments().len();
    if found < required || found > max {
        let expected = if required == max {
            required.to_string()
        } else {
            format!("{required}-{max}")
        };
        return Err(DirectiveError::ArgumentCount {
            directive: invocation.name.clone(),
            expected,
            found,
        });
    }

    let mut options: Vec<(&String, &String)> = invocation.args.options.iter().collect();
    options.sort();
    for (option, value) in options {
        let spec = directive
            .option_spec()
            .iter()
            .find(|spec| spec.name == option)
            .ok_or_else(|| DirectiveError::UnknownOption {
                directive: invocation.name.clone(),
                option: option.clone(),
            })?;
        if spec.kind == OptionKind::Flag && !value.is_empty() {
            return Err(DirectiveError::InvalidOptionValue {
                option: option.clone(),
                message: format!("flag takes no value, got `{value}`"),
            });
        }
    }

    if !directive.has_content() && invocation.has_content() {
        return Err(DirectiveError::UnexpectedContent {
            directive: invocation.name.clone(),
        });
    }

    Ok(())
}
