//! `itemscope` block directive.
//!
//! ```markdown
//! :::itemscope[Person]{tag=p itemprop=author}
//! :itemprop[Jane Doe <name>]
//! :::
//! ```

use rw_renderer::Node;
use rw_renderer::directive::{
    BlockDirective, DirectiveContext, DirectiveError, DirectiveOutput, Invocation, OptionSpec,
};

use crate::{ItemScope, MicrodataConfig, MicrodataError, itemtype_uri};

const OPTIONS: &[OptionSpec] = &[
    OptionSpec::unchanged("tag"),
    OptionSpec::unchanged("itemprop"),
    OptionSpec::flag("compact"),
];

/// Wraps its parsed body in an [`ItemScope`].
///
/// Takes the type name as its single argument. `#name` becomes the element
/// id and `.class` attributes its CSS classes.
#[derive(Debug, Default)]
pub struct ItemScopeDirective {
    config: MicrodataConfig,
}

impl ItemScopeDirective {
    /// Create the directive with the given vocabulary and default tag.
    #[must_use]
    pub fn new(config: MicrodataConfig) -> Self {
        Self { config }
    }
}

impl BlockDirective for ItemScopeDirective {
    fn name(&self) -> &'static str {
        ItemScope::KIND
    }

    fn required_arguments(&self) -> usize {
        1
    }

    fn option_spec(&self) -> &[OptionSpec] {
        OPTIONS
    }

    fn has_content(&self) -> bool {
        true
    }

    fn run(
        &self,
        invocation: &Invocation,
        ctx: &mut DirectiveContext<'_>,
    ) -> Result<DirectiveOutput, DirectiveError> {
        invocation.assert_has_content()?;

        let tag = invocation
            .option("tag")
            .unwrap_or(self.config.default_tag.as_str());
        if !is_tag_name(tag) {
            return Err(MicrodataError::InvalidTag(tag.to_owned()).into());
        }

        let type_name = invocation.args.argument.trim();
        let mut scope = ItemScope::new(tag, itemtype_uri(&self.config.vocabulary, type_name))
            .with_compact(invocation.has_option("compact"))
            .with_classes(invocation.args.classes.clone());
        if let Some(itemprop) = invocation
            .option("itemprop")
            .map(str::trim)
            .filter(|itemprop| !itemprop.is_empty())
        {
            scope = scope.with_itemprop(itemprop);
        }
        if let Some(id) = &invocation.args.name {
            scope = scope.with_id(id.as_str());
        }

        let children = ctx.nested_parse(&invocation.content, invocation.content_offset)?;
        Ok(DirectiveOutput::node(
            Node::extension(scope).with_children(children),
        ))
    }
}

/// Whether `tag` is an HTML tag name: an ASCII letter followed by ASCII
/// letters, digits, or hyphens.
pub(crate) fn is_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}
