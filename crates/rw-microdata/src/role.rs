//! `itemprop` inline role.

use rw_renderer::directive::{DirectiveError, DirectiveOutput, Role, RoleContext};

use crate::{ItemProp, parse_itemprop};

/// Turns `:itemprop[value <name>]` into an [`ItemProp`] node.
#[derive(Debug, Default)]
pub struct ItemPropRole;

impl Role for ItemPropRole {
    fn name(&self) -> &'static str {
        ItemProp::KIND
    }

    fn run(&self, text: &str, _ctx: &RoleContext<'_>) -> Result<DirectiveOutput, DirectiveError> {
        let parsed = parse_itemprop(text)?;
        Ok(DirectiveOutput::node(ItemProp::node(
            parsed.value,
            parsed.name,
            parsed.href,
        )))
    }
}
