//! Microdata markup for rw-renderer.
//!
//! Adds schema.org-style `itemscope`, `itemtype`, and `itemprop` attributes to
//! rendered HTML through an `itemscope` block directive and an `itemprop`
//! inline role:
//!
//! ```markdown
//! :::itemscope[Person]{tag=p itemprop=author}
//! :itemprop[Jane Doe <name>], :itemprop[homepage <url:https://jane.example/>]
//! :::
//! ```
//!
//! A scope rendered as `p`, or given the `compact` flag, writes its direct
//! child paragraphs without their own `<p>` wrapper.
//!
//! # Example
//!
//! ```
//! use rw_microdata::Microdata;
//! use rw_renderer::{Registry, Renderer};
//!
//! let registry = Registry::new().with_extension(Microdata::default()).unwrap();
//! let renderer = Renderer::new(registry);
//!
//! let result = renderer
//!     .render_markdown(":::itemscope[Person]{tag=p}\n:itemprop[Jane <name>]\n:::")
//!     .unwrap();
//! assert_eq!(
//!     result.html,
//!     r#"<p itemscope itemtype="http://data-vocabulary.org/Person"><span itemprop="name">Jane</span></p>"#
//! );
//! ```

mod config;
mod directive;
mod error;
mod html;
mod nodes;
mod role;
mod syntax;
mod text;

use rw_renderer::{Extension, NodeRegistration, Registry, RegistryError};

pub use config::{ConfigError, MicrodataConfig};
pub use directive::ItemScopeDirective;
pub use error::MicrodataError;
pub use nodes::{ItemProp, ItemScope, itemtype_uri};
pub use role::ItemPropRole;
pub use syntax::{ItemPropSyntax, parse_itemprop};

/// The microdata extension.
///
/// Registers the `itemscope` directive, the `itemprop` role, HTML and text
/// visitors for both node kinds, and the compact-scope paragraph rule.
#[derive(Debug, Default)]
pub struct Microdata {
    config: MicrodataConfig,
}

impl Microdata {
    /// Create the extension with the given configuration.
    #[must_use]
    pub fn new(config: MicrodataConfig) -> Self {
        Self { config }
    }
}

impl Extension for Microdata {
    fn setup(self, registry: &mut Registry) -> Result<(), RegistryError> {
        tracing::debug!(vocabulary = %self.config.vocabulary, "Installing microdata extension");

        registry.add_directive(ItemScopeDirective::new(self.config))?;
        registry.add_role(ItemPropRole)?;
        registry.add_node(
            ItemScope::KIND,
            NodeRegistration::html(html::scope_enter, html::exit)
                .with_text(text::pass_through, text::pass_through),
        )?;
        registry.add_node(
            ItemProp::KIND,
            NodeRegistration::html(html::prop_enter, html::exit)
                .with_text(text::pass_through, text::pass_through),
        )?;
        registry.add_compact_paragraph_rule(html::is_compact_scope_paragraph);
        Ok(())
    }
}
