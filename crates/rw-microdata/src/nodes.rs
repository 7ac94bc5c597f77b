//! Microdata node kinds.
//!
//! [`ItemScope`] is a block container; [`ItemProp`] is an inline leaf whose
//! display text is its single text child.

use rw_renderer::{ExtensionNode, Node};

/// Block element carrying `itemscope` and `itemtype`.
///
/// # Example
///
/// ```
/// use rw_microdata::ItemScope;
///
/// let scope = ItemScope::new("p", "http://schema.org/Person").with_itemprop("author");
/// assert!(scope.compact());
/// assert_eq!(scope.itemprop(), Some("author"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemScope {
    tag: String,
    itemtype: String,
    itemprop: Option<String>,
    compact: bool,
    id: Option<String>,
    classes: Vec<String>,
}

impl ItemScope {
    /// Node kind name.
    pub const KIND: &'static str = "itemscope";

    /// Create a scope rendered as `tag` with the full `itemtype` URI.
    ///
    /// A `p` scope is always compact.
    #[must_use]
    pub fn new(tag: impl Into<String>, itemtype: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            compact: tag == "p",
            tag,
            itemtype: itemtype.into(),
            itemprop: None,
            id: None,
            classes: Vec::new(),
        }
    }

    /// Set the property this item fills in its enclosing item.
    #[must_use]
    pub fn with_itemprop(mut self, itemprop: impl Into<String>) -> Self {
        self.itemprop = Some(itemprop.into());
        self
    }

    /// Request compact rendering; has no effect on a `p` scope.
    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact || self.tag == "p";
        self
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the CSS classes.
    #[must_use]
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// HTML tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Full item type URI.
    #[must_use]
    pub fn itemtype(&self) -> &str {
        &self.itemtype
    }

    /// Property name in the enclosing item.
    #[must_use]
    pub fn itemprop(&self) -> Option<&str> {
        self.itemprop.as_deref()
    }

    /// Whether direct child paragraphs render without `<p>`.
    #[must_use]
    pub fn compact(&self) -> bool {
        self.compact
    }

    /// Element id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// CSS classes.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl ExtensionNode for ItemScope {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
}

/// Build an item type URI from a vocabulary base and a type name.
///
/// ```
/// assert_eq!(
///     rw_microdata::itemtype_uri("http://data-vocabulary.org/", "Person"),
///     "http://data-vocabulary.org/Person"
/// );
/// ```
#[must_use]
pub fn itemtype_uri(vocabulary: &str, type_name: &str) -> String {
    format!("{vocabulary}{type_name}")
}

/// Inline element carrying `itemprop`, rendered as a link when `href` is set.
///
/// The display text lives in the node's text child, so properties are only
/// built through [`ItemProp::node`].
///
/// # Example
///
/// ```
/// use rw_microdata::ItemProp;
///
/// let node = ItemProp::node("Jane", "name", None);
/// assert_eq!(node.text_content(), "Jane");
/// assert_eq!(node.downcast::<ItemProp>().map(ItemProp::name), Some("name"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemProp {
    name: String,
    href: Option<String>,
}

impl ItemProp {
    /// Node kind name.
    pub const KIND: &'static str = "itemprop";

    /// Tree node for a property with `text` as its only child.
    #[must_use]
    pub fn node(text: impl Into<String>, name: impl Into<String>, href: Option<String>) -> Node {
        let prop = Self {
            name: name.into(),
            href,
        };
        Node::extension(prop).with_children(vec![Node::text(text)])
    }

    /// Property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Link target.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl ExtensionNode for ItemProp {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_p_scope_is_compact() {
        let scope = ItemScope::new("p", "http://x/T");
        assert!(scope.compact());
        assert!(scope.with_compact(false).compact());
    }

    #[test]
    fn test_div_scope_compact_on_request() {
        let scope = ItemScope::new("div", "http://x/T");
        assert!(!scope.compact());
        assert!(scope.with_compact(true).compact());
    }

    #[test]
    fn test_scope_builders() {
        let scope = ItemScope::new("section", "http://x/Event")
            .with_itemprop("event")
            .with_id("launch")
            .with_classes(vec!["card".to_owned()]);
        assert_eq!(scope.tag(), "section");
        assert_eq!(scope.itemtype(), "http://x/Event");
        assert_eq!(scope.itemprop(), Some("event"));
        assert_eq!(scope.id(), Some("launch"));
        assert_eq!(scope.classes(), ["card".to_owned()]);
    }

    #[test]
    fn test_itemtype_uri() {
        assert_eq!(
            itemtype_uri("https://schema.org/", "Book"),
            "https://schema.org/Book"
        );
    }

    #[test]
    fn test_itemprop_node() {
        let node = ItemProp::node("Jane", "name", None);
        assert_eq!(node.extension_kind(), Some(ItemProp::KIND));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.text_content(), "Jane");
        let prop = node.downcast::<ItemProp>().unwrap();
        assert_eq!(prop.name(), "name");
        assert_eq!(prop.href(), None);
    }
}
