//! Inline `itemprop` syntax.
//!
//! Role text has the form `value <name>` or `value <name:href>`:
//!
//! ```text
//! :itemprop[Jane Doe <name>]
//! :itemprop[Homepage <url:https://example.org/>]
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::MicrodataError;

static ITEMPROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<value>.*?)\s*<(?P<name>.*)>$").unwrap());

/// Parsed `itemprop` role text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemPropSyntax {
    /// Text shown to the reader.
    pub value: String,
    /// Microdata property name.
    pub name: String,
    /// Link target, when the name carries `:href`.
    pub href: Option<String>,
}

/// Parse `value <name>` or `value <name:href>`.
///
/// The name is split on its first colon, so URLs keep their own colons.
/// Value, name, and href are trimmed and must not be empty.
///
/// # Errors
///
/// Returns [`MicrodataError::Syntax`] when the text has no trailing `<...>`
/// group, or the matching `Empty*` variant when a part is blank.
///
/// # Example
///
/// ```
/// use rw_microdata::parse_itemprop;
///
/// let prop = parse_itemprop("Homepage <url:https://example.org/>").unwrap();
/// assert_eq!(prop.value, "Homepage");
/// assert_eq!(prop.name, "url");
/// assert_eq!(prop.href.as_deref(), Some("https://example.org/"));
/// ```
pub fn parse_itemprop(text: &str) -> Result<ItemPropSyntax, MicrodataError> {
    let caps = ITEMPROP_RE
        .captures(text.trim())
        .ok_or_else(|| MicrodataError::Syntax(text.to_owned()))?;

    let value = caps["value"].trim();
    let (name, href) = match caps["name"].split_once(':') {
        Some((name, href)) => (name.trim(), Some(href.trim())),
        None => (caps["name"].trim(), None),
    };

    if value.is_empty() {
        return Err(MicrodataError::EmptyValue(text.to_owned()));
    }
    if name.is_empty() {
        return Err(MicrodataError::EmptyName(text.to_owned()));
    }
    if href.is_some_and(str::is_empty) {
        return Err(MicrodataError::EmptyHref(text.to_owned()));
    }

    Ok(ItemPropSyntax {
        value: value.to_owned(),
        name: name.to_owned(),
        href: href.map(str::to_owned),
    })
}
