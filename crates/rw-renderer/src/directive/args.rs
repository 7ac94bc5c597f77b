//! Directive argument parsing.
//!
//! Parses the `[arguments]{#name .class key="value" flag}` syntax that follows
//! a directive or role name.

use std::collections::HashMap;

/// Parsed arguments from directive syntax.
///
/// For block directives the bracket content holds the positional arguments
/// and the braces hold options. Roles only use the bracket content, which is
/// handed to the role verbatim.
///
/// # Example
///
/// ```
/// use rw_renderer::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("Person", r#"#jane .card tag=p itemprop="author" compact"#);
/// assert_eq!(args.argument, "Person");
/// assert_eq!(args.name.as_deref(), Some("jane"));
/// assert_eq!(args.classes, vec!["card"]);
/// assert_eq!(args.get("tag"), Some("p"));
/// assert_eq!(args.get("itemprop"), Some("author"));
/// assert!(args.has("compact"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Raw content from brackets: `[...]` (empty string if not provided).
    pub argument: String,
    /// Cross-reference name from `{#name}`.
    pub name: Option<String>,
    /// Classes from `{.class1 .class2}`.
    pub classes: Vec<String>,
    /// Options from `{key="value"}`; bare `{flag}` words map to an empty value.
    pub options: HashMap<String, String>,
}

impl DirectiveArgs {
    /// Parse bracket content and the attribute string (without braces).
    #[must_use]
    pub fn parse(argument: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            argument: argument.to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let end = word_end(rest);
                args.name = Some(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let end = word_end(rest);
                args.classes.push(rest[..end].to_owned());
                remaining = &rest[end..];
            } else if let Some((key, value, rest)) = parse_key_value(remaining) {
                args.options.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Bare word: presence flag
                let end = remaining
                    .find(char::is_whitespace)
                    .unwrap_or(remaining.len());
                args.options.insert(remaining[..end].to_owned(), String::new());
                remaining = &remaining[end..];
            }
            remaining = remaining.trim_start();
        }

        args
    }

    /// Get an option value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Whether an option is present (with or without a value).
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Positional arguments: the bracket content split on whitespace.
    #[must_use]
    pub fn arguments(&self) -> Vec<&str> {
        self.argument.split_whitespace().collect()
    }
}

/// End of a `#name` or `.class` word.
fn word_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse a key-value pair from the attributes string.
///
/// Supports: `key="value"`, `key='value'`, `key=value`. The key must come
/// before any whitespace, otherwise the leading word is a bare flag.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let key_end = s.find(|c: char| c == '=' || c.is_whitespace())?;
    if !s[key_end..].starts_with('=') {
        return None;
    }
    let key = &s[..key_end];
    if key.is_empty() {
        return None;
    }

    let after_eq = &s[key_end + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}
