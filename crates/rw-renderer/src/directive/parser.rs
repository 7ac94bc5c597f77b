//! Directive syntax parsing.
//!
//! Recognizes block directives (`:::name[args]{options}` ... `:::`), body-less
//! block directives (`::name[args]{options}`) and inline roles (`:name[text]`).

use super::DirectiveArgs;

/// Directive syntax recognized on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedDirective {
    /// Body-less block directive: `::name[args]{options}`
    Leaf { name: String, args: DirectiveArgs },
    /// Container opening: `:::name[args]{options}`
    ContainerStart {
        name: String,
        args: DirectiveArgs,
        colon_count: usize,
    },
    /// Container closing: `:::`
    ContainerEnd { colon_count: usize },
}

/// Inline role found within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedRole {
    /// Role name.
    pub name: String,
    /// Raw text between the brackets.
    pub text: String,
    /// Byte offset of the leading colon.
    pub start: usize,
    /// Byte offset just past the closing bracket.
    pub end: usize,
}

/// Parse a whole line as a container opening or closing.
///
/// Returns `None` if the line is not a container directive.
pub(crate) fn parse_container_line(line: &str) -> Option<ParsedDirective> {
    let trimmed = line.trim();

    if !trimmed.starts_with(":::") {
        return None;
    }

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    let after_colons = trimmed[colon_count..].trim();

    if after_colons.is_empty() {
        return Some(ParsedDirective::ContainerEnd { colon_count });
    }

    let (name, args, _) = parse_invocation(after_colons)?;

    Some(ParsedDirective::ContainerStart {
        name,
        args,
        colon_count,
    })
}

/// Parse a whole line as a body-less block directive: `::name[args]{options}`.
///
/// The directive must be the only content on the line.
pub(crate) fn parse_leaf_line(line: &str) -> Option<ParsedDirective> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix("::")?;
    if rest.starts_with(':') {
        return None;
    }

    let (name, args, consumed) = parse_invocation(rest)?;
    if !rest[consumed..].trim().is_empty() {
        return None;
    }

    Some(ParsedDirective::Leaf { name, args })
}

/// Find the first inline role in `line` at or after byte offset `from`.
///
/// A role starts with a single colon that is at the start of the line or
/// follows a character that is neither alphanumeric nor a colon, so URLs and
/// `key:value` text are not mistaken for roles. The bracketed text is required.
pub(crate) fn find_role(line: &str, from: usize) -> Option<ParsedRole> {
    let mut search = from;

    while let Some(rel) = line[search..].find(':') {
        let start = search + rel;
        search = start + 1;

        let preceded_ok = line[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != ':');
        let after = &line[start + 1..];
        if !preceded_ok || after.starts_with(':') {
            continue;
        }

        let name_end = after
            .find(|c: char| !is_name_char(c))
            .unwrap_or(after.len());
        let name = &after[..name_end];
        if name.is_empty() {
            continue;
        }

        let (text, consumed) = parse_brackets(&after[name_end..]);
        if consumed == 0 {
            continue;
        }

        return Some(ParsedRole {
            name: name.to_owned(),
            text,
            start,
            end: start + 1 + name_end + consumed,
        });
    }

    None
}

/// Parse `name[args]{options}` and return the bytes consumed.
fn parse_invocation(s: &str) -> Option<(String, DirectiveArgs, usize)> {
    let name_end = s
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(s.len());

    let name = &s[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let mut pos = name_end;
    let (content, content_consumed) = parse_brackets(&s[pos..]);
    pos += content_consumed;
    let (attrs_str, attrs_consumed) = parse_braces(&s[pos..]);
    pos += attrs_consumed;

    Some((
        name.to_owned(),
        DirectiveArgs::parse(&content, &attrs_str),
        pos,
    ))
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Parse content from brackets: `[content]`, honoring nested brackets.
///
/// Returns (content, `bytes_consumed`); `bytes_consumed` is 0 if there is no
/// complete bracket group.
fn parse_brackets(s: &str) -> (String, usize) {
    parse_delimited(s, '[', ']')
}

/// Parse attributes from braces: `{#id .class key="value"}`.
fn parse_braces(s: &str) -> (String, usize) {
    parse_delimited(s, '{', '}')
}

fn parse_delimited(s: &str, open: char, close: char) -> (String, usize) {
    if !s.starts_with(open) {
        return (String::new(), 0);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (s[1..i].to_owned(), i + 1);
            }
        }
    }

    (String::new(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_start() {
        let directive = parse_container_line(":::itemscope[Person]{tag=p compact}").unwrap();
        match directive {
            ParsedDirective::ContainerStart {
                name,
                args,
                colon_count,
            } => {
                assert_eq!(name, "itemscope");
                assert_eq!(args.argument, "Person");
                assert_eq!(args.get("tag"), Some("p"));
                assert!(args.has("compact"));
                assert_eq!(colon_count, 3);
            }
            other => panic!("expected container start, got {other:?}"),
        }
    }

    #[test]
    fn test_container_start_with_space() {
        let directive = parse_container_line("::: itemscope[Person]").unwrap();
        assert!(matches!(
            directive,
            ParsedDirective::ContainerStart { ref name, .. } if name == "itemscope"
        ));
    }

    #[test]
    fn test_container_end() {
        assert_eq!(
            parse_container_line(":::"),
            Some(ParsedDirective::ContainerEnd { colon_count: 3 })
        );
        assert_eq!(
            parse_container_line("  ::::  "),
            Some(ParsedDirective::ContainerEnd { colon_count: 4 })
        );
    }

    #[test]
    fn test_not_container() {
        assert!(parse_container_line("regular text").is_none());
        assert!(parse_container_line("::leaf").is_none());
        assert!(parse_container_line(":::foo@bar").is_none());
    }

    #[test]
    fn test_leaf_line() {
        let directive = parse_leaf_line("::itemscope[Person]{#jane}").unwrap();
        match directive {
            ParsedDirective::Leaf { name, args } => {
                assert_eq!(name, "itemscope");
                assert_eq!(args.argument, "Person");
                assert_eq!(args.name.as_deref(), Some("jane"));
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_line_rejects_trailing_text() {
        assert!(parse_leaf_line("::itemscope[Person] and more").is_none());
        assert!(parse_leaf_line(":::itemscope").is_none());
        assert!(parse_leaf_line("text ::itemscope").is_none());
    }

    #[test]
    fn test_find_role() {
        let line = "Written by :itemprop[Jane Doe <author>] today.";
        let role = find_role(line, 0).unwrap();
        assert_eq!(role.name, "itemprop");
        assert_eq!(role.text, "Jane Doe <author>");
        assert_eq!(&line[role.start..role.end], ":itemprop[Jane Doe <author>]");
    }

    #[test]
    fn test_find_role_with_href() {
        let line = ":itemprop[Home <url:https://example.org/>]";
        let role = find_role(line, 0).unwrap();
        assert_eq!(role.text, "Home <url:https://example.org/>");
        assert_eq!(role.start, 0);
        assert_eq!(role.end, line.len());
    }

    #[test]
    fn test_find_role_skips_non_roles() {
        let line = "Note: see https://example.org and a::b then :itemprop[X <y>]";
        let role = find_role(line, 0).unwrap();
        assert_eq!(role.name, "itemprop");
        assert_eq!(role.text, "X <y>");
    }

    #[test]
    fn test_find_role_requires_brackets() {
        assert!(find_role("time 10:30 and :itemprop without text", 0).is_none());
        assert!(find_role(":itemprop[unclosed", 0).is_none());
    }

    #[test]
    fn test_find_role_not_after_word() {
        assert!(find_role("word:itemprop[X <y>]", 0).is_none());
    }

    #[test]
    fn test_find_role_from_offset() {
        let line = ":a[1] :b[2]";
        let first = find_role(line, 0).unwrap();
        assert_eq!(first.name, "a");
        let second = find_role(line, first.end).unwrap();
        assert_eq!(second.name, "b");
        assert_eq!(second.text, "2");
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(parse_brackets("[hello]"), ("hello".to_owned(), 7));
        assert_eq!(
            parse_brackets("[nested [brackets]]"),
            ("nested [brackets]".to_owned(), 19)
        );
        assert_eq!(parse_brackets("no brackets"), (String::new(), 0));
        assert_eq!(parse_brackets("[unclosed"), (String::new(), 0));
    }

    #[test]
    fn test_parse_braces() {
        assert_eq!(parse_braces("{#id}"), ("#id".to_owned(), 5));
        assert_eq!(parse_braces("{unclosed"), (String::new(), 0));
    }
}
