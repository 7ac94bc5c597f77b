//! Directive pre-pass.
//!
//! Runs before pulldown-cmark. Registered block directives and roles are cut
//! out of the source and replaced by placeholder tokens; the tree builder
//! later swaps each token for the nodes produced by its handler. Directive
//! and role syntax inside fenced code blocks is left alone.
//!
//! Block tokens are emitted on a line of their own surrounded by blank lines,
//! so pulldown-cmark turns them into a paragraph holding only the token.
//! Token delimiters already present in the input are themselves swapped for
//! literal tokens, so user text never resolves to an invocation.

use super::block::Invocation;
use super::parser::{ParsedDirective, find_role, parse_container_line, parse_leaf_line};
use crate::Diagnostic;
use crate::Registry;
use crate::fence::FenceTracker;

const TOKEN_START: char = '\u{E000}';
const TOKEN_END: char = '\u{E001}';

/// Directive or role cut out of the source.
#[derive(Debug)]
pub(crate) enum PendingKind {
    Block(Invocation),
    Role { name: String, text: String },
    /// Stray token delimiter from the input, written back as-is.
    Literal,
}

/// Invocation awaiting resolution by the tree builder.
#[derive(Debug)]
pub(crate) struct Pending {
    pub kind: PendingKind,
    /// Source line (1-indexed) of the invocation.
    pub line: usize,
    /// Original markup, restored when the token ends up in verbatim text.
    pub source: String,
}

/// Output of the pre-pass.
#[derive(Debug, Default)]
pub(crate) struct Preprocessed {
    /// Markdown with invocations replaced by tokens.
    pub source: String,
    /// Invocations indexed by token id.
    pub pending: Vec<Pending>,
}

/// Placeholder token for the pending invocation `id`.
pub(crate) fn token(id: usize) -> String {
    format!("{TOKEN_START}{id}{TOKEN_END}")
}

/// Parse text consisting of exactly one token.
pub(crate) fn parse_token(text: &str) -> Option<usize> {
    text.strip_prefix(TOKEN_START)?
        .strip_suffix(TOKEN_END)?
        .parse()
        .ok()
}

/// Split text into literal runs and token ids.
pub(crate) fn split_tokens(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(TOKEN_START) {
        let after = &rest[start + TOKEN_START.len_utf8()..];
        let Some(len) = after.find(TOKEN_END) else {
            break;
        };
        let Ok(id) = after[..len].parse() else {
            segments.push(Segment::Text(&rest[..start + TOKEN_START.len_utf8()]));
            rest = after;
            continue;
        };
        if start > 0 {
            segments.push(Segment::Text(&rest[..start]));
        }
        segments.push(Segment::Token(id));
        rest = &after[len + TOKEN_END.len_utf8()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    segments
}

/// Piece of text produced by [`split_tokens`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Token(usize),
}

/// Replace every token in `text` with the original markup.
pub(crate) fn restore_raw(text: &str, pending: &[Pending]) -> String {
    if !text.contains(TOKEN_START) {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    for segment in split_tokens(text) {
        match segment {
            Segment::Text(s) => out.push_str(s),
            Segment::Token(id) => match pending.get(id) {
                Some(p) => out.push_str(&p.source),
                None => out.push_str(&token(id)),
            },
        }
    }
    out
}

/// Cut registered directives and roles out of `input`.
///
/// `line_offset` is the line number preceding the first input line, so
/// nested bodies report positions in the enclosing document.
pub(crate) fn preprocess(
    input: &str,
    registry: &Registry,
    line_offset: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Preprocessed {
    let lines: Vec<&str> = input.lines().collect();
    let mut out = Preprocessed {
        source: String::with_capacity(input.len()),
        pending: Vec::new(),
    };
    let mut fence = FenceTracker::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let line_num = line_offset + idx + 1;

        if fence.classify(line).is_verbatim() {
            push_escaped(&mut out.source, line, line_num, &mut out.pending);
            out.source.push('\n');
            idx += 1;
            continue;
        }

        match parse_container_line(line).or_else(|| parse_leaf_line(line)) {
            Some(ParsedDirective::ContainerStart { name, args, .. })
                if registry.has_directive(&name) =>
            {
                let indent = leading_whitespace(line);
                let (end, closed) = find_container_end(&lines, idx + 1);
                let body: Vec<&str> = lines[idx + 1..end]
                    .iter()
                    .map(|l| dedent(l, indent.len()))
                    .collect();

                if !closed {
                    let message =
                        format!("unclosed directive :::{name} (missing closing :::)");
                    tracing::warn!(line = line_num, "{message}");
                    diagnostics.push(Diagnostic::warning(line_num, message));
                }

                let last = if closed { end } else { end - 1 };
                let source = lines[idx..=last.max(idx)].join("\n");
                let invocation = Invocation {
                    name,
                    args,
                    content: body.join("\n"),
                    content_offset: line_num,
                    line: line_num,
                };
                push_block_token(&mut out, indent, invocation, source);
                idx = if closed { end + 1 } else { end };
            }
            Some(ParsedDirective::Leaf { name, args }) if registry.has_directive(&name) => {
                let invocation = Invocation {
                    name,
                    args,
                    content: String::new(),
                    content_offset: line_num,
                    line: line_num,
                };
                push_block_token(
                    &mut out,
                    leading_whitespace(line),
                    invocation,
                    line.trim().to_owned(),
                );
                idx += 1;
            }
            _ => {
                let replaced = replace_roles(line, line_num, registry, &mut out.pending);
                push_line(&mut out.source, &replaced);
                idx += 1;
            }
        }
    }

    if !input.ends_with('\n') && out.source.ends_with('\n') {
        out.source.pop();
    }
    out
}

/// Find the closing line of a container whose body starts at `from`.
///
/// Returns the index of the closing line and whether one was found; for an
/// unclosed container the body runs to the end of input.
fn find_container_end(lines: &[&str], from: usize) -> (usize, bool) {
    let mut fence = FenceTracker::new();
    let mut depth = 1usize;

    for (offset, line) in lines[from..].iter().enumerate() {
        if fence.classify(line).is_verbatim() {
            continue;
        }
        match parse_container_line(line) {
            Some(ParsedDirective::ContainerStart { .. }) => depth += 1,
            Some(ParsedDirective::ContainerEnd { .. }) => {
                depth -= 1;
                if depth == 0 {
                    return (from + offset, true);
                }
            }
            _ => {}
        }
    }

    (lines.len(), false)
}

fn push_block_token(out: &mut Preprocessed, indent: &str, invocation: Invocation, source: String) {
    let id = out.pending.len();
    let line = invocation.line;
    out.pending.push(Pending {
        kind: PendingKind::Block(invocation),
        line,
        source,
    });

    if !out.source.is_empty() && !out.source.ends_with("\n\n") {
        out.source.push('\n');
    }
    out.source.push_str(indent);
    out.source.push_str(&token(id));
    out.source.push_str("\n\n");
}

fn replace_roles(
    line: &str,
    line_num: usize,
    registry: &Registry,
    pending: &mut Vec<Pending>,
) -> String {
    let mut result = String::with_capacity(line.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(role) = find_role(line, search) {
        search = role.end;
        if !registry.has_role(&role.name) {
            continue;
        }

        push_escaped(&mut result, &line[copied..role.start], line_num, pending);
        result.push_str(&token(pending.len()));
        pending.push(Pending {
            source: line[role.start..role.end].to_owned(),
            kind: PendingKind::Role {
                name: role.name,
                text: role.text,
            },
            line: line_num,
        });
        copied = role.end;
    }

    push_escaped(&mut result, &line[copied..], line_num, pending);
    result
}

/// Append user text, replacing token delimiters with literal tokens.
fn push_escaped(out: &mut String, text: &str, line: usize, pending: &mut Vec<Pending>) {
    if !text.contains([TOKEN_START, TOKEN_END]) {
        out.push_str(text);
        return;
    }
    for c in text.chars() {
        if c == TOKEN_START || c == TOKEN_END {
            out.push_str(&token(pending.len()));
            pending.push(Pending {
                kind: PendingKind::Literal,
                line,
                source: c.to_string(),
            });
        } else {
            out.push(c);
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Strip up to `width` leading whitespace bytes.
fn dedent(line: &str, width: usize) -> &str {
    let strip = leading_whitespace(line).len().min(width);
    &line[strip..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{
        BlockDirective, DirectiveContext, DirectiveError, DirectiveOutput, Role, RoleContext,
    };
    use pretty_assertions::assert_eq;

    struct Note;

    impl BlockDirective for Note {
        fn name(&self) -> &'static str {
            "note"
        }

        fn has_content(&self) -> bool {
            true
        }

        fn run(
            &self,
            _invocation: &Invocation,
            _ctx: &mut DirectiveContext<'_>,
        ) -> Result<DirectiveOutput, DirectiveError> {
            Ok(DirectiveOutput::default())
        }
    }

    struct Kbd;

    impl Role for Kbd {
        fn name(&self) -> &'static str {
            "kbd"
        }

        fn run(
            &self,
            _text: &str,
            _ctx: &RoleContext<'_>,
        ) -> Result<DirectiveOutput, DirectiveError> {
            Ok(DirectiveOutput::default())
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_directive(Note).unwrap();
        registry.add_role(Kbd).unwrap();
        registry
    }

    fn run(input: &str) -> (Preprocessed, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let out = preprocess(input, &registry(), 0, &mut diagnostics);
        (out, diagnostics)
    }

    fn block(pending: &Pending) -> &Invocation {
        match &pending.kind {
            PendingKind::Block(invocation) => invocation,
            _ => panic!("expected block invocation"),
        }
    }

    #[test]
    fn test_container_replaced_by_token() {
        let (out, diagnostics) = run("Before\n:::note[x]{.big}\nBody *text*\n:::\nAfter");
        assert!(diagnostics.is_empty());
        assert_eq!(out.source, format!("Before\n\n{}\n\nAfter", token(0)));
        assert_eq!(out.pending.len(), 1);

        let invocation = block(&out.pending[0]);
        assert_eq!(invocation.name, "note");
        assert_eq!(invocation.content, "Body *text*");
        assert_eq!(invocation.line, 2);
        assert_eq!(invocation.args.classes, vec!["big"]);
        assert_eq!(out.pending[0].source, ":::note[x]{.big}\nBody *text*\n:::");
    }

    #[test]
    fn test_nested_container_kept_in_body() {
        let input = ":::note\nOuter\n:::note\nInner\n:::\n:::";
        let (out, _) = run(input);
        assert_eq!(out.pending.len(), 1);
        assert_eq!(block(&out.pending[0]).content, "Outer\n:::note\nInner\n:::");
    }

    #[test]
    fn test_indented_body_dedented() {
        let (out, _) = run("- item\n\n  :::note\n  Body\n  :::\n");
        assert_eq!(block(&out.pending[0]).content, "Body");
        assert!(out.source.contains(&format!("\n  {}\n", token(0))));
    }

    #[test]
    fn test_unclosed_container() {
        let (out, diagnostics) = run(":::note\nBody\nMore");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unclosed"));
        assert_eq!(block(&out.pending[0]).content, "Body\nMore");
    }

    #[test]
    fn test_leaf_directive() {
        let (out, _) = run("::note[x]");
        let invocation = block(&out.pending[0]);
        assert_eq!(invocation.content, "");
        assert_eq!(out.pending[0].source, "::note[x]");
    }

    #[test]
    fn test_unregistered_directive_unchanged() {
        let input = ":::warning\nBody\n:::\n::leaf[x]";
        let (out, diagnostics) = run(input);
        assert_eq!(out.source, input);
        assert!(out.pending.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_directive_in_fence_unchanged() {
        let input = "```\n:::note\n:kbd[x]\n:::\n```";
        let (out, _) = run(input);
        assert_eq!(out.source, input);
        assert!(out.pending.is_empty());
    }

    #[test]
    fn test_fenced_closer_inside_body_ignored() {
        let input = ":::note\n```\n:::\n```\n:::";
        let (out, _) = run(input);
        assert_eq!(block(&out.pending[0]).content, "```\n:::\n```");
    }

    #[test]
    fn test_roles_replaced() {
        let (out, _) = run("Press :kbd[Ctrl] and :abbr[x] then :kbd[C].");
        assert_eq!(
            out.source,
            format!("Press {} and :abbr[x] then {}.", token(0), token(1))
        );
        assert_eq!(out.pending[1].source, ":kbd[C]");
        assert!(matches!(
            &out.pending[0].kind,
            PendingKind::Role { name, text } if name == "kbd" && text == "Ctrl"
        ));
    }

    #[test]
    fn test_line_offset() {
        let mut diagnostics = Vec::new();
        let out = preprocess("text\n:kbd[x]", &registry(), 10, &mut diagnostics);
        assert_eq!(out.pending[0].line, 12);
    }

    #[test]
    fn test_split_tokens() {
        let text = format!("a{}b{}", token(3), token(12));
        assert_eq!(
            split_tokens(&text),
            vec![
                Segment::Text("a"),
                Segment::Token(3),
                Segment::Text("b"),
                Segment::Token(12),
            ]
        );
        assert_eq!(parse_token(&token(7)), Some(7));
        assert_eq!(parse_token("7"), None);
    }

    #[test]
    fn test_stray_delimiters_escaped() {
        let input = format!("x {} :kbd[y]", token(0));
        let (out, _) = run(&input);
        assert_eq!(out.pending.len(), 3);
        assert!(matches!(out.pending[0].kind, PendingKind::Literal));
        assert!(matches!(out.pending[1].kind, PendingKind::Literal));
        assert!(matches!(out.pending[2].kind, PendingKind::Role { .. }));
        assert_eq!(restore_raw(&out.source, &out.pending), format!("x {} :kbd[y]", token(0)));
    }

    #[test]
    fn test_stray_delimiters_in_fence_escaped() {
        let input = format!("```\n{}\n```", token(0));
        let (out, _) = run(&input);
        assert_eq!(out.pending.len(), 2);
        assert_eq!(restore_raw(&out.source, &out.pending), input);
    }

    #[test]
    fn test_restore_raw() {
        let (out, _) = run("`:kbd[x]`");
        let restored = restore_raw(&out.source, &out.pending);
        assert_eq!(restored, "`:kbd[x]`");
    }
}
