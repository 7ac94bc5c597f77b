//! Document tree builder.
//!
//! Folds pulldown-cmark events into an owned [`Node`] tree and resolves the
//! placeholder tokens left by the directive pre-pass. Each invocation is
//! resolved on its own: a failing handler yields a diagnostic plus a
//! [`NodeKind::Problematic`] node and the rest of the document is unaffected.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Tag, TextMergeStream};

use crate::directive::processor::{
    Pending, PendingKind, Segment, parse_token, restore_raw, split_tokens, token,
};
use crate::directive::{
    DirectiveContext, DirectiveError, DirectiveOutput, Invocation, RoleContext, validate,
};
use crate::{Diagnostic, Node, NodeKind, Renderer};

#[derive(Debug, Default)]
struct TableState {
    alignments: Vec<Alignment>,
    cell: usize,
    in_head: bool,
}

impl TableState {
    fn current_alignment(&self) -> Alignment {
        self.alignments
            .get(self.cell)
            .copied()
            .unwrap_or(Alignment::None)
    }
}

pub(crate) struct TreeBuilder<'a> {
    renderer: &'a Renderer,
    depth: usize,
    diagnostics: &'a mut Vec<Diagnostic>,
    pending: &'a [Pending],
    stack: Vec<Node>,
    table: TableState,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        renderer: &'a Renderer,
        depth: usize,
        pending: &'a [Pending],
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            renderer,
            depth,
            diagnostics,
            pending,
            stack: vec![Node::new(NodeKind::Document)],
            table: TableState::default(),
        }
    }

    /// Consume events and return the top-level nodes.
    pub(crate) fn build<'e, I>(mut self, events: I) -> Vec<Node>
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in TextMergeStream::new(events) {
            self.process_event(event);
        }
        while self.stack.len() > 1 {
            self.end_tag();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let code = restore_raw(&code, self.pending);
                self.attach(Node::new(NodeKind::Code(code)));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let html = restore_raw(&html, self.pending);
                self.attach(Node::new(NodeKind::Html(html)));
            }
            Event::SoftBreak => self.attach(Node::new(NodeKind::SoftBreak)),
            Event::HardBreak => self.attach(Node::new(NodeKind::HardBreak)),
            Event::Rule => self.attach(Node::new(NodeKind::Rule)),
            Event::TaskListMarker(checked) => {
                self.attach(Node::new(NodeKind::TaskListMarker(checked)));
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading(heading_level_to_num(level)),
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                NodeKind::CodeBlock {
                    language,
                    content: String::new(),
                }
            }
            Tag::List(start) => NodeKind::List(start),
            Tag::Item => NodeKind::Item,
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => NodeKind::Group,
            Tag::DefinitionList => NodeKind::DefinitionList,
            Tag::DefinitionListTitle => NodeKind::DefinitionListTitle,
            Tag::DefinitionListDefinition => NodeKind::DefinitionListDefinition,
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                NodeKind::Table
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                NodeKind::TableHead
            }
            Tag::TableRow => {
                self.table.cell = 0;
                NodeKind::TableRow
            }
            Tag::TableCell => NodeKind::TableCell {
                header: self.table.in_head,
                alignment: self.table.current_alignment(),
            },
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Superscript => NodeKind::Superscript,
            Tag::Subscript => NodeKind::Subscript,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                href: restore_raw(&dest_url, self.pending),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                src: restore_raw(&dest_url, self.pending),
                title: title.to_string(),
            },
        };
        self.stack.push(Node::new(kind));
    }

    fn end_tag(&mut self) {
        let Some(node) = self.stack.pop() else {
            return;
        };

        match node.kind {
            NodeKind::TableHead => self.table.in_head = false,
            NodeKind::TableCell { .. } => self.table.cell += 1,
            _ => {}
        }

        if let Some((id, invocation)) = self.block_paragraph(&node) {
            let nodes = self.run_block(id, invocation);
            for node in nodes {
                self.attach(node);
            }
        } else {
            self.attach(node);
        }
    }

    /// A paragraph holding only a block token stands for that directive.
    fn block_paragraph(&self, node: &Node) -> Option<(usize, &'a Invocation)> {
        if !node.is_paragraph() || node.children.len() != 1 {
            return None;
        }
        let NodeKind::Text(text) = &node.children[0].kind else {
            return None;
        };
        let pending: &'a [Pending] = self.pending;
        let id = parse_token(text.trim())?;
        match &pending.get(id)?.kind {
            PendingKind::Block(invocation) => Some((id, invocation)),
            PendingKind::Role { .. } | PendingKind::Literal => None,
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(Node {
            kind: NodeKind::CodeBlock { content, .. },
            ..
        }) = self.stack.last_mut()
        {
            content.push_str(&restore_raw(text, self.pending));
            return;
        }

        let in_paragraph = self.stack.last().is_some_and(Node::is_paragraph);
        let segments = split_tokens(text);
        let pending = self.pending;

        for segment in segments {
            match segment {
                Segment::Text(s) => self.attach(Node::text(s)),
                Segment::Token(id) => match pending.get(id) {
                    Some(Pending {
                        kind: PendingKind::Role { name, text: role_text },
                        ..
                    }) => {
                        for node in self.run_role(id, name, role_text) {
                            self.attach(node);
                        }
                    }
                    // Resolved when the enclosing paragraph closes
                    Some(Pending {
                        kind: PendingKind::Block(_),
                        ..
                    }) if in_paragraph && parse_token(text.trim()).is_some() => {
                        self.attach(Node::text(text.trim()));
                    }
                    Some(p) => self.attach(Node::text(p.source.clone())),
                    None => self.attach(Node::text(token(id))),
                },
            }
        }
    }

    fn run_block(&mut self, id: usize, invocation: &Invocation) -> Vec<Node> {
        let renderer = self.renderer;
        let result = match renderer.registry().directive(&invocation.name) {
            Some(directive) => validate(directive, invocation).and_then(|()| {
                let mut ctx = DirectiveContext::nested(
                    renderer,
                    invocation.line,
                    self.depth,
                    self.diagnostics,
                );
                directive.run(invocation, &mut ctx)
            }),
            None => return vec![self.problematic(id, true)],
        };
        self.absorb(id, result, true)
    }

    fn run_role(&mut self, id: usize, name: &str, text: &str) -> Vec<Node> {
        let renderer = self.renderer;
        let Some(role) = renderer.registry().role(name) else {
            return vec![self.problematic(id, false)];
        };
        let ctx = RoleContext {
            source_path: renderer.config().source_path.as_deref(),
            line: self.pending[id].line,
        };
        let result = role.run(text, &ctx);
        self.absorb(id, result, false)
    }

    fn absorb(
        &mut self,
        id: usize,
        result: Result<DirectiveOutput, DirectiveError>,
        block: bool,
    ) -> Vec<Node> {
        let line = self.pending[id].line;
        match result {
            Ok(output) => {
                for message in output.messages {
                    tracing::warn!(line = message.line, "{}", message.message);
                    self.diagnostics.push(message);
                }
                output.nodes
            }
            Err(err) => {
                tracing::warn!(line, error = %err, "Invocation failed");
                self.diagnostics.push(Diagnostic::error(line, err.to_string()));
                vec![self.problematic(id, block)]
            }
        }
    }

    fn problematic(&self, id: usize, block: bool) -> Node {
        Node::new(NodeKind::Problematic {
            source: self.pending[id].source.clone(),
            block,
        })
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.push(node);
        }
    }
}

/// Convert heading level to number.
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
