//! Document tree produced by the parser and consumed by the writers.
//!
//! The tree is an owned hierarchy of [`Node`] values. Nodes never hold a
//! reference to their parent: writers pass the parent alongside each node
//! during the walk, which is enough for context-sensitive rendering such as
//! compact paragraphs.

use std::any::Any;
use std::fmt;

use pulldown_cmark::Alignment;

/// Node kind contributed by an extension.
///
/// Writers look up the enter/exit visitors for an extension node by its
/// [`kind`](Self::kind) name in the [`Registry`](crate::Registry).
///
/// # Example
///
/// ```
/// use rw_renderer::{ExtensionNode, Node};
///
/// #[derive(Debug)]
/// struct Badge(String);
///
/// impl ExtensionNode for Badge {
///     fn kind(&self) -> &'static str { "badge" }
/// }
///
/// let node = Node::extension(Badge("new".to_owned()));
/// assert_eq!(node.downcast::<Badge>().map(|b| b.0.as_str()), Some("new"));
/// ```
pub trait ExtensionNode: Any + fmt::Debug + Send + Sync {
    /// Node kind name used for visitor dispatch (e.g., "itemscope").
    fn kind(&self) -> &'static str;
}

/// Kind of a document tree node.
#[derive(Debug)]
pub enum NodeKind {
    /// Root of a parsed document.
    Document,
    /// Paragraph block.
    Paragraph,
    /// Heading with level 1-6.
    Heading(u8),
    /// Block quote.
    BlockQuote,
    /// Fenced or indented code block.
    CodeBlock {
        /// Language from the fence info string.
        language: Option<String>,
        /// Verbatim code content.
        content: String,
    },
    /// List; `Some(start)` for ordered lists.
    List(Option<u64>),
    /// List item.
    Item,
    /// Definition list.
    DefinitionList,
    /// Definition list term.
    DefinitionListTitle,
    /// Definition list description.
    DefinitionListDefinition,
    /// Table.
    Table,
    /// Table header row.
    TableHead,
    /// Table body row.
    TableRow,
    /// Table cell.
    TableCell {
        /// Whether the cell belongs to the header row.
        header: bool,
        /// Column alignment.
        alignment: Alignment,
    },
    /// Emphasis (`*text*`).
    Emphasis,
    /// Strong emphasis (`**text**`).
    Strong,
    /// Strikethrough (`~~text~~`).
    Strikethrough,
    /// Superscript.
    Superscript,
    /// Subscript.
    Subscript,
    /// Hyperlink; children hold the link text.
    Link {
        /// Link target.
        href: String,
        /// Optional title (empty if absent).
        title: String,
    },
    /// Image; children hold the alt text.
    Image {
        /// Image source URL.
        src: String,
        /// Optional title (empty if absent).
        title: String,
    },
    /// Plain text.
    Text(String),
    /// Inline code span.
    Code(String),
    /// Raw HTML passed through unchanged.
    Html(String),
    /// Soft line break.
    SoftBreak,
    /// Hard line break.
    HardBreak,
    /// Horizontal rule.
    Rule,
    /// Task list checkbox.
    TaskListMarker(bool),
    /// Transparent container; only its children are rendered.
    Group,
    /// Raw source of a directive or role invocation that failed.
    Problematic {
        /// Original markup of the invocation.
        source: String,
        /// Whether the invocation was block-level.
        block: bool,
    },
    /// Node contributed by an extension.
    Extension(Box<dyn ExtensionNode>),
}

/// Node in the document tree.
#[derive(Debug)]
pub struct Node {
    /// What this node represents.
    pub kind: NodeKind,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without children.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }

    /// Create a node carrying an extension payload.
    #[must_use]
    pub fn extension<T: ExtensionNode>(node: T) -> Self {
        Self::new(NodeKind::Extension(Box::new(node)))
    }

    /// Replace the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Append a child node.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Extension kind name, if this is an extension node.
    #[must_use]
    pub fn extension_kind(&self) -> Option<&'static str> {
        match &self.kind {
            NodeKind::Extension(ext) => Some(ext.kind()),
            _ => None,
        }
    }

    /// Borrow the extension payload as `T`.
    ///
    /// Returns `None` for built-in nodes and for extension nodes of another type.
    #[must_use]
    pub fn downcast<T: ExtensionNode>(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Extension(ext) => {
                let ext: &dyn ExtensionNode = &**ext;
                let any: &dyn Any = ext;
                any.downcast_ref::<T>()
            }
            _ => None,
        }
    }

    /// Whether this node is a paragraph.
    #[must_use]
    pub fn is_paragraph(&self) -> bool {
        matches!(self.kind, NodeKind::Paragraph)
    }

    /// Concatenated text of all descendant text and code nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Marker;

    impl ExtensionNode for Marker {
        fn kind(&self) -> &'static str {
            "marker"
        }
    }

    #[derive(Debug)]
    struct Other;

    impl ExtensionNode for Other {
        fn kind(&self) -> &'static str {
            "other"
        }
    }

    #[test]
    fn test_downcast_matching_type() {
        let node = Node::extension(Marker);
        assert!(node.downcast::<Marker>().is_some());
        assert_eq!(node.extension_kind(), Some("marker"));
    }

    #[test]
    fn test_downcast_other_type() {
        let node = Node::extension(Other);
        assert!(node.downcast::<Marker>().is_none());
    }

    #[test]
    fn test_downcast_builtin() {
        let node = Node::text("hello");
        assert!(node.downcast::<Marker>().is_none());
        assert_eq!(node.extension_kind(), None);
    }

    #[test]
    fn test_text_content() {
        let node = Node::new(NodeKind::Paragraph).with_children(vec![
            Node::text("Hello "),
            Node::new(NodeKind::Strong).with_children(vec![Node::text("bold")]),
            Node::new(NodeKind::SoftBreak),
            Node::new(NodeKind::Code("code".to_owned())),
        ]);
        assert_eq!(node.text_content(), "Hello bold code");
    }

    #[test]
    fn test_push() {
        let mut node = Node::new(NodeKind::Document);
        node.push(Node::new(NodeKind::Paragraph));
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_paragraph());
    }
}
