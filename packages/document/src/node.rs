use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const ATTR_TEXT: &str = "text";
pub const ATTR_ADDED: &str = "added";
pub const ATTR_REMOVED: &str = "removed";
pub const ATTR_LEVEL: &str = "level";
pub const ATTR_SRC: &str = "src";

/// Attribute mapping of a node. Ordered so that equality and serialization
/// are deterministic.
pub type Attrs = BTreeMap<String, Value>;

/// Node type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Document root
    Doc,
    Paragraph,
    /// Heading, level held in the `level` attribute
    Heading,
    /// Container of blocks
    Blockquote,
    /// Text leaf, payload in `Node::text`
    Text,
    HardBreak,
    /// Passed through untouched by the differ
    Image,
    /// Inline correction marker (`text`, `added`, `removed` attributes)
    Correction,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::Text => "text",
            NodeType::HardBreak => "hard_break",
            NodeType::Image => "image",
            NodeType::Correction => "correction",
        }
    }

    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeType::Text | NodeType::HardBreak | NodeType::Image | NodeType::Correction
        )
    }

    /// Leaves without a text payload. Each occupies one position.
    pub fn is_atom(self) -> bool {
        self.is_leaf() && self != NodeType::Text
    }

    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeType::Paragraph | NodeType::Heading | NodeType::Blockquote
        )
    }

    /// Blocks holding inline content directly.
    pub fn is_textblock(self) -> bool {
        matches!(self, NodeType::Paragraph | NodeType::Heading)
    }
}

/// A single element of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: Attrs,

    #[serde(default, rename = "content", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Literal payload of text leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            attrs: Attrs::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn doc(children: Vec<Node>) -> Self {
        Self::new(NodeType::Doc).with_children(children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeType::Paragraph).with_children(children)
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Self::new(NodeType::Heading)
            .with_attr(ATTR_LEVEL, level)
            .with_children(children)
    }

    pub fn blockquote(children: Vec<Node>) -> Self {
        Self::new(NodeType::Blockquote).with_children(children)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            text: Some(content.into()),
            ..Self::new(NodeType::Text)
        }
    }

    pub fn hard_break() -> Self {
        Self::new(NodeType::HardBreak)
    }

    pub fn image(src: impl Into<String>) -> Self {
        let src: String = src.into();
        Self::new(NodeType::Image).with_attr(ATTR_SRC, src)
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_correction(&self) -> bool {
        self.node_type == NodeType::Correction
    }

    /// Text payload, empty for anything but text leaves.
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Size this node occupies in the flattened coordinate space.
    pub fn span(&self) -> usize {
        match self.node_type {
            NodeType::Text => self.text_str().chars().count(),
            t if t.is_atom() => 1,
            _ => 2 + self.content_size(),
        }
    }

    /// Sum of the children's spans. For the root this is the size of the
    /// whole document coordinate space.
    pub fn content_size(&self) -> usize {
        self.children.iter().map(Node::span).sum()
    }

    /// Text of all text leaves below this node, blocks separated by newlines.
    /// Correction markers contribute their `text` attribute.
    ///
    /// This is a display string. The differ compares against its own
    /// projection, which uses the configured block separator and skips
    /// markers; `Pipeline::source_text` in the editor returns that one.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain_text(&mut out);
        out
    }

    fn collect_plain_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.text_str()),
            NodeType::HardBreak => out.push('\n'),
            NodeType::Correction => out.push_str(self.attr_str(ATTR_TEXT).unwrap_or("")),
            NodeType::Image => {}
            _ => {
                let mut first = true;
                for child in &self.children {
                    if child.node_type.is_block() && !first {
                        out.push('\n');
                    }
                    child.collect_plain_text(out);
                    first = false;
                }
            }
        }
    }

    /// Whether any node below (or at) this one has the given type.
    pub fn contains(&self, node_type: NodeType) -> bool {
        self.node_type == node_type || self.children.iter().any(|c| c.contains(node_type))
    }

    pub fn count(&self, node_type: NodeType) -> usize {
        let own = usize::from(self.node_type == node_type);
        own + self.children.iter().map(|c| c.count(node_type)).sum::<usize>()
    }

    /// Merge adjacent text leaves with equal attributes and drop empty ones.
    pub fn normalize(&mut self) {
        let children = std::mem::take(&mut self.children);
        for mut child in children {
            if child.is_text() {
                if child.text_str().is_empty() {
                    continue;
                }
                if let Some(prev) = self.children.last_mut() {
                    if prev.is_text() && prev.attrs == child.attrs {
                        let tail = child.text.take().unwrap_or_default();
                        prev.text.get_or_insert_with(String::new).push_str(&tail);
                        continue;
                    }
                }
            } else {
                child.normalize();
            }
            self.children.push(child);
        }
    }
}

/// Attribute contract of a correction marker node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionMark {
    pub text: String,
    pub added: bool,
    pub removed: bool,
}

impl CorrectionMark {
    pub fn added(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            added: true,
            removed: false,
        }
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            added: false,
            removed: true,
        }
    }

    /// Neither flag set. Only used transiently.
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            added: false,
            removed: false,
        }
    }

    pub fn from_node(node: &Node) -> Option<Self> {
        if !node.is_correction() {
            return None;
        }
        Some(Self {
            text: node.attr_str(ATTR_TEXT).unwrap_or("").to_string(),
            added: node.attr_bool(ATTR_ADDED),
            removed: node.attr_bool(ATTR_REMOVED),
        })
    }

    pub fn into_node(self) -> Node {
        Node::new(NodeType::Correction)
            .with_attr(ATTR_TEXT, self.text)
            .with_attr(ATTR_ADDED, self.added)
            .with_attr(ATTR_REMOVED, self.removed)
    }
}

impl From<CorrectionMark> for Node {
    fn from(mark: CorrectionMark) -> Self {
        mark.into_node()
    }
}
