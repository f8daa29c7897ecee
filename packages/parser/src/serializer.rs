use crate::parser::{
    DATA_ADDED, DATA_CORRECTION, DATA_REMOVED, DATA_TEXT, MARK_BOLD, MARK_ITALIC, MARK_STRIKE,
};
use proofmark_document::{CorrectionMark, Node, NodeType, ATTR_LEVEL};
use serde_json::Value;

/// Serializer converts a document tree back to markup
///
/// The output uses the same tag subset the parser reads, so
/// `parse(serialize(doc))` reproduces `doc` up to text-leaf merging.
/// Block elements go on their own line; inline content is written verbatim.
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Serialize a document (or any subtree) to markup
    pub fn serialize(mut self, node: &Node) -> String {
        match node.node_type {
            NodeType::Doc => self.serialize_blocks(&node.children),
            _ => self.serialize_node(node),
        }
        self.output
    }

    fn serialize_blocks(&mut self, blocks: &[Node]) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.serialize_node(block);
        }
    }

    fn serialize_node(&mut self, node: &Node) {
        match node.node_type {
            NodeType::Doc => self.serialize_blocks(&node.children),
            NodeType::Paragraph => self.wrap("p", node),
            NodeType::Heading => {
                let level = node
                    .attrs
                    .get(ATTR_LEVEL)
                    .and_then(Value::as_u64)
                    .unwrap_or(1)
                    .clamp(1, 6);
                self.wrap(&format!("h{}", level), node);
            }
            NodeType::Blockquote => {
                self.output.push_str("<blockquote>");
                self.serialize_blocks(&node.children);
                self.output.push_str("</blockquote>");
            }
            NodeType::Text => self.serialize_text(node),
            NodeType::HardBreak => self.output.push_str("<br>"),
            NodeType::Image => {
                self.output.push_str("<img");
                for (key, value) in &node.attrs {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    self.push_attr(key, &value);
                }
                self.output.push('>');
            }
            NodeType::Correction => {
                let mark = CorrectionMark::from_node(node).unwrap_or(CorrectionMark::unchanged(""));
                self.output.push_str("<span");
                self.push_attr(DATA_CORRECTION, "");
                self.push_attr(DATA_TEXT, &mark.text);
                self.push_attr(DATA_ADDED, if mark.added { "true" } else { "false" });
                self.push_attr(DATA_REMOVED, if mark.removed { "true" } else { "false" });
                self.output.push_str("></span>");
            }
        }
    }

    fn wrap(&mut self, tag: &str, node: &Node) {
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push('>');
        for child in &node.children {
            self.serialize_node(child);
        }
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
    }

    fn serialize_text(&mut self, node: &Node) {
        let marks: Vec<&str> = [(MARK_BOLD, "strong"), (MARK_ITALIC, "em"), (MARK_STRIKE, "s")]
            .into_iter()
            .filter(|(mark, _)| node.attr_bool(mark))
            .map(|(_, tag)| tag)
            .collect();

        for tag in &marks {
            self.output.push_str(&format!("<{}>", tag));
        }
        self.output.push_str(&escape(node.text_str()));
        for tag in marks.iter().rev() {
            self.output.push_str(&format!("</{}>", tag));
        }
    }

    fn push_attr(&mut self, key: &str, value: &str) {
        self.output.push(' ');
        self.output.push_str(key);
        self.output.push_str("=\"");
        self.output.push_str(&escape(value));
        self.output.push('"');
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a document tree to markup
pub fn serialize(node: &Node) -> String {
    Serializer::new().serialize(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_serialize_blocks() {
        let doc = Node::doc(vec![
            Node::heading(2, vec![Node::text("Title")]),
            Node::paragraph(vec![Node::text("a < b")]),
        ]);
        assert_eq!(serialize(&doc), "<h2>Title</h2>\n<p>a &lt; b</p>");
    }

    #[test]
    fn test_serialize_marks_nest() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("x")
            .with_attr(MARK_BOLD, true)
            .with_attr(MARK_ITALIC, true)])]);
        assert_eq!(serialize(&doc), "<p><strong><em>x</em></strong></p>");
    }

    #[test]
    fn test_serialize_correction_reparses() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("The "),
            CorrectionMark::added("dog").into_node(),
        ])]);

        let markup = serialize(&doc);
        assert!(markup.contains(r#"data-text="dog""#));
        assert_eq!(parse(&markup).unwrap(), doc);
    }

    #[test]
    fn test_serialize_image_and_break() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::image("a.png"),
            Node::hard_break(),
        ])]);
        assert_eq!(serialize(&doc), r#"<p><img src="a.png"><br></p>"#);

        let reparsed = parse(&serialize(&doc)).unwrap();
        assert_eq!(reparsed, doc);
    }
}
