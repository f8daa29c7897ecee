//! Position tracking in the source document's coordinate space
//!
//! The root's content starts at offset 0. A container starting at `p`
//! has its content at `p + 1`, and every node advances the running offset
//! by its span once it has been compared.

use proofmark_document::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// Running offset used by the tree walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionTracker {
    offset: usize,
}

impl PositionTracker {
    pub fn at(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Tracker for the content of a container starting at the current offset
    pub fn enter(&self) -> Self {
        Self::at(self.offset + 1)
    }

    /// Step over a source node
    pub fn advance(&mut self, node: &Node) {
        self.offset += node.span();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chunk {
    text_start: usize,
    doc_start: usize,
    len: usize,
}

/// A non-text leaf met while projecting, with the offset it sits at in the
/// projected text and the number of characters it contributed there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedAtom {
    pub offset: usize,
    pub width: usize,
    pub node: Node,
}

/// Plain-text view of a document that can map text offsets back to
/// document positions
///
/// Text leaves contribute their payload, hard breaks a newline, and
/// consecutive blocks are joined by a separator. Separators and breaks
/// have no document position of their own; offsets inside them map to the
/// end of the preceding text. Images and hard breaks are kept aside as
/// [`ProjectedAtom`]s so a rebuilt document can put them back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProjection {
    text: String,
    text_len: usize,
    chunks: Vec<Chunk>,
    atoms: Vec<ProjectedAtom>,
}

impl TextProjection {
    pub fn from_node(root: &Node, block_separator: &str) -> Self {
        let mut projection = Self::default();
        projection.project(root, PositionTracker::at(0), block_separator);
        projection
    }

    fn project(&mut self, node: &Node, start: PositionTracker, separator: &str) {
        let mut pos = start;
        let mut seen_block = false;

        for child in &node.children {
            match child.node_type {
                NodeType::Text => self.push_text(child.text_str(), pos.offset()),
                NodeType::HardBreak => {
                    self.push_atom(child, 1);
                    self.push_gap("\n");
                }
                NodeType::Image => self.push_atom(child, 0),
                NodeType::Correction => {}
                _ => {
                    if seen_block {
                        self.push_gap(separator);
                    }
                    seen_block = true;
                    self.project(child, pos.enter(), separator);
                }
            }
            pos.advance(child);
        }
    }

    fn push_text(&mut self, text: &str, doc_start: usize) {
        let len = text.chars().count();
        if len == 0 {
            return;
        }
        self.chunks.push(Chunk {
            text_start: self.text_len,
            doc_start,
            len,
        });
        self.text.push_str(text);
        self.text_len += len;
    }

    fn push_atom(&mut self, node: &Node, width: usize) {
        self.atoms.push(ProjectedAtom {
            offset: self.text_len,
            width,
            node: node.clone(),
        });
    }

    fn push_gap(&mut self, gap: &str) {
        self.text.push_str(gap);
        self.text_len += gap.chars().count();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Atoms in projection order
    pub fn atoms(&self) -> &[ProjectedAtom] {
        &self.atoms
    }

    pub fn into_atoms(self) -> Vec<ProjectedAtom> {
        self.atoms
    }

    /// Length of the projected text in characters
    pub fn len(&self) -> usize {
        self.text_len
    }

    pub fn is_empty(&self) -> bool {
        self.text_len == 0
    }

    /// Document position of a character offset within the projected text.
    pub fn doc_position(&self, text_offset: usize) -> usize {
        let idx = self
            .chunks
            .partition_point(|chunk| chunk.text_start <= text_offset);

        match idx.checked_sub(1).and_then(|i| self.chunks.get(i)) {
            Some(chunk) => chunk.doc_start + (text_offset - chunk.text_start).min(chunk.len),
            None => self.chunks.first().map_or(0, |chunk| chunk.doc_start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_paragraphs() -> Node {
        Node::doc(vec![
            Node::paragraph(vec![Node::text("Hello")]),
            Node::paragraph(vec![Node::text("big "), Node::text("world")]),
        ])
    }

    #[test]
    fn test_tracker_enter_and_advance() {
        let doc = two_paragraphs();
        let mut pos = PositionTracker::at(0);

        assert_eq!(pos.enter().offset(), 1);
        pos.advance(&doc.children[0]);
        assert_eq!(pos.offset(), 7);
    }

    #[test]
    fn test_projection_text() {
        let projection = TextProjection::from_node(&two_paragraphs(), "\n");
        assert_eq!(projection.text(), "Hello\nbig world");
        assert_eq!(projection.len(), 15);
    }

    #[test]
    fn test_projection_maps_offsets() {
        let projection = TextProjection::from_node(&two_paragraphs(), "\n");

        // "Hello" lives at 1..6, the second paragraph's text at 8..17
        assert_eq!(projection.doc_position(0), 1);
        assert_eq!(projection.doc_position(4), 5);
        assert_eq!(projection.doc_position(5), 6);
        assert_eq!(projection.doc_position(6), 8);
        assert_eq!(projection.doc_position(10), 12);
        assert_eq!(projection.doc_position(15), 17);
    }

    #[test]
    fn test_projection_skips_atoms_but_not_positions() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::image("a.png"),
            Node::text("after"),
        ])]);
        let projection = TextProjection::from_node(&doc, "\n");

        assert_eq!(projection.text(), "after");
        assert_eq!(projection.doc_position(0), 2);
        assert_eq!(projection.atoms().len(), 1);
        assert_eq!(projection.atoms()[0].offset, 0);
        assert_eq!(projection.atoms()[0].width, 0);
    }

    #[test]
    fn test_projection_records_breaks() {
        let doc = Node::doc(vec![Node::paragraph(vec![
            Node::text("one"),
            Node::hard_break(),
            Node::text("two"),
            Node::image("b.png"),
        ])]);
        let projection = TextProjection::from_node(&doc, "\n");

        assert_eq!(projection.text(), "one\ntwo");
        let atoms: Vec<_> = projection
            .atoms()
            .iter()
            .map(|a| (a.offset, a.width, a.node.node_type))
            .collect();
        assert_eq!(
            atoms,
            vec![(3, 1, NodeType::HardBreak), (7, 0, NodeType::Image)]
        );
    }

    #[test]
    fn test_projection_nested_blocks() {
        let doc = Node::doc(vec![
            Node::paragraph(vec![Node::text("a")]),
            Node::blockquote(vec![Node::paragraph(vec![Node::text("b")])]),
        ]);
        let projection = TextProjection::from_node(&doc, "\n\n");

        assert_eq!(projection.text(), "a\n\nb");
        // blockquote opens at 3, its paragraph at 4, text at 5
        assert_eq!(projection.doc_position(3), 5);
    }

    #[test]
    fn test_empty_projection() {
        let projection = TextProjection::from_node(&Node::doc(vec![]), "\n");
        assert!(projection.is_empty());
        assert_eq!(projection.doc_position(3), 0);
    }
}
