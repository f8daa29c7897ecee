//! # Document Mutations
//!
//! Edits the host editor applies to a document, addressed by absolute
//! positions in the document's coordinate space.
//!
//! ## Mutation Semantics
//!
//! ### InsertText
//! - Position must fall inside a paragraph or heading
//! - Inserting next to a text leaf extends it, keeping its marks
//!
//! ### DeleteRange
//! - `from..to` must stay within one paragraph or heading
//! - Removes the characters and any atoms fully inside the range
//!
//! ### ReplaceAll
//! - Swaps the whole tree, root must be a document node

use proofmark_document::{Node, NodeType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert text at a position
    InsertText { position: usize, text: String },

    /// Delete the content between two positions
    DeleteRange { from: usize, to: usize },

    /// Replace the whole document
    ReplaceAll { root: Node },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Position {position} is outside the document (size {size})")]
    PositionOutOfRange { position: usize, size: usize },

    #[error("Position {0} is not inside a text block")]
    NotTextPosition(usize),

    #[error("Invalid range {from}..{to}")]
    InvalidRange { from: usize, to: usize },

    #[error("Range {from}..{to} crosses a block boundary")]
    CrossesBlocks { from: usize, to: usize },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Outcome of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    pub version: u64,
}

impl Mutation {
    /// Apply mutation to a document tree with validation
    pub fn apply(&self, root: &mut Node) -> Result<(), MutationError> {
        self.validate(root)?;

        match self {
            Mutation::InsertText { position, text } => {
                if !insert_text(root, 0, *position, text) {
                    return Err(MutationError::NotTextPosition(*position));
                }
            }
            Mutation::DeleteRange { from, to } => {
                if !delete_range(root, 0, *from, *to) {
                    return Err(MutationError::CrossesBlocks {
                        from: *from,
                        to: *to,
                    });
                }
            }
            Mutation::ReplaceAll { root: replacement } => {
                *root = replacement.clone();
            }
        }

        root.normalize();
        Ok(())
    }

    fn validate(&self, root: &Node) -> Result<(), MutationError> {
        let size = root.content_size();
        match self {
            Mutation::InsertText { position, .. } if *position > size => {
                Err(MutationError::PositionOutOfRange {
                    position: *position,
                    size,
                })
            }
            Mutation::DeleteRange { from, to } if from > to => Err(MutationError::InvalidRange {
                from: *from,
                to: *to,
            }),
            Mutation::DeleteRange { to, .. } if *to > size => {
                Err(MutationError::PositionOutOfRange { position: *to, size })
            }
            Mutation::ReplaceAll { root } if root.node_type != NodeType::Doc => {
                Err(MutationError::InvalidStructure(format!(
                    "replacement root is a {}, expected doc",
                    root.node_type.name()
                )))
            }
            _ => Ok(()),
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Child container whose content strictly contains `position`, with the
/// offset its content starts at
fn container_at(parent: &mut Node, start: usize, position: usize) -> Option<(&mut Node, usize)> {
    let mut pos = start;
    for child in &mut parent.children {
        let span = child.span();
        if !child.node_type.is_leaf() && position > pos && position < pos + span {
            return Some((child, pos + 1));
        }
        pos += span;
    }
    None
}

fn insert_text(parent: &mut Node, start: usize, position: usize, text: &str) -> bool {
    if !parent.node_type.is_textblock() {
        return match container_at(parent, start, position) {
            Some((child, child_start)) => insert_text(child, child_start, position, text),
            None => false,
        };
    }

    let mut pos = start;
    for i in 0..parent.children.len() {
        let child = &mut parent.children[i];
        let span = child.span();
        if child.is_text() && position <= pos + span {
            let content = child.text.get_or_insert_with(String::new);
            let at = byte_offset(content, position - pos);
            content.insert_str(at, text);
            return true;
        }
        if position == pos {
            parent.children.insert(i, Node::text(text));
            return true;
        }
        pos += span;
    }
    parent.children.push(Node::text(text));
    true
}

fn delete_range(parent: &mut Node, start: usize, from: usize, to: usize) -> bool {
    if from == to {
        return true;
    }
    if !parent.node_type.is_textblock() {
        let end = start + parent.content_size();
        if from < start || to > end {
            return false;
        }
        return match container_at(parent, start, from) {
            Some((child, child_start)) if to < child_start + child.content_size() + 1 => {
                delete_range(child, child_start, from, to)
            }
            _ => false,
        };
    }

    let mut pos = start;
    let children = std::mem::take(&mut parent.children);
    for mut child in children {
        let span = child.span();
        let (child_start, child_end) = (pos, pos + span);
        pos = child_end;

        if child_end <= from || child_start >= to {
            parent.children.push(child);
        } else if child.is_text() {
            let content = child.text_str();
            let cut_from = from.saturating_sub(child_start);
            let cut_to = (to - child_start).min(span);
            let kept = format!(
                "{}{}",
                &content[..byte_offset(content, cut_from)],
                &content[byte_offset(content, cut_to)..]
            );
            child.text = Some(kept);
            parent.children.push(child);
        }
        // atoms inside the range are dropped
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        // paragraph at 0, "Hello world" at 1..12, image at 12
        Node::doc(vec![
            Node::paragraph(vec![Node::text("Hello world"), Node::image("a.png")]),
            Node::heading(1, vec![Node::text("Title")]),
        ])
    }

    #[test]
    fn test_insert_inside_text() {
        let mut doc = sample();
        Mutation::InsertText {
            position: 6,
            text: " big".to_string(),
        }
        .apply(&mut doc)
        .unwrap();

        assert_eq!(doc.children[0].children[0].text_str(), "Hello big world");
    }

    #[test]
    fn test_insert_after_atom() {
        let mut doc = sample();
        Mutation::InsertText {
            position: 13,
            text: "!".to_string(),
        }
        .apply(&mut doc)
        .unwrap();

        assert_eq!(doc.children[0].children.len(), 3);
        assert_eq!(doc.children[0].children[2].text_str(), "!");
    }

    #[test]
    fn test_insert_into_second_block() {
        let mut doc = sample();
        // heading opens at 14, "Title" at 15..20
        Mutation::InsertText {
            position: 20,
            text: "s".to_string(),
        }
        .apply(&mut doc)
        .unwrap();

        assert_eq!(doc.children[1].children[0].text_str(), "Titles");
    }

    #[test]
    fn test_insert_between_blocks_fails() {
        let mut doc = sample();
        let err = Mutation::InsertText {
            position: 14,
            text: "x".to_string(),
        }
        .apply(&mut doc)
        .unwrap_err();

        assert_eq!(err, MutationError::NotTextPosition(14));
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut doc = sample();
        let err = Mutation::InsertText {
            position: 999,
            text: "x".to_string(),
        }
        .apply(&mut doc)
        .unwrap_err();

        assert!(matches!(err, MutationError::PositionOutOfRange { .. }));
    }

    #[test]
    fn test_delete_range_within_block() {
        let mut doc = sample();
        Mutation::DeleteRange { from: 6, to: 13 }
            .apply(&mut doc)
            .unwrap();

        let para = &doc.children[0];
        assert_eq!(para.children.len(), 1);
        assert_eq!(para.children[0].text_str(), "Hello");
    }

    #[test]
    fn test_delete_across_blocks_fails() {
        let mut doc = sample();
        let err = Mutation::DeleteRange { from: 3, to: 17 }
            .apply(&mut doc)
            .unwrap_err();

        assert_eq!(err, MutationError::CrossesBlocks { from: 3, to: 17 });
    }

    #[test]
    fn test_replace_all_requires_doc_root() {
        let mut doc = sample();
        let err = Mutation::ReplaceAll {
            root: Node::paragraph(vec![]),
        }
        .apply(&mut doc)
        .unwrap_err();

        assert!(matches!(err, MutationError::InvalidStructure(_)));
        assert_eq!(doc, sample());
    }
}
