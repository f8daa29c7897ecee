//! Removal of correction markers left by a previous annotation pass

use proofmark_document::{CorrectionMark, Node, NodeType, VisitorMut};
use serde::{Deserialize, Serialize};

/// What to put in place of a marker when stripping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StripPolicy {
    /// Drop every marker
    #[default]
    Discard,
    /// Put removed text back and drop added text, recovering the draft
    Restore,
}

struct MarkerStripper {
    policy: StripPolicy,
    stripped: usize,
}

impl VisitorMut for MarkerStripper {
    fn visit_children_mut(&mut self, _parent: NodeType, children: &mut Vec<Node>) {
        if !children.iter().any(Node::is_correction) {
            return;
        }

        let policy = self.policy;
        let mut stripped = 0;
        let old = std::mem::take(children);
        children.extend(old.into_iter().filter_map(|child| {
            let Some(mark) = CorrectionMark::from_node(&child) else {
                return Some(child);
            };
            stripped += 1;
            match policy {
                StripPolicy::Restore if !mark.added && !mark.text.is_empty() => {
                    Some(Node::text(mark.text))
                }
                _ => None,
            }
        }));
        self.stripped += stripped;
    }
}

/// Remove every correction marker below `root` and merge the text around
/// them. Returns the number of markers removed.
pub fn strip_markers(root: &mut Node, policy: StripPolicy) -> usize {
    let mut stripper = MarkerStripper {
        policy,
        stripped: 0,
    };
    stripper.visit_node_mut(root);
    if stripper.stripped > 0 {
        root.normalize();
    }
    stripper.stripped
}

/// Copy of `root` without correction markers
pub fn stripped(root: &Node, policy: StripPolicy) -> Node {
    let mut copy = root.clone();
    strip_markers(&mut copy, policy);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated() -> Node {
        Node::doc(vec![Node::paragraph(vec![
            Node::text("The cat "),
            CorrectionMark::removed("sat.").into_node(),
            CorrectionMark::added("sat down.").into_node(),
        ])])
    }

    #[test]
    fn test_discard_drops_all_markers() {
        let mut doc = annotated();
        assert_eq!(strip_markers(&mut doc, StripPolicy::Discard), 2);

        assert!(!doc.contains(NodeType::Correction));
        assert_eq!(doc.plain_text(), "The cat ");
    }

    #[test]
    fn test_restore_recovers_draft() {
        let mut doc = annotated();
        strip_markers(&mut doc, StripPolicy::Restore);

        let para = &doc.children[0];
        assert_eq!(para.children.len(), 1);
        assert_eq!(para.children[0].text_str(), "The cat sat.");
    }

    #[test]
    fn test_strip_without_markers_is_noop() {
        let doc = Node::doc(vec![Node::paragraph(vec![Node::text("plain")])]);
        assert_eq!(stripped(&doc, StripPolicy::Discard), doc);
    }

    #[test]
    fn test_strip_inside_blockquote() {
        let mut doc = Node::doc(vec![Node::blockquote(vec![Node::paragraph(vec![
            CorrectionMark::added("x").into_node(),
        ])])]);
        strip_markers(&mut doc, StripPolicy::Discard);
        assert_eq!(doc.count(NodeType::Correction), 0);
    }
}
