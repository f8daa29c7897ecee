//! Output types of the structural differ

use crate::config::DiffMode;
use crate::position::ProjectedAtom;
use crate::sequence::ChangeStatus;
use crate::tokenizer::word;
use proofmark_document::{Node, NodeType};
use serde::{Deserialize, Serialize};

/// What a segment describes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// A container present on both sides. Its children follow as
    /// separate segments.
    Container { node_type: NodeType },
    /// A word token
    Text,
    /// A whole subtree present on one side only
    Subtree { node: Node },
}

/// Character range within a text leaf (or the projected text in
/// plain-text mode), trailing whitespace excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRange {
    pub start: usize,
    pub end: usize,
}

impl StringRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One classified element of a diff, in pre-order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub status: ChangeStatus,
    pub subject: Subject,
    /// Child-index path of the element, into the target tree for added
    /// subtrees and into the source tree otherwise. Empty in plain-text mode.
    pub path: Vec<usize>,
    /// Absolute offset in the source document
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_range: Option<StringRange>,
    /// Token text, trailing whitespace included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DiffSegment {
    pub fn word(
        status: ChangeStatus,
        token: &str,
        path: Vec<usize>,
        position: usize,
        start: usize,
    ) -> Self {
        Self {
            status,
            subject: Subject::Text,
            path,
            position,
            string_range: Some(StringRange {
                start,
                end: start.saturating_add(word(token).chars().count()),
            }),
            text: Some(token.to_string()),
        }
    }

    pub fn container(node_type: NodeType, path: Vec<usize>, position: usize) -> Self {
        Self {
            status: ChangeStatus::Unchanged,
            subject: Subject::Container { node_type },
            path,
            position,
            string_range: None,
            text: None,
        }
    }

    pub fn subtree(status: ChangeStatus, node: &Node, path: Vec<usize>, position: usize) -> Self {
        let text = node.plain_text();
        Self {
            status,
            subject: Subject::Subtree { node: node.clone() },
            path,
            position,
            string_range: None,
            text: (!text.is_empty()).then_some(text),
        }
    }

    pub fn is_added(&self) -> bool {
        self.status == ChangeStatus::Added
    }

    pub fn is_removed(&self) -> bool {
        self.status == ChangeStatus::Removed
    }

    pub fn is_change(&self) -> bool {
        self.status != ChangeStatus::Unchanged
    }

    pub fn is_word(&self) -> bool {
        self.subject == Subject::Text
    }

    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// The changed text without trailing whitespace
    pub fn trimmed_text(&self) -> &str {
        word(self.text_str())
    }
}

/// Counters collected during a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    /// Levels of the tree walk where no child pair matched
    pub exhausted_levels: usize,
}

impl DiffStats {
    pub fn record(&mut self, status: ChangeStatus) {
        match status {
            ChangeStatus::Unchanged => self.unchanged += 1,
            ChangeStatus::Added => self.added += 1,
            ChangeStatus::Removed => self.removed += 1,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Result of diffing a source document against a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffOutput {
    pub segments: Vec<DiffSegment>,
    pub mode: DiffMode,
    pub stats: DiffStats,
    /// Set when there was nothing to diff against; renderers leave the
    /// source untouched
    #[serde(default)]
    pub skipped: bool,
    /// Images and hard breaks left out of a plain-text diff, keyed by their
    /// offset in the projected source text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atoms: Vec<ProjectedAtom>,
}

impl DiffOutput {
    pub fn new(mode: DiffMode) -> Self {
        Self {
            segments: Vec::new(),
            mode,
            stats: DiffStats::default(),
            skipped: false,
            atoms: Vec::new(),
        }
    }

    pub fn skipped(mode: DiffMode) -> Self {
        Self {
            skipped: true,
            ..Self::new(mode)
        }
    }

    pub fn push(&mut self, segment: DiffSegment) {
        self.stats.record(segment.status);
        self.segments.push(segment);
    }

    pub fn has_changes(&self) -> bool {
        self.stats.has_changes()
    }

    pub fn added(&self) -> impl Iterator<Item = &DiffSegment> {
        self.segments.iter().filter(|s| s.is_added())
    }

    pub fn removed(&self) -> impl Iterator<Item = &DiffSegment> {
        self.segments.iter().filter(|s| s.is_removed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_segment_range_excludes_whitespace() {
        let segment = DiffSegment::word(ChangeStatus::Added, "down. ", vec![], 13, 12);
        assert_eq!(segment.string_range, Some(StringRange { start: 12, end: 17 }));
        assert_eq!(segment.trimmed_text(), "down.");
        assert_eq!(segment.text_str(), "down. ");
    }

    #[test]
    fn test_word_segment_range_saturates() {
        let segment = DiffSegment::word(ChangeStatus::Added, "x", vec![], 0, usize::MAX);
        assert_eq!(
            segment.string_range,
            Some(StringRange {
                start: usize::MAX,
                end: usize::MAX
            })
        );
    }

    #[test]
    fn test_output_counts() {
        let mut output = DiffOutput::new(DiffMode::PlainText);
        output.push(DiffSegment::word(ChangeStatus::Unchanged, "a ", vec![], 1, 0));
        output.push(DiffSegment::word(ChangeStatus::Removed, "b", vec![], 3, 2));

        assert_eq!(output.stats.unchanged, 1);
        assert_eq!(output.stats.removed, 1);
        assert!(output.has_changes());
        assert_eq!(output.removed().count(), 1);
    }

    #[test]
    fn test_segment_json() {
        let segment = DiffSegment::subtree(
            ChangeStatus::Removed,
            &Node::image("a.png"),
            vec![0, 1],
            4,
        );
        let json = serde_json::to_value(&segment).unwrap();

        assert_eq!(json["status"], "removed");
        assert_eq!(json["subject"]["kind"], "subtree");
        assert!(json.get("text").is_none());
    }
}
