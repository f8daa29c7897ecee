//! Decoration mode: describe the changes as overlay instructions instead of
//! editing the document

use crate::config::AnnotatorConfig;
use proofmark_differ::{DiffOutput, DiffSegment};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Styling over a document range
    Highlight,
    /// Content shown at a single position (`range` is empty)
    Widget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub range: Range<usize>,
    pub label: String,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn highlight(range: Range<usize>, label: impl Into<String>) -> Self {
        Self {
            range,
            label: label.into(),
            kind: DecorationKind::Highlight,
        }
    }

    pub fn widget(at: usize, label: impl Into<String>) -> Self {
        Self {
            range: at..at,
            label: label.into(),
            kind: DecorationKind::Widget,
        }
    }
}

/// Decorations for one document state, ordered by start position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn highlights(&self) -> impl Iterator<Item = &Decoration> {
        self.iter().filter(|d| d.kind == DecorationKind::Highlight)
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Decoration> {
        self.iter().filter(|d| d.kind == DecorationKind::Widget)
    }
}

impl FromIterator<Decoration> for DecorationSet {
    fn from_iter<I: IntoIterator<Item = Decoration>>(iter: I) -> Self {
        let mut decorations: Vec<Decoration> = iter.into_iter().collect();
        decorations.sort_by_key(|d| d.range.start);
        Self { decorations }
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}

/// Build decorations for the changed words of a diff.
///
/// Each added word gets a highlight starting at its position and a widget
/// right after it carrying the word. Every offset is clamped to
/// `content_size`.
pub fn decorate(
    segments: &[DiffSegment],
    content_size: usize,
    config: &AnnotatorConfig,
) -> DecorationSet {
    let clamp = |offset: usize| offset.min(content_size);

    segments
        .iter()
        .filter_map(|segment| segment.string_range.map(|range| (segment, range)))
        .flat_map(|(segment, range)| {
            let start = clamp(segment.position);
            let end = clamp(segment.position.saturating_add(range.len()).saturating_add(1));

            if segment.is_added() {
                vec![
                    Decoration::highlight(start..end, config.highlight_label.as_str()),
                    Decoration::widget(end, segment.trimmed_text()),
                ]
            } else if segment.is_removed() && config.render_removed {
                let end = clamp(segment.position.saturating_add(range.len()));
                vec![Decoration::highlight(start..end, config.removed_label.as_str())]
            } else {
                Vec::new()
            }
        })
        .collect()
}

/// Decorations for a whole diff, empty when the diff was skipped
pub fn decorate_output(
    output: &DiffOutput,
    content_size: usize,
    config: &AnnotatorConfig,
) -> DecorationSet {
    if output.skipped {
        return DecorationSet::empty();
    }
    decorate(&output.segments, content_size, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_differ::{diff_documents, ChangeStatus, DiffConfig, Target};
    use proofmark_document::Node;

    fn scenario() -> (Node, DiffOutput) {
        let source = Node::doc(vec![Node::paragraph(vec![Node::text("The cat sat.")])]);
        let output = diff_documents(
            &source,
            Target::Text("The cat sat down."),
            &DiffConfig::default(),
        );
        (source, output)
    }

    #[test]
    fn test_added_words_decorated() {
        let (source, output) = scenario();
        let set = decorate(&output.segments, source.content_size(), &AnnotatorConfig::default());

        let labels: Vec<_> = set.widgets().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["sat", "down."]);
        assert_eq!(set.highlights().count(), 2);
        assert!(set.iter().all(|d| d.range.end <= source.content_size()));
    }

    #[test]
    fn test_removed_words_opt_in() {
        let (source, output) = scenario();
        let size = source.content_size();

        let default_set = decorate(&output.segments, size, &AnnotatorConfig::default());
        assert!(default_set
            .highlights()
            .all(|d| d.label != crate::config::DEFAULT_REMOVED_LABEL));

        let config = AnnotatorConfig::default().with_render_removed(true);
        let set = decorate(&output.segments, size, &config);
        let removed: Vec<_> = set
            .highlights()
            .filter(|d| d.label == crate::config::DEFAULT_REMOVED_LABEL)
            .collect();
        assert_eq!(removed.len(), 1);
        // "sat." starts at 9
        assert_eq!(removed[0].range, 9..13);
    }

    #[test]
    fn test_offsets_clamped() {
        let segments = vec![DiffSegment::word(ChangeStatus::Added, "far ", vec![], 500, 499)];
        let set = decorate(&segments, 10, &AnnotatorConfig::default());

        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|d| d.range.start <= 10 && d.range.end <= 10));
    }

    #[test]
    fn test_offsets_near_usize_max_clamped() {
        let segments = vec![
            DiffSegment::word(ChangeStatus::Added, "x", vec![], usize::MAX, 0),
            DiffSegment::word(ChangeStatus::Removed, "y", vec![], usize::MAX - 1, 0),
        ];
        let config = AnnotatorConfig::default().with_render_removed(true);
        let set = decorate(&segments, 10, &config);

        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|d| d.range == (10..10)));
    }

    #[test]
    fn test_skipped_output_has_no_decorations() {
        let output = DiffOutput::skipped(proofmark_differ::DiffMode::PlainText);
        assert!(decorate_output(&output, 10, &AnnotatorConfig::default()).is_empty());
    }

    #[test]
    fn test_set_sorted_by_start() {
        let set: DecorationSet = vec![
            Decoration::widget(8, "b"),
            Decoration::highlight(2..4, "a"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.iter().next().map(|d| d.range.start), Some(2));
        assert_eq!(set.highlights().count(), 1);
    }
}
