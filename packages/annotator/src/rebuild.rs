//! Rebuild mode: produce a replacement document with inline correction markers

use proofmark_differ::{ChangeStatus, DiffMode, DiffOutput, DiffSegment, ProjectedAtom, Subject};
use proofmark_document::{CorrectionMark, Node};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Render a diff as a new document.
///
/// A skipped diff yields an unchanged copy of `source`.
pub fn rebuild(source: &Node, output: &DiffOutput) -> Node {
    if output.skipped {
        return source.clone();
    }
    match output.mode {
        DiffMode::PlainText => rebuild_from_text(&output.segments, &output.atoms),
        DiffMode::Structural => rebuild_from_tree(source, &output.segments),
    }
}

/// A run of adjacent tokens sharing one status
struct Run {
    status: ChangeStatus,
    text: String,
}

fn coalesce<'s>(segments: impl IntoIterator<Item = &'s DiffSegment>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for segment in segments {
        let text = segment.text_str();
        if text.is_empty() {
            continue;
        }
        match runs.last_mut() {
            Some(run) if run.status == segment.status => run.text.push_str(text),
            _ => runs.push(Run {
                status: segment.status,
                text: text.to_string(),
            }),
        }
    }
    runs
}

fn marker(status: ChangeStatus, text: String) -> Node {
    match status {
        ChangeStatus::Added => CorrectionMark::added(text).into_node(),
        ChangeStatus::Removed => CorrectionMark::removed(text).into_node(),
        ChangeStatus::Unchanged => Node::text(text),
    }
}

/// Build `Doc[Paragraph[...]]` from a whole-document word diff.
///
/// Unchanged runs become text leaves, added and removed runs become
/// correction markers. `atoms` are put back where they sat in the source
/// text, splitting a run if needed; the characters a hard break stood for
/// are not repeated as text.
pub fn rebuild_from_text(segments: &[DiffSegment], atoms: &[ProjectedAtom]) -> Node {
    let mut builder = TextRebuilder::new(atoms);
    for segment in segments {
        let start = segment.string_range.map_or(builder.cursor, |range| range.start);
        if segment.is_added() {
            builder.flush_atoms(start);
            builder.push_str(segment.status, segment.text_str());
        } else {
            for (i, c) in segment.text_str().chars().enumerate() {
                builder.push_old_char(segment.status, start.saturating_add(i), c);
            }
        }
    }
    builder.flush_atoms(usize::MAX);

    Node::doc(vec![Node::paragraph(builder.finish())])
}

enum Piece {
    Run(Run),
    Atom(Node),
}

/// Interleaves diff runs with the atoms of the source text
struct TextRebuilder<'a> {
    atoms: &'a [ProjectedAtom],
    next_atom: usize,
    /// Offset in the source text just past the last old-side character
    cursor: usize,
    pieces: Vec<Piece>,
}

impl<'a> TextRebuilder<'a> {
    fn new(atoms: &'a [ProjectedAtom]) -> Self {
        Self {
            atoms,
            next_atom: 0,
            cursor: 0,
            pieces: Vec::new(),
        }
    }

    /// Emit every atom sitting at or before `offset`
    fn flush_atoms(&mut self, offset: usize) {
        while let Some(atom) = self.atoms.get(self.next_atom) {
            if atom.offset > offset {
                break;
            }
            self.pieces.push(Piece::Atom(atom.node.clone()));
            self.next_atom += 1;
        }
    }

    /// Whether the source character at `offset` was produced by an atom
    fn is_atom_text(&self, offset: usize) -> bool {
        self.atoms
            .iter()
            .any(|atom| offset >= atom.offset && offset - atom.offset < atom.width)
    }

    fn push_old_char(&mut self, status: ChangeStatus, offset: usize, c: char) {
        self.flush_atoms(offset);
        self.cursor = offset.saturating_add(1);
        if !self.is_atom_text(offset) {
            self.push_char(status, c);
        }
    }

    fn push_str(&mut self, status: ChangeStatus, text: &str) {
        for c in text.chars() {
            self.push_char(status, c);
        }
    }

    fn push_char(&mut self, status: ChangeStatus, c: char) {
        match self.pieces.last_mut() {
            Some(Piece::Run(run)) if run.status == status => run.text.push(c),
            _ => self.pieces.push(Piece::Run(Run {
                status,
                text: c.to_string(),
            })),
        }
    }

    fn finish(self) -> Vec<Node> {
        self.pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Run(run) => marker(run.status, run.text),
                Piece::Atom(node) => node,
            })
            .collect()
    }
}

/// Segments of a structural diff grouped by where they apply
#[derive(Default)]
struct SegmentIndex<'s> {
    words: HashMap<&'s [usize], Vec<&'s DiffSegment>>,
    removed: HashSet<&'s [usize]>,
    /// Keyed by parent path, ordered by child index
    added: HashMap<&'s [usize], Vec<(usize, &'s Node)>>,
}

impl<'s> SegmentIndex<'s> {
    fn new(segments: &'s [DiffSegment]) -> Self {
        let mut index = Self::default();
        for segment in segments {
            match (&segment.subject, segment.status) {
                (Subject::Text, _) => index
                    .words
                    .entry(segment.path.as_slice())
                    .or_default()
                    .push(segment),
                (Subject::Subtree { .. }, ChangeStatus::Removed) => {
                    index.removed.insert(segment.path.as_slice());
                }
                (Subject::Subtree { node }, ChangeStatus::Added) => {
                    if let Some((&last, parent)) = segment.path.split_last() {
                        index.added.entry(parent).or_default().push((last, node));
                    }
                }
                _ => {}
            }
        }
        index
    }

    fn added_root(segments: &'s [DiffSegment]) -> Option<&'s Node> {
        segments.iter().find_map(|segment| match &segment.subject {
            Subject::Subtree { node } if segment.is_added() && segment.path.is_empty() => Some(node),
            _ => None,
        })
    }
}

/// Rewrite `source` in place from a structural diff.
///
/// Changed text leaves are split into runs, removed subtrees keep their
/// shape with text turned into removed markers, and added subtrees are
/// inserted with text turned into added markers. Non-text content passes
/// through untouched.
pub fn rebuild_from_tree(source: &Node, segments: &[DiffSegment]) -> Node {
    if let Some(root) = SegmentIndex::added_root(segments) {
        debug!("Root replaced, rebuilding from the target tree");
        let mut rebuilt = mark_subtree(root, ChangeStatus::Added);
        rebuilt.normalize();
        return rebuilt;
    }

    let index = SegmentIndex::new(segments);
    let mut path = Vec::new();
    let mut rebuilt = Node {
        children: rebuild_children(source, &mut path, &index),
        ..shallow(source)
    };
    rebuilt.normalize();
    rebuilt
}

fn shallow(node: &Node) -> Node {
    Node {
        node_type: node.node_type,
        attrs: node.attrs.clone(),
        children: Vec::new(),
        text: node.text.clone(),
    }
}

fn rebuild_children(parent: &Node, path: &mut Vec<usize>, index: &SegmentIndex<'_>) -> Vec<Node> {
    let added = index.added.get(path.as_slice()).map(Vec::as_slice).unwrap_or(&[]);
    let count = added
        .iter()
        .map(|(i, _)| i + 1)
        .fold(parent.children.len(), usize::max);

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        path.push(i);
        if let Some(child) = parent.children.get(i) {
            if index.removed.contains(path.as_slice()) {
                out.push(mark_subtree(child, ChangeStatus::Removed));
            } else if child.is_text() {
                out.extend(text_runs(child, index.words.get(path.as_slice())));
            } else if child.node_type.is_leaf() {
                out.push(child.clone());
            } else {
                out.push(Node {
                    children: rebuild_children(child, path, index),
                    ..shallow(child)
                });
            }
        }
        out.extend(
            added
                .iter()
                .filter(|(idx, _)| *idx == i)
                .map(|(_, node)| mark_subtree(node, ChangeStatus::Added)),
        );
        path.pop();
    }
    out
}

fn text_runs(leaf: &Node, words: Option<&Vec<&DiffSegment>>) -> Vec<Node> {
    let Some(words) = words else {
        return vec![leaf.clone()];
    };
    coalesce(words.iter().copied())
        .into_iter()
        .map(|run| match run.status {
            ChangeStatus::Unchanged => Node {
                text: Some(run.text),
                ..shallow(leaf)
            },
            status => marker(status, run.text),
        })
        .collect()
}

/// Turn the text inside a one-sided subtree into markers of `status`
fn mark_subtree(node: &Node, status: ChangeStatus) -> Node {
    if node.is_text() {
        return marker(status, node.text_str().to_string());
    }
    if node.node_type.is_leaf() {
        return node.clone();
    }
    Node {
        children: node
            .children
            .iter()
            .filter(|child| !(child.is_text() && child.text_str().is_empty()))
            .map(|child| mark_subtree(child, status))
            .collect(),
        ..shallow(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_differ::{diff_documents, diff_trees, DiffConfig, Target};
    use proofmark_document::{nested_marker_count, NodeType};

    fn markers(node: &Node) -> Vec<CorrectionMark> {
        let mut found = Vec::new();
        collect_markers(node, &mut found);
        found
    }

    fn collect_markers(node: &Node, found: &mut Vec<CorrectionMark>) {
        found.extend(CorrectionMark::from_node(node));
        for child in &node.children {
            collect_markers(child, found);
        }
    }

    #[test]
    fn test_rebuild_from_text_coalesces_runs() {
        let source = Node::doc(vec![Node::paragraph(vec![Node::text("The cat sat.")])]);
        let output = diff_documents(
            &source,
            Target::Text("The cat sat down."),
            &DiffConfig::default(),
        );
        let rebuilt = rebuild(&source, &output);

        let para = &rebuilt.children[0];
        assert_eq!(para.children.len(), 3);
        assert_eq!(para.children[0].text_str(), "The cat ");
        assert_eq!(
            markers(&rebuilt),
            vec![
                CorrectionMark::removed("sat."),
                CorrectionMark::added("sat down."),
            ]
        );
    }

    #[test]
    fn test_rebuild_from_text_keeps_images() {
        let source = Node::doc(vec![Node::paragraph(vec![
            Node::text("Hello "),
            Node::image("fig.png"),
            Node::text("wrold"),
        ])]);
        let output = diff_documents(&source, Target::Text("Hello world"), &DiffConfig::default());
        let rebuilt = rebuild(&source, &output);

        assert_eq!(rebuilt.count(NodeType::Image), 1);
        let para = &rebuilt.children[0];
        assert_eq!(para.children[0].text_str(), "Hello ");
        assert_eq!(para.children[1], Node::image("fig.png"));
        assert_eq!(
            markers(&rebuilt),
            vec![CorrectionMark::removed("wrold"), CorrectionMark::added("world")]
        );
    }

    #[test]
    fn test_rebuild_from_text_splits_run_at_image() {
        let source = Node::doc(vec![Node::paragraph(vec![
            Node::text("a "),
            Node::image("mid.png"),
            Node::text("b c"),
            Node::image("end.png"),
        ])]);
        let output = diff_documents(&source, Target::Text("a b d"), &DiffConfig::default());
        let rebuilt = rebuild(&source, &output);

        let para = &rebuilt.children[0];
        assert_eq!(rebuilt.count(NodeType::Image), 2);
        assert_eq!(para.children[0].text_str(), "a ");
        assert_eq!(para.children[1].attr_str("src"), Some("mid.png"));
        assert_eq!(para.children[2].text_str(), "b ");
        assert_eq!(
            CorrectionMark::from_node(&para.children[3]),
            Some(CorrectionMark::removed("c"))
        );
        // the trailing image sits at the insertion point of the added word
        assert_eq!(para.children[4].attr_str("src"), Some("end.png"));
        assert_eq!(
            CorrectionMark::from_node(&para.children[5]),
            Some(CorrectionMark::added("d"))
        );
    }

    #[test]
    fn test_rebuild_from_text_keeps_hard_breaks() {
        let source = Node::doc(vec![Node::paragraph(vec![
            Node::text("one"),
            Node::hard_break(),
            Node::text("two"),
        ])]);
        let output = diff_documents(&source, Target::Text("one\ntwo"), &DiffConfig::default());

        assert_eq!(rebuild(&source, &output), source);
    }

    #[test]
    fn test_rebuild_identical_keeps_text() {
        let source = Node::doc(vec![Node::paragraph(vec![Node::text("All good here.")])]);
        let output = diff_documents(&source, Target::Text("All good here."), &DiffConfig::default());
        let rebuilt = rebuild(&source, &output);

        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_skipped_output_returns_source() {
        let source = Node::doc(vec![Node::heading(1, vec![Node::text("Title")])]);
        let rebuilt = rebuild(&source, &DiffOutput::skipped(DiffMode::PlainText));
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_rebuild_from_tree_keeps_structure_and_marks() {
        let source = Node::doc(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("a b c").with_attr("bold", true),
                Node::image("fig.png"),
            ]),
        ]);
        let target = Node::doc(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("a x c").with_attr("bold", true),
                Node::image("fig.png"),
            ]),
        ]);
        let output = diff_trees(&source, &target, &DiffConfig::default());
        let rebuilt = rebuild(&source, &output);

        assert_eq!(rebuilt.children[0], source.children[0]);
        let para = &rebuilt.children[1];
        assert!(para.children[0].attr_bool("bold"));
        assert_eq!(para.children[0].text_str(), "a ");
        assert_eq!(
            CorrectionMark::from_node(&para.children[1]),
            Some(CorrectionMark::removed("b "))
        );
        assert_eq!(
            CorrectionMark::from_node(&para.children[2]),
            Some(CorrectionMark::added("x "))
        );
        assert_eq!(para.children.last().map(|n| n.node_type), Some(NodeType::Image));
    }

    #[test]
    fn test_rebuild_from_tree_subtrees() {
        let source = Node::doc(vec![
            Node::paragraph(vec![Node::text("old")]),
            Node::paragraph(vec![Node::image("kept.png")]),
        ]);
        let target = Node::doc(vec![
            Node::heading(2, vec![Node::text("new")]),
            Node::paragraph(vec![Node::image("kept.png")]),
            Node::paragraph(vec![Node::text("tail")]),
        ]);
        let output = diff_trees(&source, &target, &DiffConfig::default());
        let rebuilt = rebuild(&source, &output);

        let types: Vec<_> = rebuilt.children.iter().map(|n| n.node_type).collect();
        assert_eq!(
            types,
            vec![
                NodeType::Paragraph,
                NodeType::Heading,
                NodeType::Paragraph,
                NodeType::Paragraph,
            ]
        );
        assert_eq!(
            markers(&rebuilt),
            vec![
                CorrectionMark::removed("old"),
                CorrectionMark::added("new"),
                CorrectionMark::added("tail"),
            ]
        );
        assert_eq!(nested_marker_count(&rebuilt), 0);
    }
}
