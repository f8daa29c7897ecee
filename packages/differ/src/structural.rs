//! Structural differ
//!
//! Compares a source document against a target, either another tree or the
//! plain text returned by a correction service, and produces an ordered list
//! of segments carrying absolute source positions.

use crate::config::{DiffConfig, DiffMode};
use crate::position::{PositionTracker, TextProjection};
use crate::segment::{DiffOutput, DiffSegment};
use crate::sequence::{diff_words, ChangeStatus};
use proofmark_document::Node;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// What the source document is compared against
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Tree(&'a Node),
    Text(&'a str),
}

/// Diff `source` against `target`.
///
/// Text targets take the plain-text path unless the config asks for
/// structural mode, in which case they are parsed as markup first.
#[instrument(skip_all, fields(mode = ?config.mode, source_size = source.content_size()))]
pub fn diff_documents(source: &Node, target: Target<'_>, config: &DiffConfig) -> DiffOutput {
    info!("Starting document diff");

    let output = match target {
        Target::Tree(tree) => diff_trees(source, tree, config),
        Target::Text(text) => match config.mode {
            DiffMode::PlainText => diff_plain_text(source, text, config),
            DiffMode::Structural => {
                let tree = parse_target(text);
                diff_trees(source, &tree, config)
            }
        },
    };

    info!(
        unchanged = output.stats.unchanged,
        added = output.stats.added,
        removed = output.stats.removed,
        exhausted_levels = output.stats.exhausted_levels,
        "Document diff finished"
    );
    output
}

/// Word diff of the whole document's text against `text`.
pub fn diff_plain_text(source: &Node, text: &str, config: &DiffConfig) -> DiffOutput {
    let projection = TextProjection::from_node(source, &config.block_separator);
    let mut output = DiffOutput::new(DiffMode::PlainText);

    for change in diff_words(projection.text(), text) {
        output.push(DiffSegment::word(
            change.status,
            change.value,
            Vec::new(),
            projection.doc_position(change.old_offset),
            change.old_offset,
        ));
    }
    output.atoms = projection.into_atoms();
    output
}

/// Walk both trees, comparing children positionally.
pub fn diff_trees(source: &Node, target: &Node, config: &DiffConfig) -> DiffOutput {
    let mut walker = TreeWalker::new(config);
    walker.diff_root(source, target);
    walker.output
}

/// Parse a markup target, falling back to a single paragraph of its text.
pub fn parse_target(text: &str) -> Node {
    match proofmark_parser::parse(text) {
        Ok(tree) => tree,
        Err(err) => {
            warn!(error = %err, "Target is not valid markup, diffing it as plain text");
            plain_document(text)
        }
    }
}

/// A document holding `text` as its only paragraph
pub fn plain_document(text: &str) -> Node {
    let children = if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    };
    Node::doc(vec![Node::paragraph(children)])
}

struct TreeWalker<'c> {
    config: &'c DiffConfig,
    output: DiffOutput,
}

impl<'c> TreeWalker<'c> {
    fn new(config: &'c DiffConfig) -> Self {
        Self {
            config,
            output: DiffOutput::new(DiffMode::Structural),
        }
    }

    fn diff_root(&mut self, source: &Node, target: &Node) {
        if self.same_node(source, target) {
            let mut path = Vec::new();
            self.diff_children(source, target, &mut path, PositionTracker::at(0));
        } else {
            debug!(
                source = source.node_type.name(),
                target = target.node_type.name(),
                "Root nodes differ"
            );
            self.output.stats.exhausted_levels += 1;
            self.output
                .push(DiffSegment::subtree(ChangeStatus::Removed, source, Vec::new(), 0));
            self.output
                .push(DiffSegment::subtree(ChangeStatus::Added, target, Vec::new(), 0));
        }
    }

    fn diff_children(
        &mut self,
        source: &Node,
        target: &Node,
        path: &mut Vec<usize>,
        start: PositionTracker,
    ) {
        let mut pos = start;
        let mut matched = 0;
        let len = source.children.len().max(target.children.len());

        for i in 0..len {
            path.push(i);
            match (source.children.get(i), target.children.get(i)) {
                (Some(old), Some(new)) if self.same_node(old, new) => {
                    matched += 1;
                    self.diff_matched(old, new, path, pos);
                    pos.advance(old);
                }
                (Some(old), new) => {
                    self.output.push(DiffSegment::subtree(
                        ChangeStatus::Removed,
                        old,
                        path.clone(),
                        pos.offset(),
                    ));
                    pos.advance(old);
                    if let Some(new) = new {
                        self.push_added(new, path, pos);
                    }
                }
                (None, Some(new)) => self.push_added(new, path, pos),
                (None, None) => {}
            }
            path.pop();
        }

        if matched == 0 && !source.children.is_empty() && !target.children.is_empty() {
            debug!(
                path = ?path,
                node = source.node_type.name(),
                children = len,
                "No child pair matched at this level"
            );
            self.output.stats.exhausted_levels += 1;
        }
    }

    fn diff_matched(&mut self, old: &Node, new: &Node, path: &[usize], pos: PositionTracker) {
        if old.is_text() {
            for change in diff_words(old.text_str(), new.text_str()) {
                self.output.push(DiffSegment::word(
                    change.status,
                    change.value,
                    path.to_vec(),
                    pos.offset() + change.old_offset,
                    change.old_offset,
                ));
            }
            return;
        }

        self.output
            .push(DiffSegment::container(old.node_type, path.to_vec(), pos.offset()));

        if !old.node_type.is_leaf() {
            let mut child_path = path.to_vec();
            self.diff_children(old, new, &mut child_path, pos.enter());
        }
    }

    fn push_added(&mut self, node: &Node, path: &[usize], pos: PositionTracker) {
        self.output.push(DiffSegment::subtree(
            ChangeStatus::Added,
            node,
            path.to_vec(),
            pos.offset(),
        ));
    }

    /// Same type and same attributes, ignoring the configured volatile ones
    fn same_node(&self, a: &Node, b: &Node) -> bool {
        a.node_type == b.node_type
            && significant_attrs(a, self.config).eq(significant_attrs(b, self.config))
    }
}

fn significant_attrs<'a>(
    node: &'a Node,
    config: &'a DiffConfig,
) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
    node.attrs
        .iter()
        .filter(move |(key, _)| !config.is_ignored(key))
}
