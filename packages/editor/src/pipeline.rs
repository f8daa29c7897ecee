//! # Correction Pipeline
//!
//! Coordinates one correction pass: Strip → Diff → Annotate
//!
//! The phases are exposed separately so a host can stop between diffing
//! and annotating, e.g. when a newer correction result has arrived.

use proofmark_annotator::{
    decorate_output, rebuild, stripped, AnnotatorConfig, DecorationSet,
};
use proofmark_differ::{diff_documents, DiffConfig, DiffOutput, Target, TextProjection};
use proofmark_document::Node;
use tracing::{debug, instrument};

/// Differ and annotator settings for a correction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    pub diff_config: DiffConfig,
    pub annotator_config: AnnotatorConfig,
}

impl Pipeline {
    pub fn new(diff_config: DiffConfig, annotator_config: AnnotatorConfig) -> Self {
        Self {
            diff_config,
            annotator_config,
        }
    }

    /// Remove markers a previous pass left in `source`
    pub fn clean(&self, source: &Node) -> Node {
        stripped(source, self.annotator_config.strip_policy)
    }

    /// The text the differ compares a corrected result against: `source`
    /// without markers, blocks joined by the configured separator
    pub fn source_text(&self, source: &Node) -> String {
        let clean = self.clean(source);
        TextProjection::from_node(&clean, &self.diff_config.block_separator)
            .text()
            .to_string()
    }

    /// Diff phase. An empty corrected text yields a skipped output.
    pub fn diff(&self, source: &Node, corrected: &str) -> DiffOutput {
        if corrected.is_empty() {
            debug!("No corrected text, skipping diff");
            return DiffOutput::skipped(self.diff_config.mode);
        }
        diff_documents(source, Target::Text(corrected), &self.diff_config)
    }

    /// Annotate phase for rebuild mode
    pub fn annotate(&self, source: &Node, output: &DiffOutput) -> Node {
        rebuild(source, output)
    }

    /// Annotate phase for decoration mode
    pub fn decorate(&self, source: &Node, output: &DiffOutput) -> DecorationSet {
        decorate_output(output, source.content_size(), &self.annotator_config)
    }

    /// Full rebuild pass over `source`
    #[instrument(skip_all, fields(corrected_len = corrected.len()))]
    pub fn run(&self, source: &Node, corrected: &str) -> PipelineResult {
        let clean = self.clean(source);
        let diff = self.diff(&clean, corrected);
        let document = self.annotate(&clean, &diff);
        PipelineResult { document, diff }
    }
}

/// Result of a rebuild pass
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    /// Replacement document
    pub document: Node,

    /// The diff it was built from
    pub diff: DiffOutput,
}

impl PipelineResult {
    pub fn has_changes(&self) -> bool {
        self.diff.has_changes()
    }
}
