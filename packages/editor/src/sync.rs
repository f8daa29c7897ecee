//! # Correction Sync
//!
//! Decides when a document needs to be annotated again.
//!
//! Two inputs feed the controller: the corrected text supplied by the
//! correction service and change notifications from the editor. An empty
//! corrected text means no correction has arrived yet.

use crate::{Document, EditorError, Pipeline};
use proofmark_annotator::DecorationSet;
use proofmark_differ::DiffStats;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The document reflects the cached correction
    Idle,
    /// The document changed since it was last annotated
    Dirty,
}

/// What a sync call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Skipped,
    Annotated { version: u64, stats: DiffStats },
}

/// Keeps correction markers in a document in step with the latest
/// corrected text (rebuild mode)
#[derive(Debug, Clone)]
pub struct CorrectionSync {
    pipeline: Pipeline,
    state: SyncState,
    corrected: String,
    /// Corrected text of the last annotation
    cached: Option<String>,
}

impl CorrectionSync {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            state: SyncState::Idle,
            corrected: String::new(),
            cached: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn corrected_text(&self) -> &str {
        &self.corrected
    }

    pub fn cached_text(&self) -> Option<&str> {
        self.cached.as_deref()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn set_corrected_text(&mut self, text: impl Into<String>) {
        self.corrected = text.into();
    }

    /// Called for every change the editor makes to the document
    pub fn document_changed(&mut self) {
        if self.cached.is_some() {
            self.state = SyncState::Dirty;
        }
    }

    pub fn needs_annotation(&self) -> bool {
        if self.corrected.is_empty() {
            return false;
        }
        self.cached.as_deref() != Some(self.corrected.as_str()) || self.state == SyncState::Dirty
    }

    /// Annotate `document` if needed. The replacement is one change to the
    /// document and does not count as an edit.
    pub fn sync(&mut self, document: &mut Document) -> Result<SyncOutcome, EditorError> {
        if !self.needs_annotation() {
            debug!(state = ?self.state, "Correction sync skipped");
            return Ok(SyncOutcome::Skipped);
        }

        let clean = self.pipeline.clean(document.root());
        self.cached = Some(self.corrected.clone());

        let diff = self.pipeline.diff(&clean, &self.corrected);
        let annotated = self.pipeline.annotate(&clean, &diff);
        let result = document.replace_all(annotated)?;
        self.state = SyncState::Idle;

        info!(
            version = result.version,
            added = diff.stats.added,
            removed = diff.stats.removed,
            "Document annotated"
        );
        Ok(SyncOutcome::Annotated {
            version: result.version,
            stats: diff.stats,
        })
    }
}

/// Keeps a decoration set in step with the document and corrected text
/// (decoration mode)
#[derive(Debug, Clone)]
pub struct DecorationSync {
    pipeline: Pipeline,
    seen: Option<(u64, String)>,
    decorations: DecorationSet,
    recomputed: usize,
}

impl DecorationSync {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            seen: None,
            decorations: DecorationSet::empty(),
            recomputed: 0,
        }
    }

    /// Recompute the decorations if the document version or the corrected
    /// text changed since the last call
    pub fn update(&mut self, document: &Document, corrected: &str) -> &DecorationSet {
        let unchanged = self
            .seen
            .as_ref()
            .is_some_and(|(version, text)| *version == document.version && text == corrected);

        if !unchanged {
            let diff = self.pipeline.diff(document.root(), corrected);
            self.decorations = self.pipeline.decorate(document.root(), &diff);
            self.seen = Some((document.version, corrected.to_string()));
            self.recomputed += 1;
            debug!(
                version = document.version,
                decorations = self.decorations.len(),
                "Decorations recomputed"
            );
        }
        &self.decorations
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Number of times the set was rebuilt
    pub fn recomputed(&self) -> usize {
        self.recomputed
    }
}
