//! # Correction Session
//!
//! Ties one document to its correction state. The session plays the part of
//! the host editor: every edit goes through it, and it runs the sync
//! controller after each edit and each new correction result.

use crate::sync::{CorrectionSync, DecorationSync, SyncOutcome};
use crate::{Document, EditorError, Mutation, MutationResult, Pipeline};
use proofmark_annotator::DecorationSet;
use serde::{Deserialize, Serialize};

/// How corrections are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationMode {
    /// Correction markers are written into the document
    #[default]
    Rebuild,
    /// The document is left alone and decorations describe the changes
    Decorate,
}

/// One document under correction
pub struct CorrectionSession {
    /// Unique session identifier
    pub id: String,

    pub mode: AnnotationMode,

    document: Document,
    sync: CorrectionSync,
    decorations: DecorationSync,
}

impl CorrectionSession {
    pub fn new(
        id: impl Into<String>,
        document: Document,
        mode: AnnotationMode,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            id: id.into(),
            mode,
            document,
            sync: CorrectionSync::new(pipeline.clone()),
            decorations: DecorationSync::new(pipeline),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn corrected_text(&self) -> &str {
        self.sync.corrected_text()
    }

    /// Feed a new result from the correction service
    pub fn set_corrected_text(
        &mut self,
        text: impl Into<String>,
    ) -> Result<SyncOutcome, EditorError> {
        self.sync.set_corrected_text(text);
        self.refresh()
    }

    /// Apply an edit and bring the annotations up to date
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let result = self.document.apply(mutation)?;
        self.sync.document_changed();
        self.refresh()?;
        Ok(result)
    }

    /// Current decorations (decoration mode)
    pub fn decorations(&self) -> &DecorationSet {
        self.decorations.decorations()
    }

    fn refresh(&mut self) -> Result<SyncOutcome, EditorError> {
        match self.mode {
            AnnotationMode::Rebuild => self.sync.sync(&mut self.document),
            AnnotationMode::Decorate => {
                self.decorations
                    .update(&self.document, self.sync.corrected_text());
                Ok(SyncOutcome::Skipped)
            }
        }
    }
}
