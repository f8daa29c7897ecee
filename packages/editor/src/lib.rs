//! # Proofmark Editor
//!
//! Document handle and correction sync for proofmark.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save documents (markup or JSON)     │
//! │  - Apply mutations with validation          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ sync: decide when to annotate again         │
//! │  - Cache of the last corrected text         │
//! │  - Strip → diff → rebuild → replace         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ differ + annotator: segments → markers or   │
//! │ decorations                                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use proofmark_editor::{AnnotationMode, CorrectionSession, Document, Pipeline};
//!
//! let doc = Document::load("draft.html")?;
//! let mut session = CorrectionSession::new("draft", doc, AnnotationMode::Rebuild, Pipeline::default());
//!
//! // Result from the correction service
//! session.set_corrected_text(corrected)?;
//!
//! let annotated = session.document().render()?;
//! ```

mod document;
mod errors;
mod mutations;
mod pipeline;
mod session;
mod sync;

pub use document::{Document, DocumentFormat};
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError, MutationResult};
pub use pipeline::{Pipeline, PipelineResult};
pub use session::{AnnotationMode, CorrectionSession};
pub use sync::{CorrectionSync, DecorationSync, SyncOutcome, SyncState};

// Re-export common types for convenience
pub use proofmark_annotator::{AnnotatorConfig, DecorationSet, StripPolicy};
pub use proofmark_differ::{DiffConfig, DiffMode};
pub use proofmark_document::Node;
