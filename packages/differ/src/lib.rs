//! # Proofmark Differ
//!
//! Word-level and structural comparison of a document against a corrected
//! version of it.
//!
//! ## Pipeline
//!
//! 1. **Tokenize**: split text into words that keep their trailing whitespace
//! 2. **Sequence diff**: align old and new tokens with an LCS table
//! 3. **Structural diff**: walk the trees (or a text projection of them) and
//!    attach absolute source positions to each classified token
//!
//! The result is a [`DiffOutput`] which the annotator either rebuilds into a
//! marked-up document or turns into decorations.

pub mod config;
pub mod position;
pub mod segment;
pub mod sequence;
pub mod structural;
pub mod tokenizer;

pub use config::{DiffConfig, DiffMode};
pub use position::{PositionTracker, ProjectedAtom, TextProjection};
pub use segment::{DiffOutput, DiffSegment, DiffStats, StringRange, Subject};
pub use sequence::{diff_sequences, diff_words, ChangeStatus, Edit, WordChange};
pub use structural::{
    diff_documents, diff_plain_text, diff_trees, parse_target, plain_document, Target,
};
pub use tokenizer::{token_len, tokenize};
