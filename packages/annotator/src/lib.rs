//! # Proofmark Annotator
//!
//! Two renderers over one [`DiffOutput`](proofmark_differ::DiffOutput):
//!
//! - [`rebuild`] produces a replacement document where changed words are
//!   inline correction markers
//! - [`decorate`] leaves the document alone and describes the changes as
//!   highlights and widgets
//!
//! [`strip_markers`] undoes a previous rebuild so annotation can run again
//! on a clean document.

pub mod config;
pub mod decoration;
pub mod rebuild;
pub mod strip;

pub use config::AnnotatorConfig;
pub use decoration::{decorate, decorate_output, Decoration, DecorationKind, DecorationSet};
pub use rebuild::{rebuild, rebuild_from_text, rebuild_from_tree};
pub use strip::{strip_markers, stripped, StripPolicy};
