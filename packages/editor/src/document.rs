//! # Document Handle
//!
//! A Document owns one rich-text tree and its editing state.
//! Documents can be:
//! - **Memory-backed**: built from markup, JSON or a tree
//! - **File-backed**: loaded from disk and saved back in the same format
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Edit → Annotate → Save
//!   ↓      ↓       ↓        ↓        ↓
//! File   Tree  Mutations  Markers  File
//! ```

use crate::{EditorError, Mutation, MutationResult};
use proofmark_document::Node;
use std::path::{Path, PathBuf};

/// On-disk representation of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Markup,
}

impl DocumentFormat {
    /// `.json` files hold the tree as JSON, anything else is markup
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Markup,
        }
    }

    pub fn parse(self, source: &str) -> Result<Node, EditorError> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(source)?),
            DocumentFormat::Markup => Ok(proofmark_parser::parse(source)?),
        }
    }

    pub fn render(self, root: &Node) -> Result<String, EditorError> {
        match self {
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(root)?),
            DocumentFormat::Markup => Ok(proofmark_parser::serialize(root)),
        }
    }
}

/// Editable rich-text document
#[derive(Debug, Clone)]
pub struct Document {
    /// Path to source file (if any)
    pub path: Option<PathBuf>,

    /// Current version number (increments on each change)
    pub version: u64,

    root: Node,
    format: DocumentFormat,
    dirty: bool,
}

impl Document {
    /// Create document from a tree (memory-backed)
    pub fn new(root: Node) -> Self {
        Self {
            path: None,
            version: 0,
            root,
            format: DocumentFormat::Markup,
            dirty: false,
        }
    }

    pub fn from_markup(source: &str) -> Result<Self, EditorError> {
        Ok(Self::new(DocumentFormat::Markup.parse(source)?))
    }

    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(Self {
            format: DocumentFormat::Json,
            ..Self::new(DocumentFormat::Json.parse(source)?)
        })
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path);
        let source = std::fs::read_to_string(&path)?;
        let root = format.parse(&source)?;

        Ok(Self {
            path: Some(path),
            version: 0,
            root,
            format,
            dirty: false,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Size of the document's coordinate space
    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    pub fn plain_text(&self) -> String {
        self.root.plain_text()
    }

    /// Apply a mutation
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        mutation.apply(&mut self.root)?;
        Ok(self.touch())
    }

    /// Adopt a new tree wholesale, as one change
    pub fn replace_all(&mut self, root: Node) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::ReplaceAll { root })
    }

    fn touch(&mut self) -> MutationResult {
        self.version += 1;
        self.dirty = self.path.is_some();
        MutationResult {
            version: self.version,
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Render the document in its own format
    pub fn render(&self) -> Result<String, EditorError> {
        self.format.render(&self.root)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.as_ref().ok_or(EditorError::NotFileBacked)?;
        std::fs::write(path, self.format.render(&self.root)?)?;
        self.dirty = false;
        Ok(())
    }
}
