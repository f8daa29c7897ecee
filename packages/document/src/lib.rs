//! # Proofmark Document
//!
//! The rich-text document tree every other proofmark crate reads and
//! produces: typed nodes with an attribute map, ordered children and, for
//! text leaves, a literal payload.
//!
//! Every node occupies a *span* in a flat coordinate space: containers
//! count an opening and a closing token around their children, text leaves
//! count their characters and atoms count one.

pub mod node;
pub mod visitor;

pub use node::{
    Attrs, CorrectionMark, Node, NodeType, ATTR_ADDED, ATTR_LEVEL, ATTR_REMOVED, ATTR_SRC,
    ATTR_TEXT,
};
pub use visitor::{nested_marker_count, walk_node, walk_node_mut, Visitor, VisitorMut};
