use crate::node::{Node, NodeType};

/// Visitor pattern for traversing document trees immutably
///
/// The default implementations walk the entire tree. Override specific
/// visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_text(&mut self, _node: &Node) {
        // Leaf node, no children to walk
    }

    fn visit_atom(&mut self, _node: &Node) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor pattern for transforming document trees
///
/// `visit_children_mut` runs before the children are walked, so it may
/// rewrite the child list of a container in place.
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_children_mut(&mut self, _parent: NodeType, _children: &mut Vec<Node>) {}
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    for child in &node.children {
        match child.node_type {
            NodeType::Text => visitor.visit_text(child),
            t if t.is_atom() => visitor.visit_atom(child),
            _ => visitor.visit_node(child),
        }
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    visitor.visit_children_mut(node.node_type, &mut node.children);
    for child in &mut node.children {
        if !child.node_type.is_leaf() {
            visitor.visit_node_mut(child);
        }
    }
}

/// Counts correction markers found inside another correction marker.
/// Markers are atoms, so a sound tree yields none.
#[derive(Debug, Default)]
pub struct NestedMarkerFinder {
    depth_in_marker: usize,
    pub nested: usize,
}

impl Visitor for NestedMarkerFinder {
    fn visit_atom(&mut self, node: &Node) {
        if node.is_correction() {
            if self.depth_in_marker > 0 {
                self.nested += 1;
            }
            // Malformed markers may still carry children
            if !node.children.is_empty() {
                self.depth_in_marker += 1;
                walk_node(self, node);
                self.depth_in_marker -= 1;
            }
        }
    }
}

/// Number of correction markers nested inside other markers.
pub fn nested_marker_count(root: &Node) -> usize {
    let mut finder = NestedMarkerFinder::default();
    finder.visit_node(root);
    finder.nested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CorrectionMark;

    #[derive(Default)]
    struct TextCollector {
        texts: Vec<String>,
        atoms: usize,
    }

    impl Visitor for TextCollector {
        fn visit_text(&mut self, node: &Node) {
            self.texts.push(node.text_str().to_string());
        }

        fn visit_atom(&mut self, _node: &Node) {
            self.atoms += 1;
        }
    }

    #[test]
    fn test_walk_visits_in_document_order() {
        let doc = Node::doc(vec![
            Node::paragraph(vec![Node::text("a"), Node::hard_break()]),
            Node::blockquote(vec![Node::paragraph(vec![Node::text("b")])]),
        ]);

        let mut collector = TextCollector::default();
        collector.visit_node(&doc);

        assert_eq!(collector.texts, vec!["a", "b"]);
        assert_eq!(collector.atoms, 1);
    }

    #[test]
    fn test_nested_markers_detected() {
        let sound = Node::doc(vec![Node::paragraph(vec![
            CorrectionMark::added("x").into_node(),
        ])]);
        assert_eq!(nested_marker_count(&sound), 0);

        let broken = Node::doc(vec![Node::paragraph(vec![CorrectionMark::added("x")
            .into_node()
            .with_child(CorrectionMark::removed("y").into_node())])]);
        assert_eq!(nested_marker_count(&broken), 1);
    }

    struct DropImages;

    impl VisitorMut for DropImages {
        fn visit_children_mut(&mut self, _parent: NodeType, children: &mut Vec<Node>) {
            children.retain(|c| c.node_type != NodeType::Image);
        }
    }

    #[test]
    fn test_visitor_mut_rewrites_children() {
        let mut doc = Node::doc(vec![Node::blockquote(vec![Node::paragraph(vec![
            Node::image("a.png"),
            Node::text("kept"),
        ])])]);

        DropImages.visit_node_mut(&mut doc);

        assert!(!doc.contains(NodeType::Image));
        assert_eq!(doc.plain_text(), "kept");
    }
}
