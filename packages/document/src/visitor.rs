use crate::{EditorDocument, Node, Page};
use std::collections::HashSet;

/// Visitor pattern for traversing documents immutably
///
/// Default implementations walk the entire tree in pre-order.
/// Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_document(&mut self, doc: &EditorDocument) {
        walk_document(self, doc);
    }

    fn visit_page(&mut self, page: &Page) {
        walk_page(self, page);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &EditorDocument) {
    for page in &doc.pages {
        visitor.visit_page(page);
    }
}

pub fn walk_page<V: Visitor>(visitor: &mut V, page: &Page) {
    visitor.visit_node(&page.canvas_root);
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}

/// Collects node ids in visit order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub node_ids: Vec<String>,
}

impl IdCollector {
    /// Ids seen more than once, in first-repeat order
    pub fn duplicates(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();
        for id in &self.node_ids {
            if !seen.insert(id.as_str()) && !repeated.contains(id) {
                repeated.push(id.clone());
            }
        }
        repeated
    }
}

impl Visitor for IdCollector {
    fn visit_node(&mut self, node: &Node) {
        self.node_ids.push(node.id.clone());
        walk_node(self, node);
    }
}
