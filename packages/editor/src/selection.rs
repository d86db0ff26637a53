use funnel_document::Page;

/// What the user currently has selected. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Page {
        page_id: String,
    },
    Node {
        page_id: String,
        node_id: String,
    },
}

impl Selection {
    pub fn page(page_id: impl Into<String>) -> Self {
        Selection::Page {
            page_id: page_id.into(),
        }
    }

    pub fn node(page_id: impl Into<String>, node_id: impl Into<String>) -> Self {
        Selection::Node {
            page_id: page_id.into(),
            node_id: node_id.into(),
        }
    }

    pub fn page_id(&self) -> Option<&str> {
        match self {
            Selection::None => None,
            Selection::Page { page_id } | Selection::Node { page_id, .. } => Some(page_id.as_str()),
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match self {
            Selection::Node { node_id, .. } => Some(node_id.as_str()),
            _ => None,
        }
    }

    pub fn is_valid(&self, pages: &[Page]) -> bool {
        match self {
            Selection::None => true,
            Selection::Page { page_id } => pages.iter().any(|p| &p.id == page_id),
            Selection::Node { page_id, node_id } => pages
                .iter()
                .any(|p| &p.id == page_id && p.contains_node(node_id)),
        }
    }

    /// Repair a selection after a structural edit.
    ///
    /// Falls back from the node to its page, then to the first page, then
    /// to no selection.
    pub fn revalidate(self, pages: &[Page]) -> Selection {
        let first_page = || {
            pages
                .first()
                .map(|p| Selection::page(p.id.clone()))
                .unwrap_or(Selection::None)
        };

        match self {
            Selection::None => Selection::None,
            Selection::Page { page_id } => {
                if pages.iter().any(|p| p.id == page_id) {
                    Selection::Page { page_id }
                } else {
                    first_page()
                }
            }
            Selection::Node { page_id, node_id } => {
                match pages.iter().find(|p| p.id == page_id) {
                    Some(page) if page.contains_node(&node_id) => {
                        Selection::Node { page_id, node_id }
                    }
                    Some(_) => Selection::Page { page_id },
                    None => first_page(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::{Node, NodeKind, NodeType, PageType};

    fn pages() -> Vec<Page> {
        ["a", "b"]
            .iter()
            .map(|id| {
                Page::new(
                    *id,
                    *id,
                    PageType::Welcome,
                    Node::new(format!("{}-root", id), NodeKind::empty(NodeType::Frame))
                        .with_children(vec![Node::new(
                            format!("{}-h", id),
                            NodeKind::empty(NodeType::Heading),
                        )]),
                )
            })
            .collect()
    }

    #[test]
    fn test_valid_selection_is_kept() {
        let pages = pages();
        let selection = Selection::node("b", "b-h");

        assert!(selection.is_valid(&pages));
        assert_eq!(selection.clone().revalidate(&pages), selection);
    }

    #[test]
    fn test_missing_node_falls_back_to_page() {
        let pages = pages();
        let selection = Selection::node("b", "gone");

        assert!(!selection.is_valid(&pages));
        assert_eq!(selection.revalidate(&pages), Selection::page("b"));
    }

    #[test]
    fn test_node_on_other_page_is_not_valid() {
        let pages = pages();
        assert!(!Selection::node("a", "b-h").is_valid(&pages));
    }

    #[test]
    fn test_missing_page_falls_back_to_first_page() {
        let pages = pages();

        assert_eq!(
            Selection::node("c", "c-h").revalidate(&pages),
            Selection::page("a")
        );
        assert_eq!(Selection::page("c").revalidate(&pages), Selection::page("a"));
        assert_eq!(Selection::page("c").revalidate(&[]), Selection::None);
    }
}
