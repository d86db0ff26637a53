//! # Editor Store
//!
//! Single source of truth for one funnel editing session.
//!
//! Every change goes through [`EditorStore::dispatch`]. Content edits are
//! applied to a scratch copy of the document state and only swapped in when
//! they succeed, so a rejected action never leaves a half-applied edit. After
//! every dispatch the active page, the selection and the highlight set are
//! repaired so they never point at ids that no longer exist.

use crate::extract::extract_document;
use crate::undo_stack::{UndoStack, DEFAULT_HISTORY_LIMIT};
use crate::{Action, DocumentState, PagePatch, Selection, StoreError};
use funnel_document::{
    default_document, instantiate_page, EditorDocument, IdGenerator, Node, Page, PageTemplate,
    Props,
};

pub struct EditorStore {
    state: DocumentState,
    selection: Selection,
    highlighted_node_ids: Vec<String>,
    history: UndoStack,
    ids: IdGenerator,

    /// Increments on every content change, undo and redo
    version: u64,
}

impl EditorStore {
    /// Fresh store over the factory default document
    pub fn new() -> Self {
        let mut ids = IdGenerator::new();
        let doc = default_document(&mut ids);
        Self::build(doc, ids, DEFAULT_HISTORY_LIMIT)
    }

    /// Hydrate from a stored document
    pub fn from_document(doc: EditorDocument) -> Self {
        Self::build(doc, IdGenerator::new(), DEFAULT_HISTORY_LIMIT)
    }

    /// Hydrate with a custom undo depth (0 = unlimited)
    pub fn with_history_limit(doc: EditorDocument, history_limit: usize) -> Self {
        Self::build(doc, IdGenerator::new(), history_limit)
    }

    /// Hydrate with a caller-provided id generator
    pub fn with_id_generator(doc: EditorDocument, ids: IdGenerator, history_limit: usize) -> Self {
        Self::build(doc, ids, history_limit)
    }

    fn build(doc: EditorDocument, ids: IdGenerator, history_limit: usize) -> Self {
        if let Err(e) = doc.validate() {
            tracing::warn!(error = %e, "Hydrating document that fails validation");
        }

        let mut store = Self {
            state: DocumentState::new(doc.pages, doc.active_page_id),
            selection: Selection::None,
            highlighted_node_ids: Vec::new(),
            history: UndoStack::with_max_levels(history_limit),
            ids,
            version: 0,
        };
        store.revalidate();
        store
    }

    /// Apply an action.
    ///
    /// On `Err` the store is unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<(), StoreError> {
        let name = action.name();
        tracing::debug!(action = name, "dispatch");

        let result = self.apply(action);
        if let Err(e) = &result {
            tracing::debug!(action = name, reason = %e, "dispatch rejected");
        }

        self.revalidate();
        result
    }

    fn apply(&mut self, action: Action) -> Result<(), StoreError> {
        match action {
            Action::AddPage { page, index } => self.commit("add_page", |state, _| state.add_page(page, index)),
            Action::DeletePage { page_id } => {
                self.commit("delete_page", |state, _| state.delete_page(&page_id))
            }
            Action::MovePage { page_id, to_index } => {
                self.commit("move_page", |state, _| state.move_page(&page_id, to_index))
            }
            Action::DuplicatePage { page_id } => {
                self.commit("duplicate_page", |state, ids| state.duplicate_page(&page_id, ids))
            }
            Action::UpdatePageProps { page_id, patch } => self.commit("update_page_props", |state, _| {
                state.update_page_props(&page_id, patch)
            }),
            Action::UpdateNodeProps { node_id, props } => self.commit("update_node_props", |state, _| {
                state.update_node_props(&node_id, &props)
            }),
            Action::InsertNode {
                parent_id,
                index,
                node,
            } => self.commit("insert_node", |state, _| state.insert_node(&parent_id, index, node)),
            Action::RemoveNode { node_id } => {
                self.commit("remove_node", |state, _| state.remove_node(&node_id))
            }
            Action::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => self.commit("move_node", |state, _| {
                state.move_node(&node_id, &new_parent_id, index)
            }),
            Action::SelectNode { node_id } => self.apply_select_node(node_id),
            Action::SetActivePage { page_id } => self.apply_set_active_page(page_id),
            Action::SetHighlight { node_ids } => {
                self.highlighted_node_ids = node_ids;
                Ok(())
            }
            Action::ClearHighlight => {
                self.highlighted_node_ids.clear();
                Ok(())
            }
            Action::Undo => {
                self.undo_state();
                Ok(())
            }
            Action::Redo => {
                self.redo_state();
                Ok(())
            }
        }
    }

    /// Run a content edit on a scratch copy and swap it in on success
    fn commit<F>(&mut self, description: &'static str, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut DocumentState, &mut IdGenerator) -> Result<bool, StoreError>,
    {
        let mut next = self.state.clone();
        if !edit(&mut next, &mut self.ids)? {
            return Ok(());
        }

        let prior = std::mem::replace(&mut self.state, next);
        self.history.record(prior, description);
        self.version += 1;
        Ok(())
    }

    fn apply_select_node(&mut self, node_id: Option<String>) -> Result<(), StoreError> {
        let Some(node_id) = node_id else {
            self.selection = Selection::None;
            return Ok(());
        };

        let page = self.state.active_page().ok_or(StoreError::NoActivePage)?;
        if !page.contains_node(&node_id) {
            return Err(StoreError::NodeNotFound(node_id));
        }

        self.selection = Selection::node(page.id.clone(), node_id);
        Ok(())
    }

    fn apply_set_active_page(&mut self, page_id: String) -> Result<(), StoreError> {
        if self.state.page(&page_id).is_none() {
            return Err(StoreError::PageNotFound(page_id));
        }

        self.state.active_page_id = Some(page_id.clone());
        self.selection = Selection::Page { page_id };
        Ok(())
    }

    fn undo_state(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        if undone {
            self.version += 1;
        }
        undone
    }

    fn redo_state(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        if redone {
            self.version += 1;
        }
        redone
    }

    /// Post-condition of every dispatch: no dangling references
    fn revalidate(&mut self) {
        let active_exists = self
            .state
            .active_page_id
            .as_deref()
            .is_some_and(|id| self.state.page(id).is_some());
        if !active_exists {
            self.state.active_page_id = self.state.pages.first().map(|p| p.id.clone());
        }

        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.revalidate(&self.state.pages);

        let active = self.state.active_page();
        let mut kept: Vec<String> = Vec::with_capacity(self.highlighted_node_ids.len());
        for id in self.highlighted_node_ids.drain(..) {
            let exists = active.is_some_and(|page| page.contains_node(&id));
            if exists && !kept.contains(&id) {
                kept.push(id);
            }
        }
        self.highlighted_node_ids = kept;
    }

    // Named operations, each a thin wrapper over `dispatch`

    pub fn add_page(&mut self, page: Page) -> Result<(), StoreError> {
        self.dispatch(Action::AddPage { page, index: None })
    }

    /// Instantiate a template with fresh ids and add it as a new page
    pub fn add_page_from_template(&mut self, template: &PageTemplate) -> Result<String, StoreError> {
        let page = instantiate_page(template, &mut self.ids);
        let page_id = page.id.clone();
        self.add_page(page)?;
        Ok(page_id)
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<(), StoreError> {
        self.dispatch(Action::DeletePage {
            page_id: page_id.to_string(),
        })
    }

    pub fn update_node_props(&mut self, node_id: &str, props: Props) -> Result<(), StoreError> {
        self.dispatch(Action::UpdateNodeProps {
            node_id: node_id.to_string(),
            props,
        })
    }

    pub fn update_page_props(&mut self, page_id: &str, patch: PagePatch) -> Result<(), StoreError> {
        self.dispatch(Action::UpdatePageProps {
            page_id: page_id.to_string(),
            patch,
        })
    }

    pub fn insert_node(&mut self, parent_id: &str, index: usize, node: Node) -> Result<(), StoreError> {
        self.dispatch(Action::InsertNode {
            parent_id: parent_id.to_string(),
            index,
            node,
        })
    }

    pub fn select_node(&mut self, node_id: Option<&str>) -> Result<(), StoreError> {
        self.dispatch(Action::SelectNode {
            node_id: node_id.map(str::to_string),
        })
    }

    pub fn set_active_page(&mut self, page_id: &str) -> Result<(), StoreError> {
        self.dispatch(Action::SetActivePage {
            page_id: page_id.to_string(),
        })
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        tracing::debug!(action = "undo", "dispatch");
        let undone = self.undo_state();
        self.revalidate();
        undone
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        tracing::debug!(action = "redo", "dispatch");
        let redone = self.redo_state();
        self.revalidate();
        redone
    }

    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.set_batch_description(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    /// Serializable snapshot of the current draft
    pub fn extract_document(&self) -> EditorDocument {
        extract_document(&self.state.pages, self.state.active_page_id.as_deref())
    }

    // Accessors

    pub fn pages(&self) -> &[Page] {
        &self.state.pages
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.state.page(page_id)
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.state.active_page_id.as_deref()
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.state.active_page()
    }

    /// Look a node up in the active page
    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        self.active_page().and_then(|page| page.find_node(node_id))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn highlighted_node_ids(&self) -> &[String] {
        &self.highlighted_node_ids
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::{HeadingProps, NodeKind, NodeType, PageType};
    use serde_json::json;

    fn heading_page(page_id: &str, heading_id: &str, text: &str) -> Page {
        Page::new(
            page_id,
            page_id,
            PageType::Welcome,
            Node::new(format!("{}-root", page_id), NodeKind::empty(NodeType::Frame)).with_children(
                vec![Node::new(
                    heading_id,
                    NodeKind::Heading(HeadingProps {
                        headline: Some(text.to_string()),
                        ..Default::default()
                    }),
                )],
            ),
        )
    }

    fn headline(store: &EditorStore, node_id: &str) -> Option<String> {
        match &store.find_node(node_id)?.kind {
            NodeKind::Heading(props) => props.headline.clone(),
            _ => None,
        }
    }

    fn props(value: serde_json::Value) -> Props {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Props::new(),
        }
    }

    #[test]
    fn test_new_store_has_default_page() {
        let store = EditorStore::new();

        assert_eq!(store.pages().len(), 1);
        assert_eq!(store.active_page_id(), Some(store.pages()[0].id.as_str()));
        assert_eq!(store.selection(), &Selection::None);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_update_then_undo_heading() {
        let doc = EditorDocument::new(vec![heading_page("welcome", "h1", "Hi")]);
        let mut store = EditorStore::from_document(doc);

        store
            .update_node_props("h1", props(json!({ "headline": "Hello" })))
            .unwrap();
        assert_eq!(headline(&store, "h1").as_deref(), Some("Hello"));

        assert!(store.undo());
        assert_eq!(headline(&store, "h1").as_deref(), Some("Hi"));

        assert!(store.redo());
        assert_eq!(headline(&store, "h1").as_deref(), Some("Hello"));
    }

    #[test]
    fn test_unknown_node_is_a_noop() {
        let doc = EditorDocument::new(vec![heading_page("a", "h1", "Hi")]);
        let mut store = EditorStore::from_document(doc);
        let before = store.extract_document();

        let err = store
            .update_node_props("missing", props(json!({ "headline": "x" })))
            .unwrap_err();

        assert_eq!(err, StoreError::NodeNotFound("missing".to_string()));
        assert_eq!(store.extract_document(), before);
        assert!(!store.can_undo());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_unchanged_props_do_not_record_history() {
        let doc = EditorDocument::new(vec![heading_page("a", "h1", "Hi")]);
        let mut store = EditorStore::from_document(doc);

        store
            .update_node_props("h1", props(json!({ "headline": "Hi" })))
            .unwrap();
        assert!(!store.can_undo());
    }

    #[test]
    fn test_delete_last_page_is_rejected() {
        let doc = EditorDocument::new(vec![heading_page("a", "h1", "Hi")]);
        let mut store = EditorStore::from_document(doc);
        let before = store.extract_document();

        assert_eq!(store.delete_page("a"), Err(StoreError::LastPage));
        assert_eq!(store.extract_document(), before);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_navigation_is_not_undoable() {
        let doc = EditorDocument::new(vec![
            heading_page("a", "ha", "A"),
            heading_page("b", "hb", "B"),
        ]);
        let mut store = EditorStore::from_document(doc);

        store.set_active_page("b").unwrap();
        store.select_node(Some("hb")).unwrap();

        assert_eq!(store.active_page_id(), Some("b"));
        assert_eq!(store.selection(), &Selection::node("b", "hb"));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_select_node_outside_active_page_is_rejected() {
        let doc = EditorDocument::new(vec![
            heading_page("a", "ha", "A"),
            heading_page("b", "hb", "B"),
        ]);
        let mut store = EditorStore::from_document(doc);

        assert_eq!(
            store.select_node(Some("hb")),
            Err(StoreError::NodeNotFound("hb".to_string()))
        );
        assert_eq!(store.selection(), &Selection::None);
    }

    #[test]
    fn test_hydration_repairs_dangling_active_page() {
        let mut doc = EditorDocument::new(vec![heading_page("a", "ha", "A")]);
        doc.active_page_id = Some("deleted".to_string());

        let store = EditorStore::from_document(doc);
        assert_eq!(store.active_page_id(), Some("a"));
    }

    #[test]
    fn test_highlight_drops_unknown_ids() {
        let doc = EditorDocument::new(vec![heading_page("a", "ha", "A")]);
        let mut store = EditorStore::from_document(doc);

        store
            .dispatch(Action::SetHighlight {
                node_ids: vec!["ha".to_string(), "nope".to_string(), "ha".to_string()],
            })
            .unwrap();
        assert_eq!(store.highlighted_node_ids(), &["ha".to_string()]);

        store
            .dispatch(Action::RemoveNode {
                node_id: "ha".to_string(),
            })
            .unwrap();
        assert!(store.highlighted_node_ids().is_empty());
    }

    #[test]
    fn test_batch_undoes_as_one_step() {
        let doc = EditorDocument::new(vec![heading_page("a", "h1", "H")]);
        let mut store = EditorStore::from_document(doc);

        store.begin_batch("Typing");
        for text in ["He", "Hel", "Hell", "Hello"] {
            store
                .update_node_props("h1", props(json!({ "headline": text })))
                .unwrap();
        }
        store.end_batch();

        assert_eq!(store.history().undo_levels(), 1);
        assert_eq!(store.history().undo_description(), Some("Typing"));

        store.undo();
        assert_eq!(headline(&store, "h1").as_deref(), Some("H"));
    }
}
