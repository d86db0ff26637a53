//! # Document State
//!
//! The undoable part of the store: pages plus the active page id. Each
//! content edit below works on a scratch copy, so an edit that fails part
//! way leaves nothing behind.

use crate::{PagePatch, StoreError};
use funnel_document::{
    clone_with_fresh_ids, DocumentError, IdGenerator, Node, Page, Props,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub pages: Vec<Page>,
    pub active_page_id: Option<String>,
}

impl DocumentState {
    pub fn new(pages: Vec<Page>, active_page_id: Option<String>) -> Self {
        Self {
            pages,
            active_page_id,
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    fn page_index(&self, page_id: &str) -> Result<usize, StoreError> {
        self.pages
            .iter()
            .position(|p| p.id == page_id)
            .ok_or_else(|| StoreError::PageNotFound(page_id.to_string()))
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id.as_deref().and_then(|id| self.page(id))
    }

    fn active_page_mut(&mut self) -> Result<&mut Page, StoreError> {
        let active = self.active_page_id.as_deref().ok_or(StoreError::NoActivePage)?;
        self.pages
            .iter_mut()
            .find(|p| p.id == active)
            .ok_or(StoreError::NoActivePage)
    }

    fn node_ids(&self) -> HashSet<String> {
        self.pages
            .iter()
            .flat_map(|p| p.canvas_root.ids())
            .collect()
    }

    /// Reject a subtree whose ids repeat or already exist in the document
    fn check_fresh_ids(&self, node: &Node) -> Result<(), StoreError> {
        let mut existing = self.node_ids();
        for id in node.ids() {
            if !existing.insert(id.clone()) {
                return Err(DocumentError::DuplicateId(id).into());
            }
        }
        Ok(())
    }

    pub(crate) fn add_page(&mut self, page: Page, index: Option<usize>) -> Result<bool, StoreError> {
        if self.page(&page.id).is_some() {
            return Err(DocumentError::DuplicateId(page.id).into());
        }
        self.check_fresh_ids(&page.canvas_root)?;

        let index = index.unwrap_or(self.pages.len()).min(self.pages.len());
        self.active_page_id = Some(page.id.clone());
        self.pages.insert(index, page);
        Ok(true)
    }

    pub(crate) fn delete_page(&mut self, page_id: &str) -> Result<bool, StoreError> {
        let index = self.page_index(page_id)?;
        if self.pages.len() == 1 {
            return Err(StoreError::LastPage);
        }

        self.pages.remove(index);
        if self.active_page_id.as_deref() == Some(page_id) {
            self.active_page_id = self.pages.first().map(|p| p.id.clone());
        }
        Ok(true)
    }

    pub(crate) fn move_page(&mut self, page_id: &str, to_index: usize) -> Result<bool, StoreError> {
        let from = self.page_index(page_id)?;
        let to = to_index.min(self.pages.len() - 1);
        if from == to {
            return Ok(false);
        }

        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        Ok(true)
    }

    pub(crate) fn duplicate_page(
        &mut self,
        page_id: &str,
        ids: &mut IdGenerator,
    ) -> Result<bool, StoreError> {
        let index = self.page_index(page_id)?;
        let source = &self.pages[index];

        // A copy is a new step, never a legacy one.
        let copy = Page::new(
            ids.new_id("page"),
            format!("{} (copy)", source.name),
            source.page_type.clone(),
            clone_with_fresh_ids(&source.canvas_root, ids),
        );

        self.active_page_id = Some(copy.id.clone());
        self.pages.insert(index + 1, copy);
        Ok(true)
    }

    pub(crate) fn update_page_props(
        &mut self,
        page_id: &str,
        patch: PagePatch,
    ) -> Result<bool, StoreError> {
        let index = self.page_index(page_id)?;
        let page = &mut self.pages[index];
        let mut changed = false;

        if let Some(name) = patch.name {
            if page.name != name {
                page.name = name;
                changed = true;
            }
        }

        if let Some(page_type) = patch.page_type {
            if page.page_type != page_type {
                page.page_type = page_type;
                changed = true;
            }
        }

        Ok(changed)
    }

    pub(crate) fn update_node_props(
        &mut self,
        node_id: &str,
        props: &Props,
    ) -> Result<bool, StoreError> {
        let page = self.active_page_mut()?;
        let node = page
            .canvas_root
            .find_mut(node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;

        Ok(node.kind.merge_props(props)?)
    }

    pub(crate) fn insert_node(
        &mut self,
        parent_id: &str,
        index: usize,
        node: Node,
    ) -> Result<bool, StoreError> {
        self.check_fresh_ids(&node)?;
        let page = self.active_page_mut()?;
        page.canvas_root.insert_child(parent_id, index, node)?;
        Ok(true)
    }

    pub(crate) fn remove_node(&mut self, node_id: &str) -> Result<bool, StoreError> {
        let page = self.active_page_mut()?;
        if page.canvas_root.id == node_id {
            return Err(DocumentError::CannotDetachRoot.into());
        }

        page.canvas_root
            .remove_descendant(node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;
        Ok(true)
    }

    pub(crate) fn move_node(
        &mut self,
        node_id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<bool, StoreError> {
        let page = self.active_page_mut()?;
        let root = &mut page.canvas_root;

        if root.id == node_id {
            return Err(DocumentError::CannotDetachRoot.into());
        }

        let node = root
            .find(node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;
        if node.contains(new_parent_id) {
            return Err(DocumentError::CycleDetected.into());
        }

        let parent = root
            .find(new_parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(new_parent_id.to_string()))?;
        if !parent.kind.is_container() {
            return Err(DocumentError::NotAContainer(new_parent_id.to_string()).into());
        }

        let node = root
            .remove_descendant(node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;
        root.insert_child(new_parent_id, index, node)?;
        Ok(true)
    }
}
