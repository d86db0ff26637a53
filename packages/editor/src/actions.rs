//! # Store Actions
//!
//! Named state transitions accepted by [`EditorStore::dispatch`].
//!
//! ## Action kinds
//!
//! ### Content edits
//! - Change `pages` (or the active page as part of a page edit)
//! - Push the prior document state onto the undo stack
//! - Clear the redo stack
//!
//! ### Navigation
//! - `SelectNode`, `SetActivePage`, highlight changes
//! - Never recorded in history
//!
//! ### History
//! - `Undo` / `Redo` swap whole document states between the two stacks
//!
//! [`EditorStore::dispatch`]: crate::EditorStore::dispatch

use funnel_document::{Node, Page, PageType, Props};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Insert a page at `index` (append when `None`) and activate it
    AddPage { page: Page, index: Option<usize> },

    /// Remove a page; the last remaining page cannot be removed
    DeletePage { page_id: String },

    /// Reorder a page
    MovePage { page_id: String, to_index: usize },

    /// Copy a page with fresh ids, right after the original
    DuplicatePage { page_id: String },

    /// Patch page-level metadata
    UpdatePageProps { page_id: String, patch: PagePatch },

    /// Shallow-merge props into a node of the active page
    UpdateNodeProps { node_id: String, props: Props },

    /// Insert a subtree into the active page
    InsertNode {
        parent_id: String,
        index: usize,
        node: Node,
    },

    /// Remove a node (and its subtree) from the active page
    RemoveNode { node_id: String },

    /// Relocate a node within the active page
    MoveNode {
        node_id: String,
        new_parent_id: String,
        index: usize,
    },

    SelectNode { node_id: Option<String> },

    SetActivePage { page_id: String },

    SetHighlight { node_ids: Vec<String> },

    ClearHighlight,

    Undo,

    Redo,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPage { .. } => "add_page",
            Action::DeletePage { .. } => "delete_page",
            Action::MovePage { .. } => "move_page",
            Action::DuplicatePage { .. } => "duplicate_page",
            Action::UpdatePageProps { .. } => "update_page_props",
            Action::UpdateNodeProps { .. } => "update_node_props",
            Action::InsertNode { .. } => "insert_node",
            Action::RemoveNode { .. } => "remove_node",
            Action::MoveNode { .. } => "move_node",
            Action::SelectNode { .. } => "select_node",
            Action::SetActivePage { .. } => "set_active_page",
            Action::SetHighlight { .. } => "set_highlight",
            Action::ClearHighlight => "clear_highlight",
            Action::Undo => "undo",
            Action::Redo => "redo",
        }
    }

    /// Whether this action edits content and is therefore undoable
    pub fn is_content_edit(&self) -> bool {
        matches!(
            self,
            Action::AddPage { .. }
                | Action::DeletePage { .. }
                | Action::MovePage { .. }
                | Action::DuplicatePage { .. }
                | Action::UpdatePageProps { .. }
                | Action::UpdateNodeProps { .. }
                | Action::InsertNode { .. }
                | Action::RemoveNode { .. }
                | Action::MoveNode { .. }
        )
    }
}

/// Partial page metadata; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
}

impl PagePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            page_type: None,
        }
    }
}
