//! # Funnel Editor
//!
//! In-memory editing engine for funnel documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: pages, typed nodes, templates     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorStore                         │
//! │  - Dispatch named actions                   │
//! │  - Snapshot undo/redo with batching         │
//! │  - Selection and highlight repair           │
//! │  - Extract a serializable draft             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: draft save, publish, storage     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One writer**: every change goes through [`EditorStore::dispatch`]
//! 2. **All or nothing**: a rejected action leaves the store untouched
//! 3. **No dangling references**: active page, selection and highlights are
//!    repaired after every dispatch
//!
//! ## Usage
//!
//! ```rust,ignore
//! use funnel_editor::EditorStore;
//!
//! let mut store = EditorStore::from_document(doc);
//!
//! store.update_node_props("heading-1", props)?;
//! store.undo();
//!
//! let draft = store.extract_document();
//! ```

mod actions;
mod errors;
mod extract;
mod selection;
mod state;
mod store;
mod undo_stack;

pub use actions::{Action, PagePatch};
pub use errors::StoreError;
pub use extract::extract_document;
pub use selection::Selection;
pub use state::DocumentState;
pub use store::EditorStore;
pub use undo_stack::{HistoryEntry, UndoStack, DEFAULT_HISTORY_LIMIT};
