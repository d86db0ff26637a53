//! # Undo/Redo Stack
//!
//! Tracks document history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each content edit records the whole prior [`DocumentState`]
//! - Undo swaps the current state for the most recent entry and moves the
//!   current state to the redo stack
//! - Redo swaps it back
//! - New edits clear the redo stack (linear history, no branches)
//! - Depth is bounded; the oldest entries are dropped silently
//! - Batches group several edits into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! stack.record(prior_state, "update_node_props");
//!
//! // Undo
//! stack.undo(&mut state);
//!
//! // Redo
//! stack.redo(&mut state);
//! ```

use crate::DocumentState;
use std::collections::VecDeque;

/// Default number of undo levels
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// One recorded document state
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub state: DocumentState,

    /// Optional description of the edit that replaced this state
    pub description: Option<String>,
}

#[derive(Debug)]
struct OpenBatch {
    description: Option<String>,
    recorded: bool,
}

/// Bounded undo/redo history of document states
#[derive(Debug)]
pub struct UndoStack {
    /// Prior states (most recent last)
    undo_stack: VecDeque<HistoryEntry>,

    /// Undone states (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<OpenBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record the state an edit is about to replace
    pub fn record(&mut self, prior: DocumentState, description: impl Into<String>) {
        // New action invalidates the future
        self.redo_stack.clear();

        let description = match &mut self.current_batch {
            Some(batch) if batch.recorded => return,
            Some(batch) => {
                batch.recorded = true;
                batch.description.clone().unwrap_or_else(|| description.into())
            }
            None => description.into(),
        };

        self.push_bounded(HistoryEntry {
            state: prior,
            description: Some(description),
        });
    }

    /// Start a batch: every edit until [`end_batch`](Self::end_batch) undoes as one step
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(OpenBatch {
            description: None,
            recorded: false,
        });
    }

    pub fn end_batch(&mut self) {
        self.current_batch = None;
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        let Some(batch) = &mut self.current_batch else {
            return;
        };
        let description = description.into();
        if batch.recorded {
            if let Some(entry) = self.undo_stack.back_mut() {
                entry.description = Some(description.clone());
            }
        }
        batch.description = Some(description);
    }

    fn push_bounded(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);

        // Trim if exceeded max levels
        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Restore the most recent prior state into `current`
    pub fn undo(&mut self, current: &mut DocumentState) -> bool {
        self.end_batch();

        if let Some(entry) = self.undo_stack.pop_back() {
            let replaced = std::mem::replace(current, entry.state);
            self.redo_stack.push(HistoryEntry {
                state: replaced,
                description: entry.description,
            });
            true
        } else {
            false // Nothing to undo
        }
    }

    /// Reapply the most recently undone state into `current`
    pub fn redo(&mut self, current: &mut DocumentState) -> bool {
        self.end_batch();

        if let Some(entry) = self.redo_stack.pop() {
            let replaced = std::mem::replace(current, entry.state);
            self.push_bounded(HistoryEntry {
                state: replaced,
                description: entry.description,
            });
            true
        } else {
            false // Nothing to redo
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .back()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
