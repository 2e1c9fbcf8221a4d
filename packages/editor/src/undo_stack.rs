//! # Undo/Redo Stack
//!
//! Snapshot history for form editing.
//!
//! ## Design
//!
//! - Each committed mutation records the form as it was *before* the change
//! - Undo swaps the current form with the latest snapshot and keeps the
//!   current form on the redo stack; redo is the mirror image
//! - New mutations clear the redo stack
//! - Batches group several mutations into one undo step
//! - Depth is bounded; the oldest snapshots are evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let before = form.clone();
//! mutation.apply(&mut form)?;
//! stack.record(before, mutation.name());
//!
//! stack.undo(&mut form);
//! stack.redo(&mut form);
//! ```

use blockform_model::Form;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// One undo step: the form before the step was applied
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub snapshot: Form,

    pub description: Option<String>,
}

/// Undo/redo stack for form editing
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots before each step (most recent last)
    undo_stack: VecDeque<HistoryEntry>,

    /// Snapshots of undone steps (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Snapshot taken when the open batch started
    current_batch: Option<HistoryEntry>,

    /// Whether a step was recorded since the open batch started
    batch_changed: bool,
}

impl UndoStack {
    /// Create a new undo stack with default max levels
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_DEPTH)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
            batch_changed: false,
        }
    }

    /// Record the pre-mutation state of a committed step.
    ///
    /// Inside a batch the batch's opening snapshot already covers the step,
    /// but the redo stack is still invalidated.
    pub fn record(&mut self, before: Form, description: impl Into<String>) {
        if self.current_batch.is_some() {
            self.batch_changed = true;
            self.redo_stack.clear();
            return;
        }

        self.push_entry(HistoryEntry {
            snapshot: before,
            description: Some(description.into()),
        });
    }

    /// Start a batch of mutations (will be undone/redone together).
    /// Nested calls are folded into the outer batch.
    pub fn begin_batch(&mut self, current: &Form, description: impl Into<String>) {
        if self.current_batch.is_none() {
            self.current_batch = Some(HistoryEntry {
                snapshot: current.clone(),
                description: Some(description.into()),
            });
            self.batch_changed = false;
        }
    }

    /// End the current batch. Pushes one undo step if the form changed while
    /// the batch was open; returns whether a step was pushed.
    pub fn end_batch(&mut self, current: &Form) -> bool {
        self.batch_changed = false;
        match self.current_batch.take() {
            Some(batch) if &batch.snapshot != current => {
                self.push_entry(batch);
                true
            }
            _ => false,
        }
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.push_undo(entry);

        // New action invalidates future
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);

        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Undo the most recent step. Returns false if there was nothing to undo.
    pub fn undo(&mut self, current: &mut Form) -> bool {
        match self.undo_stack.pop_back() {
            Some(entry) => {
                let after = std::mem::replace(current, entry.snapshot);
                self.redo_stack.push(HistoryEntry {
                    snapshot: after,
                    description: entry.description,
                });
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone step. Returns false if there was
    /// nothing to redo.
    pub fn redo(&mut self, current: &mut Form) -> bool {
        match self.redo_stack.pop() {
            Some(entry) => {
                let before = std::mem::replace(current, entry.snapshot);
                self.push_undo(HistoryEntry {
                    snapshot: before,
                    description: entry.description,
                });
                true
            }
            None => false,
        }
    }

    /// Check if undo is available. An open batch with recorded steps counts:
    /// closing it yields an undo step.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.batch_changed
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
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
        self.batch_changed = false;
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
