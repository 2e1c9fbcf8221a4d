//! # Blockform Editor
//!
//! Core document editing engine for Blockform.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Form → Page → Block, logic rules     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Mutations with validation                │
//! │  - Post-effects (orphaned rule cleanup)     │
//! │  - Snapshot undo/redo with batching         │
//! │  - Selection, dirty flag, listeners         │
//! │  - Drag resolution → insert/move            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ logic: Form + answers → visibility/jumps    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The form tree is the source of truth**: canvas and preview are views
//! 2. **One writer**: only the session mutates the tree
//! 3. **Whole-tree snapshots**: every committed change is one undo step
//! 4. **Quiet misses**: operations on unknown ids do nothing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockform_editor::EditSession;
//! use blockform_model::{BlockType, Form};
//!
//! let mut session = EditSession::new(Form::new("f1", "Signup"));
//! let page_id = session.form().pages[0].id.clone();
//!
//! let id = session.add_block_of_type(BlockType::Email, &page_id, None);
//! session.undo();
//! ```

mod document;
mod drag;
mod errors;
mod events;
mod mutations;
mod post_effects;
mod session;
mod undo_stack;

pub use document::{DocumentStorage, FormDocument};
pub use drag::{dropzones, resolve, DragCommand, DragSession, DragSource, DropTarget};
pub use errors::EditorError;
pub use events::{EditorEvent, Listener, SubscriptionId, Subscribers};
pub use mutations::{Mutation, MutationError};
pub use post_effects::{PostEffect, PostEffectEngine, PruneOrphanedRules};
pub use session::{EditSession, EditorOptions};
pub use undo_stack::{HistoryEntry, UndoStack, DEFAULT_HISTORY_DEPTH};
