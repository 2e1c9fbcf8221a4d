//! # Drag Reorder Resolver
//!
//! Translates a drag session from the canvas into one editor command.
//!
//! ```text
//! start(active) ──► over(target)* ──► end()
//!                   display only      resolve → DragCommand
//! ```
//!
//! | active          | over       | command                             |
//! |-----------------|------------|-------------------------------------|
//! | library(type)   | dropzone   | insert new block at (page, index)   |
//! | library(type)   | block      | insert new block at that position   |
//! | block(id)       | block      | move block to (page, index)         |
//! | block(id)       | dropzone   | move block to (page, index)         |
//! | anything        | nothing    | no command                          |
//!
//! A page with N blocks exposes N+1 dropzones: one before the first block
//! and one after every block.

use blockform_model::{BlockType, Page};
use serde::{Deserialize, Serialize};

/// The item being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DragSource {
    /// A palette template
    Library {
        #[serde(rename = "blockType")]
        block_type: BlockType,
    },

    /// A block already on the canvas
    Block {
        #[serde(rename = "blockId")]
        block_id: String,
    },
}

/// Where the item is dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropTarget {
    /// Insertion point between or around blocks
    Dropzone {
        #[serde(rename = "pageId")]
        page_id: String,
        index: usize,
    },

    /// An existing block, addressed by its own position
    Block {
        #[serde(rename = "pageId")]
        page_id: String,
        index: usize,
    },
}

impl DropTarget {
    pub fn page_id(&self) -> &str {
        match self {
            DropTarget::Dropzone { page_id, .. } | DropTarget::Block { page_id, .. } => page_id,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            DropTarget::Dropzone { index, .. } | DropTarget::Block { index, .. } => *index,
        }
    }
}

/// The single editor call a finished drag resolves to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragCommand {
    InsertTemplate {
        block_type: BlockType,
        page_id: String,
        index: usize,
    },

    MoveBlock {
        block_id: String,
        page_id: String,
        index: usize,
    },
}

/// Resolve a drop. Pure: no document access, no side effects.
pub fn resolve(active: &DragSource, over: Option<&DropTarget>) -> Option<DragCommand> {
    let over = over?;
    let page_id = over.page_id().to_string();
    let index = over.index();

    Some(match active {
        DragSource::Library { block_type } => DragCommand::InsertTemplate {
            block_type: block_type.clone(),
            page_id,
            index,
        },
        DragSource::Block { block_id } => DragCommand::MoveBlock {
            block_id: block_id.clone(),
            page_id,
            index,
        },
    })
}

/// All drop positions of a page, in order
pub fn dropzones(page: &Page) -> Vec<DropTarget> {
    (0..=page.blocks.len())
        .map(|index| DropTarget::Dropzone {
            page_id: page.id.clone(),
            index,
        })
        .collect()
}

/// State of the drag currently in progress
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<DragSource>,
    over: Option<DropTarget>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, active: DragSource) {
        self.active = Some(active);
        self.over = None;
    }

    /// Track the hovered target. Returns what a drop here would do, for
    /// display only; nothing is applied.
    pub fn over(&mut self, target: Option<DropTarget>) -> Option<DragCommand> {
        self.over = target;
        self.preview()
    }

    pub fn preview(&self) -> Option<DragCommand> {
        resolve(self.active.as_ref()?, self.over.as_ref())
    }

    /// Finish the drag and return the command to apply, if any
    pub fn end(&mut self) -> Option<DragCommand> {
        let command = self.preview();
        self.cancel();
        command
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragSource> {
        self.active.as_ref()
    }
}
