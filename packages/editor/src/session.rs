//! # Edit Session
//!
//! The editing surface the UI talks to. An EditSession owns the document,
//! its history, the selection and the listeners, and is the only writer of
//! the form tree.
//!
//! Every structural call goes through `commit`: apply with post-effects,
//! record the pre-change snapshot, repair the selection, notify listeners.
//! Calls whose target does not exist are silent no-ops; they leave no
//! history entry and do not mark the document dirty.

use crate::drag::{DragCommand, DragSession, DragSource, DropTarget};
use crate::events::{EditorEvent, SubscriptionId, Subscribers};
use crate::mutations::Mutation;
use crate::post_effects::PostEffectEngine;
use crate::undo_stack::{UndoStack, DEFAULT_HISTORY_DEPTH};
use crate::{EditorError, FormDocument};
use blockform_model::{Block, BlockPatch, BlockType, Form, IdGenerator, LogicRule, Page};
use tracing::{debug, info};

/// Session settings
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Maximum undo levels (0 = unlimited)
    pub history_depth: usize,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Single-user editing session over one form
#[derive(Debug)]
pub struct EditSession {
    document: FormDocument,

    history: UndoStack,

    effects: PostEffectEngine,

    ids: IdGenerator,

    selected_block_id: Option<String>,

    selected_page_id: Option<String>,

    drag: DragSession,

    subscribers: Subscribers,
}

impl EditSession {
    /// Start a session on an in-memory form
    pub fn new(form: Form) -> Self {
        Self::from_document(FormDocument::from_form(form), EditorOptions::default())
    }

    pub fn with_options(form: Form, options: EditorOptions) -> Self {
        Self::from_document(FormDocument::from_form(form), options)
    }

    pub fn from_document(document: FormDocument, options: EditorOptions) -> Self {
        let ids = IdGenerator::new(&document.form().id);
        let mut session = Self {
            document,
            history: UndoStack::with_max_levels(options.history_depth),
            effects: PostEffectEngine::new(),
            ids,
            selected_block_id: None,
            selected_page_id: None,
            drag: DragSession::new(),
            subscribers: Subscribers::default(),
        };
        session.repair_selection();
        session
    }

    // ----- Read accessors -------------------------------------------------

    pub fn form(&self) -> &Form {
        self.document.form()
    }

    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.document.version
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    pub fn selected_page_id(&self) -> Option<&str> {
        self.selected_page_id.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.form().find_block(self.selected_block_id.as_deref()?)
    }

    pub fn selected_page(&self) -> Option<&Page> {
        self.form().find_page(self.selected_page_id.as_deref()?)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ----- Block operations -----------------------------------------------

    /// Insert a block into a page. An empty or already-used id is replaced
    /// with a fresh one. Returns the id of the inserted block, which becomes
    /// the selection.
    pub fn add_block(&mut self, mut block: Block, page_id: &str, index: Option<usize>) -> Option<String> {
        if block.id.is_empty() || self.form().uses_id(&block.id) {
            block.id = self.ids.fresh_id(self.document.form());
        }
        let block_id = block.id.clone();

        let committed = self.commit(Mutation::InsertBlock {
            page_id: page_id.to_string(),
            index,
            block,
        });

        committed.then(|| {
            self.set_selection(Some(block_id.clone()));
            block_id
        })
    }

    /// Insert a palette template of the given type
    pub fn add_block_of_type(
        &mut self,
        block_type: BlockType,
        page_id: &str,
        index: Option<usize>,
    ) -> Option<String> {
        let block = Block::from_template(block_type, String::new());
        self.add_block(block, page_id, index)
    }

    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> bool {
        self.commit(Mutation::UpdateBlock {
            block_id: block_id.to_string(),
            patch,
        })
    }

    /// Remove a block, and every rule whose actions all target it
    pub fn delete_block(&mut self, block_id: &str) -> bool {
        self.commit(Mutation::DeleteBlock {
            block_id: block_id.to_string(),
        })
    }

    /// Clone a block right after itself. Returns the copy's id, which becomes
    /// the selection.
    pub fn duplicate_block(&mut self, block_id: &str) -> Option<String> {
        let new_id = self.ids.fresh_id(self.document.form());

        let committed = self.commit(Mutation::DuplicateBlock {
            block_id: block_id.to_string(),
            new_id: new_id.clone(),
        });

        committed.then(|| {
            self.set_selection(Some(new_id.clone()));
            new_id
        })
    }

    pub fn move_block(&mut self, block_id: &str, page_id: &str, index: usize) -> bool {
        self.commit(Mutation::MoveBlock {
            block_id: block_id.to_string(),
            page_id: page_id.to_string(),
            index,
        })
    }

    // ----- Page and form operations ---------------------------------------

    /// Append an empty page. Returns its id.
    pub fn add_page(&mut self, title: &str) -> String {
        let page_id = self.ids.fresh_id(self.document.form());
        self.commit(Mutation::AddPage {
            page_id: page_id.clone(),
            title: title.to_string(),
        });
        page_id
    }

    pub fn rename_page(&mut self, page_id: &str, title: &str) -> bool {
        self.commit(Mutation::RenamePage {
            page_id: page_id.to_string(),
            title: title.to_string(),
        })
    }

    /// Remove a page and its blocks. Refused for the last page.
    pub fn delete_page(&mut self, page_id: &str) -> bool {
        self.commit(Mutation::DeletePage {
            page_id: page_id.to_string(),
        })
    }

    pub fn update_form(&mut self, title: Option<String>, description: Option<String>) -> bool {
        self.commit(Mutation::UpdateForm { title, description })
    }

    // ----- Logic rules ----------------------------------------------------

    /// Add a rule. An empty or taken rule id is replaced. Returns the rule id.
    pub fn add_rule(&mut self, mut rule: LogicRule) -> Option<String> {
        if rule.id.is_empty() || self.form().find_rule(&rule.id).is_some() {
            rule.id = self.ids.fresh_id(self.document.form());
        }
        let rule_id = rule.id.clone();
        self.commit(Mutation::AddRule { rule }).then_some(rule_id)
    }

    pub fn update_rule(&mut self, rule: LogicRule) -> bool {
        self.commit(Mutation::UpdateRule { rule })
    }

    pub fn delete_rule(&mut self, rule_id: &str) -> bool {
        self.commit(Mutation::DeleteRule {
            rule_id: rule_id.to_string(),
        })
    }

    /// Apply an arbitrary mutation (replay, scripted edits)
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        self.commit(mutation)
    }

    // ----- Selection ------------------------------------------------------

    /// Select a block and its page. Unknown ids are ignored.
    pub fn select_block(&mut self, block_id: &str) -> bool {
        if !self.form().contains_block(block_id) {
            debug!(block_id, "Ignoring selection of unknown block");
            return false;
        }
        self.set_selection(Some(block_id.to_string()));
        true
    }

    /// Select a page. If the selected block lives elsewhere, the page's first
    /// block is selected instead (none for an empty page).
    pub fn select_page(&mut self, page_id: &str) -> bool {
        let Some(page) = self.form().find_page(page_id) else {
            debug!(page_id, "Ignoring selection of unknown page");
            return false;
        };

        let keep_block = self
            .selected_block_id
            .as_deref()
            .is_some_and(|id| page.blocks.iter().any(|b| b.id == id));
        let block_id = if keep_block {
            self.selected_block_id.clone()
        } else {
            page.blocks.first().map(|b| b.id.clone())
        };

        self.update_selection(block_id, Some(page_id.to_string()));
        true
    }

    fn set_selection(&mut self, block_id: Option<String>) {
        let page_id = block_id
            .as_deref()
            .and_then(|id| self.form().page_of(id))
            .map(|p| p.id.clone())
            .or_else(|| self.selected_page_id.clone());
        self.update_selection(block_id, page_id);
    }

    fn update_selection(&mut self, block_id: Option<String>, page_id: Option<String>) {
        if self.selected_block_id == block_id && self.selected_page_id == page_id {
            return;
        }
        self.selected_block_id = block_id;
        self.selected_page_id = page_id;

        let event = EditorEvent::SelectionChanged {
            block_id: self.selected_block_id.clone(),
            page_id: self.selected_page_id.clone(),
        };
        self.subscribers.emit(&event);
    }

    /// Drop selections that no longer exist. With no block selected, fall
    /// back to the first block of the selected page, or of the form when no
    /// page is selected either.
    fn repair_selection(&mut self) {
        let form = self.document.form();
        let selected_page = self
            .selected_page_id
            .as_deref()
            .and_then(|id| form.find_page(id));

        let block_id = self
            .selected_block_id
            .clone()
            .filter(|id| form.contains_block(id))
            .or_else(|| match selected_page {
                Some(page) => page.blocks.first().map(|b| b.id.clone()),
                None => form.first_block_id().map(str::to_string),
            });

        let page_id = match block_id.as_deref().and_then(|id| form.page_of(id)) {
            Some(page) => Some(page.id.clone()),
            None => selected_page
                .or_else(|| form.pages.first())
                .map(|p| p.id.clone()),
        };

        self.update_selection(block_id, page_id);
    }

    // ----- History --------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.end_batch();
        if !self.history.can_undo() {
            return false;
        }

        let description = self.history.undo_description().unwrap_or("change").to_string();
        let was_dirty = self.document.is_dirty();
        self.history.undo(self.document.form_mut_for_history());
        info!(version = self.document.version, %description, "Undo");

        self.after_change(format!("Undo {}", description), was_dirty);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.end_batch();
        if !self.history.can_redo() {
            return false;
        }

        let description = self.history.redo_description().unwrap_or("change").to_string();
        let was_dirty = self.document.is_dirty();
        self.history.redo(self.document.form_mut_for_history());
        info!(version = self.document.version, %description, "Redo");

        self.after_change(format!("Redo {}", description), was_dirty);
        true
    }

    /// Group the following calls into one undo step
    pub fn begin_batch(&mut self, description: &str) {
        self.history.begin_batch(self.document.form(), description);
    }

    /// Close the open batch. Returns whether it produced an undo step.
    pub fn end_batch(&mut self) -> bool {
        if !self.history.in_batch() {
            return false;
        }
        let pushed = self.history.end_batch(self.document.form());
        if pushed {
            self.emit_history();
        }
        pushed
    }

    // ----- Dirty state ----------------------------------------------------

    /// Called by the external autosaver once the current state is persisted
    pub fn mark_saved(&mut self) {
        if self.document.is_dirty() {
            self.document.mark_saved();
            self.subscribers.emit(&EditorEvent::DirtyChanged { dirty: false });
        }
    }

    /// Persist a file-backed document
    pub fn save(&mut self) -> Result<(), EditorError> {
        let was_dirty = self.document.is_dirty();
        self.document.save()?;
        if was_dirty {
            self.subscribers.emit(&EditorEvent::DirtyChanged { dirty: false });
        }
        Ok(())
    }

    // ----- Drag and drop --------------------------------------------------

    pub fn begin_drag(&mut self, active: DragSource) {
        debug!(?active, "Drag started");
        self.drag.start(active);
    }

    /// Hover feedback only; never mutates the document
    pub fn drag_over(&mut self, target: Option<DropTarget>) -> Option<DragCommand> {
        self.drag.over(target)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Finish the drag and apply its command. Returns whether the document
    /// changed.
    pub fn end_drag(&mut self) -> bool {
        match self.drag.end() {
            Some(command) => self.apply_drag(command),
            None => {
                debug!("Drag ended without a drop target");
                false
            }
        }
    }

    pub fn apply_drag(&mut self, command: DragCommand) -> bool {
        match command {
            DragCommand::InsertTemplate {
                block_type,
                page_id,
                index,
            } => self
                .add_block_of_type(block_type, &page_id, Some(index))
                .is_some(),
            DragCommand::MoveBlock {
                block_id,
                page_id,
                index,
            } => self.move_block(&block_id, &page_id, index),
        }
    }

    // ----- Observers ------------------------------------------------------

    /// Register a listener called after every committed change, selection
    /// change, dirty/history change and attention request
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Ask the inspector to highlight a block
    pub fn request_attention(&mut self, block_id: &str) -> bool {
        if !self.form().contains_block(block_id) {
            return false;
        }
        self.subscribers.emit(&EditorEvent::AttentionRequested {
            block_id: block_id.to_string(),
        });
        true
    }

    // ----- Commit path ----------------------------------------------------

    fn commit(&mut self, mutation: Mutation) -> bool {
        let name = mutation.name();
        let was_dirty = self.document.is_dirty();

        match self.document.apply(mutation, &self.effects) {
            Ok(Some(before)) => {
                self.history.record(before, name);
                info!(version = self.document.version, mutation = name, "Committed");
                self.after_change(name.to_string(), was_dirty);
                true
            }
            Ok(None) => {
                debug!(mutation = name, "Mutation left the form unchanged");
                false
            }
            Err(EditorError::Mutation(err)) if err.is_not_found() => {
                debug!(mutation = name, error = %err, "Ignoring mutation on missing target");
                false
            }
            Err(err) => {
                debug!(mutation = name, error = %err, "Mutation rejected");
                false
            }
        }
    }

    fn after_change(&mut self, description: String, was_dirty: bool) {
        self.repair_selection();

        self.subscribers.emit(&EditorEvent::Committed {
            version: self.document.version,
            description,
        });
        if !was_dirty {
            self.subscribers.emit(&EditorEvent::DirtyChanged { dirty: true });
        }
        self.emit_history();
    }

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.subscribers.emit(&event);
    }
}
