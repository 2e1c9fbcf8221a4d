//! # Document Handle
//!
//! Owns the authoritative form tree for one editing session.
//!
//! A FormDocument can be:
//! - **Memory-backed**: built in memory or handed over by an external loader
//! - **File-backed**: loaded from and saved to a JSON snapshot on disk
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Save
//!   ↓      ↓      ↓
//! JSON  Mutations JSON
//! ```
//!
//! The version counter increments on every committed change; the dirty flag
//! is set by the same changes and cleared by `save`/`mark_saved`.

use crate::mutations::Mutation;
use crate::post_effects::PostEffectEngine;
use crate::EditorError;
use blockform_model::Form;
use std::path::{Path, PathBuf};

/// Editable form document
#[derive(Debug, Clone)]
pub struct FormDocument {
    /// Current version number (increments on each committed change)
    pub version: u64,

    form: Form,

    dirty: bool,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStorage {
    /// In-memory only; persistence belongs to the caller
    Memory,

    /// JSON snapshot on disk
    File { path: PathBuf },
}

impl FormDocument {
    /// Create document from an in-memory form (memory-backed)
    pub fn from_form(mut form: Form) -> Self {
        form.normalize();

        Self {
            version: 0,
            form,
            dirty: false,
            storage: DocumentStorage::Memory,
        }
    }

    /// Parse a persisted snapshot (memory-backed)
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        let form: Form = serde_json::from_str(source)?;
        Ok(Self::from_form(form))
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, EditorError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let mut document = Self::from_json(&source)?;
        document.storage = DocumentStorage::File { path };
        Ok(document)
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File { path } => Some(path),
            DocumentStorage::Memory => None,
        }
    }

    /// Apply a mutation and its post-effects as one change.
    ///
    /// Returns the form as it was before the change, or `None` when the
    /// mutation left the tree identical (nothing to record). On error the
    /// form is restored and neither the version nor the dirty flag change.
    pub fn apply(
        &mut self,
        mutation: Mutation,
        effects: &PostEffectEngine,
    ) -> Result<Option<Form>, EditorError> {
        let before = self.form.clone();

        match effects.apply_with_effects(mutation, &mut self.form) {
            Ok(_) if self.form == before => Ok(None),
            Ok(_) => {
                self.touch();
                Ok(Some(before))
            }
            Err(err) => {
                self.form = before;
                Err(err.into())
            }
        }
    }

    /// Swap in a different form (undo/redo). Counts as a change.
    pub(crate) fn form_mut_for_history(&mut self) -> &mut Form {
        self.touch();
        &mut self.form
    }

    fn touch(&mut self) {
        self.version += 1;
        self.dirty = true;
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that an external saver persisted the current state
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.form)?)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = match &self.storage {
            DocumentStorage::File { path } => path.clone(),
            DocumentStorage::Memory => return Err(EditorError::NotFileBacked),
        };

        std::fs::write(&path, self.to_json()?)?;
        self.dirty = false;
        Ok(())
    }

    /// Write to a new location and make the document file-backed there
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        self.storage = DocumentStorage::File { path: path.into() };
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::{Block, BlockType};

    #[test]
    fn test_create_memory_document() {
        let doc = FormDocument::from_json(r#"{ "id": "f1", "title": "Signup" }"#).unwrap();

        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.form().title, "Signup");
        // At least one page
        assert_eq!(doc.form().pages.len(), 1);
        assert!(doc.path().is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            FormDocument::from_json("{ not json"),
            Err(EditorError::Json(_))
        ));
    }

    #[test]
    fn test_apply_bumps_version_and_dirty() {
        let mut doc = FormDocument::from_form(Form::new("f1", "Test"));
        let page_id = doc.form().pages[0].id.clone();
        let effects = PostEffectEngine::new();

        let previous = doc
            .apply(
                Mutation::InsertBlock {
                    page_id,
                    index: None,
                    block: Block::from_template(BlockType::ShortText, "b1"),
                },
                &effects,
            )
            .unwrap();

        assert_eq!(previous.map(|f| f.block_count()), Some(0));
        assert_eq!(doc.version, 1);
        assert!(doc.is_dirty());

        doc.mark_saved();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_failed_apply_changes_nothing() {
        let mut doc = FormDocument::from_form(Form::new("f1", "Test"));
        let result = doc.apply(
            Mutation::DeleteBlock {
                block_id: "missing".into(),
            },
            &PostEffectEngine::new(),
        );

        assert!(matches!(result, Err(EditorError::Mutation(_))));
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_identity_change_is_not_a_change() {
        let mut doc = FormDocument::from_form(Form::new("f1", "Test"));
        let result = doc
            .apply(
                Mutation::UpdateForm {
                    title: Some("Test".into()),
                    description: None,
                },
                &PostEffectEngine::new(),
            )
            .unwrap();

        assert!(result.is_none());
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = FormDocument::from_form(Form::new("f1", "Test"));
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("blockform_document_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("form.json");

        let mut form = Form::new("f1", "Saved");
        form.pages[0]
            .blocks
            .push(Block::from_template(BlockType::Email, "b1").with_key("email"));

        let mut doc = FormDocument::from_form(form.clone());
        doc.save_as(&path).unwrap();
        assert!(!doc.is_dirty());

        let loaded = FormDocument::load(&path).unwrap();
        assert_eq!(loaded.form(), &form);
        assert_eq!(loaded.path(), Some(path.as_path()));

        std::fs::remove_dir_all(&dir).ok();
    }
}
