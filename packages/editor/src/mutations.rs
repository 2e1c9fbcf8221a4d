//! # Form Mutations
//!
//! Structural operations on a form document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one editor action
//! 2. **Validated**: a mutation checks its targets before touching the tree,
//!    so a failed mutation leaves the form unchanged
//! 3. **Deterministic**: fresh ids are chosen by the caller and carried in
//!    the mutation, so replaying a mutation reproduces the same tree
//!
//! ## Mutation Semantics
//!
//! ### InsertBlock
//! - Index is clamped into `[0, len]`; `None` appends
//! - An empty key is derived from the question; colliding keys get a
//!   numeric suffix
//!
//! ### MoveBlock
//! - Removal happens first; the index is clamped to the post-removal length
//!   of the target page, which may be the source page
//!
//! ### DeleteBlock
//! - Removes only the block. Rule cleanup is a post-effect
//!   (see `post_effects`)
//!
//! ### DeleteRule / DeleteRules
//! - Loaded forms may repeat a rule id. `DeleteRule` removes the first rule
//!   with that id; `DeleteRules` removes by position and never looks at ids

use blockform_model::{
    slugify, unique_key, Block, BlockPatch, Form, LogicRule, Page,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// Insert a fully-formed block into a page
    InsertBlock {
        page_id: String,
        index: Option<usize>,
        block: Block,
    },

    /// Shallow-merge fields into a block
    UpdateBlock {
        block_id: String,
        patch: BlockPatch,
    },

    /// Remove a block from its page
    DeleteBlock {
        block_id: String,
    },

    /// Clone a block right after itself under a new id
    DuplicateBlock {
        block_id: String,
        new_id: String,
    },

    /// Move a block to a page at index (same page = reorder)
    MoveBlock {
        block_id: String,
        page_id: String,
        index: usize,
    },

    AddPage {
        page_id: String,
        title: String,
    },

    RenamePage {
        page_id: String,
        title: String,
    },

    /// Remove a page and its blocks. The last page cannot be removed.
    DeletePage {
        page_id: String,
    },

    UpdateForm {
        title: Option<String>,
        description: Option<String>,
    },

    AddRule {
        rule: LogicRule,
    },

    /// Replace the rule with the same id
    UpdateRule {
        rule: LogicRule,
    },

    DeleteRule {
        rule_id: String,
    },

    /// Remove rules by their position in `logic.rules`
    DeleteRules {
        indices: Vec<usize>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Rule not found: {0}")]
    RuleNotFound(String),

    #[error("Id already in use: {0}")]
    DuplicateId(String),

    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("A form must keep at least one page")]
    LastPage,
}

impl MutationError {
    /// Errors that the editing surface treats as a silent no-op
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MutationError::BlockNotFound(_)
                | MutationError::PageNotFound(_)
                | MutationError::RuleNotFound(_)
        )
    }
}

impl Mutation {
    /// Short name used for logging and history descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "Add block",
            Mutation::UpdateBlock { .. } => "Update block",
            Mutation::DeleteBlock { .. } => "Delete block",
            Mutation::DuplicateBlock { .. } => "Duplicate block",
            Mutation::MoveBlock { .. } => "Move block",
            Mutation::AddPage { .. } => "Add page",
            Mutation::RenamePage { .. } => "Rename page",
            Mutation::DeletePage { .. } => "Delete page",
            Mutation::UpdateForm { .. } => "Update form",
            Mutation::AddRule { .. } => "Add rule",
            Mutation::UpdateRule { .. } => "Update rule",
            Mutation::DeleteRule { .. } => "Delete rule",
            Mutation::DeleteRules { .. } => "Delete rules",
        }
    }

    /// Apply mutation to the form with validation
    pub fn apply(&self, form: &mut Form) -> Result<(), MutationError> {
        self.validate(form)?;

        match self {
            Mutation::InsertBlock { page_id, index, block } => {
                Self::apply_insert(form, page_id, *index, block)
            }

            Mutation::UpdateBlock { block_id, patch } => {
                Self::apply_update(form, block_id, patch)
            }

            Mutation::DeleteBlock { block_id } => {
                Self::remove_block(form, block_id)?;
                Ok(())
            }

            Mutation::DuplicateBlock { block_id, new_id } => {
                Self::apply_duplicate(form, block_id, new_id)
            }

            Mutation::MoveBlock { block_id, page_id, index } => {
                Self::apply_move(form, block_id, page_id, *index)
            }

            Mutation::AddPage { page_id, title } => {
                form.pages.push(Page::new(page_id.clone(), title.clone()));
                Ok(())
            }

            Mutation::RenamePage { page_id, title } => {
                let page = form
                    .find_page_mut(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                page.title = title.clone();
                Ok(())
            }

            Mutation::DeletePage { page_id } => {
                let index = form
                    .page_index(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                form.pages.remove(index);
                Ok(())
            }

            Mutation::UpdateForm { title, description } => {
                if let Some(title) = title {
                    form.title = title.clone();
                }
                if let Some(description) = description {
                    form.description = description.clone();
                }
                Ok(())
            }

            Mutation::AddRule { rule } => {
                form.logic.rules.push(rule.clone());
                Ok(())
            }

            Mutation::UpdateRule { rule } => {
                let slot = form
                    .logic
                    .rules
                    .iter_mut()
                    .find(|r| r.id == rule.id)
                    .ok_or_else(|| MutationError::RuleNotFound(rule.id.clone()))?;
                *slot = rule.clone();
                Ok(())
            }

            Mutation::DeleteRule { rule_id } => {
                let position = form
                    .logic
                    .rules
                    .iter()
                    .position(|r| &r.id == rule_id)
                    .ok_or_else(|| MutationError::RuleNotFound(rule_id.clone()))?;
                form.logic.rules.remove(position);
                Ok(())
            }

            Mutation::DeleteRules { indices } => {
                let mut index = 0;
                form.logic.rules.retain(|_| {
                    let keep = !indices.contains(&index);
                    index += 1;
                    keep
                });
                Ok(())
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, form: &Form) -> Result<(), MutationError> {
        match self {
            Mutation::InsertBlock { page_id, block, .. } => {
                require_page(form, page_id)?;
                require_fresh_id(form, &block.id)
            }

            Mutation::UpdateBlock { block_id, .. } | Mutation::DeleteBlock { block_id } => {
                require_block(form, block_id)
            }

            Mutation::DuplicateBlock { block_id, new_id } => {
                require_block(form, block_id)?;
                require_fresh_id(form, new_id)
            }

            Mutation::MoveBlock { block_id, page_id, .. } => {
                require_block(form, block_id)?;
                require_page(form, page_id)
            }

            Mutation::AddPage { page_id, .. } => require_fresh_id(form, page_id),

            Mutation::RenamePage { page_id, .. } => require_page(form, page_id),

            Mutation::DeletePage { page_id } => {
                require_page(form, page_id)?;
                if form.pages.len() <= 1 {
                    return Err(MutationError::LastPage);
                }
                Ok(())
            }

            Mutation::UpdateForm { .. } => Ok(()),

            Mutation::AddRule { rule } => {
                if rule.id.is_empty() {
                    return Err(MutationError::InvalidId(rule.id.clone()));
                }
                if form.find_rule(&rule.id).is_some() {
                    return Err(MutationError::DuplicateId(rule.id.clone()));
                }
                Ok(())
            }

            Mutation::UpdateRule { rule } => require_rule(form, &rule.id),

            Mutation::DeleteRule { rule_id } => require_rule(form, rule_id),

            Mutation::DeleteRules { indices } => {
                match indices.iter().find(|&&i| i >= form.logic.rules.len()) {
                    Some(index) => Err(MutationError::RuleNotFound(format!("#{}", index))),
                    None => Ok(()),
                }
            }
        }
    }

    fn apply_insert(
        form: &mut Form,
        page_id: &str,
        index: Option<usize>,
        block: &Block,
    ) -> Result<(), MutationError> {
        let mut block = block.clone();
        let base = if block.key.is_empty() {
            derive_key(&block)
        } else {
            block.key.clone()
        };
        block.key = unique_key(&base, |k| form.key_taken(k, None));

        let page = form
            .find_page_mut(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?;
        let insert_index = index.unwrap_or(page.blocks.len()).min(page.blocks.len());
        page.blocks.insert(insert_index, block);
        Ok(())
    }

    fn apply_update(form: &mut Form, block_id: &str, patch: &BlockPatch) -> Result<(), MutationError> {
        let mut updated = form
            .find_block(block_id)
            .cloned()
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
        updated.merge(patch);

        if patch.key.is_some() {
            let base = if updated.key.is_empty() {
                derive_key(&updated)
            } else {
                updated.key.clone()
            };
            updated.key = unique_key(&base, |k| form.key_taken(k, Some(block_id)));
        }

        if let Some(block) = form.find_block_mut(block_id) {
            *block = updated;
        }
        Ok(())
    }

    fn apply_duplicate(form: &mut Form, block_id: &str, new_id: &str) -> Result<(), MutationError> {
        let (page_idx, block_idx) = form
            .locate_block(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;

        let mut copy = form.pages[page_idx].blocks[block_idx].clone();
        copy.id = new_id.to_string();
        let base = if copy.key.is_empty() {
            derive_key(&copy)
        } else {
            copy.key.clone()
        };
        copy.key = unique_key(&base, |k| form.key_taken(k, None));

        form.pages[page_idx].blocks.insert(block_idx + 1, copy);
        Ok(())
    }

    fn apply_move(
        form: &mut Form,
        block_id: &str,
        page_id: &str,
        index: usize,
    ) -> Result<(), MutationError> {
        // Validated above; the target page cannot disappear by removing a block
        let block = Self::remove_block(form, block_id)?;

        let page = form
            .find_page_mut(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?;
        let insert_index = index.min(page.blocks.len());
        page.blocks.insert(insert_index, block);
        Ok(())
    }

    /// Remove a block from its page and return it
    fn remove_block(form: &mut Form, block_id: &str) -> Result<Block, MutationError> {
        let (page_idx, block_idx) = form
            .locate_block(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))?;
        Ok(form.pages[page_idx].blocks.remove(block_idx))
    }
}

fn derive_key(block: &Block) -> String {
    let slug = slugify(&block.question);
    if slug.is_empty() {
        block.block_type.as_str().to_string()
    } else {
        slug
    }
}

fn require_block(form: &Form, block_id: &str) -> Result<(), MutationError> {
    if form.contains_block(block_id) {
        Ok(())
    } else {
        Err(MutationError::BlockNotFound(block_id.to_string()))
    }
}

fn require_page(form: &Form, page_id: &str) -> Result<(), MutationError> {
    form.find_page(page_id)
        .map(|_| ())
        .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
}

fn require_rule(form: &Form, rule_id: &str) -> Result<(), MutationError> {
    form.find_rule(rule_id)
        .map(|_| ())
        .ok_or_else(|| MutationError::RuleNotFound(rule_id.to_string()))
}

fn require_fresh_id(form: &Form, id: &str) -> Result<(), MutationError> {
    if id.is_empty() {
        return Err(MutationError::InvalidId(id.to_string()));
    }
    if form.uses_id(id) {
        return Err(MutationError::DuplicateId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::BlockType;

    fn form_with(ids: &[&str]) -> Form {
        let mut form = Form::new("f1", "Test");
        for id in ids {
            let block = Block::from_template(BlockType::ShortText, *id).with_key(*id);
            form.pages[0].blocks.push(block);
        }
        form
    }

    fn order(form: &Form, page: usize) -> Vec<&str> {
        form.pages[page].blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveBlock {
            block_id: "a".to_string(),
            page_id: "p1".to_string(),
            index: 2,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
        assert!(json.contains("move_block"));
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut form = form_with(&["a", "b"]);
        let page_id = form.pages[0].id.clone();

        Mutation::InsertBlock {
            page_id: page_id.clone(),
            index: Some(99),
            block: Block::from_template(BlockType::Email, "c"),
        }
        .apply(&mut form)
        .unwrap();
        Mutation::InsertBlock {
            page_id,
            index: Some(0),
            block: Block::from_template(BlockType::Email, "d"),
        }
        .apply(&mut form)
        .unwrap();

        assert_eq!(order(&form, 0), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_insert_derives_unique_key() {
        let mut form = Form::new("f1", "Test");
        let page_id = form.pages[0].id.clone();

        for id in ["a", "b"] {
            Mutation::InsertBlock {
                page_id: page_id.clone(),
                index: None,
                block: Block::from_template(BlockType::ShortText, id).with_question("Your name?"),
            }
            .apply(&mut form)
            .unwrap();
        }

        let keys: Vec<_> = form.blocks().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["your_name", "your_name_1"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut form = form_with(&["a"]);
        let page_id = form.pages[0].id.clone();
        let result = Mutation::InsertBlock {
            page_id,
            index: None,
            block: Block::from_template(BlockType::Email, "a"),
        }
        .apply(&mut form);

        assert_eq!(result, Err(MutationError::DuplicateId("a".into())));
        assert_eq!(form.block_count(), 1);
    }

    #[test]
    fn test_move_within_page() {
        let mut form = form_with(&["A", "B", "C"]);
        let page_id = form.pages[0].id.clone();

        Mutation::MoveBlock {
            block_id: "A".into(),
            page_id,
            index: 2,
        }
        .apply(&mut form)
        .unwrap();

        assert_eq!(order(&form, 0), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_move_across_pages() {
        let mut form = form_with(&["A", "B"]);
        form.pages.push(Page::new("p2", "Two"));

        Mutation::MoveBlock {
            block_id: "B".into(),
            page_id: "p2".into(),
            index: 7,
        }
        .apply(&mut form)
        .unwrap();

        assert_eq!(order(&form, 0), vec!["A"]);
        assert_eq!(order(&form, 1), vec!["B"]);
    }

    #[test]
    fn test_move_to_missing_page_keeps_block() {
        let mut form = form_with(&["A", "B"]);
        let result = Mutation::MoveBlock {
            block_id: "A".into(),
            page_id: "nope".into(),
            index: 0,
        }
        .apply(&mut form);

        assert_eq!(result, Err(MutationError::PageNotFound("nope".into())));
        assert_eq!(order(&form, 0), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_after_original() {
        let mut form = form_with(&["A", "B"]);
        form.pages[0].blocks[0].key = "name".into();

        Mutation::DuplicateBlock {
            block_id: "A".into(),
            new_id: "A2".into(),
        }
        .apply(&mut form)
        .unwrap();

        assert_eq!(order(&form, 0), vec!["A", "A2", "B"]);
        let copy = form.find_block("A2").unwrap();
        assert_eq!(copy.key, "name_1");
        assert_eq!(copy.question, form.find_block("A").unwrap().question);
    }

    #[test]
    fn test_update_key_stays_unique() {
        let mut form = form_with(&["a", "b"]);
        Mutation::UpdateBlock {
            block_id: "b".into(),
            patch: BlockPatch {
                key: Some("a".into()),
                ..Default::default()
            },
        }
        .apply(&mut form)
        .unwrap();

        assert_eq!(form.find_block("b").unwrap().key, "a_1");
    }

    #[test]
    fn test_update_missing_block() {
        let mut form = form_with(&["a"]);
        let result = Mutation::UpdateBlock {
            block_id: "zzz".into(),
            patch: BlockPatch::question("Hi"),
        }
        .apply(&mut form);

        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_cannot_delete_last_page() {
        let mut form = form_with(&["a"]);
        let page_id = form.pages[0].id.clone();
        let result = Mutation::DeletePage { page_id }.apply(&mut form);
        assert_eq!(result, Err(MutationError::LastPage));
        assert_eq!(form.pages.len(), 1);
    }

    #[test]
    fn test_add_rule_requires_unique_id() {
        let mut form = form_with(&["a"]);
        let rule = LogicRule {
            id: "r1".into(),
            conditions: vec![],
            actions: vec![],
        };
        Mutation::AddRule { rule: rule.clone() }.apply(&mut form).unwrap();
        let again = Mutation::AddRule { rule }.apply(&mut form);
        assert_eq!(again, Err(MutationError::DuplicateId("r1".into())));
    }

    #[test]
    fn test_rule_deletes_with_repeated_ids() {
        let mut form = form_with(&["a"]);
        for condition_id in ["c1", "c2", "c3"] {
            form.logic.rules.push(LogicRule {
                id: "r1".into(),
                conditions: vec![blockform_model::LogicCondition::new(
                    condition_id,
                    "a",
                    blockform_model::Operator::Equals,
                    "x",
                )],
                actions: vec![],
            });
        }

        // Only the first rule with the id goes
        Mutation::DeleteRule { rule_id: "r1".into() }.apply(&mut form).unwrap();
        assert_eq!(form.logic.rules.len(), 2);
        assert_eq!(form.logic.rules[0].conditions[0].id, "c2");

        Mutation::DeleteRules { indices: vec![1] }.apply(&mut form).unwrap();
        assert_eq!(form.logic.rules.len(), 1);
        assert_eq!(form.logic.rules[0].conditions[0].id, "c2");

        let out_of_range = Mutation::DeleteRules { indices: vec![4] }.apply(&mut form);
        assert!(out_of_range.unwrap_err().is_not_found());
        assert_eq!(form.logic.rules.len(), 1);
    }
}
