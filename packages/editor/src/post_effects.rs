//! # Post-Effect System
//!
//! Mutations trigger cascading effects to keep the document consistent.
//!
//! ## Design
//!
//! A post-effect inspects a mutation against the form *before* it is applied
//! and returns secondary mutations. The engine applies the primary mutation,
//! then the secondaries, and the session records all of them as a single
//! undo step.
//!
//! Effects only remove what has become meaningless. References that are
//! merely broken (a jump destination that was deleted, a condition on a
//! removed field) are left in place for the linter to report.

use crate::mutations::{Mutation, MutationError};
use blockform_model::Form;
use std::collections::HashSet;

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug {
    /// Analyze the mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, form: &Form) -> Vec<Mutation>;
}

/// Remove rules whose every action targets a block that is being deleted
#[derive(Debug)]
pub struct PruneOrphanedRules;

impl PostEffect for PruneOrphanedRules {
    fn analyze(&self, mutation: &Mutation, form: &Form) -> Vec<Mutation> {
        let removed: HashSet<&str> = match mutation {
            Mutation::DeleteBlock { block_id } => [block_id.as_str()].into_iter().collect(),
            Mutation::DeletePage { page_id } => match form.find_page(page_id) {
                Some(page) => page.blocks.iter().map(|b| b.id.as_str()).collect(),
                None => return vec![],
            },
            _ => return vec![],
        };

        // By position: rule ids are not guaranteed unique in loaded forms
        let indices: Vec<usize> = form
            .logic
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| {
                !rule.actions.is_empty()
                    && rule
                        .actions
                        .iter()
                        .all(|action| removed.contains(action.target.as_str()))
            })
            .map(|(index, _)| index)
            .collect();

        if indices.is_empty() {
            vec![]
        } else {
            vec![Mutation::DeleteRules { indices }]
        }
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(PruneOrphanedRules)],
        }
    }

    /// Engine without any effects
    pub fn empty() -> Self {
        Self { effects: vec![] }
    }

    pub fn add_effect(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, form: &Form) -> Vec<Mutation> {
        let mut secondary_mutations = Vec::new();

        for effect in &self.effects {
            let mut effect_mutations = effect.analyze(mutation, form);
            secondary_mutations.append(&mut effect_mutations);
        }

        secondary_mutations
    }

    /// Apply a mutation with all its post-effects.
    ///
    /// Returns every mutation applied, primary first. On error the form may
    /// be partially changed; callers keep a snapshot to restore.
    pub fn apply_with_effects(
        &self,
        mutation: Mutation,
        form: &mut Form,
    ) -> Result<Vec<Mutation>, MutationError> {
        mutation.validate(form)?;

        // Secondaries are decided against the pre-mutation form
        let secondary = self.analyze(&mutation, form);

        mutation.apply(form)?;
        let mut applied_mutations = vec![mutation];

        for secondary_mutation in secondary {
            secondary_mutation.apply(form)?;
            applied_mutations.push(secondary_mutation);
        }

        Ok(applied_mutations)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::{
        ActionKind, Block, BlockType, LogicAction, LogicCondition, LogicRule, Operator, Page,
    };

    fn form() -> Form {
        let mut form = Form::new("f1", "Test");
        for id in ["q1", "q2", "q3"] {
            form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, id));
        }
        form.logic.rules = vec![
            LogicRule {
                id: "only-q2".into(),
                conditions: vec![LogicCondition::new("c1", "q1", Operator::Equals, "yes")],
                actions: vec![LogicAction::new("a1", ActionKind::Show, "q2")],
            },
            LogicRule {
                id: "mixed".into(),
                conditions: vec![],
                actions: vec![
                    LogicAction::new("a2", ActionKind::Hide, "q2"),
                    LogicAction::new("a3", ActionKind::Hide, "q3"),
                ],
            },
            LogicRule {
                id: "jump-to-q2".into(),
                conditions: vec![],
                actions: vec![LogicAction::jump("a4", "q1", "q2")],
            },
            LogicRule {
                id: "no-actions".into(),
                conditions: vec![],
                actions: vec![],
            },
        ];
        form
    }

    fn rule_ids(form: &Form) -> Vec<&str> {
        form.logic.rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_delete_block_prunes_sole_target_rules() {
        let mut form = form();
        let engine = PostEffectEngine::new();

        let applied = engine
            .apply_with_effects(Mutation::DeleteBlock { block_id: "q2".into() }, &mut form)
            .unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(rule_ids(&form), vec!["mixed", "jump-to-q2", "no-actions"]);
        // Dangling jump destination stays for the linter
        assert_eq!(form.logic.rules[1].actions[0].value.as_deref(), Some("q2"));
    }

    #[test]
    fn test_delete_page_prunes_rules_targeting_its_blocks() {
        let mut form = form();
        let mut second = Page::new("p2", "Two");
        second.blocks.push(form.pages[0].blocks.pop().unwrap());
        second.blocks.push(form.pages[0].blocks.pop().unwrap());
        form.pages.push(second);

        let engine = PostEffectEngine::new();
        engine
            .apply_with_effects(Mutation::DeletePage { page_id: "p2".into() }, &mut form)
            .unwrap();

        assert_eq!(rule_ids(&form), vec!["jump-to-q2", "no-actions"]);
    }

    #[test]
    fn test_other_mutations_have_no_effects() {
        let form = form();
        let engine = PostEffectEngine::new();
        let secondary = engine.analyze(
            &Mutation::MoveBlock {
                block_id: "q1".into(),
                page_id: form.pages[0].id.clone(),
                index: 2,
            },
            &form,
        );
        assert!(secondary.is_empty());
    }

    #[test]
    fn test_failed_primary_applies_nothing() {
        let mut form = form();
        let before = form.clone();
        let engine = PostEffectEngine::new();

        let result =
            engine.apply_with_effects(Mutation::DeleteBlock { block_id: "zzz".into() }, &mut form);
        assert!(result.is_err());
        assert_eq!(form, before);
    }

    #[test]
    fn test_prune_handles_repeated_rule_ids() {
        let mut form = form();
        let shared = |target: &str| LogicRule {
            id: "r1".into(),
            conditions: vec![],
            actions: vec![LogicAction::new("a", ActionKind::Hide, target)],
        };
        form.logic.rules = vec![shared("q2"), shared("q2"), shared("q3")];

        let engine = PostEffectEngine::new();
        engine
            .apply_with_effects(Mutation::DeleteBlock { block_id: "q2".into() }, &mut form)
            .unwrap();

        assert!(!form.contains_block("q2"));
        // The rule sharing the id but targeting q3 survives
        assert_eq!(form.logic.rules.len(), 1);
        assert_eq!(form.logic.rules[0].actions[0].target, "q3");
    }
}
