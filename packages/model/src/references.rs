use crate::form::Form;
use crate::logic::ActionKind;
use serde::{Deserialize, Serialize};

/// Where in a rule a block id is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRole {
    ConditionField,
    ActionTarget,
    JumpDestination,
}

/// A rule reference to a block that is not in the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference {
    pub rule_id: String,
    /// Id of the condition or action holding the reference
    pub item_id: String,
    pub role: ReferenceRole,
    pub block_id: String,
}

impl Form {
    /// Every rule reference that points at a missing block, in rule order
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for rule in &self.logic.rules {
            let mut check = |item_id: &str, role: ReferenceRole, block_id: &str| {
                if !self.contains_block(block_id) {
                    dangling.push(DanglingReference {
                        rule_id: rule.id.clone(),
                        item_id: item_id.to_string(),
                        role,
                        block_id: block_id.to_string(),
                    });
                }
            };

            for condition in &rule.conditions {
                check(&condition.id, ReferenceRole::ConditionField, &condition.field);
            }
            for action in &rule.actions {
                check(&action.id, ReferenceRole::ActionTarget, &action.target);
                if let (ActionKind::Jump, Some(destination)) = (&action.kind, &action.value) {
                    check(&action.id, ReferenceRole::JumpDestination, destination);
                }
            }
        }

        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockType};
    use crate::logic::{ActionKind, LogicAction, LogicCondition, LogicRule, Operator};

    #[test]
    fn test_detects_each_role() {
        let mut form = Form::new("f1", "Test");
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "q1"));
        form.logic.rules.push(LogicRule {
            id: "r1".into(),
            conditions: vec![LogicCondition::new("c1", "gone", Operator::Equals, "x")],
            actions: vec![
                LogicAction::new("a1", ActionKind::Show, "q1"),
                LogicAction::new("a2", ActionKind::Hide, "also-gone"),
                LogicAction::jump("a3", "q1", "missing"),
            ],
        });

        let dangling = form.dangling_references();
        let roles: Vec<_> = dangling.iter().map(|d| (d.item_id.as_str(), d.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("c1", ReferenceRole::ConditionField),
                ("a2", ReferenceRole::ActionTarget),
                ("a3", ReferenceRole::JumpDestination),
            ]
        );
    }

    #[test]
    fn test_clean_form_has_none() {
        let mut form = Form::new("f1", "Test");
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "q1"));
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "q2"));
        form.logic.rules.push(LogicRule {
            id: "r1".into(),
            conditions: vec![LogicCondition::new("c1", "q1", Operator::Equals, "yes")],
            actions: vec![LogicAction::new("a1", ActionKind::Show, "q2")],
        });
        assert!(form.dangling_references().is_empty());
    }
}
