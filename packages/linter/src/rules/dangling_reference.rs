use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::{Form, ReferenceRole};

/// Lint rule that flags logic referencing blocks that no longer exist
pub struct DanglingReferenceRule;

impl LintRule for DanglingReferenceRule {
    fn name(&self) -> &'static str {
        "dangling-reference"
    }

    fn description(&self) -> &'static str {
        "Logic rules must reference existing blocks"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        form.dangling_references()
            .into_iter()
            .map(|reference| {
                let (message, suggestion) = match reference.role {
                    ReferenceRole::ConditionField => (
                        format!(
                            "Condition compares the answer of missing block '{}'; it can never match.",
                            reference.block_id
                        ),
                        "Point the condition at an existing question or remove it",
                    ),
                    ReferenceRole::ActionTarget => (
                        format!(
                            "Action targets missing block '{}' and has no effect.",
                            reference.block_id
                        ),
                        "Choose another target or remove the action",
                    ),
                    ReferenceRole::JumpDestination => (
                        format!(
                            "Jump destination '{}' no longer exists; respondents continue to the next block.",
                            reference.block_id
                        ),
                        "Pick a new jump destination",
                    ),
                };

                Diagnostic::warning(
                    self.name(),
                    message,
                    Location::rule_item(reference.rule_id, reference.item_id)
                        .with_block(reference.block_id),
                )
                .with_suggestion(suggestion)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::{ActionKind, Block, BlockType, LogicAction, LogicCondition, LogicRule, Operator};

    #[test]
    fn test_reports_each_missing_reference() {
        let mut form = Form::new("f1", "Test");
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "q1"));
        form.logic.rules.push(LogicRule {
            id: "r1".into(),
            conditions: vec![LogicCondition::new("c1", "deleted", Operator::Equals, "x")],
            actions: vec![
                LogicAction::new("a1", ActionKind::Show, "q1"),
                LogicAction::jump("a2", "q1", "gone"),
            ],
        });

        let diagnostics = DanglingReferenceRule.check_form(&form);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].location.item_id.as_deref(), Some("c1"));
        assert_eq!(diagnostics[1].location.block_id.as_deref(), Some("gone"));
        assert!(diagnostics[1].message.contains("Jump destination"));
    }

    #[test]
    fn test_valid_references_pass() {
        let mut form = Form::new("f1", "Test");
        form.pages[0].blocks.push(Block::from_template(BlockType::ShortText, "q1"));
        form.logic.rules.push(LogicRule {
            id: "r1".into(),
            conditions: vec![LogicCondition::new("c1", "q1", Operator::Equals, "x")],
            actions: vec![LogicAction::new("a1", ActionKind::Hide, "q1")],
        });

        assert!(DanglingReferenceRule.check_form(&form).is_empty());
    }
}
