use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::Form;

/// Lint rule that points out rules with nothing to do
pub struct EmptyRuleRule;

impl LintRule for EmptyRuleRule {
    fn name(&self) -> &'static str {
        "empty-rule"
    }

    fn description(&self) -> &'static str {
        "Rules without actions have no effect"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        form.logic
            .rules
            .iter()
            .filter(|rule| rule.actions.is_empty())
            .map(|rule| {
                Diagnostic::info(
                    self.name(),
                    format!("Rule '{}' has no actions.", rule.id),
                    Location::rule(&rule.id),
                )
                .with_suggestion("Add an action or delete the rule")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::{ActionKind, LogicAction, LogicRule};

    #[test]
    fn test_only_actionless_rules_reported() {
        let mut form = Form::new("f1", "Test");
        form.logic.rules = vec![
            LogicRule {
                id: "empty".into(),
                conditions: vec![],
                actions: vec![],
            },
            // No conditions is fine: always fires
            LogicRule {
                id: "always".into(),
                conditions: vec![],
                actions: vec![LogicAction::new("a1", ActionKind::Hide, "q1")],
            },
        ];

        let diagnostics = EmptyRuleRule.check_form(&form);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.rule_id.as_deref(), Some("empty"));
    }
}
