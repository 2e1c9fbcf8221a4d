use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::Form;
use std::collections::HashSet;

/// Lint rule that flags logic rules sharing an id
pub struct DuplicateRuleIdRule;

impl LintRule for DuplicateRuleIdRule {
    fn name(&self) -> &'static str {
        "duplicate-rule-id"
    }

    fn description(&self) -> &'static str {
        "Logic rule ids must be unique"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();

        form.logic
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !seen.insert(rule.id.as_str()))
            .map(|(position, rule)| {
                Diagnostic::warning(
                    self.name(),
                    format!(
                        "Rule #{} reuses id '{}'; updating or deleting by id only reaches the first one.",
                        position + 1,
                        rule.id
                    ),
                    Location::rule(&rule.id),
                )
                .with_suggestion("Give each rule its own id")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::LogicRule;

    fn rule(id: &str) -> LogicRule {
        LogicRule {
            id: id.into(),
            conditions: vec![],
            actions: vec![],
        }
    }

    #[test]
    fn test_flags_each_repeat() {
        let mut form = Form::new("f1", "Test");
        form.logic.rules = vec![rule("r1"), rule("r2"), rule("r1"), rule("r1")];

        let diagnostics = DuplicateRuleIdRule.check_form(&form);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("#3"));
        assert_eq!(diagnostics[1].location.rule_id.as_deref(), Some("r1"));
    }
}
