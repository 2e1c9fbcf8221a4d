use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::{ActionKind, Form};

/// Lint rule that requires every jump action to name a destination
pub struct JumpWithoutDestinationRule;

impl LintRule for JumpWithoutDestinationRule {
    fn name(&self) -> &'static str {
        "jump-without-destination"
    }

    fn description(&self) -> &'static str {
        "Jump actions must name the block to jump to"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &form.logic.rules {
            for action in &rule.actions {
                if action.kind != ActionKind::Jump {
                    continue;
                }
                let missing = action.value.as_deref().map_or(true, |v| v.trim().is_empty());
                if missing {
                    diagnostics.push(
                        Diagnostic::error(
                            self.name(),
                            format!(
                                "Jump from '{}' has no destination and is ignored.",
                                action.target
                            ),
                            Location::rule_item(&rule.id, &action.id).with_block(&action.target),
                        )
                        .with_suggestion("Select the block respondents should jump to"),
                    );
                }
            }
        }

        diagnostics
    }
}
