use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::{ActionKind, Form};
use std::collections::BTreeMap;

/// Lint rule that points out blocks both shown and hidden by logic.
///
/// Not an error: the later rule wins when both fire. Authors often intend
/// something else, so the winner is named.
pub struct ConflictingVisibilityRule;

impl LintRule for ConflictingVisibilityRule {
    fn name(&self) -> &'static str {
        "conflicting-visibility"
    }

    fn description(&self) -> &'static str {
        "Blocks that are both shown and hidden by logic rules"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        // target -> (first kind, last rule id, conflict seen)
        let mut targets: BTreeMap<&str, (&ActionKind, &str, bool)> = BTreeMap::new();

        for rule in &form.logic.rules {
            for action in rule.actions.iter().filter(|a| a.kind.is_visibility()) {
                targets
                    .entry(action.target.as_str())
                    .and_modify(|(first, last_rule, conflict)| {
                        *conflict |= *first != &action.kind;
                        *last_rule = rule.id.as_str();
                    })
                    .or_insert((&action.kind, rule.id.as_str(), false));
            }
        }

        targets
            .into_iter()
            .filter(|(_, (_, _, conflict))| *conflict)
            .map(|(target, (_, last_rule, _))| {
                Diagnostic::info(
                    self.name(),
                    format!(
                        "Block '{}' is both shown and hidden by logic; when several rules fire, rule '{}' wins.",
                        target, last_rule
                    ),
                    Location::rule(last_rule).with_block(target),
                )
                .with_suggestion("Reorder the rules or make their conditions exclusive")
            })
            .collect()
    }
}
