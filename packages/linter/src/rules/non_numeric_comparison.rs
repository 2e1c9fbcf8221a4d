use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::Form;

/// Lint rule for numeric comparisons against values that are not numbers.
/// Such conditions are always false at fill time.
pub struct NonNumericComparisonRule;

impl LintRule for NonNumericComparisonRule {
    fn name(&self) -> &'static str {
        "non-numeric-comparison"
    }

    fn description(&self) -> &'static str {
        "greater_than/less_than conditions must compare against a number"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for rule in &form.logic.rules {
            for condition in rule.conditions.iter().filter(|c| c.operator.is_numeric()) {
                let numeric = condition
                    .value
                    .trim()
                    .parse::<f64>()
                    .map_or(false, f64::is_finite);
                if !numeric {
                    diagnostics.push(
                        Diagnostic::warning(
                            self.name(),
                            format!(
                                "'{}' is not a number, so this condition never matches.",
                                condition.value
                            ),
                            Location::rule_item(&rule.id, &condition.id)
                                .with_block(&condition.field),
                        )
                        .with_suggestion("Compare against a number, or use equals/contains"),
                    );
                }
            }
        }

        diagnostics
    }
}
