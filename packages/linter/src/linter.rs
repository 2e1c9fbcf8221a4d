use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::rules::RuleRegistry;
use blockform_model::Form;

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,

    /// Rule names to skip
    pub disabled: Vec<String>,
}

/// Lint a form and return diagnostics, most severe first. Within a level,
/// diagnostics keep rule registration order.
pub fn lint_form(form: &Form, options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    let mut diagnostics = Vec::new();

    for rule in registry.rules() {
        if options.disabled.iter().any(|name| name == rule.name()) {
            continue;
        }
        diagnostics.extend(rule.check_form(form));
    }

    // Stable sort keeps the per-rule order
    diagnostics.sort_by_key(|d| d.level);
    diagnostics
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn broken_form() -> Form {
        serde_json::from_value(json!({
            "id": "f1",
            "title": "Broken",
            "pages": [{
                "id": "p1",
                "title": "Page 1",
                "blocks": [
                    { "id": "q1", "type": "short_text", "question": "Name", "key": "name" },
                    { "id": "q2", "type": "number", "question": "Age", "key": "name" }
                ]
            }],
            "logic": {
                "rules": [
                    { "id": "r1", "conditions": [], "actions": [] },
                    {
                        "id": "r2",
                        "conditions": [{ "id": "c1", "field": "gone", "operator": "equals", "value": "x" }],
                        "actions": [{ "id": "a1", "type": "show", "target": "q2" }]
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_default_registry_reports_sorted_by_level() {
        let diagnostics = lint_form(&broken_form(), LintOptions::default());

        let rules: Vec<&str> = diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["duplicate-key", "dangling-reference", "empty-rule"]);
        assert!(has_errors(&diagnostics));
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let options = LintOptions {
            registry: None,
            disabled: vec!["duplicate-key".into(), "empty-rule".into()],
        };
        let diagnostics = lint_form(&broken_form(), options);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);
        assert!(!has_errors(&diagnostics));
    }

    #[test]
    fn test_clean_form_has_no_diagnostics() {
        let form = Form::new("f1", "Empty");
        assert!(lint_form(&form, LintOptions::default()).is_empty());
    }
}
