mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel, Location};
pub use linter::{has_errors, lint_form, LintOptions};
pub use rules::{
    ConflictingVisibilityRule, DanglingReferenceRule, DuplicateBlockIdRule, DuplicateKeyRule,
    DuplicateRuleIdRule, EmptyRuleRule, JumpWithoutDestinationRule, LintRule,
    NonNumericComparisonRule, RuleRegistry,
};
