mod conflicting_visibility;
mod dangling_reference;
mod duplicate_block_id;
mod duplicate_key;
mod duplicate_rule_id;
mod empty_rule;
mod jump_without_destination;
mod non_numeric_comparison;

pub use conflicting_visibility::ConflictingVisibilityRule;
pub use dangling_reference::DanglingReferenceRule;
pub use duplicate_block_id::DuplicateBlockIdRule;
pub use duplicate_key::DuplicateKeyRule;
pub use duplicate_rule_id::DuplicateRuleIdRule;
pub use empty_rule::EmptyRuleRule;
pub use jump_without_destination::JumpWithoutDestinationRule;
pub use non_numeric_comparison::NonNumericComparisonRule;

use crate::diagnostic::Diagnostic;
use blockform_model::Form;

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check the whole form
    fn check_form(&self, form: &Form) -> Vec<Diagnostic>;
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DanglingReferenceRule),
                Box::new(JumpWithoutDestinationRule),
                Box::new(DuplicateBlockIdRule),
                Box::new(DuplicateKeyRule),
                Box::new(DuplicateRuleIdRule),
                Box::new(EmptyRuleRule),
                Box::new(ConflictingVisibilityRule),
                Box::new(NonNumericComparisonRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_rule_names_are_unique() {
        let registry = RuleRegistry::new();
        let names: HashSet<_> = registry.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), 8);
        assert!(RuleRegistry::empty().rules().is_empty());
    }
}
