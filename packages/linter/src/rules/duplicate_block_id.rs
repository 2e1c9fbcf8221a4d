use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::Form;
use std::collections::HashSet;

/// Lint rule that flags block ids used more than once. Snapshots edited
/// outside the editor can break id uniqueness.
pub struct DuplicateBlockIdRule;

impl LintRule for DuplicateBlockIdRule {
    fn name(&self) -> &'static str {
        "duplicate-block-id"
    }

    fn description(&self) -> &'static str {
        "Block ids must be unique across the form"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut diagnostics = Vec::new();

        for page in &form.pages {
            for block in &page.blocks {
                if !seen.insert(block.id.as_str()) {
                    diagnostics.push(Diagnostic::error(
                        self.name(),
                        format!(
                            "Block id '{}' is already used; edits and logic will only reach the first one.",
                            block.id
                        ),
                        Location::block(&page.id, &block.id),
                    ));
                }
            }
        }

        diagnostics
    }
}
