use crate::diagnostic::{Diagnostic, Location};
use crate::rules::LintRule;
use blockform_model::Form;
use std::collections::HashMap;

/// Lint rule that flags field keys shared by several blocks
pub struct DuplicateKeyRule;

impl LintRule for DuplicateKeyRule {
    fn name(&self) -> &'static str {
        "duplicate-key"
    }

    fn description(&self) -> &'static str {
        "Field keys must be unique across the form"
    }

    fn check_form(&self, form: &Form) -> Vec<Diagnostic> {
        // key -> first block using it
        let mut owners: HashMap<&str, &str> = HashMap::new();
        let mut diagnostics = Vec::new();

        for page in &form.pages {
            for block in &page.blocks {
                if block.key.is_empty() {
                    continue;
                }
                match owners.get(block.key.as_str()) {
                    Some(owner) => diagnostics.push(
                        Diagnostic::error(
                            self.name(),
                            format!(
                                "Key '{}' is also used by block '{}'; their answers would overwrite each other.",
                                block.key, owner
                            ),
                            Location::block(&page.id, &block.id),
                        )
                        .with_suggestion(format!("Rename the key, e.g. '{}_1'", block.key)),
                    ),
                    None => {
                        owners.insert(&block.key, &block.id);
                    }
                }
            }
        }

        diagnostics
    }
}
