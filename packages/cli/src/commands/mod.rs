pub mod edit;
pub mod evaluate;
pub mod init;
pub mod lint;

pub use edit::{edit, EditArgs};
pub use evaluate::{evaluate, EvaluateArgs};
pub use init::{init, InitArgs};
pub use lint::{lint, LintArgs};

use anyhow::{Context, Result};
use blockform_model::Form;
use std::path::Path;

/// Read and parse a form snapshot
pub fn read_form(path: &Path) -> Result<Form> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut form: Form = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a valid form document", path.display()))?;
    form.normalize();
    Ok(form)
}
