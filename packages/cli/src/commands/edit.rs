use crate::config::Config;
use anyhow::{Context, Result};
use blockform_editor::{DragSource, DropTarget, EditSession, FormDocument, Mutation};
use blockform_model::{BlockPatch, BlockType};
use clap::Args;
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Form .json file to edit
    pub form: PathBuf,

    /// JSON array of edit steps to replay
    #[arg(short, long)]
    pub script: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input form
    #[arg(long)]
    pub in_place: bool,
}

/// One scripted editor call
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    AddBlock {
        page_id: String,
        block_type: BlockType,
        index: Option<usize>,
    },
    UpdateBlock {
        block_id: String,
        patch: BlockPatch,
    },
    DeleteBlock {
        block_id: String,
    },
    DuplicateBlock {
        block_id: String,
    },
    MoveBlock {
        block_id: String,
        page_id: String,
        index: usize,
    },
    AddPage {
        title: String,
    },
    SelectBlock {
        block_id: String,
    },
    SelectPage {
        page_id: String,
    },
    /// Drop `active` onto `over`; a missing `over` cancels
    Drag {
        active: DragSource,
        over: Option<DropTarget>,
    },
    Undo,
    Redo,
    BeginBatch {
        description: String,
    },
    EndBatch,
    /// Any raw mutation
    Mutation {
        mutation: Mutation,
    },
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let document = FormDocument::load(&args.form)
        .with_context(|| format!("Failed to load {}", args.form.display()))?;
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let steps: Vec<EditStep> =
        serde_json::from_str(&script).context("Edit script must be a JSON array of steps")?;

    let mut session = EditSession::from_document(document, config.editor_options());
    let changed = run_steps(&mut session, steps);

    eprintln!(
        "✏️  {} {} step(s) changed the form, version {}",
        "Applied".green().bold(),
        changed,
        session.version()
    );

    if args.in_place {
        session.save()?;
        eprintln!("   Saved {}", args.form.display());
    } else {
        let json = session.document().to_json()?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, json)?;
                eprintln!("   Wrote {}", path.display());
            }
            None => println!("{}", json),
        }
    }

    Ok(())
}

/// Replay steps; returns how many of them changed the form
pub fn run_steps(session: &mut EditSession, steps: Vec<EditStep>) -> usize {
    let mut changed = 0;

    for (index, step) in steps.into_iter().enumerate() {
        tracing::debug!(index, ?step, "Replaying step");
        if run_step(session, step) {
            changed += 1;
        }
    }

    session.end_batch();
    changed
}

fn run_step(session: &mut EditSession, step: EditStep) -> bool {
    match step {
        EditStep::AddBlock {
            page_id,
            block_type,
            index,
        } => session.add_block_of_type(block_type, &page_id, index).is_some(),
        EditStep::UpdateBlock { block_id, patch } => session.update_block(&block_id, patch),
        EditStep::DeleteBlock { block_id } => session.delete_block(&block_id),
        EditStep::DuplicateBlock { block_id } => session.duplicate_block(&block_id).is_some(),
        EditStep::MoveBlock {
            block_id,
            page_id,
            index,
        } => session.move_block(&block_id, &page_id, index),
        EditStep::AddPage { title } => {
            session.add_page(&title);
            true
        }
        EditStep::SelectBlock { block_id } => {
            session.select_block(&block_id);
            false
        }
        EditStep::SelectPage { page_id } => {
            session.select_page(&page_id);
            false
        }
        EditStep::Drag { active, over } => {
            session.begin_drag(active);
            session.drag_over(over);
            session.end_drag()
        }
        EditStep::Undo => session.undo(),
        EditStep::Redo => session.redo(),
        EditStep::BeginBatch { description } => {
            session.begin_batch(&description);
            false
        }
        EditStep::EndBatch => session.end_batch(),
        EditStep::Mutation { mutation } => session.apply(mutation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockform_model::Form;
    use serde_json::json;

    #[test]
    fn test_replay_script() {
        let mut form = Form::new("f1", "Script");
        form.pages[0].id = "p1".into();
        let mut session = EditSession::new(form);

        let steps: Vec<EditStep> = serde_json::from_value(json!([
            { "op": "add_block", "page_id": "p1", "block_type": "short_text" },
            { "op": "add_block", "page_id": "p1", "block_type": "email", "index": 0 },
            { "op": "select_page", "page_id": "p1" },
            { "op": "undo" },
            { "op": "redo" },
            {
                "op": "drag",
                "active": { "source": "library", "blockType": "rating" },
                "over": { "type": "dropzone", "pageId": "p1", "index": 2 }
            },
            { "op": "drag", "active": { "source": "library", "blockType": "rating" }, "over": null },
            { "op": "mutation", "mutation": { "rename_page": { "page_id": "p1", "title": "Intro" } } }
        ]))
        .unwrap();

        let changed = run_steps(&mut session, steps);

        assert_eq!(changed, 6);
        let types: Vec<_> = session.form().pages[0]
            .blocks
            .iter()
            .map(|b| b.block_type.clone())
            .collect();
        assert_eq!(types, vec![BlockType::Email, BlockType::ShortText, BlockType::Rating]);
        assert_eq!(session.form().pages[0].title, "Intro");
    }

    #[test]
    fn test_unknown_ids_change_nothing() {
        let mut session = EditSession::new(Form::new("f1", "Script"));
        let steps: Vec<EditStep> = serde_json::from_value(json!([
            { "op": "delete_block", "block_id": "nope" },
            { "op": "move_block", "block_id": "nope", "page_id": "nope", "index": 0 },
            { "op": "undo" }
        ]))
        .unwrap();

        assert_eq!(run_steps(&mut session, steps), 0);
        assert!(!session.is_dirty());
    }
}
