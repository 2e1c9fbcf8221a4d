use crate::commands::read_form;
use crate::config::Config;
use anyhow::{Context, Result};
use blockform_logic::{Answers, LogicEngine};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Form .json file
    pub form: PathBuf,

    /// Answers as a JSON object keyed by block id
    #[arg(short, long, conflicts_with = "answers_file")]
    pub answers: Option<String>,

    /// File containing the answers object
    #[arg(long)]
    pub answers_file: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn evaluate(args: EvaluateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let form = read_form(&args.form)?;
    let answers = read_answers(&args)?;

    let engine = LogicEngine::with_options(&form, config.evaluation_options());
    let navigator = engine.navigate(&answers);
    let decisions = navigator.decisions();
    let path = navigator.path();

    if args.format == "json" {
        let output = json!({
            "decisions": decisions,
            "path": path,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("📋 {} {}", "Evaluating".green().bold(), form.title);
    println!();

    for page in &form.pages {
        println!("{}", page.title.bold());
        for block in &page.blocks {
            let marker = if !decisions.is_visible(&block.id) {
                "hidden".red()
            } else if decisions.is_skipped(&block.id) {
                "skipped".yellow()
            } else {
                "shown".green()
            };
            print!("  {:<8} {} {}", marker, block.id, block.question.dimmed());
            if let Some(destination) = decisions.jump_target(&block.id) {
                print!(" {} {}", "→".cyan(), destination);
            }
            println!();
        }
    }

    println!();
    println!("{} {}", "Path:".bold(), path.join(" → "));

    Ok(())
}

fn read_answers(args: &EvaluateArgs) -> Result<Answers> {
    let source = match (&args.answers, &args.answers_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => return Ok(Answers::new()),
    };

    serde_json::from_str(&source).context("Answers must be a JSON object keyed by block id")
}
