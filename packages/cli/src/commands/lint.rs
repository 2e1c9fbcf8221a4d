use crate::commands::read_form;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use blockform_linter::{lint_form, DiagnosticLevel};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Form .json file or directory to lint
    pub input: PathBuf,

    /// Show all diagnostics including info level
    #[arg(long)]
    pub all: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Default)]
struct Totals {
    diagnostics: usize,
    errors: usize,
    warnings: usize,
}

pub fn lint(args: LintArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    println!("🔍 {} Blockform Linter", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        let files = find_form_files(&args.input);
        println!("   Found {} form files", files.len());
        println!();
        files
    } else {
        return Err(anyhow::anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    };

    let mut totals = Totals::default();
    for file in &files {
        lint_file(file, &config, &args, &mut totals)?;
    }

    println!();
    println!(
        "✨ {} Linting complete!",
        if totals.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", files.len());
    println!("   Total diagnostics: {}", totals.diagnostics);

    if totals.errors > 0 {
        println!("   {} {}", "Errors:".red(), totals.errors);
    }
    if totals.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), totals.warnings);
    }

    if totals.errors == 0 && totals.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }

    if totals.errors > 0 {
        anyhow::bail!("{} lint error(s)", totals.errors);
    }
    if config.lint.deny_warnings && totals.warnings > 0 {
        anyhow::bail!("{} lint warning(s) with denyWarnings set", totals.warnings);
    }

    Ok(())
}

fn lint_file(file_path: &Path, config: &Config, args: &LintArgs, totals: &mut Totals) -> Result<()> {
    let form = match read_form(file_path) {
        Ok(form) => form,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red(), err);
            totals.errors += 1;
            return Ok(());
        }
    };

    let diagnostics = lint_form(&form, config.lint_options());
    tracing::debug!(file = %file_path.display(), count = diagnostics.len(), "Linted form");

    totals.diagnostics += diagnostics.len();
    totals.errors += diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Error)
        .count();
    totals.warnings += diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Warning)
        .count();

    if diagnostics.is_empty() {
        println!("{} {}", "✓".green(), file_path.display());
        return Ok(());
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        return Ok(());
    }

    println!("{}", file_path.display());
    for diagnostic in &diagnostics {
        if !args.all && diagnostic.level == DiagnosticLevel::Info {
            continue;
        }

        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };
        println!("  {} [{}] {}", level_str, diagnostic.rule, diagnostic.message);
        println!("    {} {}", "at".dimmed(), diagnostic.location.to_string().dimmed());

        if let Some(suggestion) = &diagnostic.suggestion {
            println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
        }
    }
    println!();

    Ok(())
}

fn find_form_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path.extension().map(|e| e == "json").unwrap_or(false)
                && path.file_name().map(|n| n != DEFAULT_CONFIG_NAME).unwrap_or(false)
        })
        .collect()
}
