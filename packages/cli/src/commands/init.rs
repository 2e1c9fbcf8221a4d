use crate::config::{Config, LintConfig, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use blockform_logic::BaseVisibility;
use blockform_model::{ActionKind, Block, BlockType, Form, LogicAction, LogicCondition, LogicRule, Operator};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Start blocks hidden until a rule shows them
    #[arg(long)]
    pub hidden_until_shown: bool,

    /// Fail `lint` on warnings
    #[arg(long)]
    pub deny_warnings: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Blockform project...".bright_blue().bold());

    // Create example form
    let example_file = PathBuf::from(cwd).join("example.form.json");
    if !example_file.exists() {
        let example = serde_json::to_string_pretty(&example_form())?;
        fs::write(&example_file, example)?;
        println!("  {} Created example.form.json", "✓".green());
    }

    let config = Config {
        base_visibility: if args.hidden_until_shown {
            BaseVisibility::HiddenUntilShown
        } else {
            BaseVisibility::Visible
        },
        lint: LintConfig {
            disabled: vec![],
            deny_warnings: args.deny_warnings,
        },
        ..Config::default()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: blockform lint example.form.json");
    println!("  2. Run: blockform evaluate example.form.json --answers '{{\"likes\": \"yes\"}}'");

    Ok(())
}

fn example_form() -> Form {
    let mut form = Form::new("example", "Feedback");
    form.pages[0].blocks = vec![
        Block::from_template(BlockType::YesNo, "likes")
            .with_question("Do you like the product?")
            .with_key("likes"),
        Block::from_template(BlockType::LongText, "why")
            .with_question("What do you like most?")
            .with_key("why"),
        Block::from_template(BlockType::Email, "email")
            .with_question("Your email")
            .with_key("email"),
    ];
    form.logic.rules.push(LogicRule {
        id: "show-why".into(),
        conditions: vec![LogicCondition::new("c1", "likes", Operator::Equals, "yes")],
        actions: vec![LogicAction::new("a1", ActionKind::Show, "why")],
    });
    form.logic.rules.push(LogicRule {
        id: "skip-why".into(),
        conditions: vec![LogicCondition::new("c2", "likes", Operator::Equals, "no")],
        actions: vec![LogicAction::jump("a2", "likes", "email")],
    });
    form
}
