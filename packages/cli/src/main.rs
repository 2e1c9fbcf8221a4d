mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{edit, evaluate, init, lint, EditArgs, EvaluateArgs, InitArgs, LintArgs};

/// Blockform CLI - form documents, logic and lint from the command line
#[derive(Parser, Debug)]
#[command(name = "blockform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create blockform.config.json and an example form
    Init(InitArgs),

    /// Check forms for broken logic and duplicate keys
    Lint(LintArgs),

    /// Run a form's logic against a set of answers
    Evaluate(EvaluateArgs),

    /// Replay a script of editor operations on a form
    Edit(EditArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Lint(args) => lint(args, &cwd),
        Command::Evaluate(args) => evaluate(args, &cwd),
        Command::Edit(args) => edit(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
