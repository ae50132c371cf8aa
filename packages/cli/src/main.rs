mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, init, normalize, tree, CheckArgs, InitArgs, NormalizeArgs, TreeArgs};
use tracing::Level;

/// Pagecraft CLI - inspect and repair page layout documents
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log engine events (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and a starter document
    Init(InitArgs),

    /// Bring every tree of a document into canonical form
    Normalize(NormalizeArgs),

    /// Report structural problems without changing anything
    Check(CheckArgs),

    /// Print one tree of a document
    Tree(TreeArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd: PathBuf = std::env::current_dir()?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Normalize(args) => normalize(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
