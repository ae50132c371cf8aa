use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::Document;

use super::{load_project, resolve_input};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Page document (JSON)
    pub input: PathBuf,

    /// Write the normalized document back to disk
    #[arg(short, long)]
    pub write: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &Path) -> Result<()> {
    let (config, registry) = load_project(cwd)?;
    let path = resolve_input(cwd, &args.input);

    let mut document = Document::load(path.clone(), &registry, &config)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if !document.is_dirty() {
        println!("{} {} is already canonical", "✓".green(), args.input.display());
        return Ok(());
    }

    if args.write {
        document.save()?;
        println!("{} Normalized {}", "✓".green(), args.input.display());
    } else {
        println!(
            "{} {} needs normalizing (run with {} to fix)",
            "⚠️".yellow(),
            args.input.display(),
            "--write".bright_white()
        );
    }

    Ok(())
}
