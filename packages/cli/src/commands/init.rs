use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use pagecraft_model::{PageDocument, PageMetadata};

use super::load_project;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Starter document to create
    #[arg(short, long, default_value = "site.json")]
    pub document: PathBuf,

    /// Route of the first page
    #[arg(short, long, default_value = "/")]
    pub route: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagecraft project...".bright_blue().bold());

    let config_json = serde_json::to_string_pretty(&EditorConfig::default())?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let document_path = cwd.join(&args.document);
    if !document_path.exists() || args.force {
        let (_, registry) = load_project(cwd)?;
        let mut document = PageDocument::new();
        document.add_page(
            args.route.as_str(),
            PageMetadata {
                title: "Home".to_string(),
                ..PageMetadata::default()
            },
        );
        document.normalize_all(&registry);
        fs::write(&document_path, document.to_json()?)?;
        println!("  {} Created {}", "✓".green(), args.document.display());
    }

    println!();
    println!("{}", "✨ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Inspect the page: {}",
        format!("pagecraft tree {} --route {}", args.document.display(), args.route).bright_white()
    );
    println!(
        "  2. Check it: {}",
        format!("pagecraft check {}", args.document.display()).bright_white()
    );

    Ok(())
}
