use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_model::{validate, PageDocument, Viewport};

use super::resolve_input;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page document (JSON)
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let path = resolve_input(cwd, &args.input);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = PageDocument::from_json(&source)?;

    let mut reports = Vec::new();
    for (route, bucket) in &document.pages {
        for viewport in Viewport::ALL {
            for violation in validate(bucket.trees.get(viewport)) {
                reports.push((route.as_str(), viewport, violation));
            }
        }
    }

    if args.format == "json" {
        let json: Vec<_> = reports
            .iter()
            .map(|(route, viewport, violation)| {
                serde_json::json!({
                    "route": route,
                    "viewport": viewport.as_str(),
                    "message": violation.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for (route, viewport, violation) in &reports {
            println!(
                "{} {} [{}] {}",
                "✗".red(),
                route.bright_white(),
                viewport,
                violation
            );
        }
        println!();
        println!(
            "   Pages checked: {}, problems: {}",
            document.pages.len(),
            reports.len()
        );
    }

    if reports.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} structural problem(s) found",
            reports.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::{Node, PageMetadata, Tree};

    fn write(dir: &Path, document: &PageDocument) {
        std::fs::write(dir.join("site.json"), document.to_json().unwrap()).unwrap();
    }

    fn args() -> CheckArgs {
        CheckArgs {
            input: PathBuf::from("site.json"),
            format: "text".to_string(),
        }
    }

    #[test]
    fn test_check_clean_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut document = PageDocument::new();
        let trees = &mut document.add_page("/", PageMetadata::default()).trees;
        for viewport in Viewport::ALL {
            *trees.get_mut(viewport) = Tree::with_root(Node::new("root", "root").as_container());
        }
        write(dir.path(), &document);

        assert!(check(args(), dir.path()).is_ok());
    }

    #[test]
    fn test_check_reports_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut document = PageDocument::new();
        let trees = &mut document.add_page("/", PageMetadata::default()).trees;
        for viewport in Viewport::ALL {
            *trees.get_mut(viewport) = Tree::with_root(
                Node::new("root", "root")
                    .as_container()
                    .with_children([Node::new("dup", "text"), Node::new("dup", "text")]),
            );
        }
        write(dir.path(), &document);

        assert!(check(args(), dir.path()).is_err());
    }
}
