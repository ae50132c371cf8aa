use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_model::{walk_node, walk_tree, Node, PageDocument, Path as NodePath, Viewport, Visitor};

use super::resolve_input;

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Page document (JSON)
    pub input: PathBuf,

    /// Page route
    #[arg(short, long, default_value = "/")]
    pub route: String,

    /// Viewport (desktop, tablet, mobile)
    #[arg(short, long, default_value = "desktop")]
    pub viewport: String,
}

/// Renders one line per node, indented by depth
#[derive(Default)]
struct Outline {
    lines: Vec<String>,
}

impl Visitor for Outline {
    fn visit_node(&mut self, node: &Node, path: &NodePath) {
        let indent = "  ".repeat(path.len().saturating_sub(1));
        let marker = if node.container { "▸" } else { "·" };
        self.lines.push(format!(
            "{}{} {} {} {}",
            indent,
            marker,
            node.display_name.bold(),
            format!("({})", node.kind).dimmed(),
            node.id.bright_black()
        ));
        walk_node(self, node, path);
    }
}

pub fn tree(args: TreeArgs, cwd: &Path) -> Result<()> {
    let viewport: Viewport = args
        .viewport
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let path = resolve_input(cwd, &args.input);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = PageDocument::from_json(&source)?;
    let tree = document.tree(&args.route, viewport)?;

    println!(
        "{} {} [{}] {} nodes",
        "📄".bright_blue(),
        args.route.bright_white(),
        viewport,
        tree.node_count()
    );

    let mut outline = Outline::default();
    walk_tree(&mut outline, tree);
    for line in outline.lines {
        println!("{}", line);
    }

    Ok(())
}
