pub mod check;
pub mod init;
pub mod normalize;
pub mod tree;

pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use normalize::{normalize, NormalizeArgs};
pub use tree::{tree, TreeArgs};

use std::path::{Path, PathBuf};

use anyhow::Context;
use pagecraft_editor::EditorConfig;
use pagecraft_model::ComponentRegistry;

/// Config and registry for the project rooted at `cwd`
pub(crate) fn load_project(cwd: &Path) -> anyhow::Result<(EditorConfig, ComponentRegistry)> {
    let config = EditorConfig::load(cwd).context("Failed to load pagecraft.config.json")?;
    let registry = config
        .load_registry(cwd)
        .context("Failed to load component registry")?;
    Ok((config, registry))
}

pub(crate) fn resolve_input(cwd: &Path, input: &Path) -> PathBuf {
    if input.is_absolute() {
        input.to_path_buf()
    } else {
        cwd.join(input)
    }
}
