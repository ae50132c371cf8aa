use std::path::{Path, PathBuf};
use std::time::Duration;

use pagecraft_model::ComponentRegistry;
use serde::{Deserialize, Serialize};

use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo levels kept per tree (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Quiet period before a dirty document is flushed
    #[serde(default = "default_autosave_debounce_ms")]
    pub autosave_debounce_ms: u64,

    /// Extra component descriptors (JSON array), relative to the config dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<String>,
}

fn default_history_limit() -> usize {
    100
}

fn default_autosave_debounce_ms() -> u64 {
    1000
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(cwd: &Path) -> Result<Self, EditorError> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn registry_file(&self, cwd: &Path) -> Option<PathBuf> {
        self.registry_path.as_ref().map(|p| cwd.join(p))
    }

    /// Built-in registry with the configured descriptors layered on top
    pub fn load_registry(&self, cwd: &Path) -> Result<ComponentRegistry, EditorError> {
        let mut registry = ComponentRegistry::builtin();
        if let Some(path) = self.registry_file(cwd) {
            let content = std::fs::read_to_string(&path)?;
            registry.merge(ComponentRegistry::from_json(&content)?);
        }
        Ok(registry)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            autosave_debounce_ms: default_autosave_debounce_ms(),
            registry_path: None,
        }
    }
}
