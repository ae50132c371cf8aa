//! # Persisted Page Document
//!
//! Route path → [`PageBucket`]. Each bucket keeps one tree per viewport class
//! plus page metadata. The editor reads and writes one tree at a time; how
//! the document is stored is up to the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::node::Tree;
use crate::normalize::{normalize, sync_flags};
use crate::registry::ComponentRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Tablet => "tablet",
            Viewport::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Viewport::Desktop),
            "tablet" => Ok(Viewport::Tablet),
            "mobile" => Ok(Viewport::Mobile),
            other => Err(format!(
                "Invalid viewport: {}. Use: desktop, tablet, or mobile",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportTrees {
    #[serde(default)]
    pub desktop: Tree,
    #[serde(default)]
    pub tablet: Tree,
    #[serde(default)]
    pub mobile: Tree,
}

impl ViewportTrees {
    pub fn get(&self, viewport: Viewport) -> &Tree {
        match viewport {
            Viewport::Desktop => &self.desktop,
            Viewport::Tablet => &self.tablet,
            Viewport::Mobile => &self.mobile,
        }
    }

    pub fn get_mut(&mut self, viewport: Viewport) -> &mut Tree {
        match viewport {
            Viewport::Desktop => &mut self.desktop,
            Viewport::Tablet => &mut self.tablet,
            Viewport::Mobile => &mut self.mobile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageBucket {
    #[serde(default)]
    pub trees: ViewportTrees,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageDocument {
    #[serde(default)]
    pub pages: BTreeMap<String, PageBucket>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add an empty page, keeping any existing bucket at `route`
    pub fn add_page(&mut self, route: impl Into<String>, metadata: PageMetadata) -> &mut PageBucket {
        self.pages.entry(route.into()).or_insert_with(|| PageBucket {
            trees: ViewportTrees::default(),
            metadata,
        })
    }

    pub fn page(&self, route: &str) -> ModelResult<&PageBucket> {
        self.pages
            .get(route)
            .ok_or_else(|| ModelError::RouteNotFound(route.to_string()))
    }

    pub fn tree(&self, route: &str, viewport: Viewport) -> ModelResult<&Tree> {
        Ok(self.page(route)?.trees.get(viewport))
    }

    /// Replace one bucket entry
    pub fn set_tree(&mut self, route: &str, viewport: Viewport, tree: Tree) -> ModelResult<()> {
        let bucket = self
            .pages
            .get_mut(route)
            .ok_or_else(|| ModelError::RouteNotFound(route.to_string()))?;
        *bucket.trees.get_mut(viewport) = tree;
        Ok(())
    }

    /// Bring every tree into canonical form with flags synced from the
    /// registry; returns how many changed
    pub fn normalize_all(&mut self, registry: &ComponentRegistry) -> usize {
        let mut changed = 0;
        for bucket in self.pages.values_mut() {
            for viewport in Viewport::ALL {
                let tree = bucket.trees.get_mut(viewport);
                let normalized = normalize(&sync_flags(tree, registry), registry);
                if normalized != *tree {
                    *tree = normalized;
                    changed += 1;
                }
            }
        }
        changed
    }
}
