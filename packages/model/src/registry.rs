//! # Component-Kind Registry
//!
//! Maps a kind identifier to a descriptor: container/resizable flags,
//! default property values and the style-attribute schema. Only consulted
//! when a node is created; rendering behavior is out of scope here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ModelError, ModelResult};
use crate::id_generator::new_id;
use crate::node::{Node, Properties, StyleValue};

/// Kind of the single canonical top-level node
pub const ROOT_KIND: &str = "root";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAttribute {
    pub name: String,
    pub default: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<String>,
}

impl StyleAttribute {
    pub fn new(name: &str, default: Value, default_unit: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            default,
            default_unit: default_unit.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub kind: String,
    pub display_name: String,
    #[serde(default)]
    pub container: bool,
    #[serde(default)]
    pub resizable: bool,
    #[serde(default)]
    pub default_properties: Properties,
    #[serde(default)]
    pub style_schema: Vec<StyleAttribute>,
}

impl ComponentDescriptor {
    pub fn new(kind: &str, display_name: &str) -> Self {
        Self {
            kind: kind.to_string(),
            display_name: display_name.to_string(),
            container: false,
            resizable: false,
            default_properties: Properties::new(),
            style_schema: Vec::new(),
        }
    }

    fn container(mut self) -> Self {
        self.container = true;
        self
    }

    fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    fn property(mut self, name: &str, value: Value) -> Self {
        self.default_properties.insert(name.to_string(), value);
        self
    }

    fn style(mut self, name: &str, default: Value, unit: Option<&str>) -> Self {
        self.style_schema.push(StyleAttribute::new(name, default, unit));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    descriptors: BTreeMap<String, ComponentDescriptor>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in palette
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(
            ComponentDescriptor::new(ROOT_KIND, "Page")
                .container()
                .style("display", json!("flex"), None)
                .style("flexDirection", json!("column"), None)
                .style("padding", json!(0), Some("px")),
        );
        registry.register(
            ComponentDescriptor::new("section", "Section")
                .container()
                .resizable()
                .style("flexDirection", json!("column"), None)
                .style("padding", json!(16), Some("px"))
                .style("gap", json!(8), Some("px")),
        );
        registry.register(
            ComponentDescriptor::new("row", "Row")
                .container()
                .resizable()
                .style("flexDirection", json!("row"), None)
                .style("gap", json!(8), Some("px")),
        );
        registry.register(
            ComponentDescriptor::new("column", "Column")
                .container()
                .resizable()
                .style("flexDirection", json!("column"), None)
                .style("gap", json!(8), Some("px")),
        );
        registry.register(
            ComponentDescriptor::new("text", "Text")
                .property("content", json!("Text"))
                .style("fontSize", json!(16), Some("px"))
                .style("color", json!("#000000"), None),
        );
        registry.register(
            ComponentDescriptor::new("image", "Image")
                .resizable()
                .property("src", json!(""))
                .property("alt", json!(""))
                .style("width", json!(100), Some("%"))
                .style("height", json!("auto"), None),
        );
        registry.register(
            ComponentDescriptor::new("button", "Button")
                .property("label", json!("Button"))
                .property("href", json!(""))
                .style("padding", json!(8), Some("px"))
                .style("borderRadius", json!(4), Some("px")),
        );

        registry
    }

    /// Parse a JSON array of descriptors
    pub fn from_json(source: &str) -> ModelResult<Self> {
        let descriptors: Vec<ComponentDescriptor> = serde_json::from_str(source)?;
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        Ok(registry)
    }

    /// Add or replace a descriptor
    pub fn register(&mut self, descriptor: ComponentDescriptor) {
        self.descriptors.insert(descriptor.kind.clone(), descriptor);
    }

    /// Overlay `other` onto this registry (other wins on conflicts)
    pub fn merge(&mut self, other: ComponentRegistry) {
        self.descriptors.extend(other.descriptors);
    }

    pub fn get(&self, kind: &str) -> Option<&ComponentDescriptor> {
        self.descriptors.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.descriptors.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    /// Build a fresh node of `kind` populated with the descriptor defaults
    pub fn create_node(&self, kind: &str) -> ModelResult<Node> {
        let descriptor = self
            .get(kind)
            .ok_or_else(|| ModelError::UnknownKind(kind.to_string()))?;

        let mut node = Node::new(new_id(), kind).with_display_name(&descriptor.display_name);
        node.container = descriptor.container;
        node.resizable = descriptor.resizable;
        node.properties = descriptor.default_properties.clone();
        node.style = descriptor
            .style_schema
            .iter()
            .map(|attr| {
                (
                    attr.name.clone(),
                    StyleValue {
                        value: attr.default.clone(),
                        unit: attr.default_unit.clone(),
                    },
                )
            })
            .collect();

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = ComponentRegistry::builtin();
        assert!(registry.get(ROOT_KIND).unwrap().container);
        assert!(registry.get("section").unwrap().container);
        assert!(!registry.get("text").unwrap().container);
        assert!(registry.get("image").unwrap().resizable);
    }

    #[test]
    fn test_create_node_applies_defaults() {
        let registry = ComponentRegistry::builtin();
        let node = registry.create_node("text").unwrap();

        assert_eq!(node.kind, "text");
        assert_eq!(node.display_name, "Text");
        assert!(!node.container);
        assert_eq!(node.properties["content"], json!("Text"));
        assert_eq!(node.style["fontSize"], StyleValue::with_unit(16, "px"));
        assert!(node.children.is_empty());

        let other = registry.create_node("text").unwrap();
        assert_ne!(node.id, other.id);
    }

    #[test]
    fn test_create_unknown_kind() {
        let registry = ComponentRegistry::builtin();
        assert!(matches!(
            registry.create_node("carousel"),
            Err(ModelError::UnknownKind(kind)) if kind == "carousel"
        ));
    }

    #[test]
    fn test_registry_from_json_and_merge() {
        let json = r#"[
            {
                "kind": "card",
                "displayName": "Card",
                "container": true,
                "defaultProperties": { "elevation": 2 },
                "styleSchema": [
                    { "name": "radius", "default": 8, "defaultUnit": "px" }
                ]
            },
            { "kind": "text", "displayName": "Paragraph" }
        ]"#;

        let extra = ComponentRegistry::from_json(json).unwrap();
        let mut registry = ComponentRegistry::builtin();
        registry.merge(extra);

        let card = registry.create_node("card").unwrap();
        assert!(card.container);
        assert_eq!(card.style["radius"].unit.as_deref(), Some("px"));
        assert_eq!(registry.get("text").unwrap().display_name, "Paragraph");
        assert!(registry.contains(ROOT_KIND));
    }
}
