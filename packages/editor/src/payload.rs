//! # Drag Payload Protocol
//!
//! Drag gestures carry one of two payloads through the platform's data
//! transfer: an existing node (by path) or a palette entry (by kind). The
//! JSON is written under a typed MIME entry and again as plain text, since
//! some drop targets only ever see the plain-text copy.

use std::collections::BTreeMap;

use pagecraft_model::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const PAYLOAD_MIME: &str = "application/x-pagecraft-payload";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DragPayload {
    /// Moving a node already in the tree
    ExistingNode { path: Path },

    /// Creating a new node from the palette
    PaletteEntry {
        #[serde(rename = "componentKind")]
        component_kind: String,
    },
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("No drag payload in transfer")]
    Missing,

    #[error("Malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// MIME type → string data, as carried by a native drag transfer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: BTreeMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, mime: &str, data: impl Into<String>) {
        self.entries.insert(mime.to_string(), data.into());
    }

    pub fn get_data(&self, mime: &str) -> Option<&str> {
        self.entries.get(mime).map(String::as_str)
    }

    /// Drop one entry (some platforms lose custom types across subtrees)
    pub fn remove_data(&mut self, mime: &str) {
        self.entries.remove(mime);
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Serialize `payload` into both the typed and the plain-text entry
pub fn write_payload(transfer: &mut DataTransfer, payload: &DragPayload) -> Result<(), PayloadError> {
    let json = serde_json::to_string(payload)?;
    transfer.set_data(PAYLOAD_MIME, json.clone());
    transfer.set_data(TEXT_MIME, json);
    Ok(())
}

/// Read the payload, falling back to the plain-text copy when the typed
/// entry is missing or unreadable
pub fn read_payload(transfer: &DataTransfer) -> Result<DragPayload, PayloadError> {
    if let Some(data) = transfer.get_data(PAYLOAD_MIME) {
        match serde_json::from_str(data) {
            Ok(payload) => return Ok(payload),
            Err(e) => warn!(error = %e, "Typed drag payload unreadable, trying plain text"),
        }
    }

    let text = transfer.get_data(TEXT_MIME).ok_or(PayloadError::Missing)?;
    Ok(serde_json::from_str(text)?)
}
