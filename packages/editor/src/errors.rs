//! Error types for the editor

use thiserror::Error;

use crate::mutations::MutationError;
use crate::payload::PayloadError;
use pagecraft_model::ModelError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mutation rejected: {0}")]
    Mutation(#[from] MutationError),

    #[error("Drag payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nothing is selected")]
    NothingSelected,

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("Document is not file-backed")]
    NotFileBacked,
}
