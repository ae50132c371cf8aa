use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown component kind: {0}")]
    UnknownKind(String),

    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
