//! Repository error types.

/// Errors raised by repository lookups, searches and writes.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("invalid repository path: '{0}'")]
    InvalidPath(String),
    #[error("no node at {0}")]
    NotFound(String),
    #[error("the repository root cannot be deleted")]
    RootDeletion,
    #[error("invalid value for property '{property}' at {path}")]
    InvalidValue { path: String, property: String },
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// Errors raised while decoding a repository document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document version mismatch: expected {expected}, found {found}")]
    Version { expected: String, found: String },
    #[error("unsupported value for property '{property}' at {path}")]
    UnsupportedValue { path: String, property: String },
    #[error("invalid node name '{name}' below {parent}")]
    InvalidName { parent: String, name: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}
