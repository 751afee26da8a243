use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("backend unavailable")]
    Unavailable,
    #[error("http error: {0}")]
    Http(String),
    #[error("malformed reply: {0}")]
    Malformed(String),
    #[error("other: {0}")]
    Other(String),
}

/// Failure to produce a change set. The pipeline never summarizes past one of these.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("The repository is bare and has no working tree.")]
    BareRepository,
    #[error("git error: {0}")]
    Git(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed change set: {0}")]
    Malformed(String),
    #[error("{0}")]
    Reported(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("git error: {0}")]
    Git(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
