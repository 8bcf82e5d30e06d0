use thiserror::Error;

#[derive(Error, Debug)]
pub enum NudgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Reminder not found: {0}")]
    NotFound(String),

    #[error("'{0}' matches more than one reminder")]
    Ambiguous(String),

    #[error("{0}")]
    Validation(String),

    #[error("Permission for notifications not granted")]
    PermissionDenied,

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NudgeError>;
