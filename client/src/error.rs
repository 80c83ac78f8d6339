use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("storage service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("storage service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid storage service URI: {0}")]
    InvalidUri(String),
    #[error("invalid file id '{0}'")]
    InvalidFileId(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session error: {0}")]
    Session(String),
    #[error("upload batch contains no files")]
    EmptyBatch,
    #[error(transparent)]
    UnknownCategory(#[from] kernel::UnknownCategory),
}

impl ClientError {
    /// HTTP status the service rejected the call with, if it got that far.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
