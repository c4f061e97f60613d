use humm_content::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("no content with id {id} in group {group_id}")]
    ContentIdNotFound { group_id: String, id: String },

    #[error("no node at index {0}")]
    NodeNotFound(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("content error: {0}")]
    Content(#[from] humm_content::ContentError),

    #[error("log error: {0}")]
    Log(#[from] humm_log::LogError),

    #[error("sync error: {0}")]
    Sync(#[from] humm_sync::SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Domain classification; everything outside the lifecycle is internal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Content(e) => e.kind(),
            Self::ContentIdNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
