use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote error: {0}")]
    RemoteError(String),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("batch encoding error: {0}")]
    Encoding(String),

    #[error("log error: {0}")]
    Log(#[from] humm_log::LogError),
}

impl From<bincode::Error> for SyncError {
    fn from(e: bincode::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
