//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The underlying log rejected or failed a read or write.
    #[error("log error: {0}")]
    Log(#[from] humm_log::LogError),

    /// An index key could not be encoded into an anchor.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A linked hash could not be resolved for a reason other than absence.
    #[error("resolve error: {0}")]
    Resolve(String),
}

impl From<humm_crypto::HasherError> for IndexError {
    fn from(e: humm_crypto::HasherError) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
