use humm_types::ContentHash;

/// Coarse classification of a [`ContentError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown hash, or a hash of a deleted chain.
    NotFound,
    /// The version being updated is no longer the head.
    Conflict,
    /// The input failed validation.
    Invalid,
    /// Storage, encoding, or index failure.
    Internal,
}

/// Errors produced by lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content not found: {0}")]
    NotFound(ContentHash),

    #[error("update conflict: {previous} is not the head (head is {head})")]
    Conflict {
        previous: ContentHash,
        head: ContentHash,
    },

    #[error("invalid content: {0}")]
    Invalid(String),

    #[error("chain rooted at {root} exceeds {limit} versions")]
    ChainTooLong { root: ContentHash, limit: usize },

    #[error("corrupt entry {hash}: {reason}")]
    Corrupt { hash: ContentHash, reason: String },

    #[error("log error: {0}")]
    Log(#[from] humm_log::LogError),

    #[error("index error: {0}")]
    Index(#[from] humm_index::IndexError),
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Invalid(_) => ErrorKind::Invalid,
            _ => ErrorKind::Internal,
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
