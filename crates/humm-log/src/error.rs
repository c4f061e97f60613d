use humm_types::ContentHash;

/// Errors from replicated log operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// A record this one depends on has not been observed by this peer yet.
    #[error("record {record:?} depends on missing record {dependency:?}")]
    MissingDependency {
        record: ContentHash,
        dependency: ContentHash,
    },

    /// The record's signature does not verify against its author.
    #[error("invalid signature on record {0:?}")]
    InvalidSignature(ContentHash),

    /// The declared entry hash does not match the payload.
    #[error("entry hash mismatch in record {record:?}: declared {declared}, computed {computed}")]
    HashMismatch {
        record: ContentHash,
        declared: String,
        computed: String,
    },

    /// The record is structurally valid but breaks a log invariant.
    #[error("invalid record {record:?}: {reason}")]
    InvalidRecord { record: ContentHash, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("log lock poisoned")]
    LockPoisoned,
}

impl LogError {
    /// Returns `true` if retrying after more records arrive may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::MissingDependency { .. })
    }
}

impl From<humm_crypto::HasherError> for LogError {
    fn from(e: humm_crypto::HasherError) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for log operations.
pub type LogResult<T> = Result<T, LogError>;
