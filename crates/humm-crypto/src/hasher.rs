use humm_types::ContentHash;

/// Domain-separated BLAKE3 content addressor.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so an action and an index anchor built from identical bytes
/// never share an address.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for signed log actions (the address of every record).
    pub const ACTION: Self = Self {
        domain: "humm-action-v1",
    };
    /// Hasher for content entries (header + bytes), independent of authorship.
    pub const ENTRY: Self = Self {
        domain: "humm-entry-v1",
    };
    /// Hasher for index anchors (the base a link hangs off).
    pub const ANCHOR: Self = Self {
        domain: "humm-anchor-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentHash::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ContentHash, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected hash.
    pub fn verify(&self, data: &[u8], expected: &ContentHash) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
