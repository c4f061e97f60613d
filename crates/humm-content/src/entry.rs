use humm_index::{DynamicLink, IndexedEntry};
use humm_types::{
    AccessControlList, AgentPubKey, ContentHash, ContentHeader, PublicKeyAcl, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

/// The payload of one content version as committed to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub header: ContentHeader,
    /// Opaque encrypted bytes. Never interpreted.
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub dynamic_links: Vec<DynamicLink>,
}

impl ContentEntry {
    pub fn encode(&self) -> ContentResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ContentError::Invalid(e.to_string()))
    }

    pub fn decode(hash: ContentHash, payload: &[u8]) -> ContentResult<Self> {
        serde_json::from_slice(payload).map_err(|e| ContentError::Corrupt {
            hash,
            reason: e.to_string(),
        })
    }
}

/// Input for a new chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateInput {
    pub id: String,
    pub group_id: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub acl: AccessControlList,
    pub public_key_acl: PublicKeyAcl,
    pub revision_author_signing_key: String,
    pub dynamic_links: Vec<DynamicLink>,
}

impl CreateInput {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
        acl: AccessControlList,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            content_type: content_type.into(),
            bytes,
            acl,
            public_key_acl: PublicKeyAcl::default(),
            revision_author_signing_key: String::new(),
            dynamic_links: Vec::new(),
        }
    }

    pub fn with_public_key_acl(mut self, public_key_acl: PublicKeyAcl) -> Self {
        self.public_key_acl = public_key_acl;
        self
    }

    pub fn with_dynamic_link(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dynamic_links.push(DynamicLink::new(name, value));
        self
    }

    pub(crate) fn into_entry(self) -> ContentEntry {
        ContentEntry {
            header: ContentHeader {
                id: self.id,
                group_id: self.group_id,
                content_type: self.content_type,
                acl: self.acl,
                public_key_acl: self.public_key_acl,
                revision_author_signing_key: self.revision_author_signing_key,
            },
            bytes: self.bytes,
            dynamic_links: self.dynamic_links,
        }
    }
}

/// Input for superseding the head of a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateInput {
    /// Must be the current head.
    pub previous_hash: ContentHash,
    /// Root of the chain; derived from `previous_hash` when absent.
    pub original_hash: Option<ContentHash>,
    pub header: ContentHeader,
    pub bytes: Vec<u8>,
    /// Replacement dynamic links; `None` keeps the previous version's.
    pub dynamic_links: Option<Vec<DynamicLink>>,
}

impl UpdateInput {
    pub fn new(previous_hash: ContentHash, header: ContentHeader, bytes: Vec<u8>) -> Self {
        Self {
            previous_hash,
            original_hash: None,
            header,
            bytes,
            dynamic_links: None,
        }
    }

    pub fn with_original(mut self, original_hash: ContentHash) -> Self {
        self.original_hash = Some(original_hash);
        self
    }

    pub fn with_dynamic_links(mut self, links: Vec<DynamicLink>) -> Self {
        self.dynamic_links = Some(links);
        self
    }
}

/// The live head of a chain as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHandle {
    /// Hash of the head version.
    pub hash: ContentHash,
    /// Hash of the chain root.
    pub original_hash: ContentHash,
    pub header: ContentHeader,
    pub bytes: Vec<u8>,
    pub dynamic_links: Vec<DynamicLink>,
    /// Agent that committed the head version.
    pub author: AgentPubKey,
    /// Agent that created the chain.
    pub created_by: AgentPubKey,
    /// Commit time of the head version.
    pub timestamp: Timestamp,
    /// Commit time of the chain root.
    pub created_at: Timestamp,
}

impl IndexedEntry for EntryHandle {
    fn root(&self) -> ContentHash {
        self.original_hash
    }

    fn header(&self) -> &ContentHeader {
        &self.header
    }

    fn creator(&self) -> &AgentPubKey {
        &self.created_by
    }

    fn dynamic_links(&self) -> &[DynamicLink] {
        &self.dynamic_links
    }
}

/// Confirmation of a delete: the tombstone record's hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TombstoneHandle {
    pub hash: ContentHash,
}
