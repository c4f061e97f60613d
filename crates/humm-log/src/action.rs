//! Signed, content-addressed log actions.

use humm_crypto::{ContentHasher, Signature, VerifyingKey};
use humm_types::{AgentPubKey, ContentHash, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{LogError, LogResult};

/// Write a content version. `previous` is `None` for a chain root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOp {
    /// Opaque entry payload; the lifecycle layer owns its encoding.
    pub payload: Vec<u8>,
    /// `ContentHasher::ENTRY` hash of `payload`.
    pub entry_hash: ContentHash,
    /// Version this commit supersedes.
    pub previous: Option<ContentHash>,
    /// Root of the chain; `None` exactly when `previous` is `None`.
    pub original: Option<ContentHash>,
    /// Position in the chain: 0 for the root, parent + 1 otherwise.
    pub seq: u64,
}

/// Mark a content chain deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TombstoneOp {
    pub target: ContentHash,
}

/// Attach `target` to the anchor `base` under a named index family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOp {
    pub base: ContentHash,
    pub target: ContentHash,
    pub family: String,
}

/// Retract a previously committed link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlinkOp {
    pub link: ContentHash,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Commit(CommitOp),
    Tombstone(TombstoneOp),
    Link(LinkOp),
    Unlink(UnlinkOp),
}

impl Op {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Commit(_) => "commit",
            Self::Tombstone(_) => "tombstone",
            Self::Link(_) => "link",
            Self::Unlink(_) => "unlink",
        }
    }

    /// Records that must be present before this one can be applied.
    pub fn dependencies(&self) -> Vec<ContentHash> {
        match self {
            Self::Commit(c) => c.previous.iter().chain(c.original.iter()).copied().collect(),
            Self::Tombstone(t) => vec![t.target],
            Self::Link(l) => vec![l.target],
            Self::Unlink(u) => vec![u.link],
        }
    }
}

/// An action before signing: who did what, when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub author: AgentPubKey,
    pub timestamp: Timestamp,
    pub op: Op,
}

impl Action {
    /// Canonical encoding that is signed and hashed.
    pub fn canonical_bytes(&self) -> LogResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LogError::Serialization(e.to_string()))
    }

    /// Address of the record this action becomes.
    pub fn hash(&self) -> LogResult<ContentHash> {
        Ok(ContentHasher::ACTION.hash(&self.canonical_bytes()?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAction {
    pub action: Action,
    pub signature: Signature,
}

impl SignedAction {
    pub fn hash(&self) -> LogResult<ContentHash> {
        self.action.hash()
    }

    /// Check the signature against the action's author.
    pub fn verify(&self) -> LogResult<()> {
        let hash = self.hash()?;
        let key = VerifyingKey::from_agent(&self.action.author)
            .map_err(|_| LogError::InvalidSignature(hash))?;
        key.verify(&self.action.canonical_bytes()?, &self.signature)
            .map_err(|_| LogError::InvalidSignature(hash))
    }
}

/// A committed action together with its address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub hash: ContentHash,
    pub signed: SignedAction,
}

impl Record {
    pub fn author(&self) -> &AgentPubKey {
        &self.signed.action.author
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.signed.action.timestamp
    }

    pub fn op(&self) -> &Op {
        &self.signed.action.op
    }

    pub fn as_commit(&self) -> Option<&CommitOp> {
        match self.op() {
            Op::Commit(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkOp> {
        match self.op() {
            Op::Link(l) => Some(l),
            _ => None,
        }
    }

    /// Root of the chain this commit belongs to, or `None` for non-commits.
    pub fn chain_root(&self) -> Option<ContentHash> {
        self.as_commit().map(|c| c.original.unwrap_or(self.hash))
    }
}
