use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use humm_crypto::ContentHasher;
use humm_types::ContentHash;
use tracing::debug;

use crate::action::{Op, Record, SignedAction};
use crate::error::{LogError, LogResult};
use crate::traits::ReplicatedLog;

/// In-memory replicated log for tests and embedding.
pub struct InMemoryLog {
    inner: RwLock<LogState>,
}

#[derive(Default)]
struct LogState {
    records: HashMap<ContentHash, Record>,
    order: Vec<ContentHash>,
    successors: HashMap<ContentHash, Vec<ContentHash>>,
    tombstones: HashMap<ContentHash, Vec<ContentHash>>,
    links: HashMap<ContentHash, Vec<ContentHash>>,
    unlinked: HashSet<ContentHash>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LogState::default()),
        }
    }
}

impl Default for InMemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl LogState {
    fn require(&self, record: ContentHash, dependency: &ContentHash) -> LogResult<&Record> {
        self.records
            .get(dependency)
            .ok_or(LogError::MissingDependency {
                record,
                dependency: *dependency,
            })
    }

    fn validate(&self, hash: ContentHash, signed: &SignedAction) -> LogResult<()> {
        let invalid = |reason: String| LogError::InvalidRecord {
            record: hash,
            reason,
        };

        match &signed.action.op {
            Op::Commit(commit) => {
                let computed = ContentHasher::ENTRY.hash(&commit.payload);
                if computed != commit.entry_hash {
                    return Err(LogError::HashMismatch {
                        record: hash,
                        declared: commit.entry_hash.to_hex(),
                        computed: computed.to_hex(),
                    });
                }
                match (&commit.previous, &commit.original) {
                    (None, None) => {
                        if commit.seq != 0 {
                            return Err(invalid(format!("root commit has seq {}", commit.seq)));
                        }
                    }
                    (Some(previous), Some(original)) => {
                        let parent = self.require(hash, previous)?;
                        let parent_commit = parent.as_commit().ok_or_else(|| {
                            invalid(format!("previous {previous} is not a commit"))
                        })?;
                        if commit.seq != parent_commit.seq + 1 {
                            return Err(invalid(format!(
                                "expected seq {}, found {}",
                                parent_commit.seq + 1,
                                commit.seq
                            )));
                        }
                        if parent.chain_root() != Some(*original) {
                            return Err(invalid(format!(
                                "original {original} is not the root of {previous}"
                            )));
                        }
                    }
                    _ => {
                        return Err(invalid(
                            "previous and original must both be set or both be absent".into(),
                        ))
                    }
                }
            }
            Op::Tombstone(t) => {
                if self.require(hash, &t.target)?.as_commit().is_none() {
                    return Err(invalid(format!("tombstone target {} is not a commit", t.target)));
                }
            }
            Op::Link(l) => {
                self.require(hash, &l.target)?;
            }
            Op::Unlink(u) => {
                if self.require(hash, &u.link)?.as_link().is_none() {
                    return Err(invalid(format!("unlink target {} is not a link", u.link)));
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, record: Record) {
        let hash = record.hash;
        match record.op() {
            Op::Commit(c) => {
                if let Some(prev) = c.previous {
                    self.successors.entry(prev).or_default().push(hash);
                }
            }
            Op::Tombstone(t) => self.tombstones.entry(t.target).or_default().push(hash),
            Op::Link(l) => self.links.entry(l.base).or_default().push(hash),
            Op::Unlink(u) => {
                self.unlinked.insert(u.link);
            }
        }
        self.order.push(hash);
        self.records.insert(hash, record);
    }
}

impl ReplicatedLog for InMemoryLog {
    fn commit(&self, action: SignedAction) -> LogResult<ContentHash> {
        let hash = action.hash()?;
        action.verify()?;

        let mut state = self.inner.write().map_err(|_| LogError::LockPoisoned)?;
        if state.records.contains_key(&hash) {
            return Ok(hash);
        }
        state.validate(hash, &action)?;

        debug!(
            hash = %hash.short_hex(),
            kind = action.action.op.kind(),
            author = %action.action.author.short_id(),
            "record committed"
        );
        state.insert(Record {
            hash,
            signed: action,
        });
        Ok(hash)
    }

    fn resolve(&self, hash: &ContentHash) -> LogResult<Option<Record>> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.records.get(hash).cloned())
    }

    fn successors(&self, hash: &ContentHash) -> LogResult<Vec<ContentHash>> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.successors.get(hash).cloned().unwrap_or_default())
    }

    fn tombstones(&self, hash: &ContentHash) -> LogResult<Vec<ContentHash>> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.tombstones.get(hash).cloned().unwrap_or_default())
    }

    fn links(&self, base: &ContentHash) -> LogResult<Vec<Record>> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state
            .links
            .get(base)
            .into_iter()
            .flatten()
            .filter(|h| !state.unlinked.contains(*h))
            .filter_map(|h| state.records.get(h).cloned())
            .collect())
    }

    fn hashes(&self) -> LogResult<Vec<ContentHash>> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.order.clone())
    }

    fn len(&self) -> LogResult<usize> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.order.len())
    }

    fn contains(&self, hash: &ContentHash) -> LogResult<bool> {
        let state = self.inner.read().map_err(|_| LogError::LockPoisoned)?;
        Ok(state.records.contains_key(hash))
    }
}
