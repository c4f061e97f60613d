//! Update chains as seen from one peer's log.

use std::collections::{HashSet, VecDeque};

use humm_log::{Record, ReplicatedLog};
use humm_types::{ContentHash, Timestamp};

use crate::entry::ContentEntry;
use crate::error::{ContentError, ContentResult};
use crate::validation::{describe, validate_entry};

/// One version of a chain.
#[derive(Clone, Debug)]
pub struct Version {
    pub hash: ContentHash,
    pub seq: u64,
    pub timestamp: Timestamp,
    pub previous: Option<ContentHash>,
    pub record: Record,
}

impl Version {
    fn from_record(record: Record) -> Option<Self> {
        let (seq, previous) = record.as_commit().map(|c| (c.seq, c.previous))?;
        Some(Self {
            hash: record.hash,
            seq,
            timestamp: *record.timestamp(),
            previous,
            record,
        })
    }

    /// Fork tie-break order: chain position, then commit time, then hash.
    fn rank(&self) -> (u64, Timestamp, ContentHash) {
        (self.seq, self.timestamp, self.hash)
    }

    /// Decode the version's entry. Entries that break the content rules are
    /// `Corrupt`: gossiped records skip the local write path, so every peer
    /// checks them again here.
    pub fn entry(&self) -> ContentResult<ContentEntry> {
        let commit = self.record.as_commit().ok_or_else(|| ContentError::Corrupt {
            hash: self.hash,
            reason: "not a commit".into(),
        })?;
        let entry = ContentEntry::decode(self.hash, &commit.payload)?;
        let violations = validate_entry(&entry);
        if !violations.is_empty() {
            return Err(ContentError::Corrupt {
                hash: self.hash,
                reason: describe(&violations),
            });
        }
        Ok(entry)
    }
}

/// The head of a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    /// Exactly one version has no successor.
    Unique(ContentHash),
    /// Several concurrent tips, winner first.
    Forked(Vec<ContentHash>),
}

impl Head {
    /// The version reads resolve to.
    pub fn elect(&self) -> ContentHash {
        match self {
            Self::Unique(hash) => *hash,
            Self::Forked(tips) => tips.first().copied().unwrap_or_else(ContentHash::null),
        }
    }

    pub fn is_forked(&self) -> bool {
        matches!(self, Self::Forked(_))
    }
}

/// Every version and tombstone of one chain, walked forward from the root.
#[derive(Clone, Debug)]
pub struct ChainView {
    root: ContentHash,
    versions: Vec<Version>,
    /// Indices into `versions`, winner first.
    tips: Vec<usize>,
    /// Tombstones on any version, oldest first.
    tombstones: Vec<(Timestamp, ContentHash)>,
}

impl ChainView {
    /// Walk the chain rooted at `root`. Fails with `NotFound` if `root` is
    /// not a chain root this peer holds.
    pub fn load(log: &dyn ReplicatedLog, root: ContentHash, limit: usize) -> ContentResult<Self> {
        let root_record = log.resolve(&root)?.ok_or(ContentError::NotFound(root))?;
        if root_record.chain_root() != Some(root) {
            return Err(ContentError::NotFound(root));
        }
        let root_version = Version::from_record(root_record).ok_or(ContentError::NotFound(root))?;

        let mut versions = vec![root_version];
        let mut tips = Vec::new();
        let mut tombstones = Vec::new();
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([0usize]);

        while let Some(idx) = queue.pop_front() {
            let hash = versions[idx].hash;

            for t in log.tombstones(&hash)? {
                if let Some(record) = log.resolve(&t)? {
                    tombstones.push((*record.timestamp(), t));
                }
            }

            let mut has_successor = false;
            for next in log.successors(&hash)? {
                if !visited.insert(next) {
                    continue;
                }
                let Some(version) = log.resolve(&next)?.and_then(Version::from_record) else {
                    continue;
                };
                has_successor = true;
                if versions.len() >= limit {
                    return Err(ContentError::ChainTooLong { root, limit });
                }
                versions.push(version);
                queue.push_back(versions.len() - 1);
            }
            if !has_successor {
                tips.push(idx);
            }
        }

        tips.sort_by(|a, b| versions[*b].rank().cmp(&versions[*a].rank()));
        tombstones.sort();

        Ok(Self {
            root,
            versions,
            tips,
            tombstones,
        })
    }

    pub fn root(&self) -> ContentHash {
        self.root
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.versions.iter().any(|v| &v.hash == hash)
    }

    pub fn root_version(&self) -> &Version {
        &self.versions[0]
    }

    pub fn head(&self) -> Head {
        match self.tips.as_slice() {
            [only] => Head::Unique(self.versions[*only].hash),
            tips => Head::Forked(tips.iter().map(|i| self.versions[*i].hash).collect()),
        }
    }

    /// The elected head version.
    pub fn head_version(&self) -> &Version {
        self.tips
            .first()
            .map_or(&self.versions[0], |i| &self.versions[*i])
    }

    pub fn is_tombstoned(&self) -> bool {
        !self.tombstones.is_empty()
    }

    /// The oldest tombstone on any version of the chain.
    pub fn first_tombstone(&self) -> Option<ContentHash> {
        self.tombstones.first().map(|(_, h)| *h)
    }

    /// Every version hash ordered by chain position (root first). Forked
    /// siblings follow the fork tie-break order, loser first.
    pub fn history(&self) -> Vec<ContentHash> {
        let mut ordered: Vec<&Version> = self.versions.iter().collect();
        ordered.sort_by_key(|v| v.rank());
        ordered.into_iter().map(|v| v.hash).collect()
    }
}
