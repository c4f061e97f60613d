use std::collections::HashSet;
use std::sync::Arc;

use humm_log::{Agent, LinkOp, Op, ReplicatedLog, UnlinkOp};
use humm_types::ContentHash;
use tracing::{debug, warn};

use crate::error::IndexResult;
use crate::key::{IndexKey, IndexedEntry};

/// Resolves a linked hash to the live head of its chain.
///
/// Returns `Ok(None)` for hashes that are unknown or belong to a deleted
/// chain; those links are skipped by queries.
pub trait LiveResolver {
    type Entry: IndexedEntry;

    fn resolve_live(&self, hash: &ContentHash) -> IndexResult<Option<Self::Entry>>;
}

/// Outcome of a best-effort fan-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Link record hashes that were committed.
    pub linked: Vec<ContentHash>,
    /// Keys whose link could not be committed, with the reason.
    pub failed: Vec<(IndexKey, String)>,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Maintains index links in the log and answers index queries.
pub struct IndexManager {
    log: Arc<dyn ReplicatedLog>,
    agent: Arc<Agent>,
    eager_retraction: bool,
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("agent", &self.agent.pub_key())
            .field("eager_retraction", &self.eager_retraction)
            .finish()
    }
}

impl IndexManager {
    pub fn new(log: Arc<dyn ReplicatedLog>, agent: Arc<Agent>) -> Self {
        Self {
            log,
            agent,
            eager_retraction: false,
        }
    }

    /// Unlink keys a chain no longer belongs under when it is updated.
    pub fn with_eager_retraction(mut self, enabled: bool) -> Self {
        self.eager_retraction = enabled;
        self
    }

    pub fn eager_retraction(&self) -> bool {
        self.eager_retraction
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Link `target` under a single key.
    pub fn link(&self, key: &IndexKey, target: ContentHash) -> IndexResult<ContentHash> {
        let op = Op::Link(LinkOp {
            base: key.anchor()?,
            target,
            family: key.family().as_str().to_string(),
        });
        let hash = self.log.commit(self.agent.sign(op)?)?;
        debug!(key = %key, target = %target.short_hex(), "index link committed");
        Ok(hash)
    }

    /// Link `target` under every key. Failures are reported, not raised.
    pub fn link_all(&self, keys: &[IndexKey], target: ContentHash) -> IndexReport {
        let mut report = IndexReport::default();
        for key in keys {
            match self.link(key, target) {
                Ok(hash) => report.linked.push(hash),
                Err(e) => {
                    warn!(
                        key = %key,
                        target = %target.short_hex(),
                        error = %e,
                        "index link failed"
                    );
                    report.failed.push((key.clone(), e.to_string()));
                }
            }
        }
        report
    }

    /// Unlink every link under `key` that points into the chain rooted at
    /// `root`. Returns the number of links retracted.
    pub fn retract(&self, key: &IndexKey, root: ContentHash) -> IndexResult<usize> {
        let mut retracted = 0;
        for record in self.log.links(&key.anchor()?)? {
            let Some(link) = record.as_link() else {
                continue;
            };
            if self.chain_root_of(&link.target)? != Some(root) {
                continue;
            }
            self.log
                .commit(self.agent.sign(Op::Unlink(UnlinkOp { link: record.hash }))?)?;
            retracted += 1;
        }
        if retracted > 0 {
            debug!(key = %key, root = %root.short_hex(), retracted, "index links retracted");
        }
        Ok(retracted)
    }

    /// Re-index a chain after an update: link the new head under `new_keys`
    /// and, with eager retraction on, unlink the chain from every key in
    /// `old_keys` it no longer belongs under.
    pub fn reindex(
        &self,
        old_keys: &[IndexKey],
        new_keys: &[IndexKey],
        root: ContentHash,
        head: ContentHash,
    ) -> IndexReport {
        let mut report = self.link_all(new_keys, head);
        if !self.eager_retraction {
            return report;
        }
        let keep: HashSet<&IndexKey> = new_keys.iter().collect();
        for key in old_keys.iter().filter(|k| !keep.contains(k)) {
            if let Err(e) = self.retract(key, root) {
                warn!(key = %key, root = %root.short_hex(), error = %e, "index retraction failed");
                report.failed.push((key.clone(), e.to_string()));
            }
        }
        report
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Raw link targets under `key`, in insertion order.
    pub fn targets(&self, key: &IndexKey) -> IndexResult<Vec<ContentHash>> {
        Ok(self
            .log
            .links(&key.anchor()?)?
            .iter()
            .filter_map(|r| r.as_link().map(|l| l.target))
            .collect())
    }

    /// Live heads discoverable under `key`.
    ///
    /// Each linked hash is resolved to its chain's live head; unresolvable
    /// links are dropped, each chain appears once at the position of its
    /// oldest link, and heads that no longer belong under the key are
    /// filtered out.
    pub fn query<R: LiveResolver>(
        &self,
        key: &IndexKey,
        resolver: &R,
    ) -> IndexResult<Vec<R::Entry>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for target in self.targets(key)? {
            let Some(entry) = resolver.resolve_live(&target)? else {
                continue;
            };
            if !seen.insert(entry.root()) {
                continue;
            }
            if key.matches(&entry) {
                out.push(entry);
            }
        }
        Ok(out)
    }

    /// Keys from `expected` that have no link into the chain rooted at
    /// `root`.
    pub fn missing(&self, expected: &[IndexKey], root: ContentHash) -> IndexResult<Vec<IndexKey>> {
        let mut missing = Vec::new();
        for key in expected {
            let mut found = false;
            for target in self.targets(key)? {
                if self.chain_root_of(&target)? == Some(root) {
                    found = true;
                    break;
                }
            }
            if !found {
                missing.push(key.clone());
            }
        }
        Ok(missing)
    }

    fn chain_root_of(&self, hash: &ContentHash) -> IndexResult<Option<ContentHash>> {
        Ok(self.log.resolve(hash)?.and_then(|r| r.chain_root()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::DynamicLink;
    use humm_crypto::ContentHasher;
    use humm_log::{CommitOp, InMemoryLog};
    use humm_types::{
        AccessControlList, AclRole, AgentPubKey, ContentHeader, EntityRef, PublicKeyAcl,
    };
    use std::collections::HashMap;

    #[derive(Clone)]
    struct Head {
        root: ContentHash,
        header: ContentHeader,
        creator: AgentPubKey,
    }

    impl IndexedEntry for Head {
        fn root(&self) -> ContentHash {
            self.root
        }
        fn header(&self) -> &ContentHeader {
            &self.header
        }
        fn creator(&self) -> &AgentPubKey {
            &self.creator
        }
        fn dynamic_links(&self) -> &[DynamicLink] {
            &[]
        }
    }

    /// Maps any known hash to a fixed head; unknown hashes are dead.
    struct Fixed(HashMap<ContentHash, Head>);

    impl LiveResolver for Fixed {
        type Entry = Head;
        fn resolve_live(&self, hash: &ContentHash) -> IndexResult<Option<Head>> {
            Ok(self.0.get(hash).cloned())
        }
    }

    fn header(id: &str, acl: AccessControlList) -> ContentHeader {
        ContentHeader {
            id: id.into(),
            group_id: "g1".into(),
            content_type: "note".into(),
            acl,
            public_key_acl: PublicKeyAcl::default(),
            revision_author_signing_key: String::new(),
        }
    }

    fn setup() -> (Arc<InMemoryLog>, Arc<Agent>, IndexManager) {
        let log = Arc::new(InMemoryLog::new());
        let agent = Arc::new(Agent::generate(1));
        let manager = IndexManager::new(log.clone(), agent.clone());
        (log, agent, manager)
    }

    fn commit_root(log: &InMemoryLog, agent: &Agent, payload: &[u8]) -> ContentHash {
        let op = Op::Commit(CommitOp {
            payload: payload.to_vec(),
            entry_hash: ContentHasher::ENTRY.hash(payload),
            previous: None,
            original: None,
            seq: 0,
        });
        log.commit(agent.sign(op).unwrap()).unwrap()
    }

    fn group() -> IndexKey {
        IndexKey::Group {
            group_id: "g1".into(),
        }
    }

    // ---- Writes ----

    #[test]
    fn link_all_reports_every_key() {
        let (log, agent, manager) = setup();
        let target = commit_root(&log, &agent, b"c1");
        let h = header("c1", AccessControlList::owned_by(EntityRef::new("alice", "user")));
        let keys = IndexKey::keys_for(&h, &agent.pub_key(), &[], true);
        let report = manager.link_all(&keys, target);
        assert!(report.is_complete());
        assert_eq!(report.linked.len(), keys.len());
        assert_eq!(manager.targets(&group()).unwrap(), vec![target]);
    }

    #[test]
    fn link_to_unknown_target_is_reported_not_raised() {
        let (_, _, manager) = setup();
        let report = manager.link_all(&[group()], ContentHash::from_bytes(b"ghost"));
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].0, group());
    }

    #[test]
    fn retract_only_touches_the_given_chain() {
        let (log, agent, manager) = setup();
        let a = commit_root(&log, &agent, b"a");
        let b = commit_root(&log, &agent, b"b");
        manager.link(&group(), a).unwrap();
        manager.link(&group(), b).unwrap();
        assert_eq!(manager.retract(&group(), a).unwrap(), 1);
        assert_eq!(manager.targets(&group()).unwrap(), vec![b]);
    }

    #[test]
    fn reindex_retracts_only_when_enabled() {
        let bob = IndexKey::AclRole {
            group_id: "g1".into(),
            content_type: "note".into(),
            role: AclRole::Reader,
            entity: EntityRef::new("bob", "user"),
        };
        for eager in [false, true] {
            let (log, agent, manager) = setup();
            let manager = manager.with_eager_retraction(eager);
            let root = commit_root(&log, &agent, b"c1");
            manager.link(&bob, root).unwrap();
            let report = manager.reindex(&[bob.clone(), group()], &[group()], root, root);
            assert!(report.is_complete());
            let remaining = manager.targets(&bob).unwrap().len();
            assert_eq!(remaining, if eager { 0 } else { 1 });
        }
    }

    // ---- Reads ----

    #[test]
    fn query_dedupes_by_chain_and_drops_dead_links() {
        let (log, agent, manager) = setup();
        let alice = EntityRef::new("alice", "user");
        let v1 = commit_root(&log, &agent, b"v1");
        let v2 = commit_root(&log, &agent, b"v2");
        let dead = commit_root(&log, &agent, b"dead");
        for t in [v1, dead, v2] {
            manager.link(&group(), t).unwrap();
        }
        let head = Head {
            root: v1,
            header: header("c1", AccessControlList::owned_by(alice)),
            creator: agent.pub_key(),
        };
        let resolver = Fixed(HashMap::from([(v1, head.clone()), (v2, head)]));
        let found = manager.query(&group(), &resolver).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].root, v1);
    }

    #[test]
    fn query_filters_heads_that_left_the_key() {
        let (log, agent, manager) = setup();
        let root = commit_root(&log, &agent, b"c1");
        let reader = IndexKey::AclRole {
            group_id: "g1".into(),
            content_type: "note".into(),
            role: AclRole::Reader,
            entity: EntityRef::new("bob", "user"),
        };
        manager.link(&reader, root).unwrap();
        let head = Head {
            root,
            header: header("c1", AccessControlList::owned_by(EntityRef::new("alice", "user"))),
            creator: agent.pub_key(),
        };
        let resolver = Fixed(HashMap::from([(root, head)]));
        assert!(manager.query(&reader, &resolver).unwrap().is_empty());
    }

    #[test]
    fn missing_reports_unlinked_keys() {
        let (log, agent, manager) = setup();
        let root = commit_root(&log, &agent, b"c1");
        manager.link(&group(), root).unwrap();
        let content = IndexKey::ContentId {
            group_id: "g1".into(),
            id: "c1".into(),
        };
        let missing = manager.missing(&[group(), content.clone()], root).unwrap();
        assert_eq!(missing, vec![content]);
    }
}
