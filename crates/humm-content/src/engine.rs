use std::sync::Arc;

use humm_crypto::ContentHasher;
use humm_index::{IndexError, IndexKey, IndexManager, IndexResult, LiveResolver};
use humm_log::{Agent, CommitOp, Op, ReplicatedLog, TombstoneOp};
use humm_types::{AgentPubKey, ContentHash, Timestamp};
use tracing::{debug, warn};

use crate::chain::{ChainView, Head};
use crate::config::EngineConfig;
use crate::entry::{ContentEntry, CreateInput, EntryHandle, TombstoneHandle, UpdateInput};
use crate::error::{ContentError, ContentResult};
use crate::validation::{describe, validate_entry};

/// Create, read, update and delete over a replicated log.
///
/// Writes are committed under this engine's agent and then fanned out to
/// the index. Reads derive the head of a chain from the log every time.
pub struct LifecycleEngine {
    log: Arc<dyn ReplicatedLog>,
    agent: Arc<Agent>,
    index: IndexManager,
    config: EngineConfig,
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("agent", &self.agent.pub_key())
            .field("config", &self.config)
            .finish()
    }
}

impl LifecycleEngine {
    pub fn new(log: Arc<dyn ReplicatedLog>, agent: Arc<Agent>, config: EngineConfig) -> Self {
        let index = IndexManager::new(log.clone(), agent.clone())
            .with_eager_retraction(config.eager_acl_retraction);
        Self {
            log,
            agent,
            index,
            config,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn index(&self) -> &IndexManager {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    /// Commit a new chain root and index it.
    pub fn create(&self, input: CreateInput) -> ContentResult<EntryHandle> {
        let entry = input.into_entry();
        check(&entry)?;

        let payload = entry.encode()?;
        let signed = self.agent.sign(Op::Commit(CommitOp {
            entry_hash: ContentHasher::ENTRY.hash(&payload),
            payload,
            previous: None,
            original: None,
            seq: 0,
        }))?;
        let timestamp = signed.action.timestamp;
        let hash = self.log.commit(signed)?;
        let creator = self.agent.pub_key();

        let keys = IndexKey::keys_for(&entry.header, &creator, &entry.dynamic_links, true);
        let report = self.index.link_all(&keys, hash);
        if !report.is_complete() {
            warn!(
                hash = %hash.short_hex(),
                failed = report.failed.len(),
                "create indexed partially"
            );
        }
        debug!(
            hash = %hash.short_hex(),
            id = %entry.header.id,
            group = %entry.header.group_id,
            links = report.linked.len(),
            "content created"
        );

        Ok(EntryHandle {
            hash,
            original_hash: hash,
            header: entry.header,
            bytes: entry.bytes,
            dynamic_links: entry.dynamic_links,
            author: creator.clone(),
            created_by: creator,
            timestamp,
            created_at: timestamp,
        })
    }

    /// Supersede the head of a chain.
    ///
    /// `previous_hash` must be the elected head; anything else is a
    /// `Conflict`. When given, `original_hash` must name the chain root.
    pub fn update(&self, input: UpdateInput) -> ContentResult<EntryHandle> {
        let previous = input.previous_hash;
        let view = self.live_chain(&previous)?;
        let root = view.root();

        if let Some(original) = input.original_hash {
            if original != root {
                return Err(ContentError::Invalid(format!(
                    "original_hash {original} is not the root of {previous}"
                )));
            }
        }
        let head = view.head_version();
        if head.hash != previous {
            return Err(ContentError::Conflict {
                previous,
                head: head.hash,
            });
        }

        let prior = head.entry()?;
        let entry = ContentEntry {
            header: input.header,
            bytes: input.bytes,
            dynamic_links: input
                .dynamic_links
                .unwrap_or_else(|| prior.dynamic_links.clone()),
        };
        check(&entry)?;

        let payload = entry.encode()?;
        let signed = self.agent.sign(Op::Commit(CommitOp {
            entry_hash: ContentHasher::ENTRY.hash(&payload),
            payload,
            previous: Some(previous),
            original: Some(root),
            seq: head.seq + 1,
        }))?;
        let timestamp = signed.action.timestamp;
        let hash = self.log.commit(signed)?;

        let root_version = view.root_version();
        let creator = root_version.record.author().clone();
        let old_keys = IndexKey::keys_for(&prior.header, &creator, &prior.dynamic_links, false);
        let new_keys = IndexKey::keys_for(&entry.header, &creator, &entry.dynamic_links, false);
        let report = self.index.reindex(&old_keys, &new_keys, root, hash);
        if !report.is_complete() {
            warn!(
                hash = %hash.short_hex(),
                failed = report.failed.len(),
                "update indexed partially"
            );
        }
        debug!(
            hash = %hash.short_hex(),
            previous = %previous.short_hex(),
            root = %root.short_hex(),
            "content updated"
        );

        Ok(EntryHandle {
            hash,
            original_hash: root,
            header: entry.header,
            bytes: entry.bytes,
            dynamic_links: entry.dynamic_links,
            author: self.agent.pub_key(),
            created_by: creator,
            timestamp,
            created_at: root_version.timestamp,
        })
    }

    /// Tombstone the chain containing `hash`.
    ///
    /// Any version of the chain is accepted. Deleting an already deleted
    /// chain returns the existing tombstone.
    pub fn delete(&self, hash: &ContentHash) -> ContentResult<TombstoneHandle> {
        let view = self.chain_of(hash)?;
        if let Some(existing) = view.first_tombstone() {
            debug!(hash = %hash.short_hex(), tombstone = %existing.short_hex(), "already deleted");
            return Ok(TombstoneHandle { hash: existing });
        }

        let target = view.head_version().hash;
        let tombstone = self
            .log
            .commit(self.agent.sign(Op::Tombstone(TombstoneOp { target }))?)?;
        debug!(
            target = %target.short_hex(),
            tombstone = %tombstone.short_hex(),
            "content deleted"
        );
        Ok(TombstoneHandle { hash: tombstone })
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Resolve any hash of a live chain to its elected head.
    pub fn read(&self, hash: &ContentHash) -> ContentResult<EntryHandle> {
        let view = self.live_chain(hash)?;
        handle(&view)
    }

    /// Read several hashes; fails on the first that does not resolve.
    pub fn read_many(&self, hashes: &[ContentHash]) -> ContentResult<Vec<EntryHandle>> {
        hashes.iter().map(|h| self.read(h)).collect()
    }

    /// The head state of a live chain, fork included.
    pub fn head(&self, hash: &ContentHash) -> ContentResult<Head> {
        Ok(self.live_chain(hash)?.head())
    }

    /// Every version hash of a live chain, root first.
    pub fn history(&self, hash: &ContentHash) -> ContentResult<Vec<ContentHash>> {
        Ok(self.live_chain(hash)?.history())
    }

    /// Live heads discoverable under `key`.
    pub fn query(&self, key: &IndexKey) -> ContentResult<Vec<EntryHandle>> {
        Ok(self.index.query(key, self)?)
    }

    /// Live chains created by `author` with `content_type` whose creation
    /// time lies in `[start, end)`, oldest first, at most `limit`.
    pub fn query_by_time(
        &self,
        author: &AgentPubKey,
        content_type: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        limit: Option<usize>,
    ) -> ContentResult<Vec<EntryHandle>> {
        let key = IndexKey::AuthorContentType {
            author: author.clone(),
            content_type: content_type.to_string(),
        };
        let mut found: Vec<EntryHandle> = self
            .query(&key)?
            .into_iter()
            .filter(|h| h.created_at.within(start.as_ref(), end.as_ref()))
            .collect();
        found.sort_by_key(|h| h.created_at);
        if let Some(limit) = limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    /// Index keys the live head of `hash` should be discoverable under but
    /// has no link for on this peer.
    pub fn verify_indexes(&self, hash: &ContentHash) -> ContentResult<Vec<IndexKey>> {
        let head = self.read(hash)?;
        Ok(self
            .index
            .missing(&IndexKey::expected_for(&head), head.original_hash)?)
    }

    fn chain_of(&self, hash: &ContentHash) -> ContentResult<ChainView> {
        let root = self
            .log
            .resolve(hash)?
            .and_then(|r| r.chain_root())
            .ok_or(ContentError::NotFound(*hash))?;
        ChainView::load(self.log.as_ref(), root, self.config.max_chain_length)
    }

    fn live_chain(&self, hash: &ContentHash) -> ContentResult<ChainView> {
        let view = self.chain_of(hash)?;
        if view.is_tombstoned() {
            return Err(ContentError::NotFound(*hash));
        }
        Ok(view)
    }
}

impl LiveResolver for LifecycleEngine {
    type Entry = EntryHandle;

    fn resolve_live(&self, hash: &ContentHash) -> IndexResult<Option<EntryHandle>> {
        match self.read(hash) {
            Ok(handle) => Ok(Some(handle)),
            Err(ContentError::NotFound(_)) => Ok(None),
            Err(e @ (ContentError::Corrupt { .. } | ContentError::ChainTooLong { .. })) => {
                warn!(hash = %hash.short_hex(), error = %e, "skipping unresolvable index target");
                Ok(None)
            }
            Err(e) => Err(IndexError::Resolve(e.to_string())),
        }
    }
}

fn check(entry: &ContentEntry) -> ContentResult<()> {
    let violations = validate_entry(entry);
    if violations.is_empty() {
        return Ok(());
    }
    Err(ContentError::Invalid(describe(&violations)))
}

fn handle(view: &ChainView) -> ContentResult<EntryHandle> {
    let head = view.head_version();
    let root = view.root_version();
    let entry = head.entry()?;
    Ok(EntryHandle {
        hash: head.hash,
        original_hash: view.root(),
        header: entry.header,
        bytes: entry.bytes,
        dynamic_links: entry.dynamic_links,
        author: head.record.author().clone(),
        created_by: root.record.author().clone(),
        timestamp: head.timestamp,
        created_at: root.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use humm_index::IndexFamily;
    use humm_log::InMemoryLog;
    use humm_types::{AccessControlList, AclRole, EntityRef};
    use proptest::prelude::*;

    fn engine_with(config: EngineConfig) -> LifecycleEngine {
        let log: Arc<dyn ReplicatedLog> = Arc::new(InMemoryLog::new());
        LifecycleEngine::new(log, Arc::new(Agent::generate(1)), config)
    }

    fn engine() -> LifecycleEngine {
        engine_with(EngineConfig::default())
    }

    fn alice() -> EntityRef {
        EntityRef::new("alice", "user")
    }

    fn bob() -> EntityRef {
        EntityRef::new("bob", "user")
    }

    fn input(id: &str, bytes: &[u8]) -> CreateInput {
        CreateInput::new(id, "g1", "note", bytes.to_vec(), AccessControlList::owned_by(alice()))
    }

    fn reader_key(entity: EntityRef) -> IndexKey {
        IndexKey::AclRole {
            group_id: "g1".into(),
            content_type: "note".into(),
            role: AclRole::Reader,
            entity,
        }
    }

    fn content_key(id: &str) -> IndexKey {
        IndexKey::ContentId {
            group_id: "g1".into(),
            id: id.into(),
        }
    }

    // ---- Create / read ----

    #[test]
    fn create_then_read() {
        let engine = engine();
        let created = engine.create(input("c1", b"secret")).unwrap();
        let read = engine.read(&created.hash).unwrap();
        assert_eq!(read, created);
        assert_eq!(read.bytes, b"secret");
        assert_eq!(read.original_hash, read.hash);
        assert_eq!(read.created_by, engine.agent().pub_key());
    }

    #[test]
    fn create_rejects_invalid_input() {
        let engine = engine();
        let err = engine.create(input("", b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let acl = AccessControlList::owned_by(EntityRef::new("", "user"));
        let err = engine
            .create(CreateInput::new("c1", "g1", "note", vec![], acl))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn read_unknown_is_not_found() {
        let err = engine().read(&ContentHash::from_bytes(b"nope")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn create_links_every_expected_key() {
        let engine = engine();
        let acl = AccessControlList::owned_by(alice())
            .with(AclRole::Admin, alice())
            .with(AclRole::Reader, bob());
        let created = engine
            .create(
                CreateInput::new("c1", "g1", "note", vec![], acl).with_dynamic_link("tag", "red"),
            )
            .unwrap();
        assert!(engine.verify_indexes(&created.hash).unwrap().is_empty());
        let admin = IndexKey::AclRole {
            group_id: "g1".into(),
            content_type: "note".into(),
            role: AclRole::Admin,
            entity: alice(),
        };
        assert_eq!(engine.query(&admin).unwrap().len(), 1);
        assert_eq!(engine.query(&reader_key(bob())).unwrap().len(), 1);
        assert!(engine.query(&reader_key(alice())).unwrap().is_empty());
    }

    // ---- Update ----

    #[test]
    fn every_hash_reads_latest_version() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let mut hashes = vec![v1.hash];
        let mut head = v1;
        for n in 2..=4 {
            let bytes = format!("v{n}").into_bytes();
            head = engine
                .update(UpdateInput::new(head.hash, head.header.clone(), bytes))
                .unwrap();
            hashes.push(head.hash);
        }
        for h in &hashes {
            assert_eq!(engine.read(h).unwrap().bytes, b"v4");
        }
        assert_eq!(engine.history(&hashes[2]).unwrap(), hashes);
        assert_eq!(engine.head(&hashes[0]).unwrap(), Head::Unique(hashes[3]));
    }

    #[test]
    fn stale_previous_is_conflict() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let edit = |bytes: &[u8]| {
            UpdateInput::new(v1.hash, v1.header.clone(), bytes.to_vec()).with_original(v1.hash)
        };
        let v2 = engine.update(edit(b"v2")).unwrap();
        let err = engine.update(edit(b"v3")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(matches!(err, ContentError::Conflict { head, .. } if head == v2.hash));
    }

    #[test]
    fn wrong_original_is_invalid() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let other = engine.create(input("c2", b"x")).unwrap();
        let err = engine
            .update(UpdateInput::new(v1.hash, v1.header.clone(), vec![]).with_original(other.hash))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    #[test]
    fn update_keeps_creator_and_dynamic_links() {
        let engine = engine();
        let v1 = engine
            .create(input("c1", b"v1").with_dynamic_link("tag", "red"))
            .unwrap();
        let v2 = engine
            .update(UpdateInput::new(v1.hash, v1.header.clone(), b"v2".to_vec()))
            .unwrap();
        assert_eq!(v2.original_hash, v1.hash);
        assert_eq!(v2.created_by, v1.created_by);
        assert_eq!(v2.created_at, v1.created_at);
        assert_eq!(v2.dynamic_links, v1.dynamic_links);
        assert!(v2.timestamp > v1.timestamp);
    }

    #[test]
    fn content_id_returns_head() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let v2 = engine
            .update(UpdateInput::new(v1.hash, v1.header.clone(), b"v2".to_vec()))
            .unwrap();
        let found = engine.query(&content_key("c1")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].hash, v2.hash);
    }

    #[test]
    fn removing_reader_hides_entry_under_both_policies() {
        for eager in [false, true] {
            let engine = engine_with(EngineConfig {
                eager_acl_retraction: eager,
                ..EngineConfig::default()
            });
            let acl = AccessControlList::owned_by(alice()).with(AclRole::Reader, bob());
            let v1 = engine
                .create(CreateInput::new("c1", "g1", "note", vec![], acl))
                .unwrap();
            assert_eq!(engine.query(&reader_key(bob())).unwrap().len(), 1);

            let mut header = v1.header.clone();
            header.acl = AccessControlList::owned_by(alice());
            engine
                .update(UpdateInput::new(v1.hash, header, vec![]))
                .unwrap();
            assert!(engine.query(&reader_key(bob())).unwrap().is_empty());
            let links = engine.index().targets(&reader_key(bob())).unwrap().len();
            assert_eq!(links, if eager { 0 } else { 1 });
        }
    }

    #[test]
    fn adding_reader_on_update_makes_entry_discoverable() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let mut header = v1.header.clone();
        header.acl = header.acl.with(AclRole::Reader, bob());
        let v2 = engine.update(UpdateInput::new(v1.hash, header, vec![])).unwrap();
        let found = engine.query(&reader_key(bob())).unwrap();
        assert_eq!(found[0].hash, v2.hash);
    }

    #[test]
    fn moving_group_moves_group_listing() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let mut header = v1.header.clone();
        header.group_id = "g2".into();
        engine.update(UpdateInput::new(v1.hash, header, vec![])).unwrap();
        let g1 = IndexKey::Group {
            group_id: "g1".into(),
        };
        let g2 = IndexKey::Group {
            group_id: "g2".into(),
        };
        assert!(engine.query(&g1).unwrap().is_empty());
        assert_eq!(engine.query(&g2).unwrap().len(), 1);
    }

    // ---- Delete ----

    #[test]
    fn delete_hides_every_version() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let v2 = engine
            .update(UpdateInput::new(v1.hash, v1.header.clone(), b"v2".to_vec()))
            .unwrap();
        engine.delete(&v1.hash).unwrap();
        for h in [v1.hash, v2.hash] {
            assert_eq!(engine.read(&h).unwrap_err().kind(), ErrorKind::NotFound);
        }
        assert!(engine.query(&content_key("c1")).unwrap().is_empty());
        let err = engine
            .update(UpdateInput::new(v2.hash, v2.header.clone(), vec![]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn delete_is_idempotent_across_chain_hashes() {
        let engine = engine();
        let v1 = engine.create(input("c1", b"v1")).unwrap();
        let v2 = engine
            .update(UpdateInput::new(v1.hash, v1.header.clone(), b"v2".to_vec()))
            .unwrap();
        let first = engine.delete(&v2.hash).unwrap();
        assert_eq!(engine.delete(&v2.hash).unwrap(), first);
        assert_eq!(engine.delete(&v1.hash).unwrap(), first);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let err = engine().delete(&ContentHash::from_bytes(b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // ---- Queries ----

    #[test]
    fn query_preserves_insertion_order() {
        let engine = engine();
        let a = engine.create(input("a", b"a")).unwrap();
        let b = engine.create(input("b", b"b")).unwrap();
        let c = engine.create(input("c", b"c")).unwrap();
        engine.delete(&b.hash).unwrap();
        let key = IndexKey::Author {
            author: engine.agent().pub_key(),
        };
        let hashes: Vec<_> = engine.query(&key).unwrap().into_iter().map(|h| h.hash).collect();
        assert_eq!(hashes, vec![a.hash, c.hash]);
        assert_eq!(key.family(), IndexFamily::Author);
    }

    #[test]
    fn time_query_is_half_open_and_limited() {
        let engine = engine();
        let a = engine.create(input("a", b"a")).unwrap();
        let b = engine.create(input("b", b"b")).unwrap();
        let c = engine.create(input("c", b"c")).unwrap();
        let author = engine.agent().pub_key();

        let all = engine.query_by_time(&author, "note", None, None, None).unwrap();
        assert_eq!(all.iter().map(|h| h.hash).collect::<Vec<_>>(), vec![a.hash, b.hash, c.hash]);

        let window = engine
            .query_by_time(&author, "note", Some(b.created_at), Some(c.created_at), None)
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].hash, b.hash);

        let limited = engine.query_by_time(&author, "note", None, None, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
        assert!(engine.query_by_time(&author, "other", None, None, None).unwrap().is_empty());
    }

    #[test]
    fn read_many_fails_on_first_missing() {
        let engine = engine();
        let a = engine.create(input("a", b"a")).unwrap();
        assert_eq!(engine.read_many(&[a.hash, a.hash]).unwrap().len(), 2);
        let err = engine
            .read_many(&[a.hash, ContentHash::from_bytes(b"gone")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn custom_links_are_group_scoped() {
        let engine = engine();
        engine
            .create(input("c1", b"x").with_dynamic_link("project", "apollo"))
            .unwrap();
        let hit = IndexKey::Custom {
            group_id: "g1".into(),
            name: "project".into(),
            value: "apollo".into(),
        };
        let miss = IndexKey::Custom {
            group_id: "g2".into(),
            name: "project".into(),
            value: "apollo".into(),
        };
        assert_eq!(engine.query(&hit).unwrap().len(), 1);
        assert!(engine.query(&miss).unwrap().is_empty());
    }

    // ---- Records from other peers ----

    fn group_key() -> IndexKey {
        IndexKey::Group {
            group_id: "g1".into(),
        }
    }

    /// Commit a root from another agent straight into the log, skipping the
    /// local write path, and link it under the g1 group key.
    fn foreign_root(engine: &LifecycleEngine, payload: &[u8]) -> ContentHash {
        let agent = Arc::new(Agent::generate(2));
        let op = Op::Commit(CommitOp {
            entry_hash: ContentHasher::ENTRY.hash(payload),
            payload: payload.to_vec(),
            previous: None,
            original: None,
            seq: 0,
        });
        let hash = engine.log.commit(agent.sign(op).unwrap()).unwrap();
        IndexManager::new(engine.log.clone(), agent)
            .link(&group_key(), hash)
            .unwrap();
        hash
    }

    #[test]
    fn undecodable_record_is_skipped_by_queries() {
        let engine = engine();
        let c1 = engine.create(input("c1", b"v1")).unwrap();
        let bad = foreign_root(&engine, b"not json");

        let found = engine.query(&group_key()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].hash, c1.hash);
        assert!(matches!(engine.read(&bad), Err(ContentError::Corrupt { .. })));
    }

    #[test]
    fn foreign_entry_breaking_content_rules_is_not_served() {
        let engine = engine();
        let acl = AccessControlList::owned_by(EntityRef::new("", "user"));
        let payload = CreateInput::new("", "", "note", vec![], acl)
            .into_entry()
            .encode()
            .unwrap();
        let bad = foreign_root(&engine, &payload);

        let err = engine.read(&bad).unwrap_err();
        assert!(matches!(err, ContentError::Corrupt { hash, .. } if hash == bad));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(engine.query(&group_key()).unwrap().is_empty());

        let header = valid_header();
        let err = engine
            .update(UpdateInput::new(bad, header, vec![]))
            .unwrap_err();
        assert!(matches!(err, ContentError::Corrupt { .. }));
    }

    fn valid_header() -> humm_types::ContentHeader {
        input("c1", b"").into_entry().header
    }

    proptest! {
        #[test]
        fn created_content_reads_back(
            id in "[a-z][a-z0-9]{0,15}",
            bytes in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let engine = engine();
            let created = engine.create(input(&id, &bytes)).unwrap();
            let read = engine.read(&created.hash).unwrap();
            prop_assert_eq!(read.bytes, bytes);
            prop_assert_eq!(read.header.id, id);
        }
    }
}
