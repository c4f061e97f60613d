use std::sync::Arc;

use humm_content::{CreateInput, EntryHandle, Head, LifecycleEngine, TombstoneHandle, UpdateInput};
use humm_crypto::SigningKey;
use humm_index::IndexKey;
use humm_log::{Agent, InMemoryLog, ReplicatedLog};
use humm_sync::{GossipEngine, LocalTransport, PullReport, PushReport};
use humm_types::{AclRole, AgentPubKey, ContentHash, ContentHeader, EntityRef, Timestamp};
use tracing::info;

use crate::config::NodeConfig;
use crate::error::{SdkError, SdkResult};

/// Replacement content for an update: a new header and new opaque bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedContent {
    pub header: ContentHeader,
    pub bytes: Vec<u8>,
}

/// One peer of the content store.
pub struct HummNode {
    config: NodeConfig,
    log: Arc<dyn ReplicatedLog>,
    agent: Arc<Agent>,
    engine: LifecycleEngine,
}

impl std::fmt::Debug for HummNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HummNode")
            .field("agent", &self.agent.pub_key())
            .field("node_id", &self.config.node_id)
            .finish()
    }
}

impl HummNode {
    /// A node with a fresh agent key and an empty in-memory log.
    pub fn new(config: NodeConfig) -> Self {
        Self::with_key(config, SigningKey::generate())
    }

    pub fn with_key(config: NodeConfig, key: SigningKey) -> Self {
        let agent = Agent::new(key, config.node_id);
        Self::with_parts(config, Arc::new(InMemoryLog::new()), Arc::new(agent))
    }

    /// A node over an existing log and agent.
    pub fn with_parts(config: NodeConfig, log: Arc<dyn ReplicatedLog>, agent: Arc<Agent>) -> Self {
        let engine = LifecycleEngine::new(log.clone(), agent.clone(), config.engine_config());
        info!(agent = %agent.pub_key().short_id(), node_id = config.node_id, "node started");
        Self {
            config,
            log,
            agent,
            engine,
        }
    }

    pub fn agent_pub_key(&self) -> AgentPubKey {
        self.agent.pub_key()
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn log(&self) -> &Arc<dyn ReplicatedLog> {
        &self.log
    }

    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    // ---- Content operations ----

    pub fn create_encrypted_content(&self, input: CreateInput) -> SdkResult<EntryHandle> {
        Ok(self.engine.create(input)?)
    }

    pub fn get_encrypted_content(&self, hash: &ContentHash) -> SdkResult<EntryHandle> {
        Ok(self.engine.read(hash)?)
    }

    pub fn get_many_encrypted_content(
        &self,
        hashes: &[ContentHash],
    ) -> SdkResult<Vec<EntryHandle>> {
        Ok(self.engine.read_many(hashes)?)
    }

    pub fn update_encrypted_content(
        &self,
        previous_hash: ContentHash,
        original_hash: Option<ContentHash>,
        updated: EncryptedContent,
    ) -> SdkResult<EntryHandle> {
        let mut input = UpdateInput::new(previous_hash, updated.header, updated.bytes);
        input.original_hash = original_hash;
        Ok(self.engine.update(input)?)
    }

    pub fn delete_encrypted_content(&self, hash: &ContentHash) -> SdkResult<TombstoneHandle> {
        Ok(self.engine.delete(hash)?)
    }

    pub fn get_chain_history(&self, hash: &ContentHash) -> SdkResult<Vec<ContentHash>> {
        Ok(self.engine.history(hash)?)
    }

    pub fn get_head(&self, hash: &ContentHash) -> SdkResult<Head> {
        Ok(self.engine.head(hash)?)
    }

    /// Index keys the live head of `hash` has no link for on this node.
    pub fn verify_indexes(&self, hash: &ContentHash) -> SdkResult<Vec<IndexKey>> {
        Ok(self.engine.verify_indexes(hash)?)
    }

    // ---- Index queries ----

    /// Every live chain created by `author`.
    pub fn get_all_encrypted_content(&self, author: &AgentPubKey) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::Author {
            author: author.clone(),
        })
    }

    pub fn get_all_encrypted_content_by_author_and_content_type(
        &self,
        author: &AgentPubKey,
        content_type: &str,
    ) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::AuthorContentType {
            author: author.clone(),
            content_type: content_type.to_string(),
        })
    }

    pub fn get_all_encrypted_content_by_hive(&self, hive_id: &str) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::Group {
            group_id: hive_id.to_string(),
        })
    }

    pub fn get_all_encrypted_content_by_hive_and_content_type(
        &self,
        hive_id: &str,
        content_type: &str,
    ) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::GroupContentType {
            group_id: hive_id.to_string(),
            content_type: content_type.to_string(),
        })
    }

    pub fn get_encrypted_content_by_time_and_author(
        &self,
        author: &AgentPubKey,
        content_type: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        limit: Option<usize>,
    ) -> SdkResult<Vec<EntryHandle>> {
        Ok(self
            .engine
            .query_by_time(author, content_type, start, end, limit)?)
    }

    /// The head of the chain with logical id `id` in `group_id`.
    ///
    /// If several chains share the id (created concurrently on different
    /// peers), the most recently created one wins, then the larger root hash.
    pub fn get_by_content_id_link(&self, group_id: &str, id: &str) -> SdkResult<EntryHandle> {
        self.query(&IndexKey::ContentId {
            group_id: group_id.to_string(),
            id: id.to_string(),
        })?
        .into_iter()
        .max_by_key(|h| (h.created_at, h.original_hash))
        .ok_or_else(|| SdkError::ContentIdNotFound {
            group_id: group_id.to_string(),
            id: id.to_string(),
        })
    }

    pub fn list_by_acl_link(
        &self,
        group_id: &str,
        content_type: &str,
        role: AclRole,
        entity: &EntityRef,
    ) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::AclRole {
            group_id: group_id.to_string(),
            content_type: content_type.to_string(),
            role,
            entity: entity.clone(),
        })
    }

    pub fn list_by_dynamic_link(
        &self,
        group_id: &str,
        name: &str,
        value: &str,
    ) -> SdkResult<Vec<EntryHandle>> {
        self.query(&IndexKey::Custom {
            group_id: group_id.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn query(&self, key: &IndexKey) -> SdkResult<Vec<EntryHandle>> {
        Ok(self.engine.query(key)?)
    }

    // ---- Gossip ----

    /// Transport other nodes use to reach this node in-process.
    pub fn transport(&self) -> LocalTransport {
        LocalTransport::new(self.log.clone()).with_agent(self.agent.clone())
    }

    pub fn gossip(&self) -> GossipEngine {
        GossipEngine::new(self.log.clone())
            .with_agent(self.agent.clone())
            .with_batch_size(self.config.gossip_batch_size)
    }

    /// Fetch every record `other` has that this node lacks.
    pub async fn pull_from(&self, other: &HummNode) -> SdkResult<PullReport> {
        Ok(self.gossip().pull(&other.transport()).await?)
    }

    /// Send every record this node has that `other` lacks.
    pub async fn push_to(&self, other: &HummNode) -> SdkResult<PushReport> {
        Ok(self.gossip().push(&other.transport()).await?)
    }
}
