use std::sync::Arc;

use async_trait::async_trait;
use humm_log::{Agent, ReplicatedLog};
use humm_types::ContentHash;
use tokio::sync::Mutex;

use crate::apply::CausalApplier;
use crate::codec::{decode_batch, encode_batch};
use crate::error::SyncResult;
use crate::types::ApplyReport;

/// Transport interface to a remote peer's log.
#[async_trait]
pub trait GossipTransport: Send + Sync {
    /// Every record hash the remote holds, in its arrival order.
    async fn list_hashes(&self) -> SyncResult<Vec<ContentHash>>;

    /// An encoded batch of the requested records. Hashes the remote does not
    /// hold are skipped.
    async fn fetch(&self, hashes: &[ContentHash]) -> SyncResult<Vec<u8>>;

    /// Offer an encoded batch for the remote to apply.
    async fn push(&self, batch: &[u8]) -> SyncResult<ApplyReport>;
}

/// In-process transport over another peer's log.
///
/// Pushed records that arrive ahead of their dependencies are parked and
/// retried with the next push.
pub struct LocalTransport {
    log: Arc<dyn ReplicatedLog>,
    agent: Option<Arc<Agent>>,
    parked: Mutex<Vec<humm_log::SignedAction>>,
}

impl LocalTransport {
    pub fn new(log: Arc<dyn ReplicatedLog>) -> Self {
        Self {
            log,
            agent: None,
            parked: Mutex::new(Vec::new()),
        }
    }

    /// Advance `agent`'s clock past every record pushed to this peer.
    pub fn with_agent(mut self, agent: Arc<Agent>) -> Self {
        self.agent = Some(agent);
        self
    }
}

#[async_trait]
impl GossipTransport for LocalTransport {
    async fn list_hashes(&self) -> SyncResult<Vec<ContentHash>> {
        Ok(self.log.hashes()?)
    }

    async fn fetch(&self, hashes: &[ContentHash]) -> SyncResult<Vec<u8>> {
        let actions: Vec<_> = self
            .log
            .resolve_batch(hashes)?
            .into_iter()
            .flatten()
            .map(|record| record.signed)
            .collect();
        encode_batch(&actions)
    }

    async fn push(&self, batch: &[u8]) -> SyncResult<ApplyReport> {
        let mut actions = decode_batch(batch)?;
        let mut parked = self.parked.lock().await;
        actions.append(&mut parked);

        let applier = CausalApplier::new(self.log.as_ref());
        let applier = match &self.agent {
            Some(agent) => applier.observing(agent),
            None => applier,
        };
        let (report, waiting) = applier.apply(actions);
        *parked = waiting;
        Ok(report)
    }
}
