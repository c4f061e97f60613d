use std::sync::Arc;

use humm_log::{Agent, ReplicatedLog, SignedAction};
use tracing::{debug, info};

use crate::apply::CausalApplier;
use crate::codec::{decode_batch, encode_batch};
use crate::error::SyncResult;
use crate::negotiation::NegotiationEngine;
use crate::transport::GossipTransport;
use crate::types::{ApplyReport, PullReport, PushReport};

/// Moves records between the local log and one remote peer per call.
pub struct GossipEngine {
    local: Arc<dyn ReplicatedLog>,
    agent: Option<Arc<Agent>>,
    batch_size: usize,
}

impl GossipEngine {
    pub fn new(local: Arc<dyn ReplicatedLog>) -> Self {
        Self {
            local,
            agent: None,
            batch_size: 512,
        }
    }

    /// Advance `agent`'s clock past every record pulled in.
    pub fn with_agent(mut self, agent: Arc<Agent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Fetch and apply every record the remote has that we lack.
    pub async fn pull(&self, remote: &dyn GossipTransport) -> SyncResult<PullReport> {
        let local_hashes = self.local.hashes()?;
        let remote_hashes = remote.list_hashes().await?;
        let wants = NegotiationEngine::compute_wants(&local_hashes, &remote_hashes);

        let mut report = PullReport {
            records_wanted: wants.len(),
            ..PullReport::default()
        };
        let mut carried: Vec<SignedAction> = Vec::new();
        for chunk in wants.chunks(self.batch_size) {
            let bytes = remote.fetch(chunk).await?;
            report.bytes_transferred += bytes.len() as u64;
            let mut actions = decode_batch(&bytes)?;
            report.records_received += actions.len();

            actions.append(&mut carried);
            let (applied, waiting) = self.applier().apply(actions);
            debug!(
                applied = applied.applied,
                deferred = applied.deferred.len(),
                "gossip batch applied"
            );
            report.apply.merge(applied);
            carried = waiting;
        }

        info!(
            wanted = report.records_wanted,
            received = report.records_received,
            applied = report.apply.applied,
            rejected = report.apply.rejected.len(),
            deferred = report.apply.deferred.len(),
            "pull complete"
        );
        Ok(report)
    }

    /// Send every record we hold that the remote lacks.
    pub async fn push(&self, remote: &dyn GossipTransport) -> SyncResult<PushReport> {
        let local_hashes = self.local.hashes()?;
        let remote_hashes = remote.list_hashes().await?;
        let offers = NegotiationEngine::compute_offers(&local_hashes, &remote_hashes);

        let mut report = PushReport::default();
        for chunk in offers.chunks(self.batch_size) {
            let actions: Vec<SignedAction> = self
                .local
                .resolve_batch(chunk)?
                .into_iter()
                .flatten()
                .map(|r| r.signed)
                .collect();
            let bytes = encode_batch(&actions)?;
            report.records_sent += actions.len();
            report.bytes_transferred += bytes.len() as u64;
            let applied: ApplyReport = remote.push(&bytes).await?;
            report.apply.merge(applied);
        }

        info!(
            sent = report.records_sent,
            applied = report.apply.applied,
            rejected = report.apply.rejected.len(),
            "push complete"
        );
        Ok(report)
    }

    fn applier(&self) -> CausalApplier<'_> {
        let applier = CausalApplier::new(self.local.as_ref());
        match &self.agent {
            Some(agent) => applier.observing(agent),
            None => applier,
        }
    }
}
