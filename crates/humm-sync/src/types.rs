use humm_types::ContentHash;
use serde::{Deserialize, Serialize};

/// What needs to move between two peers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Negotiation {
    /// Remote records missing locally.
    pub wants: Vec<ContentHash>,
    /// Local records missing remotely.
    pub offers: Vec<ContentHash>,
    /// Records both sides hold.
    pub common: usize,
}

impl Negotiation {
    /// Both sides hold the same records.
    pub fn is_settled(&self) -> bool {
        self.wants.is_empty() && self.offers.is_empty()
    }
}

/// Outcome of applying a batch of received records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub applied: usize,
    pub duplicates: usize,
    /// Records still waiting on a dependency.
    pub deferred: Vec<ContentHash>,
    /// Records that failed validation, with the reason.
    pub rejected: Vec<(ContentHash, String)>,
}

impl ApplyReport {
    pub fn merge(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.duplicates += other.duplicates;
        self.deferred = other.deferred;
        self.rejected.extend(other.rejected);
    }
}

#[derive(Clone, Debug, Default)]
pub struct PullReport {
    pub records_wanted: usize,
    pub records_received: usize,
    pub bytes_transferred: u64,
    pub apply: ApplyReport,
}

#[derive(Clone, Debug, Default)]
pub struct PushReport {
    pub records_sent: usize,
    pub bytes_transferred: u64,
    /// How the remote applied what was sent.
    pub apply: ApplyReport,
}
