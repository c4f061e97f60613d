use humm_types::ContentHash;

use crate::action::{Record, SignedAction};
use crate::error::LogResult;

/// Append-only, content-addressed log of signed actions shared by all peers.
///
/// All implementations must satisfy these invariants:
/// - Records are immutable once committed and addressed by the hash of their
///   action. Committing a record that is already present is a no-op.
/// - Every record is validated before it is stored: signature, entry hash,
///   chain position, and presence of every causal dependency.
/// - Nothing is removed. Tombstones and unlinks are ordinary records.
/// - Query results preserve arrival order on this peer.
pub trait ReplicatedLog: Send + Sync {
    /// Validate and store a signed action, returning its address.
    fn commit(&self, action: SignedAction) -> LogResult<ContentHash>;

    /// Look up a record by address. `Ok(None)` if this peer has not seen it.
    fn resolve(&self, hash: &ContentHash) -> LogResult<Option<Record>>;

    /// Commits whose `previous` is `hash`, in arrival order.
    fn successors(&self, hash: &ContentHash) -> LogResult<Vec<ContentHash>>;

    /// Tombstones targeting `hash`, in arrival order.
    fn tombstones(&self, hash: &ContentHash) -> LogResult<Vec<ContentHash>>;

    /// Live (not unlinked) link records hanging off the anchor `base`, in
    /// arrival order.
    fn links(&self, base: &ContentHash) -> LogResult<Vec<Record>>;

    /// Every record address known to this peer, in arrival order.
    fn hashes(&self) -> LogResult<Vec<ContentHash>>;

    /// Number of records held.
    fn len(&self) -> LogResult<usize>;

    fn is_empty(&self) -> LogResult<bool> {
        Ok(self.len()? == 0)
    }

    fn contains(&self, hash: &ContentHash) -> LogResult<bool> {
        Ok(self.resolve(hash)?.is_some())
    }

    /// Resolve several addresses at once. Default calls `resolve()` for each.
    fn resolve_batch(&self, hashes: &[ContentHash]) -> LogResult<Vec<Option<Record>>> {
        hashes.iter().map(|h| self.resolve(h)).collect()
    }
}
