use std::collections::HashSet;

use humm_types::ContentHash;

use crate::types::Negotiation;

/// Record negotiation: which hashes need to move between two peers.
pub struct NegotiationEngine;

impl NegotiationEngine {
    /// Records the remote has that we don't, in the remote's order.
    pub fn compute_wants(local: &[ContentHash], remote: &[ContentHash]) -> Vec<ContentHash> {
        let have: HashSet<&ContentHash> = local.iter().collect();
        remote.iter().filter(|h| !have.contains(h)).copied().collect()
    }

    /// Records we hold that the remote lacks, in our order.
    pub fn compute_offers(local: &[ContentHash], remote: &[ContentHash]) -> Vec<ContentHash> {
        Self::compute_wants(remote, local)
    }

    pub fn negotiate(local: &[ContentHash], remote: &[ContentHash]) -> Negotiation {
        let wants = Self::compute_wants(local, remote);
        let offers = Self::compute_offers(local, remote);
        let common = remote.len() - wants.len();
        Negotiation {
            wants,
            offers,
            common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: u8) -> ContentHash {
        ContentHash::from_hash([n; 32])
    }

    #[test]
    fn compute_wants_finds_missing_in_remote_order() {
        let wants = NegotiationEngine::compute_wants(&[h(1)], &[h(3), h(1), h(2)]);
        assert_eq!(wants, vec![h(3), h(2)]);
    }

    #[test]
    fn compute_wants_empty_when_synced() {
        let all = [h(1), h(2)];
        assert!(NegotiationEngine::compute_wants(&all, &all).is_empty());
    }

    #[test]
    fn negotiate_counts_common() {
        let neg = NegotiationEngine::negotiate(&[h(1), h(2)], &[h(1), h(3)]);
        assert_eq!(neg.wants, vec![h(3)]);
        assert_eq!(neg.offers, vec![h(2)]);
        assert_eq!(neg.common, 1);
        assert!(!neg.is_settled());
    }

    #[test]
    fn negotiate_empty_local() {
        let neg = NegotiationEngine::negotiate(&[], &[h(1)]);
        assert_eq!(neg.wants.len(), 1);
        assert!(neg.offers.is_empty());
        assert_eq!(neg.common, 0);
    }
}
