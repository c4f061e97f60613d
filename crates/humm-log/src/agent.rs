use humm_crypto::SigningKey;
use humm_types::{AgentPubKey, Timestamp};

use crate::action::{Action, Op, SignedAction};
use crate::error::LogResult;
use crate::hlc::{HybridLogicalClock, WallClock};

/// A peer's authoring identity: its signing key plus the clock that stamps
/// every action it signs.
pub struct Agent {
    key: SigningKey,
    pub_key: AgentPubKey,
    clock: HybridLogicalClock,
}

impl Agent {
    pub fn new(key: SigningKey, node_id: u16) -> Self {
        Self::with_clock(key, HybridLogicalClock::new(node_id))
    }

    /// A fresh agent with a random key.
    pub fn generate(node_id: u16) -> Self {
        Self::new(SigningKey::generate(), node_id)
    }

    pub fn with_clock(key: SigningKey, clock: HybridLogicalClock) -> Self {
        let pub_key = key.agent();
        Self {
            key,
            pub_key,
            clock,
        }
    }

    /// An agent whose clock reads physical time from `wall`.
    pub fn with_wall_clock(key: SigningKey, node_id: u16, wall: WallClock) -> Self {
        Self::with_clock(key, HybridLogicalClock::with_wall_clock(node_id, wall))
    }

    pub fn pub_key(&self) -> AgentPubKey {
        self.pub_key.clone()
    }

    pub fn node_id(&self) -> u16 {
        self.clock.node_id()
    }

    /// Stamp and sign an operation.
    pub fn sign(&self, op: Op) -> LogResult<SignedAction> {
        let action = Action {
            author: self.pub_key.clone(),
            timestamp: self.clock.now(),
            op,
        };
        let signature = self.key.sign(&action.canonical_bytes()?);
        Ok(SignedAction { action, signature })
    }

    /// Fold a timestamp seen on a remote record into the local clock.
    pub fn observe(&self, remote: &Timestamp) {
        self.clock.update(remote);
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("pub_key", &self.pub_key)
            .field("node_id", &self.node_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::TombstoneOp;
    use humm_types::ContentHash;

    fn op() -> Op {
        Op::Tombstone(TombstoneOp {
            target: ContentHash::from_bytes(b"t"),
        })
    }

    #[test]
    fn signed_actions_verify() {
        let agent = Agent::generate(3);
        let signed = agent.sign(op()).unwrap();
        assert_eq!(signed.action.author, agent.pub_key());
        assert_eq!(signed.action.timestamp.node_id, 3);
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn timestamps_advance() {
        let agent = Agent::generate(1);
        let a = agent.sign(op()).unwrap();
        let b = agent.sign(op()).unwrap();
        assert!(b.action.timestamp > a.action.timestamp);
        assert_ne!(a.hash().unwrap(), b.hash().unwrap());
    }

    #[test]
    fn observe_pulls_clock_forward() {
        let agent = Agent::generate(1);
        let future = Timestamp::new(u64::MAX / 2, 0, 9);
        agent.observe(&future);
        assert!(agent.sign(op()).unwrap().action.timestamp > future);
    }

    #[test]
    fn debug_hides_key() {
        let dbg = format!("{:?}", Agent::generate(1));
        assert!(dbg.contains("pub_key"));
        assert!(!dbg.contains("SigningKey"));
    }
}
