use humm_log::{Agent, LogError, ReplicatedLog, SignedAction};
use tracing::{debug, warn};

use crate::types::ApplyReport;

/// Applies received records to a local log in dependency order.
///
/// Records are attempted in the order given. A record whose dependency is
/// missing is set aside and retried after every pass that made progress;
/// whatever is still waiting when a pass makes no progress is returned so
/// the caller can carry it into the next batch.
pub struct CausalApplier<'a> {
    log: &'a dyn ReplicatedLog,
    agent: Option<&'a Agent>,
}

impl<'a> CausalApplier<'a> {
    pub fn new(log: &'a dyn ReplicatedLog) -> Self {
        Self { log, agent: None }
    }

    /// Fold the timestamp of every applied record into `agent`'s clock.
    pub fn observing(mut self, agent: &'a Agent) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Apply `actions`, returning the report and the actions still waiting
    /// on a dependency.
    pub fn apply(&self, actions: Vec<SignedAction>) -> (ApplyReport, Vec<SignedAction>) {
        let mut report = ApplyReport::default();
        let mut pending = actions;

        loop {
            let before = pending.len();
            let mut waiting = Vec::new();
            for action in pending {
                let hash = match action.hash() {
                    Ok(hash) => hash,
                    Err(e) => {
                        warn!(error = %e, "dropping unencodable record");
                        continue;
                    }
                };
                match self.log.contains(&hash) {
                    Ok(true) => {
                        report.duplicates += 1;
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        report.rejected.push((hash, e.to_string()));
                        continue;
                    }
                }
                let timestamp = action.action.timestamp;
                match self.log.commit(action.clone()) {
                    Ok(_) => {
                        report.applied += 1;
                        if let Some(agent) = self.agent {
                            agent.observe(&timestamp);
                        }
                    }
                    Err(e @ LogError::MissingDependency { .. }) => {
                        debug!(hash = %hash.short_hex(), error = %e, "record deferred");
                        waiting.push(action);
                    }
                    Err(e) => {
                        warn!(hash = %hash.short_hex(), error = %e, "record rejected");
                        report.rejected.push((hash, e.to_string()));
                    }
                }
            }
            pending = waiting;
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        report.deferred = pending.iter().filter_map(|a| a.hash().ok()).collect();
        (report, pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use humm_crypto::ContentHasher;
    use humm_log::{CommitOp, InMemoryLog, LinkOp, Op};
    use humm_types::ContentHash;

    fn root(agent: &Agent, payload: &[u8]) -> SignedAction {
        agent
            .sign(Op::Commit(CommitOp {
                payload: payload.to_vec(),
                entry_hash: ContentHasher::ENTRY.hash(payload),
                previous: None,
                original: None,
                seq: 0,
            }))
            .unwrap()
    }

    fn link(agent: &Agent, target: ContentHash) -> SignedAction {
        agent
            .sign(Op::Link(LinkOp {
                base: ContentHasher::ANCHOR.hash(b"k"),
                target,
                family: "group".into(),
            }))
            .unwrap()
    }

    #[test]
    fn out_of_order_records_are_reordered() {
        let agent = Agent::generate(1);
        let r = root(&agent, b"v1");
        let l = link(&agent, r.hash().unwrap());

        let log = InMemoryLog::new();
        let (report, left) = CausalApplier::new(&log).apply(vec![l, r]);
        assert_eq!(report.applied, 2);
        assert!(left.is_empty());
        assert!(report.deferred.is_empty());
        assert_eq!(log.len().unwrap(), 2);
    }

    #[test]
    fn missing_dependency_is_carried_over() {
        let agent = Agent::generate(1);
        let l = link(&agent, ContentHash::from_hash([4; 32]));
        let log = InMemoryLog::new();
        let (report, left) = CausalApplier::new(&log).apply(vec![l.clone()]);
        assert_eq!(report.applied, 0);
        assert_eq!(report.deferred, vec![l.hash().unwrap()]);
        assert_eq!(left, vec![l]);
    }

    #[test]
    fn duplicates_and_forgeries() {
        let agent = Agent::generate(1);
        let r = root(&agent, b"v1");
        let mut forged = root(&agent, b"v2");
        forged.action.author = Agent::generate(2).pub_key();

        let log = InMemoryLog::new();
        log.commit(r.clone()).unwrap();
        let (report, _) = CausalApplier::new(&log).apply(vec![r, forged]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(log.len().unwrap(), 1);
    }

    #[test]
    fn observing_advances_local_clock() {
        let remote = Agent::generate(2);
        let local = Agent::generate(1);
        let log = InMemoryLog::new();
        let r = root(&remote, b"v1");
        let ts = r.action.timestamp;
        CausalApplier::new(&log).observing(&local).apply(vec![r]);
        let next = local.sign(Op::Link(LinkOp {
            base: ContentHash::null(),
            target: ContentHash::null(),
            family: String::new(),
        }));
        assert!(next.unwrap().action.timestamp > ts);
    }
}
