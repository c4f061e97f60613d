use tracing::info;

use crate::config::NodeConfig;
use crate::error::{SdkError, SdkResult};
use crate::node::HummNode;

/// Summary of a [`LocalNetwork::sync_all`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkSyncReport {
    /// Rounds run, including the final quiet one.
    pub rounds: usize,
    /// Records applied across all nodes.
    pub records_applied: usize,
    /// Records rejected across all nodes.
    pub records_rejected: usize,
}

/// Several nodes in one process. Nothing propagates between them until
/// [`sync_all`](Self::sync_all) runs.
#[derive(Debug, Default)]
pub struct LocalNetwork {
    nodes: Vec<HummNode>,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// A network of `n` nodes with node ids `1..=n`.
    pub fn with_nodes(n: u16, config: &NodeConfig) -> Self {
        let mut network = Self::new();
        for node_id in 1..=n {
            network.add_node(config.clone().with_node_id(node_id));
        }
        network
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, config: NodeConfig) -> usize {
        self.nodes.push(HummNode::new(config));
        self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> SdkResult<&HummNode> {
        self.nodes.get(index).ok_or(SdkError::NodeNotFound(index))
    }

    pub fn nodes(&self) -> &[HummNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pull between every ordered pair of nodes until a round applies
    /// nothing new.
    pub async fn sync_all(&self) -> SdkResult<NetworkSyncReport> {
        let mut report = NetworkSyncReport::default();
        let max_rounds = self.nodes.len() + 1;
        while report.rounds < max_rounds {
            report.rounds += 1;
            let mut applied = 0;
            for (i, local) in self.nodes.iter().enumerate() {
                for (j, remote) in self.nodes.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let pulled = local.pull_from(remote).await?;
                    applied += pulled.apply.applied;
                    report.records_rejected += pulled.apply.rejected.len();
                }
            }
            report.records_applied += applied;
            if applied == 0 {
                break;
            }
        }
        info!(
            nodes = self.nodes.len(),
            rounds = report.rounds,
            applied = report.records_applied,
            "network synced"
        );
        Ok(report)
    }
}
