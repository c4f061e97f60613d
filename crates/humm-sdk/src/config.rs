use std::path::Path;

use humm_content::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Per-node configuration. Missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Tie-breaker stamped into every timestamp this node issues.
    pub node_id: u16,
    pub log_level: String,
    /// Unlink index keys a chain leaves on update.
    pub eager_acl_retraction: bool,
    /// Upper bound on versions walked per chain.
    pub max_chain_length: usize,
    /// Records per gossip batch.
    pub gossip_batch_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            log_level: "info".into(),
            eager_acl_retraction: false,
            max_chain_length: 10_000,
            gossip_batch_size: 512,
        }
    }
}

impl NodeConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            eager_acl_retraction: self.eager_acl_retraction,
            max_chain_length: self.max_chain_length,
        }
    }

    pub fn with_node_id(mut self, node_id: u16) -> Self {
        self.node_id = node_id;
        self
    }

    /// Install the global tracing subscriber at `log_level`.
    pub fn init_tracing(&self) -> SdkResult<bool> {
        crate::telemetry::init_tracing(&self.log_level)
    }
}
