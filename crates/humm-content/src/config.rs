use serde::{Deserialize, Serialize};

/// Tunables for the lifecycle engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Unlink index keys a chain leaves on update instead of relying only on
    /// read-time filtering.
    pub eager_acl_retraction: bool,
    /// Upper bound on versions walked per chain.
    pub max_chain_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eager_acl_retraction: false,
            max_chain_length: 10_000,
        }
    }
}
