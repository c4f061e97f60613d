use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Public identity of an agent (a peer's authoring key).
///
/// An `AgentPubKey` wraps the 32 raw bytes of the agent's Ed25519 verifying
/// key. It names the author of every record the agent commits and is the key
/// of the author index.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentPubKey {
    key: [u8; 32],
}

impl AgentPubKey {
    /// Wrap raw public key bytes.
    pub fn from_raw(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Create a random identity for tests and demos. The bytes are not
    /// guaranteed to be a valid Ed25519 point, so records "signed" by such an
    /// agent will not verify.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self { key: bytes }
    }

    /// The raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("agent:{}", hex::encode(&self.key[..4]))
    }

    /// Parse from a hex string, with or without the `agent:` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("agent:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { key: arr })
    }
}

impl fmt::Debug for AgentPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentPubKey({})", self.short_id())
    }
}

impl fmt::Display for AgentPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ephemeral_ids_are_unique() {
        assert_ne!(AgentPubKey::ephemeral(), AgentPubKey::ephemeral());
    }

    #[test]
    fn short_id_format() {
        let id = AgentPubKey::from_raw([0xab; 32]);
        assert_eq!(id.short_id(), "agent:abababab");
    }

    #[test]
    fn hex_parse_with_prefix() {
        let id = AgentPubKey::from_raw([9; 32]);
        let prefixed = format!("agent:{}", id.to_hex());
        assert_eq!(AgentPubKey::from_hex(&prefixed).unwrap(), id);
        assert_eq!(AgentPubKey::from_hex(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn hex_parse_wrong_length() {
        assert!(matches!(
            AgentPubKey::from_hex("agent:00ff"),
            Err(TypeError::InvalidLength { .. })
        ));
    }
}
