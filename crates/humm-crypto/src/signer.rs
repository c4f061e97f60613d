//! Agent keys. An agent's public identity is its Ed25519 verifying key, so
//! any record can be checked against the author it names.

use std::fmt;

use ed25519_dalek::Signer;
use humm_types::AgentPubKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An agent's private signing key.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

/// The public half of an agent key, recovered from an [`AgentPubKey`].
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    inner: ed25519_dalek::VerifyingKey,
}

/// A detached Ed25519 signature over a record's canonical bytes.
///
/// Serialized as a lowercase hex string so it reads the same in JSON and on
/// the gossip wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

impl SigningKey {
    /// A fresh key from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Rebuild a key from its 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&seed),
        }
    }

    pub fn seed(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// The identity records signed with this key are attributed to.
    pub fn agent(&self) -> AgentPubKey {
        AgentPubKey::from_raw(self.inner.verifying_key().to_bytes())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            inner: self.inner.verifying_key(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.inner.sign(message).to_bytes())
    }
}

impl VerifyingKey {
    /// Fails with `InvalidKey` if the agent bytes are not a curve point.
    pub fn from_agent(agent: &AgentPubKey) -> Result<Self, SignatureError> {
        ed25519_dalek::VerifyingKey::from_bytes(agent.as_bytes())
            .map(|inner| Self { inner })
            .map_err(|_| SignatureError::InvalidKey)
    }

    pub fn agent(&self) -> AgentPubKey {
        AgentPubKey::from_raw(self.inner.to_bytes())
    }

    /// Strict verification; rejects malleable and small-order signatures.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        self.inner
            .verify_strict(message, &sig)
            .map_err(|_| SignatureError::InvalidSignature)
    }
}

impl Signature {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(s).map_err(|_| SignatureError::Malformed)?;
        let raw: [u8; 64] = bytes.try_into().map_err(|_| SignatureError::Malformed)?;
        Ok(Self(raw))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&self.agent()).finish()
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VerifyingKey").field(&self.agent()).finish()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..6]))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature does not match the author")]
    InvalidSignature,
    #[error("agent key is not a valid ed25519 point")]
    InvalidKey,
    #[error("signature is not 64 hex-encoded bytes")]
    Malformed,
}
