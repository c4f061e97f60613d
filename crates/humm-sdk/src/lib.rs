//! High-level SDK for the Humm content store.
//!
//! [`HummNode`] is one peer: an agent key, a replicated log, the lifecycle
//! engine and the index over it. It exposes the encrypted-content operations
//! applications call. [`LocalNetwork`] wires several nodes together
//! in-process and propagates records between them on demand.

pub mod config;
pub mod error;
pub mod network;
pub mod node;
pub mod telemetry;

pub use config::NodeConfig;
pub use error::{SdkError, SdkResult};
pub use network::{LocalNetwork, NetworkSyncReport};
pub use node::{EncryptedContent, HummNode};
pub use telemetry::init_tracing;

// Re-export key types
pub use humm_content::{CreateInput, EntryHandle, ErrorKind, Head, TombstoneHandle};
pub use humm_index::{DynamicLink, IndexKey};
pub use humm_types::{
    AccessControlList, AclRole, AgentPubKey, ContentHash, ContentHeader, EntityRef, PublicKeyAcl,
    Timestamp,
};
