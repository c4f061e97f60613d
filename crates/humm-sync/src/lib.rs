//! Peer-to-peer propagation of log records.
//!
//! Peers exchange record hashes, fetch what they lack in batches, and apply
//! the records locally. Every received record goes through the same
//! validation as a local write; records whose dependencies have not arrived
//! yet are deferred and retried as the batch fills in.

pub mod apply;
pub mod codec;
pub mod engine;
pub mod error;
pub mod negotiation;
pub mod transport;
pub mod types;

pub use apply::CausalApplier;
pub use engine::GossipEngine;
pub use error::{SyncError, SyncResult};
pub use negotiation::NegotiationEngine;
pub use transport::{GossipTransport, LocalTransport};
pub use types::{ApplyReport, Negotiation, PullReport, PushReport};
