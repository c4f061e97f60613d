//! Replicated action log for the Humm content store.
//!
//! Every write a peer makes (a content version, a tombstone, an index link
//! or its retraction) is an immutable, signed [`Action`] addressed by the
//! hash of its canonical encoding. The log is the only owner of record
//! state; the lifecycle engine and index manager derive everything else.
//!
//! # Backends
//!
//! All backends implement the [`ReplicatedLog`] trait:
//!
//! - [`InMemoryLog`] -- `HashMap`-based log for tests and embedding
//!
//! # Rules
//!
//! 1. Records are immutable once committed; committing the same record twice
//!    is a no-op that returns the same hash.
//! 2. Every record is signature-checked against its author before it is
//!    accepted, whether it was written locally or arrived by gossip.
//! 3. Causal dependencies (the version an update replaces, the target of a
//!    tombstone or link) must already be present; otherwise the record is
//!    rejected with [`LogError::MissingDependency`] and may be retried.
//! 4. Nothing is ever removed. Deletion and unlinking are new records.

pub mod action;
pub mod agent;
pub mod error;
pub mod hlc;
pub mod memory;
pub mod traits;

pub use action::{Action, CommitOp, LinkOp, Op, Record, SignedAction, TombstoneOp, UnlinkOp};
pub use agent::Agent;
pub use error::{LogError, LogResult};
pub use hlc::HybridLogicalClock;
pub use memory::InMemoryLog;
pub use traits::ReplicatedLog;
