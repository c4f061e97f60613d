//! Content lifecycle engine.
//!
//! The [`LifecycleEngine`] turns client writes into signed log records and
//! drives the [`IndexManager`](humm_index::IndexManager). It holds no entry
//! state of its own: every read walks the update chain in the log from the
//! root forward and elects the head on the spot.
//!
//! # Chains
//!
//! A chain starts with a root version. Each update names the version it
//! supersedes (`previous`) and the root (`original`). Concurrent updates from
//! the same head fork the chain; forks are kept and resolved by
//! [`Head::elect`]. A tombstone on any version deletes the whole chain.

pub mod chain;
pub mod config;
pub mod engine;
pub mod entry;
pub mod error;
pub mod validation;

pub use chain::{ChainView, Head, Version};
pub use config::EngineConfig;
pub use engine::LifecycleEngine;
pub use entry::{ContentEntry, CreateInput, EntryHandle, TombstoneHandle, UpdateInput};
pub use error::{ContentError, ContentResult, ErrorKind};
pub use validation::{validate_entry, Violation, ViolationKind};
