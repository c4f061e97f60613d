//! Foundation types for the Humm content store.
//!
//! This crate provides the identity, temporal, and header types used
//! throughout the store. Every other Humm crate depends on `humm-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`]: Content-addressed identifier (BLAKE3 hash)
//! - [`AgentPubKey`]: Identity of the agent that authored a record
//! - [`Timestamp`]: Hybrid Logical Clock timestamp for causal ordering
//! - [`EntityRef`]: Opaque principal named in an access-control list
//! - [`AccessControlList`]: Role-partitioned entity sets (owner/admin/writer/reader)
//! - [`ContentHeader`]: Non-encrypted metadata carried by every content version

pub mod acl;
pub mod agent;
pub mod error;
pub mod hash;
pub mod header;
pub mod temporal;

pub use acl::{AccessControlList, AclRole, EntityRef, PublicKeyAcl};
pub use agent::AgentPubKey;
pub use error::TypeError;
pub use hash::ContentHash;
pub use header::ContentHeader;
pub use temporal::Timestamp;
