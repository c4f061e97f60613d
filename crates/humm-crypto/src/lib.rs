//! Cryptographic primitives for the Humm content store.
//!
//! Provides the content addressor (domain-separated BLAKE3 hashing of
//! structured values) and Ed25519 agent keys used to sign every record a
//! peer commits.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;
pub mod signer;

pub use hasher::{ContentHasher, HasherError};
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
