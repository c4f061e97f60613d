//! Secondary indexes over the replicated log.
//!
//! An index entry is a signed link record from an anchor (the hash of an
//! [`IndexKey`]) to the entry hash that was current when the link was made.
//! Links are advisory: [`IndexManager::query`] resolves every target to its
//! live head and re-checks that the head still belongs under the key, so
//! stale links never surface.

pub mod error;
pub mod key;
pub mod manager;

pub use error::{IndexError, IndexResult};
pub use key::{DynamicLink, IndexFamily, IndexKey, IndexedEntry};
pub use manager::{IndexManager, IndexReport, LiveResolver};
