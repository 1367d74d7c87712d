//! # themekey-store — Record Store Boundary
//!
//! The persistence boundary of the licensing stack. License records live in
//! an external key-indexed table (historically a spreadsheet); this crate
//! defines the [`RecordStore`] trait that the rest of the workspace
//! programs against, plus the in-memory implementation used by the service
//! binary and the test suites.
//!
//! ## Contract
//!
//! - Every operation is bounded (implementations enforce their own
//!   timeouts) and safe to retry: re-reading a row or re-writing the same
//!   target row has no side effect beyond the intended one.
//! - `find_by_key` followed by `write` is read-modify-write with
//!   last-writer-wins semantics at minimum. The in-memory implementation
//!   strengthens each individual operation to be atomic under a write
//!   lock; an external implementation targeting correctness under
//!   concurrent activation of the same key should add a per-key
//!   compare-and-swap at this boundary.
//! - Failures surface as [`StoreError`] and map to the upstream-failure
//!   taxonomy at the API layer; callers retry the whole operation.

pub mod memory;

pub use memory::MemoryStore;

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use themekey_core::LicenseKey;
use themekey_state::LicenseRecord;

/// Errors from the record store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing table could not be reached or answered abnormally.
    /// Transient; the caller may retry the whole operation.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// An insert collided with an existing row for the same key.
    #[error("duplicate license key: {0}")]
    DuplicateKey(LicenseKey),
}

/// Key-indexed table of license records.
///
/// Implementations must be cheap to share (`Arc<dyn RecordStore>`) and
/// callable from concurrent request handlers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up the record for `key`, if any.
    async fn find_by_key(&self, key: &LicenseKey) -> Result<Option<LicenseRecord>, StoreError>;

    /// Create a new row. Fails with [`StoreError::DuplicateKey`] if the
    /// key already exists — the key generator excludes existing keys, so a
    /// collision here indicates a racing issuance.
    async fn insert(&self, record: LicenseRecord) -> Result<(), StoreError>;

    /// Write back an updated record over its existing row (upsert).
    async fn write(&self, record: &LicenseRecord) -> Result<(), StoreError>;

    /// The full set of keys in circulation, used as the generator's
    /// exclusion set at issuance time.
    async fn existing_keys(&self) -> Result<HashSet<LicenseKey>, StoreError>;
}
