//! # themekey-state — License Activation State Machine
//!
//! Models the lifecycle of an issued theme license: first activation,
//! re-validation from the bound store, duplicate-binding detection when a
//! second store presents the same key, operator-visible quarantine, and
//! release back into circulation.
//!
//! ## States
//!
//! ```text
//! New ──activate──▶ Active ──same store──▶ Active
//!                     │
//!                     │ different store (duplicate binding)
//!                     ▼
//!                  Inactive ──release by owner──▶ Active (unbound)
//!
//!                  Invalid (terminal — set by the operator, never left)
//! ```
//!
//! ## Design
//!
//! The machine is pure: every operation takes the observation date as an
//! argument, performs no I/O, and mutates the record in place only on the
//! transitions that the contract says are recorded. Persistence is the
//! caller's concern — a store write failure leaves the caller free to
//! retry the whole operation, which is idempotent with respect to the
//! normalized target state.

pub mod license;

pub use license::{
    Action, LicenseRecord, LicenseStatus, RejectReason, TransitionError, Verdict,
};
