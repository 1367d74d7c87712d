//! # themekey-issue — Issuance Orchestration
//!
//! Turns a purchase event from the commerce platform into license records
//! and one consolidated buyer email.
//!
//! ## Flow
//!
//! ```text
//! order webhook ──▶ match theme line items ──▶ totalLicenses
//!                                                   │ 0 → no-op success
//!                                                   ▼
//!                              generate unique keys (exclusion set from store)
//!                                                   ▼
//!                              insert one record per key (status: new, unbound)
//!                                                   ▼
//!                              send one email listing every key (best effort)
//! ```
//!
//! Issuance is deliberately not transactional with notification: once
//! records are written they stay written, and a delivery failure is
//! reported as `notified: false` rather than rolled back.

pub mod order;
pub mod orchestrator;

pub use order::{LineItem, ProductMatch, PurchaseEvent};
pub use orchestrator::{issue_for_order, IssuanceOutcome, IssueError};
