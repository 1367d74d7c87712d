//! # themekey-core — Foundational Types for ThemeKey Licensing
//!
//! This crate is the bedrock of the ThemeKey licensing stack. It defines the
//! type-system primitives shared by every other crate in the workspace and
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`LicenseKey`] and
//!    [`StoreIdentity`] are validated newtypes — no bare strings for
//!    identifiers that carry comparison semantics.
//!
//! 2. **Canonical identity comparison.** ALL store identity comparison flows
//!    through [`StoreIdentity::normalize`]. No raw string equality for
//!    identities. Ever. This prevents the protocol/port/subdomain split
//!    defect class by construction.
//!
//! 3. **Explicit exclusion sets for key generation.** [`key::generate`]
//!    requires the caller to supply the set of keys already in circulation;
//!    uniqueness is enforced with a retry loop, not a best-effort draw.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `themekey-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod contact;
pub mod identity;
pub mod key;

// Re-export primary types for ergonomic imports.
pub use contact::Contact;
pub use identity::{StoreIdentity, STOREFRONT_SUFFIX};
pub use key::{generate, generate_batch, KeyError, LicenseKey};
