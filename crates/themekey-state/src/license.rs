//! # License Record & Activation State Machine
//!
//! One [`LicenseRecord`] per issued license. The record is created unbound
//! at issuance and from then on is mutated exclusively by the transition
//! methods here, in response to activation and release requests from
//! deployed themes.
//!
//! ## States
//!
//! ```text
//! New ──first activation──▶ Active
//! Active ──activation from the bound store──▶ Active
//! Active ──activation from a different store──▶ Inactive  (duplicate binding)
//! Inactive ──release by the bound store──▶ Active (unbound)
//! Invalid ──▶ (terminal)
//! ```
//!
//! ## Duplicate-Binding Detection
//!
//! An activation from a store whose normalized identity differs from a
//! non-empty binding is a duplicate-binding conflict: the record is
//! quarantined (`Inactive`) and the original binding is preserved as
//! evidence of which store held the license first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use themekey_core::{Contact, LicenseKey, StoreIdentity};

// ─── License Status ──────────────────────────────────────────────────

/// The lifecycle status of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    /// Issued, never activated.
    New,
    /// Bound to a store and valid, or released and free for rebinding.
    Active,
    /// Quarantined after a duplicate-binding conflict.
    Inactive,
    /// Permanently invalidated by the operator (terminal).
    Invalid,
}

impl LicenseStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// The wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Verdicts & Errors ───────────────────────────────────────────────

/// Why an activation was rejected without a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The license is `Invalid` — no activation will ever succeed.
    PermanentlyInvalid,
    /// The license is `Inactive` and must be released by its owner first.
    TemporarilyInactive,
}

impl RejectReason {
    /// Human-readable rejection message for API responses.
    pub fn message(&self) -> &'static str {
        match self {
            Self::PermanentlyInvalid => "license is permanently invalid",
            Self::TemporarilyInactive => "license is temporarily inactive",
        }
    }
}

/// Outcome of a state-machine operation.
///
/// One sum type for every request-handling surface; each variant carries a
/// fixed meaning rather than an ad hoc bag of optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The license is active and bound to the requesting store.
    Accepted,
    /// The license was released and is free for rebinding.
    Released,
    /// The request was refused; the record is unchanged.
    Rejected(RejectReason),
    /// Duplicate-binding conflict; the record was quarantined.
    Conflict,
}

impl Verdict {
    /// Whether the requesting store holds a usable license after this verdict.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted | Self::Released)
    }

    /// Whether the operation mutated the record (and it must be persisted).
    pub fn mutates_record(&self) -> bool {
        matches!(self, Self::Accepted | Self::Released | Self::Conflict)
    }
}

/// Errors that abort a transition before any state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The request carried no store identity.
    #[error("missing store identity")]
    MissingIdentity,

    /// A release was requested by a store other than the bound one.
    #[error("license is bound to another store")]
    ReleaseForbidden,
}

// ─── Requested Action ────────────────────────────────────────────────

/// The action requested by the validation endpoint.
///
/// Only `"clear"` is special-cased; any other value — including no action
/// at all — is treated as an activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Bind and validate (the default).
    Activate,
    /// Release the license back into circulation.
    Clear,
}

impl Action {
    /// Map the optional request action string onto an [`Action`].
    pub fn from_request(action: Option<&str>) -> Self {
        match action {
            Some("clear") => Self::Clear,
            _ => Self::Activate,
        }
    }
}

// ─── License Record ──────────────────────────────────────────────────

/// A license record: one per issued license, keyed by [`LicenseKey`].
///
/// Created by the issuance orchestrator, mutated only by the transition
/// methods below, never deleted. `key`, `order_ref`, `owner_contact`,
/// `sequence_label`, and `created_at` are immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Opaque unique key, `LIC-XXXX-XXXX-XXXX`.
    pub key: LicenseKey,
    /// Originating purchase identifier.
    pub order_ref: String,
    /// Buyer the key was issued to.
    pub owner_contact: Contact,
    /// Store currently holding the license; empty when unbound.
    pub bound_identity: StoreIdentity,
    /// Current lifecycle status.
    pub status: LicenseStatus,
    /// Position within a multi-license order, `"i/N"`. Cosmetic.
    pub sequence_label: String,
    /// Issuance date.
    pub created_at: NaiveDate,
    /// Date of the last validation-triggering request.
    pub last_checked_at: NaiveDate,
}

impl LicenseRecord {
    /// Create a freshly issued, unbound record.
    pub fn issued(
        key: LicenseKey,
        order_ref: impl Into<String>,
        owner_contact: Contact,
        sequence_label: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            key,
            order_ref: order_ref.into(),
            owner_contact,
            bound_identity: StoreIdentity::unbound(),
            status: LicenseStatus::New,
            sequence_label: sequence_label.into(),
            created_at: today,
            last_checked_at: today,
        }
    }

    /// Whether the license is currently bound to a store.
    pub fn is_bound(&self) -> bool {
        !self.bound_identity.is_empty()
    }

    /// Dispatch a requested action onto the matching transition.
    pub fn apply(
        &mut self,
        action: Action,
        identity: &str,
        today: NaiveDate,
    ) -> Result<Verdict, TransitionError> {
        match action {
            Action::Activate => self.activate(identity, today),
            Action::Clear => self.release(identity, today),
        }
    }

    /// Activate the license for `claimed`, binding it on success.
    ///
    /// - Empty identity fails with [`TransitionError::MissingIdentity`].
    /// - `Invalid` and `Inactive` records are rejected unchanged.
    /// - A normalized identity mismatch against a non-empty binding is a
    ///   duplicate-binding conflict: the record is quarantined
    ///   (`Inactive`), the original binding is preserved as evidence.
    /// - Otherwise the record becomes `Active` bound to `claimed`.
    pub fn activate(
        &mut self,
        claimed: &str,
        today: NaiveDate,
    ) -> Result<Verdict, TransitionError> {
        let claimed = StoreIdentity::normalize(claimed);
        if claimed.is_empty() {
            return Err(TransitionError::MissingIdentity);
        }

        match self.status {
            LicenseStatus::Invalid => Ok(Verdict::Rejected(RejectReason::PermanentlyInvalid)),
            LicenseStatus::Inactive => Ok(Verdict::Rejected(RejectReason::TemporarilyInactive)),
            LicenseStatus::New | LicenseStatus::Active => {
                // Stored bindings predating this service may not be in
                // canonical form; normalization is idempotent.
                let bound = StoreIdentity::normalize(self.bound_identity.as_str());
                if bound.is_empty() || bound == claimed {
                    self.status = LicenseStatus::Active;
                    self.bound_identity = claimed;
                    self.last_checked_at = today;
                    Ok(Verdict::Accepted)
                } else {
                    self.status = LicenseStatus::Inactive;
                    self.last_checked_at = today;
                    Ok(Verdict::Conflict)
                }
            }
        }
    }

    /// Release the license back into circulation (the `clear` action).
    ///
    /// Only the bound store may release; an unbound license may be released
    /// by anyone. On success the binding is cleared and the record becomes
    /// `Active`, immediately re-bindable. `Invalid` records stay invalid.
    pub fn release(
        &mut self,
        requester: &str,
        today: NaiveDate,
    ) -> Result<Verdict, TransitionError> {
        if self.status == LicenseStatus::Invalid {
            return Ok(Verdict::Rejected(RejectReason::PermanentlyInvalid));
        }

        let bound = StoreIdentity::normalize(self.bound_identity.as_str());
        let requester = StoreIdentity::normalize(requester);
        if !bound.is_empty() && bound != requester {
            return Err(TransitionError::ReleaseForbidden);
        }

        self.bound_identity = StoreIdentity::unbound();
        self.status = LicenseStatus::Active;
        self.last_checked_at = today;
        Ok(Verdict::Released)
    }

    /// Evaluate an activation without recording anything.
    ///
    /// Same predicate as [`LicenseRecord::activate`], used by the asset
    /// gate: safe to retry and to run concurrently, never mutates.
    pub fn verify_only(&self, claimed: &str) -> Result<Verdict, TransitionError> {
        let claimed = StoreIdentity::normalize(claimed);
        if claimed.is_empty() {
            return Err(TransitionError::MissingIdentity);
        }

        match self.status {
            LicenseStatus::Invalid => Ok(Verdict::Rejected(RejectReason::PermanentlyInvalid)),
            LicenseStatus::Inactive => Ok(Verdict::Rejected(RejectReason::TemporarilyInactive)),
            LicenseStatus::New | LicenseStatus::Active => {
                let bound = StoreIdentity::normalize(self.bound_identity.as_str());
                if bound.is_empty() || bound == claimed {
                    Ok(Verdict::Accepted)
                } else {
                    Ok(Verdict::Conflict)
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
