//! # themekey-notify — Buyer Notification
//!
//! Delivers license keys to buyers after issuance. One consolidated email
//! per order, listing every key with activation instructions.
//!
//! ## Architecture
//!
//! The [`Notifier`] trait is the only path issuance takes to reach the
//! buyer. Delivery failures are reported to the caller but are never fatal
//! to the triggering request — records already created stay created.
//!
//! Implementations:
//! - [`ResendNotifier`] — the transactional email API used in production.
//! - [`LogNotifier`] — logs the send via `tracing`; used when no email
//!   credentials are configured (development mode).

pub mod config;
pub mod render;
pub mod resend;

pub use config::{ConfigError, NotifyConfig};
pub use render::EmailContent;
pub use resend::ResendNotifier;

use async_trait::async_trait;
use thiserror::Error;

use themekey_core::Contact;

/// Errors from outbound notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Transport-level failure reaching the email API.
    #[error("email transport error: {source}")]
    Http {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The email API answered with a non-success status.
    #[error("email API error (status {status}): {body}")]
    Api {
        /// HTTP status returned by the API.
        status: u16,
        /// Response body, for operator diagnostics.
        body: String,
    },

    /// The contact has no deliverable address.
    #[error("contact has no email address")]
    NoAddress,

    /// The notifier was constructed from unusable configuration.
    #[error("notifier configuration error: {0}")]
    Config(String),
}

/// Outbound notification boundary.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message to `contact`. Bounded by the implementation's
    /// timeout; safe to retry.
    async fn send(&self, contact: &Contact, subject: &str, html: &str)
        -> Result<(), NotifyError>;
}

/// Notifier that only records the send in the log stream.
///
/// Stands in for the email API when `RESEND_API_KEY` is absent, so
/// development issuance flows run end to end without sending mail.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        contact: &Contact,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError> {
        if !contact.has_email() {
            return Err(NotifyError::NoAddress);
        }
        tracing::info!(
            to = %contact.email,
            subject,
            body_bytes = html.len(),
            "notifier disabled — logging email instead of sending"
        );
        Ok(())
    }
}
