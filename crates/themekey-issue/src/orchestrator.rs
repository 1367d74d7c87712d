//! # Issuance Orchestrator
//!
//! Creates license records for a purchase event and notifies the buyer.
//! Storage failures abort issuance; notification failures never do.

use chrono::NaiveDate;
use rand_core::OsRng;
use thiserror::Error;

use themekey_core::{key, LicenseKey};
use themekey_notify::{render, Notifier};
use themekey_state::LicenseRecord;
use themekey_store::{RecordStore, StoreError};

use crate::order::{ProductMatch, PurchaseEvent};

/// What issuance produced for one purchase event.
#[derive(Debug, Clone)]
pub struct IssuanceOutcome {
    /// Reference of the originating order.
    pub order_ref: String,
    /// Keys created, in sequence-label order. Empty for non-theme orders.
    pub keys: Vec<LicenseKey>,
    /// Whether the consolidated email reached the notifier successfully.
    pub notified: bool,
}

impl IssuanceOutcome {
    /// Total number of licenses issued.
    pub fn total(&self) -> usize {
        self.keys.len()
    }
}

/// Errors that abort issuance.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The record store failed; no further records were created.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Issue licenses for one purchase event.
///
/// Computes the licenses owed from the matching line items; a zero total is
/// a successful no-op. Otherwise mints unique keys against the store's full
/// key set, inserts one `new` unbound record per key with `i/total`
/// sequence labels, and sends one consolidated email listing every key.
///
/// Records are not rolled back on notification failure — the outcome
/// reports `notified: false` and the failure is logged.
pub async fn issue_for_order(
    store: &dyn RecordStore,
    notifier: &dyn Notifier,
    matcher: &ProductMatch,
    event: &PurchaseEvent,
    today: NaiveDate,
) -> Result<IssuanceOutcome, IssueError> {
    let order_ref = event.order_ref();
    let total = matcher.total_licenses(event);

    if total == 0 {
        tracing::info!(order_ref = %order_ref, "order carries no theme line items — nothing to issue");
        return Ok(IssuanceOutcome {
            order_ref,
            keys: Vec::new(),
            notified: false,
        });
    }

    let existing = store.existing_keys().await?;
    let keys = key::generate_batch(&mut OsRng, total as usize, &existing);

    let buyer = event.buyer();
    let contact = buyer.clone().unwrap_or_else(|| {
        tracing::warn!(order_ref = %order_ref, "order carries no buyer email — issuing without contact");
        themekey_core::Contact::new("", "")
    });

    for (i, license_key) in keys.iter().enumerate() {
        let record = LicenseRecord::issued(
            license_key.clone(),
            order_ref.clone(),
            contact.clone(),
            format!("{}/{}", i + 1, total),
            today,
        );
        store.insert(record).await?;
    }

    tracing::info!(order_ref = %order_ref, total, "license records created");

    let notified = match &buyer {
        Some(contact) => {
            let email = render::license_email(&order_ref, contact, &keys);
            match notifier.send(contact, &email.subject, &email.html).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        order_ref = %order_ref,
                        to = %contact.email,
                        error = %e,
                        "license email delivery failed — records are kept"
                    );
                    false
                }
            }
        }
        None => false,
    };

    Ok(IssuanceOutcome {
        order_ref,
        keys,
        notified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use themekey_core::Contact;
    use themekey_notify::NotifyError;
    use themekey_store::MemoryStore;

    /// Notifier double that records sends and can be told to fail.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(
            &self,
            contact: &Contact,
            subject: &str,
            _html: &str,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Api {
                    status: 500,
                    body: "simulated outage".to_string(),
                });
            }
            self.sent
                .lock()
                .push((contact.email.clone(), subject.to_string()));
            Ok(())
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn matcher() -> ProductMatch {
        ProductMatch {
            sku: "ThemeKey".to_string(),
            title_marker: "ThemeKey Theme".to_string(),
        }
    }

    fn theme_order(quantity: u32, title: &str) -> PurchaseEvent {
        serde_json::from_value(serde_json::json!({
            "id": 12345,
            "order_number": "1042",
            "customer": {"email": "buyer@example.com", "first_name": "Ada", "last_name": "Lovelace"},
            "line_items": [
                {"sku": "ThemeKey", "title": title, "quantity": quantity}
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn issues_one_record_per_license_with_sequence_labels() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let event = theme_order(1, "ThemeKey Theme — 3 licenses");

        let outcome = issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.order_ref, "1042");
        assert!(outcome.notified);
        assert_eq!(store.len(), 3);

        for (i, license_key) in outcome.keys.iter().enumerate() {
            let record = store.find_by_key(license_key).await.unwrap().unwrap();
            assert_eq!(record.sequence_label, format!("{}/3", i + 1));
            assert_eq!(record.order_ref, "1042");
            assert_eq!(record.owner_contact.email, "buyer@example.com");
            assert!(!record.is_bound());
        }
    }

    #[tokio::test]
    async fn non_theme_order_is_a_noop() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let event: PurchaseEvent = serde_json::from_value(serde_json::json!({
            "order_number": "77",
            "line_items": [{"sku": "GiftCard", "title": "Gift card", "quantity": 2}]
        }))
        .unwrap();

        let outcome = issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        assert_eq!(outcome.total(), 0);
        assert!(!outcome.notified);
        assert!(store.is_empty());
        assert!(notifier.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn one_email_for_the_whole_batch() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let event = theme_order(2, "ThemeKey Theme — 2 licenses");

        issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        let sent = notifier.sent.lock();
        assert_eq!(sent.len(), 1, "exactly one consolidated email");
        assert_eq!(sent[0].0, "buyer@example.com");
        assert!(sent[0].1.contains("4 ThemeKey licenses"));
    }

    #[tokio::test]
    async fn notification_failure_keeps_records() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let event = theme_order(2, "ThemeKey Theme");

        let outcome = issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        assert_eq!(outcome.total(), 2);
        assert!(!outcome.notified);
        assert_eq!(store.len(), 2, "records survive delivery failure");
    }

    #[tokio::test]
    async fn order_without_buyer_issues_but_does_not_notify() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let event: PurchaseEvent = serde_json::from_value(serde_json::json!({
            "id": 555,
            "line_items": [{"sku": "ThemeKey", "quantity": 1}]
        }))
        .unwrap();

        let outcome = issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        assert_eq!(outcome.total(), 1);
        assert_eq!(outcome.order_ref, "555");
        assert!(!outcome.notified);
        assert!(notifier.sent.lock().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn issued_keys_avoid_existing_store_keys() {
        let existing = LicenseRecord::issued(
            themekey_core::LicenseKey::parse("LIC-0000-0000-0001").unwrap(),
            "old",
            Contact::new("old@example.com", ""),
            "1/1",
            day(),
        );
        let store = MemoryStore::seeded([existing]);
        let notifier = RecordingNotifier::default();
        let event = theme_order(1, "ThemeKey Theme — 5 licenses");

        let outcome = issue_for_order(&store, &notifier, &matcher(), &event, day())
            .await
            .unwrap();

        assert_eq!(outcome.total(), 5);
        assert_eq!(store.len(), 6);
        for license_key in &outcome.keys {
            assert_ne!(license_key.as_str(), "LIC-0000-0000-0001");
        }
    }
}
