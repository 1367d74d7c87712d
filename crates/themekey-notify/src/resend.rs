//! # Resend Email Client
//!
//! Thin typed client for the Resend transactional email API.
//! One endpoint is used: `POST /emails`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use themekey_core::Contact;

use crate::{NotifyConfig, Notifier, NotifyError};

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

/// Notifier backed by the Resend transactional email API.
#[derive(Debug, Clone)]
pub struct ResendNotifier {
    http: reqwest::Client,
    api_base: url::Url,
    from_address: String,
}

impl ResendNotifier {
    /// Create a notifier from configuration.
    ///
    /// The underlying HTTP client carries the bearer credential and an
    /// explicit request timeout.
    pub fn new(config: NotifyConfig) -> Result<Self, NotifyError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| {
                NotifyError::Config("API key is not a valid header value".to_string())
            })?;
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| NotifyError::Http { source: e })?;

        Ok(Self {
            http,
            api_base: config.api_base,
            from_address: config.from_address,
        })
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(
        &self,
        contact: &Contact,
        subject: &str,
        html: &str,
    ) -> Result<(), NotifyError> {
        if !contact.has_email() {
            return Err(NotifyError::NoAddress);
        }

        let url = format!("{}emails", self.api_base);
        let req = SendEmailRequest {
            from: &self.from_address,
            to: vec![&contact.email],
            subject,
            html,
        };

        let resp = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await
            .map_err(|e| NotifyError::Http { source: e })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Api { status, body });
        }

        tracing::info!(to = %contact.email, subject, "license email sent");
        Ok(())
    }
}
