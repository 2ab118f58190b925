//! Confirmation email sent once a signup is on the list.
//!
//! Delivery is best-effort: callers log a [`NotifyError`] and carry on.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use crate::common::config::Config;

pub const CONFIRMATION_SUBJECT: &str = "Thanks for your curiosity";

pub const CONFIRMATION_HTML: &str = r#"<div style="font-family: system-ui, -apple-system, Segoe UI, Roboto, sans-serif;">
  <h2 style="margin:0 0 8px;">Thanks for your curiosity 💌</h2>
  <p style="margin:0 0 12px;">You are on the waitlist. We will keep you posted.</p>
  <p style="margin:0 0 12px;">Meanwhile, follow us on X/Twitter.</p>
</div>"#;

pub const CONFIRMATION_TEXT: &str =
    "Thanks for your curiosity! You are on the waitlist. We will keep you posted.";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("request to email provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_confirmation(&self, to: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send_confirmation(&self, to: &str) -> Result<(), NotifyError> {
        (**self).send_confirmation(to).await
    }
}

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends through the Resend `POST /emails` API.
pub struct ResendNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            client,
            &config.resend_api_url,
            &config.resend_api_key,
            &config.email_from,
        )
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send_confirmation(&self, to: &str) -> Result<(), NotifyError> {
        let payload = EmailPayload {
            from: &self.from,
            to,
            subject: CONFIRMATION_SUBJECT,
            html: CONFIRMATION_HTML,
            text: CONFIRMATION_TEXT,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
