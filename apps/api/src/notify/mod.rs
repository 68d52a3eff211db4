//! Transactional email. The only module that talks to the email function.
//!
//! Sends happen after the database transaction commits. A failed send is
//! logged and reported to the caller; it never undoes the status change.

pub mod templates;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email function returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

/// Carried in `AppState` as `Arc<dyn EmailNotifier>`.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, Serialize)]
struct EmailFunctionRequest<'a> {
    from: &'a str,
    to: &'a str,
    to_name: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Posts messages to an HTTP email function (`{from, to, to_name, subject, html}`).
pub struct HttpEmailNotifier {
    client: Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpEmailNotifier {
    pub fn new(url: String, api_key: Option<String>, from: String) -> Result<Self, NotifyError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            url,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl EmailNotifier for HttpEmailNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let body = EmailFunctionRequest {
            from: &self.from,
            to: &message.to,
            to_name: &message.to_name,
            subject: &message.subject,
            html: &message.html,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Used when no email function is configured: records what would have been sent.
pub struct LogNotifier;

#[async_trait]
impl EmailNotifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        info!(
            "Email (not sent, no EMAIL_FUNCTION_URL): to={} subject={:?}",
            message.to, message.subject
        );
        Ok(())
    }
}

/// Sends once, without retry. Returns whether the email went out.
pub async fn deliver(notifier: &dyn EmailNotifier, message: &EmailMessage) -> bool {
    match notifier.send(message).await {
        Ok(()) => {
            info!("Sent email {:?} to {}", message.subject, message.to);
            true
        }
        Err(e) => {
            warn!("Failed to send email {:?} to {}: {e}", message.subject, message.to);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingNotifier;

    #[async_trait]
    impl EmailNotifier for FailingNotifier {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected {
                status: 502,
                message: "upstream down".to_string(),
            })
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "asha@example.edu".to_string(),
            to_name: "Asha".to_string(),
            subject: "Interview scheduled".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deliver_reports_success() {
        assert!(deliver(&LogNotifier, &message()).await);
    }

    #[tokio::test]
    async fn test_deliver_swallows_failure() {
        assert!(!deliver(&FailingNotifier, &message()).await);
    }
}
