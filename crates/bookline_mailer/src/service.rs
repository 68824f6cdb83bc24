// --- File: crates/bookline_mailer/src/service.rs ---
use bookline_common::http::client::HTTP_CLIENT;
use bookline_common::services::{BoxFuture, NotificationResult, NotificationService};
use bookline_config::{AppConfig, MailerConfig};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Mailer-specific error types.
#[derive(Error, Debug)]
pub enum MailerError {
    /// Error occurred during a mail API request
    #[error("Mail API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the mail API
    #[error("Mail API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Missing or incomplete mailer configuration
    #[error("Mailer configuration missing or incomplete")]
    ConfigError,
}

/// The JSON body the transactional mail provider expects.
#[derive(Serialize, Debug)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Email notification service backed by a transactional mail HTTP API.
pub struct MailerNotificationService {
    config: Arc<AppConfig>,
}

impl MailerNotificationService {
    /// Create a new mailer notification service
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    fn mailer_config(&self) -> Result<&MailerConfig, MailerError> {
        let mailer_config = self.config.mailer.as_ref().ok_or(MailerError::ConfigError)?;
        if mailer_config.api_url.is_empty() || mailer_config.api_key.is_empty() {
            return Err(MailerError::ConfigError);
        }
        Ok(mailer_config)
    }

    /// Deliver a plain-text email through the configured provider.
    pub async fn deliver(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotificationResult, MailerError> {
        let mailer_config = self.mailer_config()?;

        let message = OutgoingMessage {
            from: &mailer_config.from_address,
            to,
            subject,
            text: body,
        };

        info!("Sending notification email to {}: {}", to, subject);
        let resp = HTTP_CLIENT
            .post(&mailer_config.api_url)
            .bearer_auth(&mailer_config.api_key)
            .json(&message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // Bubble up the provider's JSON error so it can be debugged
            let body_text = resp.text().await.unwrap_or_default();
            tracing::error!("Mail API returned {}: {}", status, body_text);
            return Err(MailerError::ApiError {
                status_code: status.as_u16(),
                message: body_text,
            });
        }

        let payload: serde_json::Value = resp.json().await.unwrap_or_default();
        let id = payload
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::info!("Email sent to {}", to);
        Ok(NotificationResult {
            id,
            status: "sent".to_string(),
        })
    }
}

impl NotificationService for MailerNotificationService {
    type Error = MailerError;

    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        // Clone the values to avoid lifetime issues
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();

        Box::pin(async move { self.deliver(&to, &subject, &body).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookline_config::ServerConfig;

    fn config_without_mailer() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            use_mailer: true,
            database: None,
            mailer: None,
            booking: None,
            cors: None,
        })
    }

    #[tokio::test]
    async fn missing_mailer_config_is_a_config_error() {
        let service = MailerNotificationService::new(config_without_mailer());
        let result = service.deliver("ops@example.com", "subject", "body").await;
        assert!(matches!(result, Err(MailerError::ConfigError)));
    }

    #[tokio::test]
    async fn blank_api_key_is_a_config_error() {
        let mut config = (*config_without_mailer()).clone();
        config.mailer = Some(MailerConfig {
            api_url: "https://mail.example.com/v1/messages".to_string(),
            api_key: String::new(),
            from_address: "noreply@example.com".to_string(),
            notify_address: "ops@example.com".to_string(),
        });
        let service = MailerNotificationService::new(Arc::new(config));
        let result = service.deliver("ops@example.com", "subject", "body").await;
        assert!(matches!(result, Err(MailerError::ConfigError)));
    }

    #[test]
    fn outgoing_message_uses_provider_field_names() {
        let message = OutgoingMessage {
            from: "noreply@example.com",
            to: "ops@example.com",
            subject: "New Booking: Bridal",
            text: "You have received a new booking.",
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["from"], "noreply@example.com");
        assert_eq!(value["to"], "ops@example.com");
        assert_eq!(value["subject"], "New Booking: Bridal");
        assert_eq!(value["text"], "You have received a new booking.");
    }
}
