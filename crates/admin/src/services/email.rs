//! Transaction notifications through a mail relay.
//!
//! Sends one templated email per submitted payment via `EmailJS`. The relay
//! renders the template; this module only fills in its parameters. A failed
//! send is reported back to the caller and never retried or queued.

use std::future::Future;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use elite_cards_core::{LineItem, Price};

use crate::config::EmailConfig;

/// `EmailJS` REST endpoint for template sends.
const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Errors that can occur when sending through the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay rejected the send.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Relay keys are still placeholders.
    #[error("email relay is not configured")]
    NotConfigured,
}

/// What the relay answered on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: u16,
    pub text: String,
}

/// A templated mail relay.
pub trait MailRelay: Send + Sync {
    /// Send `params` through the relay's `template_id`.
    fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
        public_key: &SecretString,
    ) -> impl Future<Output = Result<RelayResponse, RelayError>> + Send;
}

/// `EmailJS` REST client.
#[derive(Debug, Clone, Default)]
pub struct EmailJsClient {
    client: reqwest::Client,
}

impl EmailJsClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

impl MailRelay for EmailJsClient {
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
        public_key: &SecretString,
    ) -> Result<RelayResponse, RelayError> {
        let body = SendRequest {
            service_id,
            template_id,
            user_id: public_key.expose_secret(),
            template_params: params,
        };

        let response = self
            .client
            .post(EMAILJS_SEND_URL)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !(200..300).contains(&status) {
            return Err(RelayError::Api {
                status,
                message: text,
            });
        }

        Ok(RelayResponse { status, text })
    }
}

/// A payment to notify the operator about.
#[derive(Debug, Clone)]
pub struct TransactionNotice {
    pub customer_email: String,
    /// Amount in US dollars.
    pub amount: Decimal,
    pub payment_id: Option<String>,
    pub items: Vec<LineItem>,
}

/// Parameters handed to the relay template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub from_name: String,
    pub subject: String,
    pub customer_email: String,
    pub amount: String,
    pub payment_id: String,
    pub timestamp: String,
    pub cart_items: String,
    pub total_items: usize,
}

/// Result of a notification attempt.
#[derive(Debug)]
pub enum NotificationOutcome {
    Sent(RelayResponse),
    Failed(RelayError),
}

impl NotificationOutcome {
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// Formats and sends transaction notifications.
#[derive(Debug, Clone)]
pub struct EmailNotifier<R> {
    relay: R,
    config: EmailConfig,
}

impl<R: MailRelay> EmailNotifier<R> {
    #[must_use]
    pub const fn new(relay: R, config: EmailConfig) -> Self {
        Self { relay, config }
    }

    /// Template parameters for `notice`, stamped with `now`.
    #[must_use]
    pub fn build_params(&self, notice: &TransactionNotice, now: DateTime<Utc>) -> TemplateParams {
        let cart_items = notice
            .items
            .iter()
            .map(|item| {
                format!(
                    "{} x{} - {}",
                    item.title,
                    item.quantity,
                    Price::usd(item.line_total())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        TemplateParams {
            to_email: self.config.admin_email.clone(),
            from_name: self.config.from_name.clone(),
            subject: self.config.subject.clone(),
            customer_email: notice.customer_email.clone(),
            amount: Price::usd(notice.amount).to_string(),
            payment_id: notice
                .payment_id
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            cart_items,
            total_items: notice.items.len(),
        }
    }

    /// Send a notification for `notice`.
    ///
    /// Unconfigured relay keys fail without contacting the relay.
    #[instrument(skip(self, notice), fields(customer = %notice.customer_email))]
    pub async fn send_transaction_notification(
        &self,
        notice: &TransactionNotice,
    ) -> NotificationOutcome {
        if !self.config.is_configured() {
            warn!("Email relay keys are placeholders, notification not sent");
            return NotificationOutcome::Failed(RelayError::NotConfigured);
        }

        let params = self.build_params(notice, Utc::now());
        match self
            .relay
            .send(
                &self.config.service_id,
                &self.config.template_id,
                &params,
                &self.config.public_key,
            )
            .await
        {
            Ok(response) => {
                info!(status = response.status, "Transaction notification sent");
                NotificationOutcome::Sent(response)
            }
            Err(e) => {
                warn!(error = %e, "Transaction notification failed");
                NotificationOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct NeverCalled;

    impl MailRelay for NeverCalled {
        async fn send(
            &self,
            _service_id: &str,
            _template_id: &str,
            _params: &TemplateParams,
            _public_key: &SecretString,
        ) -> Result<RelayResponse, RelayError> {
            panic!("relay must not be called");
        }
    }

    fn notice() -> TransactionNotice {
        TransactionNotice {
            customer_email: "kofi@example.com".to_string(),
            amount: Decimal::from(135),
            payment_id: None,
            items: vec![
                LineItem {
                    title: "Basic Mastercard".to_string(),
                    quantity: 1,
                    unit_price: Decimal::from(35),
                },
                LineItem {
                    title: "Premium Mastercard".to_string(),
                    quantity: 1,
                    unit_price: Decimal::from(100),
                },
            ],
        }
    }

    #[test]
    fn test_build_params() {
        let notifier = EmailNotifier::new(NeverCalled, EmailConfig::default());
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let params = notifier.build_params(&notice(), now);

        assert_eq!(params.to_email, "adomanuacquah.dev@gmail.com");
        assert_eq!(params.from_name, "ElitCards System");
        assert_eq!(params.subject, "New Transaction Notification - ElitCards");
        assert_eq!(params.amount, "$135.00");
        assert_eq!(params.payment_id, "N/A");
        assert_eq!(params.timestamp, "2024-06-01T09:30:00.000Z");
        assert_eq!(
            params.cart_items,
            "Basic Mastercard x1 - $35.00\nPremium Mastercard x1 - $100.00"
        );
        assert_eq!(params.total_items, 2);
    }

    #[tokio::test]
    async fn test_placeholder_keys_fail_without_sending() {
        let notifier = EmailNotifier::new(NeverCalled, EmailConfig::default());
        let outcome = notifier.send_transaction_notification(&notice()).await;
        match outcome {
            NotificationOutcome::Failed(e) => {
                assert_eq!(e.to_string(), "email relay is not configured");
            }
            NotificationOutcome::Sent(_) => panic!("expected failure"),
        }
    }
}
