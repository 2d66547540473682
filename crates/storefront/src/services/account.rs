//! Backend account and payment operations.
//!
//! The backend for these operations has not been wired up. Each call logs a
//! warning and returns a sentinel "unsuccessful" value instead of an error,
//! so callers can treat them like any other soft failure.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use elite_cards_core::{CurrencyCode, SessionUser, Transaction};

/// A payment as submitted from checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSubmission {
    pub user_email: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(rename = "amountGHS")]
    pub amount_ghs: Decimal,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_screenshot: Option<String>,
}

/// Outcome of [`AccountService::record_payment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub success: bool,
    /// Client-side id (epoch milliseconds) assigned to the attempt.
    pub local_id: String,
}

/// Outcome of a backend diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendCheck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendCheck {
    fn not_implemented() -> Self {
        Self {
            success: false,
            error: Some("Not implemented".to_string()),
        }
    }
}

/// Account and payment operations against the (unwired) backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountService;

#[allow(clippy::unused_async)]
impl AccountService {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Always `None`: there is no backend to authenticate against.
    pub async fn authenticate_user(&self, email: &str, _password: &str) -> Option<SessionUser> {
        warn!(email = %email, "authenticate_user not implemented");
        None
    }

    /// Echoes the user back without registering it anywhere.
    pub async fn add_user(&self, user: SessionUser) -> SessionUser {
        warn!(email = %user.email, "add_user not implemented");
        user
    }

    /// Always `false`.
    #[must_use]
    pub fn user_exists(&self, _email: &str) -> bool {
        false
    }

    /// Never records; reports failure with a client-side id.
    pub async fn record_payment(&self, payment: &PaymentSubmission) -> PaymentReceipt {
        warn!(user_email = %payment.user_email, amount = %payment.amount, "record_payment not implemented");
        PaymentReceipt {
            success: false,
            local_id: Utc::now().timestamp_millis().to_string(),
        }
    }

    /// Always empty.
    pub async fn recent_orders(&self, user_email: &str) -> Vec<Transaction> {
        warn!(user_email = %user_email, "recent_orders not implemented");
        Vec::new()
    }

    /// Always reports "Not implemented".
    pub async fn test_backend_connection(&self) -> BackendCheck {
        warn!("test_backend_connection not implemented");
        BackendCheck::not_implemented()
    }

    /// Always reports "Not implemented".
    pub async fn test_payment_submission(&self) -> BackendCheck {
        warn!("test_payment_submission not implemented");
        BackendCheck::not_implemented()
    }
}
