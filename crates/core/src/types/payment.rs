//! Admin-facing payment transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::TransactionId;
use super::price::CurrencyCode;
use super::status::PaymentStatus;

/// A submitted payment as shown on the dashboard.
///
/// The canonical record lives in the remote `payment_proofs` collection or,
/// when that is unreachable, in the local payments mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_email: String,
    /// Amount in US dollars.
    pub amount: Decimal,
    pub currency: CurrencyCode,
    /// Converted amount in Ghanaian cedis.
    #[serde(rename = "amountGHS")]
    pub amount_ghs: Decimal,
    pub status: PaymentStatus,
    /// Submission time as recorded by the source (ISO-8601 text).
    pub submitted_at: Option<String>,
    /// URL or data URI of the payment screenshot.
    pub screenshot: Option<String>,
}

impl Transaction {
    /// Returns `true` while the payment awaits review.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }
}
