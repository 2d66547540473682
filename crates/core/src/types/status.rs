//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Review status of a submitted payment.
///
/// Payments start out pending and an operator approves or rejects them from
/// the dashboard. Any status may be set from any other; there is no enforced
/// transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl PaymentStatus {
    /// Wire representation used in persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// Which source a displayed record actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// The remote record service answered.
    Remote,
    /// The remote source failed and a local substitute was used.
    LocalFallback,
}

impl Provenance {
    /// Returns `true` when the data came from the fallback source.
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::LocalFallback)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::LocalFallback => write!(f, "local fallback"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_round_trips_through_str() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Approved,
            PaymentStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_payment_status_rejects_unknown() {
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_payment_status_serde_is_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_provenance_fallback() {
        assert!(Provenance::LocalFallback.is_fallback());
        assert!(!Provenance::Remote.is_fallback());
    }
}
