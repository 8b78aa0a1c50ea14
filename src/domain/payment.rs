use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum PaymentMethod {
    #[serde(rename = "PIX")]
    Pix,
    #[serde(other)]
    #[default]
    Other,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum PaymentStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(other)]
    #[default]
    Other,
}

/// An inbound payment notification.
///
/// The upstream notifier may legitimately redeliver the same
/// `transaction_id`; the ledger store treats the second delivery as a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEvent {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub amount: Option<Decimal>,
    /// Free-text payer name as reported by the payment rail.
    pub payer_name: String,
    /// Payer's messaging contact, when the notifier includes one.
    pub payer_contact: Option<String>,
}

impl PaymentEvent {
    /// Only settled PIX payments are reconciled; everything else is ignored
    /// with no side effects.
    pub fn is_reconcilable(&self) -> bool {
        self.method == PaymentMethod::Pix && self.status == PaymentStatus::Success
    }
}
