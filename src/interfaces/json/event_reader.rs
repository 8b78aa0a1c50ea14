use crate::domain::payment::{PaymentEvent, PaymentMethod, PaymentStatus};
use crate::error::{ReconcileError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::BufRead;

/// The upstream notifier's payload shape. Every field is optional on the
/// wire; missing ones default so a sparse payload still parses and is then
/// filtered by the engine's preconditions.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    transaction_id: String,
    #[serde(default)]
    status: PaymentStatus,
    #[serde(default)]
    payment_method: WireMethod,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    sender: WireSender,
}

#[derive(Debug, Deserialize, Default)]
struct WireMethod {
    #[serde(rename = "type", default)]
    method: PaymentMethod,
}

#[derive(Debug, Deserialize, Default)]
struct WireSender {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: Option<String>,
}

impl From<WireEvent> for PaymentEvent {
    fn from(wire: WireEvent) -> Self {
        Self {
            transaction_id: wire.transaction_id,
            status: wire.status,
            method: wire.payment_method.method,
            amount: wire.amount,
            payer_name: wire.sender.name,
            payer_contact: wire.sender.phone,
        }
    }
}

/// Reads payment events from a JSON-lines source.
///
/// Wraps any `BufRead` and yields one `Result<PaymentEvent>` per non-empty
/// line, so a malformed line is reported without aborting the stream.
pub struct EventReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn events(self) -> impl Iterator<Item = Result<PaymentEvent>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str::<WireEvent>(&line)
                    .map(PaymentEvent::from)
                    .map_err(ReconcileError::from),
            ),
            Err(e) => Some(Err(e.into())),
        })
    }
}
