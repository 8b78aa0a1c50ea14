use crate::domain::payment::PaymentEvent;
use crate::domain::student::Student;
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Column order of the persisted ledger. The format is a compatibility
/// contract with the historical store: the header row is written literally
/// and the transaction id is always the last column, which the duplicate
/// scan relies on.
pub const LEDGER_HEADER: [&str; 7] = [
    "Data",
    "Nome",
    "WhatsApp",
    "Valor",
    "Status",
    "Livro",
    "TransactionID",
];

/// Status label recorded when the payer matched no roster entry.
pub const UNENROLLED_LABEL: &str = "NÃO MATRICULADO";

/// One row of the payment ledger.
///
/// Entries are appended exactly once per distinct transaction id and never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "Data")]
    pub recorded_at: NaiveDateTime,
    #[serde(rename = "Nome")]
    pub payer_name: String,
    #[serde(rename = "WhatsApp")]
    pub contact: String,
    #[serde(rename = "Valor")]
    pub amount: Option<Decimal>,
    #[serde(rename = "Status")]
    pub status_label: String,
    #[serde(rename = "Livro")]
    pub book_label: String,
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
}

impl LedgerEntry {
    /// Builds the row for a payment event, resolved or not.
    ///
    /// A matched student contributes their contact, status label and book; an
    /// unmatched payer is recorded under `NÃO MATRICULADO` with the contact
    /// taken from the event itself.
    pub fn from_event(event: &PaymentEvent, student: Option<&Student>) -> Self {
        let contact = match student {
            Some(s) => s.contact.clone(),
            None => event.payer_contact.clone().unwrap_or_default(),
        };
        Self {
            recorded_at: Local::now().naive_local(),
            payer_name: event.payer_name.clone(),
            contact,
            amount: event.amount,
            status_label: student
                .map(|s| s.status.label().to_string())
                .unwrap_or_else(|| UNENROLLED_LABEL.to_string()),
            book_label: student.map(|s| s.book.clone()).unwrap_or_default(),
            transaction_id: event.transaction_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{PaymentMethod, PaymentStatus};
    use crate::domain::student::EnrollmentStatus;
    use rust_decimal_macros::dec;

    fn event() -> PaymentEvent {
        PaymentEvent {
            transaction_id: "T1".to_string(),
            status: PaymentStatus::Success,
            method: PaymentMethod::Pix,
            amount: Some(dec!(50)),
            payer_name: "maria silva".to_string(),
            payer_contact: Some("+5511999990000".to_string()),
        }
    }

    #[test]
    fn test_entry_for_matched_student() {
        let student = Student {
            name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            contact: "+5511888880000".to_string(),
            status: EnrollmentStatus::Active,
            book: "Livro X".to_string(),
        };

        let entry = LedgerEntry::from_event(&event(), Some(&student));
        assert_eq!(entry.contact, "+5511888880000");
        assert_eq!(entry.status_label, "ATIVO");
        assert_eq!(entry.book_label, "Livro X");
        assert_eq!(entry.payer_name, "maria silva");
        assert_eq!(entry.transaction_id, "T1");
    }

    #[test]
    fn test_entry_for_unmatched_payer() {
        let entry = LedgerEntry::from_event(&event(), None);
        assert_eq!(entry.contact, "+5511999990000");
        assert_eq!(entry.status_label, UNENROLLED_LABEL);
        assert_eq!(entry.book_label, "");
    }

    #[test]
    fn test_csv_row_matches_header_order() {
        let entry = LedgerEntry::from_event(&event(), None);
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&entry).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), LEDGER_HEADER.join(","));
        let row = lines.next().unwrap();
        assert!(row.ends_with(",T1"), "transaction id must be the last column: {row}");
    }
}
