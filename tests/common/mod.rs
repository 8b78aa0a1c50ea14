use pix_reconciler::domain::payment::{PaymentEvent, PaymentMethod, PaymentStatus};
use pix_reconciler::domain::student::{EnrollmentStatus, Student};
use rust_decimal_macros::dec;

pub const OPERATOR: &str = "+550000000000";
pub const FORM_URL: &str = "https://example.com/ficha";

pub fn student(name: &str, contact: &str, status: EnrollmentStatus, book: &str) -> Student {
    Student {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        contact: contact.to_string(),
        status,
        book: book.to_string(),
    }
}

pub fn pix_event(payer: &str, tx: &str) -> PaymentEvent {
    PaymentEvent {
        transaction_id: tx.to_string(),
        status: PaymentStatus::Success,
        method: PaymentMethod::Pix,
        amount: Some(dec!(50)),
        payer_name: payer.to_string(),
        payer_contact: Some("+5511999990000".to_string()),
    }
}
