//! Outbound message texts and audit action labels.
//!
//! The strings are the literal Portuguese texts of the historical system;
//! the audit labels are also what downstream reporting filters on, so they
//! must not drift.

use crate::domain::student::Student;

pub const PAYMENT_CONFIRMED: &str = "Pagamento confirmado";
pub const WELCOME_BACK: &str = "Seja bem vindo(a) de volta, bons estudos. Pagamento efetuado";

pub const AUDIT_CONFIRMED_ACTIVE: &str = "Pagamento Confirmado (Ativo)";
pub const AUDIT_CONFIRMED_INACTIVE: &str = "Pagamento Confirmado (Inativo)";
pub const AUDIT_ENROLLMENT_REQUEST: &str = "Solicitação de Matrícula";
pub const AUDIT_REGISTRATION_CONFIRMED: &str = "Confirmação de Matrícula";
pub const AUDIT_RECEIPT_STORED: &str = "Comprovante Armazenado";
pub const AUDIT_SEND_FAILED: &str = "Erro ao enviar mensagem";

pub fn operator_payment_active(student: &Student) -> String {
    format!(
        "Aluno(a) {}, pagamento efetuado - {}",
        student.name, student.book
    )
}

pub fn operator_payment_inactive(student: &Student) -> String {
    format!("Aluno(a) {} INATIVA. Pagamento efetuado", student.name)
}

pub fn enrollment_request(form_url: &str) -> String {
    format!(
        "Você ainda não fez sua matrícula, preencha a ficha de inscrição, \
         seu pagamento só será confirmado após o preenchimento da ficha de \
         inscrição. Me informa assim que preencher a ficha de inscrição. \
         Link: {form_url}"
    )
}

pub fn operator_registration_confirmed(student: &Student) -> String {
    format!(
        "Aluno(a) {} preencheu a ficha de matrícula e efetuou o pagamento do {}",
        student.name, student.book
    )
}

pub fn operator_roster_error(detail: &str) -> String {
    format!("Erro ao consultar planilha: {detail}")
}

pub fn operator_ledger_error(detail: &str) -> String {
    format!("Erro ao registrar pagamento no CSV: {detail}")
}

pub fn operator_backup_error(detail: &str) -> String {
    format!("Erro no backup do CSV: {detail}")
}

pub fn operator_audit_error(detail: &str) -> String {
    format!("Erro ao registrar log: {detail}")
}

pub fn operator_classifier_error(detail: &str) -> String {
    format!("Erro ao analisar matrícula: {detail}")
}
